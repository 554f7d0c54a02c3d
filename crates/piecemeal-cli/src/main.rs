mod commands;
mod disk_cache;
mod input_output;
mod logging;
mod model_selector;
mod tokenizer_mode;

use clap::Parser;
use commands::Commands;

/// piecemeal-cli
#[derive(clap::Parser, Debug)]
pub struct Args {
    #[command(flatten)]
    logging: logging::LogArgs,

    /// Subcommand to run.
    #[clap(subcommand)]
    pub command: Commands,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    args.logging.setup_logging(2)?;

    args.command.run()
}
