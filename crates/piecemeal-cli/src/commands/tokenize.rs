use std::io::{BufRead, Write};

use crate::{
    disk_cache::DiskCacheArgs,
    input_output::{InputArgs, OutputArgs},
    model_selector::ModelSelectorArgs,
};

/// Args for the tokenize command.
#[derive(clap::Args, Debug)]
pub struct TokenizeArgs {
    #[command(flatten)]
    model_selector: ModelSelectorArgs,

    #[command(flatten)]
    input: InputArgs,

    #[command(flatten)]
    output: OutputArgs,

    #[command(flatten)]
    disk_cache: DiskCacheArgs,

    /// Sample segmentations with this smoothing parameter instead of
    /// taking the best one.
    #[arg(long, default_value = None)]
    sample_alpha: Option<f32>,
}

impl TokenizeArgs {
    /// Run the tokenize command.
    pub fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        let mut disk_cache = self.disk_cache.init_disk_cache()?;
        let tokenizer = self.model_selector.load_tokenizer(&mut disk_cache)?;

        let reader = self.input.open_reader()?;
        let mut writer = self.output.open_writer()?;
        let mut rng = rand::rng();

        for line in reader.lines() {
            let line = line?;
            let tokens = match self.sample_alpha {
                Some(alpha) => tokenizer.tokenize_sampled(&line, alpha, &mut rng),
                None => tokenizer.tokenize(&line),
            };
            let ids = tokenizer.convert_tokens_to_ids(&tokens);

            let pairs: Vec<String> = tokens
                .iter()
                .zip(&ids)
                .map(|(token, id)| format!("{token}:{id}"))
                .collect();
            writeln!(writer, "{}", pairs.join(" "))?;
            writer.flush()?;
        }
        Ok(())
    }
}
