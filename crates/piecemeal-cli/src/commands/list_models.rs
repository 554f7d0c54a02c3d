/// Args for the model listing command.
#[derive(clap::Args, Debug)]
pub struct ListModelsArgs {
    /// Include every alias.
    #[arg(long)]
    aliases: bool,
}

impl ListModelsArgs {
    /// Run the model listing command.
    pub fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        for name in piecemeal::pretrained::list_models(self.aliases) {
            println!("{name}");
        }
        Ok(())
    }
}
