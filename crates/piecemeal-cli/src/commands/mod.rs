use crate::commands::{
    cat::CatArgs,
    list_models::ListModelsArgs,
    tokenize::TokenizeArgs,
    vocab::VocabArgs,
};

pub mod cat;
pub mod list_models;
pub mod tokenize;
pub mod vocab;

/// Subcommands for piecemeal-cli
#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Act as a streaming tokenizer.
    Cat(CatArgs),

    /// Print the tokens and ids of each input line.
    Tokenize(TokenizeArgs),

    /// List available pretrained models.
    ListModels(ListModelsArgs),

    /// Dump the vocabulary.
    Vocab(VocabArgs),
}

impl Commands {
    /// Run the subcommand.
    pub fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        match self {
            Commands::Cat(cmd) => cmd.run(),
            Commands::Tokenize(cmd) => cmd.run(),
            Commands::ListModels(cmd) => cmd.run(),
            Commands::Vocab(cmd) => cmd.run(),
        }
    }
}
