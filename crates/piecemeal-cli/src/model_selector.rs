use piecemeal::{ReformerTokenizer, disk_cache::PiecemealDiskCache};

/// Model selector arg group.
#[derive(clap::Args, Debug)]
pub struct ModelSelectorArgs {
    /// Pretrained model name, or a directory written by `save_pretrained`.
    #[arg(long, default_value = "google/reformer-crime-and-punishment")]
    model: String,

    /// A `SentencePiece` model file; overrides `--model`.
    #[arg(long, default_value = None)]
    model_file: Option<String>,
}

impl ModelSelectorArgs {
    /// Load the tokenizer.
    pub fn load_tokenizer(
        &self,
        disk_cache: &mut PiecemealDiskCache,
    ) -> Result<ReformerTokenizer, Box<dyn std::error::Error>> {
        let tokenizer = match &self.model_file {
            Some(path) => ReformerTokenizer::from_model_file(path)?,
            None => ReformerTokenizer::from_pretrained(&self.model, disk_cache)?,
        };
        log::info!(
            "loaded {} ({} pieces, {} added)",
            self.model_file.as_deref().unwrap_or(&self.model),
            tokenizer.vocab_size(),
            tokenizer.added_vocab().len()
        );
        Ok(tokenizer)
    }
}
