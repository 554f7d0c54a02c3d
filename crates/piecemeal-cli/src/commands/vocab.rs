use std::io::Write;

use crate::{disk_cache::DiskCacheArgs, input_output::OutputArgs, model_selector::ModelSelectorArgs};

/// Args for the vocab command.
#[derive(clap::Args, Debug)]
pub struct VocabArgs {
    #[command(flatten)]
    model_selector: ModelSelectorArgs,

    #[command(flatten)]
    output: OutputArgs,

    #[command(flatten)]
    disk_cache: DiskCacheArgs,
}

impl VocabArgs {
    /// Run the vocab command.
    ///
    /// Writes `id<TAB>piece<TAB>score<TAB>type` per model piece, then
    /// `id<TAB>token<TAB><TAB>Added` per added token.
    pub fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        let mut disk_cache = self.disk_cache.init_disk_cache()?;
        let tokenizer = self.model_selector.load_tokenizer(&mut disk_cache)?;
        let mut writer = self.output.open_writer()?;

        for (id, entry) in tokenizer.processor().vocab().iter() {
            writeln!(
                writer,
                "{id}\t{}\t{}\t{:?}",
                entry.piece,
                entry.score,
                entry.kind
            )?;
        }
        for (token, id) in tokenizer.added_vocab().iter() {
            writeln!(writer, "{id}\t{token}\t\tAdded")?;
        }
        writer.flush()?;
        Ok(())
    }
}
