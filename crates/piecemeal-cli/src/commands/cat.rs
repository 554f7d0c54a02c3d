use std::io::{BufRead, Write};

use piecemeal::{ReformerTokenizer, TokenId};

use crate::{
    disk_cache::DiskCacheArgs,
    input_output::{InputArgs, OutputArgs},
    model_selector::ModelSelectorArgs,
    tokenizer_mode::{TokenizerMode, TokenizerModeArgs},
};

/// Args for the cat command.
#[derive(clap::Args, Debug)]
pub struct CatArgs {
    #[command(flatten)]
    model_selector: ModelSelectorArgs,

    #[command(flatten)]
    tokenizer_mode: TokenizerModeArgs,

    #[command(flatten)]
    input: InputArgs,

    #[command(flatten)]
    output: OutputArgs,

    #[command(flatten)]
    disk_cache: DiskCacheArgs,

    /// When decoding, drop special tokens.
    #[arg(long)]
    skip_special_tokens: bool,
}

impl CatArgs {
    /// Run the cat command.
    pub fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        let mut disk_cache = self.disk_cache.init_disk_cache()?;
        let tokenizer = self.model_selector.load_tokenizer(&mut disk_cache)?;

        let mut reader = self.input.open_reader()?;
        let mut writer = self.output.open_writer()?;

        match self.tokenizer_mode.mode() {
            TokenizerMode::Encode => run_cat_encode(&mut reader, &mut writer, &tokenizer)?,
            TokenizerMode::Decode => run_cat_decode(
                &mut reader,
                &mut writer,
                &tokenizer,
                self.skip_special_tokens,
            )?,
        }

        Ok(())
    }
}

fn run_cat_encode(
    reader: &mut dyn BufRead,
    writer: &mut dyn Write,
    tokenizer: &ReformerTokenizer,
) -> Result<(), Box<dyn std::error::Error>> {
    for line in reader.lines() {
        let ids = tokenizer.encode_ids(&line?);

        for (idx, id) in ids.iter().enumerate() {
            write!(writer, "{}{}", if idx == 0 { "" } else { " " }, id)?;
        }
        writeln!(writer)?;
        writer.flush()?;
    }
    Ok(())
}

fn run_cat_decode(
    reader: &mut dyn BufRead,
    writer: &mut dyn Write,
    tokenizer: &ReformerTokenizer,
    skip_special_tokens: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    for line in reader.lines() {
        let ids = line?
            .split_whitespace()
            .map(str::parse)
            .collect::<Result<Vec<TokenId>, _>>()?;

        let text = tokenizer.decode(&ids, skip_special_tokens, true)?;

        writeln!(writer, "{text}")?;
        writer.flush()?;
    }
    Ok(())
}
