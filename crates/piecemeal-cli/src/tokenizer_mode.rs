/// The tokenizer mode.
#[derive(Debug, Clone, Copy)]
pub enum TokenizerMode {
    Encode,
    Decode,
}

/// Mode selection for the tokenizer.
#[derive(clap::Args, Debug)]
#[group(required = true, multiple = false)]
pub struct TokenizerModeArgs {
    /// Encode from text to tokens.
    #[arg(long, action = clap::ArgAction::SetTrue)]
    encode: bool,

    /// Decode from tokens to text.
    #[arg(long, action = clap::ArgAction::SetTrue)]
    decode: bool,
}

impl TokenizerModeArgs {
    /// Get the tokenizer mode; the arg group guarantees exactly one flag.
    pub fn mode(&self) -> TokenizerMode {
        if self.decode {
            TokenizerMode::Decode
        } else {
            TokenizerMode::Encode
        }
    }
}
