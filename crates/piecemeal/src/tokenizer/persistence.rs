//! # Saving and Loading Tokenizer Directories
//!
//! A saved tokenizer is a directory holding:
//! * `spiece.model` - the model file, byte for byte;
//! * `special_tokens_map.json` - see [`SpecialTokens`];
//! * `added_tokens.json` - `token -> id`, only when tokens were added;
//! * `tokenizer_config.json` - see [`TokenizerOptions`].

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use serde::{Serialize, de::DeserializeOwned};

use crate::{
    encoders::PieceProcessor,
    errors::PMResult,
    tokenizer::{ReformerTokenizer, TokenizerOptions},
    types::TokenId,
    vocab::{AddedVocab, SpecialTokens},
};

/// The model file name.
pub const SPIECE_MODEL_FILE: &str = "spiece.model";

/// The special tokens file name.
pub const SPECIAL_TOKENS_MAP_FILE: &str = "special_tokens_map.json";

/// The added tokens file name.
pub const ADDED_TOKENS_FILE: &str = "added_tokens.json";

/// The tokenizer options file name.
pub const TOKENIZER_CONFIG_FILE: &str = "tokenizer_config.json";

fn write_json<T: Serialize>(
    path: &Path,
    value: &T,
) -> PMResult<()> {
    fs::write(path, serde_json::to_string_pretty(value)?)?;
    Ok(())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> PMResult<Option<T>> {
    if !path.is_file() {
        return Ok(None);
    }
    let text = fs::read_to_string(path)?;
    Ok(Some(serde_json::from_str(&text)?))
}

impl ReformerTokenizer {
    /// Save to a directory, creating it if needed.
    ///
    /// ## Returns
    /// The paths written.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self, dir)))]
    pub fn save_pretrained<P: AsRef<Path>>(
        &self,
        dir: P,
    ) -> PMResult<Vec<PathBuf>> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;
        let mut written = Vec::new();

        let path = dir.join(SPIECE_MODEL_FILE);
        fs::write(&path, self.processor().model_bytes())?;
        written.push(path);

        let path = dir.join(SPECIAL_TOKENS_MAP_FILE);
        write_json(&path, self.special_tokens())?;
        written.push(path);

        if !self.added_vocab().is_empty() {
            let path = dir.join(ADDED_TOKENS_FILE);
            write_json(&path, &self.added_vocab().to_map())?;
            written.push(path);
        }

        let path = dir.join(TOKENIZER_CONFIG_FILE);
        write_json(&path, self.options())?;
        written.push(path);

        log::debug!("saved tokenizer to {}", dir.display());
        Ok(written)
    }

    /// Load from a directory written by [`Self::save_pretrained`].
    ///
    /// Only `spiece.model` is required; missing JSON files take defaults.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(dir)))]
    pub fn from_pretrained_dir<P: AsRef<Path>>(dir: P) -> PMResult<Self> {
        let dir = dir.as_ref();
        let processor = PieceProcessor::load_path(dir.join(SPIECE_MODEL_FILE))?;

        let options: TokenizerOptions =
            read_json(&dir.join(TOKENIZER_CONFIG_FILE))?.unwrap_or_default();
        let special_tokens: SpecialTokens =
            read_json(&dir.join(SPECIAL_TOKENS_MAP_FILE))?.unwrap_or_default();
        let added = match read_json::<BTreeMap<String, TokenId>>(&dir.join(ADDED_TOKENS_FILE))? {
            Some(map) => AddedVocab::from_map(processor.len(), &map)?,
            None => AddedVocab::new(processor.len()),
        };

        log::debug!("loaded tokenizer from {}", dir.display());
        Self::from_parts(processor, options, special_tokens, added)
    }
}

#[cfg(test)]
mod tests {
    use tempdir::TempDir;

    use super::*;
    use crate::{
        errors::PMError,
        model::testing::sample_model,
        normalize::TextPreprocessor,
        vocab::SpecialRole,
    };

    fn sample_tokenizer() -> ReformerTokenizer {
        ReformerTokenizer::new(PieceProcessor::from_model(sample_model()).unwrap()).with_options(
            TokenizerOptions::default()
                .with_model_max_length(Some(64))
                .with_preprocessor(TextPreprocessor::default().with_keep_accents(false)),
        )
    }

    #[test]
    fn test_save_and_reload() {
        let tmp = TempDir::new("piecemeal-save").unwrap();
        let mut tok = sample_tokenizer();
        tok.add_tokens(&["<extra>"]);

        let written = tok.save_pretrained(tmp.path()).unwrap();
        assert_eq!(written.len(), 4);
        assert_eq!(
            fs::read(tmp.path().join(SPIECE_MODEL_FILE)).unwrap(),
            tok.processor().model_bytes()
        );

        let reloaded = ReformerTokenizer::from_pretrained_dir(tmp.path()).unwrap();
        assert_eq!(reloaded.len(), tok.len());
        assert_eq!(reloaded.options(), tok.options());
        assert_eq!(reloaded.special_tokens(), tok.special_tokens());
        assert_eq!(reloaded.added_vocab(), tok.added_vocab());

        for text in [
            "This is a test",
            "I was born in 92000, and this is falsé.",
            "a <extra> b<pad>",
        ] {
            assert_eq!(reloaded.tokenize(text), tok.tokenize(text));
            assert_eq!(reloaded.encode_ids(text), tok.encode_ids(text));
        }
    }

    #[test]
    fn test_model_only_dir() {
        let tmp = TempDir::new("piecemeal-model-only").unwrap();
        fs::write(tmp.path().join(SPIECE_MODEL_FILE), sample_model().to_bytes()).unwrap();

        let tok = ReformerTokenizer::from_pretrained_dir(tmp.path()).unwrap();
        assert_eq!(tok.len(), 1001);
        assert_eq!(tok.special_token(SpecialRole::PadToken), Some("<pad>"));
        assert_eq!(tok.options(), &TokenizerOptions::default());
    }

    #[test]
    fn test_missing_model() {
        let tmp = TempDir::new("piecemeal-empty").unwrap();
        assert!(matches!(
            ReformerTokenizer::from_pretrained_dir(tmp.path()),
            Err(PMError::Io(_))
        ));
    }
}
