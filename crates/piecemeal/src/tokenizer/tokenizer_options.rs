//! # Tokenizer Options
//!
//! Persisted as `tokenizer_config.json`.

use serde::{Deserialize, Serialize};

use crate::{normalize::TextPreprocessor, tokenizer::PaddingSide};

/// The model input names of the Reformer family.
pub const DEFAULT_MODEL_INPUT_NAMES: [&str; 2] = ["input_ids", "attention_mask"];

fn default_model_input_names() -> Vec<String> {
    DEFAULT_MODEL_INPUT_NAMES.iter().map(|s| s.to_string()).collect()
}

/// Tokenizer-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenizerOptions {
    /// The longest sequence the model accepts; longer inputs log a warning.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_max_length: Option<usize>,

    /// Default padding side.
    pub padding_side: PaddingSide,

    /// The fields the model consumes; decides which masks are returned
    /// by default.
    pub model_input_names: Vec<String>,

    /// Text cleanup before model normalization.
    #[serde(flatten)]
    pub preprocessor: TextPreprocessor,
}

impl Default for TokenizerOptions {
    fn default() -> Self {
        Self {
            model_max_length: None,
            padding_side: PaddingSide::default(),
            model_input_names: default_model_input_names(),
            preprocessor: TextPreprocessor::default(),
        }
    }
}

impl TokenizerOptions {
    /// Set [`Self::model_max_length`].
    pub fn with_model_max_length(
        mut self,
        model_max_length: Option<usize>,
    ) -> Self {
        self.model_max_length = model_max_length;
        self
    }

    /// Set [`Self::padding_side`].
    pub fn with_padding_side(
        mut self,
        padding_side: PaddingSide,
    ) -> Self {
        self.padding_side = padding_side;
        self
    }

    /// Set [`Self::preprocessor`].
    pub fn with_preprocessor(
        mut self,
        preprocessor: TextPreprocessor,
    ) -> Self {
        self.preprocessor = preprocessor;
        self
    }

    /// Is `name` one of the model input names?
    pub fn is_model_input(
        &self,
        name: &str,
    ) -> bool {
        self.model_input_names.iter().any(|n| n == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = TokenizerOptions::default();
        assert!(options.is_model_input("attention_mask"));
        assert!(!options.is_model_input("token_type_ids"));
        assert_eq!(options.padding_side, PaddingSide::Right);
        assert!(options.preprocessor.is_identity());
    }

    #[test]
    fn test_json() {
        let options = TokenizerOptions::default()
            .with_model_max_length(Some(524288))
            .with_preprocessor(TextPreprocessor::default().with_do_lower_case(true));

        let json = serde_json::to_value(&options).unwrap();
        assert_eq!(json["model_max_length"], 524288);
        assert_eq!(json["do_lower_case"], true);
        assert_eq!(json["padding_side"], "right");

        let reloaded: TokenizerOptions = serde_json::from_value(json).unwrap();
        assert_eq!(reloaded, options);

        // Unknown keys from other writers are ignored; missing keys default.
        let partial: TokenizerOptions =
            serde_json::from_str(r#"{"keep_accents": false, "tokenizer_class": "X"}"#).unwrap();
        assert!(!partial.preprocessor.keep_accents);
        assert_eq!(partial.model_max_length, None);
        assert_eq!(partial.model_input_names, default_model_input_names());
    }
}
