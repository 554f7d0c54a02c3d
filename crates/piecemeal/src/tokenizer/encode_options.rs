//! # Encoding Options

use serde::{Deserialize, Serialize};

/// How to shorten sequences that exceed `max_length`.
#[derive(
    Default,
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::EnumString,
    strum::EnumIter,
    strum::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TruncationStrategy {
    /// Remove tokens one at a time from the longer of the two sequences.
    LongestFirst,

    /// Remove tokens only from the first sequence.
    OnlyFirst,

    /// Remove tokens only from the second sequence.
    OnlySecond,

    /// Never truncate.
    #[default]
    DoNotTruncate,
}

/// How to pad a batch.
#[derive(
    Default,
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::EnumString,
    strum::EnumIter,
    strum::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PaddingStrategy {
    /// No padding.
    #[default]
    DoNotPad,

    /// Pad to the longest sequence in the batch.
    Longest,

    /// Pad to `max_length`.
    MaxLength,
}

/// Which end of a sequence receives padding.
#[derive(
    Default,
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::EnumString,
    strum::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PaddingSide {
    /// Pad after the tokens.
    #[default]
    Right,

    /// Pad before the tokens.
    Left,
}

/// Options for `encode`, `encode_plus` and `batch_encode_plus`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EncodeOptions {
    /// The maximum length of a (paired) sequence.
    ///
    /// Truncation and `MaxLength` padding fall back to the tokenizer's
    /// `model_max_length` when unset.
    pub max_length: Option<usize>,

    /// Overlap between the kept tokens and the overflowing tokens.
    pub stride: usize,

    /// See [`TruncationStrategy`].
    pub truncation: TruncationStrategy,

    /// See [`PaddingStrategy`].
    pub padding: PaddingStrategy,

    /// Override the tokenizer's padding side.
    pub padding_side: Option<PaddingSide>,

    /// Round padded lengths up to a multiple of this.
    pub pad_to_multiple_of: Option<usize>,

    /// Produce rectangular output; implies [`PaddingStrategy::Longest`]
    /// when no padding is requested.
    pub return_tensors: bool,

    /// Return `attention_mask`; `None` follows the tokenizer's model input names.
    pub return_attention_mask: Option<bool>,

    /// Return `token_type_ids`; `None` follows the tokenizer's model input names.
    pub return_token_type_ids: Option<bool>,

    /// Return `special_tokens_mask`.
    pub return_special_tokens_mask: bool,

    /// Return `overflowing_tokens` and `num_truncated_tokens`.
    pub return_overflowing_tokens: bool,
}

impl EncodeOptions {
    /// Set [`Self::max_length`].
    pub fn with_max_length(
        mut self,
        max_length: Option<usize>,
    ) -> Self {
        self.max_length = max_length;
        self
    }

    /// Set [`Self::stride`].
    pub fn with_stride(
        mut self,
        stride: usize,
    ) -> Self {
        self.stride = stride;
        self
    }

    /// Set [`Self::truncation`].
    pub fn with_truncation(
        mut self,
        truncation: TruncationStrategy,
    ) -> Self {
        self.truncation = truncation;
        self
    }

    /// Set [`Self::padding`].
    pub fn with_padding(
        mut self,
        padding: PaddingStrategy,
    ) -> Self {
        self.padding = padding;
        self
    }

    /// Set [`Self::padding_side`].
    pub fn with_padding_side(
        mut self,
        padding_side: PaddingSide,
    ) -> Self {
        self.padding_side = Some(padding_side);
        self
    }

    /// Set [`Self::pad_to_multiple_of`].
    pub fn with_pad_to_multiple_of(
        mut self,
        multiple: Option<usize>,
    ) -> Self {
        self.pad_to_multiple_of = multiple;
        self
    }

    /// Set [`Self::return_tensors`].
    pub fn with_return_tensors(
        mut self,
        return_tensors: bool,
    ) -> Self {
        self.return_tensors = return_tensors;
        self
    }

    /// Set [`Self::return_attention_mask`].
    pub fn with_return_attention_mask(
        mut self,
        flag: bool,
    ) -> Self {
        self.return_attention_mask = Some(flag);
        self
    }

    /// Set [`Self::return_token_type_ids`].
    pub fn with_return_token_type_ids(
        mut self,
        flag: bool,
    ) -> Self {
        self.return_token_type_ids = Some(flag);
        self
    }

    /// Set [`Self::return_special_tokens_mask`].
    pub fn with_return_special_tokens_mask(
        mut self,
        flag: bool,
    ) -> Self {
        self.return_special_tokens_mask = flag;
        self
    }

    /// Set [`Self::return_overflowing_tokens`].
    pub fn with_return_overflowing_tokens(
        mut self,
        flag: bool,
    ) -> Self {
        self.return_overflowing_tokens = flag;
        self
    }

    /// The padding actually applied.
    pub fn effective_padding(&self) -> PaddingStrategy {
        match self.padding {
            PaddingStrategy::DoNotPad if self.return_tensors => PaddingStrategy::Longest,
            padding => padding,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_padding() {
        let options = EncodeOptions::default();
        assert_eq!(options.effective_padding(), PaddingStrategy::DoNotPad);

        let options = options.with_return_tensors(true);
        assert_eq!(options.effective_padding(), PaddingStrategy::Longest);

        let options = options.with_padding(PaddingStrategy::MaxLength);
        assert_eq!(options.effective_padding(), PaddingStrategy::MaxLength);
    }

    #[test]
    fn test_strategy_names() {
        assert_eq!(
            "only_second".parse::<TruncationStrategy>().unwrap(),
            TruncationStrategy::OnlySecond
        );
        assert_eq!(PaddingStrategy::MaxLength.to_string(), "max_length");
        assert_eq!(
            serde_json::to_string(&PaddingSide::Left).unwrap(),
            "\"left\""
        );
    }
}
