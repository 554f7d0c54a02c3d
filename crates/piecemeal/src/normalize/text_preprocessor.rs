//! # Tokenizer-Level Text Preprocessing

use serde::{Deserialize, Serialize};
use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

/// Cleanup applied to raw text before model normalization.
///
/// The default is a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextPreprocessor {
    /// Trim the text and collapse whitespace runs to one space.
    pub remove_space: bool,

    /// Keep accents; when `false`, strip combining marks after NFKD.
    pub keep_accents: bool,

    /// Lowercase the text.
    pub do_lower_case: bool,
}

impl Default for TextPreprocessor {
    fn default() -> Self {
        Self {
            remove_space: false,
            keep_accents: true,
            do_lower_case: false,
        }
    }
}

impl TextPreprocessor {
    /// Does this preprocessor change any text?
    pub fn is_identity(&self) -> bool {
        !self.remove_space && self.keep_accents && !self.do_lower_case
    }

    /// Set [`Self::remove_space`].
    pub fn with_remove_space(
        mut self,
        remove_space: bool,
    ) -> Self {
        self.remove_space = remove_space;
        self
    }

    /// Set [`Self::keep_accents`].
    pub fn with_keep_accents(
        mut self,
        keep_accents: bool,
    ) -> Self {
        self.keep_accents = keep_accents;
        self
    }

    /// Set [`Self::do_lower_case`].
    pub fn with_do_lower_case(
        mut self,
        do_lower_case: bool,
    ) -> Self {
        self.do_lower_case = do_lower_case;
        self
    }

    /// Preprocess text.
    pub fn process(
        &self,
        text: &str,
    ) -> String {
        let mut out = if self.remove_space {
            text.split_whitespace().collect::<Vec<_>>().join(" ")
        } else {
            text.to_string()
        };

        if !self.keep_accents {
            out = out.nfkd().filter(|&c| !is_combining_mark(c)).collect();
        }

        if self.do_lower_case {
            out = out.to_lowercase();
        }

        out
    }
}
