//! # Model Normalizer

use unicode_normalization::UnicodeNormalization;

use crate::{
    model::{NormalizerSpec, TrainerSpec},
    types::{SPIECE_UNDERLINE, SPIECE_UNDERLINE_STR},
};

/// A named normalization rule set.
///
/// Models ship a compiled rule table; rules are applied here by name
/// instead, which agrees with the table for the standard rule sets.
#[derive(
    Default,
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    strum::EnumString,
    strum::EnumIter,
    strum::Display,
)]
#[strum(serialize_all = "snake_case")]
pub enum NormalizationRule {
    /// No character mapping.
    Identity,

    /// Unicode NFKC.
    Nfkc,

    /// NFKC, after dropping control characters and mapping whitespace to space.
    #[default]
    NmtNfkc,

    /// [`Self::Nfkc`] then lowercase.
    NfkcCf,

    /// [`Self::NmtNfkc`] then lowercase.
    NmtNfkcCf,
}

impl NormalizationRule {
    /// Look up a rule by its model name.
    ///
    /// Unknown and empty names fall back to [`NormalizationRule::NmtNfkc`],
    /// the trainer default.
    pub fn from_name(name: &str) -> Self {
        match name.parse() {
            Ok(rule) => rule,
            Err(_) => {
                if !name.is_empty() {
                    log::warn!("unknown normalization rule {name:?}; using nmt_nfkc");
                }
                Self::NmtNfkc
            }
        }
    }

    fn is_nmt(self) -> bool {
        matches!(self, Self::NmtNfkc | Self::NmtNfkcCf)
    }

    fn is_nfkc(self) -> bool {
        !matches!(self, Self::Identity)
    }

    fn is_case_folded(self) -> bool {
        matches!(self, Self::NfkcCf | Self::NmtNfkcCf)
    }

    /// Apply the character mapping (no whitespace handling).
    pub fn apply(
        self,
        text: &str,
    ) -> String {
        let mapped: String = if self.is_nmt() {
            text.chars().filter_map(nmt_map_char).collect()
        } else {
            text.to_string()
        };

        let mapped = if self.is_nfkc() {
            mapped.nfkc().collect()
        } else {
            mapped
        };

        if self.is_case_folded() {
            mapped.to_lowercase()
        } else {
            mapped
        }
    }
}

/// NMT character cleanup: drop control characters, fold whitespace to space.
fn nmt_map_char(c: char) -> Option<char> {
    match c {
        '\t' | '\n' | '\r' | '\u{0B}' | '\u{0C}' => Some(' '),
        '\u{200B}' | '\u{FEFF}' => None,
        c if c.is_control() => None,
        c if c.is_whitespace() => Some(' '),
        c => Some(c),
    }
}

/// Model-defined text normalization.
///
/// Applied in order:
/// 1. the [`NormalizationRule`] character mapping;
/// 2. whitespace trimming and collapsing;
/// 3. the dummy prefix (or suffix) space;
/// 4. space escaping to `▁`.
#[derive(Debug, Clone, PartialEq)]
pub struct Normalizer {
    /// The character mapping.
    pub rule: NormalizationRule,

    /// Prepend a space so the first word carries a boundary marker.
    pub add_dummy_prefix: bool,

    /// Trim and collapse whitespace runs.
    pub remove_extra_whitespaces: bool,

    /// Replace spaces with `▁`.
    pub escape_whitespaces: bool,

    /// Put the dummy space after the text instead of before it.
    pub treat_whitespace_as_suffix: bool,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::from_spec(&NormalizerSpec::default(), &TrainerSpec::default())
    }
}

impl Normalizer {
    /// Build from a model's normalizer and trainer specs.
    pub fn from_spec(
        spec: &NormalizerSpec,
        trainer: &TrainerSpec,
    ) -> Self {
        Self {
            rule: NormalizationRule::from_name(spec.name()),
            add_dummy_prefix: spec.add_dummy_prefix(),
            remove_extra_whitespaces: spec.remove_extra_whitespaces(),
            escape_whitespaces: spec.escape_whitespaces(),
            treat_whitespace_as_suffix: trainer.treat_whitespace_as_suffix(),
        }
    }

    /// Normalize text for segmentation.
    ///
    /// Text that is empty after whitespace removal normalizes to `""`.
    pub fn normalize(
        &self,
        text: &str,
    ) -> String {
        let mapped = self.rule.apply(text);

        let mut body = if self.remove_extra_whitespaces {
            mapped.split(' ').filter(|w| !w.is_empty()).collect::<Vec<_>>().join(" ")
        } else {
            mapped
        };

        if body.is_empty() {
            return body;
        }

        if self.add_dummy_prefix {
            if self.treat_whitespace_as_suffix {
                body.push(' ');
            } else {
                body.insert(0, ' ');
            }
        }

        if self.escape_whitespaces {
            body.replace(' ', SPIECE_UNDERLINE_STR)
        } else {
            body
        }
    }

    /// Invert whitespace escaping for decoded text.
    ///
    /// Replaces `▁` with space and removes the dummy space added by
    /// [`Self::normalize`].
    pub fn denormalize(
        &self,
        text: &str,
    ) -> String {
        let text = text.replace(SPIECE_UNDERLINE, " ");
        if !self.add_dummy_prefix {
            return text;
        }
        if self.treat_whitespace_as_suffix {
            text.strip_suffix(' ').map(str::to_string).unwrap_or(text)
        } else {
            text.strip_prefix(' ').map(str::to_string).unwrap_or(text)
        }
    }
}
