//! # Special Tokens

use serde::{Deserialize, Serialize};

/// The roles a special token can fill.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    strum::EnumString,
    strum::EnumIter,
    strum::Display,
)]
#[strum(serialize_all = "snake_case")]
pub enum SpecialRole {
    /// Beginning of sequence.
    BosToken,

    /// End of sequence.
    EosToken,

    /// Unknown.
    UnkToken,

    /// Sequence separator.
    SepToken,

    /// Padding.
    PadToken,

    /// Classification.
    ClsToken,

    /// Masked-language-model mask.
    MaskToken,
}

/// The special tokens of a tokenizer.
///
/// Serialized as `special_tokens_map.json`; unset roles are omitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default = "SpecialTokens::empty")]
pub struct SpecialTokens {
    /// See [`SpecialRole::BosToken`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bos_token: Option<String>,

    /// See [`SpecialRole::EosToken`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eos_token: Option<String>,

    /// See [`SpecialRole::UnkToken`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unk_token: Option<String>,

    /// See [`SpecialRole::SepToken`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sep_token: Option<String>,

    /// See [`SpecialRole::PadToken`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pad_token: Option<String>,

    /// See [`SpecialRole::ClsToken`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cls_token: Option<String>,

    /// See [`SpecialRole::MaskToken`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mask_token: Option<String>,

    /// Extra tokens that are never split.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub additional_special_tokens: Vec<String>,
}

impl Default for SpecialTokens {
    /// `</s>`, `<unk>`, `<pad>`.
    fn default() -> Self {
        Self::empty()
            .with_role(SpecialRole::EosToken, "</s>")
            .with_role(SpecialRole::UnkToken, "<unk>")
            .with_role(SpecialRole::PadToken, "<pad>")
    }
}

impl SpecialTokens {
    /// No special tokens.
    pub fn empty() -> Self {
        Self {
            bos_token: None,
            eos_token: None,
            unk_token: None,
            sep_token: None,
            pad_token: None,
            cls_token: None,
            mask_token: None,
            additional_special_tokens: Vec::new(),
        }
    }

    fn slot_mut(
        &mut self,
        role: SpecialRole,
    ) -> &mut Option<String> {
        match role {
            SpecialRole::BosToken => &mut self.bos_token,
            SpecialRole::EosToken => &mut self.eos_token,
            SpecialRole::UnkToken => &mut self.unk_token,
            SpecialRole::SepToken => &mut self.sep_token,
            SpecialRole::PadToken => &mut self.pad_token,
            SpecialRole::ClsToken => &mut self.cls_token,
            SpecialRole::MaskToken => &mut self.mask_token,
        }
    }

    /// Get the token for a role.
    pub fn get(
        &self,
        role: SpecialRole,
    ) -> Option<&str> {
        match role {
            SpecialRole::BosToken => self.bos_token.as_deref(),
            SpecialRole::EosToken => self.eos_token.as_deref(),
            SpecialRole::UnkToken => self.unk_token.as_deref(),
            SpecialRole::SepToken => self.sep_token.as_deref(),
            SpecialRole::PadToken => self.pad_token.as_deref(),
            SpecialRole::ClsToken => self.cls_token.as_deref(),
            SpecialRole::MaskToken => self.mask_token.as_deref(),
        }
    }

    /// Set (or clear) the token for a role.
    pub fn set<S: Into<String>>(
        &mut self,
        role: SpecialRole,
        token: Option<S>,
    ) {
        *self.slot_mut(role) = token.map(Into::into);
    }

    /// Set the token for a role.
    pub fn with_role<S: Into<String>>(
        mut self,
        role: SpecialRole,
        token: S,
    ) -> Self {
        self.set(role, Some(token));
        self
    }

    /// Add extra never-split tokens.
    pub fn with_additional<I, S>(
        mut self,
        tokens: I,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for token in tokens {
            let token = token.into();
            if !self.additional_special_tokens.contains(&token) {
                self.additional_special_tokens.push(token);
            }
        }
        self
    }

    /// Overlay another set: roles set in `other` replace ours.
    pub fn merge(
        &mut self,
        other: &SpecialTokens,
    ) {
        use strum::IntoEnumIterator;
        for role in SpecialRole::iter() {
            if let Some(token) = other.get(role) {
                self.set(role, Some(token));
            }
        }
        for token in &other.additional_special_tokens {
            if !self.additional_special_tokens.contains(token) {
                self.additional_special_tokens.push(token.clone());
            }
        }
    }

    /// All distinct special tokens: roles in [`SpecialRole`] order, then
    /// the additional tokens.
    pub fn all_tokens(&self) -> Vec<String> {
        use strum::IntoEnumIterator;
        let mut out: Vec<String> = Vec::new();
        let roles = SpecialRole::iter().filter_map(|role| self.get(role));
        for token in roles.chain(self.additional_special_tokens.iter().map(String::as_str)) {
            if !out.iter().any(|t| t == token) {
                out.push(token.to_string());
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let specials = SpecialTokens::default();
        assert_eq!(specials.get(SpecialRole::EosToken), Some("</s>"));
        assert_eq!(specials.get(SpecialRole::UnkToken), Some("<unk>"));
        assert_eq!(specials.get(SpecialRole::PadToken), Some("<pad>"));
        assert_eq!(specials.get(SpecialRole::BosToken), None);
        assert_eq!(specials.all_tokens(), vec!["</s>", "<unk>", "<pad>"]);
    }

    #[test]
    fn test_all_tokens_dedup() {
        let specials = SpecialTokens::empty()
            .with_role(SpecialRole::SepToken, "</s>")
            .with_role(SpecialRole::EosToken, "</s>")
            .with_additional(["<mask>", "</s>", "<mask>"]);
        assert_eq!(specials.all_tokens(), vec!["</s>", "<mask>"]);
        assert_eq!(specials.additional_special_tokens, vec!["<mask>", "</s>"]);
    }

    #[test]
    fn test_merge() {
        let mut specials = SpecialTokens::default();
        specials.merge(
            &SpecialTokens::empty()
                .with_role(SpecialRole::PadToken, "[PAD]")
                .with_additional(["<x>"]),
        );
        assert_eq!(specials.get(SpecialRole::PadToken), Some("[PAD]"));
        assert_eq!(specials.get(SpecialRole::UnkToken), Some("<unk>"));
        assert_eq!(specials.additional_special_tokens, vec!["<x>"]);
    }

    #[test]
    fn test_json() {
        let json = serde_json::to_string(&SpecialTokens::default()).unwrap();
        assert_eq!(
            json,
            r#"{"eos_token":"</s>","unk_token":"<unk>","pad_token":"<pad>"}"#
        );

        let specials: SpecialTokens = serde_json::from_str(r#"{"unk_token":"<unk>"}"#).unwrap();
        assert_eq!(specials.get(SpecialRole::UnkToken), Some("<unk>"));
        assert_eq!(specials.get(SpecialRole::EosToken), None);
    }
}
