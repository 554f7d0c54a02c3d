//! # Added Tokens

use std::collections::BTreeMap;

use crate::{
    errors::{PMError, PMResult},
    types::{PMHashMap, TokenId},
};

/// Tokens registered beyond the model vocabulary.
///
/// Ids are dense, starting at the model vocabulary size.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AddedVocab {
    base: usize,
    tokens: Vec<String>,
    index: PMHashMap<String, TokenId>,
}

impl AddedVocab {
    /// An empty added vocabulary whose first id is `base`.
    pub fn new(base: usize) -> Self {
        Self {
            base,
            tokens: Vec::new(),
            index: PMHashMap::default(),
        }
    }

    /// Rebuild from a persisted `token -> id` map.
    ///
    /// Ids must be dense from `base`; entries are ordered by id.
    pub fn from_map(
        base: usize,
        map: &BTreeMap<String, TokenId>,
    ) -> PMResult<Self> {
        let mut entries: Vec<(&String, TokenId)> = map.iter().map(|(t, &id)| (t, id)).collect();
        entries.sort_by_key(|&(_, id)| id);

        let mut vocab = Self::new(base);
        for (token, id) in entries {
            let expected = vocab.next_id();
            if id != expected {
                return Err(PMError::InvalidConfig(format!(
                    "added token {token:?} has id {id}, expected {expected}"
                )));
            }
            vocab.add(token);
        }
        Ok(vocab)
    }

    /// The first id.
    pub fn base(&self) -> usize {
        self.base
    }

    /// The number of added tokens.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Are there no added tokens?
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// The id the next added token will receive.
    pub fn next_id(&self) -> TokenId {
        (self.base + self.tokens.len()) as TokenId
    }

    /// Add a token, if not already present.
    ///
    /// ## Returns
    /// The id of the new token, or `None` if it was already added.
    pub fn add(
        &mut self,
        token: &str,
    ) -> Option<TokenId> {
        if self.index.contains_key(token) {
            return None;
        }
        let id = self.next_id();
        self.tokens.push(token.to_string());
        self.index.insert(token.to_string(), id);
        Some(id)
    }

    /// Look up an added token's id.
    pub fn get(
        &self,
        token: &str,
    ) -> Option<TokenId> {
        self.index.get(token).copied()
    }

    /// Look up the token for an id.
    pub fn token(
        &self,
        id: TokenId,
    ) -> Option<&str> {
        (id as usize)
            .checked_sub(self.base)
            .and_then(|i| self.tokens.get(i))
            .map(String::as_str)
    }

    /// Iterate over `(token, id)` pairs in id order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, TokenId)> {
        self.tokens
            .iter()
            .enumerate()
            .map(|(i, t)| (t.as_str(), (self.base + i) as TokenId))
    }

    /// The `token -> id` map, as persisted in `added_tokens.json`.
    pub fn to_map(&self) -> BTreeMap<String, TokenId> {
        self.iter().map(|(t, id)| (t.to_string(), id)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add() {
        let mut added = AddedVocab::new(320);
        assert!(added.is_empty());
        assert_eq!(added.add("<pad>"), Some(320));
        assert_eq!(added.add("<new>"), Some(321));
        assert_eq!(added.add("<pad>"), None);

        assert_eq!(added.len(), 2);
        assert_eq!(added.get("<new>"), Some(321));
        assert_eq!(added.token(320), Some("<pad>"));
        assert_eq!(added.token(319), None);
        assert_eq!(added.token(322), None);
        assert_eq!(added.next_id(), 322);
    }

    #[test]
    fn test_map_round_trip() {
        let mut added = AddedVocab::new(10);
        added.add("b");
        added.add("a");

        let map = added.to_map();
        let restored = AddedVocab::from_map(10, &map).unwrap();
        assert_eq!(restored, added);
        assert_eq!(restored.iter().collect::<Vec<_>>(), vec![("b", 10), ("a", 11)]);
    }

    #[test]
    fn test_map_gap() {
        let map: BTreeMap<String, TokenId> = [("x".to_string(), 12)].into_iter().collect();
        assert!(AddedVocab::from_map(10, &map).is_err());
    }
}
