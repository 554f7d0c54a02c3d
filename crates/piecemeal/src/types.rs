//! # Common Types

/// A vocabulary id.
///
/// `SentencePiece` stores ids as `int32`; valid ids are never negative.
pub type TokenId = u32;

/// The word-boundary marker ("▁", U+2581) which replaces spaces in pieces.
pub const SPIECE_UNDERLINE: char = '\u{2581}';

/// [`SPIECE_UNDERLINE`] as a `&str`.
pub const SPIECE_UNDERLINE_STR: &str = "\u{2581}";

cfg_if::cfg_if! {
    if #[cfg(feature = "ahash")] {
        /// Type Alias for hash maps in this crate.
        pub type PMHashMap<K, V> = ahash::AHashMap<K, V>;

        /// Type Alias for hash sets in this crate.
        pub type PMHashSet<V> = ahash::AHashSet<V>;

        /// Create a new hash map with the given capacity.
        pub fn hash_map_with_capacity<K, V>(capacity: usize) -> PMHashMap<K, V> {
            PMHashMap::with_capacity(capacity)
        }

    } else if #[cfg(feature = "foldhash")] {
        /// Type Alias for hash maps in this crate.
        pub type PMHashMap<K, V> = foldhash::HashMap<K, V>;

        /// Type Alias for hash sets in this crate.
        pub type PMHashSet<V> = foldhash::HashSet<V>;

        /// Create a new hash map with the given capacity.
        pub fn hash_map_with_capacity<K, V>(capacity: usize) -> PMHashMap<K, V> {
            foldhash::HashMapExt::with_capacity(capacity)
        }

    } else {
        /// Type Alias for hash maps in this crate.
        pub type PMHashMap<K, V> = std::collections::HashMap<K, V>;

        /// Type Alias for hash sets in this crate.
        pub type PMHashSet<V> = std::collections::HashSet<V>;

        /// Create a new hash map with the given capacity.
        pub fn hash_map_with_capacity<K, V>(capacity: usize) -> PMHashMap<K, V> {
            PMHashMap::with_capacity(capacity)
        }
    }
}

/// Compile-time check that a value is [`Send`].
#[cfg(test)]
pub(crate) fn check_is_send<S: Send>(_: &S) {}

/// Compile-time check that a value is [`Sync`].
#[cfg(test)]
pub(crate) fn check_is_sync<S: Sync>(_: &S) {}
