//! # Vocabularies
//!
//! * [`PieceVocab`] - the model's pieces, ids, scores and types.
//! * [`SpecialTokens`] - role-named special tokens.
//! * [`AddedVocab`] - tokens registered beyond the model vocabulary.

mod added_vocab;
mod piece_vocab;
mod special_tokens;

#[doc(inline)]
pub use added_vocab::*;
#[doc(inline)]
pub use piece_vocab::*;
#[doc(inline)]
pub use special_tokens::*;
