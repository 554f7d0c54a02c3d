//! # Piece Encoders
//!
//! Segmentation of normalized text into vocabulary pieces, one encoder
//! per `SentencePiece` model type:
//! * [`UnigramEncoder`] - Viterbi over the piece lattice, plus sampling.
//! * [`BpeEncoder`] - score-ordered pair merges.
//! * [`WordEncoder`] / [`CharEncoder`] - whole-word / per-character lookup.
//!
//! [`PieceProcessor`] bundles the normalizer, vocabulary and encoder a
//! model file describes.

mod bpe;
mod piece_encoder;
mod processor;
mod unigram;
mod word_char;

#[doc(inline)]
pub use bpe::*;
#[doc(inline)]
pub use piece_encoder::*;
#[doc(inline)]
pub use processor::*;
#[doc(inline)]
pub use unigram::*;
#[doc(inline)]
pub use word_char::*;
