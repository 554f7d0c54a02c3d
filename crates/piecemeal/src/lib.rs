//! # `piecemeal` `SentencePiece` Tokenizer Suite
//!
//! A pure Rust reader and runner for `SentencePiece` model files, with a
//! Reformer-style tokenizer on top.
//!
//! See:
//! * [`model`] to load `spiece.model` files.
//! * [`normalize`] for the text normalization that precedes segmentation.
//! * [`encoders`] for unigram, BPE, word and character segmentation.
//! * [`vocab`] for piece, special and added token vocabularies.
//! * [`tokenizer`] for [`ReformerTokenizer`]: tokenization, id conversion,
//!   batch encoding and persistence.
//! * [`pretrained`] to load named pretrained tokenizers.
//!
//! ## Crate Features
//!
//! #### feature: ``default``
//!
//! * ``ahash``
//! * ``client``
//! * ``rayon``
//!
//! #### feature: ``client``
//!
//! * ``download``
//!
//! The default client loads pretrained tokenizers and runs them.
//!
//! #### feature: ``download``
//!
//! * ``piecemeal-disk-cache``
//!
//! The download feature enables downloading model files from the internet,
//! and re-exports the cache as [`disk_cache`].
//!
//! #### feature: ``ahash``
//!
//! This swaps all `HashMap`/`HashSet` implementations for ``ahash``.
//! If both "ahash" and "foldhash" are enabled, then "ahash" will win.
//!
//! This is done by the ``types::PMHash{*}`` type alias machinery.
//!
//! #### feature: ``foldhash``
//!
//! As ``ahash``, using ``foldhash``.
//!
//! #### feature: ``rayon``
//!
//! Batch encoding tokenizes inputs in parallel using the ``rayon`` crate.
//!
//! #### feature: ``tracing``
//!
//! This enables a number of ``tracing`` instrumentation points.
//!
//! ## Test Fixtures
//!
//! [`model::testing`] builds synthetic models, for this crate's tests and
//! for downstream users.
//!
//! ## Example
//!
//! ```rust,no_run
//! use piecemeal::{EncodeOptions, ReformerTokenizer};
//!
//! fn example() -> piecemeal::PMResult<()> {
//!     let tokenizer = ReformerTokenizer::from_model_file("spiece.model")?;
//!
//!     let tokens = tokenizer.tokenize("This is a test");
//!     let ids = tokenizer.convert_tokens_to_ids(&tokens);
//!     let text = tokenizer.decode(&ids, false, true)?;
//!     assert_eq!(text, "This is a test");
//!
//!     let options = EncodeOptions::default().with_return_tensors(true);
//!     let batch = tokenizer.batch_encode_plus(&["This is", "a test"], &options)?;
//!     let _input_ids = batch.tensor("input_ids")?;
//!     Ok(())
//! }
//! ```
#![warn(missing_docs, unused)]

#[cfg(feature = "download")]
#[doc(inline)]
pub use piecemeal_disk_cache as disk_cache;

pub mod encoders;
pub mod errors;
pub mod model;
pub mod normalize;
pub mod pretrained;
pub mod tokenizer;
pub mod types;
pub mod vocab;

#[doc(inline)]
pub use encoders::PieceProcessor;
#[doc(inline)]
pub use errors::{PMError, PMResult};
#[doc(inline)]
pub use tokenizer::{BatchEncoding, EncodeOptions, ReformerTokenizer, Tensor2};
#[doc(inline)]
pub use types::TokenId;
