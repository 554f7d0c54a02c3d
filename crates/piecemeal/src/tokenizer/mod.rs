//! # Reformer Tokenizer
//!
//! [`ReformerTokenizer`] wraps a [`PieceProcessor`](crate::encoders::PieceProcessor)
//! with added/special token handling, id conversion, batch encoding with
//! truncation and padding, and directory persistence.
//!
//! ```rust,no_run
//! use piecemeal::tokenizer::{EncodeOptions, ReformerTokenizer};
//!
//! fn example() -> piecemeal::errors::PMResult<()> {
//!     let tokenizer = ReformerTokenizer::from_model_file("spiece.model")?;
//!     let tokens = tokenizer.tokenize("This is a test");
//!     let ids = tokenizer.convert_tokens_to_ids(&tokens);
//!
//!     let options = EncodeOptions::default().with_return_tensors(true);
//!     let batch = tokenizer.batch_encode_plus(&["This is", "a test"], &options)?;
//!     let input_ids = batch.tensor("input_ids")?;
//!     assert_eq!(input_ids.shape()[0], 2);
//!     # let _ = ids;
//!     Ok(())
//! }
//! ```

mod batch_encoding;
mod encode_options;
mod persistence;
mod token_splitter;
mod tokenizer_impl;
mod tokenizer_options;
mod truncation;

#[doc(inline)]
pub use batch_encoding::*;
#[doc(inline)]
pub use encode_options::*;
#[doc(inline)]
pub use persistence::*;
#[doc(inline)]
pub use token_splitter::*;
#[doc(inline)]
pub use tokenizer_impl::*;
#[doc(inline)]
pub use tokenizer_options::*;
#[doc(inline)]
pub use truncation::*;
