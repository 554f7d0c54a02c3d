//! # Text Normalization
//!
//! * [`Normalizer`] - the model-defined normalization that runs before
//!   segmentation.
//! * [`TextPreprocessor`] - optional tokenizer-level cleanup that runs
//!   before the normalizer.

mod normalizer;
mod text_preprocessor;

#[doc(inline)]
pub use normalizer::*;
#[doc(inline)]
pub use text_preprocessor::*;
