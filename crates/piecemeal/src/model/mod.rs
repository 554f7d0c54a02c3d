//! # `SentencePiece` Model Files
//!
//! The vocabulary of a piece tokenizer lives in a `SentencePiece`
//! `ModelProto` protobuf (conventionally `spiece.model`): the ordered
//! pieces with their scores and types, the trainer settings that fixed
//! the reserved ids, and the normalizer settings.
//!
//! * [`ModelProto`] - the decoded file.
//! * [`load_model_path`] / [`ModelProto::from_bytes`] - decoding.
//! * [`testing`] - synthetic models for tests.

mod model_io;
mod model_proto;
pub mod testing;

#[doc(inline)]
pub use model_io::*;
#[doc(inline)]
pub use model_proto::*;
