//! # Error Types

/// Errors from piecemeal operations.
///
/// Out-of-vocabulary text is not an error: it maps to the unknown piece.
#[derive(Debug, thiserror::Error)]
pub enum PMError {
    /// I/O error.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// The model file is not a valid `SentencePiece` model protobuf.
    #[error("model decode error: {0}")]
    ModelDecode(#[from] prost::DecodeError),

    /// The model decoded, but its contents are inconsistent.
    #[error("invalid model: {0}")]
    InvalidModel(String),

    /// A token id is outside the vocabulary (including added tokens).
    #[error("token id {id} out of range (vocabulary size {size})")]
    TokenIdOutOfRange {
        /// The offending id.
        id: u32,

        /// The number of known ids.
        size: usize,
    },

    /// Saved tokenizer files are inconsistent with each other.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// Configuration file (de)serialization failed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Encoding options are contradictory or incomplete.
    #[error("invalid options: {0}")]
    InvalidOptions(String),

    /// A batch could not be converted to a rectangular tensor.
    #[error("ragged batch for \"{name}\": row lengths {lengths:?}; enable padding")]
    RaggedBatch {
        /// The field being converted.
        name: String,

        /// The per-row lengths.
        lengths: Vec<usize>,
    },

    /// The named field is not present in the encoding.
    #[error("no field \"{0}\" in encoding")]
    MissingField(String),

    /// A named pretrained resource is unknown.
    #[error("resource not found: {0}")]
    ResourceNotFound(String),

    /// Error from an external component.
    #[error("{0}")]
    External(String),
}

/// Result type for piecemeal operations.
pub type PMResult<T> = core::result::Result<T, PMError>;
