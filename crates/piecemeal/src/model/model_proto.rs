//! # Model Protobuf Messages
//!
//! Field tags follow `sentencepiece_model.proto`; fields this crate never
//! reads are left out and skipped by the decoder.

/// The default rendering of unknown pieces in decoded text (" ⁇ ").
pub const DEFAULT_UNK_SURFACE: &str = " \u{2047} ";

/// The type of a vocabulary piece.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, prost::Enumeration)]
#[repr(i32)]
pub enum PieceType {
    /// An ordinary segmentation piece.
    Normal = 1,

    /// The reserved unknown piece.
    Unknown = 2,

    /// A control symbol (`<s>`, `</s>`); never produced by segmentation.
    Control = 3,

    /// A user-defined symbol, always segmented whole.
    UserDefined = 4,

    /// A reserved piece that segmentation ignores.
    Unused = 5,

    /// A byte-fallback piece (`<0x41>`).
    Byte = 6,
}

/// The segmentation algorithm a model was trained for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, prost::Enumeration)]
#[repr(i32)]
pub enum ModelType {
    /// Unigram language model; Viterbi segmentation.
    Unigram = 1,

    /// Byte-pair-encoding; score-ordered merges.
    Bpe = 2,

    /// Whitespace-delimited words.
    Word = 3,

    /// Single characters.
    Char = 4,
}

/// One vocabulary entry.
#[derive(Clone, PartialEq, prost::Message)]
pub struct SentencePiece {
    /// The piece text; spaces appear as `▁`.
    #[prost(string, optional, tag = "1")]
    pub piece: Option<String>,

    /// The piece score (a log probability for unigram models).
    #[prost(float, optional, tag = "2")]
    pub score: Option<f32>,

    /// The [`PieceType`].
    #[prost(enumeration = "PieceType", optional, tag = "3", default = "Normal")]
    pub r#type: Option<i32>,
}

/// The subset of trainer settings that affects segmentation.
#[derive(Clone, PartialEq, prost::Message)]
pub struct TrainerSpec {
    /// The [`ModelType`].
    #[prost(enumeration = "ModelType", optional, tag = "3", default = "Unigram")]
    pub model_type: Option<i32>,

    /// The requested vocabulary size.
    #[prost(int32, optional, tag = "4", default = "8000")]
    pub vocab_size: Option<i32>,

    /// Mark word boundaries at the end of pieces instead of the start.
    #[prost(bool, optional, tag = "24", default = "false")]
    pub treat_whitespace_as_suffix: Option<bool>,

    /// Split every digit into its own piece.
    #[prost(bool, optional, tag = "25", default = "false")]
    pub split_digits: Option<bool>,

    /// Control symbols registered at training time.
    #[prost(string, repeated, tag = "30")]
    pub control_symbols: Vec<String>,

    /// User-defined symbols registered at training time.
    #[prost(string, repeated, tag = "31")]
    pub user_defined_symbols: Vec<String>,

    /// Decompose unknown characters into `<0xXX>` byte pieces.
    #[prost(bool, optional, tag = "35", default = "false")]
    pub byte_fallback: Option<bool>,

    /// The unknown id.
    #[prost(int32, optional, tag = "40", default = "0")]
    pub unk_id: Option<i32>,

    /// The beginning-of-sentence id; `-1` when disabled.
    #[prost(int32, optional, tag = "41", default = "1")]
    pub bos_id: Option<i32>,

    /// The end-of-sentence id; `-1` when disabled.
    #[prost(int32, optional, tag = "42", default = "2")]
    pub eos_id: Option<i32>,

    /// The padding id; `-1` when disabled.
    #[prost(int32, optional, tag = "43", default = "-1")]
    pub pad_id: Option<i32>,

    /// Rendering of unknown pieces in decoded text.
    ///
    /// See [`DEFAULT_UNK_SURFACE`].
    #[prost(string, optional, tag = "44")]
    pub unk_surface: Option<String>,

    /// The unknown piece text.
    #[prost(string, optional, tag = "45", default = "<unk>")]
    pub unk_piece: Option<String>,

    /// The beginning-of-sentence piece text.
    #[prost(string, optional, tag = "46", default = "<s>")]
    pub bos_piece: Option<String>,

    /// The end-of-sentence piece text.
    #[prost(string, optional, tag = "47", default = "</s>")]
    pub eos_piece: Option<String>,

    /// The padding piece text.
    #[prost(string, optional, tag = "48", default = "<pad>")]
    pub pad_piece: Option<String>,
}

/// Normalization settings.
#[derive(Clone, PartialEq, prost::Message)]
pub struct NormalizerSpec {
    /// The rule name (`nmt_nfkc`, `nfkc`, `nmt_nfkc_cf`, `nfkc_cf`, `identity`).
    #[prost(string, optional, tag = "1")]
    pub name: Option<String>,

    /// The compiled rule table.
    ///
    /// Carried through re-encoding; rules are applied by name instead.
    #[prost(bytes = "vec", optional, tag = "2")]
    pub precompiled_charsmap: Option<Vec<u8>>,

    /// Prepend a space so the first word carries a boundary marker.
    #[prost(bool, optional, tag = "3", default = "true")]
    pub add_dummy_prefix: Option<bool>,

    /// Trim and collapse whitespace runs.
    #[prost(bool, optional, tag = "4", default = "true")]
    pub remove_extra_whitespaces: Option<bool>,

    /// Replace spaces with `▁`.
    #[prost(bool, optional, tag = "5", default = "true")]
    pub escape_whitespaces: Option<bool>,
}

/// A `SentencePiece` model file.
#[derive(Clone, PartialEq, prost::Message)]
pub struct ModelProto {
    /// The vocabulary; a piece's id is its position.
    #[prost(message, repeated, tag = "1")]
    pub pieces: Vec<SentencePiece>,

    /// Trainer settings.
    #[prost(message, optional, tag = "2")]
    pub trainer_spec: Option<TrainerSpec>,

    /// Normalizer settings.
    #[prost(message, optional, tag = "3")]
    pub normalizer_spec: Option<NormalizerSpec>,

    /// Settings for decode-side text restoration.
    #[prost(message, optional, tag = "5")]
    pub denormalizer_spec: Option<NormalizerSpec>,
}

impl SentencePiece {
    /// Build a piece entry.
    pub fn new<S: Into<String>>(
        piece: S,
        score: f32,
        piece_type: PieceType,
    ) -> Self {
        Self {
            piece: Some(piece.into()),
            score: Some(score),
            r#type: Some(piece_type as i32),
        }
    }
}

impl NormalizerSpec {
    /// A spec with the given rule name and `SentencePiece`'s default flags.
    pub fn with_name<S: Into<String>>(name: S) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }
}
