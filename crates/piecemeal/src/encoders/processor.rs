//! # Piece Processor

use std::path::Path;

use rand::Rng;

use crate::{
    encoders::{BpeEncoder, CharEncoder, EncodedPiece, PieceEncoder, UnigramEncoder, WordEncoder},
    errors::{PMError, PMResult},
    model::{ModelProto, ModelType, load_model_path},
    normalize::Normalizer,
    types::{SPIECE_UNDERLINE, SPIECE_UNDERLINE_STR, TokenId},
    vocab::PieceVocab,
};

enum EncoderKind {
    Unigram(UnigramEncoder),
    Bpe(BpeEncoder),
    Word(WordEncoder),
    Char(CharEncoder),
}

impl EncoderKind {
    fn build(
        model: &ModelProto,
        vocab: PieceVocab,
    ) -> Self {
        let trainer = model.trainer();
        let byte_fallback = trainer.byte_fallback();
        match model.model_type() {
            ModelType::Unigram => Self::Unigram(UnigramEncoder::new(vocab, byte_fallback)),
            ModelType::Bpe => Self::Bpe(BpeEncoder::new(vocab, byte_fallback)),
            ModelType::Word => Self::Word(WordEncoder::new(
                vocab,
                trainer.treat_whitespace_as_suffix(),
                trainer.split_digits(),
            )),
            ModelType::Char => Self::Char(CharEncoder::new(vocab, byte_fallback)),
        }
    }

    fn as_encoder(&self) -> &dyn PieceEncoder {
        match self {
            Self::Unigram(e) => e,
            Self::Bpe(e) => e,
            Self::Word(e) => e,
            Self::Char(e) => e,
        }
    }
}

/// A loaded `SentencePiece` model: normalizer, vocabulary and encoder.
///
/// Keeps the model file bytes so the model can be written back verbatim.
pub struct PieceProcessor {
    model: ModelProto,
    model_bytes: Vec<u8>,
    normalizer: Normalizer,
    encoder: EncoderKind,
}

impl PieceProcessor {
    /// Load a model file.
    pub fn load_path<P: AsRef<Path>>(path: P) -> PMResult<Self> {
        let (model, bytes) = load_model_path(path)?;
        Self::init(model, bytes)
    }

    /// Load a model from protobuf bytes.
    pub fn from_bytes(bytes: Vec<u8>) -> PMResult<Self> {
        let model = ModelProto::from_bytes(&bytes)?;
        Self::init(model, bytes)
    }

    /// Build from a decoded model.
    pub fn from_model(model: ModelProto) -> PMResult<Self> {
        let bytes = model.to_bytes();
        Self::init(model, bytes)
    }

    fn init(
        model: ModelProto,
        model_bytes: Vec<u8>,
    ) -> PMResult<Self> {
        let vocab = PieceVocab::from_model(&model)?;
        let normalizer = Normalizer::from_spec(&model.normalizer(), &model.trainer());
        let encoder = EncoderKind::build(&model, vocab);
        Ok(Self {
            model,
            model_bytes,
            normalizer,
            encoder,
        })
    }

    /// The decoded model.
    pub fn model(&self) -> &ModelProto {
        &self.model
    }

    /// The model file bytes.
    pub fn model_bytes(&self) -> &[u8] {
        &self.model_bytes
    }

    /// The segmentation algorithm.
    pub fn model_type(&self) -> ModelType {
        self.model.model_type()
    }

    /// The normalizer.
    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    /// The vocabulary.
    pub fn vocab(&self) -> &PieceVocab {
        self.encoder.as_encoder().vocab()
    }

    /// The number of pieces.
    pub fn len(&self) -> usize {
        self.vocab().len()
    }

    /// Is the vocabulary empty?
    pub fn is_empty(&self) -> bool {
        self.vocab().is_empty()
    }

    /// Map a piece to its id; absent pieces map to the unknown id.
    pub fn piece_to_id(
        &self,
        piece: &str,
    ) -> TokenId {
        self.vocab().piece_to_id(piece)
    }

    /// Map an id to its piece, if in range.
    pub fn id_to_piece(
        &self,
        id: TokenId,
    ) -> Option<&str> {
        self.vocab().id_to_piece(id)
    }

    /// Normalize raw text.
    pub fn normalize(
        &self,
        text: &str,
    ) -> String {
        self.normalizer.normalize(text)
    }

    /// Normalize and segment text.
    pub fn encode(
        &self,
        text: &str,
    ) -> Vec<EncodedPiece> {
        let normalized = self.normalize(text);
        self.encoder.as_encoder().encode_pieces(&normalized)
    }

    /// Segment text into piece strings.
    pub fn encode_as_pieces(
        &self,
        text: &str,
    ) -> Vec<String> {
        self.encode(text).into_iter().map(|p| p.piece).collect()
    }

    /// Segment text into ids.
    pub fn encode_as_ids(
        &self,
        text: &str,
    ) -> Vec<TokenId> {
        self.encode(text).into_iter().map(|p| p.id).collect()
    }

    /// Sample a segmentation with a caller-provided random source.
    ///
    /// Only unigram models sample; other model types return the
    /// deterministic segmentation.
    pub fn sample_encode_with_rng<R: Rng + ?Sized>(
        &self,
        text: &str,
        alpha: f32,
        rng: &mut R,
    ) -> Vec<EncodedPiece> {
        let normalized = self.normalize(text);
        match &self.encoder {
            EncoderKind::Unigram(e) => e.sample_pieces(&normalized, alpha, rng),
            other => other.as_encoder().encode_pieces(&normalized),
        }
    }

    /// Sample a segmentation into piece strings (subword regularization).
    pub fn sample_encode_as_pieces(
        &self,
        text: &str,
        alpha: f32,
    ) -> Vec<String> {
        self.sample_encode_with_rng(text, alpha, &mut rand::rng())
            .into_iter()
            .map(|p| p.piece)
            .collect()
    }

    /// Reassemble text from pieces.
    ///
    /// * control pieces render as nothing;
    /// * the unknown piece renders as the model's unknown surface;
    /// * other out-of-vocabulary pieces render as themselves;
    /// * runs of byte pieces decode as UTF-8 (lossy);
    /// * `▁` renders as space, minus the dummy prefix space.
    pub fn decode_pieces<S: AsRef<str>>(
        &self,
        pieces: &[S],
    ) -> String {
        let vocab = self.vocab();
        let suffix = self.normalizer.treat_whitespace_as_suffix;
        let mut at_start = self.normalizer.add_dummy_prefix && !suffix;

        let mut out = String::new();
        let mut bytes: Vec<u8> = Vec::new();

        for piece in pieces {
            let piece = piece.as_ref();
            let id = vocab.piece_to_id(piece);

            if let Some(b) = vocab.byte_value(id) {
                bytes.push(b);
                continue;
            }
            if !bytes.is_empty() {
                out.push_str(&String::from_utf8_lossy(&bytes));
                bytes.clear();
                at_start = false;
            }
            if vocab.is_control(id) {
                continue;
            }

            let text = if vocab.is_unknown(id) && piece == vocab.unk_piece() {
                self.model.unk_surface()
            } else if at_start {
                piece.strip_prefix(SPIECE_UNDERLINE).unwrap_or(piece)
            } else {
                piece
            };
            out.push_str(text);
            at_start = false;
        }
        if !bytes.is_empty() {
            out.push_str(&String::from_utf8_lossy(&bytes));
        }

        if suffix && self.normalizer.add_dummy_prefix && out.ends_with(SPIECE_UNDERLINE) {
            out.truncate(out.len() - SPIECE_UNDERLINE_STR.len());
        }
        out.replace(SPIECE_UNDERLINE, " ")
    }

    /// Reassemble text from ids.
    ///
    /// ## Errors
    /// [`PMError::TokenIdOutOfRange`] for ids outside the vocabulary.
    pub fn decode_ids(
        &self,
        ids: &[TokenId],
    ) -> PMResult<String> {
        let pieces = ids
            .iter()
            .map(|&id| {
                self.id_to_piece(id).ok_or(PMError::TokenIdOutOfRange {
                    id,
                    size: self.len(),
                })
            })
            .collect::<PMResult<Vec<&str>>>()?;
        Ok(self.decode_pieces(&pieces))
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;
    use crate::{
        model::{
            DEFAULT_UNK_SURFACE,
            PieceType,
            testing::{build_model, sample_model},
        },
        types::{check_is_send, check_is_sync},
        vocab::byte_piece,
    };

    fn sample_processor() -> PieceProcessor {
        PieceProcessor::from_model(sample_model()).unwrap()
    }

    #[test]
    fn test_encode() {
        let sp = sample_processor();
        check_is_send(&sp);
        check_is_sync(&sp);

        assert_eq!(sp.model_type(), ModelType::Unigram);
        assert_eq!(sp.len(), 1000);
        assert_eq!(
            sp.encode_as_pieces("This is a test"),
            vec!["\u{2581}This", "\u{2581}is", "\u{2581}a", "\u{2581}t", "est"]
        );
        assert_eq!(sp.encode_as_ids("This is a test"), vec![285, 46, 10, 170, 382]);
        assert!(sp.encode_as_ids("   ").is_empty());
    }

    #[test]
    fn test_model_bytes_are_kept() {
        let bytes = sample_model().to_bytes();
        let sp = PieceProcessor::from_bytes(bytes.clone()).unwrap();
        assert_eq!(sp.model_bytes(), bytes.as_slice());
        assert_eq!(sp.model(), &sample_model());
    }

    #[test]
    fn test_decode() {
        let sp = sample_processor();

        let ids = sp.encode_as_ids("This is a test");
        assert_eq!(sp.decode_ids(&ids).unwrap(), "This is a test");

        let pieces = sp.encode_as_pieces("I was born in 92000, and this is falsé.");
        assert_eq!(
            sp.decode_pieces(&pieces),
            "I was born in 92000, and this is falsé."
        );

        // The unknown id renders as the unknown surface.
        let ids = sp.encode_as_ids("in 9");
        assert_eq!(ids, vec![19, 7, 0]);
        assert_eq!(
            sp.decode_ids(&ids).unwrap(),
            format!("in {DEFAULT_UNK_SURFACE}")
        );

        // Control pieces vanish.
        assert_eq!(sp.decode_ids(&[285, 2]).unwrap(), "This");

        assert!(matches!(
            sp.decode_ids(&[1000]),
            Err(PMError::TokenIdOutOfRange { id: 1000, size: 1000 })
        ));
    }

    #[test]
    fn test_byte_fallback_round_trip() {
        let names: Vec<String> = (0..=255u8).map(byte_piece).collect();
        let mut pieces = vec![
            ("<unk>", 0.0, PieceType::Unknown),
            ("\u{2581}a", -1.0, PieceType::Normal),
        ];
        pieces.extend(names.iter().map(|n| (n.as_str(), 0.0, PieceType::Byte)));

        let mut model = build_model(ModelType::Unigram, &pieces);
        if let Some(trainer) = model.trainer_spec.as_mut() {
            trainer.byte_fallback = Some(true);
        }
        let sp = PieceProcessor::from_model(model).unwrap();

        let encoded = sp.encode_as_pieces("a é");
        assert_eq!(encoded, vec!["\u{2581}a", "<0xE2>", "<0x96>", "<0x81>", "<0xC3>", "<0xA9>"]);
        assert_eq!(sp.decode_pieces(&encoded), "a é");
    }

    #[test]
    fn test_sampling() {
        let sp = sample_processor();
        let mut rng = StdRng::seed_from_u64(7);
        let sampled = sp.sample_encode_with_rng("This is a test", 0.1, &mut rng);
        let joined: String = sampled.iter().map(|p| p.piece.as_str()).collect();
        assert_eq!(joined, sp.normalize("This is a test"));

        assert!(!sp.sample_encode_as_pieces("This is a test", 0.1).is_empty());
    }
}
