//! # Model Testing Tools
//!
//! Synthetic models with known segmentations, so tests do not depend on
//! downloaded files.

use crate::model::{ModelProto, ModelType, NormalizerSpec, PieceType, SentencePiece, TrainerSpec};

/// The number of pieces in [`sample_model`].
pub const SAMPLE_VOCAB_SIZE: usize = 1000;

/// The scored pieces of [`sample_model`], at their ids.
pub const SAMPLE_PIECES: &[(usize, &str)] = &[
    (3, ","),
    (4, "."),
    (6, "s"),
    (7, "\u{2581}"),
    (8, "\u{2581}I"),
    (10, "\u{2581}a"),
    (12, "\u{2581}and"),
    (19, "\u{2581}in"),
    (21, "\u{2581}was"),
    (24, "n"),
    (46, "\u{2581}is"),
    (55, "or"),
    (66, "\u{2581}this"),
    (72, "\u{2581}f"),
    (80, "al"),
    (84, "\u{2581}b"),
    (170, "\u{2581}t"),
    (285, "\u{2581}This"),
    (347, "0"),
    (382, "est"),
    (602, "2"),
];

/// Build a model from explicit pieces.
///
/// The model uses the `nmt_nfkc` normalizer with default flags.
pub fn build_model(
    model_type: ModelType,
    pieces: &[(&str, f32, PieceType)],
) -> ModelProto {
    ModelProto {
        pieces: pieces
            .iter()
            .map(|&(piece, score, piece_type)| SentencePiece::new(piece, score, piece_type))
            .collect(),
        trainer_spec: Some(TrainerSpec {
            model_type: Some(model_type as i32),
            vocab_size: Some(pieces.len() as i32),
            ..Default::default()
        }),
        normalizer_spec: Some(NormalizerSpec::with_name("nmt_nfkc")),
        denormalizer_spec: None,
    }
}

/// A 1000-piece unigram model.
///
/// * `0` is `<unk>`, `1` is `<s>`, `2` is `</s>`;
/// * [`SAMPLE_PIECES`] are scored normal pieces;
/// * every other id holds an unused `<unusedN>` placeholder.
///
/// `"This is a test"` segments as `▁This ▁is ▁a ▁t est`.
pub fn sample_model() -> ModelProto {
    let mut slots: Vec<(String, f32, PieceType)> = (0..SAMPLE_VOCAB_SIZE)
        .map(|id| (format!("<unused{id}>"), 0.0, PieceType::Unused))
        .collect();

    slots[0] = ("<unk>".to_string(), 0.0, PieceType::Unknown);
    slots[1] = ("<s>".to_string(), 0.0, PieceType::Control);
    slots[2] = ("</s>".to_string(), 0.0, PieceType::Control);
    for &(id, piece) in SAMPLE_PIECES {
        slots[id] = (piece.to_string(), -1.0 - id as f32 / 100.0, PieceType::Normal);
    }

    let pieces: Vec<(&str, f32, PieceType)> = slots
        .iter()
        .map(|(piece, score, piece_type)| (piece.as_str(), *score, *piece_type))
        .collect();

    build_model(ModelType::Unigram, &pieces)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_model() {
        let model = sample_model();
        model.validate().unwrap();
        assert_eq!(model.pieces.len(), SAMPLE_VOCAB_SIZE);
        assert_eq!(model.pieces[285].piece(), "\u{2581}This");
        assert_eq!(model.pieces[0].r#type(), PieceType::Unknown);
        assert_eq!(model.pieces[999].r#type(), PieceType::Unused);
    }
}
