//! # Word and Character Encoders

use core::ops::Range;

use crate::{
    encoders::{EncodedPiece, PieceEncoder, UserDefinedMatcher, assemble_pieces},
    types::{SPIECE_UNDERLINE, TokenId},
    vocab::PieceVocab,
};

/// Whole-word lookup.
///
/// Words are delimited by the boundary marker, which stays attached to the
/// start of the word (or its end, with suffix whitespace).
pub struct WordEncoder {
    vocab: PieceVocab,
    treat_whitespace_as_suffix: bool,
    split_digits: bool,
}

impl WordEncoder {
    /// Build an encoder over a vocabulary.
    pub fn new(
        vocab: PieceVocab,
        treat_whitespace_as_suffix: bool,
        split_digits: bool,
    ) -> Self {
        Self {
            vocab,
            treat_whitespace_as_suffix,
            split_digits,
        }
    }

    fn word_spans(
        &self,
        normalized: &str,
    ) -> Vec<Range<usize>> {
        let mut spans: Vec<Range<usize>> = Vec::new();
        let mut start = 0;
        let mut prev_digit = false;

        for (pos, c) in normalized.char_indices() {
            let end = pos + c.len_utf8();
            let is_digit = self.split_digits && c.is_ascii_digit();

            if c == SPIECE_UNDERLINE && self.treat_whitespace_as_suffix {
                spans.push(start..end);
                start = end;
                prev_digit = false;
                continue;
            }

            let boundary = (c == SPIECE_UNDERLINE) || is_digit || prev_digit;
            if boundary && pos > start {
                spans.push(start..pos);
                start = pos;
            }
            prev_digit = is_digit;
        }
        if start < normalized.len() {
            spans.push(start..normalized.len());
        }
        spans
    }
}

impl PieceEncoder for WordEncoder {
    fn vocab(&self) -> &PieceVocab {
        &self.vocab
    }

    fn encode_pieces(
        &self,
        normalized: &str,
    ) -> Vec<EncodedPiece> {
        let spans: Vec<(Range<usize>, Option<TokenId>)> = self
            .word_spans(normalized)
            .into_iter()
            .map(|range| {
                let id = self.vocab.lookup(&normalized[range.clone()]);
                (range, id)
            })
            .collect();
        assemble_pieces(&self.vocab, normalized, &spans, false)
    }
}

/// Per-character lookup; user-defined pieces stay whole.
pub struct CharEncoder {
    vocab: PieceVocab,
    user_defined: UserDefinedMatcher,
    byte_fallback: bool,
}

impl CharEncoder {
    /// Build an encoder over a vocabulary.
    pub fn new(
        vocab: PieceVocab,
        byte_fallback: bool,
    ) -> Self {
        let user_defined = UserDefinedMatcher::new(&vocab);
        Self {
            vocab,
            user_defined,
            byte_fallback,
        }
    }
}

impl PieceEncoder for CharEncoder {
    fn vocab(&self) -> &PieceVocab {
        &self.vocab
    }

    fn encode_pieces(
        &self,
        normalized: &str,
    ) -> Vec<EncodedPiece> {
        let spans: Vec<(Range<usize>, Option<TokenId>)> = self
            .user_defined
            .split_chars(normalized)
            .into_iter()
            .map(|(range, id)| {
                let id = id.or_else(|| self.vocab.lookup(&normalized[range.clone()]));
                (range, id)
            })
            .collect();
        assemble_pieces(&self.vocab, normalized, &spans, self.byte_fallback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ModelType, PieceType, testing::build_model};

    fn vocab(model_type: ModelType) -> PieceVocab {
        let pieces = [
            ("<unk>", 0.0, PieceType::Unknown),
            ("\u{2581}hello", -1.0, PieceType::Normal),
            ("\u{2581}world", -1.0, PieceType::Normal),
            ("hello\u{2581}", -1.0, PieceType::Normal),
            ("\u{2581}", -1.0, PieceType::Normal),
            ("1", -1.0, PieceType::Normal),
            ("2", -1.0, PieceType::Normal),
            ("h", -1.0, PieceType::Normal),
            ("i", -1.0, PieceType::Normal),
        ];
        PieceVocab::from_model(&build_model(model_type, &pieces)).unwrap()
    }

    fn pieces_of(encoded: &[EncodedPiece]) -> Vec<&str> {
        encoded.iter().map(|p| p.piece.as_str()).collect()
    }

    #[test]
    fn test_word() {
        let encoder = WordEncoder::new(vocab(ModelType::Word), false, false);
        let encoded = encoder.encode_pieces("\u{2581}hello\u{2581}world\u{2581}again");
        assert_eq!(
            pieces_of(&encoded),
            vec!["\u{2581}hello", "\u{2581}world", "\u{2581}again"]
        );
        assert_eq!(
            encoded.iter().map(|p| p.id).collect::<Vec<_>>(),
            vec![1, 2, 0]
        );
    }

    #[test]
    fn test_word_suffix_and_digits() {
        let encoder = WordEncoder::new(vocab(ModelType::Word), true, false);
        let encoded = encoder.encode_pieces("hello\u{2581}");
        assert_eq!(pieces_of(&encoded), vec!["hello\u{2581}"]);
        assert_eq!(encoded[0].id, 3);

        let encoder = WordEncoder::new(vocab(ModelType::Word), false, true);
        let encoded = encoder.encode_pieces("\u{2581}12");
        assert_eq!(pieces_of(&encoded), vec!["\u{2581}", "1", "2"]);
    }

    #[test]
    fn test_char() {
        let encoder = CharEncoder::new(vocab(ModelType::Char), false);
        let encoded = encoder.encode_pieces("\u{2581}hi!");
        assert_eq!(pieces_of(&encoded), vec!["\u{2581}", "h", "i", "!"]);
        assert_eq!(
            encoded.iter().map(|p| p.id).collect::<Vec<_>>(),
            vec![4, 7, 8, 0]
        );
    }
}
