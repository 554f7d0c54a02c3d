//! # BPE Encoder

use core::ops::Range;

use crate::{
    encoders::{EncodedPiece, PieceEncoder, UserDefinedMatcher, assemble_pieces},
    types::TokenId,
    vocab::PieceVocab,
};

/// Score-ordered byte-pair merging over characters.
///
/// Starting from single characters (user-defined pieces kept whole), the
/// adjacent pair whose concatenation is the highest-scoring vocabulary
/// piece merges first; ties go to the leftmost pair.
pub struct BpeEncoder {
    vocab: PieceVocab,
    user_defined: UserDefinedMatcher,
    byte_fallback: bool,
}

impl BpeEncoder {
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

    fn mergeable(
        &self,
        piece: &str,
    ) -> Option<(TokenId, f32)> {
        let id = self.vocab.lookup(piece)?;
        if self.vocab.is_unused(id) || self.vocab.is_control(id) || self.vocab.is_unknown(id) {
            return None;
        }
        Some((id, self.vocab.score(id)))
    }

    fn resolve(
        &self,
        normalized: &str,
        range: &Range<usize>,
    ) -> Option<TokenId> {
        self.mergeable(&normalized[range.clone()])
            .map(|(id, _)| id)
    }
}

impl PieceEncoder for BpeEncoder {
    fn vocab(&self) -> &PieceVocab {
        &self.vocab
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self, normalized)))]
    fn encode_pieces(
        &self,
        normalized: &str,
    ) -> Vec<EncodedPiece> {
        let mut symbols = self.user_defined.split_chars(normalized);

        loop {
            let mut best: Option<(usize, TokenId, f32)> = None;
            for i in 0..symbols.len().saturating_sub(1) {
                // User-defined pieces never merge with neighbors.
                if symbols[i].1.is_some() || symbols[i + 1].1.is_some() {
                    continue;
                }
                let pair = symbols[i].0.start..symbols[i + 1].0.end;
                if let Some((id, score)) = self.mergeable(&normalized[pair])
                    && best.is_none_or(|(_, _, s)| score > s)
                {
                    best = Some((i, id, score));
                }
            }

            let Some((i, _, _)) = best else {
                break;
            };
            let right = symbols.remove(i + 1);
            symbols[i].0.end = right.0.end;
        }

        let spans: Vec<(Range<usize>, Option<TokenId>)> = symbols
            .into_iter()
            .map(|(range, id)| {
                let id = id.or_else(|| self.resolve(normalized, &range));
                (range, id)
            })
            .collect();

        assemble_pieces(&self.vocab, normalized, &spans, self.byte_fallback)
    }
}
