//! # Unigram Encoder
//!
//! Segmentation over the lattice of all vocabulary pieces that match the
//! normalized text. [`UnigramEncoder::encode_pieces`] takes the Viterbi
//! best path; [`UnigramEncoder::sample_pieces`] samples a path in
//! proportion to its smoothed probability (subword regularization).

use core::ops::Range;

use rand::Rng;

use crate::{
    encoders::{EncodedPiece, PieceEncoder, assemble_pieces},
    types::TokenId,
    vocab::PieceVocab,
};

/// Score penalty of unknown nodes, below the worst normal piece.
const UNK_PENALTY: f32 = 10.0;

#[derive(Debug, Clone)]
struct Node {
    start: usize,
    end: usize,

    /// `None` for unknown nodes.
    id: Option<TokenId>,
    score: f32,
}

/// All candidate pieces over a normalized string.
///
/// Positions are byte offsets; only character boundaries carry nodes.
struct Lattice {
    nodes: Vec<Node>,

    /// Node indices by end offset.
    ends_at: Vec<Vec<usize>>,
    len: usize,
}

impl Lattice {
    fn nodes_ending_at(
        &self,
        pos: usize,
    ) -> impl Iterator<Item = &Node> {
        self.ends_at[pos].iter().map(|&i| &self.nodes[i])
    }

    fn into_spans(path: Vec<&Node>) -> Vec<(Range<usize>, Option<TokenId>)> {
        path.into_iter()
            .map(|node| (node.start..node.end, node.id))
            .collect()
    }

    /// The highest-scoring path.
    fn viterbi(&self) -> Vec<&Node> {
        let mut best: Vec<Option<(f32, usize)>> = vec![None; self.len + 1];
        best[0] = Some((0.0, usize::MAX));

        for pos in 1..=self.len {
            for &idx in &self.ends_at[pos] {
                let node = &self.nodes[idx];
                let Some((prev, _)) = best[node.start] else {
                    continue;
                };
                let score = prev + node.score;
                if best[pos].is_none_or(|(s, _)| score > s) {
                    best[pos] = Some((score, idx));
                }
            }
        }

        self.backtrack(|pos| best[pos].map(|(_, idx)| idx))
    }

    /// Sample a path with probability proportional to `exp(theta * score)`.
    ///
    /// Forward-filtering computes the log partition at each position;
    /// backward-sampling then draws one incoming node per step.
    fn sample<R: Rng + ?Sized>(
        &self,
        theta: f32,
        rng: &mut R,
    ) -> Vec<&Node> {
        let mut alpha: Vec<Option<f64>> = vec![None; self.len + 1];
        alpha[0] = Some(0.0);

        for pos in 1..=self.len {
            let terms: Vec<f64> = self
                .nodes_ending_at(pos)
                .filter_map(|node| alpha[node.start].map(|a| a + (theta * node.score) as f64))
                .collect();
            alpha[pos] = log_sum_exp(&terms);
        }

        self.backtrack(|pos| {
            let total = alpha[pos]?;
            let candidates: Vec<(usize, f64)> = self.ends_at[pos]
                .iter()
                .filter_map(|&idx| {
                    let node = &self.nodes[idx];
                    alpha[node.start]
                        .map(|a| (idx, (a + (theta * node.score) as f64 - total).exp()))
                })
                .collect();

            let mut draw: f64 = rng.random::<f64>();
            for &(idx, p) in &candidates {
                if draw < p {
                    return Some(idx);
                }
                draw -= p;
            }
            candidates.last().map(|&(idx, _)| idx)
        })
    }

    /// Walk back from the end, choosing a node at each position.
    fn backtrack<F>(
        &self,
        mut choose: F,
    ) -> Vec<&Node>
    where
        F: FnMut(usize) -> Option<usize>,
    {
        let mut path = Vec::new();
        let mut pos = self.len;
        while pos > 0 {
            let Some(idx) = choose(pos) else {
                break;
            };
            let node = &self.nodes[idx];
            path.push(node);
            pos = node.start;
        }
        path.reverse();
        path
    }
}

fn log_sum_exp(terms: &[f64]) -> Option<f64> {
    let max = terms.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if !max.is_finite() {
        return None;
    }
    Some(max + terms.iter().map(|t| (t - max).exp()).sum::<f64>().ln())
}

/// Unigram language model encoder.
pub struct UnigramEncoder {
    vocab: PieceVocab,
    byte_fallback: bool,
    max_piece_chars: usize,
    unk_score: f32,
}

impl UnigramEncoder {
    /// Build an encoder over a vocabulary.
    ///
    /// ## Arguments
    /// * `vocab` - the model vocabulary.
    /// * `byte_fallback` - expand unknown text into `<0xXX>` byte pieces.
    pub fn new(
        vocab: PieceVocab,
        byte_fallback: bool,
    ) -> Self {
        let max_piece_chars = vocab
            .iter()
            .filter(|(id, _)| Self::is_segmentable(&vocab, *id))
            .map(|(_, entry)| entry.piece.chars().count())
            .max()
            .unwrap_or(1);
        let unk_score = vocab.min_score() - UNK_PENALTY;

        Self {
            vocab,
            byte_fallback,
            max_piece_chars,
            unk_score,
        }
    }

    fn is_segmentable(
        vocab: &PieceVocab,
        id: TokenId,
    ) -> bool {
        !(vocab.is_unknown(id)
            || vocab.is_control(id)
            || vocab.is_unused(id)
            || vocab.is_byte(id))
    }

    fn piece_score(
        &self,
        id: TokenId,
        len: usize,
    ) -> f32 {
        if self.vocab.is_user_defined(id) {
            // The max score floors at zero, so user pieces always win.
            len as f32 * self.vocab.max_score().max(0.0) - 0.1
        } else {
            self.vocab.score(id)
        }
    }

    fn build_lattice(
        &self,
        normalized: &str,
    ) -> Lattice {
        let len = normalized.len();
        let mut nodes = Vec::new();
        let mut ends_at: Vec<Vec<usize>> = vec![Vec::new(); len + 1];

        for (start, first) in normalized.char_indices() {
            let mut has_single = false;

            let ends = normalized[start..]
                .char_indices()
                .skip(1)
                .map(|(offset, _)| start + offset)
                .chain(std::iter::once(len))
                .take(self.max_piece_chars);

            for end in ends {
                let Some(id) = self.vocab.lookup(&normalized[start..end]) else {
                    continue;
                };
                if !Self::is_segmentable(&self.vocab, id) {
                    continue;
                }
                if end - start == first.len_utf8() {
                    has_single = true;
                }
                ends_at[end].push(nodes.len());
                nodes.push(Node {
                    start,
                    end,
                    id: Some(id),
                    score: self.piece_score(id, end - start),
                });
            }

            if !has_single {
                let end = start + first.len_utf8();
                ends_at[end].push(nodes.len());
                nodes.push(Node {
                    start,
                    end,
                    id: None,
                    score: self.unk_score,
                });
            }
        }

        Lattice {
            nodes,
            ends_at,
            len,
        }
    }

    /// Sample a segmentation.
    ///
    /// ## Arguments
    /// * `normalized` - normalized text.
    /// * `alpha` - smoothing; `0.0` samples uniformly over paths, larger
    ///   values concentrate on the best path.
    /// * `rng` - the random source.
    pub fn sample_pieces<R: Rng + ?Sized>(
        &self,
        normalized: &str,
        alpha: f32,
        rng: &mut R,
    ) -> Vec<EncodedPiece> {
        let lattice = self.build_lattice(normalized);
        let spans = Lattice::into_spans(lattice.sample(alpha, rng));
        assemble_pieces(&self.vocab, normalized, &spans, self.byte_fallback)
    }
}

impl PieceEncoder for UnigramEncoder {
    fn vocab(&self) -> &PieceVocab {
        &self.vocab
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self, normalized)))]
    fn encode_pieces(
        &self,
        normalized: &str,
    ) -> Vec<EncodedPiece> {
        let lattice = self.build_lattice(normalized);
        let spans = Lattice::into_spans(lattice.viterbi());
        assemble_pieces(&self.vocab, normalized, &spans, self.byte_fallback)
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;
    use crate::{
        model::{ModelType, PieceType, testing::{build_model, sample_model}},
        normalize::Normalizer,
        types::check_is_send,
    };

    fn sample_encoder() -> UnigramEncoder {
        UnigramEncoder::new(PieceVocab::from_model(&sample_model()).unwrap(), false)
    }

    fn pieces_of(encoded: &[EncodedPiece]) -> Vec<&str> {
        encoded.iter().map(|p| p.piece.as_str()).collect()
    }

    #[test]
    fn test_sample_sentence() {
        let encoder = sample_encoder();
        check_is_send(&encoder);

        let normalized = Normalizer::default().normalize("This is a test");
        let encoded = encoder.encode_pieces(&normalized);
        assert_eq!(
            pieces_of(&encoded),
            vec!["\u{2581}This", "\u{2581}is", "\u{2581}a", "\u{2581}t", "est"]
        );
        assert_eq!(
            encoded.iter().map(|p| p.id).collect::<Vec<_>>(),
            vec![285, 46, 10, 170, 382]
        );
    }

    #[test]
    fn test_unknown_characters() {
        let encoder = sample_encoder();
        let normalized = Normalizer::default().normalize("I was born in 92000, and this is falsé.");
        let encoded = encoder.encode_pieces(&normalized);
        assert_eq!(
            pieces_of(&encoded),
            vec![
                "\u{2581}I", "\u{2581}was", "\u{2581}b", "or", "n", "\u{2581}in", "\u{2581}", "9",
                "2", "0", "0", "0", ",", "\u{2581}and", "\u{2581}this", "\u{2581}is",
                "\u{2581}f", "al", "s", "é", ".",
            ]
        );
        assert_eq!(
            encoded.iter().map(|p| p.id).collect::<Vec<_>>(),
            vec![8, 21, 84, 55, 24, 19, 7, 0, 602, 347, 347, 347, 3, 12, 66, 46, 72, 80, 6, 0, 4]
        );
    }

    #[test]
    fn test_empty() {
        assert!(sample_encoder().encode_pieces("").is_empty());
    }

    #[test]
    fn test_consecutive_unknowns_merge() {
        let encoder = sample_encoder();
        let encoded = encoder.encode_pieces("\u{2581}xyz");
        assert_eq!(
            encoded,
            vec![
                EncodedPiece::new("\u{2581}", 7),
                EncodedPiece::new("xyz", 0),
            ]
        );
    }

    #[test]
    fn test_best_path_prefers_score() {
        let pieces = [
            ("<unk>", 0.0, PieceType::Unknown),
            ("a", -1.0, PieceType::Normal),
            ("b", -1.0, PieceType::Normal),
            ("ab", -3.0, PieceType::Normal),
            ("abc", -2.5, PieceType::Normal),
            ("c", -1.0, PieceType::Normal),
        ];
        let vocab = PieceVocab::from_model(&build_model(ModelType::Unigram, &pieces)).unwrap();
        let encoder = UnigramEncoder::new(vocab, false);

        // a + b (-2) beats ab (-3); abc (-2.5) beats a + b + c (-3).
        assert_eq!(pieces_of(&encoder.encode_pieces("ab")), vec!["a", "b"]);
        assert_eq!(pieces_of(&encoder.encode_pieces("abc")), vec!["abc"]);
    }

    #[test]
    fn test_user_defined_whole() {
        let pieces = [
            ("<unk>", 0.0, PieceType::Unknown),
            ("<", -1.0, PieceType::Normal),
            (">", -1.0, PieceType::Normal),
            ("x", -1.0, PieceType::Normal),
            ("<x>", 0.0, PieceType::UserDefined),
        ];
        let vocab = PieceVocab::from_model(&build_model(ModelType::Unigram, &pieces)).unwrap();
        let encoder = UnigramEncoder::new(vocab, false);
        assert_eq!(pieces_of(&encoder.encode_pieces("x<x>x")), vec!["x", "<x>", "x"]);
    }

    #[test]
    fn test_sampling() {
        let encoder = sample_encoder();
        let normalized = Normalizer::default().normalize("This is a test");
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..20 {
            let sampled = encoder.sample_pieces(&normalized, 0.1, &mut rng);
            let joined: String = sampled.iter().map(|p| p.piece.as_str()).collect();
            assert_eq!(joined, normalized);
        }

        // A sharp distribution collapses to the best path.
        let sampled = encoder.sample_pieces(&normalized, 100.0, &mut rng);
        assert_eq!(sampled, encoder.encode_pieces(&normalized));
    }

    #[test]
    fn test_log_sum_exp() {
        assert_eq!(log_sum_exp(&[]), None);
        let v = log_sum_exp(&[0.0, 0.0]).unwrap();
        assert!((v - 2.0f64.ln()).abs() < 1e-12);
    }
}
