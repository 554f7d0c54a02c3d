//! # Piece Encoder Trait

use core::ops::Range;

use aho_corasick::{AhoCorasick, MatchKind};

use crate::{
    types::TokenId,
    vocab::{PieceVocab, byte_piece},
};

/// One segmented piece of normalized text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedPiece {
    /// The piece text.
    ///
    /// For unknown pieces this is the uncovered input text, not `<unk>`.
    pub piece: String,

    /// The piece id.
    pub id: TokenId,
}

impl EncodedPiece {
    /// Build a piece.
    pub fn new<S: Into<String>>(
        piece: S,
        id: TokenId,
    ) -> Self {
        Self {
            piece: piece.into(),
            id,
        }
    }
}

/// Segments normalized text into vocabulary pieces.
pub trait PieceEncoder: Send + Sync {
    /// The vocabulary the encoder segments into.
    fn vocab(&self) -> &PieceVocab;

    /// Segment normalized (whitespace-escaped) text.
    ///
    /// Concatenating the returned pieces reproduces `normalized`, except
    /// where byte fallback replaced unknown text with byte pieces.
    fn encode_pieces(
        &self,
        normalized: &str,
    ) -> Vec<EncodedPiece>;
}

/// Assemble segmentation spans into pieces.
///
/// Each span is a byte range of `normalized` and its id; `None` marks
/// uncovered text. Consecutive unknown spans merge into one unknown piece,
/// which byte fallback (when enabled) then expands into byte pieces.
pub(crate) fn assemble_pieces(
    vocab: &PieceVocab,
    normalized: &str,
    spans: &[(Range<usize>, Option<TokenId>)],
    byte_fallback: bool,
) -> Vec<EncodedPiece> {
    let mut pieces: Vec<EncodedPiece> = Vec::with_capacity(spans.len());
    let mut unk_start: Option<usize> = None;
    let mut unk_end = 0;

    let flush_unk = |pieces: &mut Vec<EncodedPiece>, range: Range<usize>| {
        let text = &normalized[range];
        if byte_fallback && vocab.has_byte_pieces() {
            for &b in text.as_bytes() {
                let id = vocab.byte_id(b).unwrap_or(vocab.unk_id());
                pieces.push(EncodedPiece::new(byte_piece(b), id));
            }
        } else {
            pieces.push(EncodedPiece::new(text, vocab.unk_id()));
        }
    };

    for (range, id) in spans {
        match id {
            Some(id) if !vocab.is_unknown(*id) => {
                if let Some(start) = unk_start.take() {
                    flush_unk(&mut pieces, start..unk_end);
                }
                pieces.push(EncodedPiece::new(&normalized[range.clone()], *id));
            }
            _ => {
                if unk_start.is_none() {
                    unk_start = Some(range.start);
                }
                unk_end = range.end;
            }
        }
    }
    if let Some(start) = unk_start {
        flush_unk(&mut pieces, start..unk_end);
    }

    pieces
}

/// Leftmost-longest matcher over the user-defined pieces of a vocabulary.
///
/// User-defined pieces are never split by segmentation.
#[derive(Clone)]
pub(crate) struct UserDefinedMatcher {
    matcher: Option<(AhoCorasick, Vec<TokenId>)>,
}

impl UserDefinedMatcher {
    /// Build a matcher for the vocabulary's user-defined pieces.
    pub fn new(vocab: &PieceVocab) -> Self {
        let (pieces, ids): (Vec<&str>, Vec<TokenId>) = vocab
            .iter()
            .filter(|(id, _)| vocab.is_user_defined(*id))
            .map(|(id, entry)| (entry.piece.as_str(), id))
            .unzip();

        if pieces.is_empty() {
            return Self { matcher: None };
        }

        let matcher = AhoCorasick::builder()
            .match_kind(MatchKind::LeftmostLongest)
            .build(&pieces)
            .ok()
            .map(|ac| (ac, ids));
        if matcher.is_none() {
            log::warn!("failed to build user-defined piece matcher; matching disabled");
        }
        Self { matcher }
    }

    /// Split text into character spans, keeping user-defined pieces whole.
    ///
    /// ## Returns
    /// `(range, Some(id))` for user-defined pieces; `(range, None)` for
    /// single characters.
    pub fn split_chars(
        &self,
        text: &str,
    ) -> Vec<(Range<usize>, Option<TokenId>)> {
        let mut spans = Vec::with_capacity(text.len());
        let push_chars = |spans: &mut Vec<_>, from: usize, to: usize| {
            for (offset, c) in text[from..to].char_indices() {
                let start = from + offset;
                spans.push((start..start + c.len_utf8(), None));
            }
        };

        let mut last = 0;
        if let Some((ac, ids)) = &self.matcher {
            for m in ac.find_iter(text) {
                push_chars(&mut spans, last, m.start());
                spans.push((m.start()..m.end(), Some(ids[m.pattern().as_usize()])));
                last = m.end();
            }
        }
        push_chars(&mut spans, last, text.len());
        spans
    }
}
