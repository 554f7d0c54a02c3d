//! # Piece Vocabulary

use crate::{
    errors::{PMError, PMResult},
    model::{ModelProto, PieceType},
    types::{PMHashMap, TokenId, hash_map_with_capacity},
};

/// One vocabulary entry.
#[derive(Debug, Clone, PartialEq)]
pub struct PieceEntry {
    /// The piece text.
    pub piece: String,

    /// The piece score.
    pub score: f32,

    /// The piece type.
    pub kind: PieceType,
}

/// The ordered, immutable vocabulary of a model; an id is a position.
#[derive(Debug, Clone, PartialEq)]
pub struct PieceVocab {
    entries: Vec<PieceEntry>,
    index: PMHashMap<String, TokenId>,
    unk_id: TokenId,
    bos_id: Option<TokenId>,
    eos_id: Option<TokenId>,
    pad_id: Option<TokenId>,
    min_score: f32,
    max_score: f32,
    byte_ids: Option<Box<[TokenId; 256]>>,
}

/// Parse a byte piece (`<0x41>`) into its byte.
pub fn parse_byte_piece(piece: &str) -> Option<u8> {
    let hex = piece.strip_prefix("<0x")?.strip_suffix('>')?;
    if hex.len() != 2 {
        return None;
    }
    u8::from_str_radix(hex, 16).ok()
}

/// Format a byte as a byte piece (`<0x41>`).
pub fn byte_piece(byte: u8) -> String {
    format!("<0x{byte:02X}>")
}

impl PieceVocab {
    /// Build the vocabulary of a model.
    ///
    /// ## Errors
    /// If the model fails [`ModelProto::validate`], or a byte piece is
    /// malformed.
    pub fn from_model(model: &ModelProto) -> PMResult<Self> {
        model.validate()?;

        let mut entries = Vec::with_capacity(model.pieces.len());
        let mut index = hash_map_with_capacity(model.pieces.len());
        let mut unk_id = 0;
        let mut min_score = f32::MAX;
        let mut max_score = f32::MIN;
        let mut byte_slots: [Option<TokenId>; 256] = [None; 256];

        for (id, sp) in model.pieces.iter().enumerate() {
            let id = id as TokenId;
            let kind = sp.r#type();
            let score = sp.score();
            match kind {
                PieceType::Unknown => unk_id = id,
                PieceType::Normal => {
                    min_score = min_score.min(score);
                    max_score = max_score.max(score);
                }
                PieceType::Byte => {
                    let byte = parse_byte_piece(sp.piece()).ok_or_else(|| {
                        PMError::InvalidModel(format!("malformed byte piece {:?}", sp.piece()))
                    })?;
                    byte_slots[byte as usize] = Some(id);
                }
                _ => {}
            }
            index.insert(sp.piece().to_string(), id);
            entries.push(PieceEntry {
                piece: sp.piece().to_string(),
                score,
                kind,
            });
        }

        if min_score > max_score {
            min_score = 0.0;
            max_score = 0.0;
        }

        let byte_ids = if byte_slots.iter().any(Option::is_some) {
            let mut ids = [unk_id; 256];
            for (byte, slot) in byte_slots.iter().enumerate() {
                ids[byte] = slot.ok_or_else(|| {
                    PMError::InvalidModel(format!("missing byte piece {}", byte_piece(byte as u8)))
                })?;
            }
            Some(Box::new(ids))
        } else {
            None
        };

        let trainer = model.trainer();
        let size = entries.len();
        let reserved = |id: i32| -> Option<TokenId> {
            (id >= 0 && (id as usize) < size).then_some(id as TokenId)
        };

        Ok(Self {
            bos_id: reserved(trainer.bos_id()),
            eos_id: reserved(trainer.eos_id()),
            pad_id: reserved(trainer.pad_id()),
            entries,
            index,
            unk_id,
            min_score,
            max_score,
            byte_ids,
        })
    }

    /// The number of pieces.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Is the vocabulary empty?
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over `(id, entry)` pairs in id order.
    pub fn iter(&self) -> impl Iterator<Item = (TokenId, &PieceEntry)> {
        self.entries
            .iter()
            .enumerate()
            .map(|(id, entry)| (id as TokenId, entry))
    }

    /// Get the entry for an id.
    pub fn entry(
        &self,
        id: TokenId,
    ) -> Option<&PieceEntry> {
        self.entries.get(id as usize)
    }

    /// Look up a piece's id, if present.
    pub fn lookup(
        &self,
        piece: &str,
    ) -> Option<TokenId> {
        self.index.get(piece).copied()
    }

    /// Map a piece to its id; absent pieces map to the unknown id.
    pub fn piece_to_id(
        &self,
        piece: &str,
    ) -> TokenId {
        self.lookup(piece).unwrap_or(self.unk_id)
    }

    /// Map an id to its piece, if in range.
    pub fn id_to_piece(
        &self,
        id: TokenId,
    ) -> Option<&str> {
        self.entry(id).map(|e| e.piece.as_str())
    }

    /// The score of an id; `0.0` when out of range.
    pub fn score(
        &self,
        id: TokenId,
    ) -> f32 {
        self.entry(id).map(|e| e.score).unwrap_or_default()
    }

    /// The type of an id, if in range.
    pub fn piece_type(
        &self,
        id: TokenId,
    ) -> Option<PieceType> {
        self.entry(id).map(|e| e.kind)
    }

    fn is_kind(
        &self,
        id: TokenId,
        kind: PieceType,
    ) -> bool {
        self.piece_type(id) == Some(kind)
    }

    /// Is this the unknown id?
    pub fn is_unknown(
        &self,
        id: TokenId,
    ) -> bool {
        id == self.unk_id
    }

    /// Is this a control piece?
    pub fn is_control(
        &self,
        id: TokenId,
    ) -> bool {
        self.is_kind(id, PieceType::Control)
    }

    /// Is this an unused piece?
    pub fn is_unused(
        &self,
        id: TokenId,
    ) -> bool {
        self.is_kind(id, PieceType::Unused)
    }

    /// Is this a user-defined piece?
    pub fn is_user_defined(
        &self,
        id: TokenId,
    ) -> bool {
        self.is_kind(id, PieceType::UserDefined)
    }

    /// Is this a byte piece?
    pub fn is_byte(
        &self,
        id: TokenId,
    ) -> bool {
        self.is_kind(id, PieceType::Byte)
    }

    /// The byte value of a byte piece.
    pub fn byte_value(
        &self,
        id: TokenId,
    ) -> Option<u8> {
        if !self.is_byte(id) {
            return None;
        }
        self.id_to_piece(id).and_then(parse_byte_piece)
    }

    /// The id of the byte piece for `byte`, when the model has byte pieces.
    pub fn byte_id(
        &self,
        byte: u8,
    ) -> Option<TokenId> {
        self.byte_ids.as_ref().map(|ids| ids[byte as usize])
    }

    /// Does the model carry a complete set of byte pieces?
    pub fn has_byte_pieces(&self) -> bool {
        self.byte_ids.is_some()
    }

    /// The unknown id.
    pub fn unk_id(&self) -> TokenId {
        self.unk_id
    }

    /// The unknown piece text.
    pub fn unk_piece(&self) -> &str {
        &self.entries[self.unk_id as usize].piece
    }

    /// The beginning-of-sentence id, if the model reserves one.
    pub fn bos_id(&self) -> Option<TokenId> {
        self.bos_id
    }

    /// The end-of-sentence id, if the model reserves one.
    pub fn eos_id(&self) -> Option<TokenId> {
        self.eos_id
    }

    /// The padding id, if the model reserves one.
    pub fn pad_id(&self) -> Option<TokenId> {
        self.pad_id
    }

    /// The lowest normal-piece score.
    pub fn min_score(&self) -> f32 {
        self.min_score
    }

    /// The highest normal-piece score.
    pub fn max_score(&self) -> f32 {
        self.max_score
    }
}
