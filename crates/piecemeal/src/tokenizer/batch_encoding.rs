//! # Batch Encodings and Tensors

use crate::{
    errors::{PMError, PMResult},
    tokenizer::PaddingSide,
    types::TokenId,
};

/// The named fields of a [`BatchEncoding`].
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    strum::EnumString,
    strum::EnumIter,
    strum::Display,
    strum::AsRefStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum EncodingField {
    /// Token ids.
    InputIds,

    /// `1` for real tokens, `0` for padding.
    AttentionMask,

    /// `0` for the first sequence, `1` for the second.
    TokenTypeIds,

    /// `1` for special and padding tokens.
    SpecialTokensMask,

    /// Ids removed by truncation.
    OverflowingTokens,

    /// The number of ids removed by truncation.
    NumTruncatedTokens,
}

/// A dense row-major `[rows, cols]` matrix of `i64`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tensor2 {
    shape: [usize; 2],
    data: Vec<i64>,
}

impl Tensor2 {
    /// Build from equal-length rows.
    ///
    /// ## Errors
    /// [`PMError::RaggedBatch`] when row lengths differ.
    pub fn from_rows<T: Copy + Into<i64>>(
        name: &str,
        rows: &[Vec<T>],
    ) -> PMResult<Self> {
        let cols = rows.first().map_or(0, Vec::len);
        if rows.iter().any(|r| r.len() != cols) {
            return Err(PMError::RaggedBatch {
                name: name.to_string(),
                lengths: rows.iter().map(Vec::len).collect(),
            });
        }
        let data = rows
            .iter()
            .flat_map(|r| r.iter().map(|&v| v.into()))
            .collect();
        Ok(Self {
            shape: [rows.len(), cols],
            data,
        })
    }

    /// `[rows, cols]`.
    pub fn shape(&self) -> [usize; 2] {
        self.shape
    }

    /// A single element.
    pub fn get(
        &self,
        row: usize,
        col: usize,
    ) -> Option<i64> {
        if row >= self.shape[0] || col >= self.shape[1] {
            return None;
        }
        self.data.get(row * self.shape[1] + col).copied()
    }

    /// A single row.
    pub fn row(
        &self,
        row: usize,
    ) -> Option<&[i64]> {
        if row >= self.shape[0] {
            return None;
        }
        let cols = self.shape[1];
        Some(&self.data[row * cols..(row + 1) * cols])
    }

    /// The flat row-major data.
    pub fn as_slice(&self) -> &[i64] {
        &self.data
    }

    /// Consume into the flat row-major data.
    pub fn into_vec(self) -> Vec<i64> {
        self.data
    }
}

/// One encoded sequence (pair) before collation.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct EncodedRow {
    pub input_ids: Vec<TokenId>,
    pub attention_mask: Vec<u32>,
    pub token_type_ids: Vec<u32>,
    pub special_tokens_mask: Vec<u32>,
    pub overflowing_tokens: Vec<TokenId>,
    pub num_truncated_tokens: usize,
}

impl EncodedRow {
    /// Build from a (truncated) sequence pair.
    pub fn new(
        first: Vec<TokenId>,
        second: Option<Vec<TokenId>>,
        overflowing_tokens: Vec<TokenId>,
        num_truncated_tokens: usize,
    ) -> Self {
        let mut token_type_ids = vec![0; first.len()];
        let mut input_ids = first;
        if let Some(second) = second {
            token_type_ids.extend(std::iter::repeat_n(1, second.len()));
            input_ids.extend(second);
        }
        Self {
            attention_mask: vec![1; input_ids.len()],
            special_tokens_mask: vec![0; input_ids.len()],
            input_ids,
            token_type_ids,
            overflowing_tokens,
            num_truncated_tokens,
        }
    }

    pub fn len(&self) -> usize {
        self.input_ids.len()
    }

    /// Pad up to `target`; longer rows are left alone.
    pub fn pad(
        &mut self,
        target: usize,
        pad_id: TokenId,
        side: PaddingSide,
    ) {
        let missing = target.saturating_sub(self.len());
        if missing == 0 {
            return;
        }
        pad_vec(&mut self.input_ids, missing, pad_id, side);
        pad_vec(&mut self.attention_mask, missing, 0, side);
        pad_vec(&mut self.token_type_ids, missing, 0, side);
        pad_vec(&mut self.special_tokens_mask, missing, 1, side);
    }
}

fn pad_vec<T: Copy>(
    values: &mut Vec<T>,
    missing: usize,
    value: T,
    side: PaddingSide,
) {
    match side {
        PaddingSide::Right => values.extend(std::iter::repeat_n(value, missing)),
        PaddingSide::Left => {
            values.splice(0..0, std::iter::repeat_n(value, missing));
        }
    }
}

/// Which optional fields a [`BatchEncoding`] carries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct FieldSelection {
    pub attention_mask: bool,
    pub token_type_ids: bool,
    pub special_tokens_mask: bool,
    pub overflowing_tokens: bool,
}

/// The output of `encode_plus` and `batch_encode_plus`: one row per input.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchEncoding {
    /// Token ids.
    pub input_ids: Vec<Vec<TokenId>>,

    /// See [`EncodingField::AttentionMask`].
    pub attention_mask: Option<Vec<Vec<u32>>>,

    /// See [`EncodingField::TokenTypeIds`].
    pub token_type_ids: Option<Vec<Vec<u32>>>,

    /// See [`EncodingField::SpecialTokensMask`].
    pub special_tokens_mask: Option<Vec<Vec<u32>>>,

    /// See [`EncodingField::OverflowingTokens`].
    pub overflowing_tokens: Option<Vec<Vec<TokenId>>>,

    /// See [`EncodingField::NumTruncatedTokens`].
    pub num_truncated_tokens: Option<Vec<usize>>,
}

impl BatchEncoding {
    pub(crate) fn collate(
        rows: Vec<EncodedRow>,
        fields: FieldSelection,
    ) -> Self {
        let mut out = Self {
            input_ids: Vec::with_capacity(rows.len()),
            attention_mask: fields.attention_mask.then(Vec::new),
            token_type_ids: fields.token_type_ids.then(Vec::new),
            special_tokens_mask: fields.special_tokens_mask.then(Vec::new),
            overflowing_tokens: fields.overflowing_tokens.then(Vec::new),
            num_truncated_tokens: fields.overflowing_tokens.then(Vec::new),
        };
        for row in rows {
            out.input_ids.push(row.input_ids);
            if let Some(v) = out.attention_mask.as_mut() {
                v.push(row.attention_mask);
            }
            if let Some(v) = out.token_type_ids.as_mut() {
                v.push(row.token_type_ids);
            }
            if let Some(v) = out.special_tokens_mask.as_mut() {
                v.push(row.special_tokens_mask);
            }
            if let Some(v) = out.overflowing_tokens.as_mut() {
                v.push(row.overflowing_tokens);
            }
            if let Some(v) = out.num_truncated_tokens.as_mut() {
                v.push(row.num_truncated_tokens);
            }
        }
        out
    }

    /// The number of rows.
    pub fn len(&self) -> usize {
        self.input_ids.len()
    }

    /// Is the batch empty?
    pub fn is_empty(&self) -> bool {
        self.input_ids.is_empty()
    }

    /// The fields present, in [`EncodingField`] order.
    pub fn fields(&self) -> Vec<EncodingField> {
        use strum::IntoEnumIterator;
        EncodingField::iter()
            .filter(|&f| match f {
                EncodingField::InputIds => true,
                EncodingField::AttentionMask => self.attention_mask.is_some(),
                EncodingField::TokenTypeIds => self.token_type_ids.is_some(),
                EncodingField::SpecialTokensMask => self.special_tokens_mask.is_some(),
                EncodingField::OverflowingTokens => self.overflowing_tokens.is_some(),
                EncodingField::NumTruncatedTokens => self.num_truncated_tokens.is_some(),
            })
            .collect()
    }

    /// Do all rows have the same length?
    pub fn is_rectangular(&self) -> bool {
        let cols = self.input_ids.first().map_or(0, Vec::len);
        self.input_ids.iter().all(|r| r.len() == cols)
    }

    /// Convert a field to a `[batch, seq]` tensor.
    ///
    /// `num_truncated_tokens` converts to a `[batch, 1]` tensor.
    ///
    /// ## Errors
    /// * [`PMError::MissingField`] for unknown or absent fields.
    /// * [`PMError::RaggedBatch`] when rows differ in length.
    pub fn tensor(
        &self,
        name: &str,
    ) -> PMResult<Tensor2> {
        let missing = || PMError::MissingField(name.to_string());
        let field: EncodingField = name.parse().map_err(|_| missing())?;
        match field {
            EncodingField::InputIds => Tensor2::from_rows(name, &self.input_ids),
            EncodingField::AttentionMask => {
                Tensor2::from_rows(name, self.attention_mask.as_ref().ok_or_else(missing)?)
            }
            EncodingField::TokenTypeIds => {
                Tensor2::from_rows(name, self.token_type_ids.as_ref().ok_or_else(missing)?)
            }
            EncodingField::SpecialTokensMask => Tensor2::from_rows(
                name,
                self.special_tokens_mask.as_ref().ok_or_else(missing)?,
            ),
            EncodingField::OverflowingTokens => {
                Tensor2::from_rows(name, self.overflowing_tokens.as_ref().ok_or_else(missing)?)
            }
            EncodingField::NumTruncatedTokens => {
                let counts = self.num_truncated_tokens.as_ref().ok_or_else(missing)?;
                let rows: Vec<Vec<i64>> = counts.iter().map(|&n| vec![n as i64]).collect();
                Tensor2::from_rows(name, &rows)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tensor2() {
        let t = Tensor2::from_rows("input_ids", &[vec![1u32, 2, 3], vec![4, 5, 6]]).unwrap();
        assert_eq!(t.shape(), [2, 3]);
        assert_eq!(t.get(1, 2), Some(6));
        assert_eq!(t.get(2, 0), None);
        assert_eq!(t.row(0), Some(&[1i64, 2, 3][..]));
        assert_eq!(t.as_slice(), &[1, 2, 3, 4, 5, 6]);

        assert!(matches!(
            Tensor2::from_rows("input_ids", &[vec![1u32], vec![2, 3]]),
            Err(PMError::RaggedBatch { lengths, .. }) if lengths == vec![1, 2]
        ));

        let empty = Tensor2::from_rows::<u32>("input_ids", &[]).unwrap();
        assert_eq!(empty.shape(), [0, 0]);
    }

    #[test]
    fn test_row_padding() {
        let mut row = EncodedRow::new(vec![5, 6], Some(vec![7]), Vec::new(), 0);
        assert_eq!(row.token_type_ids, vec![0, 0, 1]);

        row.pad(5, 0, PaddingSide::Right);
        assert_eq!(row.input_ids, vec![5, 6, 7, 0, 0]);
        assert_eq!(row.attention_mask, vec![1, 1, 1, 0, 0]);
        assert_eq!(row.special_tokens_mask, vec![0, 0, 0, 1, 1]);

        let mut row = EncodedRow::new(vec![5, 6], None, Vec::new(), 0);
        row.pad(3, 9, PaddingSide::Left);
        assert_eq!(row.input_ids, vec![9, 5, 6]);
        assert_eq!(row.attention_mask, vec![0, 1, 1]);

        // Never shortens.
        row.pad(1, 9, PaddingSide::Left);
        assert_eq!(row.len(), 3);
    }

    #[test]
    fn test_collate_and_tensor() {
        let rows = vec![
            EncodedRow::new(vec![1, 2], None, Vec::new(), 0),
            EncodedRow::new(vec![3], None, vec![4], 1),
        ];
        let fields = FieldSelection {
            attention_mask: true,
            overflowing_tokens: true,
            ..Default::default()
        };
        let batch = BatchEncoding::collate(rows, fields);
        assert_eq!(batch.len(), 2);
        assert!(!batch.is_rectangular());
        assert_eq!(
            batch.fields(),
            vec![
                EncodingField::InputIds,
                EncodingField::AttentionMask,
                EncodingField::OverflowingTokens,
                EncodingField::NumTruncatedTokens,
            ]
        );

        assert!(matches!(
            batch.tensor("input_ids"),
            Err(PMError::RaggedBatch { .. })
        ));
        assert!(matches!(
            batch.tensor("token_type_ids"),
            Err(PMError::MissingField(_))
        ));
        assert!(matches!(batch.tensor("logits"), Err(PMError::MissingField(_))));

        let counts = batch.tensor("num_truncated_tokens").unwrap();
        assert_eq!(counts.shape(), [2, 1]);
        assert_eq!(counts.as_slice(), &[0, 1]);
    }
}
