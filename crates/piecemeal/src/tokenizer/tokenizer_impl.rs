//! # Reformer Tokenizer

use std::{path::Path, sync::Arc};

use rand::Rng;

use crate::{
    encoders::PieceProcessor,
    errors::{PMError, PMResult},
    tokenizer::{
        BatchEncoding,
        EncodeOptions,
        EncodedRow,
        FieldSelection,
        PaddingStrategy,
        TextSpan,
        TokenSplitter,
        TokenizerOptions,
        TruncationStrategy,
        truncate_sequences,
    },
    types::{PMHashSet, TokenId},
    vocab::{AddedVocab, SpecialRole, SpecialTokens},
};

/// A `SentencePiece` tokenizer with Reformer conventions.
///
/// No special tokens are inserted around encoded sequences; registered
/// special and added tokens are matched whole in the input.
///
/// Shared state is immutable behind an [`Arc`]; clones are cheap and the
/// tokenizer is `Send + Sync`.
#[derive(Clone)]
pub struct ReformerTokenizer {
    processor: Arc<PieceProcessor>,
    options: TokenizerOptions,
    special_tokens: SpecialTokens,
    added: AddedVocab,
    splitter: TokenSplitter,
}

impl std::fmt::Debug for ReformerTokenizer {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.debug_struct("ReformerTokenizer")
            .field("model_type", &self.processor.model_type())
            .field("vocab_size", &self.vocab_size())
            .field("added", &self.added.len())
            .field("options", &self.options)
            .field("special_tokens", &self.special_tokens)
            .finish()
    }
}

impl ReformerTokenizer {
    /// Build with default options and special tokens.
    pub fn new(processor: PieceProcessor) -> Self {
        let added = AddedVocab::new(processor.len());
        let mut tokenizer = Self {
            processor: Arc::new(processor),
            options: TokenizerOptions::default(),
            special_tokens: SpecialTokens::empty(),
            added,
            splitter: TokenSplitter::new::<&str>(&[]),
        };
        tokenizer.add_special_tokens(&SpecialTokens::default());
        tokenizer
    }

    /// Build from parts.
    ///
    /// Special tokens missing from both the model vocabulary and `added`
    /// are registered as added tokens.
    ///
    /// ## Errors
    /// [`PMError::InvalidConfig`] when `added` does not start at the model
    /// vocabulary size.
    pub fn from_parts<P: Into<Arc<PieceProcessor>>>(
        processor: P,
        options: TokenizerOptions,
        special_tokens: SpecialTokens,
        added: AddedVocab,
    ) -> PMResult<Self> {
        let processor = processor.into();
        if added.base() != processor.len() {
            return Err(PMError::InvalidConfig(format!(
                "added tokens start at {}, but the model has {} pieces",
                added.base(),
                processor.len()
            )));
        }
        let mut tokenizer = Self {
            processor,
            options,
            special_tokens: SpecialTokens::empty(),
            added,
            splitter: TokenSplitter::new::<&str>(&[]),
        };
        tokenizer.add_special_tokens(&special_tokens);
        Ok(tokenizer)
    }

    /// Load a `SentencePiece` model file with default options.
    pub fn from_model_file<P: AsRef<Path>>(path: P) -> PMResult<Self> {
        Ok(Self::new(PieceProcessor::load_path(path)?))
    }

    /// Replace the options.
    pub fn with_options(
        mut self,
        options: TokenizerOptions,
    ) -> Self {
        self.options = options;
        self
    }

    /// The segmentation model.
    pub fn processor(&self) -> &Arc<PieceProcessor> {
        &self.processor
    }

    /// The options.
    pub fn options(&self) -> &TokenizerOptions {
        &self.options
    }

    /// The special tokens.
    pub fn special_tokens(&self) -> &SpecialTokens {
        &self.special_tokens
    }

    /// The added tokens.
    pub fn added_vocab(&self) -> &AddedVocab {
        &self.added
    }

    /// The number of model pieces.
    pub fn vocab_size(&self) -> usize {
        self.processor.len()
    }

    /// The number of ids: model pieces plus added tokens.
    pub fn len(&self) -> usize {
        self.vocab_size() + self.added.len()
    }

    /// Is the vocabulary empty?
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every token and its id, in id order: model pieces, then added tokens.
    pub fn get_vocab(&self) -> Vec<(String, TokenId)> {
        let mut vocab: Vec<(String, TokenId)> = self
            .processor
            .vocab()
            .iter()
            .map(|(id, entry)| (entry.piece.clone(), id))
            .collect();
        vocab.extend(self.added.iter().map(|(t, id)| (t.to_string(), id)));
        vocab
    }

    fn rebuild_splitter(&mut self) {
        let mut tokens = self.special_tokens.all_tokens();
        for (token, _) in self.added.iter() {
            if !tokens.iter().any(|t| t == token) {
                tokens.push(token.to_string());
            }
        }
        self.splitter = TokenSplitter::new(&tokens);
    }

    fn is_known(
        &self,
        token: &str,
    ) -> bool {
        self.added.get(token).is_some() || self.processor.vocab().lookup(token).is_some()
    }

    /// Register new tokens, matched whole and never split.
    ///
    /// Empty tokens, the unknown token and already-known tokens are skipped.
    ///
    /// ## Returns
    /// The number of tokens added.
    pub fn add_tokens<S: AsRef<str>>(
        &mut self,
        tokens: &[S],
    ) -> usize {
        let unk = self.special_tokens.get(SpecialRole::UnkToken).map(str::to_string);
        let mut count = 0;
        for token in tokens {
            let mut token = token.as_ref().to_string();
            if self.options.preprocessor.do_lower_case
                && !self.special_tokens.all_tokens().contains(&token)
            {
                token = token.to_lowercase();
            }
            if token.is_empty() || unk.as_deref() == Some(token.as_str()) || self.is_known(&token)
            {
                continue;
            }
            if let Some(id) = self.added.add(&token) {
                log::debug!("added token {token:?} as {id}");
                count += 1;
            }
        }
        if count > 0 {
            self.rebuild_splitter();
        }
        count
    }

    /// Set special tokens; roles given here replace existing ones.
    ///
    /// ## Returns
    /// The number of tokens newly added to the vocabulary.
    pub fn add_special_tokens(
        &mut self,
        special_tokens: &SpecialTokens,
    ) -> usize {
        self.special_tokens.merge(special_tokens);
        let mut count = 0;
        for token in special_tokens.all_tokens() {
            if !token.is_empty() && !self.is_known(&token) && self.added.add(&token).is_some() {
                count += 1;
            }
        }
        self.rebuild_splitter();
        count
    }

    /// A special token by role.
    pub fn special_token(
        &self,
        role: SpecialRole,
    ) -> Option<&str> {
        self.special_tokens.get(role)
    }

    /// The id of a special token by role.
    pub fn special_token_id(
        &self,
        role: SpecialRole,
    ) -> Option<TokenId> {
        self.special_token(role)
            .map(|token| self.convert_token_to_id(token))
    }

    /// The unknown id.
    pub fn unk_token_id(&self) -> TokenId {
        self.special_token_id(SpecialRole::UnkToken)
            .unwrap_or_else(|| self.processor.vocab().unk_id())
    }

    /// The padding id, if a padding token is set.
    pub fn pad_token_id(&self) -> Option<TokenId> {
        self.special_token_id(SpecialRole::PadToken)
    }

    /// The end-of-sequence id, if an end-of-sequence token is set.
    pub fn eos_token_id(&self) -> Option<TokenId> {
        self.special_token_id(SpecialRole::EosToken)
    }

    /// All distinct special tokens.
    pub fn all_special_tokens(&self) -> Vec<String> {
        self.special_tokens.all_tokens()
    }

    /// The ids of [`Self::all_special_tokens`].
    pub fn all_special_ids(&self) -> Vec<TokenId> {
        self.convert_tokens_to_ids(&self.all_special_tokens())
    }

    fn check_sequence_length(
        &self,
        len: usize,
    ) {
        if let Some(max) = self.options.model_max_length
            && len > max
        {
            log::warn!(
                "Token indices sequence length is longer than the specified maximum sequence length \
                 for this model ({len} > {max}). Running this sequence through the model will \
                 result in indexing errors"
            );
        }
    }

    /// Split text into tokens.
    ///
    /// Special and added tokens are kept whole (adjacent whitespace
    /// dropped); the remaining text is segmented by the model.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self, text)))]
    pub fn tokenize(
        &self,
        text: &str,
    ) -> Vec<String> {
        self.tokenize_with(text, |chunk| self.processor.encode_as_pieces(chunk))
    }

    /// Split text into tokens, sampling the segmentation of each chunk.
    ///
    /// ## Arguments
    /// * `alpha` - the sampling temperature; smaller is more uniform.
    pub fn tokenize_sampled<R: Rng + ?Sized>(
        &self,
        text: &str,
        alpha: f32,
        rng: &mut R,
    ) -> Vec<String> {
        self.tokenize_with(text, |chunk| {
            self.processor
                .sample_encode_with_rng(chunk, alpha, &mut *rng)
                .into_iter()
                .map(|p| p.piece)
                .collect()
        })
    }

    fn tokenize_with<F>(
        &self,
        text: &str,
        mut segment: F,
    ) -> Vec<String>
    where
        F: FnMut(&str) -> Vec<String>,
    {
        let text = self.options.preprocessor.process(text);
        let mut tokens = Vec::new();
        for span in self.splitter.split(&text) {
            match span {
                TextSpan::Token(token) => tokens.push(token.to_string()),
                TextSpan::Text(chunk) => tokens.extend(segment(chunk)),
            }
        }
        tokens
    }

    /// Map a token to its id; unknown tokens map to the unknown id.
    pub fn convert_token_to_id(
        &self,
        token: &str,
    ) -> TokenId {
        self.added
            .get(token)
            .unwrap_or_else(|| self.processor.piece_to_id(token))
    }

    /// Map tokens to ids; unknown tokens map to the unknown id.
    pub fn convert_tokens_to_ids<S: AsRef<str>>(
        &self,
        tokens: &[S],
    ) -> Vec<TokenId> {
        tokens
            .iter()
            .map(|t| self.convert_token_to_id(t.as_ref()))
            .collect()
    }

    /// Map an id to its token.
    ///
    /// ## Errors
    /// [`PMError::TokenIdOutOfRange`] for ids beyond [`Self::len`].
    pub fn convert_id_to_token(
        &self,
        id: TokenId,
    ) -> PMResult<&str> {
        self.processor
            .id_to_piece(id)
            .or_else(|| self.added.token(id))
            .ok_or(PMError::TokenIdOutOfRange {
                id,
                size: self.len(),
            })
    }

    /// Map ids to tokens, optionally dropping special tokens.
    ///
    /// ## Errors
    /// [`PMError::TokenIdOutOfRange`] for ids beyond [`Self::len`].
    pub fn convert_ids_to_tokens(
        &self,
        ids: &[TokenId],
        skip_special_tokens: bool,
    ) -> PMResult<Vec<String>> {
        let specials: PMHashSet<TokenId> = if skip_special_tokens {
            self.all_special_ids().into_iter().collect()
        } else {
            PMHashSet::default()
        };
        ids.iter()
            .filter(|id| !specials.contains(id))
            .map(|&id| self.convert_id_to_token(id).map(str::to_string))
            .collect()
    }

    /// Reassemble text from model tokens.
    pub fn convert_tokens_to_string<S: AsRef<str>>(
        &self,
        tokens: &[S],
    ) -> String {
        self.processor.decode_pieces(tokens)
    }

    /// Tokenize and map to ids, without truncation or padding.
    pub fn encode_ids(
        &self,
        text: &str,
    ) -> Vec<TokenId> {
        self.convert_tokens_to_ids(&self.tokenize(text))
    }

    fn encode_ids_batch<S: AsRef<str> + Sync>(
        &self,
        texts: &[S],
    ) -> Vec<Vec<TokenId>> {
        #[cfg(feature = "rayon")]
        {
            use rayon::prelude::*;
            texts.par_iter().map(|t| self.encode_ids(t.as_ref())).collect()
        }
        #[cfg(not(feature = "rayon"))]
        {
            texts.iter().map(|t| self.encode_ids(t.as_ref())).collect()
        }
    }

    /// Encode text to ids, applying truncation and padding.
    pub fn encode(
        &self,
        text: &str,
        options: &EncodeOptions,
    ) -> PMResult<Vec<TokenId>> {
        let batch = self.encode_plus(text, None, options)?;
        Ok(batch.input_ids.into_iter().next().unwrap_or_default())
    }

    /// Encode a text (pair) to a single-row [`BatchEncoding`].
    pub fn encode_plus(
        &self,
        text: &str,
        text_pair: Option<&str>,
        options: &EncodeOptions,
    ) -> PMResult<BatchEncoding> {
        let first = self.encode_ids(text);
        let second = text_pair.map(|t| self.encode_ids(t));
        self.prepare_batch(vec![(first, second)], options)
    }

    /// Encode a batch of texts.
    ///
    /// Texts are tokenized in parallel when the `rayon` feature is on.
    pub fn batch_encode_plus<S: AsRef<str> + Sync>(
        &self,
        texts: &[S],
        options: &EncodeOptions,
    ) -> PMResult<BatchEncoding> {
        let sequences = self
            .encode_ids_batch(texts)
            .into_iter()
            .map(|ids| (ids, None))
            .collect();
        self.prepare_batch(sequences, options)
    }

    /// Encode a batch of text pairs.
    pub fn batch_encode_pairs<S: AsRef<str> + Sync>(
        &self,
        pairs: &[(S, S)],
        options: &EncodeOptions,
    ) -> PMResult<BatchEncoding> {
        let firsts: Vec<&str> = pairs.iter().map(|(a, _)| a.as_ref()).collect();
        let seconds: Vec<&str> = pairs.iter().map(|(_, b)| b.as_ref()).collect();
        let sequences = self
            .encode_ids_batch(&firsts)
            .into_iter()
            .zip(self.encode_ids_batch(&seconds))
            .map(|(a, b)| (a, Some(b)))
            .collect();
        self.prepare_batch(sequences, options)
    }

    fn prepare_batch(
        &self,
        sequences: Vec<(Vec<TokenId>, Option<Vec<TokenId>>)>,
        options: &EncodeOptions,
    ) -> PMResult<BatchEncoding> {
        let max_length = options.max_length.or(self.options.model_max_length);
        let truncate = options.truncation != TruncationStrategy::DoNotTruncate;
        if truncate && max_length.is_none() {
            return Err(PMError::InvalidOptions(format!(
                "{} truncation requires max_length or model_max_length",
                options.truncation
            )));
        }

        let mut rows = Vec::with_capacity(sequences.len());
        for (mut first, mut second) in sequences {
            let total = first.len() + second.as_ref().map_or(0, Vec::len);
            let num_tokens_to_remove = match max_length {
                Some(max) if truncate => total.saturating_sub(max),
                _ => 0,
            };
            let overflow = truncate_sequences(
                &mut first,
                second.as_mut(),
                num_tokens_to_remove,
                options.truncation,
                options.stride,
            )?;
            let row = EncodedRow::new(first, second, overflow, num_tokens_to_remove);
            self.check_sequence_length(row.len());
            rows.push(row);
        }

        let target = match options.effective_padding() {
            PaddingStrategy::DoNotPad => None,
            PaddingStrategy::Longest => Some(rows.iter().map(EncodedRow::len).max().unwrap_or(0)),
            PaddingStrategy::MaxLength => Some(max_length.ok_or_else(|| {
                PMError::InvalidOptions(
                    "max_length padding requires max_length or model_max_length".to_string(),
                )
            })?),
        };
        if let Some(mut target) = target {
            if let Some(multiple) = options.pad_to_multiple_of
                && multiple > 0
                && target % multiple != 0
            {
                target = (target / multiple + 1) * multiple;
            }
            let pad_id = self.pad_token_id().ok_or_else(|| {
                PMError::InvalidOptions("padding requires a pad token".to_string())
            })?;
            let side = options.padding_side.unwrap_or(self.options.padding_side);
            for row in &mut rows {
                row.pad(target, pad_id, side);
            }
        }

        let fields = FieldSelection {
            attention_mask: options
                .return_attention_mask
                .unwrap_or_else(|| self.options.is_model_input("attention_mask")),
            token_type_ids: options
                .return_token_type_ids
                .unwrap_or_else(|| self.options.is_model_input("token_type_ids")),
            special_tokens_mask: options.return_special_tokens_mask,
            overflowing_tokens: options.return_overflowing_tokens,
        };
        Ok(BatchEncoding::collate(rows, fields))
    }

    /// Decode ids to text.
    ///
    /// Added tokens render verbatim, separated by spaces from the decoded
    /// model pieces around them.
    ///
    /// ## Errors
    /// [`PMError::TokenIdOutOfRange`] for ids beyond [`Self::len`].
    pub fn decode(
        &self,
        ids: &[TokenId],
        skip_special_tokens: bool,
        clean_up_tokenization_spaces: bool,
    ) -> PMResult<String> {
        let tokens = self.convert_ids_to_tokens(ids, skip_special_tokens)?;

        let mut sub_texts: Vec<String> = Vec::new();
        let mut current: Vec<String> = Vec::new();
        for token in tokens {
            if self.added.get(&token).is_some() {
                if !current.is_empty() {
                    sub_texts.push(self.convert_tokens_to_string(&current));
                    current.clear();
                }
                sub_texts.push(token);
            } else {
                current.push(token);
            }
        }
        if !current.is_empty() {
            sub_texts.push(self.convert_tokens_to_string(&current));
        }

        let text = sub_texts.join(" ");
        Ok(if clean_up_tokenization_spaces {
            clean_up_tokenization(&text)
        } else {
            text
        })
    }

    /// Decode a batch of id sequences.
    pub fn batch_decode<S: AsRef<[TokenId]>>(
        &self,
        batch: &[S],
        skip_special_tokens: bool,
        clean_up_tokenization_spaces: bool,
    ) -> PMResult<Vec<String>> {
        batch
            .iter()
            .map(|ids| self.decode(ids.as_ref(), skip_special_tokens, clean_up_tokenization_spaces))
            .collect()
    }
}

/// Remove spaces before punctuation and English contractions.
pub fn clean_up_tokenization(text: &str) -> String {
    const RULES: [(&str, &str); 10] = [
        (" .", "."),
        (" ?", "?"),
        (" !", "!"),
        (" ,", ","),
        (" ' ", "'"),
        (" n't", "n't"),
        (" 'm", "'m"),
        (" 's", "'s"),
        (" 've", "'ve"),
        (" 're", "'re"),
    ];
    RULES
        .iter()
        .fold(text.to_string(), |acc, (from, to)| acc.replace(from, to))
}
