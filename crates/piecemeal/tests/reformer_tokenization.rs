#![allow(missing_docs)]

//! End-to-end tokenization against the sample model and the pretrained
//! Reformer model.

use piecemeal::{
    EncodeOptions,
    PieceProcessor,
    ReformerTokenizer,
    disk_cache::{PiecemealDiskCache, PiecemealDiskCacheOptions},
    model::testing::sample_model,
    pretrained::{REFORMER_CRIME_AND_PUNISHMENT, load_pretrained},
    tokenizer::PaddingStrategy,
};
use tempdir::TempDir;

const SPIECE_UNDERLINE: &str = "\u{2581}";

/// Spell tokens with `_` standing in for the boundary marker.
fn spiece_tokens(tokens: &[&str]) -> Vec<String> {
    tokens
        .iter()
        .map(|t| t.replace('_', SPIECE_UNDERLINE))
        .collect()
}

fn sample_tokenizer() -> ReformerTokenizer {
    ReformerTokenizer::new(PieceProcessor::from_model(sample_model()).unwrap())
}

fn pretrained_tokenizer() -> ReformerTokenizer {
    let mut disk_cache = PiecemealDiskCache::default();
    load_pretrained("google/reformer-crime-and-punishment", &mut disk_cache).unwrap()
}

#[test]
fn test_full_tokenizer() {
    let tok = sample_tokenizer();

    let tokens = tok.tokenize("This is a test");
    assert_eq!(tokens, spiece_tokens(&["_This", "_is", "_a", "_t", "est"]));
    assert_eq!(tok.convert_tokens_to_ids(&tokens), vec![285, 46, 10, 170, 382]);

    let tokens = tok.tokenize("I was born in 92000, and this is falsé.");
    assert_eq!(
        tokens,
        spiece_tokens(&[
            "_I", "_was", "_b", "or", "n", "_in", "_", "9", "2", "0", "0", "0", ",", "_and",
            "_this", "_is", "_f", "al", "s", "é", ".",
        ])
    );

    let ids = tok.convert_tokens_to_ids(&tokens);
    assert_eq!(
        ids,
        vec![8, 21, 84, 55, 24, 19, 7, 0, 602, 347, 347, 347, 3, 12, 66, 46, 72, 80, 6, 0, 4]
    );

    // Unknown pieces come back as the unknown token.
    let back_tokens = tok.convert_ids_to_tokens(&ids, false).unwrap();
    assert_eq!(
        back_tokens,
        spiece_tokens(&[
            "_I", "_was", "_b", "or", "n", "_in", "_", "<unk>", "2", "0", "0", "0", ",", "_and",
            "_this", "_is", "_f", "al", "s", "<unk>", ".",
        ])
    );
}

#[test]
fn test_save_and_reload() {
    let tmp = TempDir::new("piecemeal-it-save").unwrap();

    let mut tok = sample_tokenizer().with_options(REFORMER_CRIME_AND_PUNISHMENT.options());
    tok.add_tokens(&["<extra>"]);
    tok.save_pretrained(tmp.path()).unwrap();

    let reloaded = ReformerTokenizer::from_pretrained_dir(tmp.path()).unwrap();
    assert_eq!(reloaded.len(), tok.len());
    assert_eq!(reloaded.options(), tok.options());
    assert_eq!(reloaded.get_vocab(), tok.get_vocab());
    assert_eq!(
        reloaded.get_vocab().last(),
        Some(&("<extra>".to_string(), 1001))
    );

    let text = "This is <extra> a test";
    assert_eq!(reloaded.tokenize(text), tok.tokenize(text));
    assert_eq!(reloaded.encode_ids(text), vec![285, 46, 1001, 10, 170, 382]);
}

#[test]
fn test_batch_tensors() {
    let tok = sample_tokenizer();
    let options = EncodeOptions::default().with_return_tensors(true);
    let batch = tok
        .batch_encode_plus(&["This is a test", "a test", "This"], &options)
        .unwrap();

    assert!(batch.is_rectangular());
    let ids = batch.tensor("input_ids").unwrap();
    assert_eq!(ids.shape(), [3, 5]);
    assert_eq!(ids.row(1), Some(&[10i64, 170, 382, 1000, 1000][..]));

    let mask = batch.tensor("attention_mask").unwrap();
    assert_eq!(mask.row(2), Some(&[1i64, 0, 0, 0, 0][..]));
    assert!(batch.tensor("token_type_ids").is_err());

    let options = EncodeOptions::default()
        .with_padding(PaddingStrategy::MaxLength)
        .with_max_length(Some(8));
    let batch = tok.batch_encode_plus(&["This is a test"], &options).unwrap();
    assert_eq!(batch.input_ids[0], vec![285, 46, 10, 170, 382, 1000, 1000, 1000]);
}

#[test]
fn test_offline_disk_cache_miss() {
    let tmp = TempDir::new("piecemeal-it-cache").unwrap();
    let mut disk_cache = PiecemealDiskCache::new(
        PiecemealDiskCacheOptions::default()
            .with_cache_dir(Some(tmp.path().join("cache")))
            .with_data_dir(Some(tmp.path().join("data")))
            .with_offline(true),
    )
    .unwrap();

    assert!(load_pretrained("google/reformer-crime-and-punishment", &mut disk_cache).is_err());

    // A model placed in the cache is used without downloading.
    let model = REFORMER_CRIME_AND_PUNISHMENT.model;
    let path = disk_cache.cache_path(model.context, model.file);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, sample_model().to_bytes()).unwrap();

    let tok = load_pretrained("reformer-crime-and-punishment", &mut disk_cache).unwrap();
    assert_eq!(tok.encode_ids("This is a test"), vec![285, 46, 10, 170, 382]);
    assert_eq!(tok.options().model_max_length, Some(524288));
}

#[test]
#[ignore = "downloads google/reformer-crime-and-punishment"]
fn test_pretrained_sizes() {
    let tok = pretrained_tokenizer();
    assert_eq!(tok.vocab_size(), 320);
    assert_eq!(tok.len(), 321);
    assert_eq!(tok.pad_token_id(), Some(320));
}

#[test]
#[ignore = "downloads google/reformer-crime-and-punishment"]
fn test_pretrained_easy_symbols() {
    let tok = pretrained_tokenizer();
    assert_eq!(tok.encode_ids("Hello World!"), vec![126, 32, 262, 152, 38, 72, 287]);
}

#[test]
#[ignore = "downloads google/reformer-crime-and-punishment"]
fn test_pretrained_hard_symbols() {
    let tok = pretrained_tokenizer();
    let symbols = "This is a very long text with a lot of weird characters, such as: . , ~ ? ( ) \" [ ] ! : - . Also we will add words that should not exsist and be tokenized to <unk>, such as saoneuhaoesuth";
    let expected = vec![
        108, 265, 24, 111, 4, 258, 156, 35, 28, 275, 3, 259, 297, 260, 84, 4, 35, 110, 44, 8, 259,
        91, 268, 21, 11, 209, 274, 109, 266, 277, 117, 86, 93, 315, 258, 278, 258, 277, 258, 0,
        258, 288, 258, 319, 258, 0, 258, 0, 258, 0, 258, 0, 258, 287, 258, 315, 258, 289, 258,
        278, 99, 269, 266, 262, 8, 259, 241, 4, 217, 230, 268, 266, 55, 168, 106, 75, 193, 266,
        223, 27, 49, 26, 282, 25, 264, 299, 19, 26, 0, 258, 277, 117, 86, 93, 176, 183, 270, 11,
        262, 42, 61, 265,
    ];
    assert_eq!(tok.encode_ids(symbols), expected);
}

#[test]
#[ignore = "downloads google/reformer-crime-and-punishment"]
fn test_pretrained_batch_of_first_pieces() {
    let tok = pretrained_tokenizer();
    let first_ten: Vec<String> = tok
        .get_vocab()
        .into_iter()
        .take(10)
        .map(|(piece, _)| piece)
        .collect();
    let sequence = first_ten.join(" ");

    let options = EncodeOptions::default().with_return_tensors(true);
    let batch = tok
        .batch_encode_plus(&[sequence.as_str(), sequence.as_str()], &options)
        .unwrap();
    let ids = batch.tensor("input_ids").unwrap();
    assert_eq!(ids.shape()[0], 2);
    assert!(ids.as_slice().iter().all(|&id| id < tok.len() as i64));
}
