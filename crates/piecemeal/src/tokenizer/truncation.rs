//! # Sequence Truncation

use crate::{
    errors::{PMError, PMResult},
    tokenizer::TruncationStrategy,
    types::TokenId,
};

/// Remove `num_tokens_to_remove` ids from a sequence (pair).
///
/// ## Arguments
/// * `first` - the first sequence.
/// * `second` - the optional second sequence.
/// * `num_tokens_to_remove` - how many ids to drop in total.
/// * `strategy` - which sequence(s) to shorten.
/// * `stride` - how many kept ids to repeat at the start of the overflow.
///
/// ## Returns
/// The overflowing ids of the truncated sequence, in their original order,
/// preceded by the stride window. With `LongestFirst` on a pair, only ids
/// removed from the first sequence overflow.
///
/// ## Errors
/// [`PMError::InvalidOptions`] when the selected sequence(s) are too short,
/// or when `OnlySecond` is requested without a second sequence.
pub fn truncate_sequences(
    first: &mut Vec<TokenId>,
    second: Option<&mut Vec<TokenId>>,
    num_tokens_to_remove: usize,
    strategy: TruncationStrategy,
    stride: usize,
) -> PMResult<Vec<TokenId>> {
    if num_tokens_to_remove == 0 || strategy == TruncationStrategy::DoNotTruncate {
        return Ok(Vec::new());
    }

    match (strategy, second) {
        (TruncationStrategy::LongestFirst, Some(second)) => {
            if first.len() + second.len() < num_tokens_to_remove {
                return Err(too_short(first.len() + second.len(), num_tokens_to_remove));
            }
            // Only ids dropped from the first sequence overflow; ties shorten
            // the second.
            let mut removed_first = 0;
            for _ in 0..num_tokens_to_remove {
                if first.len() - removed_first > second.len() {
                    removed_first += 1;
                } else {
                    second.pop();
                }
            }
            let keep = first.len() - removed_first;
            let window = stride.min(keep);
            let overflow = first[keep - window..].to_vec();
            first.truncate(keep);
            Ok(overflow)
        }
        (TruncationStrategy::LongestFirst | TruncationStrategy::OnlyFirst, _) => {
            truncate_tail(first, num_tokens_to_remove, stride)
        }
        (TruncationStrategy::OnlySecond, Some(second)) => {
            truncate_tail(second, num_tokens_to_remove, stride)
        }
        (TruncationStrategy::OnlySecond, None) => Err(PMError::InvalidOptions(
            "only_second truncation requires a sequence pair".to_string(),
        )),
        (TruncationStrategy::DoNotTruncate, _) => Ok(Vec::new()),
    }
}

fn truncate_tail(
    ids: &mut Vec<TokenId>,
    num_tokens_to_remove: usize,
    stride: usize,
) -> PMResult<Vec<TokenId>> {
    if ids.len() < num_tokens_to_remove {
        return Err(too_short(ids.len(), num_tokens_to_remove));
    }
    let window = (num_tokens_to_remove + stride).min(ids.len());
    let overflow = ids[ids.len() - window..].to_vec();
    ids.truncate(ids.len() - num_tokens_to_remove);
    Ok(overflow)
}

fn too_short(
    len: usize,
    num_tokens_to_remove: usize,
) -> PMError {
    PMError::InvalidOptions(format!(
        "sequence of length {len} is too short to remove {num_tokens_to_remove} tokens"
    ))
}
