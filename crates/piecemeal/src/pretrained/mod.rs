//! # Pretrained Tokenizers
//!
//! Named tokenizers whose model files are fetched through a
//! [`ResourceLoader`]; with the `download` feature, the
//! [`PiecemealDiskCache`](crate::disk_cache::PiecemealDiskCache) is one.
//!
//! ```rust,no_run
//! use piecemeal::{disk_cache::PiecemealDiskCache, pretrained::load_pretrained};
//!
//! fn example() -> piecemeal::errors::PMResult<()> {
//!     let mut disk_cache = PiecemealDiskCache::default();
//!     let tokenizer = load_pretrained("google/reformer-crime-and-punishment", &mut disk_cache)?;
//!     assert_eq!(tokenizer.vocab_size(), 320);
//!     Ok(())
//! }
//! ```

mod load_by_name;
mod resources;

#[doc(inline)]
pub use load_by_name::*;
#[doc(inline)]
pub use resources::*;
