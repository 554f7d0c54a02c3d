//! # piecemeal-disk-cache
//!
//! Local storage for pretrained tokenizer resources.
//!
//! * [`CacheDirs`] decides where things live.
//! * [`PiecemealDiskCache`] fetches remote files into that location.
#![warn(missing_docs)]

pub mod cache_dirs;
pub mod disk_cache;

pub use cache_dirs::{CacheDirs, DirKind};
pub use disk_cache::{PiecemealDiskCache, PiecemealDiskCacheOptions};

/// Environment variable key to override the default cache directory.
pub const PIECEMEAL_CACHE_DIR: &str = "PIECEMEAL_CACHE_DIR";
/// Environment variable key to override the default data directory.
pub const PIECEMEAL_DATA_DIR: &str = "PIECEMEAL_DATA_DIR";
/// Environment variable which, when set to a non-empty value, disables downloads.
pub const PIECEMEAL_OFFLINE: &str = "PIECEMEAL_OFFLINE";

/// Default [`CacheDirs`] for piecemeal.
pub const PIECEMEAL_CACHE_DIRS: CacheDirs = CacheDirs {
    qualifier: "io.crates.piecemeal",
    organization: "",
    application: "piecemeal",
    cache_env_vars: &[PIECEMEAL_CACHE_DIR],
    data_env_vars: &[PIECEMEAL_DATA_DIR],
};
