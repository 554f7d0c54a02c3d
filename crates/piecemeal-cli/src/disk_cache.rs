use piecemeal::disk_cache::{PiecemealDiskCache, PiecemealDiskCacheOptions};

/// Disk cache argument group.
#[derive(clap::Args, Debug)]
pub struct DiskCacheArgs {
    /// Cache directory.
    #[arg(long, default_value = None)]
    cache_dir: Option<String>,

    /// Only use already-downloaded files.
    #[arg(long)]
    offline: bool,
}

impl DiskCacheArgs {
    /// Initialize the disk cache.
    pub fn init_disk_cache(&self) -> Result<PiecemealDiskCache, Box<dyn std::error::Error>> {
        let mut options = PiecemealDiskCacheOptions::default();

        if let Some(cache_dir) = &self.cache_dir {
            options = options.with_cache_dir(Some(cache_dir.clone()));
        }
        if self.offline {
            options = options.with_offline(true);
        }

        Ok(PiecemealDiskCache::new(options)?)
    }
}
