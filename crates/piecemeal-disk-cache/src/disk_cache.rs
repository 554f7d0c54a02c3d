//! # Piecemeal Disk Cache

use std::{
    env,
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context;
use downloader::{Download, Downloader};

use crate::{
    PIECEMEAL_CACHE_DIRS,
    PIECEMEAL_OFFLINE,
    cache_dirs::{DirKind, join_context},
};

/// Options for [`PiecemealDiskCache`].
#[derive(Clone, Default, Debug)]
pub struct PiecemealDiskCacheOptions {
    /// Optional path to the cache directory.
    pub cache_dir: Option<PathBuf>,

    /// Optional path to the data directory.
    pub data_dir: Option<PathBuf>,

    /// Never touch the network; only already-cached files resolve.
    ///
    /// Also forced on by a non-empty `PIECEMEAL_OFFLINE` environment variable.
    pub offline: bool,

    /// Optional [`Downloader`] builder.
    pub downloader: Option<fn() -> Downloader>,
}

impl PiecemealDiskCacheOptions {
    /// Set the cache directory.
    pub fn with_cache_dir<P: AsRef<Path>>(
        mut self,
        cache_dir: Option<P>,
    ) -> Self {
        self.cache_dir = cache_dir.map(|p| p.as_ref().to_path_buf());
        self
    }

    /// Set the data directory.
    pub fn with_data_dir<P: AsRef<Path>>(
        mut self,
        data_dir: Option<P>,
    ) -> Self {
        self.data_dir = data_dir.map(|p| p.as_ref().to_path_buf());
        self
    }

    /// Set offline mode.
    pub fn with_offline(
        mut self,
        offline: bool,
    ) -> Self {
        self.offline = offline;
        self
    }

    /// Set the downloader builder.
    pub fn with_downloader(
        mut self,
        downloader: Option<fn() -> Downloader>,
    ) -> Self {
        self.downloader = downloader;
        self
    }
}

/// Disk cache for downloaded tokenizer files.
///
/// Files are addressed by a `context` (usually the repository id split on
/// `/`) and a file name, so `google/reformer-crime-and-punishment` +
/// `spiece.model` lands at
/// `{cache_dir}/google/reformer-crime-and-punishment/spiece.model`.
pub struct PiecemealDiskCache {
    cache_dir: PathBuf,
    data_dir: PathBuf,
    offline: bool,

    /// Built on first download.
    downloader: Option<Downloader>,
    downloader_builder: Option<fn() -> Downloader>,
}

impl Default for PiecemealDiskCache {
    fn default() -> Self {
        Self::new(PiecemealDiskCacheOptions::default())
            .expect("failed to resolve piecemeal cache directories")
    }
}

impl PiecemealDiskCache {
    /// Construct a new [`PiecemealDiskCache`].
    pub fn new(options: PiecemealDiskCacheOptions) -> anyhow::Result<Self> {
        let cache_dir = PIECEMEAL_CACHE_DIRS
            .resolve(DirKind::Cache, options.cache_dir)
            .context("failed to resolve cache directory")?;

        let data_dir = PIECEMEAL_CACHE_DIRS
            .resolve(DirKind::Data, options.data_dir)
            .context("failed to resolve data directory")?;

        let offline = options.offline
            || env::var_os(PIECEMEAL_OFFLINE).is_some_and(|v| !v.is_empty());

        Ok(Self {
            cache_dir,
            data_dir,
            offline,
            downloader: None,
            downloader_builder: options.downloader,
        })
    }

    /// Get the cache directory.
    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Get the data directory.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Is the cache restricted to already-downloaded files?
    pub fn is_offline(&self) -> bool {
        self.offline
    }

    /// Get the cache path for a file.
    ///
    /// * Does not check that the path exists.
    /// * Does not create the containing directories.
    pub fn cache_path<C, F>(
        &self,
        context: &[C],
        file: F,
    ) -> PathBuf
    where
        C: AsRef<Path>,
        F: AsRef<Path>,
    {
        join_context(&self.cache_dir, context, file)
    }

    /// Get the data path for a file.
    ///
    /// * Does not check that the path exists.
    /// * Does not create the containing directories.
    pub fn data_path<C, F>(
        &self,
        context: &[C],
        file: F,
    ) -> PathBuf
    where
        C: AsRef<Path>,
        F: AsRef<Path>,
    {
        join_context(&self.data_dir, context, file)
    }

    /// Is a non-empty file cached for this key?
    pub fn contains<C, F>(
        &self,
        context: &[C],
        file: F,
    ) -> bool
    where
        C: AsRef<Path>,
        F: AsRef<Path>,
    {
        let path = self.cache_path(context, file);
        fs::metadata(path).is_ok_and(|m| m.is_file() && m.len() > 0)
    }

    /// Remove a cached file, if present.
    ///
    /// ## Returns
    /// `true` if a file was removed.
    pub fn evict<C, F>(
        &self,
        context: &[C],
        file: F,
    ) -> anyhow::Result<bool>
    where
        C: AsRef<Path>,
        F: AsRef<Path>,
    {
        let path = self.cache_path(context, file);
        if !path.exists() {
            return Ok(false);
        }
        fs::remove_file(&path).with_context(|| format!("failed to remove {}", path.display()))?;
        Ok(true)
    }

    /// Resolve a cached file, downloading it from the first working mirror if needed.
    ///
    /// The download is written to a `.part` sibling and renamed into place, so an
    /// interrupted fetch never leaves a truncated file at the final path.
    ///
    /// ## Arguments
    /// * `context` - directories between the cache root and `file`.
    /// * `file` - the final file name.
    /// * `urls` - mirrors for the file.
    ///
    /// ## Errors
    /// * the file is absent and the cache is offline;
    /// * every mirror failed.
    pub fn fetch<C, F, S>(
        &mut self,
        context: &[C],
        file: F,
        urls: &[S],
    ) -> anyhow::Result<PathBuf>
    where
        C: AsRef<Path>,
        F: AsRef<Path>,
        S: AsRef<str>,
    {
        let path = self.cache_path(context, &file);
        if self.contains(context, &file) {
            log::debug!("cache hit: {}", path.display());
            return Ok(path);
        }

        if self.offline {
            anyhow::bail!("offline, and not cached: {}", path.display());
        }
        if urls.is_empty() {
            anyhow::bail!("no download urls for: {}", path.display());
        }

        let parent = path
            .parent()
            .with_context(|| format!("cache path has no parent: {}", path.display()))?;
        fs::create_dir_all(parent)?;

        let part = path.with_extension("part");
        let urls: Vec<&str> = urls.iter().map(|s| s.as_ref()).collect();
        let mut dl = Download::new_mirrored(&urls);
        dl.file_name = part.clone();

        log::info!("downloading {} -> {}", urls[0], path.display());
        let summaries = self.downloader()?.download(&[dl])?;
        for summary in summaries {
            summary.with_context(|| format!("download failed: {}", urls[0]))?;
        }

        fs::rename(&part, &path)
            .with_context(|| format!("failed to move {} into place", part.display()))?;

        Ok(path)
    }

    fn downloader(&mut self) -> anyhow::Result<&mut Downloader> {
        if self.downloader.is_none() {
            let downloader = match self.downloader_builder {
                Some(builder) => builder(),
                None => Downloader::builder().build()?,
            };
            self.downloader = Some(downloader);
        }
        self.downloader
            .as_mut()
            .context("downloader unavailable")
    }
}
