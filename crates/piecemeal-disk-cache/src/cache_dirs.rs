//! # Cache Directory Resolution

use std::{
    env,
    path::{Path, PathBuf},
};

use directories_next::ProjectDirs;

/// Which of the two managed directories is being resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirKind {
    /// Re-downloadable files.
    Cache,

    /// User data that should survive a cache wipe.
    Data,
}

/// Static configuration for cache/data directory resolution.
pub struct CacheDirs {
    /// The qualifier for [`ProjectDirs`].
    pub qualifier: &'static str,

    /// The organization for [`ProjectDirs`].
    pub organization: &'static str,

    /// The application for [`ProjectDirs`].
    pub application: &'static str,

    /// Environment variables consulted for the cache dir; first set wins.
    pub cache_env_vars: &'static [&'static str],

    /// Environment variables consulted for the data dir; first set wins.
    pub data_env_vars: &'static [&'static str],
}

impl CacheDirs {
    /// Get the [`ProjectDirs`] for this config.
    pub fn project_dirs(&self) -> Option<ProjectDirs> {
        ProjectDirs::from(self.qualifier, self.organization, self.application)
    }

    /// The environment variables for a [`DirKind`], in priority order.
    pub fn env_vars(
        &self,
        kind: DirKind,
    ) -> &'static [&'static str] {
        match kind {
            DirKind::Cache => self.cache_env_vars,
            DirKind::Data => self.data_env_vars,
        }
    }

    /// Resolve a directory.
    ///
    /// Resolution Order:
    /// 1. `explicit`, if present.
    /// 2. ``env[$VAR]`` for each of [`Self::env_vars`]; empty values are skipped.
    /// 3. the platform project directory (`~/.cache/piecemeal` on Linux).
    /// 4. `None`
    pub fn resolve<P: AsRef<Path>>(
        &self,
        kind: DirKind,
        explicit: Option<P>,
    ) -> Option<PathBuf> {
        if let Some(path) = explicit {
            return Some(path.as_ref().to_path_buf());
        }

        let from_env = self
            .env_vars(kind)
            .iter()
            .filter_map(|var| env::var_os(var))
            .find(|value| !value.is_empty());
        if let Some(value) = from_env {
            return Some(PathBuf::from(value));
        }

        self.project_dirs().map(|pds| match kind {
            DirKind::Cache => pds.cache_dir().to_path_buf(),
            DirKind::Data => pds.data_dir().to_path_buf(),
        })
    }
}

/// Join `context` directories and a final `file` name onto `root`.
///
/// * Does not check that the path exists.
/// * Does not create the containing directories.
pub fn join_context<C, F>(
    root: &Path,
    context: &[C],
    file: F,
) -> PathBuf
where
    C: AsRef<Path>,
    F: AsRef<Path>,
{
    let mut path = root.to_path_buf();
    path.extend(context.iter().map(|c| c.as_ref()));
    path.push(file.as_ref());
    path
}

#[cfg(test)]
mod tests {
    use serial_test::serial;

    use super::*;

    const CACHE_HI: &str = "_PIECEMEAL_TEST_CACHE_HI";
    const CACHE_LO: &str = "_PIECEMEAL_TEST_CACHE_LO";
    const DATA_ONLY: &str = "_PIECEMEAL_TEST_DATA";

    const DIRS: CacheDirs = CacheDirs {
        qualifier: "io",
        organization: "crates",
        application: "piecemeal-test",
        cache_env_vars: &[CACHE_HI, CACHE_LO],
        data_env_vars: &[DATA_ONLY],
    };

    fn clear_env() {
        unsafe {
            for var in [CACHE_HI, CACHE_LO, DATA_ONLY] {
                env::remove_var(var);
            }
        }
    }

    #[test]
    #[serial]
    fn test_explicit_beats_env() {
        clear_env();
        unsafe { env::set_var(CACHE_HI, "/tmp/piecemeal/env") };

        assert_eq!(
            DIRS.resolve(DirKind::Cache, Some("/tmp/piecemeal/explicit")),
            Some(PathBuf::from("/tmp/piecemeal/explicit"))
        );

        clear_env();
    }

    #[test]
    #[serial]
    fn test_env_priority_order() {
        clear_env();
        let none: Option<PathBuf> = None;

        unsafe { env::set_var(CACHE_LO, "/tmp/piecemeal/lo") };
        assert_eq!(
            DIRS.resolve(DirKind::Cache, none.clone()),
            Some(PathBuf::from("/tmp/piecemeal/lo"))
        );

        unsafe { env::set_var(CACHE_HI, "/tmp/piecemeal/hi") };
        assert_eq!(
            DIRS.resolve(DirKind::Cache, none.clone()),
            Some(PathBuf::from("/tmp/piecemeal/hi"))
        );

        // An empty value falls through to the next variable.
        unsafe { env::set_var(CACHE_HI, "") };
        assert_eq!(
            DIRS.resolve(DirKind::Cache, none.clone()),
            Some(PathBuf::from("/tmp/piecemeal/lo"))
        );

        // Cache vars never leak into data resolution.
        let pds = DIRS.project_dirs().expect("no project dirs");
        assert_eq!(
            DIRS.resolve(DirKind::Data, none),
            Some(pds.data_dir().to_path_buf())
        );

        clear_env();
    }

    #[test]
    fn test_join_context() {
        let path = join_context(Path::new("/tmp/piecemeal"), &["google", "reformer"], "spiece.model");
        assert_eq!(
            path,
            PathBuf::from("/tmp/piecemeal/google/reformer/spiece.model")
        );
    }
}
