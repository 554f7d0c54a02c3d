//! # Remote Resources

use std::path::{Path, PathBuf};

use crate::errors::{PMError, PMResult};

/// A remote file with constant mirror URLs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConstUrlResource {
    /// Mirrors, tried in order.
    pub urls: &'static [&'static str],
}

impl ConstUrlResource {
    /// Create a new [`ConstUrlResource`].
    pub const fn new(urls: &'static [&'static str]) -> Self {
        Self { urls }
    }
}

/// A resource together with where it lives in a local store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyedResource {
    /// Directories between the store root and the file.
    pub context: &'static [&'static str],

    /// The file name.
    pub file: &'static str,

    /// The remote source.
    pub resource: ConstUrlResource,
}

impl KeyedResource {
    /// The path of this resource below `root`.
    pub fn path_under<P: AsRef<Path>>(
        &self,
        root: P,
    ) -> PathBuf {
        let mut path = root.as_ref().to_path_buf();
        path.extend(self.context);
        path.push(self.file);
        path
    }
}

/// Resolves resources to local files.
pub trait ResourceLoader {
    /// Resolve a resource to a local path, fetching it if needed.
    fn load_resource_path(
        &mut self,
        resource: &KeyedResource,
    ) -> PMResult<PathBuf>;
}

#[cfg(feature = "download")]
impl ResourceLoader for crate::disk_cache::PiecemealDiskCache {
    fn load_resource_path(
        &mut self,
        resource: &KeyedResource,
    ) -> PMResult<PathBuf> {
        self.fetch(resource.context, resource.file, resource.resource.urls)
            .map_err(|e| PMError::External(format!("{e:#}")))
    }
}

/// Resolves resources inside an existing directory tree; never downloads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalResourceDir {
    root: PathBuf,
}

impl LocalResourceDir {
    /// Use `root` as the store root.
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// The store root.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ResourceLoader for LocalResourceDir {
    fn load_resource_path(
        &mut self,
        resource: &KeyedResource,
    ) -> PMResult<PathBuf> {
        let path = resource.path_under(&self.root);
        if path.is_file() {
            Ok(path)
        } else {
            Err(PMError::ResourceNotFound(path.display().to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use tempdir::TempDir;

    use super::*;

    const RESOURCE: KeyedResource = KeyedResource {
        context: &["org", "model"],
        file: "spiece.model",
        resource: ConstUrlResource::new(&["https://example.invalid/spiece.model"]),
    };

    #[test]
    fn test_local_dir() {
        let tmp = TempDir::new("piecemeal-resources").unwrap();
        let mut loader = LocalResourceDir::new(tmp.path());
        assert_eq!(loader.root(), tmp.path());

        assert!(matches!(
            loader.load_resource_path(&RESOURCE),
            Err(PMError::ResourceNotFound(_))
        ));

        let expected = tmp.path().join("org").join("model").join("spiece.model");
        assert_eq!(RESOURCE.path_under(tmp.path()), expected);
        std::fs::create_dir_all(expected.parent().unwrap()).unwrap();
        std::fs::write(&expected, b"x").unwrap();

        assert_eq!(loader.load_resource_path(&RESOURCE).unwrap(), expected);
    }
}
