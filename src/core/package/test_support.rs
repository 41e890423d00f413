//! Local filesystem with injectable failures, for exercising warning paths.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::local_files::{FileSystem, Listing, LocalFs, UnreadableDir};

#[derive(Default)]
pub(crate) struct FaultyFs {
    pub inner: LocalFs,
    /// Writes and copies to a file with this name fail.
    pub fail_write: Option<&'static str>,
    /// Reads of a file with this name fail.
    pub fail_read: Option<&'static str>,
    /// Listing this directory fails outright.
    pub fail_list: Option<PathBuf>,
    /// Creating this directory fails.
    pub fail_ensure: Option<PathBuf>,
    /// Reported as an unreadable subdirectory by any listing that contains it.
    pub unreadable: Option<PathBuf>,
}

fn named(path: &Path, name: Option<&'static str>) -> bool {
    name.is_some_and(|name| path.file_name().is_some_and(|n| n == name))
}

fn denied(path: &Path) -> Error {
    Error::internal_io("permission denied", Some(path.display().to_string()))
}

impl FileSystem for FaultyFs {
    fn exists(&self, path: &Path) -> bool {
        self.inner.exists(path)
    }
    fn is_file(&self, path: &Path) -> bool {
        self.inner.is_file(path)
    }
    fn is_dir(&self, path: &Path) -> bool {
        self.inner.is_dir(path)
    }
    fn read(&self, path: &Path) -> Result<String> {
        if named(path, self.fail_read) {
            return Err(denied(path));
        }
        self.inner.read(path)
    }
    fn write(&self, path: &Path, content: &str) -> Result<()> {
        if named(path, self.fail_write) {
            return Err(Error::internal_io("disk full", None));
        }
        self.inner.write(path, content)
    }
    fn copy(&self, from: &Path, to: &Path) -> Result<()> {
        if named(to, self.fail_write) {
            return Err(Error::internal_io("disk full", None));
        }
        self.inner.copy(from, to)
    }
    fn list_recursive(&self, root: &Path) -> Result<Listing> {
        if self.fail_list.as_deref() == Some(root) {
            return Err(denied(root));
        }

        let mut listing = self.inner.list_recursive(root)?;
        if let Some(hidden) = self.unreadable.as_ref().filter(|h| h.starts_with(root)) {
            listing.files.retain(|f| !root.join(f).starts_with(hidden));
            listing.unreadable.push(UnreadableDir {
                path: hidden.clone(),
                error: "permission denied".to_string(),
            });
        }
        Ok(listing)
    }
    fn list_dirs(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        self.inner.list_dirs(dir)
    }
    fn is_empty_dir(&self, dir: &Path) -> bool {
        self.inner.is_empty_dir(dir)
    }
    fn delete(&self, path: &Path) -> Result<()> {
        self.inner.delete(path)
    }
    fn remove_empty_dir(&self, dir: &Path) -> Result<()> {
        self.inner.remove_empty_dir(dir)
    }
    fn ensure_dir(&self, dir: &Path) -> Result<()> {
        if self.fail_ensure.as_deref() == Some(dir) {
            return Err(denied(dir));
        }
        self.inner.ensure_dir(dir)
    }
}
