use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Result of a recursive walk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Listing {
    /// Paths relative to the walked root, sorted.
    pub files: Vec<PathBuf>,
    /// Subdirectories that could not be read; their contents are missing from `files`.
    pub unreadable: Vec<UnreadableDir>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnreadableDir {
    pub path: PathBuf,
    pub error: String,
}

/// Primitive filesystem operations the package engine is built on.
///
/// Everything in `crate::package` goes through this trait, so the engine can
/// be driven against a different host (or a fault-injecting wrapper in tests).
pub trait FileSystem {
    fn exists(&self, path: &Path) -> bool;
    fn is_file(&self, path: &Path) -> bool;
    fn is_dir(&self, path: &Path) -> bool;
    fn read(&self, path: &Path) -> Result<String>;
    /// Replace `path` with `content`, creating parent directories as needed.
    /// Readers observe either the old file or the new one, never a mixture.
    fn write(&self, path: &Path, content: &str) -> Result<()>;
    /// Byte-for-byte copy, creating parent directories as needed.
    fn copy(&self, from: &Path, to: &Path) -> Result<()>;
    /// Every file below `root`, as paths relative to `root`, sorted.
    /// A missing root yields an empty listing; an unreadable root is an error,
    /// an unreadable subdirectory is reported in [`Listing::unreadable`].
    fn list_recursive(&self, root: &Path) -> Result<Listing>;
    /// Immediate subdirectories of `dir`, sorted.
    fn list_dirs(&self, dir: &Path) -> Result<Vec<PathBuf>>;
    fn is_empty_dir(&self, dir: &Path) -> bool;
    fn delete(&self, path: &Path) -> Result<()>;
    /// Remove `dir`, failing if it still has entries.
    fn remove_empty_dir(&self, dir: &Path) -> Result<()>;
    fn ensure_dir(&self, dir: &Path) -> Result<()>;
}

/// Local filesystem implementation
pub struct LocalFs;

impl LocalFs {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LocalFs {
    fn default() -> Self {
        Self::new()
    }
}

fn temp_sibling(path: &Path, context: &str) -> Result<PathBuf> {
    let parent = path.parent().ok_or_else(|| {
        Error::internal_io(
            format!("Invalid path: {}", path.display()),
            Some(context.to_string()),
        )
    })?;

    let filename = path.file_name().ok_or_else(|| {
        Error::internal_io(
            format!("Invalid path: {}", path.display()),
            Some(context.to_string()),
        )
    })?;

    Ok(parent.join(format!("{}.tmp", filename.to_string_lossy())))
}

fn create_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(|e| {
                Error::internal_io(e.to_string(), Some(format!("create {}", parent.display())))
            })?;
        }
    }
    Ok(())
}

/// Move a finished temp file over its destination, cleaning up on failure.
fn commit_temp(tmp_path: &Path, path: &Path) -> Result<()> {
    fs::rename(tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(tmp_path);
        Error::internal_io(e.to_string(), Some(format!("rename into {}", path.display())))
    })
}

fn collect_files(dir: &Path, root: &Path, listing: &mut Listing) -> std::io::Result<()> {
    for entry in fs::read_dir(dir)?.flatten() {
        let path = entry.path();
        // file_type() does not follow symlinks, so link cycles can't recurse forever
        let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);

        if is_dir {
            if let Err(e) = collect_files(&path, root, listing) {
                log_status!("fs", "Skipping unreadable directory {}: {}", path.display(), e);
                listing.unreadable.push(UnreadableDir {
                    path,
                    error: e.to_string(),
                });
            }
        } else if let Ok(relative) = path.strip_prefix(root) {
            listing.files.push(relative.to_path_buf());
        }
    }
    Ok(())
}

impl FileSystem for LocalFs {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn read(&self, path: &Path) -> Result<String> {
        fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::internal_io(
                    format!("File not found: {}", path.display()),
                    Some("read file".to_string()),
                )
            } else {
                Error::internal_io(e.to_string(), Some(format!("read {}", path.display())))
            }
        })
    }

    fn write(&self, path: &Path, content: &str) -> Result<()> {
        // Atomic write: write to temp file, then rename
        let tmp_path = temp_sibling(path, "write file")?;
        create_parent(path)?;

        fs::write(&tmp_path, content).map_err(|e| {
            let _ = fs::remove_file(&tmp_path);
            Error::internal_io(e.to_string(), Some("write temp file".to_string()))
        })?;

        commit_temp(&tmp_path, path)
    }

    fn copy(&self, from: &Path, to: &Path) -> Result<()> {
        let tmp_path = temp_sibling(to, "copy file")?;
        create_parent(to)?;

        fs::copy(from, &tmp_path).map_err(|e| {
            let _ = fs::remove_file(&tmp_path);
            Error::internal_io(
                e.to_string(),
                Some(format!("copy {} → {}", from.display(), to.display())),
            )
        })?;

        commit_temp(&tmp_path, to)
    }

    fn list_recursive(&self, root: &Path) -> Result<Listing> {
        if !root.is_dir() {
            return Ok(Listing::default());
        }

        let mut listing = Listing::default();
        collect_files(root, root, &mut listing).map_err(|e| {
            Error::internal_io(e.to_string(), Some(format!("list {}", root.display())))
        })?;

        listing.files.sort();
        listing.unreadable.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(listing)
    }

    fn list_dirs(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        if !dir.is_dir() {
            return Ok(Vec::new());
        }

        let entries = fs::read_dir(dir)
            .map_err(|e| Error::internal_io(e.to_string(), Some("list directory".to_string())))?;

        let mut dirs: Vec<PathBuf> = entries
            .flatten()
            .filter(|entry| entry.file_type().map(|t| t.is_dir()).unwrap_or(false))
            .map(|entry| entry.path())
            .collect();

        dirs.sort();
        Ok(dirs)
    }

    fn is_empty_dir(&self, dir: &Path) -> bool {
        fs::read_dir(dir)
            .map(|mut entries| entries.next().is_none())
            .unwrap_or(false)
    }

    fn delete(&self, path: &Path) -> Result<()> {
        if !path.exists() {
            return Err(Error::internal_io(
                format!("File not found: {}", path.display()),
                Some("delete file".to_string()),
            ));
        }

        fs::remove_file(path)
            .map_err(|e| Error::internal_io(e.to_string(), Some("delete file".to_string())))
    }

    fn remove_empty_dir(&self, dir: &Path) -> Result<()> {
        fs::remove_dir(dir).map_err(|e| {
            Error::internal_io(e.to_string(), Some(format!("remove {}", dir.display())))
        })
    }

    fn ensure_dir(&self, dir: &Path) -> Result<()> {
        if !dir.exists() {
            fs::create_dir_all(dir).map_err(|e| {
                Error::internal_io(e.to_string(), Some("create directory".to_string()))
            })?;
        }
        Ok(())
    }
}

/// Convenience function to get local filesystem
pub fn local() -> LocalFs {
    LocalFs::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_local_fs_write_read() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("test.txt");
        let fs = local();

        fs.write(&path, "hello world").unwrap();
        let content = fs.read(&path).unwrap();
        assert_eq!(content, "hello world");
        assert!(!dir.path().join("nested").join("test.txt.tmp").exists());
    }

    #[test]
    fn test_local_fs_list_recursive_sorted_relative() {
        let dir = tempdir().unwrap();
        let fs = local();

        fs.write(&dir.path().join("b/Two.kt"), "").unwrap();
        fs.write(&dir.path().join("a.txt"), "").unwrap();
        fs.write(&dir.path().join("b/a/One.kt"), "").unwrap();

        let listing = fs.list_recursive(dir.path()).unwrap();
        assert!(listing.unreadable.is_empty());
        assert_eq!(
            listing.files,
            vec![
                PathBuf::from("a.txt"),
                PathBuf::from("b/Two.kt"),
                PathBuf::from("b/a/One.kt"),
            ]
        );
    }

    #[test]
    fn test_local_fs_list_recursive_missing_root_is_empty() {
        let dir = tempdir().unwrap();
        let listing = local().list_recursive(&dir.path().join("nope")).unwrap();
        assert_eq!(listing, Listing::default());
    }

    #[test]
    fn test_local_fs_copy_is_byte_exact() {
        let dir = tempdir().unwrap();
        let from = dir.path().join("icon.png");
        let to = dir.path().join("out").join("icon.png");
        std::fs::write(&from, [0u8, 159, 146, 150, 255]).unwrap();

        local().copy(&from, &to).unwrap();
        assert_eq!(std::fs::read(&to).unwrap(), vec![0u8, 159, 146, 150, 255]);
    }

    #[test]
    fn test_local_fs_remove_empty_dir_refuses_non_empty() {
        let dir = tempdir().unwrap();
        let fs = local();
        fs.write(&dir.path().join("keep/file.txt"), "x").unwrap();

        assert!(fs.remove_empty_dir(&dir.path().join("keep")).is_err());
        assert!(!fs.is_empty_dir(&dir.path().join("keep")));

        fs.delete(&dir.path().join("keep/file.txt")).unwrap();
        assert!(fs.is_empty_dir(&dir.path().join("keep")));
        fs.remove_empty_dir(&dir.path().join("keep")).unwrap();
        assert!(!dir.path().join("keep").exists());
    }
}
