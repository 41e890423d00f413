//! Removal of directories emptied by a relocation.

use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::local_files::FileSystem;

/// Remove empty directories at and below `directory`, then walk up through
/// its ancestors removing each one that is now empty.
///
/// Stops at the first non-empty directory or at `boundary`, which is never
/// removed; nothing outside `boundary` is touched. `protected` paths and
/// their ancestors are kept even when empty. Returns the removed
/// directories, deepest first.
pub fn prune(
    fs: &dyn FileSystem,
    directory: &Path,
    boundary: &Path,
    protected: &[PathBuf],
) -> Result<Vec<PathBuf>> {
    let mut removed = Vec::new();

    if !directory.starts_with(boundary) || !fs.is_dir(directory) {
        return Ok(removed);
    }

    prune_children(fs, directory, protected, &mut removed)?;

    let mut current = directory.to_path_buf();
    while current != boundary
        && current.starts_with(boundary)
        && !is_protected(&current, protected)
        && fs.is_empty_dir(&current)
    {
        fs.remove_empty_dir(&current)?;
        removed.push(current.clone());

        match current.parent() {
            Some(parent) => current = parent.to_path_buf(),
            None => break,
        }
    }

    Ok(removed)
}

fn prune_children(
    fs: &dyn FileSystem,
    dir: &Path,
    protected: &[PathBuf],
    removed: &mut Vec<PathBuf>,
) -> Result<()> {
    for child in fs.list_dirs(dir)? {
        prune_children(fs, &child, protected, removed)?;

        if !is_protected(&child, protected) && fs.is_empty_dir(&child) {
            fs.remove_empty_dir(&child)?;
            removed.push(child);
        }
    }
    Ok(())
}

fn is_protected(dir: &Path, protected: &[PathBuf]) -> bool {
    protected.iter().any(|keep| keep.starts_with(dir))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::local_files::local;
    use tempfile::tempdir;

    #[test]
    fn removes_empty_chain_up_to_boundary() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("src");
        let fs = local();
        fs.ensure_dir(&root.join("com/acme/app/ui")).unwrap();

        let removed = prune(&fs, &root.join("com/acme/app"), &root, &[]).unwrap();

        assert_eq!(
            removed,
            vec![
                root.join("com/acme/app/ui"),
                root.join("com/acme/app"),
                root.join("com/acme"),
                root.join("com"),
            ]
        );
        assert!(root.exists(), "boundary must survive");
        assert!(!root.join("com").exists());
    }

    #[test]
    fn stops_at_non_empty_ancestor() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        let fs = local();
        fs.ensure_dir(&root.join("com/acme/app")).unwrap();
        fs.write(&root.join("com/acme/other/Keep.kt"), "package com.acme.other\n")
            .unwrap();

        let removed = prune(&fs, &root.join("com/acme/app"), root, &[]).unwrap();

        assert_eq!(removed, vec![root.join("com/acme/app")]);
        assert!(root.join("com/acme/other/Keep.kt").exists());
    }

    #[test]
    fn keeps_protected_directories() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        let fs = local();
        fs.ensure_dir(&root.join("com/acme/fresh")).unwrap();
        fs.ensure_dir(&root.join("com/acme/stale")).unwrap();

        let removed = prune(
            &fs,
            &root.join("com/acme"),
            root,
            &[root.join("com/acme/fresh")],
        )
        .unwrap();

        assert_eq!(removed, vec![root.join("com/acme/stale")]);
        assert!(root.join("com/acme/fresh").exists());
    }

    #[test]
    fn directory_outside_boundary_is_ignored() {
        let dir = tempdir().unwrap();
        let fs = local();
        fs.ensure_dir(&dir.path().join("outside/empty")).unwrap();
        fs.ensure_dir(&dir.path().join("src")).unwrap();

        let removed =
            prune(&fs, &dir.path().join("outside"), &dir.path().join("src"), &[]).unwrap();

        assert!(removed.is_empty());
        assert!(dir.path().join("outside/empty").exists());
    }

    #[test]
    fn boundary_itself_is_never_removed() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("src");
        let fs = local();
        fs.ensure_dir(&root).unwrap();

        let removed = prune(&fs, &root, &root, &[]).unwrap();
        assert!(removed.is_empty());
        assert!(root.exists());
    }
}
