//! Finding the directory that physically holds a namespace.

use std::path::{Path, PathBuf};

use super::codec::{to_path, Namespace};
use super::scanner::has_source_files;
use crate::local_files::FileSystem;

/// The most specific existing directory under `source_root` representing
/// `namespace`.
///
/// The full path wins if it exists. Otherwise the longest prefix directory
/// that holds at least one source file somewhere below it is returned, which
/// covers trees whose layout has drifted shallower than their declarations.
/// `None` means there is nothing to move.
pub fn locate(
    fs: &dyn FileSystem,
    source_root: &Path,
    namespace: &Namespace,
    extensions: &[String],
) -> Option<PathBuf> {
    let candidate = source_root.join(to_path(namespace));
    if fs.is_dir(&candidate) {
        return Some(candidate);
    }

    (1..=namespace.len()).rev().find_map(|k| {
        let prefix = namespace.prefix(k)?;
        let dir = source_root.join(to_path(&prefix));
        (fs.is_dir(&dir) && has_source_files(fs, &dir, extensions)).then_some(dir)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::local_files::local;
    use tempfile::tempdir;

    fn exts() -> Vec<String> {
        vec!["java".to_string(), "kt".to_string()]
    }

    fn ns(s: &str) -> Namespace {
        Namespace::parse(s).unwrap()
    }

    #[test]
    fn exact_directory_is_preferred() {
        let dir = tempdir().unwrap();
        let fs = local();
        fs.write(&dir.path().join("com/acme/app/Main.kt"), "package com.acme.app\n")
            .unwrap();

        let found = locate(&fs, dir.path(), &ns("com.acme.app"), &exts());
        assert_eq!(found, Some(dir.path().join("com/acme/app")));
    }

    #[test]
    fn exact_directory_counts_even_without_sources() {
        let dir = tempdir().unwrap();
        let fs = local();
        fs.ensure_dir(&dir.path().join("com/acme/app")).unwrap();

        let found = locate(&fs, dir.path(), &ns("com.acme.app"), &exts());
        assert_eq!(found, Some(dir.path().join("com/acme/app")));
    }

    #[test]
    fn falls_back_to_shallower_directory_with_sources() {
        let dir = tempdir().unwrap();
        let fs = local();
        fs.write(&dir.path().join("com/acme/Main.kt"), "package com.acme.app\n")
            .unwrap();

        let found = locate(&fs, dir.path(), &ns("com.acme.app"), &exts());
        assert_eq!(found, Some(dir.path().join("com/acme")));
    }

    #[test]
    fn prefix_without_sources_is_skipped() {
        let dir = tempdir().unwrap();
        let fs = local();
        fs.write(&dir.path().join("com/acme/readme.txt"), "docs").unwrap();
        fs.write(&dir.path().join("com/Root.java"), "package com;\n").unwrap();

        let found = locate(&fs, dir.path(), &ns("com.acme.app"), &exts());
        assert_eq!(found, Some(dir.path().join("com")));
    }

    #[test]
    fn nothing_found() {
        let dir = tempdir().unwrap();
        let fs = local();
        fs.write(&dir.path().join("org/Other.kt"), "package org\n").unwrap();

        assert!(locate(&fs, dir.path(), &ns("com.acme.app"), &exts()).is_none());
    }
}
