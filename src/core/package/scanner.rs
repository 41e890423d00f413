//! Declared-namespace extraction from source files.

use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

use super::codec::Namespace;
use crate::error::Result;
use crate::local_files::FileSystem;

// `package com.acme.app` at the very start of a line; a trailing `;` or
// comment is not part of the match
pub(crate) static DECLARATION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^package[ \t]+([\w$]+(?:\.[\w$]+)*)").unwrap()
});

/// Whether `path` has one of the recognized source extensions.
pub fn is_source_file(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| extensions.iter().any(|known| known == ext))
}

/// The namespace declared by the first `package` line of `content`.
pub fn extract_declared(content: &str) -> Option<Namespace> {
    let caps = DECLARATION_PATTERN.captures(content)?;
    Namespace::parse(caps.get(1)?.as_str()).ok()
}

/// First declared namespace among the source files below `root`, walking in
/// lexicographic path order. Unreadable files are skipped.
pub fn find_namespace_in_tree(
    fs: &dyn FileSystem,
    root: &Path,
    extensions: &[String],
) -> Result<Option<Namespace>> {
    for relative in fs.list_recursive(root)?.files {
        if !is_source_file(&relative, extensions) {
            continue;
        }

        let Ok(content) = fs.read(&root.join(&relative)) else {
            continue;
        };

        if let Some(namespace) = extract_declared(&content) {
            return Ok(Some(namespace));
        }
    }

    Ok(None)
}

/// Whether any recognized source file exists anywhere below `dir`.
pub fn has_source_files(fs: &dyn FileSystem, dir: &Path, extensions: &[String]) -> bool {
    fs.list_recursive(dir)
        .map(|listing| listing.files.iter().any(|f| is_source_file(f, extensions)))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::local_files::local;
    use tempfile::tempdir;

    fn exts() -> Vec<String> {
        vec!["java".to_string(), "kt".to_string()]
    }

    #[test]
    fn extracts_java_and_kotlin_declarations() {
        assert_eq!(
            extract_declared("package com.acme.app;\n\nclass Main {}\n").unwrap().as_str(),
            "com.acme.app"
        );
        assert_eq!(
            extract_declared("// header\npackage com.acme.app.ui\n\nclass Widget\n")
                .unwrap()
                .as_str(),
            "com.acme.app.ui"
        );
    }

    #[test]
    fn declaration_must_start_the_line() {
        assert!(extract_declared("  package com.acme;\n").is_none());
        assert!(extract_declared("// package com.acme\n").is_none());
        assert!(extract_declared("class Main {}\n").is_none());
    }

    #[test]
    fn first_declaration_wins() {
        let text = "package first.one\npackage second.one\n";
        assert_eq!(extract_declared(text).unwrap().as_str(), "first.one");
    }

    #[test]
    fn source_extension_check() {
        assert!(is_source_file(Path::new("a/B.kt"), &exts()));
        assert!(is_source_file(Path::new("B.java"), &exts()));
        assert!(!is_source_file(Path::new("B.kts"), &exts()));
        assert!(!is_source_file(Path::new("README"), &exts()));
    }

    #[test]
    fn finds_namespace_in_lexicographic_order() {
        let dir = tempdir().unwrap();
        let fs = local();
        fs.write(&dir.path().join("com/b/Late.kt"), "package com.b\n").unwrap();
        fs.write(&dir.path().join("com/a/Early.kt"), "package com.a\n").unwrap();
        fs.write(&dir.path().join("com/0/notes.txt"), "package com.zero\n").unwrap();

        let found = find_namespace_in_tree(&fs, dir.path(), &exts()).unwrap();
        assert_eq!(found.unwrap().as_str(), "com.a");
    }

    #[test]
    fn no_namespace_in_empty_tree() {
        let dir = tempdir().unwrap();
        let fs = local();
        assert!(find_namespace_in_tree(&fs, dir.path(), &exts()).unwrap().is_none());
        assert!(!has_source_files(&fs, dir.path(), &exts()));
    }
}
