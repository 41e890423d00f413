//! Project-wide textual rewrite of references to a namespace.
//!
//! This is a text substitution, not a refactor: a qualified name inside a
//! string literal or comment is rewritten like any other occurrence.

use regex::Regex;
use serde::Serialize;
use std::path::{Path, PathBuf};

use super::codec::Namespace;
use super::scanner::is_source_file;
use super::types::{RenameWarning, WarningKind};
use crate::error::Result;
use crate::local_files::FileSystem;
use crate::utils::parser::{capture_ranges, compile, escape_literal, replace_ranges};

/// Knobs for [`rewrite_project`].
#[derive(Debug, Clone, Default)]
pub struct RewriteOptions {
    pub extensions: Vec<String>,
    /// Globs matched against paths relative to each source dir.
    pub exclude: Vec<String>,
    pub dry_run: bool,
}

/// A file whose content changed (or would change, in a dry run).
#[derive(Debug, Clone, Serialize)]
pub struct FileRewrite {
    pub file: String,
    pub replacements: usize,
}

#[derive(Debug, Clone, Serialize, Default)]
pub struct ReferenceReport {
    pub files_scanned: usize,
    pub edits: Vec<FileRewrite>,
    pub total_replacements: usize,
    pub warnings: Vec<RenameWarning>,
    pub applied: bool,
}

/// Result of rewriting one attribute in a descriptor file.
#[derive(Debug, Clone, Serialize)]
pub struct DescriptorRewrite {
    pub file: String,
    pub key: String,
    pub replacements: usize,
    pub applied: bool,
}

/// The three reference shapes, each capturing the old namespace as `ns`.
struct ReferencePatterns {
    declaration: Regex,
    import: Regex,
    qualified: Regex,
}

impl ReferencePatterns {
    fn new(old: &Namespace) -> Result<Self> {
        let old = escape_literal(old.as_str());

        Ok(Self {
            declaration: compile(
                &format!(r"(?m)^package[ \t]+(?P<ns>{})[ \t]*;?[ \t]*\r?$", old),
                "package declaration",
            )?,
            import: compile(
                &format!(
                    r"(?m)^import[ \t]+(?:static[ \t]+)?(?P<ns>{})[ \t]*;?[ \t]*\r?$",
                    old
                ),
                "import",
            )?,
            // Left guard keeps `org.com.acme.` and `xcom.acme.` out
            qualified: compile(
                &format!(r"(?:^|[^\w$.])(?P<ns>{})\.", old),
                "qualified reference",
            )?,
        })
    }
}

/// Rewrite references to `old` in one file's content.
/// Returns (new_content, replacement_count).
pub fn rewrite_references(
    content: &str,
    old: &Namespace,
    new: &Namespace,
) -> Result<(String, usize)> {
    let patterns = ReferencePatterns::new(old)?;
    Ok(rewrite_with(&patterns, content, new))
}

fn rewrite_with(patterns: &ReferencePatterns, content: &str, new: &Namespace) -> (String, usize) {
    let ranges = capture_ranges(
        &[&patterns.declaration, &patterns.import, &patterns.qualified],
        "ns",
        content,
    );
    let count = ranges.len();
    if count == 0 {
        return (content.to_string(), 0);
    }
    (replace_ranges(content, ranges, new.as_str()), count)
}

fn is_excluded(relative: &Path, exclude: &[String]) -> bool {
    let relative = relative.to_string_lossy().replace('\\', "/");
    exclude
        .iter()
        .any(|pattern| glob_match::glob_match(pattern, &relative))
}

/// Rewrite declarations, imports and qualified references of `old` in every
/// source file under `source_dirs`. Files whose content doesn't change are
/// left alone.
pub fn rewrite_project(
    fs: &dyn FileSystem,
    source_dirs: &[PathBuf],
    old: &Namespace,
    new: &Namespace,
    options: &RewriteOptions,
) -> Result<ReferenceReport> {
    let mut report = ReferenceReport {
        applied: !options.dry_run,
        ..ReferenceReport::default()
    };

    if old == new {
        return Ok(report);
    }

    let patterns = ReferencePatterns::new(old)?;

    for dir in source_dirs {
        let listing = match fs.list_recursive(dir) {
            Ok(listing) => listing,
            Err(e) => {
                report.warnings.push(RenameWarning::new(
                    WarningKind::ReadFailed,
                    dir.display().to_string(),
                    e.describe(),
                ));
                continue;
            }
        };

        report
            .warnings
            .extend(listing.unreadable.iter().map(RenameWarning::unreadable_dir));

        for relative in listing.files {
            if !is_source_file(&relative, &options.extensions)
                || is_excluded(&relative, &options.exclude)
            {
                continue;
            }

            let path = dir.join(&relative);
            report.files_scanned += 1;

            let content = match fs.read(&path) {
                Ok(content) => content,
                Err(e) => {
                    report.warnings.push(RenameWarning::new(
                        WarningKind::ReadFailed,
                        path.display().to_string(),
                        e.describe(),
                    ));
                    continue;
                }
            };

            let (rewritten, replacements) = rewrite_with(&patterns, &content, new);
            if replacements == 0 || rewritten == content {
                continue;
            }

            if !options.dry_run {
                if let Err(e) = fs.write(&path, &rewritten) {
                    report.warnings.push(RenameWarning::new(
                        WarningKind::WriteFailed,
                        path.display().to_string(),
                        e.describe(),
                    ));
                    continue;
                }
            }

            report.total_replacements += replacements;
            report.edits.push(FileRewrite {
                file: path.display().to_string(),
                replacements,
            });
        }
    }

    log_status!(
        "references",
        "{} reference(s) in {} of {} file(s)",
        report.total_replacements,
        report.edits.len(),
        report.files_scanned
    );

    Ok(report)
}

/// Rewrite `key = "old"` (also `key "old"`, `key="old"`, `key: 'old'`) to
/// the new literal. The quoted value must equal `old_literal` exactly.
pub fn rewrite_descriptor(
    fs: &dyn FileSystem,
    path: &Path,
    key: &str,
    old_literal: &str,
    new_literal: &str,
    dry_run: bool,
) -> Result<DescriptorRewrite> {
    let mut outcome = DescriptorRewrite {
        file: path.display().to_string(),
        key: key.to_string(),
        replacements: 0,
        applied: !dry_run,
    };

    if old_literal == new_literal {
        return Ok(outcome);
    }

    let content = fs.read(path)?;

    let key = escape_literal(key);
    let value = escape_literal(old_literal);
    let quoted = |quote: char| {
        compile(
            &format!(
                r"(?:^|[^\w.$-]){}[ \t]*[=:]?[ \t]*{q}(?P<value>{}){q}",
                key,
                value,
                q = quote
            ),
            "descriptor attribute",
        )
    };
    let double = quoted('"')?;
    let single = quoted('\'')?;

    let ranges = capture_ranges(&[&double, &single], "value", &content);

    outcome.replacements = ranges.len();
    if ranges.is_empty() {
        return Ok(outcome);
    }

    if !dry_run {
        fs.write(path, &replace_ranges(&content, ranges, new_literal))?;
    }

    log_status!(
        "descriptor",
        "{}: {} '{}' → '{}'",
        path.display(),
        outcome.key,
        old_literal,
        new_literal
    );

    Ok(outcome)
}
