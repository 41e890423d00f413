//! Moving a namespace subtree while rewriting each file's own declaration.
//!
//! Relocation is file-granular best effort: a file that can't be read or
//! written stays where it was and becomes a warning. An original is deleted
//! only after its replacement has been written.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use super::codec::{to_namespace, to_path, Namespace};
use super::locator::locate;
use super::prune::prune;
use super::scanner::{is_source_file, DECLARATION_PATTERN};
use super::types::{
    PlannedMove, RelocationPlan, RelocationReport, RelocationTarget, RenameWarning, WarningKind,
};
use crate::error::{Error, Result};
use crate::local_files::FileSystem;
use crate::utils::parser::replace_first;

/// Namespace a file at `relative` (under the old root) declares after the move.
fn effective_namespace(new_namespace: &Namespace, relative: &Path) -> Namespace {
    let dir = match relative.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => return new_namespace.clone(),
    };

    // Non-UTF-8 directory names can't go through the codec; carry them lossily
    let suffix = to_namespace(dir).or_else(|_| {
        let lossy: Vec<String> = dir
            .components()
            .map(|c| c.as_os_str().to_string_lossy().to_string())
            .collect();
        Namespace::parse(&lossy.join("."))
    });

    match suffix {
        Ok(suffix) => new_namespace.join(&suffix),
        Err(_) => new_namespace.clone(),
    }
}

/// Snapshot the files under the target's old root and work out where each goes.
///
/// Fails only when the old root itself can't be enumerated. When the new root
/// sits inside the old one, files already below it are not part of the move.
pub fn plan_relocation(
    fs: &dyn FileSystem,
    target: RelocationTarget,
    extensions: &[String],
) -> Result<RelocationPlan> {
    let listing = fs.list_recursive(&target.old_root).map_err(|e| {
        Error::package_structural(target.old_root.display().to_string(), e.describe())
    })?;

    let mut moves = Vec::with_capacity(listing.files.len());
    let mut warnings: Vec<RenameWarning> = listing
        .unreadable
        .iter()
        .map(RenameWarning::unreadable_dir)
        .collect();
    let mut warned_dirs: BTreeSet<PathBuf> = BTreeSet::new();

    let new_root_inside =
        target.new_root != target.old_root && target.new_root.starts_with(&target.old_root);

    for relative in listing.files {
        if new_root_inside && target.old_root.join(&relative).starts_with(&target.new_root) {
            continue;
        }

        let effective = effective_namespace(&target.new_namespace, &relative);
        let rewrite_declaration = is_source_file(&relative, extensions);

        // Directory names are carried over verbatim even when they aren't
        // identifiers; the user decides what to do about them.
        if rewrite_declaration {
            if let Some(dir) = relative.parent().filter(|d| !d.as_os_str().is_empty()) {
                let invalid = effective.invalid_segments();
                if !invalid.is_empty() && warned_dirs.insert(dir.to_path_buf()) {
                    warnings.push(RenameWarning::new(
                        WarningKind::InvalidSegment,
                        target.old_root.join(dir).display().to_string(),
                        format!(
                            "Directory name(s) {} are not valid identifiers; declared as '{}'",
                            invalid.join(", "),
                            effective
                        ),
                    ));
                }
            }
        }

        moves.push(PlannedMove {
            from: target.old_root.join(&relative),
            to: target.new_root.join(&relative),
            relative,
            effective_namespace: effective,
            rewrite_declaration,
        });
    }

    Ok(RelocationPlan {
        target,
        moves,
        warnings,
    })
}

fn target_exists(planned: &PlannedMove) -> RenameWarning {
    RenameWarning::new(
        WarningKind::TargetExists,
        planned.from.display().to_string(),
        format!("{} already exists; source left in place", planned.to.display()),
    )
}

/// Write one planned file to its destination. Returns the warnings it produced.
/// An existing destination is never replaced.
fn move_file(
    fs: &dyn FileSystem,
    planned: &PlannedMove,
) -> std::result::Result<Vec<RenameWarning>, RenameWarning> {
    let mut warnings = Vec::new();
    let from_display = planned.from.display().to_string();
    let in_place = planned.from == planned.to;

    if !in_place && fs.exists(&planned.to) {
        return Err(target_exists(planned));
    }

    if planned.rewrite_declaration {
        let content = fs.read(&planned.from).map_err(|e| {
            RenameWarning::new(WarningKind::ReadFailed, from_display.clone(), e.describe())
        })?;

        let declaration = format!("package {}", planned.effective_namespace);
        let rewritten = match replace_first(&DECLARATION_PATTERN, &content, |_| declaration) {
            Some(rewritten) => rewritten,
            None => {
                warnings.push(RenameWarning::new(
                    WarningKind::DeclarationMissing,
                    from_display.clone(),
                    "No package declaration found; moved unchanged",
                ));
                content
            }
        };

        fs.write(&planned.to, &rewritten).map_err(|e| {
            RenameWarning::new(WarningKind::WriteFailed, from_display.clone(), e.describe())
        })?;
    } else if !in_place {
        fs.copy(&planned.from, &planned.to).map_err(|e| {
            RenameWarning::new(WarningKind::WriteFailed, from_display.clone(), e.describe())
        })?;
    }

    Ok(warnings)
}

enum Step {
    /// Source no longer exists: moved by an earlier, interrupted run.
    Gone,
    /// Nothing written; the source stays.
    Kept,
    Moved { source_removed: bool },
}

fn apply_move(
    fs: &dyn FileSystem,
    planned: &PlannedMove,
    warnings: &mut Vec<RenameWarning>,
) -> Step {
    if !fs.is_file(&planned.from) {
        return Step::Gone;
    }

    match move_file(fs, planned) {
        Ok(file_warnings) => warnings.extend(file_warnings),
        Err(warning) => {
            log_status!("move", "{}: {}", warning.file, warning.message);
            warnings.push(warning);
            return Step::Kept;
        }
    }

    if planned.from == planned.to {
        return Step::Moved {
            source_removed: false,
        };
    }

    match fs.delete(&planned.from) {
        Ok(()) => Step::Moved {
            source_removed: true,
        },
        Err(e) => {
            warnings.push(RenameWarning::new(
                WarningKind::DeleteFailed,
                planned.from.display().to_string(),
                format!(
                    "Copied to {} but original remains: {}",
                    planned.to.display(),
                    e.describe()
                ),
            ));
            Step::Moved {
                source_removed: false,
            }
        }
    }
}

/// Carry out a plan. `boundary` is the source root pruning must stop at.
///
/// A move whose destination is still the source of another pending move waits
/// until that source has been moved away; if it never is, the file stays put
/// with a `target_exists` warning.
pub fn apply_relocation(
    fs: &dyn FileSystem,
    plan: RelocationPlan,
    boundary: &Path,
) -> Result<RelocationReport> {
    let RelocationPlan {
        target,
        moves,
        mut warnings,
    } = plan;

    let created_new_root = !fs.is_dir(&target.new_root);
    fs.ensure_dir(&target.new_root).map_err(|e| {
        Error::package_structural(target.new_root.display().to_string(), e.describe())
    })?;

    let mut pending: BTreeSet<&Path> = moves
        .iter()
        .filter(|m| m.from != m.to)
        .map(|m| m.from.as_path())
        .collect();
    let mut queue: Vec<&PlannedMove> = moves.iter().collect();
    let mut moved = Vec::new();

    while !queue.is_empty() {
        let waiting = queue.len();
        let mut deferred = Vec::new();

        for planned in queue {
            if planned.from != planned.to && pending.contains(planned.to.as_path()) {
                deferred.push(planned);
                continue;
            }

            match apply_move(fs, planned, &mut warnings) {
                Step::Gone => {
                    pending.remove(planned.from.as_path());
                }
                Step::Kept => {}
                Step::Moved { source_removed } => {
                    if source_removed {
                        pending.remove(planned.from.as_path());
                    }
                    moved.push(planned.relative.clone());
                }
            }
        }

        if deferred.len() == waiting {
            warnings.extend(deferred.into_iter().map(target_exists));
            break;
        }
        queue = deferred;
    }

    let removed_dirs = match prune(fs, &target.old_root, boundary, &[target.new_root.clone()]) {
        Ok(removed) => removed,
        Err(e) => {
            warnings.push(RenameWarning::new(
                WarningKind::PruneFailed,
                target.old_root.display().to_string(),
                e.describe(),
            ));
            Vec::new()
        }
    };

    Ok(RelocationReport {
        anchor: Some(target.old_root),
        new_root: target.new_root,
        created_new_root,
        moved_count: moved.len(),
        moved,
        removed_dirs,
        warnings,
    })
}

/// Find where `old` lives under `source_root` and plan moving it to `new`.
///
/// `Ok(None)` when `old == new` or no anchor directory exists.
pub fn plan_package(
    fs: &dyn FileSystem,
    source_root: &Path,
    old: &Namespace,
    new: &Namespace,
    extensions: &[String],
) -> Result<Option<RelocationPlan>> {
    if old == new {
        return Ok(None);
    }

    let Some(anchor) = locate(fs, source_root, old, extensions) else {
        return Ok(None);
    };

    let target = RelocationTarget {
        old_root: anchor,
        new_root: source_root.join(to_path(new)),
        new_namespace: new.clone(),
    };

    plan_relocation(fs, target, extensions).map(Some)
}

/// Locate, relocate and prune: the full move of one namespace within one
/// source root.
///
/// Renaming a namespace to itself does nothing. When the old namespace has no
/// directory on disk an empty directory for the new one is created instead.
pub fn relocate_package(
    fs: &dyn FileSystem,
    source_root: &Path,
    old: &Namespace,
    new: &Namespace,
    extensions: &[String],
) -> Result<RelocationReport> {
    let new_root = source_root.join(to_path(new));

    if old == new {
        return Ok(RelocationReport {
            anchor: None,
            new_root,
            ..RelocationReport::default()
        });
    }

    let Some(plan) = plan_package(fs, source_root, old, new, extensions)? else {
        let created_new_root = !fs.is_dir(&new_root);
        fs.ensure_dir(&new_root)?;
        log_status!(
            "move",
            "No directory for '{}' under {}; created {}",
            old,
            source_root.display(),
            new_root.display()
        );
        return Ok(RelocationReport {
            anchor: None,
            new_root,
            created_new_root,
            ..RelocationReport::default()
        });
    };

    let report = apply_relocation(fs, plan, source_root)?;

    log_status!(
        "move",
        "Moved {} file(s) from '{}' to '{}' ({} warning(s))",
        report.moved_count,
        old,
        new,
        report.warnings.len()
    );

    Ok(report)
}
