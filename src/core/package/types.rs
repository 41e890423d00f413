use serde::Serialize;
use std::path::PathBuf;

use super::codec::Namespace;
use crate::local_files::UnreadableDir;

/// What went wrong with a single file. None of these abort an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    ReadFailed,
    WriteFailed,
    DeleteFailed,
    DeclarationMissing,
    InvalidSegment,
    TargetExists,
    PruneFailed,
}

/// A per-file problem surfaced alongside an otherwise successful result.
#[derive(Debug, Clone, Serialize)]
pub struct RenameWarning {
    pub kind: WarningKind,
    /// Path of the affected file or directory.
    pub file: String,
    pub message: String,
}

impl RenameWarning {
    pub fn new(kind: WarningKind, file: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            file: file.into(),
            message: message.into(),
        }
    }

    pub fn unreadable_dir(dir: &UnreadableDir) -> Self {
        Self::new(
            WarningKind::ReadFailed,
            dir.path.display().to_string(),
            format!("Directory could not be listed; its files were skipped: {}", dir.error),
        )
    }
}

/// Where a namespace's files come from and where they go.
#[derive(Debug, Clone, Serialize)]
pub struct RelocationTarget {
    /// Existing anchor directory of the old namespace.
    pub old_root: PathBuf,
    /// Directory of the new namespace.
    pub new_root: PathBuf,
    pub new_namespace: Namespace,
}

/// One file to move.
#[derive(Debug, Clone, Serialize)]
pub struct PlannedMove {
    /// Path relative to both roots.
    pub relative: PathBuf,
    pub from: PathBuf,
    pub to: PathBuf,
    /// Namespace the file declares after the move.
    pub effective_namespace: Namespace,
    /// Source files get their declaration rewritten; everything else is copied as-is.
    pub rewrite_declaration: bool,
}

/// Everything a relocation would do, computed without touching the disk.
#[derive(Debug, Clone, Serialize)]
pub struct RelocationPlan {
    pub target: RelocationTarget,
    pub moves: Vec<PlannedMove>,
    pub warnings: Vec<RenameWarning>,
}

/// Outcome of a relocation.
#[derive(Debug, Clone, Serialize, Default)]
pub struct RelocationReport {
    /// Directory the files were moved out of, if one was found.
    pub anchor: Option<PathBuf>,
    pub new_root: PathBuf,
    pub created_new_root: bool,
    pub moved_count: usize,
    pub moved: Vec<PathBuf>,
    pub removed_dirs: Vec<PathBuf>,
    pub warnings: Vec<RenameWarning>,
}
