//! Whole-project rename: relocate every source dir, then rewrite references
//! and descriptor attributes.

use serde::Serialize;
use std::path::PathBuf;

use super::codec::Namespace;
use super::references::{
    rewrite_descriptor, rewrite_project, DescriptorRewrite, ReferenceReport, RewriteOptions,
};
use super::relocate::{plan_package, relocate_package};
use super::scanner::find_namespace_in_tree;
use super::types::{RelocationPlan, RelocationReport, RenameWarning, WarningKind};
use crate::defaults::Defaults;
use crate::error::{Error, Result};
use crate::local_files::FileSystem;

#[derive(Debug, Clone)]
pub struct RenameRequest {
    pub project_root: PathBuf,
    /// Detected from the first declaring source file when omitted.
    pub old: Option<Namespace>,
    pub new: Namespace,
    /// Overrides the configured source dirs when non-empty.
    pub source_dirs: Vec<String>,
    pub dry_run: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct RenameOutcome {
    pub old: Namespace,
    pub new: Namespace,
    pub dry_run: bool,
    pub source_dirs: Vec<PathBuf>,
    pub relocations: Vec<RelocationReport>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub plans: Vec<RelocationPlan>,
    pub references: ReferenceReport,
    pub descriptors: Vec<DescriptorRewrite>,
    pub warnings: Vec<RenameWarning>,
}

impl RenameOutcome {
    fn empty(old: Namespace, new: Namespace, dry_run: bool, source_dirs: Vec<PathBuf>) -> Self {
        Self {
            old,
            new,
            dry_run,
            source_dirs,
            relocations: Vec::new(),
            plans: Vec::new(),
            references: ReferenceReport {
                applied: !dry_run,
                ..ReferenceReport::default()
            },
            descriptors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn moved_count(&self) -> usize {
        self.relocations.iter().map(|r| r.moved_count).sum()
    }

    /// Warnings from every stage.
    pub fn warning_count(&self) -> usize {
        self.warnings.len()
            + self.references.warnings.len()
            + self.relocations.iter().map(|r| r.warnings.len()).sum::<usize>()
            + self.plans.iter().map(|p| p.warnings.len()).sum::<usize>()
    }
}

pub fn rename_project(
    fs: &dyn FileSystem,
    request: &RenameRequest,
    defaults: &Defaults,
) -> Result<RenameOutcome> {
    if !fs.is_dir(&request.project_root) {
        return Err(Error::validation_invalid_argument(
            "project",
            "Project root is not a directory",
            Some(request.project_root.display().to_string()),
        ));
    }

    let configured = if request.source_dirs.is_empty() {
        &defaults.source_dirs
    } else {
        &request.source_dirs
    };

    let source_dirs: Vec<PathBuf> = configured
        .iter()
        .map(|dir| request.project_root.join(dir))
        .filter(|dir| fs.is_dir(dir))
        .collect();

    let extensions = &defaults.source_extensions;

    let old = match &request.old {
        Some(old) => old.clone(),
        None => detect_namespace(fs, &source_dirs, extensions)?
            .ok_or_else(|| {
                Error::validation_missing_argument(vec!["from".to_string()]).with_hint(
                    "No source file declares a package; pass --from explicitly",
                )
            })?,
    };
    let new = request.new.clone();

    let mut outcome = RenameOutcome::empty(old.clone(), new.clone(), request.dry_run, source_dirs);
    if old == new {
        return Ok(outcome);
    }

    log_status!(
        "rename",
        "{} → {} in {} source dir(s){}",
        old,
        new,
        outcome.source_dirs.len(),
        if request.dry_run { " (dry run)" } else { "" }
    );

    for dir in &outcome.source_dirs {
        if request.dry_run {
            if let Some(plan) = plan_package(fs, dir, &old, &new, extensions)? {
                outcome.plans.push(plan);
            }
        } else {
            outcome
                .relocations
                .push(relocate_package(fs, dir, &old, &new, extensions)?);
        }
    }

    let options = RewriteOptions {
        extensions: extensions.clone(),
        exclude: defaults.exclude.clone(),
        dry_run: request.dry_run,
    };
    outcome.references = rewrite_project(fs, &outcome.source_dirs, &old, &new, &options)?;

    for descriptor in &defaults.descriptors {
        let path = request.project_root.join(&descriptor.file);
        if !fs.is_file(&path) {
            continue;
        }

        for key in &descriptor.attributes {
            match rewrite_descriptor(fs, &path, key, old.as_str(), new.as_str(), request.dry_run) {
                Ok(rewrite) if rewrite.replacements > 0 => outcome.descriptors.push(rewrite),
                Ok(_) => {}
                Err(e) => outcome.warnings.push(RenameWarning::new(
                    WarningKind::WriteFailed,
                    path.display().to_string(),
                    e.describe(),
                )),
            }
        }
    }

    Ok(outcome)
}

/// First namespace declared in any of `source_dirs`, in order.
pub fn detect_namespace(
    fs: &dyn FileSystem,
    source_dirs: &[PathBuf],
    extensions: &[String],
) -> Result<Option<Namespace>> {
    for dir in source_dirs {
        if let Some(namespace) = find_namespace_in_tree(fs, dir, extensions)? {
            return Ok(Some(namespace));
        }
    }
    Ok(None)
}
