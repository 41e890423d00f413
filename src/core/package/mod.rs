//! Package renaming for Java/Kotlin-style source trees.
//!
//! A namespace such as `com.acme.app` lives in `com/acme/app` below each
//! source dir. Renaming it moves the files, rewrites their declarations,
//! prunes the directories left empty and then rewrites references elsewhere
//! in the project.
//!
//! ```text
//! locate -> plan_relocation -> apply_relocation -> prune
//!                                   |
//!                        rewrite_project / rewrite_descriptor
//! ```

mod codec;
mod locator;
mod prune;
mod references;
mod relocate;
mod rename;
mod scanner;
#[cfg(test)]
mod test_support;
mod types;

pub use codec::{is_identifier, to_namespace, to_path, to_path_string, Namespace};
pub use locator::locate;
pub use prune::prune;
pub use references::{
    rewrite_descriptor, rewrite_project, rewrite_references, DescriptorRewrite, FileRewrite,
    ReferenceReport, RewriteOptions,
};
pub use relocate::{apply_relocation, plan_package, plan_relocation, relocate_package};
pub use rename::{detect_namespace, rename_project, RenameOutcome, RenameRequest};
pub use scanner::{extract_declared, find_namespace_in_tree, has_source_files, is_source_file};
pub use types::{
    PlannedMove, RelocationPlan, RelocationReport, RelocationTarget, RenameWarning, WarningKind,
};

pub use self::locator::locate as locate_package_root;
pub use self::references::rewrite_descriptor as rewrite_descriptor_attribute;
pub use self::references::rewrite_project as rewrite_project_references;
