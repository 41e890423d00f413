use clap::{ArgGroup, Args};
use serde::Serialize;

use repackage::local_files::local;
use repackage::package::{
    self, Namespace, RelocationPlan, RelocationReport, RenameOutcome, RenameRequest,
};
use repackage::paths;

use crate::commands::{CmdResult, GlobalArgs};

#[derive(Args)]
pub struct RenameArgs {
    /// Project root containing the source dirs and descriptor files
    #[arg(long, default_value = ".")]
    project: String,
    /// Current namespace (detected from the first declaring source file when omitted)
    #[arg(long)]
    from: Option<String>,
    /// New namespace
    #[arg(long)]
    to: String,
    /// Source dir relative to the project root (repeatable; overrides config)
    #[arg(long = "source-dir")]
    source_dirs: Vec<String>,
    /// Report what would change without touching disk
    #[arg(long)]
    dry_run: bool,
}

#[derive(Args)]
pub struct LocateArgs {
    /// Source root the namespace is nested under
    #[arg(long)]
    source_root: String,
    #[arg(long)]
    namespace: String,
}

#[derive(Args)]
pub struct MoveArgs {
    #[arg(long)]
    source_root: String,
    #[arg(long)]
    from: String,
    #[arg(long)]
    to: String,
    /// Print the relocation plan without moving anything
    #[arg(long)]
    dry_run: bool,
}

#[derive(Args)]
pub struct DetectArgs {
    #[arg(long)]
    source_root: String,
}

#[derive(Args)]
#[command(group(ArgGroup::new("input").required(true).args(["namespace", "path"])))]
pub struct ConvertArgs {
    /// Dotted namespace to turn into a relative path
    #[arg(long)]
    namespace: Option<String>,
    /// Relative path to turn into a dotted namespace
    #[arg(long)]
    path: Option<String>,
}

#[derive(Serialize)]
#[serde(tag = "command")]
pub enum PackageOutput {
    #[serde(rename = "package.rename")]
    Rename {
        moved_count: usize,
        total_references: usize,
        warning_count: usize,
        outcome: RenameOutcome,
    },
    #[serde(rename = "package.locate")]
    Locate {
        namespace: Namespace,
        source_root: String,
        found: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        anchor: Option<String>,
    },
    #[serde(rename = "package.move")]
    Move {
        from: Namespace,
        to: Namespace,
        dry_run: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        plan: Option<RelocationPlan>,
        #[serde(skip_serializing_if = "Option::is_none")]
        report: Option<RelocationReport>,
    },
    #[serde(rename = "package.detect")]
    Detect {
        source_root: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        namespace: Option<Namespace>,
    },
    #[serde(rename = "package.convert")]
    Convert {
        namespace: Namespace,
        path: String,
        invalid_segments: Vec<String>,
    },
}

pub(crate) fn parse_namespace(field: &str, value: &str) -> repackage::Result<Namespace> {
    Namespace::parse(value).map_err(|e| {
        repackage::Error::validation_invalid_argument(
            field,
            e.details
                .get("problem")
                .and_then(|p| p.as_str())
                .unwrap_or("Invalid namespace"),
            Some(value.to_string()),
        )
    })
}

pub fn rename(args: RenameArgs, global: &GlobalArgs) -> CmdResult<PackageOutput> {
    let defaults = global.defaults()?;

    let request = RenameRequest {
        project_root: paths::expand(&args.project),
        old: args
            .from
            .as_deref()
            .map(|from| parse_namespace("from", from))
            .transpose()?,
        new: parse_namespace("to", &args.to)?,
        source_dirs: args.source_dirs,
        dry_run: args.dry_run,
    };

    let outcome = package::rename_project(&local(), &request, &defaults)?;

    Ok((
        PackageOutput::Rename {
            moved_count: outcome.moved_count(),
            total_references: outcome.references.total_replacements,
            warning_count: outcome.warning_count(),
            outcome,
        },
        0,
    ))
}

pub fn locate(args: LocateArgs, global: &GlobalArgs) -> CmdResult<PackageOutput> {
    let defaults = global.defaults()?;
    let namespace = parse_namespace("namespace", &args.namespace)?;
    let source_root = paths::expand(&args.source_root);

    let anchor = package::locate_package_root(
        &local(),
        &source_root,
        &namespace,
        &defaults.source_extensions,
    );

    Ok((
        PackageOutput::Locate {
            namespace,
            source_root: source_root.display().to_string(),
            found: anchor.is_some(),
            anchor: anchor.map(|a| a.display().to_string()),
        },
        0,
    ))
}

pub fn relocate(args: MoveArgs, global: &GlobalArgs) -> CmdResult<PackageOutput> {
    let defaults = global.defaults()?;
    let from = parse_namespace("from", &args.from)?;
    let to = parse_namespace("to", &args.to)?;
    let source_root = paths::expand(&args.source_root);
    let fs = local();

    let (plan, report) = if args.dry_run {
        let plan =
            package::plan_package(&fs, &source_root, &from, &to, &defaults.source_extensions)?;
        (plan, None)
    } else {
        let report =
            package::relocate_package(&fs, &source_root, &from, &to, &defaults.source_extensions)?;
        (None, Some(report))
    };

    Ok((
        PackageOutput::Move {
            from,
            to,
            dry_run: args.dry_run,
            plan,
            report,
        },
        0,
    ))
}

pub fn detect(args: DetectArgs, global: &GlobalArgs) -> CmdResult<PackageOutput> {
    let defaults = global.defaults()?;
    let source_root = paths::expand(&args.source_root);

    let namespace =
        package::find_namespace_in_tree(&local(), &source_root, &defaults.source_extensions)
            .map_err(|e| {
                repackage::Error::package_structural(source_root.display().to_string(), e.describe())
            })?;

    Ok((
        PackageOutput::Detect {
            source_root: source_root.display().to_string(),
            namespace,
        },
        0,
    ))
}

pub fn convert(args: ConvertArgs, _global: &GlobalArgs) -> CmdResult<PackageOutput> {
    let namespace = match (args.namespace, args.path) {
        (Some(namespace), _) => parse_namespace("namespace", &namespace)?,
        (None, Some(path)) => package::to_namespace(std::path::Path::new(&path))?,
        (None, None) => {
            return Err(repackage::Error::validation_missing_argument(vec![
                "namespace".to_string(),
                "path".to_string(),
            ]))
        }
    };

    let invalid_segments = namespace
        .invalid_segments()
        .into_iter()
        .map(str::to_string)
        .collect();

    Ok((
        PackageOutput::Convert {
            path: package::to_path_string(&namespace),
            invalid_segments,
            namespace,
        },
        0,
    ))
}
