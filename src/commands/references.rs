use clap::Args;
use serde::Serialize;

use repackage::local_files::local;
use repackage::package::{self, DescriptorRewrite, Namespace, ReferenceReport, RewriteOptions};
use repackage::paths;

use crate::commands::package::parse_namespace;
use crate::commands::{CmdResult, GlobalArgs};

#[derive(Args)]
pub struct ReferencesArgs {
    #[arg(long)]
    from: String,
    #[arg(long)]
    to: String,
    /// Directory to scan (repeatable)
    #[arg(long = "source-dir", required = true)]
    source_dirs: Vec<String>,
    #[arg(long)]
    dry_run: bool,
}

#[derive(Args)]
pub struct DescriptorArgs {
    /// Descriptor file (build.gradle, AndroidManifest.xml, ...)
    #[arg(long)]
    file: String,
    /// Attribute whose quoted value is rewritten
    #[arg(long)]
    key: String,
    #[arg(long)]
    from: String,
    #[arg(long)]
    to: String,
    #[arg(long)]
    dry_run: bool,
}

#[derive(Serialize)]
#[serde(tag = "command")]
pub enum ReferencesOutput {
    #[serde(rename = "package.references")]
    References {
        from: Namespace,
        to: Namespace,
        #[serde(flatten)]
        report: ReferenceReport,
    },
    #[serde(rename = "package.descriptor")]
    Descriptor {
        from: String,
        to: String,
        #[serde(flatten)]
        rewrite: DescriptorRewrite,
    },
}

pub fn references(args: ReferencesArgs, global: &GlobalArgs) -> CmdResult<ReferencesOutput> {
    let defaults = global.defaults()?;
    let from = parse_namespace("from", &args.from)?;
    let to = parse_namespace("to", &args.to)?;

    let source_dirs: Vec<_> = args.source_dirs.iter().map(|d| paths::expand(d)).collect();
    let options = RewriteOptions {
        extensions: defaults.source_extensions,
        exclude: defaults.exclude,
        dry_run: args.dry_run,
    };

    let report = package::rewrite_project_references(&local(), &source_dirs, &from, &to, &options)?;

    Ok((ReferencesOutput::References { from, to, report }, 0))
}

pub fn descriptor(args: DescriptorArgs, _global: &GlobalArgs) -> CmdResult<ReferencesOutput> {
    if args.from.is_empty() {
        return Err(repackage::Error::validation_invalid_argument(
            "from",
            "Literal to replace is empty",
            None,
        ));
    }

    let path = paths::expand(&args.file);
    let rewrite = package::rewrite_descriptor_attribute(
        &local(),
        &path,
        &args.key,
        &args.from,
        &args.to,
        args.dry_run,
    )?;

    Ok((
        ReferencesOutput::Descriptor {
            from: args.from,
            to: args.to,
            rewrite,
        },
        0,
    ))
}
