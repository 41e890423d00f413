use clap::{Args, Subcommand};
use serde::Serialize;

use repackage::defaults::{self, Defaults, RepackageConfig};
use repackage::paths;

use super::CmdResult;

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Display configuration (merged defaults + file)
    Show {
        /// Show only built-in defaults (ignore repackage.json)
        #[arg(long)]
        builtin: bool,
    },
    /// Show the path to repackage.json
    Path,
}

#[derive(Debug, Serialize)]
pub struct ConfigOutput {
    command: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    config: Option<RepackageConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    defaults: Option<Defaults>,
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    exists: Option<bool>,
}

pub fn run(args: ConfigArgs, global: &crate::commands::GlobalArgs) -> CmdResult<ConfigOutput> {
    match args.command {
        ConfigCommand::Show { builtin } => show(builtin, global),
        ConfigCommand::Path => path(global),
    }
}

fn show(builtin: bool, global: &crate::commands::GlobalArgs) -> CmdResult<ConfigOutput> {
    if builtin {
        return Ok((
            ConfigOutput {
                command: "config.show".to_string(),
                config: None,
                defaults: Some(defaults::builtin_defaults()),
                path: None,
                exists: None,
            },
            0,
        ));
    }

    let config = match &global.config {
        Some(path) => defaults::load_config_from(&paths::expand(path))?,
        None => defaults::load_config(),
    };

    Ok((
        ConfigOutput {
            command: "config.show".to_string(),
            config: Some(config),
            defaults: None,
            path: None,
            exists: None,
        },
        0,
    ))
}

fn path(global: &crate::commands::GlobalArgs) -> CmdResult<ConfigOutput> {
    let (path, exists) = match &global.config {
        Some(path) => {
            let expanded = paths::expand(path);
            (expanded.display().to_string(), expanded.is_file())
        }
        None => (defaults::config_path()?, defaults::config_exists()),
    };

    Ok((
        ConfigOutput {
            command: "config.path".to_string(),
            config: None,
            defaults: None,
            path: Some(path),
            exists: Some(exists),
        },
        0,
    ))
}
