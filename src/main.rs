use clap::{Parser, Subcommand};

use commands::GlobalArgs;

mod commands;
mod output;

use commands::{config, package, references};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "repackage")]
#[command(version = VERSION)]
#[command(about = "Rename Java/Kotlin packages: move the tree, rewrite declarations and references")]
struct Cli {
    /// Use this repackage.json instead of the global one
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rename a package across a whole project
    Rename(package::RenameArgs),
    /// Find the directory holding a namespace
    Locate(package::LocateArgs),
    /// Move one namespace within a single source root
    Move(package::MoveArgs),
    /// Rewrite declarations, imports and qualified references
    References(references::ReferencesArgs),
    /// Rewrite a quoted attribute in a descriptor file
    Descriptor(references::DescriptorArgs),
    /// Report the first declared namespace under a source root
    Detect(package::DetectArgs),
    /// Convert between a namespace and its relative path
    Convert(package::ConvertArgs),
    /// Inspect repackage configuration
    Config(config::ConfigArgs),
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();

    let global = GlobalArgs { config: cli.config };

    let (json_result, exit_code) = commands::run_json(cli.command, &global);

    if output::print_json_result(json_result).is_err() {
        return std::process::ExitCode::from(1);
    }

    std::process::ExitCode::from(exit_code_to_u8(exit_code))
}

fn exit_code_to_u8(code: i32) -> u8 {
    if code <= 0 {
        0
    } else if code >= 255 {
        255
    } else {
        code as u8
    }
}
