use repackage::defaults::{self, Defaults};
use repackage::paths;

pub type CmdResult<T> = repackage::Result<(T, i32)>;

pub(crate) struct GlobalArgs {
    /// Explicit repackage.json location (`--config`).
    pub config: Option<String>,
}

impl GlobalArgs {
    /// Effective defaults: the `--config` file when given (errors reported),
    /// otherwise the global repackage.json or built-in defaults.
    pub fn defaults(&self) -> repackage::Result<Defaults> {
        let defaults = match &self.config {
            Some(path) => defaults::load_config_from(&paths::expand(path))?.defaults,
            None => defaults::load_defaults(),
        };
        defaults.validate()?;
        Ok(defaults)
    }
}

pub mod config;
pub mod package;
pub mod references;

macro_rules! dispatch {
    ($args:expr, $global:expr, $run:path) => {
        crate::output::map_cmd_result_to_json($run($args, $global))
    };
}

pub(crate) fn run_json(
    command: crate::Commands,
    global: &GlobalArgs,
) -> (repackage::Result<serde_json::Value>, i32) {
    match command {
        crate::Commands::Rename(args) => dispatch!(args, global, package::rename),
        crate::Commands::Locate(args) => dispatch!(args, global, package::locate),
        crate::Commands::Move(args) => dispatch!(args, global, package::relocate),
        crate::Commands::Detect(args) => dispatch!(args, global, package::detect),
        crate::Commands::Convert(args) => dispatch!(args, global, package::convert),
        crate::Commands::References(args) => dispatch!(args, global, references::references),
        crate::Commands::Descriptor(args) => dispatch!(args, global, references::descriptor),
        crate::Commands::Config(args) => dispatch!(args, global, config::run),
    }
}
