//! Command handlers, one module per top-level subcommand.

pub mod config_cmd;
mod connectivity;
mod inspect;
mod monitor;
mod pair;
mod remote;
mod util;

use clap::ValueEnum;

use netdeck_config::Config;

use crate::cli::{ColorMode, Command, GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output;

/// Settings every simulation command renders with, resolved from the
/// command line first and the config file second.
pub struct Context {
    pub config: Config,
    pub format: OutputFormat,
    pub color: bool,
    pub quiet: bool,
}

impl Context {
    pub fn load(global: &GlobalOpts) -> Result<Self, CliError> {
        let config = config_cmd::load(global)?;

        let format = match global.output {
            Some(format) => format,
            None => parse_setting("defaults.output", &config.defaults.output)?,
        };
        let color = match global.color {
            Some(mode) => mode,
            None => parse_setting::<ColorMode>("defaults.color", &config.defaults.color)?,
        };

        Ok(Self {
            config,
            format,
            color: output::should_color(color),
            quiet: global.quiet,
        })
    }
}

fn parse_setting<T: ValueEnum>(field: &str, raw: &str) -> Result<T, CliError> {
    T::from_str(raw, true).map_err(|reason| CliError::Validation {
        field: field.into(),
        reason,
    })
}

/// Route a simulation command to its handler.
pub async fn dispatch(cmd: Command, ctx: &Context) -> Result<(), CliError> {
    match cmd {
        Command::Monitor(args) => monitor::handle(&args, ctx).await,
        Command::Inspect(args) => inspect::handle(&args, ctx),
        Command::Pair(args) => pair::handle(args, ctx).await,
        Command::Remote(args) => remote::handle(&args, ctx).await,
        Command::Tests => connectivity::handle(ctx),
        Command::Config(_) | Command::Completions(_) => unreachable!("handled in main"),
    }
}
