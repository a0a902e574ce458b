//! Clap derive structures for the `netdeck` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.
//! Kept free of crate-internal imports so `build.rs` can include it.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// netdeck -- explore a simulated home network from the terminal
#[derive(Debug, Parser)]
#[command(
    name = "netdeck",
    version,
    about = "Explore a simulated home network topology",
    long_about = "Drives a simulated router, its discovered IP devices and \
        short-range radio peripherals.\n\n\
        Devices appear over time while monitoring runs; peripherals are \
        scanned and paired through a scripted radio.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Config file (defaults to the platform config directory)
    #[arg(long, env = "NETDECK_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Output format (overrides the config file)
    #[arg(long, short = 'o', env = "NETDECK_OUTPUT", global = true)]
    pub output: Option<OutputFormat>,

    /// When to use color output
    #[arg(long, global = true)]
    pub color: Option<ColorMode>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run discovery and list the devices found
    #[command(alias = "mon", alias = "m")]
    Monitor(MonitorArgs),

    /// Show the detail view for the WAN link, the gateway or a device
    #[command(alias = "i")]
    Inspect(InspectArgs),

    /// Scan for a radio peripheral and pair it
    Pair(PairArgs),

    /// Send a remote command to a discovered device
    Remote(RemoteArgs),

    /// Show recorded connectivity test results
    Tests,

    /// Manage CLI configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Shared Arguments ─────────────────────────────────────────────────

/// How long discovery runs before the command looks at the topology.
#[derive(Debug, Args)]
pub struct WarmupArgs {
    /// Run exactly N discovery ticks instead of waiting for the whole
    /// catalog to appear
    #[arg(long, short = 't')]
    pub ticks: Option<u32>,
}

// ── Monitor ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct MonitorArgs {
    /// Wall-clock time to monitor for (e.g. "5s", "1m")
    #[arg(long, short = 'd', default_value = "3s", value_parser = humantime::parse_duration)]
    pub duration: Duration,

    /// Run N ticks immediately instead of monitoring in real time
    #[arg(long, short = 't', conflicts_with = "duration")]
    pub ticks: Option<u32>,

    /// Print a summary line on every topology change
    #[arg(long, short = 'w')]
    pub watch: bool,

    /// Only list devices whose name, address or ID contains this text
    #[arg(long, short = 'f')]
    pub filter: Option<String>,

    /// Only list devices of this kind
    #[arg(long, short = 'k')]
    pub kind: Option<KindArg>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    Ip,
    Peripheral,
}

// ── Inspect ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct InspectArgs {
    #[command(subcommand)]
    pub target: InspectTarget,
}

#[derive(Debug, Subcommand)]
pub enum InspectTarget {
    /// Internet link: aggregate throughput and WAN address
    Wan(WarmupArgs),

    /// Gateway: resource load, active clients and identity
    #[command(alias = "router")]
    Gateway(WarmupArgs),

    /// A discovered device, by ID or name
    Device {
        /// Device ID (hardware address) or name
        device: String,

        #[command(flatten)]
        warmup: WarmupArgs,
    },
}

// ── Pair ─────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct PairArgs {
    /// Advertised name of the simulated peripheral
    #[arg(long, short = 'n')]
    pub name: Option<String>,

    /// Identifier of the simulated peripheral (random if omitted)
    #[arg(long)]
    pub id: Option<String>,

    /// Signal strength to report, in dBm
    #[arg(long, allow_hyphen_values = true)]
    pub rssi: Option<i16>,

    /// Make the connection attempt fail with this message
    #[arg(long, value_name = "MESSAGE")]
    pub fail: Option<String>,

    /// Simulate a peripheral that exposes no connect operation
    #[arg(long, conflicts_with = "fail")]
    pub no_connect: bool,

    /// Simulate the user closing the device chooser
    #[arg(long)]
    pub cancel: bool,

    /// Time the connection attempt takes
    #[arg(long, default_value = "0s", value_parser = humantime::parse_duration)]
    pub connect_delay: Duration,

    /// Forget the peripheral once pairing settles
    #[arg(long)]
    pub forget: bool,
}

// ── Remote ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct RemoteArgs {
    /// Button to press
    pub button: RemoteButton,

    /// Target device ID or name (defaults to the first device that
    /// accepts remote commands)
    #[arg(long, short = 'd')]
    pub device: Option<String>,

    #[command(flatten)]
    pub warmup: WarmupArgs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RemoteButton {
    PowerToggle,
    Menu,
    Source,
    Up,
    Down,
    Left,
    Right,
    Ok,
    VolUp,
    Mute,
    VolDown,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Write a config file populated with the defaults
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Display current resolved configuration
    Show,

    /// Print the config file path
    Path,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
