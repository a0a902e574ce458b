//! Shared configuration for the netdeck CLI.
//!
//! A TOML file plus `NETDECK_` environment overrides, translated into
//! `netdeck_core::TopologyConfig` and `netdeck_core::NetworkInfo`. The
//! core never reads files itself.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use netdeck_core::{DiscoverySettings, NetworkInfo, TopologyConfig};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("failed to parse network file {path}: {source}")]
    NetworkFile {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// Output defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Simulation tuning.
    #[serde(default)]
    pub simulation: Simulation,

    /// TOML file describing the router, replacing the built-in one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network_file: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Simulation {
    /// Discovery tick interval in milliseconds.
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,

    #[serde(default = "default_reveal_probability")]
    pub reveal_probability: f64,

    #[serde(default = "default_sync_probability")]
    pub sync_probability: f64,

    /// Simulated pairing time when no radio link is present.
    #[serde(default = "default_pair_delay_ms")]
    pub pair_delay_ms: u64,

    /// How long a remote command stays visible.
    #[serde(default = "default_remote_hold_ms")]
    pub remote_hold_ms: u64,

    #[serde(default = "default_true")]
    pub monitor_on_start: bool,
}

impl Default for Simulation {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
            reveal_probability: default_reveal_probability(),
            sync_probability: default_sync_probability(),
            pair_delay_ms: default_pair_delay_ms(),
            remote_hold_ms: default_remote_hold_ms(),
            monitor_on_start: true,
        }
    }
}

fn default_interval_ms() -> u64 {
    800
}
fn default_reveal_probability() -> f64 {
    0.30
}
fn default_sync_probability() -> f64 {
    0.05
}
fn default_pair_delay_ms() -> u64 {
    2000
}
fn default_remote_hold_ms() -> u64 {
    300
}
fn default_true() -> bool {
    true
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "netdeck", "netdeck").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("netdeck");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load the full Config from `path` + environment. A missing file is
/// not an error; defaults fill every gap.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("NETDECK_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    save_config_to(cfg, &path)?;
    Ok(path)
}

/// Serialize config to TOML and write it to `path`.
pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Translation ─────────────────────────────────────────────────────

impl Config {
    /// Build a validated `TopologyConfig` from the `[simulation]` table.
    pub fn topology_config(&self) -> Result<TopologyConfig, ConfigError> {
        let sim = &self.simulation;
        let config = TopologyConfig {
            discovery: DiscoverySettings {
                interval: Duration::from_millis(sim.interval_ms),
                reveal_probability: sim.reveal_probability,
                sync_probability: sim.sync_probability,
            },
            pair_delay: Duration::from_millis(sim.pair_delay_ms),
            remote_hold: Duration::from_millis(sim.remote_hold_ms),
            monitor_on_start: sim.monitor_on_start,
            ..TopologyConfig::default()
        };
        config
            .validate()
            .map_err(|e| ConfigError::Validation {
                field: "simulation".into(),
                reason: e.to_string(),
            })?;
        Ok(config)
    }

    /// The router description: `network_file` if set, else the built-in.
    pub fn network_info(&self) -> Result<NetworkInfo, ConfigError> {
        let Some(path) = &self.network_file else {
            return Ok(NetworkInfo::builtin());
        };
        let raw = std::fs::read_to_string(path)?;
        toml::from_str(&raw).map_err(|source| ConfigError::NetworkFile {
            path: path.clone(),
            source,
        })
    }
}
