//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and a process exit code.

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

use netdeck_config::ConfigError;
use netdeck_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
    pub const CONFLICT: i32 = 6;
    pub const UNAVAILABLE: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Devices ──────────────────────────────────────────────────────
    #[error("Device '{identifier}' not found")]
    #[diagnostic(
        code(netdeck::not_found),
        help("Run: netdeck monitor to see discovered devices")
    )]
    NotFound { identifier: String },

    #[error("Device '{identifier}' is {from} and cannot start {action}")]
    #[diagnostic(code(netdeck::invalid_transition))]
    InvalidTransition {
        identifier: String,
        from: String,
        action: String,
    },

    #[error("Remote control unavailable: {reason}")]
    #[diagnostic(
        code(netdeck::remote_unavailable),
        help(
            "Remote commands reach TVs, audio and embedded devices.\n\
             Peripherals must be connected first: netdeck pair"
        )
    )]
    RemoteUnavailable { reason: String },

    #[error("Operation '{operation}' is not supported")]
    #[diagnostic(code(netdeck::unsupported), help("This command requires {required}."))]
    Unsupported { operation: String, required: String },

    // ── Scanning ─────────────────────────────────────────────────────
    #[error("Radio scan failed: {message}")]
    #[diagnostic(code(netdeck::scan_failed))]
    ScanFailed { message: String },

    #[error("Pairing with '{identifier}' failed: {message}")]
    #[diagnostic(
        code(netdeck::pairing_failed),
        help("The device stays listed in the ERROR state and can be paired again.")
    )]
    PairingFailed { identifier: String, message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(netdeck::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Configuration file already exists at {}", path.display())]
    #[diagnostic(
        code(netdeck::config_exists),
        help("Use --force to overwrite it.")
    )]
    ConfigExists { path: PathBuf },

    #[error(transparent)]
    #[diagnostic(
        code(netdeck::config),
        help("Inspect the resolved settings with: netdeck config show")
    )]
    Config(#[from] ConfigError),

    // ── IO ───────────────────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::InvalidTransition { .. } | Self::ConfigExists { .. } => exit_code::CONFLICT,
            Self::RemoteUnavailable { .. }
            | Self::Unsupported { .. }
            | Self::ScanFailed { .. }
            | Self::PairingFailed { .. } => exit_code::UNAVAILABLE,
            Self::Validation { .. } | Self::Config(ConfigError::Validation { .. }) => {
                exit_code::USAGE
            }
            Self::Config(_) | Self::Io(_) => exit_code::GENERAL,
        }
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::DeviceNotFound { identifier } => Self::NotFound { identifier },
            CoreError::InvalidTransition {
                identifier,
                from,
                to,
            } => Self::InvalidTransition {
                identifier,
                from: from.to_string(),
                action: to.to_string(),
            },
            CoreError::RemoteUnavailable { reason } => Self::RemoteUnavailable { reason },
            CoreError::Unsupported {
                operation,
                required,
            } => Self::Unsupported {
                operation,
                required,
            },
            CoreError::Config { message } => Self::Validation {
                field: "simulation".into(),
                reason: message,
            },
        }
    }
}
