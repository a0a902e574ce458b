// ── Core error types ──
//
// User-facing errors from netdeck-core. Radio failures during pairing
// are recorded on the device instead of surfacing here; only misuse of
// the API (unknown device, wrong state, missing capability) does.

use thiserror::Error;

use crate::model::DeviceStatus;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Data errors ──────────────────────────────────────────────────
    #[error("Device not found: {identifier}")]
    DeviceNotFound { identifier: String },

    #[error("Device {identifier} cannot move from {from} to {to}")]
    InvalidTransition {
        identifier: String,
        from: DeviceStatus,
        to: DeviceStatus,
    },

    // ── Operation errors ─────────────────────────────────────────────
    #[error("Remote control unavailable: {reason}")]
    RemoteUnavailable { reason: String },

    #[error("Operation not supported: {operation} (requires {required})")]
    Unsupported { operation: String, required: String },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}
