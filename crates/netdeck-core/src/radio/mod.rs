// ── Radio capability ──
//
// The short-range radio is an external, possibly absent capability.
// The core talks to it only through these traits; a platform backend
// (or the scripted `SimulatedRadio`) supplies the implementation.

mod simulated;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use simulated::{Advertisement, ConnectBehavior, SimulatedLink, SimulatedRadio};

/// Filter handed to the device chooser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceRequest {
    pub accept_all_devices: bool,
    pub optional_services: Vec<String>,
}

impl Default for DeviceRequest {
    fn default() -> Self {
        Self {
            accept_all_devices: true,
            optional_services: vec!["battery_service".into(), "device_information".into()],
        }
    }
}

/// Failure reported by the radio capability.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RadioError {
    #[error("device selection cancelled")]
    Cancelled,

    #[error("radio capability not supported")]
    Unsupported,

    #[error("{message}")]
    Failed { message: String },
}

impl RadioError {
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed {
            message: message.into(),
        }
    }

    /// Message recorded on a peripheral after a failed pairing.
    pub fn pairing_message(&self) -> String {
        match self {
            Self::Failed { message } if !message.is_empty() => message.clone(),
            Self::Failed { .. } => "Connection failed".into(),
            other => other.to_string(),
        }
    }
}

/// Access to the device chooser.
#[async_trait]
pub trait RadioAdapter: Send + Sync {
    /// Whether the platform exposes a radio at all.
    fn is_supported(&self) -> bool;

    /// Prompt for a device. Resolves once the user picks one or backs out.
    async fn request_device(
        &self,
        request: &DeviceRequest,
    ) -> Result<Arc<dyn RadioLink>, RadioError>;
}

/// A chosen device and its connection.
#[async_trait]
pub trait RadioLink: Send + Sync + fmt::Debug {
    fn id(&self) -> &str;

    fn name(&self) -> Option<&str>;

    fn rssi(&self) -> Option<i16> {
        None
    }

    /// Whether the link exposes a connect operation at all.
    fn can_connect(&self) -> bool;

    async fn connect(&self) -> Result<(), RadioError>;

    async fn disconnect(&self);

    fn is_connected(&self) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pairing_message_falls_back_for_empty_failures() {
        assert_eq!(RadioError::failed("X").pairing_message(), "X");
        assert_eq!(RadioError::failed("").pairing_message(), "Connection failed");
    }

    #[test]
    fn default_request_accepts_everything() {
        let request = DeviceRequest::default();
        assert!(request.accept_all_devices);
        assert_eq!(
            request.optional_services,
            ["battery_service", "device_information"]
        );
    }
}
