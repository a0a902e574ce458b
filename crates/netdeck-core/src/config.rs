// ── Runtime simulation configuration ──
//
// These types describe *how* the simulation behaves: tick rate,
// probabilities, delays. They never touch disk. The CLI builds a
// `TopologyConfig` from its config file and hands it in.

use std::time::Duration;

use crate::error::CoreError;
use crate::radio::DeviceRequest;

/// Discovery tick tuning.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscoverySettings {
    /// Time between discovery ticks.
    pub interval: Duration,
    /// Chance per tick that the next catalog entry appears.
    pub reveal_probability: f64,
    /// Chance per device per tick of reporting `Sync` instead of `Online`.
    pub sync_probability: f64,
}

impl Default for DiscoverySettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(800),
            reveal_probability: 0.30,
            sync_probability: 0.05,
        }
    }
}

/// Configuration for a single topology instance.
#[derive(Debug, Clone, PartialEq)]
pub struct TopologyConfig {
    pub discovery: DiscoverySettings,
    /// How long a pairing without a radio link takes to "succeed".
    pub pair_delay: Duration,
    /// How long a remote command stays visible.
    pub remote_hold: Duration,
    /// Start the discovery loop as soon as the topology starts.
    pub monitor_on_start: bool,
    /// Filter passed to the device chooser on scan.
    pub request: DeviceRequest,
}

impl Default for TopologyConfig {
    fn default() -> Self {
        Self {
            discovery: DiscoverySettings::default(),
            pair_delay: Duration::from_secs(2),
            remote_hold: Duration::from_millis(300),
            monitor_on_start: true,
            request: DeviceRequest::default(),
        }
    }
}

impl TopologyConfig {
    /// Reject settings the simulation cannot run with.
    pub fn validate(&self) -> Result<(), CoreError> {
        let d = &self.discovery;
        if d.interval.is_zero() {
            return Err(CoreError::Config {
                message: "discovery interval must be greater than zero".into(),
            });
        }
        for (name, p) in [
            ("reveal_probability", d.reveal_probability),
            ("sync_probability", d.sync_probability),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(CoreError::Config {
                    message: format!("{name} must be within 0.0..=1.0, got {p}"),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = TopologyConfig::default();
        config.validate().unwrap();
        assert_eq!(config.discovery.interval, Duration::from_millis(800));
        assert_eq!(config.pair_delay, Duration::from_secs(2));
        assert_eq!(config.remote_hold, Duration::from_millis(300));
    }

    #[test]
    fn out_of_range_probability_is_rejected() {
        let mut config = TopologyConfig::default();
        config.discovery.sync_probability = 1.5;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("sync_probability"));
    }

    #[test]
    fn zero_interval_is_rejected() {
        let mut config = TopologyConfig::default();
        config.discovery.interval = Duration::ZERO;
        assert!(matches!(config.validate(), Err(CoreError::Config { .. })));
    }
}
