// ── Device domain types ──

use std::net::Ipv4Addr;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::common::{LinkHandle, Traffic};
use super::entity_id::{DeviceId, DeviceKey, DeviceKind};

/// Device category, shared by both device variants.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum DeviceCategory {
    Handset,
    Tv,
    Computer,
    Embedded,
    Audio,
    GameController,
    InputPeripheral,
}

impl DeviceCategory {
    /// Guess the category of a radio device from its advertised name.
    pub fn from_advertised_name(name: Option<&str>) -> Self {
        let lowered = name.map(str::to_lowercase).unwrap_or_default();
        if lowered.contains("phone") {
            Self::Handset
        } else if lowered.contains("head") {
            Self::Audio
        } else {
            Self::InputPeripheral
        }
    }

    /// Categories that expose a remote command deck.
    pub fn accepts_remote(self) -> bool {
        matches!(self, Self::Tv | Self::Audio | Self::Embedded)
    }
}

/// How an IP device reaches the gateway.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
pub enum LinkType {
    #[serde(rename = "5GHz")]
    #[strum(serialize = "5GHz")]
    Band5Ghz,
    #[serde(rename = "2.4GHz")]
    #[strum(serialize = "2.4GHz")]
    Band24Ghz,
    #[serde(rename = "LAN")]
    #[strum(serialize = "LAN")]
    Lan,
}

/// Connection status, shared by both variants.
///
/// IP devices only ever cycle between `Online` and `Sync`. Peripherals
/// follow `Disconnected -> Pairing -> {Connected, Error}` with
/// `Error -> Pairing` as the retry edge.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum DeviceStatus {
    Online,
    Sync,
    Pairing,
    Connected,
    Disconnected,
    Error,
}

impl DeviceStatus {
    /// Whether a peripheral may move from `self` to `next`.
    pub fn peripheral_transition_allowed(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Disconnected | Self::Error, Self::Pairing)
                | (Self::Pairing, Self::Connected | Self::Error)
        )
    }
}

/// Fields every device carries.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviceInfo {
    pub name: String,
    pub id: DeviceId,
    pub category: DeviceCategory,
    pub status: DeviceStatus,
    pub discovered_at: DateTime<Utc>,
    pub traffic: Traffic,
}

/// A simulated wired or Wi-Fi endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IpDevice {
    #[serde(flatten)]
    pub info: DeviceInfo,
    pub ip: Ipv4Addr,
    pub link: LinkType,
    pub latency_ms: u32,
}

/// A short-range radio device found by a scan.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Peripheral {
    #[serde(flatten)]
    pub info: DeviceInfo,
    /// Present only when a real radio link backs this entry.
    pub link: Option<LinkHandle>,
    pub pairing_error: Option<String>,
    pub rssi: Option<i16>,
    pub manufacturer: Option<String>,
    /// Admission counter, distinguishes a re-added device from a
    /// forgotten one with the same identifier.
    #[serde(skip)]
    pub(crate) generation: u64,
}

impl Peripheral {
    /// Whether a pairing attempt may start from the current status.
    pub fn can_pair(&self) -> bool {
        self.info
            .status
            .peripheral_transition_allowed(DeviceStatus::Pairing)
    }
}

/// A device of either variant, as shown in the merged list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Device {
    Ip(Arc<IpDevice>),
    Peripheral(Arc<Peripheral>),
}

impl Device {
    pub fn info(&self) -> &DeviceInfo {
        match self {
            Self::Ip(d) => &d.info,
            Self::Peripheral(p) => &p.info,
        }
    }

    pub fn kind(&self) -> DeviceKind {
        match self {
            Self::Ip(_) => DeviceKind::Ip,
            Self::Peripheral(_) => DeviceKind::Peripheral,
        }
    }

    pub fn key(&self) -> DeviceKey {
        DeviceKey {
            kind: self.kind(),
            id: self.info().id.clone(),
        }
    }

    pub fn id(&self) -> &DeviceId {
        &self.info().id
    }

    pub fn name(&self) -> &str {
        &self.info().name
    }

    pub fn category(&self) -> DeviceCategory {
        self.info().category
    }

    pub fn status(&self) -> DeviceStatus {
        self.info().status
    }

    /// Network address for display; peripherals have none.
    pub fn address_label(&self) -> String {
        match self {
            Self::Ip(d) => d.ip.to_string(),
            Self::Peripheral(_) => "N/A".into(),
        }
    }

    /// Whether the remote command deck applies to this device.
    pub fn accepts_remote(&self) -> bool {
        if !self.category().accepts_remote() {
            return false;
        }
        match self {
            Self::Ip(_) => true,
            Self::Peripheral(p) => p.info.status == DeviceStatus::Connected,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn peripheral(category: DeviceCategory, status: DeviceStatus) -> Device {
        Device::Peripheral(Arc::new(Peripheral {
            info: DeviceInfo {
                name: "Bose QC".into(),
                id: DeviceId::from("p1"),
                category,
                status,
                discovered_at: Utc::now(),
                traffic: Traffic::ZERO,
            },
            link: None,
            pairing_error: None,
            rssi: None,
            manufacturer: None,
            generation: 1,
        }))
    }

    #[test]
    fn category_heuristics_follow_name() {
        assert_eq!(
            DeviceCategory::from_advertised_name(Some("Frank's iPhone")),
            DeviceCategory::Handset
        );
        assert_eq!(
            DeviceCategory::from_advertised_name(Some("WH-1000 Headphones")),
            DeviceCategory::Audio
        );
        assert_eq!(
            DeviceCategory::from_advertised_name(Some("MX Keys")),
            DeviceCategory::InputPeripheral
        );
        assert_eq!(
            DeviceCategory::from_advertised_name(None),
            DeviceCategory::InputPeripheral
        );
    }

    #[test]
    fn phone_wins_over_head() {
        assert_eq!(
            DeviceCategory::from_advertised_name(Some("Headphone Amp")),
            DeviceCategory::Handset
        );
    }

    #[test]
    fn peripheral_state_machine_edges() {
        use DeviceStatus::{Connected, Disconnected, Error, Online, Pairing, Sync};

        assert!(Disconnected.peripheral_transition_allowed(Pairing));
        assert!(Error.peripheral_transition_allowed(Pairing));
        assert!(Pairing.peripheral_transition_allowed(Connected));
        assert!(Pairing.peripheral_transition_allowed(Error));

        assert!(!Connected.peripheral_transition_allowed(Pairing));
        assert!(!Pairing.peripheral_transition_allowed(Pairing));
        assert!(!Disconnected.peripheral_transition_allowed(Connected));
        assert!(!Online.peripheral_transition_allowed(Pairing));
        assert!(!Sync.peripheral_transition_allowed(Pairing));
    }

    #[test]
    fn status_display_matches_badges() {
        assert_eq!(DeviceStatus::Pairing.to_string(), "PAIRING");
        assert_eq!("connected".parse::<DeviceStatus>().unwrap(), DeviceStatus::Connected);
    }

    #[test]
    fn link_type_labels() {
        assert_eq!(LinkType::Band24Ghz.to_string(), "2.4GHz");
        assert_eq!("LAN".parse::<LinkType>().unwrap(), LinkType::Lan);
    }

    #[test]
    fn remote_requires_connected_peripheral() {
        assert!(!peripheral(DeviceCategory::Audio, DeviceStatus::Disconnected).accepts_remote());
        assert!(peripheral(DeviceCategory::Audio, DeviceStatus::Connected).accepts_remote());
        assert!(!peripheral(DeviceCategory::Handset, DeviceStatus::Connected).accepts_remote());
    }

    #[test]
    fn peripheral_address_label_is_na() {
        let device = peripheral(DeviceCategory::Audio, DeviceStatus::Connected);
        assert_eq!(device.address_label(), "N/A");
        assert_eq!(device.kind(), DeviceKind::Peripheral);
    }
}
