// ── Static network metadata ──
//
// Read-only description of the simulated router: addresses, identity,
// Wi-Fi bands, the discovery catalog and recorded connectivity tests.

use std::net::Ipv4Addr;

use serde::{Deserialize, Serialize};

use super::device::{DeviceCategory, LinkType};
use super::entity_id::DeviceId;

/// One IP device eligible for discovery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub hostname: String,
    pub ip: Ipv4Addr,
    pub mac: DeviceId,
    pub category: DeviceCategory,
    pub link: LinkType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WifiFrequency {
    #[serde(rename = "2.4GHz")]
    Band24Ghz,
    #[serde(rename = "5GHz")]
    Band5Ghz,
}

/// A broadcast SSID on one radio band.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WifiBand {
    pub frequency: WifiFrequency,
    pub ssid: String,
    pub mac: String,
    #[serde(default)]
    pub hidden: bool,
    pub auth: String,
    pub encryption: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
pub enum TestStatus {
    Passed,
    Failed,
    Running,
}

/// A recorded connectivity check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkTest {
    pub name: String,
    pub status: TestStatus,
    pub timestamp: String,
}

/// Everything the topology knows about the router it hangs off.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkInfo {
    pub ssid: String,
    pub gateway: Ipv4Addr,
    /// This host's address on the LAN.
    pub ip: Ipv4Addr,
    pub wan_ip: Ipv4Addr,
    #[serde(default)]
    pub ddns: Option<String>,
    pub router_model: String,
    pub firmware_version: String,
    #[serde(default = "default_operation_mode")]
    pub operation_mode: String,
    #[serde(default = "default_security_type")]
    pub security_type: String,
    #[serde(default)]
    pub bands: Vec<WifiBand>,
    #[serde(default)]
    pub devices: Vec<CatalogEntry>,
    #[serde(default)]
    pub tests: Vec<NetworkTest>,
}

fn default_operation_mode() -> String {
    "Wireless Router".into()
}

fn default_security_type() -> String {
    "WPA2-Personal".into()
}

impl NetworkInfo {
    /// The router the dashboard ships with.
    pub fn builtin() -> Self {
        Self {
            ssid: "iPwnZu".into(),
            gateway: Ipv4Addr::new(192, 168, 50, 1),
            ip: Ipv4Addr::new(192, 168, 50, 42),
            wan_ip: Ipv4Addr::new(193, 165, 79, 58),
            ddns: Some("ipwnzu.asuscomm.com".into()),
            router_model: "RT-AC1200 V2".into(),
            firmware_version: "3.0.0.4.382_70638".into(),
            operation_mode: default_operation_mode(),
            security_type: default_security_type(),
            bands: vec![
                WifiBand {
                    frequency: WifiFrequency::Band5Ghz,
                    ssid: "iPwnZu".into(),
                    mac: "7C:10:C9:D6:0B:BC".into(),
                    hidden: false,
                    auth: "WPA2-Personal".into(),
                    encryption: "AES".into(),
                },
                WifiBand {
                    frequency: WifiFrequency::Band24Ghz,
                    ssid: "iPwnZ".into(),
                    mac: "7C:10:C9:D6:0B:B8".into(),
                    hidden: true,
                    auth: "WPA2-Personal".into(),
                    encryption: "AES".into(),
                },
            ],
            devices: vec![
                CatalogEntry {
                    hostname: "Frank's iPhone 15".into(),
                    ip: Ipv4Addr::new(192, 168, 50, 154),
                    mac: DeviceId::from("8A:2F:11:XX:XX:XX"),
                    category: DeviceCategory::Handset,
                    link: LinkType::Band5Ghz,
                },
                CatalogEntry {
                    hostname: "Samsung TV 55".into(),
                    ip: Ipv4Addr::new(192, 168, 50, 201),
                    mac: DeviceId::from("CC:4B:73:XX:XX:XX"),
                    category: DeviceCategory::Tv,
                    link: LinkType::Band24Ghz,
                },
                CatalogEntry {
                    hostname: "Workstation-PC".into(),
                    ip: Ipv4Addr::new(192, 168, 50, 42),
                    mac: DeviceId::from("DC:41:A9:XX:XX:XX"),
                    category: DeviceCategory::Computer,
                    link: LinkType::Lan,
                },
            ],
            tests: [
                ("GatewayCanBePinged", "2:12:31"),
                ("LanConnectivity", "2:12:32"),
                ("DnsResolution", "2:12:35"),
                ("SignalStrength", "2:12:38"),
                ("HasSecureWiFiConnection", "2:12:40"),
                ("HttpsFirewall", "2:12:41"),
                ("ArcHttp", "2:12:44"),
            ]
            .into_iter()
            .map(|(name, timestamp)| NetworkTest {
                name: name.into(),
                status: TestStatus::Passed,
                timestamp: timestamp.into(),
            })
            .collect(),
        }
    }
}

impl Default for NetworkInfo {
    fn default() -> Self {
        Self::builtin()
    }
}
