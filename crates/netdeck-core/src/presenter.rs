// ── Selection / detail presenter ──
//
// Pure read-transform from a topology snapshot to the detail panel's
// view model. The only input besides the snapshot is an RNG for the
// gateway's CPU jitter.

use std::net::Ipv4Addr;

use rand::Rng;
use serde::Serialize;

use crate::model::{
    Device, DeviceCategory, DeviceKey, DeviceStatus, Focus, LinkType, NetworkInfo, Traffic,
};
use crate::store::TopologySnapshot;

const CPU_BASE_PCT: u32 = 15;
const CPU_PER_CLIENT_PCT: u32 = 8;
const CPU_JITTER_PCT: u32 = 10;
const CPU_CRITICAL_PCT: u32 = 80;
const MEM_BASE_MB: u32 = 30;
const MEM_PER_CLIENT_MB: u32 = 5;
const RADIO_ID_DISPLAY_CHARS: usize = 18;

// ── View model ───────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum DetailView {
    Wan(WanDetail),
    Gateway(GatewayDetail),
    Device(DeviceDetail),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WanDetail {
    pub total: Traffic,
    pub wan_ip: Ipv4Addr,
    pub connection: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GatewayDetail {
    pub cpu_load_pct: u32,
    pub cpu_critical: bool,
    pub memory_mb: u32,
    pub active_clients: usize,
    pub model: String,
    pub lan_ip: Ipv4Addr,
    pub firmware: String,
}

/// Status indicator colour class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum StatusTone {
    Active,
    Pairing,
    Error,
    Idle,
    Warning,
}

impl StatusTone {
    pub fn of(status: DeviceStatus) -> Self {
        match status {
            DeviceStatus::Connected | DeviceStatus::Online => Self::Active,
            DeviceStatus::Pairing => Self::Pairing,
            DeviceStatus::Error => Self::Error,
            DeviceStatus::Disconnected => Self::Idle,
            DeviceStatus::Sync => Self::Warning,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "fields", rename_all = "snake_case")]
pub enum DeviceFields {
    Network {
        ip: Ipv4Addr,
        mac: String,
        link: LinkType,
        latency_ms: u32,
        traffic: Traffic,
    },
    Radio {
        identifier: String,
        protocol: &'static str,
        signal: String,
        pairing_error: Option<String>,
    },
}

/// Which controls the panel offers for a device.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DeviceActions {
    pub pair: bool,
    pub forget: bool,
    pub remote: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceDetail {
    pub key: DeviceKey,
    pub name: String,
    pub category: DeviceCategory,
    pub status: DeviceStatus,
    pub tone: StatusTone,
    pub caption: &'static str,
    pub fields: DeviceFields,
    pub actions: DeviceActions,
}

// ── Presentation ─────────────────────────────────────────────────────

/// Build the detail view for the snapshot's current focus. `None` when
/// nothing is focused or the focused device is gone.
pub fn present<R: Rng>(
    snapshot: &TopologySnapshot,
    network: &NetworkInfo,
    rng: &mut R,
) -> Option<DetailView> {
    match snapshot.focus.as_ref()? {
        Focus::Wan => Some(DetailView::Wan(wan(snapshot, network))),
        Focus::Gateway => Some(DetailView::Gateway(gateway(snapshot, network, rng))),
        Focus::Device(key) => snapshot
            .device(key)
            .map(|device| DetailView::Device(device_detail(&device))),
    }
}

pub fn wan(snapshot: &TopologySnapshot, network: &NetworkInfo) -> WanDetail {
    WanDetail {
        total: snapshot.ip_traffic(),
        wan_ip: network.wan_ip,
        connection: "Connected",
    }
}

pub fn gateway<R: Rng>(
    snapshot: &TopologySnapshot,
    network: &NetworkInfo,
    rng: &mut R,
) -> GatewayDetail {
    let active_clients = snapshot.active_clients();
    let active = u32::try_from(active_clients).unwrap_or(u32::MAX);
    let cpu_load_pct = CPU_BASE_PCT
        .saturating_add(CPU_PER_CLIENT_PCT.saturating_mul(active))
        .saturating_add(rng.gen_range(0..CPU_JITTER_PCT));
    GatewayDetail {
        cpu_load_pct,
        cpu_critical: cpu_load_pct > CPU_CRITICAL_PCT,
        memory_mb: MEM_BASE_MB.saturating_add(MEM_PER_CLIENT_MB.saturating_mul(active)),
        active_clients,
        model: network.router_model.clone(),
        lan_ip: network.gateway,
        firmware: network.firmware_version.clone(),
    }
}

pub fn device_detail(device: &Device) -> DeviceDetail {
    let status = device.status();
    let (fields, caption, actions) = match device {
        Device::Ip(d) => (
            DeviceFields::Network {
                ip: d.ip,
                mac: d.info.id.to_string(),
                link: d.link,
                latency_ms: d.latency_ms,
                traffic: d.info.traffic,
            },
            "Real-time",
            DeviceActions {
                remote: device.accepts_remote(),
                ..DeviceActions::default()
            },
        ),
        Device::Peripheral(p) => (
            DeviceFields::Radio {
                identifier: format!("{}...", p.info.id.prefix(RADIO_ID_DISPLAY_CHARS)),
                protocol: "BLE / GATT",
                signal: p
                    .rssi
                    .map_or_else(|| "N/A".to_owned(), |rssi| format!("{rssi} dBm")),
                pairing_error: p.pairing_error.clone(),
            },
            "Low Energy",
            DeviceActions {
                pair: !matches!(status, DeviceStatus::Connected | DeviceStatus::Pairing),
                forget: true,
                remote: device.accepts_remote(),
            },
        ),
    };

    DeviceDetail {
        key: device.key(),
        name: device.name().to_owned(),
        category: device.category(),
        status,
        tone: StatusTone::of(status),
        caption,
        fields,
        actions,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use chrono::Utc;
    use pretty_assertions::assert_eq;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::model::{DeviceId, DeviceInfo, IpDevice, Peripheral};
    use crate::store::DeviceList;

    fn ip(id: &str, status: DeviceStatus, down: u32, up: u32) -> Arc<IpDevice> {
        Arc::new(IpDevice {
            info: DeviceInfo {
                name: format!("host-{id}"),
                id: DeviceId::from(id),
                category: DeviceCategory::Tv,
                status,
                discovered_at: Utc::now(),
                traffic: Traffic { down, up },
            },
            ip: Ipv4Addr::new(192, 168, 50, 201),
            link: LinkType::Band24Ghz,
            latency_ms: 12,
        })
    }

    fn peripheral(id: &str, status: DeviceStatus) -> Arc<Peripheral> {
        Arc::new(Peripheral {
            info: DeviceInfo {
                name: "Soundbar".into(),
                id: DeviceId::from(id),
                category: DeviceCategory::Audio,
                status,
                discovered_at: Utc::now(),
                traffic: Traffic::ZERO,
            },
            link: None,
            pairing_error: (status == DeviceStatus::Error).then(|| "X".to_owned()),
            rssi: None,
            manufacturer: None,
            generation: 1,
        })
    }

    fn snapshot(
        ips: Vec<Arc<IpDevice>>,
        peripherals: Vec<Arc<Peripheral>>,
        focus: Focus,
    ) -> TopologySnapshot {
        TopologySnapshot {
            ip_devices: ips.into_iter().collect::<DeviceList<_>>(),
            peripherals: peripherals.into_iter().collect::<DeviceList<_>>(),
            focus: Some(focus),
            version: 1,
        }
    }

    #[test]
    fn nothing_focused_presents_nothing() {
        let snap = TopologySnapshot::default();
        let mut rng = StdRng::seed_from_u64(0);
        assert!(present(&snap, &NetworkInfo::builtin(), &mut rng).is_none());
    }

    #[test]
    fn wan_sums_ip_traffic() {
        let snap = snapshot(
            vec![
                ip("a", DeviceStatus::Online, 1200, 40),
                ip("b", DeviceStatus::Sync, 300, 5),
            ],
            vec![peripheral("p", DeviceStatus::Connected)],
            Focus::Wan,
        );
        let mut rng = StdRng::seed_from_u64(0);
        let Some(DetailView::Wan(wan)) = present(&snap, &NetworkInfo::builtin(), &mut rng) else {
            panic!("expected wan view");
        };
        assert_eq!(wan.total, Traffic { down: 1500, up: 45 });
        assert_eq!(wan.wan_ip, Ipv4Addr::new(193, 165, 79, 58));
        assert_eq!(wan.connection, "Connected");
    }

    #[test]
    fn gateway_load_with_two_active_clients() {
        let snap = snapshot(
            vec![
                ip("a", DeviceStatus::Online, 0, 0),
                ip("b", DeviceStatus::Online, 0, 0),
                ip("c", DeviceStatus::Sync, 0, 0),
            ],
            vec![],
            Focus::Gateway,
        );
        let network = NetworkInfo::builtin();
        for seed in 0..64 {
            let mut rng = StdRng::seed_from_u64(seed);
            let detail = gateway(&snap, &network, &mut rng);
            assert!((31..41).contains(&detail.cpu_load_pct));
            assert!(!detail.cpu_critical);
            assert_eq!(detail.memory_mb, 40);
            assert_eq!(detail.active_clients, 2);
            assert_eq!(detail.model, "RT-AC1200 V2");
            assert_eq!(detail.lan_ip, Ipv4Addr::new(192, 168, 50, 1));
        }
    }

    #[test]
    fn gateway_flags_critical_cpu() {
        let ips = (0..9)
            .map(|i| ip(&i.to_string(), DeviceStatus::Online, 0, 0))
            .collect();
        let snap = snapshot(ips, vec![], Focus::Gateway);
        let mut rng = StdRng::seed_from_u64(5);
        let detail = gateway(&snap, &NetworkInfo::builtin(), &mut rng);
        assert!(detail.cpu_load_pct >= 87);
        assert!(detail.cpu_critical);
    }

    #[test]
    fn ip_device_shows_network_fields() {
        let device = Device::Ip(ip("CC:4B:73:XX:XX:XX", DeviceStatus::Sync, 2048, 64));
        let detail = device_detail(&device);

        assert_eq!(detail.caption, "Real-time");
        assert_eq!(detail.tone, StatusTone::Warning);
        assert_eq!(
            detail.fields,
            DeviceFields::Network {
                ip: Ipv4Addr::new(192, 168, 50, 201),
                mac: "CC:4B:73:XX:XX:XX".into(),
                link: LinkType::Band24Ghz,
                latency_ms: 12,
                traffic: Traffic { down: 2048, up: 64 },
            }
        );
        assert_eq!(
            detail.actions,
            DeviceActions {
                pair: false,
                forget: false,
                remote: true,
            }
        );
    }

    #[test]
    fn peripheral_shows_radio_fields() {
        let device = Device::Peripheral(peripheral(
            "AbCdEfGhIjKlMnOpQrStUv==",
            DeviceStatus::Error,
        ));
        let detail = device_detail(&device);

        assert_eq!(detail.caption, "Low Energy");
        assert_eq!(detail.tone, StatusTone::Error);
        assert_eq!(
            detail.fields,
            DeviceFields::Radio {
                identifier: "AbCdEfGhIjKlMnOpQr...".into(),
                protocol: "BLE / GATT",
                signal: "N/A".into(),
                pairing_error: Some("X".into()),
            }
        );
        assert!(detail.actions.pair);
        assert!(detail.actions.forget);
        assert!(!detail.actions.remote);
    }

    #[test]
    fn connected_peripheral_offers_remote_but_not_pair() {
        let detail = device_detail(&Device::Peripheral(peripheral("p", DeviceStatus::Connected)));
        assert_eq!(detail.tone, StatusTone::Active);
        assert!(!detail.actions.pair);
        assert!(detail.actions.remote);
    }

    #[test]
    fn tones_cover_every_status() {
        assert_eq!(StatusTone::of(DeviceStatus::Online), StatusTone::Active);
        assert_eq!(StatusTone::of(DeviceStatus::Pairing), StatusTone::Pairing);
        assert_eq!(StatusTone::of(DeviceStatus::Disconnected), StatusTone::Idle);
        assert_eq!(StatusTone::of(DeviceStatus::Sync), StatusTone::Warning);
    }

    #[test]
    fn focus_on_vanished_device_presents_nothing() {
        let snap = snapshot(vec![], vec![], Focus::Device(DeviceKey::peripheral("gone")));
        let mut rng = StdRng::seed_from_u64(0);
        assert!(present(&snap, &NetworkInfo::builtin(), &mut rng).is_none());
    }
}
