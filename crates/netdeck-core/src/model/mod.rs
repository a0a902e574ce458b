// ── Unified domain model ──
//
// Canonical representation of everything the topology shows: devices of
// both variants, the router's static metadata and the focus target.

pub mod common;
pub mod device;
pub mod entity_id;
pub mod focus;
pub mod network;

// ── Re-exports ──────────────────────────────────────────────────────
// Flat access: `use netdeck_core::model::*` gives you everything.

pub use common::{LinkHandle, Traffic};
pub use device::{Device, DeviceCategory, DeviceInfo, DeviceStatus, IpDevice, LinkType, Peripheral};
pub use entity_id::{DeviceId, DeviceKey, DeviceKind};
pub use focus::{Focus, Node};
pub use network::{
    CatalogEntry, NetworkInfo, NetworkTest, TestStatus, WifiBand, WifiFrequency,
};
