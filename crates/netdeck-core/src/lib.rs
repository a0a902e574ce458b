// netdeck-core: simulated network topology shared by the CLI and tests.
//
// A registry of IP devices and short-range radio peripherals, a
// discovery simulator that reveals and animates the IP side, a pairing
// controller over an optional radio capability, a detail presenter and
// a self-clearing remote command signal.

pub mod config;
pub mod discovery;
pub mod error;
pub mod model;
pub mod pairing;
pub mod presenter;
pub mod radio;
pub mod remote;
pub mod store;
pub mod stream;
pub mod topology;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{DiscoverySettings, TopologyConfig};
pub use discovery::DiscoverySimulator;
pub use error::CoreError;
pub use pairing::{PairOutcome, PairingController, ScanOutcome};
pub use presenter::{
    DetailView, DeviceActions, DeviceDetail, DeviceFields, GatewayDetail, StatusTone, WanDetail,
};
pub use radio::{
    Advertisement, ConnectBehavior, DeviceRequest, RadioAdapter, RadioError, RadioLink,
    SimulatedLink, SimulatedRadio,
};
pub use remote::{RemoteCommand, RemoteEmitter};
pub use store::{DeviceList, Registry, TopologySnapshot};
pub use stream::{DeviceFilter, TopologyStream};
pub use topology::Topology;

// Re-export model types at the crate root for ergonomics.
pub use model::{
    CatalogEntry, Device, DeviceCategory, DeviceId, DeviceInfo, DeviceKey, DeviceKind,
    DeviceStatus, Focus, IpDevice, LinkHandle, LinkType, NetworkInfo, NetworkTest, Node,
    Peripheral, TestStatus, Traffic, WifiBand, WifiFrequency,
};
