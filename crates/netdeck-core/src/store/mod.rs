// ── Device storage ──
//
// The registry owns both device lists, the focus and the live radio
// links. Everything else reads snapshots and writes through it.

mod collection;
mod links;
mod registry;

pub use collection::{DeviceList, Listed};
pub(crate) use registry::{Admission, PairingTicket};
pub use registry::{Registry, TopologySnapshot};
