// ── Central device registry ──
//
// Both device lists and the current focus live in one immutable
// snapshot behind a `watch` channel. Every mutation builds a new
// snapshot under the channel's write lock and swaps it in whole, so a
// reader never sees a removed device still selected.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;
use tokio::sync::watch;
use tracing::debug;

use super::collection::DeviceList;
use super::links::LinkTable;
use crate::error::CoreError;
use crate::model::{
    Device, DeviceId, DeviceKey, DeviceKind, DeviceStatus, Focus, IpDevice, LinkHandle, Node,
    Peripheral, Traffic,
};
use crate::radio::RadioLink;
use crate::stream::TopologyStream;

// ── Snapshot ─────────────────────────────────────────────────────────

/// Point-in-time view of the whole topology.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TopologySnapshot {
    pub ip_devices: DeviceList<IpDevice>,
    pub peripherals: DeviceList<Peripheral>,
    pub focus: Option<Focus>,
    /// Bumped on every committed change.
    pub version: u64,
}

impl TopologySnapshot {
    /// The merged list: IP devices first, then peripherals.
    pub fn devices(&self) -> impl Iterator<Item = Device> + '_ {
        self.ip_devices
            .iter()
            .map(|d| Device::Ip(Arc::clone(d)))
            .chain(
                self.peripherals
                    .iter()
                    .map(|p| Device::Peripheral(Arc::clone(p))),
            )
    }

    pub fn device_count(&self) -> usize {
        self.ip_devices.len() + self.peripherals.len()
    }

    pub fn device(&self, key: &DeviceKey) -> Option<Device> {
        match key.kind {
            DeviceKind::Ip => self
                .ip_devices
                .get(&key.id)
                .map(|d| Device::Ip(Arc::clone(d))),
            DeviceKind::Peripheral => self
                .peripherals
                .get(&key.id)
                .map(|p| Device::Peripheral(Arc::clone(p))),
        }
    }

    pub fn contains(&self, key: &DeviceKey) -> bool {
        match key.kind {
            DeviceKind::Ip => self.ip_devices.contains(&key.id),
            DeviceKind::Peripheral => self.peripherals.contains(&key.id),
        }
    }

    /// The device behind the current focus, if the focus is a device.
    pub fn selected_device(&self) -> Option<Device> {
        self.focus
            .as_ref()
            .and_then(Focus::device)
            .and_then(|key| self.device(key))
    }

    /// IP devices currently reporting `Online`.
    pub fn active_clients(&self) -> usize {
        self.ip_devices
            .iter()
            .filter(|d| d.info.status == DeviceStatus::Online)
            .count()
    }

    /// Aggregate traffic over IP devices.
    pub fn ip_traffic(&self) -> Traffic {
        self.ip_devices.iter().map(|d| d.info.traffic).sum()
    }

    /// A copy with `focus` cleared if it points at `key`.
    fn unfocus(&self, key: &DeviceKey) -> Option<Focus> {
        match &self.focus {
            Some(Focus::Device(selected)) if selected == key => None,
            other => other.clone(),
        }
    }
}

// ── Outcomes ─────────────────────────────────────────────────────────

/// Result of offering a scanned peripheral to the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Admission {
    Added(DeviceKey),
    Duplicate(DeviceKey),
}

/// Issued when a pairing attempt starts; identifies the exact entry the
/// attempt belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PairingTicket {
    pub(crate) generation: u64,
    pub(crate) link: Option<LinkHandle>,
}

// ── Registry ─────────────────────────────────────────────────────────

/// Registry of IP devices and wireless peripherals.
pub struct Registry {
    state: watch::Sender<Arc<TopologySnapshot>>,
    links: LinkTable,
    admissions: AtomicU64,
}

impl Registry {
    pub fn new() -> Self {
        let (state, _) = watch::channel(Arc::new(TopologySnapshot::default()));
        Self {
            state,
            links: LinkTable::new(),
            admissions: AtomicU64::new(0),
        }
    }

    // ── Reads ────────────────────────────────────────────────────────

    pub fn snapshot(&self) -> Arc<TopologySnapshot> {
        Arc::clone(&self.state.borrow())
    }

    pub fn subscribe(&self) -> TopologyStream {
        TopologyStream::new(self.state.subscribe())
    }

    pub fn ip_count(&self) -> usize {
        self.state.borrow().ip_devices.len()
    }

    pub fn peripheral(&self, id: &DeviceId) -> Option<Arc<Peripheral>> {
        self.state.borrow().peripherals.get(id).cloned()
    }

    /// The live link behind a handle, if the registry still owns it.
    pub fn link(&self, handle: LinkHandle) -> Option<Arc<dyn RadioLink>> {
        self.links.get(handle)
    }

    /// Number of live links the registry owns.
    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    // ── Commit primitive ─────────────────────────────────────────────

    /// Apply `f` to the current snapshot under the write lock. `f`
    /// returns the replacement snapshot, or `None` to leave it as is.
    fn commit(&self, f: impl FnOnce(&TopologySnapshot) -> Option<TopologySnapshot>) -> bool {
        self.state.send_if_modified(|current| match f(current) {
            Some(mut next) => {
                next.version = current.version + 1;
                *current = Arc::new(next);
                true
            }
            None => false,
        })
    }

    // ── IP devices ───────────────────────────────────────────────────

    /// Replace the IP device list with the list `f` derives from it.
    /// Returning `None` leaves the snapshot untouched.
    pub(crate) fn update_ip_devices(
        &self,
        f: impl FnOnce(&DeviceList<IpDevice>) -> Option<DeviceList<IpDevice>>,
    ) -> bool {
        self.commit(|current| {
            Some(TopologySnapshot {
                ip_devices: f(&current.ip_devices)?,
                ..current.clone()
            })
        })
    }

    // ── Peripherals ──────────────────────────────────────────────────

    /// Add a scanned peripheral unless one with the same identifier is
    /// already known. Either way the entry ends up focused. The link of a
    /// duplicate is dropped, never stored.
    pub(crate) fn admit_peripheral(
        &self,
        mut peripheral: Peripheral,
        link: Option<Arc<dyn RadioLink>>,
    ) -> Admission {
        let key = DeviceKey::peripheral(peripheral.info.id.clone());
        let mut admission = Admission::Duplicate(key.clone());

        self.commit(|current| {
            let focus = Some(Focus::Device(key.clone()));
            if current.peripherals.contains(&key.id) {
                return (current.focus != focus).then(|| TopologySnapshot {
                    focus,
                    ..current.clone()
                });
            }

            peripheral.generation = self.admissions.fetch_add(1, Ordering::Relaxed) + 1;
            peripheral.link = link.map(|link| self.links.insert(link));
            admission = Admission::Added(key.clone());
            Some(TopologySnapshot {
                peripherals: current.peripherals.with_pushed(peripheral),
                focus,
                ..current.clone()
            })
        });

        admission
    }

    /// Move a peripheral into `Pairing`, clearing its last error.
    pub(crate) fn begin_pairing(&self, id: &DeviceId) -> Result<PairingTicket, CoreError> {
        let mut outcome = Err(CoreError::DeviceNotFound {
            identifier: id.to_string(),
        });

        self.commit(|current| {
            let existing = current.peripherals.get(id)?;
            if !existing.can_pair() {
                outcome = Err(CoreError::InvalidTransition {
                    identifier: id.to_string(),
                    from: existing.info.status,
                    to: DeviceStatus::Pairing,
                });
                return None;
            }

            outcome = Ok(PairingTicket {
                generation: existing.generation,
                link: existing.link,
            });
            let peripherals = current.peripherals.with_updated(id, |p| {
                p.info.status = DeviceStatus::Pairing;
                p.pairing_error = None;
            })?;
            Some(TopologySnapshot {
                peripherals,
                ..current.clone()
            })
        });

        outcome
    }

    /// Record the result of a pairing attempt. Returns `false` when the
    /// attempt is stale: the device was forgotten, re-added, or is no
    /// longer pairing.
    pub(crate) fn finish_pairing(
        &self,
        id: &DeviceId,
        ticket: PairingTicket,
        result: Result<(), String>,
    ) -> bool {
        let applied = self.commit(|current| {
            let existing = current.peripherals.get(id)?;
            if existing.generation != ticket.generation
                || existing.info.status != DeviceStatus::Pairing
            {
                return None;
            }

            let peripherals = current.peripherals.with_updated(id, |p| match result {
                Ok(()) => {
                    p.info.status = DeviceStatus::Connected;
                    p.pairing_error = None;
                }
                Err(message) => {
                    p.info.status = DeviceStatus::Error;
                    p.pairing_error = Some(message);
                }
            })?;
            Some(TopologySnapshot {
                peripherals,
                ..current.clone()
            })
        });

        if !applied {
            debug!(device = %id, "ignoring stale pairing result");
        }
        applied
    }

    /// Remove a peripheral, clearing focus in the same commit if it
    /// pointed at it. Its link leaves the side table in the same step and
    /// is handed to the caller.
    pub(crate) fn remove_peripheral(
        &self,
        id: &DeviceId,
    ) -> Option<(Arc<Peripheral>, Option<Arc<dyn RadioLink>>)> {
        let key = DeviceKey::peripheral(id.clone());
        let mut removed = None;

        self.commit(|current| {
            let (peripherals, entry) = current.peripherals.without(id)?;
            removed = Some(entry);
            Some(TopologySnapshot {
                peripherals,
                focus: current.unfocus(&key),
                ..current.clone()
            })
        });

        removed.map(|entry| {
            let link = entry.link.and_then(|handle| self.links.take(handle));
            (entry, link)
        })
    }

    // ── Focus ────────────────────────────────────────────────────────

    /// Click on the WAN or gateway node. Clicking the focused node again
    /// closes the detail panel.
    pub fn focus_node(&self, node: Node) -> Option<Focus> {
        let target = Focus::from(node);
        let mut focus = None;
        self.commit(|current| {
            let already = current.focus.as_ref() == Some(&target);
            focus = (!already).then_some(target);
            Some(TopologySnapshot {
                focus: focus.clone(),
                ..current.clone()
            })
        });
        focus
    }

    /// Focus a device present in either list.
    pub fn select_device(&self, key: &DeviceKey) -> Result<(), CoreError> {
        let mut found = false;
        self.commit(|current| {
            if !current.contains(key) {
                return None;
            }
            found = true;
            Some(TopologySnapshot {
                focus: Some(Focus::Device(key.clone())),
                ..current.clone()
            })
        });

        if found {
            Ok(())
        } else {
            Err(CoreError::DeviceNotFound {
                identifier: key.to_string(),
            })
        }
    }

    pub fn clear_focus(&self) {
        self.commit(|current| {
            current.focus.as_ref()?;
            Some(TopologySnapshot {
                focus: None,
                ..current.clone()
            })
        });
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}
