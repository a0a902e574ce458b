// ── Pairing controller ──
//
// Scan, pair and forget for short-range radio peripherals. The radio is
// optional: without one, scanning is unavailable and pairing degrades to
// a fixed simulated delay. Results that arrive after the device was
// forgotten (or forgotten and re-added) are dropped by the registry's
// generation check.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use chrono::Utc;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::error::CoreError;
use crate::model::{
    DeviceCategory, DeviceId, DeviceInfo, DeviceKey, DeviceStatus, Peripheral, Traffic,
};
use crate::radio::{DeviceRequest, RadioAdapter, RadioError};
use crate::store::{Admission, Registry};

const DEFAULT_MANUFACTURER: &str = "Generic BLE";
const NO_CONNECT_MESSAGE: &str = "GATT server unavailable";

/// What a scan ended with. None of these are errors to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOutcome {
    Added(DeviceKey),
    /// A peripheral with the same identifier is already listed; it is
    /// focused instead.
    AlreadyKnown(DeviceKey),
    Cancelled,
    Failed(String),
    /// No radio capability on this platform.
    Unavailable,
}

/// What a pairing attempt ended with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PairOutcome {
    Connected,
    /// Recorded on the device as its pairing error.
    Failed(String),
    /// The device was forgotten while the attempt was in flight.
    Abandoned,
}

/// Orchestrates the radio capability against the registry.
pub struct PairingController {
    registry: Arc<Registry>,
    radio: Option<Arc<dyn RadioAdapter>>,
    request: DeviceRequest,
    simulated_delay: Duration,
    scanning: watch::Sender<bool>,
    scans: AtomicUsize,
}

/// Holds the scanning flag up while a device request is open. Dropping
/// it, including when the scan future is cancelled, lowers the flag once
/// no other scan is in flight.
struct ScanGuard<'a> {
    scans: &'a AtomicUsize,
    flag: &'a watch::Sender<bool>,
}

impl<'a> ScanGuard<'a> {
    fn enter(scans: &'a AtomicUsize, flag: &'a watch::Sender<bool>) -> Self {
        flag.send_if_modified(|scanning| {
            scans.fetch_add(1, Ordering::AcqRel);
            !std::mem::replace(scanning, true)
        });
        Self { scans, flag }
    }
}

impl Drop for ScanGuard<'_> {
    fn drop(&mut self) {
        self.flag.send_if_modified(|scanning| {
            let remaining = self.scans.fetch_sub(1, Ordering::AcqRel) - 1;
            let next = remaining > 0;
            next != std::mem::replace(scanning, next)
        });
    }
}

impl PairingController {
    pub fn new(
        registry: Arc<Registry>,
        radio: Option<Arc<dyn RadioAdapter>>,
        request: DeviceRequest,
        simulated_delay: Duration,
    ) -> Self {
        let (scanning, _) = watch::channel(false);
        Self {
            registry,
            radio,
            request,
            simulated_delay,
            scanning,
            scans: AtomicUsize::new(0),
        }
    }

    /// Whether a usable radio capability is present.
    pub fn is_supported(&self) -> bool {
        self.radio.as_ref().is_some_and(|r| r.is_supported())
    }

    pub fn is_scanning(&self) -> bool {
        *self.scanning.borrow()
    }

    /// Observe the scanning flag.
    pub fn scanning(&self) -> watch::Receiver<bool> {
        self.scanning.subscribe()
    }

    // ── Scan ─────────────────────────────────────────────────────────

    /// Ask the radio for a device and list it as a disconnected
    /// peripheral. Cancellation and errors leave the registry untouched.
    pub async fn scan(&self) -> ScanOutcome {
        let Some(radio) = self.radio.as_ref().filter(|r| r.is_supported()) else {
            debug!("scan requested without a radio capability");
            return ScanOutcome::Unavailable;
        };

        let guard = ScanGuard::enter(&self.scans, &self.scanning);
        let result = radio.request_device(&self.request).await;
        drop(guard);

        let link = match result {
            Ok(link) => link,
            Err(RadioError::Cancelled) => {
                debug!("scan cancelled");
                return ScanOutcome::Cancelled;
            }
            Err(RadioError::Unsupported) => return ScanOutcome::Unavailable,
            Err(e) => {
                warn!(error = %e, "scan failed");
                return ScanOutcome::Failed(e.to_string());
            }
        };

        let id = DeviceId::new(link.id());
        let name = link
            .name()
            .map_or_else(|| format!("Unknown BT Device ({})", id.prefix(4)), str::to_owned);
        let peripheral = Peripheral {
            info: DeviceInfo {
                category: DeviceCategory::from_advertised_name(link.name()),
                name,
                id,
                status: DeviceStatus::Disconnected,
                discovered_at: Utc::now(),
                traffic: Traffic::ZERO,
            },
            link: None,
            pairing_error: None,
            rssi: link.rssi(),
            manufacturer: Some(DEFAULT_MANUFACTURER.into()),
            generation: 0,
        };

        match self.registry.admit_peripheral(peripheral, Some(link)) {
            Admission::Added(key) => {
                info!(device = %key, "peripheral added");
                ScanOutcome::Added(key)
            }
            Admission::Duplicate(key) => {
                debug!(device = %key, "peripheral already listed");
                ScanOutcome::AlreadyKnown(key)
            }
        }
    }

    // ── Pair ─────────────────────────────────────────────────────────

    /// Pair a listed peripheral. Radio failures end in the `Error` state
    /// with the failure message; only API misuse is an `Err`.
    pub async fn pair(&self, id: &DeviceId) -> Result<PairOutcome, CoreError> {
        let ticket = self.registry.begin_pairing(id)?;
        debug!(device = %id, "pairing started");

        let link = match ticket.link {
            None => None,
            // Forgotten between begin and here.
            Some(handle) => match self.registry.link(handle) {
                None => return Ok(PairOutcome::Abandoned),
                link => link,
            },
        };

        let result = match &link {
            None => {
                tokio::time::sleep(self.simulated_delay).await;
                Ok(())
            }
            Some(link) if !link.can_connect() => Err(NO_CONNECT_MESSAGE.to_owned()),
            Some(link) => link.connect().await.map_err(|e| e.pairing_message()),
        };

        if !self.registry.finish_pairing(id, ticket, result.clone()) {
            if let Some(link) = link.filter(|l| l.is_connected()) {
                link.disconnect().await;
            }
            return Ok(PairOutcome::Abandoned);
        }

        Ok(match result {
            Ok(()) => {
                info!(device = %id, "peripheral connected");
                PairOutcome::Connected
            }
            Err(message) => {
                warn!(device = %id, error = %message, "pairing failed");
                PairOutcome::Failed(message)
            }
        })
    }

    // ── Forget ───────────────────────────────────────────────────────

    /// Remove a peripheral and release its link in one step, then close
    /// the link's session if it has one. Returns `false` if nothing was
    /// listed under `id`.
    pub async fn forget(&self, id: &DeviceId) -> bool {
        let Some((_, link)) = self.registry.remove_peripheral(id) else {
            return false;
        };
        info!(device = %id, "peripheral forgotten");

        if let Some(link) = link.filter(|l| l.is_connected()) {
            link.disconnect().await;
            debug!(device = %id, "link disconnected");
        }
        true
    }
}
