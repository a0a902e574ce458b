// ── Discovery simulator ──
//
// Periodically reveals catalog devices and jitters the live stats of
// every revealed IP device. The timer task is owned explicitly: `start`
// spawns it, `stop` cancels it and waits for it to exit, so no tick can
// land after `stop` returns.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::config::DiscoverySettings;
use crate::model::{CatalogEntry, DeviceInfo, DeviceStatus, IpDevice, Traffic};
use crate::store::{DeviceList, Registry};

const LATENCY_MIN_MS: u32 = 5;
const LATENCY_MAX_MS: u32 = 20;
const LATENCY_JITTER_MS: i64 = 3;
const MAX_DOWN_KBPS: u32 = 5000;
const MAX_UP_KBPS: u32 = 100;

// ── Pure tick step ───────────────────────────────────────────────────

/// Compute the IP device list one tick after `list`.
///
/// Reveals the next catalog entry with `settings.reveal_probability`,
/// then refreshes latency, status and traffic of every revealed device,
/// the fresh one included. Returns `None` when nothing is revealed yet.
pub fn advance<R: Rng>(
    list: &DeviceList<IpDevice>,
    catalog: &[CatalogEntry],
    settings: &DiscoverySettings,
    rng: &mut R,
    now: DateTime<Utc>,
) -> Option<DeviceList<IpDevice>> {
    let mut devices: Vec<IpDevice> = list.iter().map(|d| d.as_ref().clone()).collect();

    if let Some(entry) = catalog.get(devices.len()) {
        if rng.gen_bool(settings.reveal_probability) {
            let latency_ms = rng.gen_range(LATENCY_MIN_MS..LATENCY_MAX_MS);
            debug!(hostname = %entry.hostname, ip = %entry.ip, "device discovered");
            devices.push(reveal(entry, latency_ms, now));
        }
    }

    if devices.is_empty() {
        return None;
    }

    for device in &mut devices {
        jitter(device, settings.sync_probability, rng);
    }
    Some(devices.into_iter().map(Arc::new).collect())
}

fn reveal(entry: &CatalogEntry, latency_ms: u32, now: DateTime<Utc>) -> IpDevice {
    IpDevice {
        info: DeviceInfo {
            name: entry.hostname.clone(),
            id: entry.mac.clone(),
            category: entry.category,
            status: DeviceStatus::Online,
            discovered_at: now,
            traffic: Traffic::ZERO,
        },
        ip: entry.ip,
        link: entry.link,
        latency_ms,
    }
}

fn jitter<R: Rng>(device: &mut IpDevice, sync_probability: f64, rng: &mut R) {
    let latency =
        i64::from(device.latency_ms) + rng.gen_range(-LATENCY_JITTER_MS..LATENCY_JITTER_MS);
    device.latency_ms = u32::try_from(latency.max(1)).unwrap_or(u32::MAX);
    device.info.status = if rng.gen_bool(sync_probability) {
        DeviceStatus::Sync
    } else {
        DeviceStatus::Online
    };
    device.info.traffic = Traffic {
        down: rng.gen_range(0..MAX_DOWN_KBPS),
        up: rng.gen_range(0..MAX_UP_KBPS),
    };
}

// ── Simulator ────────────────────────────────────────────────────────

struct Discovery {
    registry: Arc<Registry>,
    catalog: Arc<[CatalogEntry]>,
    settings: DiscoverySettings,
}

impl Discovery {
    fn tick<R: Rng>(&self, rng: &mut R) -> bool {
        self.registry.update_ip_devices(|list| {
            advance(list, &self.catalog, &self.settings, rng, Utc::now())
        })
    }
}

struct MonitorTask {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

/// Drives IP device discovery on a fixed interval.
pub struct DiscoverySimulator {
    discovery: Arc<Discovery>,
    task: Mutex<Option<MonitorTask>>,
    monitoring: watch::Sender<bool>,
}

impl DiscoverySimulator {
    /// `settings` must already be validated; probabilities outside
    /// `0.0..=1.0` panic on the first tick.
    pub fn new(
        registry: Arc<Registry>,
        catalog: impl Into<Arc<[CatalogEntry]>>,
        settings: DiscoverySettings,
    ) -> Self {
        let (monitoring, _) = watch::channel(false);
        Self {
            discovery: Arc::new(Discovery {
                registry,
                catalog: catalog.into(),
                settings,
            }),
            task: Mutex::new(None),
            monitoring,
        }
    }

    pub fn catalog(&self) -> &[CatalogEntry] {
        &self.discovery.catalog
    }

    pub fn is_monitoring(&self) -> bool {
        *self.monitoring.borrow()
    }

    /// Observe the monitoring flag.
    pub fn monitoring(&self) -> watch::Receiver<bool> {
        self.monitoring.subscribe()
    }

    /// Run one tick immediately, outside the timer.
    pub fn tick<R: Rng>(&self, rng: &mut R) -> bool {
        self.discovery.tick(rng)
    }

    /// Spawn the timer task. Returns `false` if it is already running.
    pub async fn start(&self) -> bool {
        let mut task = self.task.lock().await;
        if task.is_some() {
            return false;
        }

        let cancel = CancellationToken::new();
        let handle = tokio::spawn(discovery_task(
            Arc::clone(&self.discovery),
            cancel.clone(),
        ));
        *task = Some(MonitorTask { cancel, handle });
        self.monitoring.send_replace(true);
        info!(
            interval_ms = self.discovery.settings.interval.as_millis(),
            revealed = self.discovery.registry.ip_count(),
            "monitoring started"
        );
        true
    }

    /// Cancel the timer task and wait for it to exit. Returns `false` if
    /// it was not running.
    pub async fn stop(&self) -> bool {
        let Some(MonitorTask { cancel, handle }) = self.task.lock().await.take() else {
            return false;
        };
        cancel.cancel();
        let _ = handle.await;
        self.monitoring.send_replace(false);
        info!("monitoring stopped");
        true
    }

    /// Flip monitoring; returns the new state.
    pub async fn toggle(&self) -> bool {
        if self.stop().await {
            false
        } else {
            self.start().await
        }
    }
}

impl Drop for DiscoverySimulator {
    fn drop(&mut self) {
        if let Some(task) = self.task.get_mut().take() {
            task.cancel.cancel();
        }
    }
}

async fn discovery_task(discovery: Arc<Discovery>, cancel: CancellationToken) {
    let mut rng = StdRng::from_entropy();
    let mut interval = tokio::time::interval(discovery.settings.interval);
    interval.tick().await; // consume the immediate first tick

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => {
                discovery.tick(&mut rng);
            }
        }
    }
    debug!("discovery task exited");
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::NetworkInfo;

    fn catalog() -> Arc<[CatalogEntry]> {
        NetworkInfo::builtin().devices.into()
    }

    fn always_reveal() -> DiscoverySettings {
        DiscoverySettings {
            reveal_probability: 1.0,
            ..DiscoverySettings::default()
        }
    }

    #[test]
    fn revealed_count_is_monotonic_and_bounded() {
        let catalog = catalog();
        let settings = DiscoverySettings::default();
        let mut rng = StdRng::seed_from_u64(7);
        let mut list = DeviceList::default();
        let mut previous = 0;

        for _ in 0..200 {
            if let Some(next) = advance(&list, &catalog, &settings, &mut rng, Utc::now()) {
                list = next;
            }
            assert!(list.len() >= previous);
            assert!(list.len() <= catalog.len());
            previous = list.len();
        }
        assert_eq!(list.len(), catalog.len());
    }

    #[test]
    fn settled_devices_stay_within_bounds() {
        let catalog = catalog();
        let settings = always_reveal();
        let mut rng = StdRng::seed_from_u64(42);
        let mut list = DeviceList::default();

        for _ in 0..50 {
            list = advance(&list, &catalog, &settings, &mut rng, Utc::now()).unwrap();
            for device in &list {
                assert!(device.latency_ms >= 1);
                assert!(matches!(
                    device.info.status,
                    DeviceStatus::Online | DeviceStatus::Sync
                ));
                assert!(device.info.traffic.down < MAX_DOWN_KBPS);
                assert!(device.info.traffic.up < MAX_UP_KBPS);
            }
        }
        assert_eq!(list.len(), 3);
    }

    #[test]
    fn latency_never_drops_below_one() {
        let catalog = catalog();
        let settings = always_reveal();
        let mut rng = StdRng::seed_from_u64(1);
        let mut list = advance(&DeviceList::default(), &catalog, &settings, &mut rng, Utc::now())
            .unwrap()
            .iter()
            .map(|d| {
                let mut d = d.as_ref().clone();
                d.latency_ms = 1;
                Arc::new(d)
            })
            .collect::<DeviceList<_>>();

        for _ in 0..100 {
            list = advance(&list, &catalog[..1], &settings, &mut rng, Utc::now()).unwrap();
            assert!(list.as_slice()[0].latency_ms >= 1);
        }
    }

    #[test]
    fn reveal_follows_catalog_order() {
        let catalog = catalog();
        let settings = always_reveal();
        let mut rng = StdRng::seed_from_u64(3);
        let mut list = DeviceList::default();
        for _ in 0..3 {
            list = advance(&list, &catalog, &settings, &mut rng, Utc::now()).unwrap();
        }
        let names: Vec<&str> = list.iter().map(|d| d.info.name.as_str()).collect();
        let expected: Vec<&str> = catalog.iter().map(|e| e.hostname.as_str()).collect();
        assert_eq!(names, expected);
    }

    #[test]
    fn nothing_to_update_before_first_reveal() {
        let settings = DiscoverySettings {
            reveal_probability: 0.0,
            ..DiscoverySettings::default()
        };
        let mut rng = StdRng::seed_from_u64(0);
        let next = advance(&DeviceList::default(), &catalog(), &settings, &mut rng, Utc::now());
        assert!(next.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn timer_reveals_one_device_per_tick() {
        let registry = Arc::new(Registry::new());
        let sim = DiscoverySimulator::new(Arc::clone(&registry), catalog(), always_reveal());

        assert!(sim.start().await);
        assert!(sim.is_monitoring());
        tokio::time::sleep(Duration::from_millis(1700)).await;
        assert_eq!(registry.ip_count(), 2);

        tokio::time::sleep(Duration::from_millis(800)).await;
        assert_eq!(registry.ip_count(), 3);
        sim.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn stop_halts_all_mutation() {
        let registry = Arc::new(Registry::new());
        let sim = DiscoverySimulator::new(Arc::clone(&registry), catalog(), always_reveal());

        sim.start().await;
        tokio::time::sleep(Duration::from_millis(900)).await;
        assert!(sim.stop().await);
        assert!(!sim.is_monitoring());

        let frozen = registry.snapshot().version;
        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(registry.snapshot().version, frozen);
    }

    #[tokio::test(start_paused = true)]
    async fn restart_resumes_from_current_count() {
        let registry = Arc::new(Registry::new());
        let sim = DiscoverySimulator::new(Arc::clone(&registry), catalog(), always_reveal());

        sim.start().await;
        tokio::time::sleep(Duration::from_millis(900)).await;
        sim.stop().await;
        assert_eq!(registry.ip_count(), 1);

        assert!(sim.toggle().await);
        tokio::time::sleep(Duration::from_millis(900)).await;
        assert!(!sim.toggle().await);
        assert_eq!(registry.ip_count(), 2);
    }

    #[tokio::test]
    async fn start_twice_keeps_one_task() {
        let registry = Arc::new(Registry::new());
        let sim = DiscoverySimulator::new(registry, catalog(), DiscoverySettings::default());
        assert!(sim.start().await);
        assert!(!sim.start().await);
        assert!(sim.stop().await);
        assert!(!sim.stop().await);
    }
}
