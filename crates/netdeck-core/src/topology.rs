// ── Topology facade ──
//
// Single entry point for consumers. Owns the registry and wires the
// discovery simulator, pairing controller and remote emitter to it.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info};

use crate::config::TopologyConfig;
use crate::discovery::DiscoverySimulator;
use crate::error::CoreError;
use crate::model::{Device, DeviceKey, DeviceKind, Focus, NetworkInfo, Node};
use crate::pairing::{PairOutcome, PairingController, ScanOutcome};
use crate::presenter::{self, DetailView};
use crate::radio::RadioAdapter;
use crate::remote::{RemoteCommand, RemoteEmitter};
use crate::store::{Registry, TopologySnapshot};
use crate::stream::{DeviceFilter, TopologyStream};

/// The main entry point for consumers.
///
/// Cheaply cloneable via `Arc<TopologyInner>`. Does not start the
/// discovery loop until [`start()`](Self::start) is called.
#[derive(Clone)]
pub struct Topology {
    inner: Arc<TopologyInner>,
}

struct TopologyInner {
    config: TopologyConfig,
    network: Arc<NetworkInfo>,
    registry: Arc<Registry>,
    discovery: DiscoverySimulator,
    pairing: PairingController,
    remote: RemoteEmitter,
}

impl Topology {
    /// Build a topology. `radio` is the optional short-range radio
    /// capability; without it scanning is unavailable and pairing is
    /// simulated.
    pub fn new(
        config: TopologyConfig,
        network: NetworkInfo,
        radio: Option<Arc<dyn RadioAdapter>>,
    ) -> Result<Self, CoreError> {
        config.validate()?;

        let registry = Arc::new(Registry::new());
        let discovery = DiscoverySimulator::new(
            Arc::clone(&registry),
            network.devices.clone(),
            config.discovery.clone(),
        );
        let pairing = PairingController::new(
            Arc::clone(&registry),
            radio,
            config.request.clone(),
            config.pair_delay,
        );
        let remote = RemoteEmitter::new(config.remote_hold);

        Ok(Self {
            inner: Arc::new(TopologyInner {
                config,
                network: Arc::new(network),
                registry,
                discovery,
                pairing,
                remote,
            }),
        })
    }

    pub fn config(&self) -> &TopologyConfig {
        &self.inner.config
    }

    pub fn network(&self) -> &NetworkInfo {
        &self.inner.network
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.inner.registry
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    /// Begin monitoring if configured to do so.
    pub async fn start(&self) {
        if self.inner.config.monitor_on_start {
            self.inner.discovery.start().await;
        }
        info!(
            radio = self.inner.pairing.is_supported(),
            catalog = self.inner.network.devices.len(),
            "topology started"
        );
    }

    /// Stop every background task owned by the topology.
    pub async fn shutdown(&self) {
        self.inner.discovery.stop().await;
        debug!("topology shut down");
    }

    // ── Monitoring ───────────────────────────────────────────────────

    pub async fn start_monitoring(&self) -> bool {
        self.inner.discovery.start().await
    }

    pub async fn stop_monitoring(&self) -> bool {
        self.inner.discovery.stop().await
    }

    /// Flip monitoring; returns the new state.
    pub async fn toggle_monitoring(&self) -> bool {
        self.inner.discovery.toggle().await
    }

    pub fn is_monitoring(&self) -> bool {
        self.inner.discovery.is_monitoring()
    }

    pub fn monitoring(&self) -> watch::Receiver<bool> {
        self.inner.discovery.monitoring()
    }

    /// Run one discovery tick right now.
    pub fn tick(&self) -> bool {
        self.inner.discovery.tick(&mut rand::thread_rng())
    }

    // ── Pairing ──────────────────────────────────────────────────────

    pub fn is_radio_supported(&self) -> bool {
        self.inner.pairing.is_supported()
    }

    pub fn is_scanning(&self) -> bool {
        self.inner.pairing.is_scanning()
    }

    pub fn scanning(&self) -> watch::Receiver<bool> {
        self.inner.pairing.scanning()
    }

    pub async fn scan(&self) -> ScanOutcome {
        self.inner.pairing.scan().await
    }

    /// Pair a peripheral. IP devices cannot be paired.
    pub async fn pair(&self, key: &DeviceKey) -> Result<PairOutcome, CoreError> {
        require_peripheral(key, "pair")?;
        self.inner.pairing.pair(&key.id).await
    }

    /// Forget a peripheral. IP devices cannot be forgotten.
    pub async fn forget(&self, key: &DeviceKey) -> Result<bool, CoreError> {
        require_peripheral(key, "forget")?;
        Ok(self.inner.pairing.forget(&key.id).await)
    }

    // ── Focus ────────────────────────────────────────────────────────

    /// Toggle focus on the WAN or gateway node.
    pub fn focus(&self, node: Node) -> Option<Focus> {
        self.inner.registry.focus_node(node)
    }

    pub fn select_device(&self, key: &DeviceKey) -> Result<(), CoreError> {
        self.inner.registry.select_device(key)
    }

    pub fn clear_focus(&self) {
        self.inner.registry.clear_focus();
    }

    /// Detail view for the current focus.
    pub fn detail(&self) -> Option<DetailView> {
        presenter::present(
            &self.inner.registry.snapshot(),
            &self.inner.network,
            &mut rand::thread_rng(),
        )
    }

    // ── Remote ───────────────────────────────────────────────────────

    /// Send a remote command to the focused device.
    pub fn send_remote(&self, command: RemoteCommand) -> Result<(), CoreError> {
        let snapshot = self.inner.registry.snapshot();
        let Some(device) = snapshot.selected_device() else {
            return Err(CoreError::RemoteUnavailable {
                reason: "no device selected".into(),
            });
        };
        if !device.accepts_remote() {
            return Err(CoreError::RemoteUnavailable {
                reason: format!("{} does not accept remote commands", device.name()),
            });
        }
        self.inner.remote.send(command);
        Ok(())
    }

    pub fn active_remote(&self) -> Option<RemoteCommand> {
        self.inner.remote.active()
    }

    pub fn remote_signal(&self) -> watch::Receiver<Option<RemoteCommand>> {
        self.inner.remote.subscribe()
    }

    // ── Observation ──────────────────────────────────────────────────

    pub fn snapshot(&self) -> Arc<TopologySnapshot> {
        self.inner.registry.snapshot()
    }

    pub fn subscribe(&self) -> TopologyStream {
        self.inner.registry.subscribe()
    }

    /// The merged device list narrowed by `filter`.
    pub fn devices(&self, filter: &DeviceFilter) -> Vec<Device> {
        self.snapshot()
            .devices()
            .filter(|d| filter.matches(d))
            .collect()
    }
}

fn require_peripheral(key: &DeviceKey, operation: &str) -> Result<(), CoreError> {
    match key.kind {
        DeviceKind::Peripheral => Ok(()),
        DeviceKind::Ip => Err(CoreError::Unsupported {
            operation: format!("{operation} {key}"),
            required: "a wireless peripheral".into(),
        }),
    }
}
