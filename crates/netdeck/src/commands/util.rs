//! Shared helpers for command handlers.

use std::sync::Arc;

use tracing::{debug, warn};

use netdeck_core::{Device, DeviceKey, RadioAdapter, Topology, TopologyConfig};

use super::Context;
use crate::error::CliError;

/// Upper bound on warm-up ticks when waiting for the whole catalog.
const MAX_SETTLE_TICKS: u32 = 1_000;

/// Build a topology from the loaded config. Real-time monitoring stays
/// off; handlers drive discovery explicitly.
pub fn build_topology(
    ctx: &Context,
    radio: Option<Arc<dyn RadioAdapter>>,
) -> Result<Topology, CliError> {
    let config = TopologyConfig {
        monitor_on_start: false,
        ..ctx.config.topology_config()?
    };
    let network = ctx.config.network_info()?;
    Ok(Topology::new(config, network, radio)?)
}

/// Advance discovery without waiting for the timer.
///
/// With `ticks` set, runs exactly that many. Otherwise ticks until every
/// catalog entry has been revealed.
pub fn settle(topology: &Topology, ticks: Option<u32>) {
    if let Some(n) = ticks {
        for _ in 0..n {
            topology.tick();
        }
        return;
    }

    let target = topology.network().devices.len();
    let mut ran = 0;
    while topology.registry().ip_count() < target {
        if ran == MAX_SETTLE_TICKS {
            warn!(
                revealed = topology.registry().ip_count(),
                target, "catalog not fully revealed, check simulation.reveal_probability"
            );
            return;
        }
        topology.tick();
        ran += 1;
    }
    debug!(ticks = ran, devices = target, "catalog revealed");
}

/// Resolve a device by identifier or name, case-insensitively.
pub fn resolve_device(topology: &Topology, identifier: &str) -> Result<DeviceKey, CliError> {
    let snap = topology.snapshot();
    let hit = |d: &Device| {
        d.id().as_str().eq_ignore_ascii_case(identifier) || d.name().eq_ignore_ascii_case(identifier)
    };
    snap.devices()
        .find(hit)
        .map(|d| d.key())
        .ok_or_else(|| CliError::NotFound {
            identifier: identifier.into(),
        })
}
