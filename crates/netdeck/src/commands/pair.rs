//! Pair command: scan a scripted radio peripheral and connect to it.

use std::sync::Arc;

use tracing::{info, warn};

use netdeck_core::{
    Advertisement, DeviceStatus, PairOutcome, RadioAdapter, ScanOutcome, SimulatedRadio, Topology,
};

use super::{Context, inspect, util};
use crate::cli::PairArgs;
use crate::error::CliError;
use crate::output;

fn advertisement(args: PairArgs) -> Advertisement {
    let mut ad = args
        .id
        .map_or_else(Advertisement::random, Advertisement::new)
        .with_connect_delay(args.connect_delay);
    if let Some(name) = args.name {
        ad = ad.named(name);
    }
    if let Some(rssi) = args.rssi {
        ad = ad.with_rssi(rssi);
    }
    if let Some(message) = args.fail {
        ad = ad.failing(message);
    }
    if args.no_connect {
        ad = ad.without_connect();
    }
    ad
}

pub async fn handle(args: PairArgs, ctx: &Context) -> Result<(), CliError> {
    let forget = args.forget;
    let radio = Arc::new(SimulatedRadio::new());
    if args.cancel {
        radio.push_cancel().await;
    } else {
        radio.push_device(advertisement(args)).await;
    }
    let adapter: Arc<dyn RadioAdapter> = radio;
    let topology = util::build_topology(ctx, Some(adapter))?;

    let bar = output::spinner("Waiting for device chooser", ctx.quiet);
    let scanned = topology.scan().await;
    bar.finish_and_clear();

    let key = match scanned {
        ScanOutcome::Added(key) | ScanOutcome::AlreadyKnown(key) => key,
        ScanOutcome::Cancelled => {
            if !ctx.quiet {
                eprintln!("Scan cancelled, no device chosen");
            }
            return Ok(());
        }
        ScanOutcome::Failed(message) => return Err(CliError::ScanFailed { message }),
        ScanOutcome::Unavailable => {
            return Err(CliError::Unsupported {
                operation: "scan".into(),
                required: "a short-range radio".into(),
            });
        }
    };

    let status_of = |t: &Topology| t.snapshot().device(&key).map(|d| d.status());
    let before = status_of(&topology);

    let bar = output::spinner(format!("Pairing {}", key.id), ctx.quiet);
    let outcome = topology.pair(&key).await?;
    bar.finish_and_clear();

    if let (Some(from), Some(to), false) = (before, status_of(&topology), ctx.quiet) {
        eprintln!(
            "{}: {} -> {} -> {}",
            key.id,
            output::paint_status(from, ctx.color),
            output::paint_status(DeviceStatus::Pairing, ctx.color),
            output::paint_status(to, ctx.color),
        );
    }

    match &outcome {
        PairOutcome::Connected => info!(device = %key.id, "paired"),
        PairOutcome::Failed(message) => warn!(device = %key.id, error = %message, "pairing failed"),
        PairOutcome::Abandoned => warn!(device = %key.id, "pairing result discarded"),
    }

    inspect::print_detail(&topology, ctx)?;

    if forget && topology.forget(&key).await? && !ctx.quiet {
        eprintln!("Forgot {}", key.id);
    }

    match outcome {
        PairOutcome::Failed(message) => Err(CliError::PairingFailed {
            identifier: key.id.to_string(),
            message,
        }),
        PairOutcome::Connected | PairOutcome::Abandoned => Ok(()),
    }
}
