//! Monitor command: run discovery and list what it found.

use std::sync::Arc;

use tabled::Tabled;
use tracing::info;

use netdeck_core::{Device, DeviceFilter, DeviceKind, Topology, TopologySnapshot, TopologyStream};

use super::{Context, util};
use crate::cli::{KindArg, MonitorArgs};
use crate::error::CliError;
use crate::fmt::format_rate;
use crate::output;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct DeviceRow {
    #[tabled(rename = "Kind")]
    kind: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Address")]
    address: String,
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Down")]
    down: String,
    #[tabled(rename = "Up")]
    up: String,
}

impl DeviceRow {
    fn new(d: &Device, color: bool) -> Self {
        let traffic = d.info().traffic;
        Self {
            kind: d.kind().to_string(),
            name: d.name().to_owned(),
            category: d.category().to_string(),
            status: output::paint_status(d.status(), color),
            address: d.address_label(),
            id: d.id().to_string(),
            down: format_rate(traffic.down),
            up: format_rate(traffic.up),
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(args: &MonitorArgs, ctx: &Context) -> Result<(), CliError> {
    let topology = util::build_topology(ctx, None)?;

    if let Some(ticks) = args.ticks {
        util::settle(&topology, Some(ticks));
    } else {
        run_live(&topology, args, ctx).await;
    }

    let devices = topology.devices(&filter(args));
    info!(count = devices.len(), "monitor finished");

    let out = output::render_list(
        ctx.format,
        &devices,
        |d| DeviceRow::new(d, ctx.color),
        |d| d.id().to_string(),
    );
    output::print_output(&out, ctx.quiet);
    Ok(())
}

/// Monitor in real time until the duration elapses or Ctrl-C.
async fn run_live(topology: &Topology, args: &MonitorArgs, ctx: &Context) {
    let mut stream = topology.subscribe();
    topology.start_monitoring().await;

    let bar = (!args.watch).then(|| {
        output::spinner(
            format!("Monitoring for {}", humantime::format_duration(args.duration)),
            ctx.quiet,
        )
    });

    let deadline = tokio::time::sleep(args.duration);
    tokio::pin!(deadline);

    loop {
        tokio::select! {
            biased;
            () = &mut deadline => break,
            _ = tokio::signal::ctrl_c() => break,
            changed = next_change(&mut stream, args.watch) => {
                let Some(snap) = changed else { break };
                output::print_output(
                    &format!(
                        "v{} devices={} clients={} down={} up={}",
                        snap.version,
                        snap.device_count(),
                        snap.active_clients(),
                        format_rate(snap.ip_traffic().down),
                        format_rate(snap.ip_traffic().up),
                    ),
                    ctx.quiet,
                );
            }
        }
    }

    if let Some(bar) = bar {
        bar.finish_and_clear();
    }
    topology.shutdown().await;
}

/// Next topology change, or pending forever when not watching.
async fn next_change(
    stream: &mut TopologyStream,
    watch: bool,
) -> Option<Arc<TopologySnapshot>> {
    if watch {
        stream.changed().await
    } else {
        std::future::pending().await
    }
}

fn filter(args: &MonitorArgs) -> DeviceFilter {
    let text = args.filter.as_deref().map(DeviceFilter::text);
    let kind = args.kind.map(|k| match k {
        KindArg::Ip => DeviceKind::Ip,
        KindArg::Peripheral => DeviceKind::Peripheral,
    });

    match (text, kind) {
        (None, None) => DeviceFilter::All,
        (Some(text), None) => text,
        (None, Some(kind)) => DeviceFilter::ByKind(kind),
        (Some(text), Some(kind)) => {
            DeviceFilter::Custom(Box::new(move |d: &Device| d.kind() == kind && text.matches(d)))
        }
    }
}
