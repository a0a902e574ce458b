//! Inspect command: detail views for the WAN link, gateway and devices.

use netdeck_core::{
    DetailView, DeviceDetail, DeviceFields, GatewayDetail, Node, Topology, WanDetail,
};

use super::{Context, util};
use crate::cli::{InspectArgs, InspectTarget};
use crate::error::CliError;
use crate::fmt::format_rate;
use crate::output;

pub fn handle(args: &InspectArgs, ctx: &Context) -> Result<(), CliError> {
    let topology = util::build_topology(ctx, None)?;

    let (warmup, device) = match &args.target {
        InspectTarget::Wan(w) | InspectTarget::Gateway(w) => (w, None),
        InspectTarget::Device { device, warmup } => (warmup, Some(device.as_str())),
    };
    util::settle(&topology, warmup.ticks);

    match (&args.target, device) {
        (_, Some(identifier)) => {
            let key = util::resolve_device(&topology, identifier)?;
            topology.select_device(&key)?;
        }
        (InspectTarget::Wan(_), None) => {
            topology.focus(Node::Wan);
        }
        _ => {
            topology.focus(Node::Gateway);
        }
    }

    print_detail(&topology, ctx)
}

/// Render whatever the topology currently has focused.
pub(super) fn print_detail(topology: &Topology, ctx: &Context) -> Result<(), CliError> {
    let Some(view) = topology.detail() else {
        return Ok(());
    };
    let out = output::render_single(
        ctx.format,
        &view,
        |v| match v {
            DetailView::Wan(w) => wan_text(w),
            DetailView::Gateway(g) => gateway_text(g, ctx.color),
            DetailView::Device(d) => device_text(d, ctx.color),
        },
        |v| match v {
            DetailView::Wan(w) => w.wan_ip.to_string(),
            DetailView::Gateway(g) => g.lan_ip.to_string(),
            DetailView::Device(d) => d.key.id.to_string(),
        },
    );
    output::print_output(&out, ctx.quiet);
    Ok(())
}

fn wan_text(w: &WanDetail) -> String {
    output::detail_lines(&[
        ("Connection", w.connection.to_owned()),
        ("WAN IP", w.wan_ip.to_string()),
        ("Download", format_rate(w.total.down)),
        ("Upload", format_rate(w.total.up)),
    ])
}

fn gateway_text(g: &GatewayDetail, color: bool) -> String {
    output::detail_lines(&[
        ("Model", g.model.clone()),
        ("LAN IP", g.lan_ip.to_string()),
        ("Firmware", g.firmware.clone()),
        (
            "CPU",
            output::paint_alert(&format!("{}%", g.cpu_load_pct), g.cpu_critical, color),
        ),
        ("Memory", format!("{} MB", g.memory_mb)),
        ("Clients", g.active_clients.to_string()),
    ])
}

fn device_text(d: &DeviceDetail, color: bool) -> String {
    let mut pairs = vec![
        ("Name", d.name.clone()),
        ("Category", d.category.to_string()),
        (
            "Status",
            format!("{} ({})", output::paint_status(d.status, color), d.caption),
        ),
    ];

    match &d.fields {
        DeviceFields::Network {
            ip,
            mac,
            link,
            latency_ms,
            traffic,
        } => {
            pairs.push(("IP", ip.to_string()));
            pairs.push(("MAC", mac.clone()));
            pairs.push(("Link", link.to_string()));
            pairs.push(("Latency", format!("{latency_ms} ms")));
            pairs.push(("Download", format_rate(traffic.down)));
            pairs.push(("Upload", format_rate(traffic.up)));
        }
        DeviceFields::Radio {
            identifier,
            protocol,
            signal,
            pairing_error,
        } => {
            pairs.push(("Identifier", identifier.clone()));
            pairs.push(("Protocol", (*protocol).to_owned()));
            pairs.push(("Signal", signal.clone()));
            if let Some(err) = pairing_error {
                pairs.push(("Error", output::paint_alert(err, true, color)));
            }
        }
    }

    let actions: Vec<&str> = [
        (d.actions.pair, "pair"),
        (d.actions.forget, "forget"),
        (d.actions.remote, "remote"),
    ]
    .into_iter()
    .filter_map(|(on, name)| on.then_some(name))
    .collect();
    if !actions.is_empty() {
        pairs.push(("Actions", actions.join(", ")));
    }

    output::detail_lines(&pairs)
}
