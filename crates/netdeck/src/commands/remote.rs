//! Remote command: press a button on a device's remote deck.

use serde::Serialize;

use netdeck_core::{Device, RemoteCommand};

use super::{Context, util};
use crate::cli::{RemoteArgs, RemoteButton};
use crate::error::CliError;
use crate::output;

impl From<RemoteButton> for RemoteCommand {
    fn from(button: RemoteButton) -> Self {
        match button {
            RemoteButton::PowerToggle => Self::PowerToggle,
            RemoteButton::Menu => Self::Menu,
            RemoteButton::Source => Self::Source,
            RemoteButton::Up => Self::Up,
            RemoteButton::Down => Self::Down,
            RemoteButton::Left => Self::Left,
            RemoteButton::Right => Self::Right,
            RemoteButton::Ok => Self::Ok,
            RemoteButton::VolUp => Self::VolUp,
            RemoteButton::Mute => Self::Mute,
            RemoteButton::VolDown => Self::VolDown,
        }
    }
}

/// What was sent, and how long the signal stayed raised.
#[derive(Serialize)]
struct RemoteReport {
    device: String,
    command: RemoteCommand,
    held_ms: u64,
}

pub async fn handle(args: &RemoteArgs, ctx: &Context) -> Result<(), CliError> {
    let topology = util::build_topology(ctx, None)?;
    util::settle(&topology, args.warmup.ticks);

    let key = match &args.device {
        Some(identifier) => util::resolve_device(&topology, identifier)?,
        None => topology
            .snapshot()
            .devices()
            .find(Device::accepts_remote)
            .map(|d| d.key())
            .ok_or_else(|| CliError::RemoteUnavailable {
                reason: "no discovered device accepts remote commands".into(),
            })?,
    };
    topology.select_device(&key)?;

    let command = RemoteCommand::from(args.button);
    let mut signal = topology.remote_signal();
    let started = tokio::time::Instant::now();
    topology.send_remote(command)?;

    // Wait for the signal to drop back so the report reflects the hold.
    while signal.borrow_and_update().is_some() {
        if signal.changed().await.is_err() {
            break;
        }
    }

    let name = topology
        .snapshot()
        .device(&key)
        .map_or_else(|| key.id.to_string(), |d| d.name().to_owned());
    let report = RemoteReport {
        device: name,
        command,
        held_ms: u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
    };

    let out = output::render_single(
        ctx.format,
        &report,
        |r| format!("{} -> {}", r.command, r.device),
        |r| r.command.to_string(),
    );
    output::print_output(&out, ctx.quiet);
    Ok(())
}
