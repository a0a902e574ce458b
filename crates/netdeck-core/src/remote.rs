// ── Remote command emitter ──
//
// Momentary signal for the remote deck: a command is visible for a short
// hold window, then clears itself. Fire-and-forget, nothing is queued
// or acknowledged.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::debug;

/// Buttons on the remote deck.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum RemoteCommand {
    PowerToggle,
    Menu,
    Source,
    Up,
    Down,
    Left,
    Right,
    Ok,
    VolUp,
    Mute,
    VolDown,
}

/// Emits remote commands as a self-clearing signal.
#[derive(Clone)]
pub struct RemoteEmitter {
    active: Arc<watch::Sender<Option<RemoteCommand>>>,
    sends: Arc<AtomicU64>,
    hold: Duration,
}

impl RemoteEmitter {
    pub fn new(hold: Duration) -> Self {
        let (active, _) = watch::channel(None);
        Self {
            active: Arc::new(active),
            sends: Arc::new(AtomicU64::new(0)),
            hold,
        }
    }

    /// Raise `command` and schedule it to clear after the hold window. A
    /// later send replaces the value and restarts the window. Must be
    /// called from within a Tokio runtime.
    pub fn send(&self, command: RemoteCommand) {
        let mut seq = 0;
        self.active.send_modify(|active| {
            seq = self.sends.fetch_add(1, Ordering::AcqRel) + 1;
            *active = Some(command);
        });
        debug!(%command, "remote command sent");

        let active = Arc::clone(&self.active);
        let sends = Arc::clone(&self.sends);
        let hold = self.hold;
        tokio::spawn(async move {
            tokio::time::sleep(hold).await;
            active.send_if_modified(|current| {
                if sends.load(Ordering::Acquire) != seq || current.is_none() {
                    return false;
                }
                *current = None;
                true
            });
        });
    }

    /// The command currently shown, if any.
    pub fn active(&self) -> Option<RemoteCommand> {
        *self.active.borrow()
    }

    /// Observe the signal.
    pub fn subscribe(&self) -> watch::Receiver<Option<RemoteCommand>> {
        self.active.subscribe()
    }
}
