// ── Core identity types ──
//
// DeviceId and DeviceKey form the foundation of every device type.
// A DeviceId is only unique within its own list; DeviceKey pairs it
// with the list so IP devices and peripherals never collide.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ── DeviceId ────────────────────────────────────────────────────────

/// Stable identifier of a device within its list.
///
/// A hardware address for IP devices, the radio-assigned identifier for
/// wireless peripherals. Stored verbatim: radio identifiers are
/// case-sensitive, so no normalization is applied.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceId(String);

impl DeviceId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The first `chars` characters of the identifier.
    pub fn prefix(&self, chars: usize) -> &str {
        match self.0.char_indices().nth(chars) {
            Some((end, _)) => &self.0[..end],
            None => &self.0,
        }
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for DeviceId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl From<String> for DeviceId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for DeviceId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ── DeviceKind / DeviceKey ──────────────────────────────────────────

/// Which registry list a device lives in.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum DeviceKind {
    Ip,
    Peripheral,
}

/// Registry-wide identity: the list plus the identifier within it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeviceKey {
    pub kind: DeviceKind,
    pub id: DeviceId,
}

impl DeviceKey {
    pub fn ip(id: impl Into<DeviceId>) -> Self {
        Self {
            kind: DeviceKind::Ip,
            id: id.into(),
        }
    }

    pub fn peripheral(id: impl Into<DeviceId>) -> Self {
        Self {
            kind: DeviceKind::Peripheral,
            id: id.into(),
        }
    }
}

impl fmt::Display for DeviceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.id)
    }
}
