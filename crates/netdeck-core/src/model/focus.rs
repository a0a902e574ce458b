// ── Focus target of the topology view ──

use serde::{Deserialize, Serialize};

use super::entity_id::DeviceKey;

/// A topology node the user can click.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Node {
    Wan,
    Gateway,
}

/// What the detail panel is showing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "node", content = "device", rename_all = "snake_case")]
pub enum Focus {
    Wan,
    Gateway,
    Device(DeviceKey),
}

impl From<Node> for Focus {
    fn from(node: Node) -> Self {
        match node {
            Node::Wan => Self::Wan,
            Node::Gateway => Self::Gateway,
        }
    }
}

impl Focus {
    pub fn device(&self) -> Option<&DeviceKey> {
        match self {
            Self::Device(key) => Some(key),
            Self::Wan | Self::Gateway => None,
        }
    }
}
