//! Common types shared across the collaborator boundary.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier for a renderable entity in the host client.
///
/// Uses UUID v4 for global uniqueness without coordination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityId(pub Uuid);

impl EntityId {
    /// Creates a new random EntityId.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a deterministic EntityId from a seed (for simulation).
    pub fn from_seed(seed: u64) -> Self {
        let mut bytes = [0u8; 16];
        bytes[0..8].copy_from_slice(&seed.to_le_bytes());
        bytes[8..16].copy_from_slice(&seed.wrapping_mul(0x517cc1b727220a95).to_le_bytes());
        Self(Uuid::from_bytes(bytes))
    }

    /// Returns the inner UUID.
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Show first 8 chars for readability
        write!(f, "{}", &self.0.to_string()[..8])
    }
}

/// A video entry picked from the channel guide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuideVideo {
    /// Guide-assigned video id
    pub id: String,

    /// Display name shown on the screen label
    pub name: String,

    /// Channel the video belongs to, used for watch-time heartbeats
    #[serde(default)]
    pub channel_id: Option<String>,
}

impl GuideVideo {
    /// Creates a guide entry.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            channel_id: None,
        }
    }

    /// Sets the channel id.
    pub fn with_channel(mut self, channel_id: impl Into<String>) -> Self {
        self.channel_id = Some(channel_id.into());
        self
    }
}

/// Session statistics as returned by the vendor SDK.
///
/// Wire shape: `{uniqueVisitors, totalSessions, visitorNumber?, isFirstVisitor?}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStats {
    pub unique_visitors: u64,
    pub total_sessions: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visitor_number: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_first_visitor: Option<bool>,
}

/// A single UI panel contributed by an SDK module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiComponent {
    /// Module name ("guide", "chat", "admin")
    pub name: String,

    /// Whether the panel is currently expanded
    pub visible: bool,
}

impl UiComponent {
    pub fn new(name: impl Into<String>, visible: bool) -> Self {
        Self {
            name: name.into(),
            visible,
        }
    }
}

/// Root of the composed scene UI: a full-screen absolute container.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiTree {
    pub children: Vec<UiComponent>,
}

impl UiTree {
    /// Returns true if no module contributed a panel.
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}
