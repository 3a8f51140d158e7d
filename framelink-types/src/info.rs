//! Entity kinds and wire snapshots.
//!
//! An entity is a host-owned, id-addressed object mirrored locally by a
//! proxy. The host describes an entity to the plugin with an `EntityInfo`
//! snapshot, either in answer to a fetch or inside a creation notification.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The three kinds of remote-backed entities a plugin can hold a proxy for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    /// A named, host-authoritative mutable value.
    Field,
    /// A named pub/sub channel for ephemeral events.
    Broadcaster,
    /// A peer-to-peer message channel to another plugin instance.
    Plugin,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Field => "field",
            Self::Broadcaster => "broadcaster",
            Self::Plugin => "plugin",
        };
        f.write_str(name)
    }
}

/// Wire snapshot used to materialize a local proxy.
///
/// `value` carries the codec text of the entity's current value. Only
/// fields have one; broadcasters and plugins never do. The text may be
/// absent or malformed — materialization falls back to a caller-supplied
/// default in that case rather than failing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityInfo {
    /// Host-assigned identifier, unique within its entity kind.
    pub id: String,
    /// Encoded current value, if the entity carries one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl EntityInfo {
    /// Creates a snapshot without a value (broadcaster, plugin, or an
    /// uninitialized field).
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            value: None,
        }
    }

    /// Creates a snapshot carrying an encoded value.
    #[must_use]
    pub fn with_value(id: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            value: Some(value.into()),
        }
    }
}
