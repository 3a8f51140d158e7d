//! Host-pushed notifications.
//!
//! Every push the host can deliver to a plugin instance, as one tagged
//! enum. Pushes are fire-and-forget: the host never waits for an
//! acknowledgment, and delivery order is only guaranteed per direction of
//! the underlying channel.

use crate::EntityInfo;
use serde::{Deserialize, Serialize};

/// A host→plugin push notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum HostNotification {
    /// A field's value changed (including the echo of this client's own
    /// writes). `value` is codec text.
    #[serde(rename_all = "camelCase")]
    SetFieldValue {
        id: String,
        user_id: String,
        value: String,
    },

    /// A broadcast fanned out to subscribers of a broadcaster id.
    /// `message` is codec text framing `[event, ...args]`.
    #[serde(rename_all = "camelCase")]
    Broadcast {
        id: String,
        user_id: String,
        message: String,
    },

    /// A message addressed to a single peer plugin instance.
    PluginMessage { id: String, message: String },

    /// A field came into existence on the host.
    CreateField(EntityInfo),
    /// A field was deleted on the host.
    DeleteField { id: String },

    /// A broadcaster came into existence on the host.
    CreateBroadcaster(EntityInfo),
    /// A broadcaster was deleted on the host.
    DeleteBroadcaster { id: String },

    /// A peer plugin channel came into existence on the host.
    CreatePlugin(EntityInfo),
    /// A peer plugin channel was deleted on the host.
    DeletePlugin { id: String },
}

impl HostNotification {
    /// The entity id this notification addresses.
    #[must_use]
    pub fn entity_id(&self) -> &str {
        match self {
            Self::SetFieldValue { id, .. }
            | Self::Broadcast { id, .. }
            | Self::PluginMessage { id, .. }
            | Self::DeleteField { id }
            | Self::DeleteBroadcaster { id }
            | Self::DeletePlugin { id } => id,
            Self::CreateField(info) | Self::CreateBroadcaster(info) | Self::CreatePlugin(info) => {
                &info.id
            }
        }
    }
}
