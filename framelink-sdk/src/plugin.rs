//! Peer plugin handles.
//!
//! Same shape as a broadcaster, but addressed at a single peer plugin
//! instance instead of fanned out. Message framing and the
//! drop-on-malformed-input rules are identical; deliveries carry no
//! sender user id.

use crate::codec;
use crate::error::SdkResult;
use crate::events::{EventHub, EventKey};
use crate::handle::{Lifecycle, RemoteEntity};
use crate::transport::HostLink;
use framelink_types::{EntityInfo, EntityKind};
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

/// Local proxy for one peer plugin message channel.
pub struct PluginHandle {
    id: String,
    lifecycle: Lifecycle,
    events: EventHub,
}

impl PluginHandle {
    /// The host-assigned plugin id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Whether the host has deleted this channel.
    pub fn deleted(&self) -> bool {
        self.lifecycle.is_deleted()
    }

    /// Sends an event to the peer plugin instance.
    ///
    /// A [`EventKey::Pattern`] target is a documented no-op, after the
    /// deleted-check — same quirk as the broadcaster.
    pub async fn emit(&self, event: impl Into<EventKey>, args: Vec<Value>) -> SdkResult<()> {
        let link = self.lifecycle.link(&self.id)?;
        let name = match event.into() {
            EventKey::Exact(name) => name,
            EventKey::Pattern(_) => return Ok(()),
        };
        let payload = codec::encode_message(&name, &args)?;
        link.send_plugin_message(&self.id, &payload).await
    }

    /// Registers a listener, exact or pattern keyed.
    pub fn on<F>(&self, key: impl Into<EventKey>, callback: F)
    where
        F: Fn(&str, &[Value]) + Send + Sync + 'static,
    {
        self.events.on(key, callback);
    }

    /// Registers a listener for the deletion of this channel.
    pub fn on_delete<F>(&self, callback: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.events.on("delete", move |_event, _args| callback());
    }

    /// Inbound peer message. Malformed payloads are dropped without
    /// surfacing an error.
    pub fn deliver(&self, payload: &str) {
        if self.lifecycle.is_deleted() {
            debug!(plugin = %self.id, "dropping message for deleted plugin channel");
            return;
        }
        match codec::decode_message(payload) {
            Ok((event, values)) => self.events.emit(&event, &values),
            Err(error) => {
                debug!(plugin = %self.id, %error, "dropping undecodable plugin message");
            }
        }
    }
}

impl RemoteEntity for PluginHandle {
    type Seed = ();

    const KIND: EntityKind = EntityKind::Plugin;

    fn materialize(info: EntityInfo, link: HostLink, _seed: ()) -> Arc<Self> {
        Arc::new(Self {
            id: info.id,
            lifecycle: Lifecycle::live(Self::KIND, link),
            events: EventHub::new(),
        })
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn retire(&self) -> SdkResult<()> {
        self.lifecycle.retire(&self.id)?;
        self.events.emit("delete", &[]);
        self.events.seal();
        Ok(())
    }
}
