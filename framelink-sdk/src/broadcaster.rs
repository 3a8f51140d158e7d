//! Broadcaster handles.
//!
//! A broadcaster is a named pub/sub channel for ephemeral events. Outbound
//! emissions go to the host for fan-out to every other subscriber of the
//! id; inbound deliveries are best-effort — unordered across senders,
//! order-preserving per sender, and silently dropped when malformed.

use crate::codec;
use crate::error::SdkResult;
use crate::events::{EventHub, EventKey};
use crate::handle::{Lifecycle, RemoteEntity};
use crate::transport::HostLink;
use framelink_types::{EntityInfo, EntityKind};
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

/// Local proxy for one host-owned broadcaster.
pub struct BroadcasterHandle {
    id: String,
    lifecycle: Lifecycle,
    events: EventHub,
}

impl BroadcasterHandle {
    /// The host-assigned broadcaster id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Whether the host has deleted this broadcaster.
    pub fn deleted(&self) -> bool {
        self.lifecycle.is_deleted()
    }

    /// Emits an event to every other subscriber, tagged with this
    /// client's user id by the host.
    ///
    /// A [`EventKey::Pattern`] target is a documented no-op: patterns
    /// match listeners, they are never a legal outbound event identifier.
    /// The deleted-check still runs first, so emitting a pattern on a
    /// deleted broadcaster fails rather than silently succeeding.
    pub async fn emit(&self, event: impl Into<EventKey>, args: Vec<Value>) -> SdkResult<()> {
        let link = self.lifecycle.link(&self.id)?;
        let name = match event.into() {
            EventKey::Exact(name) => name,
            EventKey::Pattern(_) => return Ok(()),
        };
        let payload = codec::encode_message(&name, &args)?;
        link.broadcast(&self.id, &payload).await
    }

    /// Registers a listener, exact or pattern keyed. Callbacks receive
    /// the sender's user id as the first argument.
    pub fn on<F>(&self, key: impl Into<EventKey>, callback: F)
    where
        F: Fn(&str, &[Value]) + Send + Sync + 'static,
    {
        self.events.on(key, callback);
    }

    /// Registers a listener for the deletion of this broadcaster.
    pub fn on_delete<F>(&self, callback: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.events.on("delete", move |_event, _args| callback());
    }

    /// Inbound fan-out delivery. Malformed payloads and payloads whose
    /// event tag is not a string are dropped without surfacing an error.
    pub fn deliver(&self, user_id: &str, payload: &str) {
        if self.lifecycle.is_deleted() {
            debug!(broadcaster = %self.id, "dropping broadcast for deleted broadcaster");
            return;
        }
        match codec::decode_message(payload) {
            Ok((event, values)) => {
                let mut args = Vec::with_capacity(values.len() + 1);
                args.push(Value::String(user_id.to_owned()));
                args.extend(values);
                self.events.emit(&event, &args);
            }
            Err(error) => {
                debug!(broadcaster = %self.id, %error, "dropping undecodable broadcast");
            }
        }
    }
}

impl RemoteEntity for BroadcasterHandle {
    type Seed = ();

    const KIND: EntityKind = EntityKind::Broadcaster;

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
