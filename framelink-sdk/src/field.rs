//! Field handles.
//!
//! A field is a named, host-authoritative mutable value. The handle keeps
//! the last known decoded value for synchronous reads; the authoritative
//! copy lives on the host, and the cache only moves when the host echoes
//! a set back (never as a side effect of this client's own `set` call).

use crate::codec;
use crate::error::SdkResult;
use crate::events::{EventHub, EventKey};
use crate::handle::{Lifecycle, RemoteEntity};
use crate::transport::HostLink;
use framelink_types::{EntityInfo, EntityKind};
use serde_json::Value;
use std::sync::{Arc, RwLock};
use tracing::{debug, warn};

/// Local proxy for one host-owned field.
pub struct FieldHandle {
    id: String,
    lifecycle: Lifecycle,
    value: RwLock<Value>,
    events: EventHub,
}

impl FieldHandle {
    /// The host-assigned field id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Whether the host has deleted this field.
    pub fn deleted(&self) -> bool {
        self.lifecycle.is_deleted()
    }

    /// The last known value. Synchronous, no host round trip.
    pub fn value(&self) -> Value {
        self.value.read().unwrap().clone()
    }

    /// The last known value, decoded into a concrete type.
    pub fn typed_value<T: serde::de::DeserializeOwned>(&self) -> SdkResult<T> {
        Ok(serde_json::from_value(self.value())?)
    }

    /// Asks the host to apply a new value, attributed to this client's
    /// user. Resolves once the host accepts the request — the local cache
    /// is updated later by the echoed set notification, keeping the host
    /// the source of truth.
    pub async fn set(&self, value: &Value) -> SdkResult<()> {
        let link = self.lifecycle.link(&self.id)?;
        let encoded = codec::encode(value)?;
        link.set_field_value(&self.id, &encoded).await
    }

    /// Registers a listener for host-applied sets.
    pub fn on_set<F>(&self, callback: F)
    where
        F: Fn(&Value, &str) + Send + Sync + 'static,
    {
        self.events.on("set", move |_event, args| {
            if let [value, Value::String(user_id)] = args {
                callback(value, user_id);
            }
        });
    }

    /// Registers a listener for the deletion of this field.
    pub fn on_delete<F>(&self, callback: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.events.on("delete", move |_event, _args| callback());
    }

    /// Raw listener registration, exact or pattern keyed.
    pub fn on<F>(&self, key: impl Into<EventKey>, callback: F)
    where
        F: Fn(&str, &[Value]) + Send + Sync + 'static,
    {
        self.events.on(key, callback);
    }

    /// Inbound host-applied set: unconditionally overwrites the cache and
    /// notifies listeners. Last delivered write wins — no merge, no
    /// versioning. Dropped once the handle is deleted.
    pub fn apply_set(&self, value: Value, user_id: &str) {
        if self.lifecycle.is_deleted() {
            debug!(field = %self.id, "dropping set for deleted field");
            return;
        }
        *self.value.write().unwrap() = value.clone();
        self.events
            .emit("set", &[value, Value::String(user_id.to_owned())]);
    }

    /// Seeds the host with the fallback value adopted during
    /// materialization. Fire-and-forget: a concurrent host-originated
    /// initialization may win, and last write wins at the host.
    fn seed_host(handle: &Arc<Self>) {
        let handle = Arc::clone(handle);
        tokio::spawn(async move {
            let snapshot = handle.value();
            if let Err(error) = handle.set(&snapshot).await {
                warn!(field = %handle.id, %error, "failed to seed fallback value");
            }
        });
    }
}

impl RemoteEntity for FieldHandle {
    type Seed = Value;

    const KIND: EntityKind = EntityKind::Field;

    fn materialize(info: EntityInfo, link: HostLink, fallback: Value) -> Arc<Self> {
        let (value, seed) = match info.value.as_deref() {
            Some(text) => match codec::decode(text) {
                Ok(value) => (value, false),
                Err(error) => {
                    debug!(field = %info.id, %error, "snapshot value undecodable, adopting fallback");
                    (fallback, true)
                }
            },
            None => (fallback, true),
        };

        let handle = Arc::new(Self {
            id: info.id,
            lifecycle: Lifecycle::live(Self::KIND, link),
            value: RwLock::new(value),
            events: EventHub::new(),
        });
        if seed {
            Self::seed_host(&handle);
        }
        handle
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
