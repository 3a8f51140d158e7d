//! Inbound demultiplexing and port advertisement.
//!
//! The facade is the single surface the transport integration talks to:
//! every host push enters through [`ConnectionFacade::deliver`] and is
//! routed to the right registry or handle, and the host's `getPorts` pull
//! is answered synchronously from the locally tracked sets.

use crate::broadcaster::BroadcasterHandle;
use crate::codec;
use crate::field::FieldHandle;
use crate::plugin::PluginHandle;
use crate::registry::EntityRegistry;
use crate::transport::HostLink;
use framelink_types::{EntityKind, HostNotification, Ports};
use std::collections::BTreeSet;
use std::sync::{Arc, RwLock};
use tracing::debug;

#[derive(Default)]
struct PortSets {
    fields: BTreeSet<String>,
    broadcasters: BTreeSet<String>,
    plugins: BTreeSet<String>,
}

impl PortSets {
    fn set_for(&mut self, kind: EntityKind) -> &mut BTreeSet<String> {
        match kind {
            EntityKind::Field => &mut self.fields,
            EntityKind::Broadcaster => &mut self.broadcasters,
            EntityKind::Plugin => &mut self.plugins,
        }
    }
}

/// Demultiplexer for host-pushed events, and keeper of the port sets.
pub struct ConnectionFacade {
    link: HostLink,
    fields: Arc<EntityRegistry<FieldHandle>>,
    broadcasters: Arc<EntityRegistry<BroadcasterHandle>>,
    plugins: Arc<EntityRegistry<PluginHandle>>,
    ports: RwLock<PortSets>,
}

impl ConnectionFacade {
    pub(crate) fn new(
        link: HostLink,
        fields: Arc<EntityRegistry<FieldHandle>>,
        broadcasters: Arc<EntityRegistry<BroadcasterHandle>>,
        plugins: Arc<EntityRegistry<PluginHandle>>,
    ) -> Self {
        Self {
            link,
            fields,
            broadcasters,
            plugins,
            ports: RwLock::new(PortSets::default()),
        }
    }

    /// Answers the host's `getPorts` pull from the tracked sets.
    pub fn ports(&self) -> Ports {
        let ports = self.ports.read().unwrap();
        Ports::new(
            ports.fields.iter().cloned(),
            ports.broadcasters.iter().cloned(),
            ports.plugins.iter().cloned(),
        )
    }

    /// Advertises a locally hosted entity id.
    pub fn add_port(&self, kind: EntityKind, id: impl Into<String>) {
        self.ports.write().unwrap().set_for(kind).insert(id.into());
    }

    /// Withdraws a locally hosted entity id.
    pub fn remove_port(&self, kind: EntityKind, id: &str) {
        self.ports.write().unwrap().set_for(kind).remove(id);
    }

    /// Routes one host push to its registry or cached handle.
    ///
    /// Fire-and-forget: malformed payloads and events addressing uncached
    /// ids are dropped here, never surfaced to plugin code.
    pub async fn deliver(&self, note: HostNotification) {
        match note {
            HostNotification::SetFieldValue { id, user_id, value } => {
                let Some(field) = self.fields.get(&id).await else {
                    debug!(field = %id, "set for uncached field, ignoring");
                    return;
                };
                match codec::decode(&value) {
                    Ok(decoded) => field.apply_set(decoded, &user_id),
                    Err(error) => {
                        debug!(field = %id, %error, "dropping undecodable field value");
                    }
                }
            }
            HostNotification::Broadcast {
                id,
                user_id,
                message,
            } => {
                let Some(broadcaster) = self.broadcasters.get(&id).await else {
                    debug!(broadcaster = %id, "broadcast for uncached broadcaster, ignoring");
                    return;
                };
                broadcaster.deliver(&user_id, &message);
            }
            HostNotification::PluginMessage { id, message } => {
                let Some(plugin) = self.plugins.get(&id).await else {
                    debug!(plugin = %id, "message for uncached plugin channel, ignoring");
                    return;
                };
                plugin.deliver(&message);
            }
            HostNotification::CreateField(info) => {
                self.fields.deliver_create(info, self.link.clone()).await;
            }
            HostNotification::DeleteField { id } => {
                self.fields.deliver_delete(&id).await;
            }
            HostNotification::CreateBroadcaster(info) => {
                self.broadcasters
                    .deliver_create(info, self.link.clone())
                    .await;
            }
            HostNotification::DeleteBroadcaster { id } => {
                self.broadcasters.deliver_delete(&id).await;
            }
            HostNotification::CreatePlugin(info) => {
                self.plugins.deliver_create(info, self.link.clone()).await;
            }
            HostNotification::DeletePlugin { id } => {
                self.plugins.deliver_delete(&id).await;
            }
        }
    }
}
