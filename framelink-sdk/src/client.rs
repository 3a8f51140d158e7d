//! The composition root.
//!
//! A [`Client`] owns the three entity registries and the connection
//! facade, exposes the public lookup API, and tracks which entity ids
//! this plugin instance locally hosts. Plugin code holds exactly one
//! client per connection.

use crate::broadcaster::BroadcasterHandle;
use crate::connection::ConnectionFacade;
use crate::error::SdkResult;
use crate::field::FieldHandle;
use crate::plugin::PluginHandle;
use crate::registry::EntityRegistry;
use crate::transport::{HostCalls, HostLink};
use framelink_types::{EntityKind, HostNotification, Ports, User};
use serde_json::Value;
use std::sync::Arc;

/// Client-side entry point to the shared-state layer.
pub struct Client {
    link: HostLink,
    fields: Arc<EntityRegistry<FieldHandle>>,
    broadcasters: Arc<EntityRegistry<BroadcasterHandle>>,
    plugins: Arc<EntityRegistry<PluginHandle>>,
    facade: ConnectionFacade,
    user: Option<User>,
}

impl Client {
    /// Builds a client over an already-connected transport and fetches
    /// the current user once.
    pub async fn connect(calls: Arc<dyn HostCalls>) -> SdkResult<Self> {
        let link = HostLink::new(calls);
        let user = link.get_user(None).await?;

        let fields = Arc::new(EntityRegistry::new());
        let broadcasters = Arc::new(EntityRegistry::new());
        let plugins = Arc::new(EntityRegistry::new());
        let facade = ConnectionFacade::new(
            link.clone(),
            Arc::clone(&fields),
            Arc::clone(&broadcasters),
            Arc::clone(&plugins),
        );

        Ok(Self {
            link,
            fields,
            broadcasters,
            plugins,
            facade,
            user,
        })
    }

    // ── Lookup API ───────────────────────────────────────────────

    /// Resolves a field handle. `fallback` becomes the cached value (and
    /// is seeded to the host) when the snapshot carries none; if the host
    /// does not know the id yet, the call suspends until the field is
    /// created.
    pub async fn field(&self, id: &str, fallback: Value) -> SdkResult<Arc<FieldHandle>> {
        self.fields
            .resolve(id, fallback, self.link.clone(), self.link.get_field(id))
            .await
    }

    /// Fetches every field the host currently knows. `fallback_for`
    /// supplies the fallback value per id for snapshots without one.
    pub async fn fields(
        &self,
        fallback_for: impl Fn(&str) -> Value,
    ) -> SdkResult<Vec<Arc<FieldHandle>>> {
        let infos = self.link.get_fields().await?;
        Ok(self
            .fields
            .resolve_all(infos, self.link.clone(), fallback_for)
            .await)
    }

    /// Resolves a broadcaster handle, suspending on an unknown id until
    /// the broadcaster is created.
    pub async fn broadcaster(&self, id: &str) -> SdkResult<Arc<BroadcasterHandle>> {
        self.broadcasters
            .resolve(id, (), self.link.clone(), self.link.get_broadcaster(id))
            .await
    }

    /// Fetches every broadcaster the host currently knows.
    pub async fn broadcasters(&self) -> SdkResult<Vec<Arc<BroadcasterHandle>>> {
        let infos = self.link.get_broadcasters().await?;
        Ok(self
            .broadcasters
            .resolve_all(infos, self.link.clone(), |_| ())
            .await)
    }

    /// Resolves a peer plugin channel, suspending on an unknown id until
    /// the peer registers it. There is no bulk variant — the host exposes
    /// none for plugin channels.
    pub async fn plugin(&self, id: &str) -> SdkResult<Arc<PluginHandle>> {
        self.plugins
            .resolve(id, (), self.link.clone(), self.link.get_plugin(id))
            .await
    }

    // ── Identity ─────────────────────────────────────────────────

    /// The current user, cached at connection time.
    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    /// Fetches another user by id from the host.
    pub async fn fetch_user(&self, id: &str) -> SdkResult<Option<User>> {
        self.link.get_user(Some(id)).await
    }

    // ── Ports ────────────────────────────────────────────────────

    /// The current port advertisement, as answered to the host.
    pub fn ports(&self) -> Ports {
        self.facade.ports()
    }

    /// Advertises a locally hosted field id.
    pub fn add_field_port(&self, id: impl Into<String>) {
        self.facade.add_port(EntityKind::Field, id);
    }

    /// Withdraws a locally hosted field id.
    pub fn remove_field_port(&self, id: &str) {
        self.facade.remove_port(EntityKind::Field, id);
    }

    /// Advertises a locally hosted broadcaster id.
    pub fn add_broadcaster_port(&self, id: impl Into<String>) {
        self.facade.add_port(EntityKind::Broadcaster, id);
    }

    /// Withdraws a locally hosted broadcaster id.
    pub fn remove_broadcaster_port(&self, id: &str) {
        self.facade.remove_port(EntityKind::Broadcaster, id);
    }

    /// Advertises a locally hosted plugin channel id.
    pub fn add_plugin_port(&self, id: impl Into<String>) {
        self.facade.add_port(EntityKind::Plugin, id);
    }

    /// Withdraws a locally hosted plugin channel id.
    pub fn remove_plugin_port(&self, id: &str) {
        self.facade.remove_port(EntityKind::Plugin, id);
    }

    // ── Inbound ──────────────────────────────────────────────────

    /// Delivers one host push. The transport integration calls this for
    /// every notification; routing happens in the facade.
    pub async fn deliver(&self, note: HostNotification) {
        self.facade.deliver(note).await;
    }
}
