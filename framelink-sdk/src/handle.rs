//! Shared handle lifecycle.
//!
//! Every handle variant is bound to the host through a [`Binding`]: either
//! `Live` with a [`HostLink`], or `Deleted` with nothing. The deleted
//! state cannot hold a link by construction, so an inert handle is unable
//! to issue outbound calls rather than merely forbidden to.

use crate::error::{DeletedEntityError, SdkResult};
use crate::transport::HostLink;
use framelink_types::{EntityInfo, EntityKind};
use std::sync::{Arc, RwLock};

/// Two-state connection lifecycle of a handle.
enum Binding {
    Live(HostLink),
    Deleted,
}

/// The lifecycle cell embedded in every handle.
pub(crate) struct Lifecycle {
    kind: EntityKind,
    state: RwLock<Binding>,
}

impl Lifecycle {
    pub(crate) fn live(kind: EntityKind, link: HostLink) -> Self {
        Self {
            kind,
            state: RwLock::new(Binding::Live(link)),
        }
    }

    /// Clones the link out, or fails if the handle is deleted.
    pub(crate) fn link(&self, id: &str) -> Result<HostLink, DeletedEntityError> {
        match &*self.state.read().unwrap() {
            Binding::Live(link) => Ok(link.clone()),
            Binding::Deleted => Err(DeletedEntityError::new(self.kind, id)),
        }
    }

    pub(crate) fn is_deleted(&self) -> bool {
        matches!(*self.state.read().unwrap(), Binding::Deleted)
    }

    /// The one-way transition to `Deleted`. A second call fails: the
    /// transition requires a live link to give up.
    pub(crate) fn retire(&self, id: &str) -> Result<(), DeletedEntityError> {
        let mut state = self.state.write().unwrap();
        match *state {
            Binding::Live(_) => {
                *state = Binding::Deleted;
                Ok(())
            }
            Binding::Deleted => Err(DeletedEntityError::new(self.kind, id)),
        }
    }
}

/// A handle variant the [`EntityRegistry`](crate::registry::EntityRegistry)
/// can materialize and retire.
///
/// Handles are only ever constructed by their owning registry; consumer
/// code receives `Arc`s and never builds one directly.
pub trait RemoteEntity: Send + Sync + 'static {
    /// Extra input materialization needs beyond the wire snapshot
    /// (the fallback value for fields, nothing for the channel kinds).
    type Seed: Clone + Send + 'static;

    /// The entity kind, for routing and error text.
    const KIND: EntityKind;

    /// Builds a handle from a host snapshot.
    fn materialize(info: EntityInfo, link: HostLink, seed: Self::Seed) -> Arc<Self>;

    /// The host-assigned entity id.
    fn id(&self) -> &str;

    /// Host-pushed deletion transition: drops the link, marks the handle
    /// deleted, emits `delete` exactly once. Fails with
    /// [`DeletedEntityError`] when already deleted.
    fn retire(&self) -> SdkResult<()>;
}
