//! Lazy-materialization entity cache.
//!
//! One registry per entity kind resolves ids to handles, creating each
//! handle on first reference — from existing host data when the host knows
//! the id, or by waiting for a host-pushed creation notification when it
//! does not. The cache is unbounded for the process lifetime; entries
//! leave only on host-pushed deletion.
//!
//! Creation waiters are keyed by id and deduplicated: concurrent resolves
//! of one unmaterialized id share a single pending entry and receive
//! clones of the one handle built when the creation fires. That keeps the
//! at-most-one-handle-per-id invariant across every construction path.
//!
//! Lock order is always `pending` before `cache`.

use crate::error::{SdkError, SdkResult};
use crate::handle::RemoteEntity;
use crate::transport::HostLink;
use framelink_types::EntityInfo;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock, oneshot};
use tracing::debug;

struct Pending<E: RemoteEntity> {
    seed: E::Seed,
    waiters: Vec<oneshot::Sender<Arc<E>>>,
}

/// Cache of live handles for one entity kind.
pub struct EntityRegistry<E: RemoteEntity> {
    cache: RwLock<HashMap<String, Arc<E>>>,
    pending: Mutex<HashMap<String, Pending<E>>>,
}

impl<E: RemoteEntity> EntityRegistry<E> {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            cache: RwLock::new(HashMap::new()),
            pending: Mutex::new(HashMap::new()),
        }
    }

    /// Cache peek, used to route inbound events to existing handles.
    pub async fn get(&self, id: &str) -> Option<Arc<E>> {
        self.cache.read().await.get(id).cloned()
    }

    /// Number of cached handles.
    pub async fn len(&self) -> usize {
        self.cache.read().await.len()
    }

    /// Whether no handles are cached.
    pub async fn is_empty(&self) -> bool {
        self.cache.read().await.is_empty()
    }

    /// Resolves an id to its handle.
    ///
    /// Cached ids return immediately with no host round trip. Otherwise
    /// `fetch` asks the host once; a snapshot materializes the handle, and
    /// a "not found" answer suspends until the host pushes a creation
    /// notification for the id. The wait is unbounded — there is no
    /// timeout or cancellation for a creation that never arrives.
    pub async fn resolve<F>(
        &self,
        id: &str,
        seed: E::Seed,
        link: HostLink,
        fetch: F,
    ) -> SdkResult<Arc<E>>
    where
        F: Future<Output = SdkResult<Option<EntityInfo>>>,
    {
        if let Some(handle) = self.get(id).await {
            return Ok(handle);
        }

        if let Some(info) = fetch.await? {
            return Ok(self.adopt(info, seed, link).await);
        }

        debug!(kind = %E::KIND, id, "entity unknown to host, awaiting creation");
        let receiver = {
            let mut pending = self.pending.lock().await;
            // The creation may have landed while the fetch was in flight.
            if let Some(handle) = self.cache.read().await.get(id) {
                return Ok(handle.clone());
            }
            let entry = pending.entry(id.to_owned()).or_insert_with(|| Pending {
                seed,
                waiters: Vec::new(),
            });
            let (sender, receiver) = oneshot::channel();
            entry.waiters.push(sender);
            receiver
        };

        receiver.await.map_err(|_| SdkError::ChannelClosed)
    }

    /// Bulk materialization from a fetched entity list: cached handles are
    /// reused by id, the rest are built and inserted.
    pub async fn resolve_all(
        &self,
        infos: Vec<EntityInfo>,
        link: HostLink,
        seed_for: impl Fn(&str) -> E::Seed,
    ) -> Vec<Arc<E>> {
        let mut handles = Vec::with_capacity(infos.len());
        for info in infos {
            let seed = seed_for(&info.id);
            handles.push(self.adopt(info, seed, link.clone()).await);
        }
        handles
    }

    /// Host-pushed creation notification.
    ///
    /// Fulfils every waiter pending on the id with one shared handle.
    /// With no waiters and no cache entry this is a no-op: entities are
    /// only materialized on demand.
    pub async fn deliver_create(&self, info: EntityInfo, link: HostLink) {
        let mut pending = self.pending.lock().await;
        let entry = pending.remove(&info.id);

        let handle = {
            let mut cache = self.cache.write().await;
            match cache.get(&info.id) {
                Some(existing) => existing.clone(),
                None => match &entry {
                    Some(waiting) => {
                        let handle = E::materialize(info, link, waiting.seed.clone());
                        cache.insert(handle.id().to_owned(), handle.clone());
                        handle
                    }
                    None => {
                        debug!(kind = %E::KIND, id = %info.id, "creation with no waiters, ignoring");
                        return;
                    }
                },
            }
        };

        if let Some(waiting) = entry {
            for waiter in waiting.waiters {
                let _ = waiter.send(handle.clone());
            }
        }
    }

    /// Host-pushed deletion notification: retires the handle and removes
    /// it from the cache. Unknown ids are a no-op.
    pub async fn deliver_delete(&self, id: &str) {
        let Some(handle) = self.cache.write().await.remove(id) else {
            debug!(kind = %E::KIND, id, "deletion for uncached entity, ignoring");
            return;
        };
        if let Err(error) = handle.retire() {
            debug!(kind = %E::KIND, id, %error, "retire failed");
        }
    }

    /// Inserts a materialized handle, reusing any existing one for the id
    /// and fulfilling waiters that raced this construction path.
    async fn adopt(&self, info: EntityInfo, seed: E::Seed, link: HostLink) -> Arc<E> {
        let mut pending = self.pending.lock().await;

        let handle = {
            let mut cache = self.cache.write().await;
            match cache.get(&info.id) {
                Some(existing) => existing.clone(),
                None => {
                    let handle = E::materialize(info, link, seed);
                    cache.insert(handle.id().to_owned(), handle.clone());
                    handle
                }
            }
        };

        if let Some(waiting) = pending.remove(handle.id()) {
            for waiter in waiting.waiters {
                let _ = waiter.send(handle.clone());
            }
        }
        handle
    }
}

impl<E: RemoteEntity> Default for EntityRegistry<E> {
    fn default() -> Self {
        Self::new()
    }
}
