//! The outbound transport seam.
//!
//! Connection establishment and the concrete inter-frame channel live
//! outside this SDK. What the SDK requires is an already-connected, typed
//! call interface to the host — the [`HostCalls`] trait. All calls are
//! request/response; "entity not found" is data (`None`), not an error.
//!
//! [`HostLink`] is the cheaply clonable capability live handles hold. A
//! deleted handle has no link, so it cannot reach the host at all.

use crate::error::SdkResult;
use async_trait::async_trait;
use framelink_types::{EntityInfo, User};
use std::fmt;
use std::sync::Arc;

/// The calls the host answers for a connected plugin instance.
#[async_trait]
pub trait HostCalls: Send + Sync {
    /// Lists every field currently known to the host.
    async fn get_fields(&self) -> SdkResult<Vec<EntityInfo>>;

    /// Fetches one field's snapshot by id.
    async fn get_field(&self, id: &str) -> SdkResult<Option<EntityInfo>>;

    /// Fetches one field's encoded value by id.
    async fn get_field_value(&self, id: &str) -> SdkResult<Option<String>>;

    /// Asks the host to apply an encoded value to a field, attributed to
    /// this client's user. Returns once the host accepts the request; the
    /// local cache is updated later by the echoed set notification.
    async fn set_field_value(&self, id: &str, value: &str) -> SdkResult<()>;

    /// Lists every broadcaster currently known to the host.
    async fn get_broadcasters(&self) -> SdkResult<Vec<EntityInfo>>;

    /// Fetches one broadcaster's snapshot by id.
    async fn get_broadcaster(&self, id: &str) -> SdkResult<Option<EntityInfo>>;

    /// Hands the host an encoded message for fan-out to every other
    /// subscriber of the broadcaster id.
    async fn broadcast(&self, id: &str, message: &str) -> SdkResult<()>;

    /// Fetches one peer plugin channel's snapshot by id.
    async fn get_plugin(&self, id: &str) -> SdkResult<Option<EntityInfo>>;

    /// Hands the host an encoded message addressed to a single peer
    /// plugin instance.
    async fn send_plugin_message(&self, id: &str, message: &str) -> SdkResult<()>;

    /// Fetches a user by id, or the current user when `id` is `None`.
    async fn get_user(&self, id: Option<&str>) -> SdkResult<Option<User>>;
}

/// Clonable handle to the host call interface.
///
/// Presence of a `HostLink` is the capability to perform outbound
/// operations; handles give theirs up exactly when they are deleted.
#[derive(Clone)]
pub struct HostLink {
    calls: Arc<dyn HostCalls>,
}

impl HostLink {
    /// Wraps a connected transport.
    pub fn new(calls: Arc<dyn HostCalls>) -> Self {
        Self { calls }
    }

    /// The underlying call interface.
    pub fn calls(&self) -> &Arc<dyn HostCalls> {
        &self.calls
    }
}

impl std::ops::Deref for HostLink {
    type Target = dyn HostCalls;

    fn deref(&self) -> &Self::Target {
        &*self.calls
    }
}

impl fmt::Debug for HostLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostLink").finish_non_exhaustive()
    }
}

/// A scriptable in-memory host for tests.
pub mod mock {
    use super::*;
    use crate::error::SdkError;
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    /// One recorded outbound call.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum HostCall {
        GetFields,
        GetField(String),
        GetFieldValue(String),
        SetFieldValue { id: String, value: String },
        GetBroadcasters,
        GetBroadcaster(String),
        Broadcast { id: String, message: String },
        GetPlugin(String),
        SendPluginMessage { id: String, message: String },
        GetUser(Option<String>),
    }

    #[derive(Default)]
    struct MockState {
        fields: BTreeMap<String, EntityInfo>,
        broadcasters: BTreeMap<String, EntityInfo>,
        plugins: BTreeMap<String, EntityInfo>,
        user: Option<User>,
        calls: Vec<HostCall>,
        fail_writes: bool,
    }

    /// In-memory [`HostCalls`] implementation with scriptable entity
    /// tables and a recorded call log.
    #[derive(Default)]
    pub struct MockHost {
        state: Mutex<MockState>,
    }

    impl MockHost {
        /// Creates an empty mock host with no user.
        pub fn new() -> Self {
            Self::default()
        }

        /// Sets the current user returned by `get_user(None)`.
        pub fn with_user(self, user: User) -> Self {
            self.state.lock().unwrap().user = Some(user);
            self
        }

        /// Scripts a field snapshot.
        pub fn insert_field(&self, info: EntityInfo) {
            let mut state = self.state.lock().unwrap();
            state.fields.insert(info.id.clone(), info);
        }

        /// Scripts a broadcaster snapshot.
        pub fn insert_broadcaster(&self, info: EntityInfo) {
            let mut state = self.state.lock().unwrap();
            state.broadcasters.insert(info.id.clone(), info);
        }

        /// Scripts a peer plugin snapshot.
        pub fn insert_plugin(&self, info: EntityInfo) {
            let mut state = self.state.lock().unwrap();
            state.plugins.insert(info.id.clone(), info);
        }

        /// Makes every write call (`set_field_value`, `broadcast`,
        /// `send_plugin_message`) fail with a transport error.
        pub fn fail_writes(&self, fail: bool) {
            self.state.lock().unwrap().fail_writes = fail;
        }

        /// Snapshot of the recorded call log.
        pub fn calls(&self) -> Vec<HostCall> {
            self.state.lock().unwrap().calls.clone()
        }

        /// Number of `set_field_value` calls recorded for one field id.
        pub fn set_count(&self, id: &str) -> usize {
            self.state
                .lock()
                .unwrap()
                .calls
                .iter()
                .filter(|call| matches!(call, HostCall::SetFieldValue { id: i, .. } if i == id))
                .count()
        }

        fn record(&self, call: HostCall) {
            self.state.lock().unwrap().calls.push(call);
        }

        fn write_gate(&self) -> SdkResult<()> {
            if self.state.lock().unwrap().fail_writes {
                Err(SdkError::Transport("write refused by mock".into()))
            } else {
                Ok(())
            }
        }
    }

    #[async_trait]
    impl HostCalls for MockHost {
        async fn get_fields(&self) -> SdkResult<Vec<EntityInfo>> {
            self.record(HostCall::GetFields);
            Ok(self.state.lock().unwrap().fields.values().cloned().collect())
        }

        async fn get_field(&self, id: &str) -> SdkResult<Option<EntityInfo>> {
            self.record(HostCall::GetField(id.to_owned()));
            Ok(self.state.lock().unwrap().fields.get(id).cloned())
        }

        async fn get_field_value(&self, id: &str) -> SdkResult<Option<String>> {
            self.record(HostCall::GetFieldValue(id.to_owned()));
            Ok(self
                .state
                .lock()
                .unwrap()
                .fields
                .get(id)
                .and_then(|info| info.value.clone()))
        }

        async fn set_field_value(&self, id: &str, value: &str) -> SdkResult<()> {
            self.record(HostCall::SetFieldValue {
                id: id.to_owned(),
                value: value.to_owned(),
            });
            self.write_gate()
        }

        async fn get_broadcasters(&self) -> SdkResult<Vec<EntityInfo>> {
            self.record(HostCall::GetBroadcasters);
            Ok(self
                .state
                .lock()
                .unwrap()
                .broadcasters
                .values()
                .cloned()
                .collect())
        }

        async fn get_broadcaster(&self, id: &str) -> SdkResult<Option<EntityInfo>> {
            self.record(HostCall::GetBroadcaster(id.to_owned()));
            Ok(self.state.lock().unwrap().broadcasters.get(id).cloned())
        }

        async fn broadcast(&self, id: &str, message: &str) -> SdkResult<()> {
            self.record(HostCall::Broadcast {
                id: id.to_owned(),
                message: message.to_owned(),
            });
            self.write_gate()
        }

        async fn get_plugin(&self, id: &str) -> SdkResult<Option<EntityInfo>> {
            self.record(HostCall::GetPlugin(id.to_owned()));
            Ok(self.state.lock().unwrap().plugins.get(id).cloned())
        }

        async fn send_plugin_message(&self, id: &str, message: &str) -> SdkResult<()> {
            self.record(HostCall::SendPluginMessage {
                id: id.to_owned(),
                message: message.to_owned(),
            });
            self.write_gate()
        }

        async fn get_user(&self, id: Option<&str>) -> SdkResult<Option<User>> {
            self.record(HostCall::GetUser(id.map(str::to_owned)));
            let state = self.state.lock().unwrap();
            match id {
                None => Ok(state.user.clone()),
                Some(uid) => Ok(state
                    .user
                    .clone()
                    .filter(|user| user.id == uid)),
            }
        }
    }
}
