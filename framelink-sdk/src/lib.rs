//! Client-side entity synchronization SDK for sandboxed framelink plugins.
//!
//! A plugin runs inside an iframe; the host page owns the authoritative
//! state. This crate gives plugin code local proxies for three kinds of
//! remote-backed entities, all multiplexed over one bidirectional
//! call/callback channel:
//!
//! - **Fields** — named, host-authoritative mutable values
//! - **Broadcasters** — named pub/sub channels for ephemeral events
//! - **Plugins** — peer-to-peer message channels between plugin instances
//!
//! # Architecture
//!
//! - **Codec**: encodes values to transportable JSON text
//! - **Handles**: per-entity proxies caching state and re-emitting
//!   host-pushed events to local listeners; permanently inert once deleted
//! - **Registry**: lazy materialization — an unknown id suspends the
//!   resolve until the host pushes a creation notification
//! - **Facade**: demultiplexes host pushes to the right registry/handle
//! - **Client**: composition root and public lookup API
//!
//! # Example
//!
//! ```no_run
//! use framelink_sdk::{Client, HostCalls};
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! async fn run(transport: Arc<dyn HostCalls>) -> framelink_sdk::SdkResult<()> {
//!     let client = Client::connect(transport).await?;
//!
//!     let score = client.field("score", json!(0)).await?;
//!     score.on_set(|value, user_id| {
//!         println!("score set to {value} by {user_id}");
//!     });
//!     score.set(&json!(10)).await?;
//!
//!     let chat = client.broadcaster("chat").await?;
//!     chat.emit("message", vec![json!("hello")]).await?;
//!     Ok(())
//! }
//! ```

pub mod codec;

mod broadcaster;
mod client;
mod connection;
mod error;
mod events;
mod field;
mod handle;
mod plugin;
mod registry;
mod transport;

pub use broadcaster::BroadcasterHandle;
pub use client::Client;
pub use connection::ConnectionFacade;
pub use error::{DecodeError, DeletedEntityError, SdkError, SdkResult};
pub use events::{EventHub, EventKey};
pub use field::FieldHandle;
pub use handle::RemoteEntity;
pub use plugin::PluginHandle;
pub use registry::EntityRegistry;
pub use transport::{HostCalls, HostLink, mock};

pub use framelink_types::{EntityInfo, EntityKind, HostNotification, Ports, User};
