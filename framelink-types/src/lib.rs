//! Wire-level type definitions for the framelink plugin SDK.
//!
//! This crate defines the types that cross the plugin/host boundary:
//! - Entity snapshots (`EntityInfo`) and kinds (`EntityKind`)
//! - The current user identity (`User`)
//! - The locally hosted port advertisement (`Ports`)
//! - Host-pushed notifications (`HostNotification`)
//!
//! Everything here is plain data. Proxy state, caching, and event dispatch
//! live in `framelink-sdk`.

mod info;
mod notification;
mod ports;
mod user;

pub use info::{EntityInfo, EntityKind};
pub use notification::HostNotification;
pub use ports::Ports;
pub use user::User;
