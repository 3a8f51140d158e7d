//! Error types for the SDK.
//!
//! The taxonomy follows one rule: `DeletedEntityError` is always surfaced
//! to plugin code, `DecodeError` is always swallowed at the point of
//! inbound delivery. Keeping them as distinct types makes it hard to mix
//! the two disciplines up at a call site.

use framelink_types::EntityKind;
use thiserror::Error;

/// Result type for SDK operations.
pub type SdkResult<T> = Result<T, SdkError>;

/// An operation was attempted on a handle the host has already deleted.
#[derive(Debug, Error)]
#[error("{kind} '{id}' is deleted")]
pub struct DeletedEntityError {
    /// The entity kind of the dead handle.
    pub kind: EntityKind,
    /// The entity id of the dead handle.
    pub id: String,
}

impl DeletedEntityError {
    pub(crate) fn new(kind: EntityKind, id: impl Into<String>) -> Self {
        Self {
            kind,
            id: id.into(),
        }
    }
}

/// A payload from the host could not be decoded.
///
/// Never fatal: inbound delivery drops the payload, and a malformed field
/// snapshot triggers fallback seeding instead of propagating.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The text is not valid codec output.
    #[error("malformed payload: {0}")]
    Malformed(#[source] serde_json::Error),

    /// The text decoded, but not to an `[event, ...args]` message.
    #[error("payload is not an [event, ...args] message")]
    NotAMessage,
}

/// Errors surfaced by SDK operations.
#[derive(Debug, Error)]
pub enum SdkError {
    /// Outbound operation on a deleted handle.
    #[error(transparent)]
    Deleted(#[from] DeletedEntityError),

    /// Decode failure, in the rare positions where one propagates.
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    /// Encoding a value for transport failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The transport reported a failed host round trip. Not retried.
    #[error("transport error: {0}")]
    Transport(String),

    /// A creation waiter's channel was dropped before it was fulfilled.
    #[error("channel closed")]
    ChannelClosed,
}
