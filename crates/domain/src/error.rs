//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into [`BridgeError`]
//! at port boundaries.

use std::error::Error as StdError;

/// Top-level error shared by every crate in the workspace.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    /// A request or configuration value broke a domain invariant.
    #[error("validation error")]
    Validation(#[from] ValidationError),

    /// The named device is not registered.
    #[error("not found")]
    NotFound(#[from] NotFoundError),

    /// The messaging transport failed to publish or subscribe.
    #[error("transport error")]
    Transport(#[source] Box<dyn StdError + Send + Sync>),
}

/// Domain invariant violations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("name must not be empty")]
    EmptyName,

    #[error("name {0:?} contains a reserved topic character")]
    InvalidName(String),

    #[error("topic prefix must not be empty")]
    EmptyTopicPrefix,

    #[error("topic prefix {0:?} contains a wildcard or trailing separator")]
    InvalidTopicPrefix(String),

    #[error("node {0:?} is configured more than once")]
    DuplicateNode(String),

    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("one of background or foreground is required")]
    MissingColor,

    #[error("font size {0} is out of range (0..=3)")]
    FontSizeOutOfRange(i64),
}

/// A lookup by name found nothing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{entity} {id:?} not found")]
pub struct NotFoundError {
    pub entity: &'static str,
    pub id: String,
}
