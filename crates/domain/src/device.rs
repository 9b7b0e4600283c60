//! Device: an addressable panel (node) or a command-only group alias.

use std::fmt;

use serde::Serialize;

use crate::error::{BridgeError, ValidationError};
use crate::topic::{self, TopicSet};

/// Whether a device reports state or only receives commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceKind {
    /// A single panel: receives commands and reports button presses.
    Node,
    /// An alias shared by several panels: receives commands only.
    Group,
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Node => f.write_str("node"),
            Self::Group => f.write_str("group"),
        }
    }
}

/// An addressable unit. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Device {
    name: String,
    kind: DeviceKind,
    topics: TopicSet,
}

impl Device {
    /// Create an individual node under `prefix`.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::Validation`] when `name` is empty or contains
    /// a topic separator or wildcard.
    pub fn node(prefix: &str, name: impl Into<String>) -> Result<Self, BridgeError> {
        Self::new(prefix, name.into(), DeviceKind::Node)
    }

    /// Create a command-only group alias under `prefix`.
    ///
    /// # Errors
    ///
    /// Same as [`Device::node`].
    pub fn group(prefix: &str, name: impl Into<String>) -> Result<Self, BridgeError> {
        Self::new(prefix, name.into(), DeviceKind::Group)
    }

    fn new(prefix: &str, name: String, kind: DeviceKind) -> Result<Self, BridgeError> {
        if name.is_empty() {
            return Err(ValidationError::EmptyName.into());
        }
        if !topic::is_valid_level(&name) {
            return Err(ValidationError::InvalidName(name).into());
        }
        let topics = TopicSet::new(prefix, &name);
        Ok(Self { name, kind, topics })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn kind(&self) -> DeviceKind {
        self.kind
    }

    #[must_use]
    pub fn is_group(&self) -> bool {
        self.kind == DeviceKind::Group
    }

    #[must_use]
    pub fn topics(&self) -> &TopicSet {
        &self.topics
    }

    /// Command root every outbound message for this device is published under.
    #[must_use]
    pub fn command_topic(&self) -> &str {
        &self.topics.command
    }

    /// State subscription pattern; `None` for groups.
    #[must_use]
    pub fn state_topic(&self) -> Option<&str> {
        match self.kind {
            DeviceKind::Node => Some(&self.topics.state),
            DeviceKind::Group => None,
        }
    }

    /// Availability topic; `None` for groups.
    #[must_use]
    pub fn availability_topic(&self) -> Option<&str> {
        match self.kind {
            DeviceKind::Node => Some(&self.topics.availability),
            DeviceKind::Group => None,
        }
    }
}
