//! Event: an immutable record of something a panel reported.
//!
//! Events are produced by decoding inbound MQTT messages and are published
//! to the event bus immediately; they are never stored.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::id::EventId;
use crate::time::{Timestamp, now};

/// Payload sent by a panel when a button is pressed or released.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ButtonAction {
    On,
    Off,
}

impl ButtonAction {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::On => "ON",
            Self::Off => "OFF",
        }
    }
}

impl fmt::Display for ButtonAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The payload was neither `ON` nor `OFF`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("expected ON or OFF, got {0:?}")]
pub struct InvalidAction(pub String);

impl FromStr for ButtonAction {
    type Err = InvalidAction;

    /// Exact, case-sensitive match.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ON" => Ok(Self::On),
            "OFF" => Ok(Self::Off),
            other => Err(InvalidAction(other.to_string())),
        }
    }
}

/// A decoded button press.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ButtonPress {
    pub node_name: String,
    pub button_id: String,
    pub button_action: ButtonAction,
}

/// A node came online or went offline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeStatus {
    pub node_name: String,
    pub online: bool,
}

/// What happened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum EventKind {
    ButtonClick(ButtonPress),
    NodeStatus(NodeStatus),
}

/// Envelope published on the event bus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub timestamp: Timestamp,
    #[serde(flatten)]
    pub kind: EventKind,
}

impl Event {
    /// Wrap `kind` with a fresh id and the current time.
    #[must_use]
    pub fn new(kind: EventKind) -> Self {
        Self {
            id: EventId::new(),
            timestamp: now(),
            kind,
        }
    }
}

impl From<ButtonPress> for Event {
    fn from(press: ButtonPress) -> Self {
        Self::new(EventKind::ButtonClick(press))
    }
}

impl From<NodeStatus> for Event {
    fn from(status: NodeStatus) -> Self {
        Self::new(EventKind::NodeStatus(status))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_parse_exact_payloads_only() {
        assert_eq!("ON".parse::<ButtonAction>(), Ok(ButtonAction::On));
        assert_eq!("OFF".parse::<ButtonAction>(), Ok(ButtonAction::Off));
        assert!("on".parse::<ButtonAction>().is_err());
        assert!("TOGGLE".parse::<ButtonAction>().is_err());
        assert!(" ON".parse::<ButtonAction>().is_err());
    }

    #[test]
    fn should_serialize_button_click_with_flat_fields() {
        let event = Event::from(ButtonPress {
            node_name: "kitchen".to_string(),
            button_id: "p1b3".to_string(),
            button_action: ButtonAction::On,
        });
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event_type"], "button_click");
        assert_eq!(json["node_name"], "kitchen");
        assert_eq!(json["button_id"], "p1b3");
        assert_eq!(json["button_action"], "ON");
        assert!(json["id"].is_string());
    }

    #[test]
    fn should_tag_node_status_events() {
        let event = Event::from(NodeStatus {
            node_name: "hall".to_string(),
            online: false,
        });
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event_type"], "node_status");
        assert_eq!(json["online"], false);
    }
}
