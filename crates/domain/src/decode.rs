//! Decoding of inbound panel messages into events.

use crate::device::Device;
use crate::event::{ButtonAction, ButtonPress, NodeStatus};

/// Why an inbound message was discarded.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// The message arrived on a topic outside the device's state root.
    #[error("topic {topic:?} does not match expected {expected:?}")]
    TopicMismatch { topic: String, expected: String },

    /// The payload is not a recognised action.
    #[error("unexpected payload {payload:?}, expected ON or OFF")]
    UnexpectedPayload { payload: String },

    /// The device is a group and never receives state.
    #[error("device has no state subscription")]
    NotSubscribed,
}

/// Decode a message delivered on `device`'s state subscription.
///
/// The button id is whatever follows the state root, so
/// `hasp/kitchen/state/p1b3` yields `p1b3`.
///
/// # Errors
///
/// Returns [`DecodeError`] when the topic is outside the state root, the
/// payload is not exactly `ON`/`OFF`, or `device` is a group.
pub fn decode_state(device: &Device, topic: &str, payload: &str) -> Result<ButtonPress, DecodeError> {
    if device.state_topic().is_none() {
        return Err(DecodeError::NotSubscribed);
    }
    let root = device.topics().state_root();
    let Some(button_id) = topic.strip_prefix(root) else {
        return Err(DecodeError::TopicMismatch {
            topic: topic.to_string(),
            expected: device.topics().state.clone(),
        });
    };
    let button_action = payload
        .parse::<ButtonAction>()
        .map_err(|_| DecodeError::UnexpectedPayload {
            payload: payload.to_string(),
        })?;

    Ok(ButtonPress {
        node_name: device.name().to_string(),
        button_id: button_id.to_string(),
        button_action,
    })
}

/// Decode a message delivered on `device`'s availability topic.
///
/// # Errors
///
/// Returns [`DecodeError`] when the topic differs from the availability
/// topic, the payload is not `ON`/`OFF`, or `device` is a group.
pub fn decode_status(device: &Device, topic: &str, payload: &str) -> Result<NodeStatus, DecodeError> {
    let Some(expected) = device.availability_topic() else {
        return Err(DecodeError::NotSubscribed);
    };
    if topic != expected {
        return Err(DecodeError::TopicMismatch {
            topic: topic.to_string(),
            expected: expected.to_string(),
        });
    }
    let action = payload
        .parse::<ButtonAction>()
        .map_err(|_| DecodeError::UnexpectedPayload {
            payload: payload.to_string(),
        })?;

    Ok(NodeStatus {
        node_name: device.name().to_string(),
        online: action == ButtonAction::On,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kitchen() -> Device {
        Device::node("hasp", "kitchen").unwrap()
    }

    #[test]
    fn should_decode_button_press_from_state_topic() {
        let press = decode_state(&kitchen(), "hasp/kitchen/state/p1b3", "ON").unwrap();
        assert_eq!(
            press,
            ButtonPress {
                node_name: "kitchen".to_string(),
                button_id: "p1b3".to_string(),
                button_action: ButtonAction::On,
            }
        );
    }

    #[test]
    fn should_keep_nested_levels_in_button_id() {
        let press = decode_state(&kitchen(), "hasp/kitchen/state/page/1", "OFF").unwrap();
        assert_eq!(press.button_id, "page/1");
        assert_eq!(press.button_action, ButtonAction::Off);
    }

    #[test]
    fn should_reject_unexpected_payload() {
        let result = decode_state(&kitchen(), "hasp/kitchen/state/p1b3", "TOGGLE");
        assert_eq!(
            result,
            Err(DecodeError::UnexpectedPayload {
                payload: "TOGGLE".to_string()
            })
        );
    }

    #[test]
    fn should_reject_topic_outside_state_root_even_with_valid_payload() {
        let result = decode_state(&kitchen(), "hasp/hall/state/p1b3", "ON");
        assert!(matches!(result, Err(DecodeError::TopicMismatch { .. })));
    }

    #[test]
    fn should_reject_state_for_group() {
        let group = Device::group("hasp", "downstairs").unwrap();
        let result = decode_state(&group, "hasp/downstairs/state/p1b3", "ON");
        assert_eq!(result, Err(DecodeError::NotSubscribed));
    }

    #[test]
    fn should_decode_availability() {
        let status = decode_status(&kitchen(), "hasp/kitchen/status", "OFF").unwrap();
        assert_eq!(status.node_name, "kitchen");
        assert!(!status.online);
    }

    #[test]
    fn should_reject_unknown_availability_payload() {
        let result = decode_status(&kitchen(), "hasp/kitchen/status", "maybe");
        assert!(matches!(result, Err(DecodeError::UnexpectedPayload { .. })));
    }
}
