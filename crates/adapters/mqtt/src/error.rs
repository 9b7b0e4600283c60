//! MQTT adapter error types.

use std::time::Duration;

use haspbridge_domain::error::BridgeError;

/// Errors specific to the MQTT adapter.
#[derive(Debug, thiserror::Error)]
pub enum MqttError {
    /// The event loop was already handed to a background task.
    #[error("MQTT event loop already started")]
    AlreadyStarted,

    /// The event loop task ended before the broker answered.
    #[error("MQTT event loop stopped")]
    EventLoopStopped,

    /// No `ConnAck` arrived in time.
    #[error("no connection to the MQTT broker after {0:?}")]
    ConnectTimeout(Duration),

    /// Not every subscription was acknowledged in time.
    #[error("{acknowledged} of {expected} subscriptions acknowledged after {timeout:?}")]
    SubscribeTimeout {
        expected: usize,
        acknowledged: usize,
        timeout: Duration,
    },

    /// The broker refused one or more subscriptions.
    #[error("broker refused {0} subscription(s)")]
    SubscriptionRefused(usize),

    /// The rumqttc client rejected a request.
    #[error("MQTT client error")]
    Client(#[source] rumqttc::ClientError),
}

impl MqttError {
    /// Convert into a [`BridgeError::Transport`] for propagation across port
    /// boundaries.
    #[must_use]
    pub fn into_domain(self) -> BridgeError {
        BridgeError::Transport(Box::new(self))
    }
}

impl From<MqttError> for BridgeError {
    fn from(err: MqttError) -> Self {
        err.into_domain()
    }
}
