//! Broker session bookkeeping shared by the event loop and startup.
//!
//! The event loop records every `ConnAck` and `SubAck` here and publishes
//! the result on a `watch` channel, so setup can wait for the first
//! connection and for the broker's verdict on each subscription.

use rumqttc::SubscribeReasonCode;

use haspbridge_app::ports::EventPublisher;
use haspbridge_app::services::dispatcher::MessageDispatcher;

/// What the broker has told us so far.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStatus {
    /// Number of `ConnAck`s received.
    pub connections: usize,
    /// Subscriptions the broker granted.
    pub granted: usize,
    /// Subscriptions the broker refused.
    pub refused: usize,
}

impl SessionStatus {
    #[must_use]
    pub fn has_connected(&self) -> bool {
        self.connections > 0
    }

    /// Subscriptions the broker answered, granted or not.
    #[must_use]
    pub fn acknowledged(&self) -> usize {
        self.granted + self.refused
    }

    /// Record a `ConnAck`. Returns `true` when the broker dropped our
    /// session on a reconnect, so every filter must be subscribed again.
    pub(crate) fn on_connack(&mut self, session_present: bool) -> bool {
        let reconnect = self.has_connected();
        self.connections += 1;
        reconnect && !session_present
    }

    /// Record a `SubAck`. Returns how many of its filters were refused.
    pub(crate) fn on_suback(&mut self, return_codes: &[SubscribeReasonCode]) -> usize {
        let refused = return_codes
            .iter()
            .filter(|code| matches!(code, SubscribeReasonCode::Failure))
            .count();
        self.granted += return_codes.len() - refused;
        self.refused += refused;
        refused
    }
}

/// Filters to subscribe again after a `ConnAck`; empty when nothing was lost.
pub(crate) fn restore_plan<'a, EP>(
    status: &mut SessionStatus,
    session_present: bool,
    dispatcher: &'a MessageDispatcher<EP>,
) -> Vec<&'a str>
where
    EP: EventPublisher + Send + Sync,
{
    if status.on_connack(session_present) {
        dispatcher.filters().collect()
    } else {
        Vec::new()
    }
}
