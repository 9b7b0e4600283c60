//! Message dispatcher: routes inbound MQTT deliveries to decoders.
//!
//! Every subscription is bound at setup time to one immutable [`Device`].
//! A delivery is decoded independently of every other, and malformed
//! messages are logged and dropped; nothing here retries or fails the
//! subscription.

use std::sync::Arc;

use haspbridge_domain::decode::{self, DecodeError};
use haspbridge_domain::device::Device;
use haspbridge_domain::event::Event;
use haspbridge_domain::topic::topic_matches_filter;

use crate::ports::EventPublisher;
use crate::registry::DeviceRegistry;

/// What a subscription carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RouteKind {
    /// Button presses under `{prefix}/{name}/state/#`.
    State,
    /// Online/offline under `{prefix}/{name}/status`.
    Availability,
}

/// One subscription filter bound to one device.
#[derive(Debug, Clone)]
struct Route {
    filter: String,
    kind: RouteKind,
    device: Arc<Device>,
}

impl Route {
    fn filter(&self) -> &str {
        &self.filter
    }

    fn decode(&self, topic: &str, payload: &str) -> Result<Event, DecodeError> {
        match self.kind {
            RouteKind::State => decode::decode_state(&self.device, topic, payload).map(Event::from),
            RouteKind::Availability => {
                decode::decode_status(&self.device, topic, payload).map(Event::from)
            }
        }
    }
}

/// Routes deliveries to the decoder bound to the matching subscription.
pub struct MessageDispatcher<EP> {
    routes: Vec<Route>,
    events: EP,
}

impl<EP: EventPublisher + Send + Sync> MessageDispatcher<EP> {
    /// Bind a state and an availability route to every node in `registry`.
    /// Groups get no routes.
    pub fn new(registry: &DeviceRegistry, events: EP) -> Self {
        let mut routes = Vec::new();
        for device in registry.nodes() {
            if let Some(filter) = device.state_topic() {
                routes.push(Route {
                    filter: filter.to_string(),
                    kind: RouteKind::State,
                    device: Arc::clone(device),
                });
            }
            if let Some(filter) = device.availability_topic() {
                routes.push(Route {
                    filter: filter.to_string(),
                    kind: RouteKind::Availability,
                    device: Arc::clone(device),
                });
            }
        }
        routes.sort_by(|a, b| a.filter.cmp(&b.filter));
        Self { routes, events }
    }

    /// Every filter that must be subscribed for the routes to receive anything.
    pub fn filters(&self) -> impl Iterator<Item = &str> {
        self.routes.iter().map(Route::filter)
    }

    /// Handle one delivery. Returns how many events were published.
    pub async fn dispatch(&self, topic: &str, payload: &[u8]) -> usize {
        let Ok(payload) = std::str::from_utf8(payload) else {
            tracing::warn!(%topic, len = payload.len(), "dropping non UTF-8 payload");
            return 0;
        };

        let mut published = 0;
        let mut matched = false;
        for route in self
            .routes
            .iter()
            .filter(|route| topic_matches_filter(topic, &route.filter))
        {
            matched = true;
            match route.decode(topic, payload) {
                Ok(event) => {
                    tracing::debug!(node = %route.device.name(), %topic, %payload, "panel message decoded");
                    if let Err(err) = self.events.publish(event).await {
                        tracing::error!(error = %err, node = %route.device.name(), "failed to publish event");
                    } else {
                        published += 1;
                    }
                }
                Err(err @ DecodeError::UnexpectedPayload { .. }) => {
                    tracing::error!(
                        node = %route.device.name(),
                        %topic,
                        expected = %route.filter,
                        error = %err,
                        "unexpected payload"
                    );
                }
                Err(err) => {
                    tracing::warn!(
                        node = %route.device.name(),
                        %topic,
                        expected = %route.filter,
                        error = %err,
                        "message on unexpected topic"
                    );
                }
            }
        }

        if !matched {
            tracing::warn!(%topic, "no subscription matches topic");
        }
        published
    }
}
