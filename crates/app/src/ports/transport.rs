//! Transport port: the MQTT broker as seen by the core.
//!
//! Both operations are fire-and-forget: they return once the request is
//! handed to the client, not when the broker acknowledges it. Delivery,
//! QoS and reconnection are the adapter's business.

use std::future::Future;

use haspbridge_domain::error::BridgeError;

/// Publishes commands and registers subscriptions on the broker.
pub trait MessageTransport {
    /// Publish `payload` on `topic`.
    fn publish(
        &self,
        topic: &str,
        payload: String,
    ) -> impl Future<Output = Result<(), BridgeError>> + Send;

    /// Subscribe to `filter` (may contain `+` / `#` wildcards).
    fn subscribe(&self, filter: &str) -> impl Future<Output = Result<(), BridgeError>> + Send;
}

impl<T: MessageTransport + Send + Sync> MessageTransport for std::sync::Arc<T> {
    fn publish(
        &self,
        topic: &str,
        payload: String,
    ) -> impl Future<Output = Result<(), BridgeError>> + Send {
        (**self).publish(topic, payload)
    }

    fn subscribe(&self, filter: &str) -> impl Future<Output = Result<(), BridgeError>> + Send {
        (**self).subscribe(filter)
    }
}
