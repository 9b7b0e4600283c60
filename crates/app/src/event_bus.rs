//! Broadcast bus carrying decoded panel events to in-process listeners.
//!
//! Listeners (the SSE stream, the daemon's event logger) each hold a
//! receiver. A listener that falls more than `capacity` events behind loses
//! the oldest ones and is told how many it skipped.

use std::future::Future;

use tokio::sync::broadcast;

use haspbridge_domain::error::BridgeError;
use haspbridge_domain::event::{Event, EventKind};

use crate::ports::EventPublisher;

/// [`EventPublisher`] fanning events out over a tokio [`broadcast`] channel.
pub struct InProcessEventBus {
    sender: broadcast::Sender<Event>,
}

impl InProcessEventBus {
    /// Bus keeping at most `capacity` undelivered events per listener.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// New listener; sees only events published from now on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.sender.subscribe()
    }

    /// Listeners currently attached.
    #[must_use]
    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl EventPublisher for InProcessEventBus {
    fn publish(&self, event: Event) -> impl Future<Output = Result<(), BridgeError>> + Send {
        let kind = match &event.kind {
            EventKind::ButtonClick(_) => "button_click",
            EventKind::NodeStatus(_) => "node_status",
        };
        match self.sender.send(event) {
            Ok(receivers) => tracing::trace!(kind, receivers, "event published"),
            Err(_) => tracing::trace!(kind, "event published with no listeners"),
        }
        async { Ok(()) }
    }
}
