//! Shared application state for axum handlers.

use std::sync::Arc;

use haspbridge_app::event_bus::InProcessEventBus;
use haspbridge_app::ports::MessageTransport;
use haspbridge_app::services::update_service::UpdateService;

/// Application state shared across all axum handlers.
///
/// `Clone` is implemented manually so the transport itself does not need
/// to be `Clone`; only the `Arc` wrappers are cloned.
pub struct AppState<T> {
    /// The update actions.
    pub update_service: Arc<UpdateService<T>>,
    /// Event bus for real-time SSE streaming.
    pub event_bus: Arc<InProcessEventBus>,
}

impl<T> Clone for AppState<T> {
    fn clone(&self) -> Self {
        Self {
            update_service: Arc::clone(&self.update_service),
            event_bus: Arc::clone(&self.event_bus),
        }
    }
}

impl<T> AppState<T>
where
    T: MessageTransport + Send + Sync + 'static,
{
    /// Create a new application state.
    pub fn new(update_service: UpdateService<T>, event_bus: Arc<InProcessEventBus>) -> Self {
        Self {
            update_service: Arc::new(update_service),
            event_bus,
        }
    }
}
