//! JSON REST API handler modules.

#[allow(clippy::missing_errors_doc)]
pub mod devices;
pub mod events;
#[allow(clippy::missing_errors_doc)]
pub mod services;

use axum::Router;
use axum::routing::{get, post};

use haspbridge_app::ports::MessageTransport;

use crate::state::AppState;

/// Build the `/api` sub-router.
pub fn routes<T>() -> Router<AppState<T>>
where
    T: MessageTransport + Send + Sync + 'static,
{
    Router::new()
        .route("/devices", get(devices::list::<T>))
        .route("/devices/{name}", get(devices::get::<T>))
        .route(
            "/services/update_colors",
            post(services::update_colors::<T>),
        )
        .route(
            "/services/update_message",
            post(services::update_message::<T>),
        )
        .route("/events/stream", get(events::stream::<T>))
}
