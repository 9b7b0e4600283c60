//! Server-Sent Events (SSE) stream of panel events.

use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use tokio_stream::StreamExt;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;

use haspbridge_app::ports::MessageTransport;

use crate::state::AppState;

/// `GET /api/events/stream`: SSE stream of button clicks and node status.
///
/// Each event is sent as a JSON `data:` frame, with the SSE event name set
/// to the event type. The stream continues until the client disconnects.
pub async fn stream<T>(
    State(state): State<AppState<T>>,
) -> Sse<impl tokio_stream::Stream<Item = Result<Event, std::convert::Infallible>>>
where
    T: MessageTransport + Send + Sync + 'static,
{
    let event_rx = state.event_bus.subscribe();
    tracing::debug!(clients = state.event_bus.receiver_count(), "SSE client connected");
    let event_stream = BroadcastStream::new(event_rx).filter_map(|result| match result {
        Ok(event) => match serde_json::to_value(&event) {
            Ok(json) => {
                let name = json["event_type"].as_str().unwrap_or("event").to_string();
                Some(Ok(Event::default().event(name).data(json.to_string())))
            }
            Err(err) => {
                tracing::warn!(%err, "failed to serialize event for SSE stream");
                None
            }
        },
        Err(BroadcastStreamRecvError::Lagged(n)) => {
            tracing::warn!(skipped = n, "SSE subscriber lagged, some events were dropped");
            None
        }
    });

    Sse::new(event_stream).keep_alive(KeepAlive::default())
}
