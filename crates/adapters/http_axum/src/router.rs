//! Axum router assembly.

use axum::Router;
use axum::routing::get;
use tower_http::trace::TraceLayer;

use haspbridge_app::ports::MessageTransport;

use crate::state::AppState;

/// Build the top-level axum [`Router`].
///
/// Nests API routes under `/api`. Includes a [`TraceLayer`] that logs each
/// HTTP request/response at the `DEBUG` level using the `tracing` ecosystem.
pub fn build<T>(state: AppState<T>) -> Router
where
    T: MessageTransport + Send + Sync + 'static,
{
    Router::new()
        .route("/health", get(health_check))
        .nest("/api", crate::api::routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use haspbridge_app::event_bus::InProcessEventBus;
    use haspbridge_app::registry::DeviceRegistry;
    use haspbridge_app::services::update_service::UpdateService;
    use haspbridge_domain::config::{NodeConfig, PanelsConfig};
    use haspbridge_domain::error::BridgeError;

    #[derive(Default)]
    struct RecordingTransport {
        published: Mutex<Vec<(String, String)>>,
        broken: bool,
    }

    impl MessageTransport for RecordingTransport {
        async fn publish(&self, topic: &str, payload: String) -> Result<(), BridgeError> {
            if self.broken {
                return Err(BridgeError::Transport(Box::new(std::io::Error::other(
                    "offline",
                ))));
            }
            self.published
                .lock()
                .unwrap()
                .push((topic.to_string(), payload));
            Ok(())
        }

        async fn subscribe(&self, _filter: &str) -> Result<(), BridgeError> {
            Ok(())
        }
    }

    fn app_with(transport: Arc<RecordingTransport>) -> Router {
        let config = PanelsConfig {
            nodes: vec![NodeConfig::new("kitchen").in_group("downstairs")],
            ..PanelsConfig::default()
        };
        let registry = Arc::new(DeviceRegistry::from_config(&config).unwrap());
        let state = AppState::new(
            UpdateService::new(registry, transport),
            Arc::new(InProcessEventBus::new(16)),
        );
        build(state)
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn should_return_ok_when_health_check_called() {
        let app = app_with(Arc::default());
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn should_publish_message_and_font_when_update_message_called() {
        let transport = Arc::new(RecordingTransport::default());
        let app = app_with(Arc::clone(&transport));

        let response = app
            .oneshot(post_json(
                "/api/services/update_message",
                r#"{"node_name":"kitchen","button_id":"p1b3","message":"Hi"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        let published = transport.published.lock().unwrap().clone();
        assert_eq!(
            published,
            vec![
                (
                    "hasp/kitchen/command/p1b3.txt".to_string(),
                    "\"Hi\"".to_string()
                ),
                ("hasp/kitchen/command/p1b3.font".to_string(), "3".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn should_skip_font_when_update_font_is_false() {
        let transport = Arc::new(RecordingTransport::default());
        let app = app_with(Arc::clone(&transport));

        let response = app
            .oneshot(post_json(
                "/api/services/update_message",
                r#"{"node_name":"downstairs","button_id":"p0b2","message":"Dinner","update_font":false}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert_eq!(transport.published.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn should_return_bad_request_when_colors_missing() {
        let transport = Arc::new(RecordingTransport::default());
        let app = app_with(Arc::clone(&transport));

        let response = app
            .oneshot(post_json(
                "/api/services/update_colors",
                r#"{"node_name":"kitchen","button_id":"p1b3"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"], "one of background or foreground is required");
        assert!(transport.published.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn should_return_bad_request_when_font_size_out_of_range() {
        let app = app_with(Arc::default());
        let response = app
            .oneshot(post_json(
                "/api/services/update_message",
                r#"{"node_name":"kitchen","button_id":"p1b3","message":"Hi","font_size":7}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn should_report_missing_field_before_font_size_range() {
        let app = app_with(Arc::default());
        let response = app
            .oneshot(post_json(
                "/api/services/update_message",
                r#"{"button_id":"p1b3","message":"Hi","font_size":9}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"], "node_name is required");
    }

    #[tokio::test]
    async fn should_return_not_found_for_unknown_device() {
        let transport = Arc::new(RecordingTransport::default());
        let app = app_with(Arc::clone(&transport));

        let response = app
            .oneshot(post_json(
                "/api/services/update_colors",
                r##"{"node_name":"attic","button_id":"p1b3","background":"#FF0000"}"##,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(transport.published.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn should_return_bad_gateway_when_transport_fails() {
        let transport = Arc::new(RecordingTransport {
            broken: true,
            ..RecordingTransport::default()
        });
        let app = app_with(transport);

        let response = app
            .oneshot(post_json(
                "/api/services/update_colors",
                r#"{"node_name":"kitchen","button_id":"p1b3","foreground":"0"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn should_list_devices_with_topics() {
        let app = app_with(Arc::default());
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/devices")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body[0]["name"], "downstairs");
        assert_eq!(body[0]["kind"], "group");
        assert!(body[0]["state_topic"].is_null());
        assert_eq!(body[1]["state_topic"], "hasp/kitchen/state/#");
    }

    #[tokio::test]
    async fn should_return_not_found_for_unknown_device_lookup() {
        let app = app_with(Arc::default());
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/devices/attic")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
