//! # haspbridged: HASP panel bridge daemon
//!
//! Composition root that wires all adapters together and starts the bridge.
//!
//! ## Responsibilities
//! - Load configuration (config file, env vars) and install logging
//! - Build the device registry and message dispatcher from the panel list
//! - Connect to the MQTT broker and subscribe every panel (fatal on failure)
//! - Serve the update actions and event stream over HTTP
//! - Handle graceful shutdown (SIGTERM/SIGINT)
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer; no domain logic belongs here.

mod config;

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;
use tracing_subscriber::EnvFilter;

use haspbridge_adapter_http_axum::router;
use haspbridge_adapter_http_axum::state::AppState;
use haspbridge_adapter_mqtt::{MqttIntegration, MqttTransport};
use haspbridge_app::event_bus::InProcessEventBus;
use haspbridge_app::services::setup::Bridge;
use haspbridge_domain::event::{Event, EventKind};

use crate::config::Config;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.logging.filter))
        .init();

    if config.panels.nodes.is_empty() {
        tracing::warn!("no panels configured");
    }

    // Core
    let event_bus = Arc::new(InProcessEventBus::new(256));
    let bridge = Bridge::new(&config.panels, Arc::clone(&event_bus))?;

    // MQTT: subscriptions are only drained once the broker accepted us
    let mut mqtt = MqttIntegration::new(config.mqtt.clone());
    mqtt.start(bridge.dispatcher())?;
    let transport = mqtt.transport();
    let timeout = config.mqtt.connect_timeout();
    if let Err(err) = subscribe_panels(&mqtt, &bridge, &transport, timeout).await {
        tracing::error!(error = %err, "bridge setup failed");
        mqtt.teardown();
        return Err(err);
    }

    tokio::spawn(log_events(event_bus.subscribe()));

    // HTTP
    let state = AppState::new(bridge.update_service(transport), event_bus);
    let app = router::build(state);

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %bind_addr, "haspbridged listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    mqtt.teardown();
    Ok(())
}

/// Connect, subscribe every panel and wait for the broker to grant each
/// subscription. Any failure or timeout aborts startup.
async fn subscribe_panels(
    mqtt: &MqttIntegration,
    bridge: &Bridge<Arc<InProcessEventBus>>,
    transport: &MqttTransport,
    timeout: Duration,
) -> Result<(), Box<dyn std::error::Error>> {
    mqtt.wait_connected(timeout).await?;
    let filters = tokio::time::timeout(timeout, bridge.subscribe_all(transport)).await??;
    mqtt.confirm_subscriptions(filters, timeout).await?;
    Ok(())
}

async fn log_events(mut rx: broadcast::Receiver<Event>) {
    loop {
        match rx.recv().await {
            Ok(event) => match &event.kind {
                EventKind::ButtonClick(press) => tracing::info!(
                    node = %press.node_name,
                    button = %press.button_id,
                    action = %press.button_action,
                    "button click"
                ),
                EventKind::NodeStatus(status) => tracing::info!(
                    node = %status.node_name,
                    online = status.online,
                    "node status"
                ),
            },
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "event logger lagged");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for ctrl-c");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("shutdown signal received");
}
