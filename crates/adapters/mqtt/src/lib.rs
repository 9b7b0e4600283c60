//! # haspbridge-adapter-mqtt
//!
//! MQTT adapter: connects the bridge to the broker the panels talk to.
//!
//! ## Responsibilities
//! - Own the rumqttc client and its event loop
//! - Implement the `MessageTransport` port (publish commands, subscribe filters)
//! - Feed every inbound publish to the `MessageDispatcher`
//! - Restore subscriptions when the broker starts a fresh session
//! - Let startup wait for the connection and for every subscription to be
//!   granted, failing instead of hanging when the broker is unreachable
//!
//! Commands are published at QoS 0 and never retained.
//!
//! ## Dependency rule
//! Same as other adapters: depends on `haspbridge-app` and `haspbridge-domain`.

mod config;
mod error;
mod event_loop;
mod session;

pub use config::MqttConfig;
pub use error::MqttError;
pub use session::SessionStatus;

use std::sync::Arc;
use std::time::Duration;

use rumqttc::{AsyncClient, EventLoop, MqttOptions, QoS};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use haspbridge_app::ports::{EventPublisher, MessageTransport};
use haspbridge_app::services::dispatcher::MessageDispatcher;
use haspbridge_domain::error::BridgeError;

/// [`MessageTransport`] backed by a rumqttc client. Cheap to clone.
#[derive(Clone)]
pub struct MqttTransport {
    client: AsyncClient,
}

impl MessageTransport for MqttTransport {
    async fn publish(&self, topic: &str, payload: String) -> Result<(), BridgeError> {
        self.client
            .publish(topic, QoS::AtMostOnce, false, payload)
            .await
            .map_err(|err| MqttError::Client(err).into())
    }

    async fn subscribe(&self, filter: &str) -> Result<(), BridgeError> {
        self.client
            .subscribe(filter, QoS::AtMostOnce)
            .await
            .map_err(|err| MqttError::Client(err).into())
    }
}

/// The broker connection and its background event loop.
pub struct MqttIntegration {
    config: MqttConfig,
    client: AsyncClient,
    pending: Option<(EventLoop, watch::Sender<SessionStatus>)>,
    status: watch::Receiver<SessionStatus>,
    loop_handle: Option<JoinHandle<()>>,
}

impl MqttIntegration {
    /// Create the client. No network IO happens until [`start`](Self::start).
    #[must_use]
    pub fn new(config: MqttConfig) -> Self {
        let mut options = MqttOptions::new(
            config.client_id.clone(),
            config.broker_host.clone(),
            config.broker_port,
        );
        options.set_keep_alive(config.keep_alive());
        let (client, eventloop) = AsyncClient::new(options, config.channel_capacity);
        let (status_tx, status) = watch::channel(SessionStatus::default());

        Self {
            config,
            client,
            pending: Some((eventloop, status_tx)),
            status,
            loop_handle: None,
        }
    }

    /// Transport handle for publishing and subscribing.
    #[must_use]
    pub fn transport(&self) -> MqttTransport {
        MqttTransport {
            client: self.client.clone(),
        }
    }

    /// Spawn the event loop, delivering inbound messages to `dispatcher`.
    ///
    /// Must run before subscriptions are issued, otherwise the request queue
    /// is never drained.
    ///
    /// # Errors
    ///
    /// Returns [`MqttError::AlreadyStarted`] when called twice.
    pub fn start<EP>(&mut self, dispatcher: Arc<MessageDispatcher<EP>>) -> Result<(), MqttError>
    where
        EP: EventPublisher + Send + Sync + 'static,
    {
        let (eventloop, status) = self.pending.take().ok_or(MqttError::AlreadyStarted)?;
        let handle = tokio::spawn(event_loop::run(
            eventloop,
            self.client.clone(),
            dispatcher,
            status,
            self.config.reconnect_delay(),
        ));
        self.loop_handle = Some(handle);

        tracing::info!(
            host = %self.config.broker_host,
            port = self.config.broker_port,
            client_id = %self.config.client_id,
            "MQTT event loop started"
        );
        Ok(())
    }

    /// Latest connection and subscription outcomes.
    #[must_use]
    pub fn status(&self) -> SessionStatus {
        *self.status.borrow()
    }

    /// Wait until the broker has accepted the connection.
    ///
    /// Subscriptions are only drained from the request queue while
    /// connected, so setup must not queue them before this returns.
    ///
    /// # Errors
    ///
    /// Returns [`MqttError::ConnectTimeout`] when no `ConnAck` arrives within
    /// `timeout`, or [`MqttError::EventLoopStopped`] when the loop is gone.
    pub async fn wait_connected(&self, timeout: Duration) -> Result<(), MqttError> {
        let mut status = self.status.clone();
        let connected = tokio::time::timeout(timeout, status.wait_for(SessionStatus::has_connected))
            .await
            .map(|waited| waited.map(drop));
        match connected {
            Ok(Ok(())) => Ok(()),
            Ok(Err(_)) => Err(MqttError::EventLoopStopped),
            Err(_) => Err(MqttError::ConnectTimeout(timeout)),
        }
    }

    /// Wait for the broker to answer `expected` subscriptions and fail if
    /// any of them was refused.
    ///
    /// # Errors
    ///
    /// Returns [`MqttError::SubscriptionRefused`] when the broker refused a
    /// filter, [`MqttError::SubscribeTimeout`] when answers are missing after
    /// `timeout`, or [`MqttError::EventLoopStopped`] when the loop is gone.
    pub async fn confirm_subscriptions(
        &self,
        expected: usize,
        timeout: Duration,
    ) -> Result<(), MqttError> {
        let mut status = self.status.clone();
        let answered = tokio::time::timeout(
            timeout,
            status.wait_for(|current| current.acknowledged() >= expected),
        )
        .await
        .map(|waited| waited.map(drop));
        match answered {
            Ok(Ok(())) => {}
            Ok(Err(_)) => return Err(MqttError::EventLoopStopped),
            Err(_) => {
                return Err(MqttError::SubscribeTimeout {
                    expected,
                    acknowledged: self.status().acknowledged(),
                    timeout,
                });
            }
        }

        let current = self.status();
        if current.refused > 0 {
            tracing::error!(refused = current.refused, expected, "panel subscriptions refused");
            return Err(MqttError::SubscriptionRefused(current.refused));
        }
        tracing::info!(granted = current.granted, "panel subscriptions granted");
        Ok(())
    }

    /// Disconnect and stop the event loop.
    pub fn teardown(&mut self) {
        if let Err(err) = self.client.try_disconnect() {
            tracing::debug!(error = %err, "MQTT disconnect request not queued");
        }
        if let Some(handle) = self.loop_handle.take() {
            handle.abort();
            tracing::debug!("MQTT event loop aborted");
        }
        tracing::info!("MQTT integration stopped");
    }
}
