//! Bridge setup: configuration in, wired services out.
//!
//! The binary calls these in order:
//!
//! 1. [`Bridge::new`]: validate config, build the registry and dispatcher
//! 2. start the transport's delivery loop with [`Bridge::dispatcher`]
//! 3. [`Bridge::subscribe_all`]: fails the whole setup on the first error
//! 4. [`Bridge::update_service`]: hand the actions to the service boundary

use std::sync::Arc;

use haspbridge_domain::config::PanelsConfig;
use haspbridge_domain::error::BridgeError;

use crate::ports::{EventPublisher, MessageTransport};
use crate::registry::DeviceRegistry;
use crate::services::dispatcher::MessageDispatcher;
use crate::services::update_service::UpdateService;

/// The wired core: registry plus the dispatcher bound to it.
pub struct Bridge<EP> {
    registry: Arc<DeviceRegistry>,
    dispatcher: Arc<MessageDispatcher<EP>>,
}

impl<EP> Clone for Bridge<EP> {
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
            dispatcher: Arc::clone(&self.dispatcher),
        }
    }
}

impl<EP: EventPublisher + Send + Sync> Bridge<EP> {
    /// Build the registry for `config` and bind a dispatcher publishing to `events`.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::Validation`] when the configuration is invalid;
    /// nothing is registered in that case.
    pub fn new(config: &PanelsConfig, events: EP) -> Result<Self, BridgeError> {
        let registry = DeviceRegistry::from_config(config)?;
        let dispatcher = MessageDispatcher::new(&registry, events);
        Ok(Self {
            registry: Arc::new(registry),
            dispatcher: Arc::new(dispatcher),
        })
    }

    #[must_use]
    pub fn registry(&self) -> Arc<DeviceRegistry> {
        Arc::clone(&self.registry)
    }

    #[must_use]
    pub fn dispatcher(&self) -> Arc<MessageDispatcher<EP>> {
        Arc::clone(&self.dispatcher)
    }

    /// Subscribe every node's filters. Groups are skipped.
    ///
    /// Returns the number of filters subscribed.
    ///
    /// # Errors
    ///
    /// Returns the first subscription error; the bridge must not run with a
    /// partially subscribed device set.
    pub async fn subscribe_all<T: MessageTransport + Sync>(
        &self,
        transport: &T,
    ) -> Result<usize, BridgeError> {
        let mut count = 0;
        for filter in self.dispatcher.filters() {
            if let Err(err) = transport.subscribe(filter).await {
                tracing::error!(%filter, error = %err, "subscription failed, aborting setup");
                return Err(err);
            }
            tracing::debug!(%filter, "subscribed");
            count += 1;
        }
        tracing::info!(filters = count, "all panel subscriptions issued");
        Ok(count)
    }

    /// Create the update actions, publishing through `transport`.
    pub fn update_service<T: MessageTransport + Send + Sync>(&self, transport: T) -> UpdateService<T> {
        UpdateService::new(Arc::clone(&self.registry), transport)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use haspbridge_domain::config::NodeConfig;
    use haspbridge_domain::error::ValidationError;
    use haspbridge_domain::event::EventKind;

    use crate::event_bus::InProcessEventBus;

    /// Records subscriptions, failing once `fail_on` is reached.
    #[derive(Default)]
    struct StubTransport {
        subscribed: Mutex<Vec<String>>,
        fail_on: Option<String>,
    }

    impl MessageTransport for StubTransport {
        async fn publish(&self, _topic: &str, _payload: String) -> Result<(), BridgeError> {
            Ok(())
        }

        async fn subscribe(&self, filter: &str) -> Result<(), BridgeError> {
            if self.fail_on.as_deref() == Some(filter) {
                return Err(BridgeError::Transport(Box::new(std::io::Error::other(
                    "subscribe refused",
                ))));
            }
            self.subscribed.lock().unwrap().push(filter.to_string());
            Ok(())
        }
    }

    fn config() -> PanelsConfig {
        PanelsConfig {
            nodes: vec![
                NodeConfig::new("kitchen").in_group("downstairs"),
                NodeConfig::new("hall").in_group("downstairs"),
            ],
            ..PanelsConfig::default()
        }
    }

    #[tokio::test]
    async fn should_subscribe_nodes_but_not_groups() {
        let bridge = Bridge::new(&config(), Arc::new(InProcessEventBus::new(8))).unwrap();
        let transport = StubTransport::default();

        let count = bridge.subscribe_all(&transport).await.unwrap();

        assert_eq!(count, 4);
        let subscribed = transport.subscribed.lock().unwrap().clone();
        assert!(subscribed.contains(&"hasp/kitchen/state/#".to_string()));
        assert!(subscribed.contains(&"hasp/hall/status".to_string()));
        assert!(!subscribed.iter().any(|f| f.contains("downstairs")));
    }

    #[tokio::test]
    async fn should_fail_setup_when_a_subscription_fails() {
        let bridge = Bridge::new(&config(), Arc::new(InProcessEventBus::new(8))).unwrap();
        let transport = StubTransport {
            fail_on: Some("hasp/kitchen/state/#".to_string()),
            ..StubTransport::default()
        };

        let result = bridge.subscribe_all(&transport).await;
        assert!(matches!(result, Err(BridgeError::Transport(_))));
    }

    #[test]
    fn should_reject_invalid_config_before_building() {
        let config = PanelsConfig {
            topic_prefix: String::new(),
            ..config()
        };
        let result = Bridge::new(&config, Arc::new(InProcessEventBus::new(8)));
        assert!(matches!(
            result,
            Err(BridgeError::Validation(ValidationError::EmptyTopicPrefix))
        ));
    }

    #[tokio::test]
    async fn should_route_dispatched_messages_to_event_bus() {
        let bus = Arc::new(InProcessEventBus::new(8));
        let mut rx = bus.subscribe();
        let bridge = Bridge::new(&config(), Arc::clone(&bus)).unwrap();

        bridge
            .dispatcher()
            .dispatch("hasp/hall/state/p2b1", b"OFF")
            .await;

        let event = rx.recv().await.unwrap();
        assert!(matches!(event.kind, EventKind::ButtonClick(ref press) if press.button_id == "p2b1"));
    }

    #[test]
    fn should_share_registry_with_update_service() {
        let bridge = Bridge::new(&config(), Arc::new(InProcessEventBus::new(8))).unwrap();
        let service = bridge.update_service(StubTransport::default());
        assert_eq!(service.registry().len(), 3);
    }
}
