//! Update service: the `update_colors` and `update_message` actions.

use std::sync::Arc;

use haspbridge_domain::command::{OutboundMessage, UpdateColors, UpdateMessage};
use haspbridge_domain::device::Device;
use haspbridge_domain::error::BridgeError;

use crate::ports::MessageTransport;
use crate::registry::DeviceRegistry;

/// Resolves the target device and publishes the encoded command.
pub struct UpdateService<T> {
    registry: Arc<DeviceRegistry>,
    transport: T,
}

impl<T: MessageTransport + Send + Sync> UpdateService<T> {
    /// Create a new service over a built registry.
    pub fn new(registry: Arc<DeviceRegistry>, transport: T) -> Self {
        Self {
            registry,
            transport,
        }
    }

    /// Registry the service resolves names against.
    #[must_use]
    pub fn registry(&self) -> &DeviceRegistry {
        &self.registry
    }

    /// Publish background/foreground colors for one button.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::Validation`] when required fields are missing
    /// (checked before the lookup), [`BridgeError::NotFound`] for an unknown
    /// device, or the transport error of a failed publish.
    pub async fn update_colors(&self, command: UpdateColors) -> Result<(), BridgeError> {
        if let Err(err) = command.validate() {
            tracing::error!(error = %err, "update_colors rejected");
            return Err(err.into());
        }
        let device = self.resolve("update_colors", &command.node_name)?;
        self.send(command.encode(&device)).await
    }

    /// Publish text (and usually a font size) for one button.
    ///
    /// # Errors
    ///
    /// Same as [`UpdateService::update_colors`].
    pub async fn update_message(&self, command: UpdateMessage) -> Result<(), BridgeError> {
        if let Err(err) = command.validate() {
            tracing::error!(error = %err, "update_message rejected");
            return Err(err.into());
        }
        let device = self.resolve("update_message", &command.node_name)?;
        self.send(command.encode(&device)).await
    }

    fn resolve(&self, action: &'static str, node_name: &str) -> Result<Arc<Device>, BridgeError> {
        self.registry.lookup(node_name).inspect_err(|err| {
            tracing::error!(action, node = %node_name, error = %err, "unknown device");
        })
    }

    async fn send(&self, messages: Vec<OutboundMessage>) -> Result<(), BridgeError> {
        for message in messages {
            tracing::debug!(topic = %message.topic, payload = %message.payload, "publishing command");
            self.transport
                .publish(&message.topic, message.payload)
                .await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use haspbridge_domain::config::{NodeConfig, PanelsConfig};
    use haspbridge_domain::error::ValidationError;
    use haspbridge_domain::font::FontSize;

    #[derive(Default)]
    struct RecordingTransport {
        published: Mutex<Vec<(String, String)>>,
    }

    impl RecordingTransport {
        fn published(&self) -> Vec<(String, String)> {
            self.published.lock().unwrap().clone()
        }
    }

    impl MessageTransport for RecordingTransport {
        async fn publish(&self, topic: &str, payload: String) -> Result<(), BridgeError> {
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

    fn service() -> UpdateService<Arc<RecordingTransport>> {
        let config = PanelsConfig {
            nodes: vec![NodeConfig::new("kitchen").in_group("downstairs")],
            ..PanelsConfig::default()
        };
        let registry = Arc::new(DeviceRegistry::from_config(&config).unwrap());
        UpdateService::new(registry, Arc::new(RecordingTransport::default()))
    }

    fn hi() -> UpdateMessage {
        UpdateMessage {
            node_name: "kitchen".to_string(),
            button_id: "p1b3".to_string(),
            message: "Hi".to_string(),
            ..UpdateMessage::default()
        }
    }

    fn pair(topic: &str, payload: &str) -> (String, String) {
        (topic.to_string(), payload.to_string())
    }

    #[tokio::test]
    async fn should_publish_text_and_computed_font() {
        let service = service();
        service.update_message(hi()).await.unwrap();
        assert_eq!(
            service.transport.published(),
            vec![
                pair("hasp/kitchen/command/p1b3.txt", "\"Hi\""),
                pair("hasp/kitchen/command/p1b3.font", "3"),
            ]
        );
    }

    #[tokio::test]
    async fn should_publish_explicit_font_size() {
        let service = service();
        let command = UpdateMessage {
            font_size: Some(FontSize::try_from(1_i64).unwrap()),
            ..hi()
        };
        service.update_message(command).await.unwrap();
        assert_eq!(
            service.transport.published()[1],
            pair("hasp/kitchen/command/p1b3.font", "1")
        );
    }

    #[tokio::test]
    async fn should_publish_background_only() {
        let service = service();
        let command = UpdateColors {
            node_name: "kitchen".to_string(),
            button_id: "p1b3".to_string(),
            background: Some("#FF0000".to_string()),
            foreground: None,
        };
        service.update_colors(command).await.unwrap();
        assert_eq!(
            service.transport.published(),
            vec![pair("hasp/kitchen/command/p1b3.bco", "#FF0000")]
        );
    }

    #[tokio::test]
    async fn should_publish_to_group_command_root() {
        let service = service();
        let command = UpdateColors {
            node_name: "downstairs".to_string(),
            button_id: "p0b1".to_string(),
            background: None,
            foreground: Some("0".to_string()),
        };
        service.update_colors(command).await.unwrap();
        assert_eq!(
            service.transport.published(),
            vec![pair("hasp/downstairs/command/p0b1.pco", "0")]
        );
    }

    #[tokio::test]
    async fn should_publish_nothing_for_unknown_device() {
        let service = service();
        let command = UpdateMessage {
            node_name: "attic".to_string(),
            ..hi()
        };
        let result = service.update_message(command).await;
        assert!(matches!(result, Err(BridgeError::NotFound(_))));

        let colors = UpdateColors {
            node_name: "attic".to_string(),
            button_id: "p1b3".to_string(),
            background: Some("1".to_string()),
            foreground: None,
        };
        assert!(service.update_colors(colors).await.is_err());
        assert!(service.transport.published().is_empty());
    }

    #[tokio::test]
    async fn should_validate_before_lookup() {
        let service = service();
        let command = UpdateColors {
            node_name: "attic".to_string(),
            button_id: "p1b3".to_string(),
            ..UpdateColors::default()
        };
        let result = service.update_colors(command).await;
        assert!(matches!(
            result,
            Err(BridgeError::Validation(ValidationError::MissingColor))
        ));
        assert!(service.transport.published().is_empty());
    }
}
