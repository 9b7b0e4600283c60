//! Commands: color and text updates addressed to one button.
//!
//! A command is validated on its own first, then encoded against a resolved
//! [`Device`] into the full list of outbound messages. Nothing is published
//! until encoding succeeded, so a rejected command never publishes partially.

use crate::device::Device;
use crate::error::ValidationError;
use crate::font::FontSize;
use crate::topic::CommandAttribute;

/// A single MQTT publication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    pub topic: String,
    pub payload: String,
}

impl OutboundMessage {
    fn new(topic: String, payload: impl Into<String>) -> Self {
        Self {
            topic,
            payload: payload.into(),
        }
    }
}

/// Change the background and/or foreground color of a button.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateColors {
    pub node_name: String,
    pub button_id: String,
    pub background: Option<String>,
    pub foreground: Option<String>,
}

impl UpdateColors {
    /// Check required fields. Empty colors count as absent.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] when `node_name` or `button_id` is empty,
    /// or neither color is given.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require("node_name", &self.node_name)?;
        require("button_id", &self.button_id)?;
        if non_empty(self.background.as_deref()).is_none()
            && non_empty(self.foreground.as_deref()).is_none()
        {
            return Err(ValidationError::MissingColor);
        }
        Ok(())
    }

    /// Messages to publish for `device`: `.bco` then `.pco`, each only when set.
    #[must_use]
    pub fn encode(&self, device: &Device) -> Vec<OutboundMessage> {
        let topics = device.topics();
        let mut messages = Vec::with_capacity(2);
        if let Some(background) = non_empty(self.background.as_deref()) {
            messages.push(OutboundMessage::new(
                topics.command_for(&self.button_id, CommandAttribute::Background),
                background,
            ));
        }
        if let Some(foreground) = non_empty(self.foreground.as_deref()) {
            messages.push(OutboundMessage::new(
                topics.command_for(&self.button_id, CommandAttribute::Foreground),
                foreground,
            ));
        }
        messages
    }
}

/// Change the text of a button, optionally adjusting its font.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateMessage {
    pub node_name: String,
    pub button_id: String,
    pub message: String,
    /// Explicit size; when `None` the size is derived from `message`.
    pub font_size: Option<FontSize>,
    /// When `false` no font message is sent at all.
    pub update_font: bool,
}

impl Default for UpdateMessage {
    fn default() -> Self {
        Self {
            node_name: String::new(),
            button_id: String::new(),
            message: String::new(),
            font_size: None,
            update_font: true,
        }
    }
}

impl UpdateMessage {
    /// Check required fields.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MissingField`] for an empty `node_name`,
    /// `button_id` or `message`.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require("node_name", &self.node_name)?;
        require("button_id", &self.button_id)?;
        require("message", &self.message)
    }

    /// Font size that will be sent, if any.
    #[must_use]
    pub fn effective_font_size(&self) -> Option<FontSize> {
        if !self.update_font {
            return None;
        }
        Some(
            self.font_size
                .unwrap_or_else(|| FontSize::for_text(&self.message)),
        )
    }

    /// Messages to publish for `device`: quoted `.txt`, then `.font` when a
    /// size applies.
    #[must_use]
    pub fn encode(&self, device: &Device) -> Vec<OutboundMessage> {
        let topics = device.topics();
        let mut messages = vec![OutboundMessage::new(
            topics.command_for(&self.button_id, CommandAttribute::Text),
            format!("\"{}\"", self.message),
        )];
        if let Some(size) = self.effective_font_size() {
            messages.push(OutboundMessage::new(
                topics.command_for(&self.button_id, CommandAttribute::Font),
                size.to_string(),
            ));
        }
        messages
    }
}

fn require(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::MissingField(field));
    }
    Ok(())
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
