//! Device registry: every addressable name, built once at startup.
//!
//! The registry is mutated only while the bridge is being set up. After
//! that it is shared behind an `Arc` and only read, so lookups take no lock.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;

use haspbridge_domain::config::PanelsConfig;
use haspbridge_domain::device::Device;
use haspbridge_domain::error::{BridgeError, NotFoundError};

/// Name-to-device mapping.
#[derive(Debug, Default)]
pub struct DeviceRegistry {
    devices: HashMap<String, Arc<Device>>,
}

impl DeviceRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the registry for `config`.
    ///
    /// Nodes are registered before groups, so a group sharing a node's name
    /// never replaces that node's state subscription.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::Validation`] when the configuration is invalid.
    pub fn from_config(config: &PanelsConfig) -> Result<Self, BridgeError> {
        config.validate()?;

        let mut registry = Self::new();
        for node in &config.nodes {
            registry.register(Device::node(&config.topic_prefix, node.name.as_str())?);
        }
        for group in config.group_names() {
            registry.register(Device::group(&config.topic_prefix, group)?);
        }

        tracing::info!(
            nodes = registry.nodes().count(),
            total = registry.len(),
            prefix = %config.topic_prefix,
            "device registry built"
        );
        Ok(registry)
    }

    /// Insert `device` unless its name is already taken.
    ///
    /// Returns `false` when an earlier registration kept the name; the first
    /// registration always wins.
    pub fn register(&mut self, device: Device) -> bool {
        match self.devices.entry(device.name().to_string()) {
            Entry::Occupied(existing) => {
                tracing::debug!(
                    name = %device.name(),
                    kept = %existing.get().kind(),
                    ignored = %device.kind(),
                    "device name already registered"
                );
                false
            }
            Entry::Vacant(slot) => {
                slot.insert(Arc::new(device));
                true
            }
        }
    }

    /// Resolve `name` to its device.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::NotFound`] when no device has that name.
    pub fn lookup(&self, name: &str) -> Result<Arc<Device>, BridgeError> {
        self.devices.get(name).cloned().ok_or_else(|| {
            NotFoundError {
                entity: "Device",
                id: name.to_string(),
            }
            .into()
        })
    }

    /// Individual nodes, i.e. the devices that need state subscriptions.
    pub fn nodes(&self) -> impl Iterator<Item = &Arc<Device>> {
        self.devices.values().filter(|device| !device.is_group())
    }

    /// Every registered device, sorted by name.
    #[must_use]
    pub fn list(&self) -> Vec<Arc<Device>> {
        let mut devices: Vec<_> = self.devices.values().cloned().collect();
        devices.sort_by(|a, b| a.name().cmp(b.name()));
        devices
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.devices.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }
}
