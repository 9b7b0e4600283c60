//! # haspbridge-app
//!
//! Application layer: use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement:
//!   - `MessageTransport`: publish and subscribe on the MQTT broker
//!   - `EventPublisher`: hand decoded events to whoever listens
//! - Own the **device registry**, built once from configuration
//! - Route inbound panel messages to the right decoder (`MessageDispatcher`)
//! - Serve the `update_colors` / `update_message` actions (`UpdateService`)
//! - Wire it all together at startup (`Bridge`)
//!
//! ## Dependency rule
//! Depends on `haspbridge-domain` only (plus `tokio::sync` for channels).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod event_bus;
pub mod ports;
pub mod registry;
pub mod services;
