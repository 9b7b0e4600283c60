//! # haspbridge-domain
//!
//! Pure domain model for bridging HASP touchscreen panels to a home hub.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions, timestamps
//! - **Topic naming**: every MQTT topic a panel uses is derived in [`topic`]
//! - **Devices**: individual nodes and command-only group aliases
//! - **Font-size policy** for text updates
//! - **Commands**: encoding color/text updates into outbound messages
//! - **Events**: button presses and node availability changes
//! - **Decoding** inbound state messages into events
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod time;

pub mod command;
pub mod config;
pub mod decode;
pub mod device;
pub mod event;
pub mod font;
pub mod topic;
