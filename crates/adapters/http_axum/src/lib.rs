//! # haspbridge-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Expose the `update_colors` and `update_message` actions as JSON endpoints
//!   under `/api/services/`
//! - List the registered panels and groups (`/api/devices`)
//! - Stream button and availability events over SSE (`/api/events/stream`)
//! - Map application errors to HTTP status codes
//!
//! ## Dependency rule
//! Depends on `haspbridge-app` (for port traits and services) and
//! `haspbridge-domain` (for domain types used in request/response mapping).
//! Never leaks axum types into the domain.

pub mod api;
pub mod error;
pub mod router;
pub mod state;
