//! # thinq-bridge-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Serve the **JSON REST API** Jeedom talks to (`/ping`, `/token/…`,
//!   `/ls`, `/mon/{id}`, `/cmd/…`, …)
//! - Check the `jeedom_token` header on protected routes
//! - Map HTTP requests into application service calls (driving adapter)
//! - Map application errors into HTTP status codes and JSON bodies
//!
//! ## Dependency rule
//! Depends on `thinq-bridge-app` (for port traits and services) and
//! `thinq-bridge-domain` (for domain types used in request/response mapping).
//! Never leaks axum types into the domain.

pub mod api;
pub mod error;
pub mod router;
pub mod state;

#[cfg(test)]
mod testing;
