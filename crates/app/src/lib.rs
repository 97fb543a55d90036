//! # thinq-bridge-app
//!
//! Application layer: use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `ThinqCloud`: login, device listing, monitoring and commands
//!   - `SessionStore`: persist the session state as a JSON file
//!   - `JeedomApi`: the Jeedom JSON-RPC calls the bridge needs
//!   - `LogControl`: change the log verbosity at runtime
//! - Define **driving/inbound ports** as use-case structs:
//!   - `SessionService`: gateway, login, token checks, save/restore
//!   - `DeviceService`: list and find devices
//!   - `MonitorService`: the bounded polling loop
//!   - `CommandService`: AC control commands
//!   - `JeedomSync`: push monitored values into Jeedom commands
//!
//! ## Dependency rule
//! Depends on `thinq-bridge-domain` only (plus `tokio` for locks and timers).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod ports;
pub mod services;

#[cfg(test)]
mod testing;
