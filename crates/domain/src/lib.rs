//! # thinq-bridge-domain
//!
//! Pure domain model for the Jeedom ↔ LG `SmartThinQ` bridge.
//!
//! ## Responsibilities
//! - Foundational types: error taxonomy, timestamps
//! - **Locale** validation for the regional LG gateway
//! - **Session state** persisted between restarts (`wideq_state.json`)
//! - **Devices** and **model info**, including monitor payload decoding
//! - **Commands** accepted by the dispatch table
//! - **Jeedom records** (eqLogics, commands) and duplicate suppression
//!
//! ## Dependency rule
//! This crate has **no internal dependencies** and performs no IO.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod time;

pub mod command;
pub mod device;
pub mod jeedom;
pub mod locale;
pub mod log_level;
pub mod model;
pub mod session;
