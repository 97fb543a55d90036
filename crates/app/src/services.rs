//! Application services: use-case implementations.
//!
//! Each service struct accepts port trait implementations via generic parameters
//! (constructor injection), keeping this layer decoupled from concrete adapters.
//! All of them share one [`SessionService`](session_service::SessionService)
//! behind an `Arc`.

pub mod command_service;
pub mod device_service;
pub mod jeedom_sync;
pub mod monitor_service;
pub mod session_service;
