//! Port definitions: traits that adapters implement.
//!
//! Ports are the boundaries between the application core and the outside world.
//! They are defined here (in `app`) so that both the use-case layer and the
//! adapter layer can depend on them without creating circular dependencies.

pub mod cloud;
pub mod jeedom;
pub mod log_control;
pub mod session_store;

pub use cloud::{CloudSession, ThinqCloud};
pub use jeedom::JeedomApi;
pub use log_control::LogControl;
pub use session_store::SessionStore;
