//! The runtime: configuration plus the mutable state threaded through
//! interpretation.

mod config;
mod core;

pub use config::{Flow, RuntimeConfig, STRICT_SECURITY_LEVEL};
pub use self::core::Runtime;
