//! Testing utilities and mock implementations
//!
//! Lets the helpers be exercised without an MQTT broker.

pub mod fixtures;
pub mod logs;
pub mod mocks;

pub use logs::{capture_logs, CapturedLogs};
pub use mocks::*;
