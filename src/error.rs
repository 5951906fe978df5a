//! Top-level error type for mqttpub
//!
//! Failures fall into two kinds. Fatal errors (bad configuration,
//! unreadable certificates, a broker that cannot be reached) mean no
//! client exists and the process should stop. Publish errors are reported
//! and the caller carries on.

use crate::config::ConfigError;
use crate::transport::mqtt::MqttError;
use thiserror::Error;

/// Exit status for fatal errors
pub const EXIT_FATAL: i32 = 1;
/// Exit status when at least one publish failed
pub const EXIT_PUBLISH_FAILED: i32 = 2;

/// Main error type for mqttpub operations
#[derive(Debug, Error)]
pub enum PublisherError {
    #[error("Configuration error: {0}")]
    ConfigError(#[from] ConfigError),

    #[error("Transport error: {0}")]
    TransportError(#[from] MqttError),
}

impl PublisherError {
    /// True when the error leaves no usable client behind
    pub fn is_fatal(&self) -> bool {
        match self {
            PublisherError::ConfigError(_) => true,
            PublisherError::TransportError(e) => e.is_fatal(),
        }
    }

    /// Process exit status matching the error kind
    pub fn exit_code(&self) -> i32 {
        if self.is_fatal() {
            EXIT_FATAL
        } else {
            EXIT_PUBLISH_FAILED
        }
    }
}

/// Result type for mqttpub operations
pub type PublisherResult<T> = Result<T, PublisherError>;
