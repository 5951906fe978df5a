//! Transport layer for publishing
//!
//! This module provides the transport abstraction and its MQTT
//! implementation.

use crate::transport::mqtt::ConnectionState;
use rumqttc::QoS;

pub mod mqtt;

/// Transport trait for publishing messages
///
/// This trait provides an abstraction over the MQTT client to enable
/// dependency injection and testing.
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Connect to the broker and wait for the connection to be confirmed
    async fn connect(&mut self) -> Result<(), Self::Error>;

    /// Disconnect from the broker
    async fn disconnect(&mut self) -> Result<(), Self::Error>;

    /// Publish a payload to a topic and wait for delivery at the given QoS
    async fn publish(
        &self,
        topic: &str,
        payload: Vec<u8>,
        qos: QoS,
        retain: bool,
    ) -> Result<(), Self::Error>;

    /// Check if transport is currently connected
    fn is_connected(&self) -> bool;

    /// Get current connection state
    fn connection_state(&self) -> Option<ConnectionState>;
}

/// Type alias for MQTT transport
pub type MqttTransport = mqtt::MqttClient;
