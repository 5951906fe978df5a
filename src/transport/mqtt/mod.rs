//! MQTT client implementation on top of rumqttc
//!
//! Pure functions are kept apart from I/O so they can be tested without a
//! broker.
//!
//! # Architecture
//!
//! - [`connection`] - Pure connection state and option building
//! - [`tls`] - Certificate loading for TLS and mutual authentication
//! - [`message_handler`] - Pure routing of rumqttc events
//! - [`client`] - Impure I/O operations and coordination
//!
//! # Usage
//!
//! ```rust,no_run
//! use mqttpub::config::BrokerSection;
//! use mqttpub::transport::mqtt::MqttClient;
//! use rumqttc::QoS;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let mut client = MqttClient::new(BrokerSection::with_url("mqtt://localhost:1883"), None)?;
//! client.connect().await?;
//! client
//!     .publish("sensors/kitchen/temperature", b"21.5".to_vec(), QoS::AtMostOnce, false)
//!     .await?;
//! client.disconnect().await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod connection;
pub mod message_handler;
pub mod tls;

// Re-export public types for convenience
pub use client::MqttClient;
pub use connection::{
    configure_mqtt_options, parse_broker_url, redact_broker_url, BrokerAddress, ConnectionState,
    MqttError,
};
pub use message_handler::{DeliveryEvent, EventRoute, MessageHandler};
pub use tls::{TlsError, TlsMaterial};
