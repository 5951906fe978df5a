//! mqttpub - MQTT publishing helpers
//!
//! Connect to an MQTT broker, optionally with TLS mutual authentication,
//! and publish messages, logging every outcome. The MQTT protocol itself,
//! including the event loop, is handled by [`rumqttc`].
//!
//! # Overview
//!
//! - [`publisher`] - the connect and publish helpers most callers need
//! - [`transport::mqtt`] - the client, TLS loading and event routing
//! - [`config`] - TOML configuration with command line overrides
//! - [`observability`] - structured logging setup
//! - [`cli`] - the publish and config commands run by the binary
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use mqttpub::publisher::{new_mqtt_client, publish_message};
//!
//! # async fn run() -> Result<(), mqttpub::transport::mqtt::MqttError> {
//! let client = new_mqtt_client("mqtt://localhost:1883").await?;
//! publish_message(&client, "sensors/kitchen/temperature", "21.5").await?;
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod observability;
pub mod publisher;
pub mod testing;
pub mod topics;
pub mod transport;

pub use config::{BrokerSection, ConfigError, PublishSection, PublisherConfig, TlsSection};
pub use error::{PublisherError, PublisherResult};
pub use publisher::{
    connect_from_config, new_mqtt_client, new_mqtt_client_with_tls, publish_message,
    publish_message_with,
};
pub use transport::mqtt::{ConnectionState, MqttClient, MqttError};
pub use transport::Transport;
