//! Connect-and-publish helpers
//!
//! These are the entry points most callers need: build a client (plain or
//! with TLS mutual authentication), wait for the broker to accept it, and
//! publish a message, logging the outcome of each step.
//!
//! ```rust,no_run
//! use mqttpub::publisher::{new_mqtt_client_with_tls, publish_message};
//!
//! # async fn run() -> Result<(), mqttpub::transport::mqtt::MqttError> {
//! let client = new_mqtt_client_with_tls(
//!     "mqtts://broker.example.com:8883",
//!     "certs/ca.pem",
//!     "certs/client.pem",
//!     "certs/client.key",
//! )
//! .await?;
//!
//! // Publish failures are logged and returned; the client stays usable
//! let _ = publish_message(&client, "sensors/kitchen/temperature", "21.5").await;
//! # Ok(())
//! # }
//! ```

use crate::config::{BrokerSection, PublisherConfig, TlsSection};
use crate::error::PublisherResult;
use crate::mqtt_span;
use crate::transport::mqtt::{redact_broker_url, MqttClient, MqttError};
use crate::transport::Transport;
use rumqttc::QoS;
use std::path::Path;
use tracing::{error, info, Instrument};

/// Connect to a broker over the transport implied by its URL
pub async fn new_mqtt_client(broker_url: &str) -> Result<MqttClient, MqttError> {
    connect_with(BrokerSection::with_url(broker_url), None).await
}

/// Connect to a broker with TLS, trusting only `ca_cert_file` and
/// authenticating with the client certificate and key
pub async fn new_mqtt_client_with_tls(
    broker_url: &str,
    ca_cert_file: impl AsRef<Path>,
    client_cert_file: impl AsRef<Path>,
    client_key_file: impl AsRef<Path>,
) -> Result<MqttClient, MqttError> {
    let tls = TlsSection::mutual(
        ca_cert_file.as_ref(),
        client_cert_file.as_ref(),
        client_key_file.as_ref(),
    );
    connect_with(BrokerSection::with_url(broker_url), Some(tls)).await
}

/// Connect using a loaded configuration
pub async fn connect_from_config(config: &PublisherConfig) -> PublisherResult<MqttClient> {
    config.validate().map_err(|e| {
        error!("Invalid configuration: {}", e);
        e
    })?;
    let client = connect_with(config.broker.clone(), config.tls.clone()).await?;
    Ok(client)
}

/// Build a client from broker and TLS settings and connect it
pub async fn connect_with(
    broker: BrokerSection,
    tls: Option<TlsSection>,
) -> Result<MqttClient, MqttError> {
    let span = mqtt_span!(broker = %redact_broker_url(&broker.url), tls = tls.is_some());

    async move {
        let mut client = MqttClient::new(broker, tls).map_err(log_setup_error)?;
        let broker_url = client.broker_url().to_string();
        connect_transport(&mut client, &broker_url).await?;
        Ok(client)
    }
    .instrument(span)
    .await
}

/// Connect any transport and log the outcome
pub async fn connect_transport<T: Transport>(
    transport: &mut T,
    broker_url: &str,
) -> Result<(), T::Error> {
    match transport.connect().await {
        Ok(()) => {
            info!("Connected to MQTT server {} successfully", broker_url);
            Ok(())
        }
        Err(e) => {
            error!("Error connecting to MQTT server: {}", e);
            Err(e)
        }
    }
}

fn log_setup_error(e: MqttError) -> MqttError {
    match &e {
        MqttError::Tls(tls) if tls.is_ca_error() => {
            error!("Error reading CA certificate file: {}", tls);
        }
        MqttError::Tls(tls) => {
            error!("Error loading client certificate/key: {}", tls);
        }
        other => {
            error!("Error connecting to MQTT server: {}", other);
        }
    }
    e
}

/// Publish a message at QoS 0 without retain and log the outcome
pub async fn publish_message<T: Transport>(
    client: &T,
    topic: &str,
    message: &str,
) -> Result<(), T::Error> {
    publish_message_with(client, topic, message, QoS::AtMostOnce, false).await
}

/// Publish a message with explicit delivery options and log the outcome
pub async fn publish_message_with<T: Transport>(
    client: &T,
    topic: &str,
    message: &str,
    qos: QoS,
    retain: bool,
) -> Result<(), T::Error> {
    let span = mqtt_span!(topic = %topic, qos = ?qos, retain);

    async move {
        match client
            .publish(topic, message.as_bytes().to_vec(), qos, retain)
            .await
        {
            Ok(()) => {
                info!("Published message to topic {}: {}", topic, message);
                Ok(())
            }
            Err(e) => {
                error!("Error publishing message to topic {}: {}", topic, e);
                Err(e)
            }
        }
    }
    .instrument(span)
    .await
}
