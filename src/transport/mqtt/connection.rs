//! Pure connection state management for MQTT client
//!
//! This module contains pure functions for connection state management
//! and for turning broker configuration into rumqttc options.

use super::tls::{TlsError, TlsMaterial};
use crate::config::{BrokerSection, TLS_SCHEMES};
use crate::topics::TopicError;
use rumqttc::{MqttOptions, Transport as RumqttcTransport};
use std::time::Duration;
use thiserror::Error;
use url::Url;

const DEFAULT_PORT: u16 = 1883;
const DEFAULT_TLS_PORT: u16 = 8883;

/// Connection state for MQTT client
#[derive(Debug, Clone, PartialEq)]
pub enum ConnectionState {
    /// Waiting for CONNACK
    Connecting,
    /// CONNACK received, publishes allowed
    Connected,
    /// Disconnected with reason
    Disconnected(String),
}

/// MQTT transport errors
#[derive(Debug, Error)]
pub enum MqttError {
    #[error("Invalid broker URL: {0}")]
    InvalidBrokerUrl(String),
    #[error("TLS setup failed: {0}")]
    Tls(#[from] TlsError),
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
    #[error("No CONNACK received within {0:?}")]
    ConnectTimeout(Duration),
    #[error("Event loop already started")]
    AlreadyStarted,
    #[error("Not connected - current state: {state:?}")]
    NotConnected { state: ConnectionState },
    #[error("Invalid topic: {0}")]
    InvalidTopic(#[from] TopicError),
    #[error("Publishing failed: {0}")]
    PublishFailed(#[source] rumqttc::ClientError),
    #[error("Publish to {topic} not acknowledged within {timeout:?}")]
    PublishTimeout { topic: String, timeout: Duration },
    #[error("Disconnect failed: {0}")]
    DisconnectFailed(#[source] rumqttc::ClientError),
}

impl MqttError {
    /// Fatal errors prevent a client from ever connecting. Publish-side
    /// errors leave the client usable.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            MqttError::InvalidBrokerUrl(_)
                | MqttError::Tls(_)
                | MqttError::ConnectionFailed(_)
                | MqttError::ConnectTimeout(_)
                | MqttError::AlreadyStarted
        )
    }
}

/// Host, port and TLS flag extracted from a broker URL
#[derive(Debug, Clone, PartialEq)]
pub struct BrokerAddress {
    pub host: String,
    pub port: u16,
    pub tls_scheme: bool,
    pub credentials: Option<(String, String)>,
}

/// Parse a broker URL. TLS material forces the TLS default port when the
/// URL carries none.
pub fn parse_broker_url(broker_url: &str, force_tls: bool) -> Result<BrokerAddress, MqttError> {
    crate::config::validate_broker_url(broker_url)
        .map_err(|_| MqttError::InvalidBrokerUrl(redact_broker_url(broker_url)))?;

    let url = Url::parse(broker_url)
        .map_err(|_| MqttError::InvalidBrokerUrl(redact_broker_url(broker_url)))?;
    let host = url
        .host_str()
        .ok_or_else(|| MqttError::InvalidBrokerUrl(redact_broker_url(broker_url)))?
        .trim_start_matches('[')
        .trim_end_matches(']')
        .to_string();

    let tls_scheme = TLS_SCHEMES.contains(&url.scheme());
    let port = url.port().unwrap_or(if tls_scheme || force_tls {
        DEFAULT_TLS_PORT
    } else {
        DEFAULT_PORT
    });

    let credentials = if url.username().is_empty() {
        None
    } else {
        let username = percent_decode(url.username());
        let password = url.password().map(percent_decode).unwrap_or_default();
        Some((username, password))
    };

    Ok(BrokerAddress {
        host,
        port,
        tls_scheme,
        credentials,
    })
}

fn percent_decode(value: &str) -> String {
    // form decoding treats '+' as space and '&' as a separator
    let escaped = value.replace('+', "%2B").replace('&', "%26");
    url::form_urlencoded::parse(format!("v={escaped}").as_bytes())
        .next()
        .map(|(_, decoded)| decoded.into_owned())
        .unwrap_or_else(|| value.to_string())
}

/// Pure function to configure MQTT options from config
pub fn configure_mqtt_options(
    config: &BrokerSection,
    tls: Option<&TlsMaterial>,
) -> Result<MqttOptions, MqttError> {
    let address = parse_broker_url(&config.url, tls.is_some())?;

    let client_id = config
        .client_id
        .clone()
        .unwrap_or_else(generate_client_id);
    let mut mqtt_options = MqttOptions::new(client_id, address.host.clone(), address.port);

    match tls {
        Some(material) => {
            mqtt_options.set_transport(material.to_transport());
        }
        None if address.tls_scheme => {
            mqtt_options.set_transport(RumqttcTransport::tls_with_default_config());
        }
        None => {}
    }

    // Environment credentials take precedence over URL user-info
    if let Some((username, password)) = config.env_credentials().or(address.credentials) {
        mqtt_options.set_credentials(username, password);
    }

    mqtt_options.set_keep_alive(Duration::from_secs(config.keep_alive_secs.max(1)));
    mqtt_options.set_clean_session(config.clean_session);

    Ok(mqtt_options)
}

/// Unique client id for connections without a configured one
pub fn generate_client_id() -> String {
    format!("mqttpub-{}", uuid::Uuid::new_v4().simple())
}

/// Replace the password in a broker URL so it can be logged
pub fn redact_broker_url(broker_url: &str) -> String {
    match Url::parse(broker_url) {
        Ok(mut url) if url.password().is_some() => {
            let _ = url.set_password(Some("***"));
            url.to_string()
        }
        _ => broker_url.to_string(),
    }
}
