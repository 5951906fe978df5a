//! Configuration system for mqttpub
//!
//! Settings are read from a TOML file with three sections: `[broker]`,
//! an optional `[tls]` and `[publish]`. Command line flags are applied on
//! top through [`ConfigOverrides`].

use rumqttc::QoS;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use url::Url;

/// Schemes that connect over plain TCP
pub const PLAIN_SCHEMES: &[&str] = &["mqtt", "tcp"];
/// Schemes that connect over TLS
pub const TLS_SCHEMES: &[&str] = &["mqtts", "ssl", "tls", "tcps"];

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct PublisherConfig {
    #[serde(default)]
    pub broker: BrokerSection,
    pub tls: Option<TlsSection>,
    #[serde(default)]
    pub publish: PublishSection,
}

/// Broker connection settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BrokerSection {
    /// Broker URL with scheme, host and optional port
    #[serde(default = "default_broker_url")]
    pub url: String,
    /// Fixed client id (a random `mqttpub-<uuid>` id is used when absent)
    pub client_id: Option<String>,
    #[serde(default = "default_keep_alive")]
    pub keep_alive_secs: u64,
    /// How long to wait for CONNACK
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    /// How long to wait for a publish to be delivered
    #[serde(default = "default_publish_timeout")]
    pub publish_timeout_secs: u64,
    #[serde(default = "default_clean_session")]
    pub clean_session: bool,
    /// Environment variable containing username
    pub username_env: Option<String>,
    /// Environment variable containing password
    pub password_env: Option<String>,
}

fn default_broker_url() -> String {
    "mqtt://localhost:1883".to_string()
}

fn default_keep_alive() -> u64 {
    30
}

fn default_connect_timeout() -> u64 {
    30
}

fn default_publish_timeout() -> u64 {
    10
}

fn default_clean_session() -> bool {
    true
}

impl Default for BrokerSection {
    fn default() -> Self {
        Self {
            url: default_broker_url(),
            client_id: None,
            keep_alive_secs: default_keep_alive(),
            connect_timeout_secs: default_connect_timeout(),
            publish_timeout_secs: default_publish_timeout(),
            clean_session: default_clean_session(),
            username_env: None,
            password_env: None,
        }
    }
}

impl BrokerSection {
    /// Broker settings with every field at its default except the URL
    pub fn with_url<S: Into<String>>(url: S) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Resolve username and password from the configured environment variables
    pub fn env_credentials(&self) -> Option<(String, String)> {
        let username = self
            .username_env
            .as_ref()
            .and_then(|name| std::env::var(name).ok())?;
        let password = self
            .password_env
            .as_ref()
            .and_then(|name| std::env::var(name).ok())
            .unwrap_or_default();
        Some((username, password))
    }
}

/// TLS settings. `client_cert` and `client_key` enable mutual authentication
/// and must be given together.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TlsSection {
    pub ca_cert: PathBuf,
    pub client_cert: Option<PathBuf>,
    pub client_key: Option<PathBuf>,
}

impl TlsSection {
    /// TLS section for mutual authentication
    pub fn mutual<P: Into<PathBuf>>(ca_cert: P, client_cert: P, client_key: P) -> Self {
        Self {
            ca_cert: ca_cert.into(),
            client_cert: Some(client_cert.into()),
            client_key: Some(client_key.into()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.client_cert.is_some() != self.client_key.is_some() {
            return Err(ConfigError::InvalidConfig(
                "[tls] client_cert and client_key must be set together".to_string(),
            ));
        }
        Ok(())
    }
}

/// Delivery defaults for published messages
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct PublishSection {
    /// QoS level 0, 1 or 2
    #[serde(default)]
    pub qos: u8,
    #[serde(default)]
    pub retain: bool,
}

impl PublishSection {
    pub fn qos(&self) -> Result<QoS, ConfigError> {
        qos_from_level(self.qos)
    }
}

/// Map a numeric QoS level onto the client library's enum
pub fn qos_from_level(level: u8) -> Result<QoS, ConfigError> {
    match level {
        0 => Ok(QoS::AtMostOnce),
        1 => Ok(QoS::AtLeastOnce),
        2 => Ok(QoS::ExactlyOnce),
        other => Err(ConfigError::InvalidQos(other)),
    }
}

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),
    #[error("Failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),
    #[error("Invalid broker URL: {0}")]
    InvalidBrokerUrl(String),
    #[error("Invalid QoS level {0}, expected 0, 1 or 2")]
    InvalidQos(u8),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Values supplied on the command line, applied over the file configuration
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub broker_url: Option<String>,
    pub ca_cert: Option<PathBuf>,
    pub client_cert: Option<PathBuf>,
    pub client_key: Option<PathBuf>,
    pub qos: Option<u8>,
    pub retain: Option<bool>,
}

impl PublisherConfig {
    /// Load configuration from a TOML file and validate it
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: PublisherConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply command line overrides. A CA path on the command line replaces
    /// the whole `[tls]` section.
    pub fn apply_overrides(&mut self, overrides: ConfigOverrides) -> Result<(), ConfigError> {
        if let Some(url) = overrides.broker_url {
            self.broker.url = url;
        }

        match (overrides.ca_cert, overrides.client_cert, overrides.client_key) {
            (None, None, None) => {}
            (Some(ca_cert), client_cert, client_key) => {
                self.tls = Some(TlsSection {
                    ca_cert,
                    client_cert,
                    client_key,
                });
            }
            (None, client_cert, client_key) => {
                let tls = self.tls.as_mut().ok_or_else(|| {
                    ConfigError::InvalidConfig(
                        "client certificate given without a CA certificate".to_string(),
                    )
                })?;
                if client_cert.is_some() {
                    tls.client_cert = client_cert;
                }
                if client_key.is_some() {
                    tls.client_key = client_key;
                }
            }
        }

        if let Some(qos) = overrides.qos {
            self.publish.qos = qos;
        }
        if let Some(retain) = overrides.retain {
            self.publish.retain = retain;
        }

        self.validate()
    }

    /// Validate field values and cross-field consistency
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_broker_url(&self.broker.url)?;

        if self.broker.keep_alive_secs == 0 {
            return Err(ConfigError::InvalidConfig(
                "keep_alive_secs must be at least 1".to_string(),
            ));
        }
        if self.broker.connect_timeout_secs == 0 {
            return Err(ConfigError::InvalidConfig(
                "connect_timeout_secs must be at least 1".to_string(),
            ));
        }
        if self.broker.publish_timeout_secs == 0 {
            return Err(ConfigError::InvalidConfig(
                "publish_timeout_secs must be at least 1".to_string(),
            ));
        }
        if let Some(client_id) = &self.broker.client_id {
            if client_id.is_empty() {
                return Err(ConfigError::InvalidConfig(
                    "client_id must not be empty".to_string(),
                ));
            }
        }

        if let Some(tls) = &self.tls {
            tls.validate()?;
        }

        self.publish.qos()?;
        Ok(())
    }
}

/// Check that a broker URL parses, names a host and uses a known scheme
pub fn validate_broker_url(broker_url: &str) -> Result<(), ConfigError> {
    let url =
        Url::parse(broker_url).map_err(|_| ConfigError::InvalidBrokerUrl(broker_url.to_string()))?;

    let scheme = url.scheme();
    if !PLAIN_SCHEMES.contains(&scheme) && !TLS_SCHEMES.contains(&scheme) {
        return Err(ConfigError::InvalidBrokerUrl(format!(
            "{broker_url} (unsupported scheme '{scheme}')"
        )));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(ConfigError::InvalidBrokerUrl(broker_url.to_string()));
    }

    Ok(())
}
