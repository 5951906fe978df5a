//! Command orchestration behind the `mqttpub` binary
//!
//! The binary only parses arguments and exits with the status these
//! functions return.

use crate::config::{ConfigOverrides, PublisherConfig};
use crate::error::{PublisherResult, EXIT_FATAL, EXIT_PUBLISH_FAILED};
use crate::publisher::{connect_from_config, publish_message_with};
use crate::transport::mqtt::redact_broker_url;
use std::path::Path;
use tracing::{debug, error, info, warn};

/// Searched in order when no `--config` is given
pub const DEFAULT_CONFIG_PATHS: &[&str] = &["mqttpub.toml", "config/mqttpub.toml"];

/// Load the configuration file (explicit or first default found) and layer
/// command line overrides on top. Without any file the defaults are used.
pub fn load_configuration(
    path: Option<&Path>,
    overrides: ConfigOverrides,
) -> PublisherResult<PublisherConfig> {
    load_configuration_from(path, DEFAULT_CONFIG_PATHS, overrides)
}

fn load_configuration_from(
    path: Option<&Path>,
    defaults: &[&str],
    overrides: ConfigOverrides,
) -> PublisherResult<PublisherConfig> {
    let found = path.or_else(|| {
        defaults
            .iter()
            .map(Path::new)
            .find(|candidate| candidate.exists())
    });

    let mut config = match found {
        Some(path) => {
            info!("Loading configuration from: {}", path.display());
            PublisherConfig::load_from_file(path)?
        }
        None => {
            debug!("No configuration file found, using defaults");
            PublisherConfig::default()
        }
    };

    config.apply_overrides(overrides)?;
    Ok(config)
}

/// Connect (fatal on failure), then publish each message in turn. A failed
/// publish is logged and the remaining messages are still sent.
///
/// Returns the process exit status: 0, [`EXIT_FATAL`] or
/// [`EXIT_PUBLISH_FAILED`].
pub async fn run_publish(config: &PublisherConfig, topic: &str, messages: &[String]) -> i32 {
    let qos = match config.publish.qos() {
        Ok(qos) => qos,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            return EXIT_FATAL;
        }
    };

    let mut client = match connect_from_config(config).await {
        Ok(client) => client,
        Err(e) => {
            // Already logged by the connect helper
            debug!("Fatal error, exiting: {}", e);
            return e.exit_code();
        }
    };

    let mut failures = 0usize;
    for message in messages {
        if publish_message_with(&client, topic, message, qos, config.publish.retain)
            .await
            .is_err()
        {
            failures += 1;
        }
    }

    if let Err(e) = client.disconnect().await {
        warn!("Error during disconnect: {}", e);
    }

    if failures > 0 {
        warn!("{} of {} messages failed to publish", failures, messages.len());
        EXIT_PUBLISH_FAILED
    } else {
        0
    }
}

/// Render the effective configuration as TOML with any URL password masked
pub fn render_config(config: &PublisherConfig) -> Result<String, toml::ser::Error> {
    let mut shown = config.clone();
    shown.broker.url = redact_broker_url(&config.broker.url);
    toml::to_string_pretty(&shown)
}

/// `mqttpub config`: the configuration already loaded and validated, so
/// only `--show` has anything left to do
pub fn handle_config_command(config: &PublisherConfig, show: bool) -> i32 {
    if show {
        match render_config(config) {
            Ok(rendered) => {
                println!("Current configuration:");
                println!("{rendered}");
            }
            Err(e) => {
                error!("Failed to render configuration: {}", e);
                return EXIT_FATAL;
            }
        }
    }

    info!("Configuration validation complete");
    0
}
