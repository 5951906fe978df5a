//! mqttpub - publish messages to an MQTT broker from the command line
//!
//! ## Usage
//!
//! ```bash
//! # Plain TCP
//! mqttpub publish --broker-url mqtt://localhost:1883 \
//!   --topic sensors/kitchen/temperature --message 21.5
//!
//! # TLS with mutual authentication, several messages, QoS 1
//! mqttpub publish --broker-url mqtts://broker.example.com:8883 \
//!   --ca-cert certs/ca.pem --client-cert certs/client.pem --client-key certs/client.key \
//!   --topic alerts --message "door open" --message "door closed" --qos 1
//!
//! # Check a configuration file
//! mqttpub --config mqttpub.toml config --show
//! ```

use clap::{Parser, Subcommand};
use mqttpub::cli::{handle_config_command, load_configuration, run_publish};
use mqttpub::config::{ConfigOverrides, PublisherConfig};
use mqttpub::error::EXIT_FATAL;
use mqttpub::observability::init_default_logging;
use std::path::{Path, PathBuf};
use std::process;
use tracing::{debug, error};

#[derive(Parser)]
#[command(name = "mqttpub")]
#[command(about = "Publish messages to an MQTT broker, optionally over mutual TLS")]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Verbose logging (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args, Debug)]
struct ConnectionArgs {
    /// MQTT broker URL, e.g. mqtt://localhost:1883 or mqtts://host:8883
    #[arg(long, env = "MQTT_BROKER_URL")]
    broker_url: Option<String>,

    /// CA certificate (PEM) used as the only trust root
    #[arg(long, value_name = "FILE")]
    ca_cert: Option<PathBuf>,

    /// Client certificate (PEM) for mutual authentication
    #[arg(long, value_name = "FILE", requires = "client_key")]
    client_cert: Option<PathBuf>,

    /// Client private key (PEM) for mutual authentication
    #[arg(long, value_name = "FILE", requires = "client_cert")]
    client_key: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Connect and publish one or more messages
    Publish {
        #[command(flatten)]
        connection: ConnectionArgs,

        /// Topic to publish to
        #[arg(short, long)]
        topic: String,

        /// Message payload (repeat to publish several messages in order)
        #[arg(short, long = "message", required = true)]
        messages: Vec<String>,

        /// QoS level 0, 1 or 2 (overrides the configuration file)
        #[arg(long, value_parser = clap::value_parser!(u8).range(0..=2))]
        qos: Option<u8>,

        /// Ask the broker to retain the message
        #[arg(long)]
        retain: bool,
    },
    /// Validate configuration
    Config {
        #[command(flatten)]
        connection: ConnectionArgs,

        /// Show the effective configuration
        #[arg(long)]
        show: bool,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_default_logging(cli.verbose);
    debug!("Starting mqttpub v{}", env!("CARGO_PKG_VERSION"));

    let status = match cli.command {
        Commands::Publish {
            connection,
            topic,
            messages,
            qos,
            retain,
        } => {
            let overrides = overrides_from(connection, qos, retain.then_some(true));
            let config = load_or_exit(cli.config.as_deref(), overrides);
            run_publish(&config, &topic, &messages).await
        }
        Commands::Config { connection, show } => {
            let config = load_or_exit(cli.config.as_deref(), overrides_from(connection, None, None));
            handle_config_command(&config, show)
        }
    };

    process::exit(status);
}

fn overrides_from(
    connection: ConnectionArgs,
    qos: Option<u8>,
    retain: Option<bool>,
) -> ConfigOverrides {
    ConfigOverrides {
        broker_url: connection.broker_url,
        ca_cert: connection.ca_cert,
        client_cert: connection.client_cert,
        client_key: connection.client_key,
        qos,
        retain,
    }
}

fn load_or_exit(path: Option<&Path>, overrides: ConfigOverrides) -> PublisherConfig {
    match load_configuration(path, overrides) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(EXIT_FATAL);
        }
    }
}
