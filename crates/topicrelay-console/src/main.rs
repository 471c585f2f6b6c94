//! Topicrelay console binary.
//!
//! # Usage
//!
//! ```bash
//! # Operator 1001, fixed destination -100123
//! topicrelay --operator 1001 --destination -100123
//!
//! # Same, read from the environment
//! AUTHORIZED_USER_ID=1001 MAIN_GROUP_ID=-100123 topicrelay
//! ```
//!
//! Each input line is `[@actor] message`; see the library docs for media
//! syntax. Replies go to stdout, logs to stderr.

use std::time::Duration;

use clap::Parser;
use tokio::io::BufReader;
use topicrelay_app::{Relay, RelayConfig};
use topicrelay_console::loopback::{LoopbackAdmin, LoopbackDelivery};
use topicrelay_core::{ActorId, DestinationId, EngineConfig, SessionEngine, TopicCase};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Topic relay console
#[derive(Parser, Debug)]
#[command(name = "topicrelay")]
#[command(about = "Relay batches of operator content into channel topics (console loopback)")]
#[command(version)]
struct Args {
    /// User id of the only operator allowed to drive sessions
    #[arg(long, env = "AUTHORIZED_USER_ID", allow_negative_numbers = true)]
    operator: i64,

    /// Fixed destination used by a bare /upload
    #[arg(long, env = "MAIN_GROUP_ID", allow_negative_numbers = true)]
    destination: Option<i64>,

    /// Additional destination the operator may pick (repeatable)
    #[arg(long = "allow-destination", allow_negative_numbers = true)]
    allow_destinations: Vec<i64>,

    /// Keep topic names as typed instead of upper-casing them
    #[arg(long)]
    preserve_topic_case: bool,

    /// Per-item delivery timeout in seconds
    #[arg(long)]
    delivery_timeout_secs: Option<u64>,

    /// Topic creation timeout in seconds
    #[arg(long)]
    topic_timeout_secs: Option<u64>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Args {
    fn engine_config(&self) -> EngineConfig {
        let mut config = EngineConfig::new(ActorId(self.operator));
        if let Some(destination) = self.destination {
            config = config.with_default_destination(DestinationId(destination));
        }
        for destination in &self.allow_destinations {
            config = config.allow_destination(DestinationId(*destination));
        }
        if self.preserve_topic_case {
            config = config.with_topic_case(TopicCase::Preserve);
        }
        config
    }

    fn relay_config(&self) -> RelayConfig {
        RelayConfig {
            delivery_timeout: self.delivery_timeout_secs.map(Duration::from_secs),
            topic_timeout: self.topic_timeout_secs.map(Duration::from_secs),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let config = args.engine_config();
    tracing::info!(
        operator = %config.operator,
        destination = ?config.default_destination,
        allowed = config.allowed_destinations.len(),
        "topicrelay console starting"
    );

    let engine = SessionEngine::new(config);
    let relay = Relay::new(engine, LoopbackAdmin::new(), LoopbackDelivery, args.relay_config());

    topicrelay_console::run(
        &relay,
        ActorId(args.operator),
        BufReader::new(tokio::io::stdin()),
        tokio::io::stdout(),
    )
    .await?;

    tracing::info!("input closed, shutting down");
    Ok(())
}
