//! # eventsub
//!
//! Connects to an eventsub websocket, logs the session id, and prints every
//! notification to stdout as one JSON line. Ctrl-C closes the connection.

#![deny(unsafe_code)]

use std::collections::BTreeSet;
use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use eventsub_client::{EventSubClient, RawEvent};
use eventsub_events::SubscriptionType;
use eventsub_settings::{ClientSettings, load_settings, load_settings_from_path};
use serde::Serialize;
use serde_json::value::RawValue;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// eventsub websocket client.
#[derive(Parser, Debug)]
#[command(name = "eventsub", about = "eventsub websocket client", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Connect and stream notifications as JSON lines.
    Listen(ListenArgs),
}

#[derive(Args, Debug)]
struct ListenArgs {
    /// Websocket address (overrides settings).
    #[arg(long)]
    address: Option<String>,

    /// Settings file (default `~/.eventsub/settings.json`).
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Log level filter, e.g. `info` or `eventsub_client=debug`.
    #[arg(long)]
    log_level: Option<String>,

    /// Emit logs as JSON lines on stderr.
    #[arg(long)]
    json_logs: bool,

    /// Only print these subscription types. Repeatable.
    #[arg(long = "kind", value_name = "SUBSCRIPTION_TYPE")]
    kinds: Vec<SubscriptionType>,
}

impl ListenArgs {
    fn apply(&self, settings: &mut ClientSettings) {
        if let Some(address) = &self.address {
            settings.address.clone_from(address);
        }
        if let Some(level) = &self.log_level {
            settings.logging.level.clone_from(level);
        }
        if self.json_logs {
            settings.logging.json = true;
        }
    }
}

/// One line of output.
#[derive(Serialize)]
struct EventLine<'a> {
    message_id: &'a str,
    timestamp: String,
    subscription_type: &'a str,
    subscription_version: &'a str,
    event: &'a RawValue,
}

fn render(raw: &RawEvent) -> Result<String> {
    let event: Box<RawValue> =
        RawValue::from_string(raw.raw.clone()).context("event is not valid JSON")?;
    let line = EventLine {
        message_id: &raw.metadata.message_id,
        timestamp: raw.metadata.message_timestamp.to_rfc3339(),
        subscription_type: &raw.subscription.subscription_type,
        subscription_version: &raw.subscription.version,
        event: &event,
    };
    serde_json::to_string(&line).context("failed to encode event line")
}

fn resolve_settings(args: &ListenArgs) -> Result<ClientSettings> {
    let mut settings = match &args.settings {
        Some(path) => load_settings_from_path(path)
            .with_context(|| format!("Failed to load settings from {}", path.display()))?,
        None => load_settings().context("Failed to load settings")?,
    };
    args.apply(&mut settings);
    settings.validate().context("Invalid settings")?;
    Ok(settings)
}

async fn listen(args: ListenArgs) -> Result<()> {
    let settings = resolve_settings(&args)?;
    if settings.logging.json {
        eventsub_core::logging::init_json_subscriber(&settings.logging.level);
    } else {
        eventsub_core::logging::init_subscriber(&settings.logging.level);
    }

    let kinds: BTreeSet<&'static str> = args.kinds.iter().map(|k| k.as_str()).collect();
    let client = EventSubClient::websocket(settings);
    client.on_error(|error| warn!(code = error.code(), %error, "eventsub error"));
    let _ = client
        .handlers()
        .on_welcome(|welcome| info!(session_id = welcome.session_id(), "session ready"))
        .on_revocation(|revocation| {
            warn!(
                subscription_type = %revocation.payload.subscription.subscription_type,
                reason = revocation.reason(),
                "subscription revoked"
            );
        })
        .on_raw_event(move |raw| {
            if !kinds.is_empty() && !kinds.contains(raw.subscription.subscription_type.as_str()) {
                return;
            }
            match render(&raw) {
                Ok(line) => {
                    let mut stdout = std::io::stdout().lock();
                    if let Err(error) = writeln!(stdout, "{line}") {
                        warn!(%error, "failed to write event line");
                    }
                }
                Err(error) => warn!(error = %error, "dropping event"),
            }
        });

    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    let _ = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Shutting down...");
            on_signal.cancel();
        }
    });

    info!(address = %client.address(), "connecting");
    client
        .connect(cancel)
        .await
        .context("eventsub connection ended")
}

#[tokio::main]
async fn main() -> Result<()> {
    match Cli::parse().command {
        Command::Listen(args) => listen(args).await,
    }
}
