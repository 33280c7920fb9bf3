//! Run one relay invocation from a function event.
//!
//! Reads a `FunctionEvent` as JSON (from `--event` or stdin), dispatches it
//! against the configured origin and prints the `FunctionResponse` JSON on
//! stdout. Logs go to stderr.

use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use origin_relay::config::{self, validation::validate_config, ConfigError};
use origin_relay::host::{self, event::JsonEventAdapter};
use origin_relay::net::HttpUpstream;
use origin_relay::observability::logging;
use origin_relay::Dispatcher;

#[derive(Parser)]
#[command(name = "relay-invoke")]
#[command(about = "Relay a single function event to the configured origin", long_about = None)]
struct Cli {
    /// Event JSON file; stdin when omitted
    #[arg(short, long)]
    event: Option<PathBuf>,

    /// Origin base URL, overriding PROXY_PASS
    #[arg(short, long)]
    target: Option<String>,

    /// Pretty-print the response JSON
    #[arg(long)]
    pretty: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = config::from_env()?;
    if let Some(target) = cli.target {
        config.upstream.target_base = target;
        config.normalize();
        validate_config(&config).map_err(ConfigError::Validation)?;
    }
    logging::init(&config.observability);

    let raw = match &cli.event {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };
    let dispatcher = Dispatcher::new(Arc::new(config), HttpUpstream);
    let reply = host::invoke(&JsonEventAdapter, &dispatcher, raw).await;

    let output = if cli.pretty {
        serde_json::to_string_pretty(&reply)?
    } else {
        serde_json::to_string(&reply)?
    };
    println!("{output}");
    Ok(())
}
