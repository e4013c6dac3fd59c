// Utility functions for CLI commands

use anyhow::{Context, Result};
use soda_sdk::soda_core::validation::{parse_address, ValidationErrors};
use soda_sdk::{ActionOutcome, SdkConfig, SdkError, SequencerEvent, SodaClient};
use alloy_primitives::{Address, U256};
use tokio::sync::mpsc;

/// Load the config, apply overrides and build a JSON-RPC client
pub fn connect(config_path: &str, rpc_url: Option<&str>) -> Result<SodaClient> {
    let mut config = SdkConfig::load(config_path)
        .with_context(|| format!("Failed to load configuration from {config_path}"))?;
    if let Some(url) = rpc_url {
        config = config.with_rpc_url(url.to_string());
    }
    SodaClient::connect(config).context("Failed to create client")
}

/// Print sequencer progress while an action runs
pub fn with_progress(client: SodaClient) -> SodaClient {
    let (sender, mut events) = mpsc::unbounded_channel();
    tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            match event {
                SequencerEvent::Submitted { kind, hash } => info(&format!("{kind} submitted: {hash}")),
                SequencerEvent::Confirmed { kind, hash } => success(&format!("{kind} confirmed: {hash}")),
                SequencerEvent::Failed { kind, reason, .. } => warn(&format!("{kind} failed: {reason}")),
                SequencerEvent::Finished { .. } => {}
            }
        }
    });
    client.with_events(sender)
}

/// Parse an address argument
pub fn parse_addr(s: &str) -> Result<Address> {
    parse_address(s).map_err(|e| anyhow::anyhow!("Invalid address {s}: {e}"))
}

/// Parse a position id (decimal or 0x-hex)
pub fn parse_id(s: &str) -> Result<U256> {
    s.parse::<U256>().with_context(|| format!("Invalid position id {s}"))
}

/// Print field errors one per line and turn them into an error
pub fn report(error: SdkError) -> anyhow::Error {
    if let SdkError::Validation(errors) = &error {
        print_field_errors(errors);
    }
    anyhow::Error::new(error)
}

fn print_field_errors(errors: &ValidationErrors) {
    for error in errors.iter() {
        eprintln!("  {:<12} {}", error.field.as_str(), error.message);
    }
}

/// Print the final hash and explorer link of an action
pub fn print_outcome(client: &SodaClient, outcome: &ActionOutcome) {
    success(&format!("Transaction confirmed: {}", outcome.hash()));
    if let Some(link) = client.tx_link(outcome) {
        info(&link);
    }
}

/// Print success message with checkmark
pub fn success(msg: &str) {
    println!("[OK] {}", msg);
}

/// Print info message
pub fn info(msg: &str) {
    println!("[INFO] {}", msg);
}

/// Print warning message
pub fn warn(msg: &str) {
    eprintln!("[WARN] {}", msg);
}
