//! Configuration and CLI argument handling

use std::path::PathBuf;

use clap::Parser;

/// CLI argument parsing structure
#[derive(Debug, Parser)]
#[command(name = "auto-redeem")]
#[command(about = "Redeems a channel reward whenever its cooldown expires")]
#[command(version)]
pub struct Config {
    /// Port to bind the status server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Base URL of the page bridge running next to the browser tab
    #[arg(short, long, default_value = "http://127.0.0.1:9230", conflicts_with = "simulate")]
    pub bridge_url: String,

    /// Drive an in-memory page instead of the bridge
    #[arg(long)]
    pub simulate: bool,

    /// Image label of the reward to redeem
    #[arg(short, long, default_value = "RAFFLE")]
    pub reward: String,

    /// File holding the run flag and next-check timestamp
    #[arg(long, default_value = "auto-redeem-state.json")]
    pub state_file: PathBuf,

    /// Start the loop on boot if it was running when the server last stopped
    #[arg(long)]
    pub resume: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else {
            "info"
        }
    }
}
