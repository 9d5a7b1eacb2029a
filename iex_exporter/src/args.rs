//! Command-line arguments for the IEX exporter.
//!
//! This module defines the CLI interface using `clap`. See `main` for end-to-end usage.
use clap::Parser;
use iex_common::net::{DEFAULT_ADDRESS, DEFAULT_API_URL};

/// Parsed command-line arguments.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// HTTP listen address for the metrics endpoint.
    #[arg(long, default_value = DEFAULT_ADDRESS)]
    pub address: String,

    /// Path to a YAML config file. The example config (AAPL, FB) is used when absent.
    #[arg(long = "config.file")]
    pub config_file: Option<String>,

    /// Interval to refresh stock data at, e.g. `30s`, `1m`, `1m30s`.
    #[arg(long, default_value = "1m")]
    pub interval: String,

    /// Base URL of the IEX API.
    #[arg(long = "api.url", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// IEX API token.
    #[arg(long = "api.token", env = "IEX_API_TOKEN", hide_env_values = true)]
    pub api_token: String,
}
