//! Exporter configuration.
//!
//! The YAML file only carries the symbol list:
//!
//! ```yaml
//! stocks:
//!   symbols:
//!     - AAPL
//!     - FB
//! ```
//!
//! Everything else comes from CLI flags. `Settings::from_args` merges both sources and
//! validates the result; any error returned from here is fatal at startup.
use crate::args::Args;
use iex_common::{ExporterError, Result, Symbol};
use log::info;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Symbols subscribed to when no config file is given.
pub const EXAMPLE_SYMBOLS: [&str; 2] = ["AAPL", "FB"];

/// Raw contents of the YAML config file.
#[derive(Debug, Deserialize)]
pub struct Config {
    pub stocks: Option<StocksConfig>,
}

/// `stocks` section of the config file.
#[derive(Debug, Deserialize)]
pub struct StocksConfig {
    #[serde(default)]
    pub symbols: Vec<String>,
}

impl Config {
    /// Read and decode a YAML config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|e| {
            ExporterError::Config(format!("problem reading {}: {}", path.display(), e))
        })?;
        Self::from_yaml(&raw)
    }

    /// Decode a config from YAML text.
    pub fn from_yaml(raw: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(raw)?)
    }

    /// Config used when `--config.file` is not set.
    pub fn example() -> Self {
        Self {
            stocks: Some(StocksConfig {
                symbols: EXAMPLE_SYMBOLS.iter().map(|s| s.to_string()).collect(),
            }),
        }
    }

    /// Validate and convert the configured symbols, keeping their order.
    pub fn symbols(&self) -> Result<Vec<Symbol>> {
        let stocks = self
            .stocks
            .as_ref()
            .ok_or_else(|| ExporterError::Config(String::from("missing `stocks` section")))?;
        if stocks.symbols.is_empty() {
            return Err(ExporterError::Config(String::from(
                "`stocks.symbols` must list at least one symbol",
            )));
        }
        stocks.symbols.iter().map(|s| s.parse()).collect()
    }
}

/// Validated runtime settings.
#[derive(Debug, Clone)]
pub struct Settings {
    pub address: String,
    pub symbols: Vec<Symbol>,
    pub interval: Duration,
    pub api_url: String,
    pub api_token: String,
}

impl Settings {
    /// Build settings from CLI arguments, loading the config file if one was given.
    pub fn from_args(args: &Args) -> Result<Self> {
        let config = match &args.config_file {
            Some(path) if !path.trim().is_empty() => Config::load(path.trim())?,
            _ => {
                info!("--config.file is empty so using example config");
                Config::example()
            }
        };

        let api_token = args.api_token.trim().to_string();
        if api_token.is_empty() {
            return Err(ExporterError::Config(String::from(
                "IEX_API_TOKEN is required",
            )));
        }

        Ok(Self {
            address: args.address.clone(),
            symbols: config.symbols()?,
            interval: parse_interval(&args.interval)?,
            api_url: args.api_url.trim_end_matches('/').to_string(),
            api_token,
        })
    }
}

/// Parse a positive duration such as `500ms`, `30s`, `1m` or `1h30m`.
pub fn parse_interval(raw: &str) -> Result<Duration> {
    let invalid = || ExporterError::Config(format!("invalid interval {raw:?}"));
    let mut rest = raw.trim();
    if rest.is_empty() {
        return Err(invalid());
    }

    let mut total = Duration::ZERO;
    while !rest.is_empty() {
        let digits = rest
            .find(|c: char| !c.is_ascii_digit())
            .ok_or_else(invalid)?;
        if digits == 0 {
            return Err(invalid());
        }
        let value: u64 = rest[..digits].parse().map_err(|_| invalid())?;
        rest = &rest[digits..];

        let unit_len = rest
            .find(|c: char| c.is_ascii_digit())
            .unwrap_or(rest.len());
        let part = match &rest[..unit_len] {
            "ms" => Duration::from_millis(value),
            "s" => Duration::from_secs(value),
            "m" => Duration::from_secs(value.saturating_mul(60)),
            "h" => Duration::from_secs(value.saturating_mul(3600)),
            _ => return Err(invalid()),
        };
        total = total.saturating_add(part);
        rest = &rest[unit_len..];
    }

    if total.is_zero() {
        return Err(ExporterError::Config(String::from(
            "interval must be greater than zero",
        )));
    }
    Ok(total)
}
