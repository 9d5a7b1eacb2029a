//! Market-data retrieval from the IEX API.
//!
//! The refresh loop only depends on the `MarketDataClient` trait; `IexClient` is the
//! production implementation over a blocking `reqwest` client. Each call either returns
//! the fully decoded response or an error, never a partial list.
use iex_common::net::API_TIMEOUT_SECS;
use iex_common::{ExporterError, LastTrade, Result, Symbol, TopOfBook};
use log::debug;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Source of top-of-book and last-trade data for a set of symbols.
pub trait MarketDataClient: Send + Sync {
    /// Best ask, best bid and volume for each symbol.
    fn fetch_top_of_book(&self, symbols: &[Symbol]) -> Result<Vec<TopOfBook>>;

    /// Most recent trade price for each symbol.
    fn fetch_last_trade(&self, symbols: &[Symbol]) -> Result<Vec<LastTrade>>;
}

/// Blocking IEX API client.
pub struct IexClient {
    http: reqwest::blocking::Client,
    base_url: String,
    token: String,
}

impl IexClient {
    /// Build a client for `base_url` (e.g. `https://cloud.iexapis.com/stable`).
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .user_agent(concat!("iex_exporter/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(API_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        })
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str, symbols: &[Symbol]) -> Result<T> {
        let url = format!("{}/{}", self.base_url, path);
        debug!("GET {} symbols={}", url, Symbol::join(symbols));

        let response = self
            .http
            .get(&url)
            .query(&[
                ("symbols", Symbol::join(symbols).as_str()),
                ("token", self.token.as_str()),
            ])
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(ExporterError::ApiStatus {
                status: status.as_u16(),
                url,
            });
        }
        let body = response.text()?;
        Ok(serde_json::from_str(&body)?)
    }
}

impl MarketDataClient for IexClient {
    fn fetch_top_of_book(&self, symbols: &[Symbol]) -> Result<Vec<TopOfBook>> {
        self.get_json("tops", symbols)
    }

    fn fetch_last_trade(&self, symbols: &[Symbol]) -> Result<Vec<LastTrade>> {
        self.get_json("tops/last", symbols)
    }
}
