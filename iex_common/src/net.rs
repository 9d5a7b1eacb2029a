//! Shared networking constants used by the exporter.

/// Default listen address of the scrape endpoint.
pub const DEFAULT_ADDRESS: &str = "0.0.0.0:9099";
/// Path the metrics are served on.
pub const METRICS_PATH: &str = "/metrics";
/// Default base URL of the IEX API.
pub const DEFAULT_API_URL: &str = "https://cloud.iexapis.com/stable";
/// Per-request timeout for market-data calls, in seconds.
pub const API_TIMEOUT_SECS: u64 = 5;
