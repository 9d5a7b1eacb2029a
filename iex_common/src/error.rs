//! Error types shared between the exporter binary and its helpers.
//!
//! The `ExporterError` enum unifies the failure cases of configuration loading,
//! market-data retrieval, metric registration and the scrape server, so every
//! fallible function in the workspace can propagate a single error type with `?`.
use std::io;

use thiserror::Error;

/// Unified error type shared by all crates of the exporter.
#[derive(Error, Debug)]
pub enum ExporterError {
    /// I/O error originating from the standard library, sockets or files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Generic formatting/validation error with a human-readable message.
    #[error("Format error: {0}")]
    Format(String),

    /// Invalid or incomplete configuration. Always fatal at startup.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Failure while decoding the YAML configuration file.
    #[error("YAML deserialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Failure while encoding/decoding JSON via serde_json.
    #[error("JSON serialization/deserialization error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    /// Transport-level failure talking to the market-data API.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The market-data API answered with a non-success status.
    #[error("API returned status {status} for {url}")]
    ApiStatus {
        /// HTTP status code of the response.
        status: u16,
        /// Request URL without the token.
        url: String,
    },

    /// Metric registration or exposition failure.
    #[error("Metrics error: {0}")]
    Metrics(#[from] prometheus::Error),

    /// A worker thread panicked before it could report a result.
    #[error("Thread panicked: {0}")]
    ThreadPanic(String),
}
