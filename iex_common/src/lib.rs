//!
//! Common types and utilities shared by the IEX exporter.
//!
//! This crate aggregates:
//! - `error` — unified error type `ExporterError` used across the workspace.
//! - `result` — handy `Result<T, ExporterError>` alias.
//! - `symbols` — the `Symbol` type used as the subscription unit and metric label.
//! - `quote` — top-of-book and last-trade records decoded from the API.
//! - `market_hours` — the trading-hours gate.
//! - `net` — networking constants.
#![warn(missing_docs)]
pub mod error;
pub mod market_hours;
pub mod net;
pub mod quote;
pub mod result;
pub mod symbols;

pub use error::ExporterError;
pub use market_hours::MarketHours;
pub use quote::{LastTrade, TopOfBook};
pub use result::Result;
pub use symbols::Symbol;
