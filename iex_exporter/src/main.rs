//! IEX stock exporter.
//!
//! This binary polls the IEX API for a configured set of ticker symbols and republishes
//! the latest ask, bid, price and volume as Prometheus metrics. It wires together three
//! building blocks:
//!
//! - `RefreshLoop` — a background thread that, once per interval and only during regular
//!   trading hours, fetches top-of-book and last-trade data concurrently and writes it into
//!   the shared `MetricsState`.
//! - `MetricsServer` — an `axum` router on its own `tokio` runtime thread that renders the
//!   `MetricsState` on every scrape of `/metrics`.
//! - `MetricsState` — the single, explicitly shared metric registry both sides use.
//!
//! Concurrency and shutdown:
//! - The refresh loop and the scrape server run on separate threads and never block on
//!   each other; metric cells are atomics.
//! - Ctrl+C is forwarded to a `crossbeam_channel`; the main thread then stops the refresh
//!   loop (letting an in-flight cycle finish) and exits.
//!
//! Configuration errors are fatal: the process logs them and exits with status 1 before
//! any thread is started.
#![warn(missing_docs)]
use crate::args::Args;
use crate::client::IexClient;
use crate::clock::SystemClock;
use crate::config::Settings;
use crate::metrics::MetricsState;
use crate::refresh::RefreshLoop;
use crate::server::MetricsServer;
use clap::Parser;
use crossbeam_channel::{bounded, select};
use iex_common::market_hours::TRADING_TIMEZONE;
use iex_common::{ExporterError, MarketHours, Result, Symbol};
use log::{error, info};
use std::process;
use std::sync::Arc;
use std::thread;

mod args;
mod client;
mod clock;
mod config;
mod metrics;
mod refresh;
mod server;

fn main() {
    init_logger();
    let args = Args::parse();
    if let Err(e) = run(args) {
        error!("{}", e);
        process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let settings = Settings::from_args(&args)?;
    info!(
        "Starting iex_exporter (Version: {})",
        env!("CARGO_PKG_VERSION")
    );
    info!(
        "Symbols: {}; refresh interval: {:?}",
        Symbol::join(&settings.symbols),
        settings.interval
    );

    let server = MetricsServer::bind(&settings.address)?;
    let metrics = Arc::new(MetricsState::new()?);
    let client = Arc::new(IexClient::new(&settings.api_url, &settings.api_token)?);
    let hours = MarketHours::new(TRADING_TIMEZONE);

    let refresh = RefreshLoop::new(
        settings.symbols,
        settings.interval,
        hours,
        client,
        Arc::clone(&metrics),
        Arc::new(SystemClock),
    )
    .start()?;

    let (shutdown_tx, shutdown_rx) = bounded::<()>(1);
    ctrlc::set_handler(move || {
        info!("Ctrl+C received. Shutting down exporter...");
        let _ = shutdown_tx.try_send(());
    })
    .map_err(|e| ExporterError::Format(format!("Error setting Ctrl+C handler: {e}")))?;

    let (server_done_tx, server_done_rx) = bounded::<()>(1);
    thread::Builder::new()
        .name(String::from("metrics-server"))
        .spawn(move || {
            if let Err(e) = server.serve(metrics) {
                error!("Metrics server failed: {}", e);
            }
            let _ = server_done_tx.send(());
        })?;

    select! {
        recv(shutdown_rx) -> _ => {},
        recv(server_done_rx) -> _ => error!("Metrics server stopped unexpectedly"),
    }

    refresh.stop()?;
    info!("iex_exporter stopped");
    Ok(())
}

fn init_logger() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
}
