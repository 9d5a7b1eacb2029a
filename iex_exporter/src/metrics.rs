//! Metric state published on the scrape endpoint.
//!
//! `MetricsState` owns its own `prometheus::Registry` instead of the process-wide
//! default one. It is built once in `main` and shared as `Arc<MetricsState>` between
//! the refresh loop (the only writer) and the scrape server (the only reader).
//!
//! Each gauge child is an atomic cell, so a scrape never waits for a refresh in
//! flight and always sees whole values. Nothing is ever reset: a symbol whose fetch
//! fails keeps its previous values until the next successful refresh.
use iex_common::{LastTrade, Result, Symbol, TopOfBook};
use prometheus::{GaugeVec, Histogram, HistogramOpts, Opts, Registry, TextEncoder};
use std::time::Duration;

/// Bucket bounds, in milliseconds, for the refresh duration histogram.
pub const REFRESH_BUCKETS_MS: [f64; 10] = [
    10.0, 25.0, 50.0, 100.0, 250.0, 500.0, 750.0, 1000.0, 2500.0, 5000.0,
];

const SYMBOL_LABEL: &str = "symbol";

/// Registry plus the gauges and histogram the exporter writes to.
pub struct MetricsState {
    registry: Registry,
    asks: GaugeVec,
    bids: GaugeVec,
    prices: GaugeVec,
    volumes: GaugeVec,
    refresh_duration: Histogram,
}

impl MetricsState {
    /// Create all metrics and register them with a fresh registry.
    pub fn new() -> Result<Self> {
        let registry = Registry::new();

        let asks = symbol_gauge("stock_asks", "Best ask price per symbol")?;
        let bids = symbol_gauge("stock_bids", "Best bid price per symbol")?;
        let prices = symbol_gauge("stock_prices", "Last traded price per symbol")?;
        let volumes = symbol_gauge("stock_volumes", "Traded volume per symbol")?;
        let refresh_duration = Histogram::with_opts(
            HistogramOpts::new(
                "stock_data_refresh_duration_milliseconds",
                "Time taken to refresh stock data from IEX, in milliseconds",
            )
            .buckets(REFRESH_BUCKETS_MS.to_vec()),
        )?;

        registry.register(Box::new(asks.clone()))?;
        registry.register(Box::new(bids.clone()))?;
        registry.register(Box::new(prices.clone()))?;
        registry.register(Box::new(volumes.clone()))?;
        registry.register(Box::new(refresh_duration.clone()))?;

        Ok(Self {
            registry,
            asks,
            bids,
            prices,
            volumes,
            refresh_duration,
        })
    }

    /// Overwrite the best ask for `symbol`.
    pub fn set_ask(&self, symbol: &Symbol, value: f64) {
        self.asks.with_label_values(&[symbol.as_str()]).set(value);
    }

    /// Overwrite the best bid for `symbol`.
    pub fn set_bid(&self, symbol: &Symbol, value: f64) {
        self.bids.with_label_values(&[symbol.as_str()]).set(value);
    }

    /// Overwrite the last traded price for `symbol`.
    pub fn set_price(&self, symbol: &Symbol, value: f64) {
        self.prices.with_label_values(&[symbol.as_str()]).set(value);
    }

    /// Overwrite the traded volume for `symbol`.
    pub fn set_volume(&self, symbol: &Symbol, value: u64) {
        self.volumes
            .with_label_values(&[symbol.as_str()])
            .set(value as f64);
    }

    /// Record how long one refresh cycle took.
    pub fn observe_refresh(&self, elapsed: Duration) {
        self.refresh_duration
            .observe(elapsed.as_secs_f64() * 1000.0);
    }

    /// Number of refresh cycles recorded so far.
    pub fn refresh_count(&self) -> u64 {
        self.refresh_duration.get_sample_count()
    }

    /// Overwrite ask, bid and volume for every record in a top-of-book result.
    pub fn publish_top_of_book(&self, tops: &[TopOfBook]) {
        for top in tops {
            self.set_ask(&top.symbol, top.ask_price);
            self.set_bid(&top.symbol, top.bid_price);
            self.set_volume(&top.symbol, top.volume);
        }
    }

    /// Overwrite the price for every record in a last-trade result.
    pub fn publish_last_trades(&self, trades: &[LastTrade]) {
        for trade in trades {
            self.set_price(&trade.symbol, trade.price);
        }
    }

    /// Render all metrics in the Prometheus text exposition format.
    pub fn render(&self) -> Result<String> {
        let encoder = TextEncoder::new();
        Ok(encoder.encode_to_string(&self.registry.gather())?)
    }
}

fn symbol_gauge(name: &str, help: &str) -> Result<GaugeVec> {
    Ok(GaugeVec::new(Opts::new(name, help), &[SYMBOL_LABEL])?)
}

/// Read one labelled sample back out of rendered exposition text.
#[cfg(test)]
pub(crate) fn sample(text: &str, metric: &str, symbol: &str) -> Option<f64> {
    let prefix = format!("{metric}{{symbol=\"{symbol}\"}} ");
    text.lines()
        .find_map(|line| line.strip_prefix(&prefix))
        .and_then(|value| value.trim().parse().ok())
}
