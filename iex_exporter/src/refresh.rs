//! Scheduled stock data refresh.
//!
//! `RefreshLoop` runs on a dedicated background thread for the lifetime of the process.
//! Each tick it consults the market-hours gate and, when the market is open, issues the
//! top-of-book and last-trade retrievals concurrently on scoped threads:
//!
//! - each retrieval publishes its own fields as soon as it succeeds, so a failure on one
//!   side never blocks or clears the other side's values;
//! - a failed retrieval is logged and left for the next tick to retry;
//! - the cycle waits for both retrievals, records its duration in the refresh histogram
//!   and then waits `interval - elapsed` (never negative) before the next tick.
//!
//! While the market is closed no data is fetched and the loop waits a full interval
//! before checking the gate again. Only one cycle is ever in flight.
//!
//! Shutdown: the loop selects on a `crossbeam_channel` receiver while waiting, and exits
//! when a message arrives or every sender has been dropped.
use crate::client::MarketDataClient;
use crate::clock::Clock;
use crate::metrics::MetricsState;
use crossbeam_channel::{Receiver, Sender, select, unbounded};
use iex_common::{ExporterError, MarketHours, Result, Symbol};
use log::{debug, error, info};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use strum_macros::Display;

/// The two independent retrievals performed per cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Retrieval {
    /// Best ask, best bid and volume (`tops` endpoint).
    #[strum(serialize = "TOPS")]
    TopOfBook,
    /// Most recent trade price (`tops/last` endpoint).
    #[strum(serialize = "Last")]
    LastTrade,
}

/// Outcome of a single tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cycle {
    /// Gate was closed; nothing was fetched.
    MarketClosed,
    /// Both retrievals finished (successfully or not).
    Refreshed {
        /// Wall time from the start of fetching to both retrievals completing.
        elapsed: Duration,
        /// Retrievals that failed this cycle.
        failed: Vec<Retrieval>,
    },
}

/// Periodic market-data refresh bound to one metrics state.
pub struct RefreshLoop {
    symbols: Vec<Symbol>,
    interval: Duration,
    hours: MarketHours,
    client: Arc<dyn MarketDataClient>,
    metrics: Arc<MetricsState>,
    clock: Arc<dyn Clock>,
}

/// Handle to a refresh loop running on its own thread.
pub struct RefreshHandle {
    shutdown_tx: Sender<()>,
    thread: thread::JoinHandle<()>,
}

impl RefreshHandle {
    /// Signal the loop to stop and wait for its thread to exit.
    ///
    /// A cycle already fetching is allowed to finish first.
    pub fn stop(self) -> Result<()> {
        // The loop may already be gone; joining below reports how it ended.
        let _ = self.shutdown_tx.send(());
        self.thread
            .join()
            .map_err(|_| ExporterError::ThreadPanic(String::from("refresh loop")))
    }
}

impl RefreshLoop {
    /// Bind a loop to its symbols, interval, gate, data source, metrics and clock.
    pub fn new(
        symbols: Vec<Symbol>,
        interval: Duration,
        hours: MarketHours,
        client: Arc<dyn MarketDataClient>,
        metrics: Arc<MetricsState>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            symbols,
            interval,
            hours,
            client,
            metrics,
            clock,
        }
    }

    /// Spawn the loop on a background thread.
    pub fn start(self) -> Result<RefreshHandle> {
        let (shutdown_tx, shutdown_rx) = unbounded::<()>();
        let thread = thread::Builder::new()
            .name(String::from("stock-refresh"))
            .spawn(move || self.run(shutdown_rx))?;
        Ok(RefreshHandle {
            shutdown_tx,
            thread,
        })
    }

    /// Run ticks until `shutdown` yields a message or disconnects.
    pub fn run(&self, shutdown: Receiver<()>) {
        info!("loading stock data for {}", Symbol::join(&self.symbols));
        loop {
            let cycle = self.run_cycle();
            let delay = self.next_delay(&cycle);
            debug!("{:?}; next refresh in {:?}", cycle, delay);

            select! {
                recv(shutdown) -> _ => break,
                default(delay) => {},
            }
        }
        info!("Stock refresh loop stopping...");
    }

    /// Perform exactly one tick: gate, fetch both sides concurrently, publish, time.
    pub fn run_cycle(&self) -> Cycle {
        let start = self.clock.now();
        if !self.hours.is_open(&start) {
            debug!("market closed at {}, skipping refresh", start);
            return Cycle::MarketClosed;
        }

        let (tops_ok, last_ok) = thread::scope(|scope| {
            let tops = scope.spawn(|| self.refresh_top_of_book());
            let last = scope.spawn(|| self.refresh_last_trade());
            (join_retrieval(tops), join_retrieval(last))
        });

        let elapsed = (self.clock.now() - start).to_std().unwrap_or_default();
        self.metrics.observe_refresh(elapsed);

        let mut failed = Vec::new();
        if !tops_ok {
            failed.push(Retrieval::TopOfBook);
        }
        if !last_ok {
            failed.push(Retrieval::LastTrade);
        }
        Cycle::Refreshed { elapsed, failed }
    }

    /// How long to wait after `cycle` before the next tick.
    pub fn next_delay(&self, cycle: &Cycle) -> Duration {
        match cycle {
            Cycle::MarketClosed => self.interval,
            Cycle::Refreshed { elapsed, .. } => remaining_interval(self.interval, *elapsed),
        }
    }

    fn refresh_top_of_book(&self) -> bool {
        match self.client.fetch_top_of_book(&self.symbols) {
            Ok(tops) => {
                self.metrics.publish_top_of_book(&tops);
                true
            }
            Err(e) => {
                self.log_failure(Retrieval::TopOfBook, &e);
                false
            }
        }
    }

    fn refresh_last_trade(&self) -> bool {
        match self.client.fetch_last_trade(&self.symbols) {
            Ok(trades) => {
                self.metrics.publish_last_trades(&trades);
                true
            }
            Err(e) => {
                self.log_failure(Retrieval::LastTrade, &e);
                false
            }
        }
    }

    fn log_failure(&self, retrieval: Retrieval, err: &ExporterError) {
        error!(
            "ERROR: in {} for {}: {}",
            retrieval,
            Symbol::join(&self.symbols),
            err
        );
    }
}

/// `interval - elapsed`, clamped at zero.
pub fn remaining_interval(interval: Duration, elapsed: Duration) -> Duration {
    interval.saturating_sub(elapsed)
}

fn join_retrieval(handle: thread::ScopedJoinHandle<'_, bool>) -> bool {
    handle.join().unwrap_or_else(|_| {
        error!("market data retrieval thread panicked");
        false
    })
}
