//! Scrape endpoint for the exporter.
//!
//! `MetricsServer` wraps an `axum` router on a small dedicated `tokio` runtime, so it can
//! be driven from a plain thread like the rest of the exporter. Every connection is served
//! on its own task: a slow or stalled client never holds up another scrape.
//!
//! Routes:
//! - `GET /metrics` — current `MetricsState` in the Prometheus text format.
//! - `GET /` — landing page linking to `/metrics`.
//! - anything else — `404`, or `405` for a known path with the wrong method.
use crate::metrics::MetricsState;
use axum::Router;
use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use iex_common::{ExporterError, Result};
use iex_common::net::METRICS_PATH;
use log::{error, info};
use std::net::{SocketAddr, TcpListener};
use std::sync::Arc;

const SERVER_WORKERS: usize = 2;
const TEXT_FORMAT: &str = "text/plain; version=0.0.4; charset=utf-8";
const LANDING_PAGE: &str = "<html><head><title>IEX Exporter</title></head><body>\
<h1>IEX Exporter</h1><p><a href=\"/metrics\">Metrics</a></p></body></html>";

/// HTTP endpoint that renders the current metric state on every scrape.
pub struct MetricsServer {
    /// The bound listening socket, handed to the runtime in `serve`.
    pub(crate) socket: TcpListener,
}

impl MetricsServer {
    /// Bind the scrape endpoint to `bind_addr` (e.g., `0.0.0.0:9099`).
    pub fn bind(bind_addr: &str) -> Result<Self> {
        let socket = TcpListener::bind(bind_addr)?;
        socket.set_nonblocking(true)?;
        Ok(Self { socket })
    }

    /// Address the listener is bound to.
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.socket.local_addr()?)
    }

    /// Serve scrape requests until the process exits. Blocks the calling thread.
    pub fn serve(self, metrics: Arc<MetricsState>) -> Result<()> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(SERVER_WORKERS)
            .thread_name("metrics-http")
            .enable_all()
            .build()?;

        runtime.block_on(async move {
            let listener = tokio::net::TcpListener::from_std(self.socket)?;
            info!("listening on {}", listener.local_addr()?);
            axum::serve(listener, router(metrics)).await?;
            Ok::<(), ExporterError>(())
        })
    }
}

/// Routes of the scrape endpoint bound to `metrics`.
pub fn router(metrics: Arc<MetricsState>) -> Router {
    Router::new()
        .route("/", get(landing_page))
        .route(METRICS_PATH, get(scrape))
        .fallback(not_found)
        .with_state(metrics)
}

async fn scrape(State(metrics): State<Arc<MetricsState>>) -> Response {
    match metrics.render() {
        Ok(body) => ([(header::CONTENT_TYPE, TEXT_FORMAT)], body).into_response(),
        Err(e) => {
            error!("Failed to render metrics: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}

async fn landing_page() -> Html<&'static str> {
    Html(LANDING_PAGE)
}

async fn not_found() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "404 page not found\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::net::TcpStream;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::thread;
    use std::time::{Duration, Instant};

    fn spawn_server(metrics: Arc<MetricsState>) -> SocketAddr {
        let server = MetricsServer::bind("127.0.0.1:0").unwrap();
        let addr = server.local_addr().unwrap();
        thread::spawn(move || {
            let _ = server.serve(metrics);
        });
        addr
    }

    fn http() -> reqwest::blocking::Client {
        reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(3))
            .build()
            .unwrap()
    }

    #[test]
    fn metrics_path_serves_exposition_text() {
        let metrics = Arc::new(MetricsState::new().unwrap());
        metrics.set_ask(&"AAPL".parse().unwrap(), 157.74);
        let addr = spawn_server(Arc::clone(&metrics));

        let response = http().get(format!("http://{addr}/metrics")).send().unwrap();

        assert_eq!(response.status(), reqwest::StatusCode::OK);
        let content_type = response.headers()[reqwest::header::CONTENT_TYPE]
            .to_str()
            .unwrap()
            .to_string();
        assert!(content_type.starts_with("text/plain; version=0.0.4"));
        assert!(response.text().unwrap().contains("stock_asks{symbol=\"AAPL\"} 157.74"));
    }

    #[test]
    fn scrapes_see_updates_between_requests() {
        let metrics = Arc::new(MetricsState::new().unwrap());
        let addr = spawn_server(Arc::clone(&metrics));
        let symbol = "FB".parse().unwrap();
        let client = http();

        metrics.set_price(&symbol, 1.0);
        let first = client.get(format!("http://{addr}/metrics")).send().unwrap().text().unwrap();
        metrics.set_price(&symbol, 2.0);
        let second = client
            .get(format!("http://{addr}/metrics?x=1"))
            .send()
            .unwrap()
            .text()
            .unwrap();

        assert!(first.contains("stock_prices{symbol=\"FB\"} 1\n"));
        assert!(second.contains("stock_prices{symbol=\"FB\"} 2\n"));
    }

    #[test]
    fn landing_page_and_unknown_paths() {
        let addr = spawn_server(Arc::new(MetricsState::new().unwrap()));
        let client = http();

        let root = client.get(format!("http://{addr}/")).send().unwrap();
        assert_eq!(root.status(), reqwest::StatusCode::OK);
        assert!(root.text().unwrap().contains("href=\"/metrics\""));

        let missing = client.get(format!("http://{addr}/nope")).send().unwrap();
        assert_eq!(missing.status(), reqwest::StatusCode::NOT_FOUND);

        let post = client.post(format!("http://{addr}/metrics")).send().unwrap();
        assert_eq!(post.status(), reqwest::StatusCode::METHOD_NOT_ALLOWED);
    }

    #[test]
    fn broken_connection_does_not_stop_the_server() {
        let addr = spawn_server(Arc::new(MetricsState::new().unwrap()));

        drop(TcpStream::connect(addr).unwrap());
        let response = http().get(format!("http://{addr}/metrics")).send().unwrap();

        assert_eq!(response.status(), reqwest::StatusCode::OK);
    }

    #[test]
    fn trickling_client_does_not_delay_other_scrapes() {
        let addr = spawn_server(Arc::new(MetricsState::new().unwrap()));

        let mut slow = TcpStream::connect(addr).unwrap();
        slow.write_all(b"GET /metrics HTTP/1.1\r\nX-Slow: ").unwrap();
        let done = Arc::new(AtomicBool::new(false));
        let trickle = {
            let done = Arc::clone(&done);
            thread::spawn(move || {
                while !done.load(Ordering::SeqCst) {
                    if slow.write_all(b"a").is_err() {
                        break;
                    }
                    thread::sleep(Duration::from_millis(100));
                }
            })
        };
        thread::sleep(Duration::from_millis(200));

        let started = Instant::now();
        let response = http().get(format!("http://{addr}/metrics")).send();
        let waited = started.elapsed();
        done.store(true, Ordering::SeqCst);
        trickle.join().unwrap();

        assert_eq!(response.unwrap().status(), reqwest::StatusCode::OK);
        assert!(waited < Duration::from_secs(2), "scrape took {waited:?}");
    }
}
