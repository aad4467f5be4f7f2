// Netgear Exporter - Prometheus exporter for NETGEAR cable modems
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! # Netgear Exporter
//!
//! Polls a NETGEAR cable modem's web interface and exposes its identity and
//! bonded channel levels as Prometheus gauges.
//!
//! ## Usage
//!
//! ```bash
//! # Default modem address, scrape every 60s, listen on :8000
//! MODEM_PASSWORD=secret netgear-exporter
//!
//! # Custom modem and interval
//! netgear-exporter --modem-ip 192.168.0.1 --scrape-interval 30
//! ```

mod config;
mod metrics;
mod poller;

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse},
    routing::get,
    Json, Router,
};
use clap::Parser;
use config::Args;
use metrics::ModemMetrics;
use poller::{ScrapeState, Scraper};
use serde::Serialize;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Application state shared across handlers.
struct AppState {
    metrics: Arc<ModemMetrics>,
    scrape_state: Arc<ScrapeState>,
    modem_host: String,
    start_time: std::time::Instant,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::from_default_env().add_directive(args.level().into()));

    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Netgear Exporter v{}", env!("CARGO_PKG_VERSION"));
    args.validate()?;

    let modem = args.modem_config();
    info!("Modem IP: {}", modem.host);
    info!("Scrape interval: {}s", args.scrape_interval);

    let metrics = Arc::new(ModemMetrics::new()?);
    let scraper = Scraper::new(modem.clone(), args.scrape_interval(), Arc::clone(&metrics));

    let state = Arc::new(AppState {
        metrics,
        scrape_state: scraper.state(),
        modem_host: modem.host,
        start_time: std::time::Instant::now(),
    });

    // Bind before scraping so a busy port fails fast
    let addr = args.listen_addr();
    let listener = TcpListener::bind(addr).await?;
    info!("Prometheus metrics server started on http://{}", addr);
    info!("Metrics endpoint: http://{}/metrics", addr);

    // Start scrape loop in background
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let scrape_task = tokio::spawn(async move {
        scraper.run(shutdown_rx).await;
    });

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("Failed to listen for shutdown signal: {}", e);
            }
            info!("Shutdown requested");
            let _ = shutdown_tx.send(true);
        })
        .await?;

    scrape_task.await?;
    Ok(())
}

fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/metrics", get(metrics_handler))
        .route("/health", get(health_handler))
        .route("/ready", get(ready_handler))
        .route("/status", get(status_handler))
        .with_state(state)
}

/// Root handler - shows a simple HTML page.
async fn root_handler() -> Html<&'static str> {
    Html(
        r#"<!DOCTYPE html>
<html>
<head>
    <title>Netgear Exporter</title>
    <style>
        body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; max-width: 800px; margin: 50px auto; padding: 20px; }
        h1 { color: #2c3e50; }
        a { color: #3498db; text-decoration: none; }
        a:hover { text-decoration: underline; }
        .endpoints { background: #f8f9fa; padding: 20px; border-radius: 8px; margin: 20px 0; }
        .endpoint { margin: 10px 0; }
        code { background: #e9ecef; padding: 2px 6px; border-radius: 4px; }
    </style>
</head>
<body>
    <h1>Netgear Exporter</h1>
    <p>Prometheus exporter for NETGEAR cable modem DOCSIS channel metrics.</p>

    <div class="endpoints">
        <h2>Endpoints</h2>
        <div class="endpoint"><a href="/metrics">/metrics</a> - Prometheus metrics</div>
        <div class="endpoint"><a href="/health">/health</a> - Health check</div>
        <div class="endpoint"><a href="/ready">/ready</a> - Readiness check</div>
        <div class="endpoint"><a href="/status">/status</a> - Status information (JSON)</div>
    </div>

    <h2>Metrics</h2>
    <ul>
        <li><code>netgear_modem_info</code> - Modem identity (always 1)</li>
        <li><code>netgear_downstream_frequency</code> - Downstream frequency (Hz)</li>
        <li><code>netgear_downstream_power</code> - Downstream power (dBmV)</li>
        <li><code>netgear_downstream_snr</code> - Downstream SNR (dB)</li>
        <li><code>netgear_upstream_frequency</code> - Upstream frequency (Hz)</li>
        <li><code>netgear_upstream_power</code> - Upstream power (dBmV)</li>
        <li><code>netgear_upstream_symbol_rate</code> - Upstream symbol rate</li>
    </ul>
</body>
</html>"#,
    )
}

/// Metrics handler - returns Prometheus text format.
async fn metrics_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.metrics.encode() {
        Ok(body) => (
            StatusCode::OK,
            [("Content-Type", "text/plain; version=0.0.4; charset=utf-8")],
            body,
        ),
        Err(e) => {
            error!("Failed to encode metrics: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                [("Content-Type", "text/plain; charset=utf-8")],
                e.to_string(),
            )
        }
    }
}

/// Health check handler.
async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// Readiness check handler - ready once a scrape has been published.
async fn ready_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    if state.scrape_state.has_succeeded() {
        (StatusCode::OK, "Ready")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "Waiting for first scrape")
    }
}

/// Status information response.
#[derive(Serialize)]
struct StatusResponse {
    version: String,
    uptime_secs: u64,
    modem: String,
    scrape: ScrapeStatus,
}

/// Scrape loop status information.
#[derive(Serialize)]
struct ScrapeStatus {
    running: bool,
    successes: u64,
    failures: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    last_success_unix: Option<u64>,
}

/// Status handler - returns JSON status information.
async fn status_handler(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let scrape = &state.scrape_state;
    let last_success = scrape.last_success_unix.load(Ordering::SeqCst);

    Json(StatusResponse {
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
        modem: state.modem_host.clone(),
        scrape: ScrapeStatus {
            running: scrape.running.load(Ordering::SeqCst),
            successes: scrape.successes.load(Ordering::SeqCst),
            failures: scrape.failures.load(Ordering::SeqCst),
            last_success_unix: (last_success > 0).then_some(last_success),
        },
    })
}
