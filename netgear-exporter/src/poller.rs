// Netgear Exporter - Scrape loop
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Periodic scrape loop.
//!
//! One cycle fetches both modem pages, decodes them and publishes the result.
//! Cycles never overlap: a slow cycle delays the next tick. A failed cycle is
//! logged and counted, publishes nothing and leaves the previous values in
//! place until the next tick.

use crate::metrics::ModemMetrics;
use netgear_docsis::{ModemConfig, ModemScrape, ScrapeError, TableLayout};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::sync::watch;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, error, info};

/// Counters of the scrape loop, read by the status handlers.
#[derive(Debug, Default)]
pub struct ScrapeState {
    /// Whether the loop is running
    pub running: AtomicBool,
    /// Cycles that published metrics
    pub successes: AtomicU64,
    /// Cycles that failed at any stage
    pub failures: AtomicU64,
    /// Unix time of the last successful cycle, 0 if none yet
    pub last_success_unix: AtomicU64,
}

impl ScrapeState {
    pub fn has_succeeded(&self) -> bool {
        self.successes.load(Ordering::SeqCst) > 0
    }

    fn record_success(&self) {
        self.successes.fetch_add(1, Ordering::SeqCst);
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default();
        self.last_success_unix.store(now, Ordering::SeqCst);
    }

    fn record_failure(&self) {
        self.failures.fetch_add(1, Ordering::SeqCst);
    }
}

/// Scrapes one modem into one [`ModemMetrics`]
pub struct Scraper {
    modem: ModemConfig,
    layout: TableLayout,
    interval: Duration,
    metrics: Arc<ModemMetrics>,
    state: Arc<ScrapeState>,
}

impl Scraper {
    pub fn new(modem: ModemConfig, interval: Duration, metrics: Arc<ModemMetrics>) -> Self {
        Self {
            modem,
            layout: TableLayout::default(),
            interval,
            metrics,
            state: Arc::new(ScrapeState::default()),
        }
    }

    /// Get the loop counters
    pub fn state(&self) -> Arc<ScrapeState> {
        Arc::clone(&self.state)
    }

    /// Run one fetch → decode → publish cycle.
    ///
    /// Metrics are only touched once every stage has succeeded.
    pub async fn scrape_once(&self) -> Result<ModemScrape, ScrapeError> {
        let scrape = netgear_docsis::scrape(&self.modem, &self.layout).await?;
        self.metrics.publish(&scrape);
        Ok(scrape)
    }

    /// Run cycles until `shutdown` turns true or its sender is dropped.
    ///
    /// The first cycle starts immediately.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        self.state.running.store(true, Ordering::SeqCst);
        info!(
            "Starting scrape loop: modem={}, interval={}s",
            self.modem.host,
            self.interval.as_secs()
        );

        let mut ticker = interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            if *shutdown.borrow() {
                break;
            }

            tokio::select! {
                _ = ticker.tick() => self.cycle().await,
                changed = shutdown.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }
        }

        self.state.running.store(false, Ordering::SeqCst);
        info!("Scrape loop stopped");
    }

    async fn cycle(&self) {
        match self.scrape_once().await {
            Ok(scrape) => {
                self.state.record_success();
                info!(
                    "Successfully scraped {}: {} downstream, {} upstream channels",
                    scrape.identity.model,
                    scrape.downstream.len(),
                    scrape.upstream.len()
                );
                debug!("Identity: {:?}", scrape.identity);
            }
            Err(e) => {
                self.state.record_failure();
                error!("Error scraping modem: {}", e);
            }
        }
    }
}
