// Netgear Exporter - Prometheus metrics definitions
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Prometheus metrics for NETGEAR modem monitoring.
//!
//! [`ModemMetrics`] owns its registry and every gauge the exporter exposes.
//! The scrape loop writes through [`ModemMetrics::publish`]; the HTTP handlers
//! read through [`ModemMetrics::encode`]. Both hold the same `Arc`.

use netgear_docsis::{ChannelRecord, DeviceIdentity, ModemScrape};
use prometheus::{Encoder, GaugeVec, Opts, Registry, TextEncoder};
use std::string::FromUtf8Error;

/// Label names of the identity gauge
const INFO_LABELS: [&str; 7] = [
    "vendor",
    "model",
    "hardware_version",
    "serial_number",
    "mac_address",
    "firmware_version",
    "cm_ipv4_address",
];

/// Label names of every per-channel gauge
const CHANNEL_LABELS: [&str; 2] = ["channel", "mac_address"];

/// Errors while registering or rendering metrics
#[derive(Debug, thiserror::Error)]
pub enum MetricsError {
    #[error("Prometheus error: {0}")]
    Prometheus(#[from] prometheus::Error),

    #[error("Exposition output is not UTF-8: {0}")]
    Utf8(#[from] FromUtf8Error),
}

/// Metrics state shared between the scrape loop and the HTTP server.
///
/// Gauges are keyed by their full label tuple. A changed identity field
/// therefore adds a new `netgear_modem_info` series and the previous one
/// keeps its last value until the process restarts. Channels that disappear
/// from the modem also keep their last values.
#[derive(Clone)]
pub struct ModemMetrics {
    registry: Registry,

    /// Always 1 for the active identity label set
    pub modem_info: GaugeVec,

    pub downstream_frequency: GaugeVec,
    pub downstream_power: GaugeVec,
    pub downstream_snr: GaugeVec,

    pub upstream_frequency: GaugeVec,
    pub upstream_power: GaugeVec,
    pub upstream_symbol_rate: GaugeVec,
}

impl ModemMetrics {
    /// Create all gauges and register them with a fresh registry
    pub fn new() -> Result<Self, MetricsError> {
        let registry = Registry::new();

        let modem_info = GaugeVec::new(
            Opts::new("netgear_modem_info", "Modem Information"),
            &INFO_LABELS,
        )?;
        let downstream_frequency = channel_gauge(
            "netgear_downstream_frequency",
            "Downstream Frequency",
        )?;
        let downstream_power = channel_gauge("netgear_downstream_power", "Downstream Power")?;
        let downstream_snr = channel_gauge("netgear_downstream_snr", "Downstream SNR")?;
        let upstream_frequency =
            channel_gauge("netgear_upstream_frequency", "Upstream Frequency")?;
        let upstream_power = channel_gauge("netgear_upstream_power", "Upstream Power")?;
        let upstream_symbol_rate = channel_gauge(
            "netgear_upstream_symbol_rate",
            "Upstream Symbol Rate",
        )?;

        for gauge in [
            &modem_info,
            &downstream_frequency,
            &downstream_power,
            &downstream_snr,
            &upstream_frequency,
            &upstream_power,
            &upstream_symbol_rate,
        ] {
            registry.register(Box::new(gauge.clone()))?;
        }

        Ok(Self {
            registry,
            modem_info,
            downstream_frequency,
            downstream_power,
            downstream_snr,
            upstream_frequency,
            upstream_power,
            upstream_symbol_rate,
        })
    }

    /// Publish one complete scrape (last write wins per label tuple)
    pub fn publish(&self, scrape: &ModemScrape) {
        self.publish_identity(&scrape.identity);
        for record in scrape.channels() {
            self.publish_channel(record, &scrape.identity.mac_address);
        }
    }

    /// Set the identity gauge for this label set to 1
    pub fn publish_identity(&self, identity: &DeviceIdentity) {
        self.modem_info
            .with_label_values(&[
                identity.vendor.as_str(),
                identity.model.as_str(),
                identity.hardware_version.as_str(),
                identity.serial_number.as_str(),
                identity.mac_address.as_str(),
                identity.firmware_version.as_str(),
                identity.ip_address.as_str(),
            ])
            .set(1.0);
    }

    /// Set the three gauges of one channel
    pub fn publish_channel(&self, record: ChannelRecord<'_>, mac_address: &str) {
        let labels = [record.channel_id(), mac_address];
        match record {
            ChannelRecord::Downstream(ch) => {
                self.downstream_frequency
                    .with_label_values(&labels)
                    .set(ch.frequency_hz as f64);
                self.downstream_power
                    .with_label_values(&labels)
                    .set(ch.power_dbmv);
                self.downstream_snr.with_label_values(&labels).set(ch.snr_db);
            }
            ChannelRecord::Upstream(ch) => {
                self.upstream_frequency
                    .with_label_values(&labels)
                    .set(ch.frequency_hz as f64);
                self.upstream_power
                    .with_label_values(&labels)
                    .set(ch.power_dbmv);
                self.upstream_symbol_rate
                    .with_label_values(&labels)
                    .set(ch.symbol_rate as f64);
            }
        }
    }

    /// Encode all metrics to Prometheus text format
    pub fn encode(&self) -> Result<String, MetricsError> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}

fn channel_gauge(name: &str, help: &str) -> Result<GaugeVec, prometheus::Error> {
    GaugeVec::new(Opts::new(name, help), &CHANNEL_LABELS)
}
