// Netgear Exporter - Command line and environment configuration
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Exporter configuration.
//!
//! Every flag has an environment variable so the exporter can run unchanged
//! in a container.

use clap::Parser;
use netgear_docsis::config::{DEFAULT_HOST, DEFAULT_PASSWORD, DEFAULT_USERNAME};
use netgear_docsis::ModemConfig;
use std::net::SocketAddr;
use std::time::Duration;
use tracing::Level;

/// NETGEAR cable modem Prometheus exporter
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Modem address (host or host:port)
    #[arg(long, env = "MODEM_IP", default_value = DEFAULT_HOST)]
    pub modem_ip: String,

    /// Password of the modem's web interface
    #[arg(long, env = "MODEM_PASSWORD", default_value = DEFAULT_PASSWORD, hide_env_values = true)]
    pub password: String,

    /// Seconds between two scrapes
    #[arg(short = 'i', long, env = "SCRAPE_INTERVAL", default_value = "60")]
    pub scrape_interval: u64,

    /// Port to listen on
    #[arg(short, long, env = "EXPORTER_PORT", default_value = "8000")]
    pub port: u16,

    /// Timeout of each request to the modem, in seconds
    #[arg(long, env = "MODEM_TIMEOUT", default_value = "10")]
    pub timeout: u64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

/// Invalid settings detected at startup
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Scrape interval must be at least one second")]
    ZeroInterval,

    #[error("Request timeout must be at least one second")]
    ZeroTimeout,
}

impl Args {
    /// Reject settings the scrape loop cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.scrape_interval == 0 {
            return Err(ConfigError::ZeroInterval);
        }
        if self.timeout == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(())
    }

    /// Connection settings for the modem
    pub fn modem_config(&self) -> ModemConfig {
        ModemConfig {
            host: self.modem_ip.clone(),
            username: DEFAULT_USERNAME.to_string(),
            password: self.password.clone(),
            timeout: Duration::from_secs(self.timeout),
        }
    }

    pub fn scrape_interval(&self) -> Duration {
        Duration::from_secs(self.scrape_interval)
    }

    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.port))
    }

    /// Tracing level, `INFO` when unrecognised
    pub fn level(&self) -> Level {
        match self.log_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("netgear-exporter").chain(args.iter().copied()))
            .unwrap()
    }

    #[test]
    fn test_explicit_flags() {
        let args = parse(&[
            "--modem-ip",
            "10.0.0.1",
            "--password",
            "hunter2",
            "-i",
            "15",
            "--port",
            "9100",
            "--timeout",
            "3",
        ]);

        let modem = args.modem_config();
        assert_eq!(modem.host, "10.0.0.1");
        assert_eq!(modem.username, "admin");
        assert_eq!(modem.password, "hunter2");
        assert_eq!(modem.timeout, Duration::from_secs(3));
        assert_eq!(args.scrape_interval(), Duration::from_secs(15));
        assert_eq!(args.listen_addr().port(), 9100);
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_zero_interval_rejected() {
        let args = parse(&["--scrape-interval", "0"]);
        assert_eq!(args.validate(), Err(ConfigError::ZeroInterval));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let args = parse(&["--scrape-interval", "5", "--timeout", "0"]);
        assert_eq!(args.validate(), Err(ConfigError::ZeroTimeout));
    }

    #[test]
    fn test_log_level() {
        assert_eq!(parse(&["--log-level", "DEBUG"]).level(), Level::DEBUG);
        assert_eq!(parse(&["--log-level", "verbose"]).level(), Level::INFO);
    }
}
