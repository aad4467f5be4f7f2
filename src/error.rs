//! Error types for netgear-docsis
//!
//! One enum per pipeline stage, composed into [`ScrapeError`] for a whole
//! scrape cycle.

use std::fmt;
use thiserror::Error;

/// Result type alias for a scrape cycle
pub type Result<T> = std::result::Result<T, ScrapeError>;

/// Which modem page a failure relates to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    /// `RouterStatus.htm`: identity fields and model name
    Status,
    /// `DocsisStatus.htm`: bonded channel tables
    Data,
}

impl Page {
    pub fn as_str(&self) -> &'static str {
        match self {
            Page::Status => "status",
            Page::Data => "data",
        }
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Main error type for a scrape cycle
#[derive(Error, Debug)]
pub enum ScrapeError {
    /// Network, timeout or HTTP failure
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// The tag-value list at `index` is missing from the page
    #[error("No data found on {page} page: tag-value list #{index} requested, {found} extracted")]
    ExtractionEmpty {
        page: Page,
        index: usize,
        found: usize,
    },

    /// A tag-value list could not be decoded
    #[error("Decoding error: {0}")]
    Decode(#[from] DecodeError),
}

/// Errors while talking to the modem
#[derive(Error, Debug)]
pub enum FetchError {
    /// HTTP client could not be constructed
    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// Connection failure, timeout or unreadable body
    #[error("Request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Modem answered with a non-success status
    #[error("Request to {url} returned HTTP {status}")]
    Status { url: String, status: u16 },
}

impl FetchError {
    /// URL of the failing request, if one was sent
    pub fn url(&self) -> Option<&str> {
        match self {
            FetchError::Client(_) => None,
            FetchError::Request { url, .. } | FetchError::Status { url, .. } => Some(url),
        }
    }

    /// Whether the request hit the configured timeout
    pub fn is_timeout(&self) -> bool {
        matches!(self, FetchError::Request { source, .. } if source.is_timeout())
    }
}

/// Errors while decoding a positional tag-value list
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DecodeError {
    /// Leading row count is not an unsigned integer
    #[error("Invalid channel count: {value:?}")]
    BadCount { value: String },

    /// Frequency is not "<int> Hz"
    #[error("Invalid frequency in group {group}: {value:?}")]
    BadFrequency { group: usize, value: String },

    /// Power is not a float
    #[error("Invalid power in group {group}: {value:?}")]
    BadPower { group: usize, value: String },

    /// SNR is not a float
    #[error("Invalid SNR in group {group}: {value:?}")]
    BadSnr { group: usize, value: String },

    /// Symbol rate is not an integer
    #[error("Invalid symbol rate in group {group}: {value:?}")]
    BadSymbolRate { group: usize, value: String },

    /// Identity record too short for a required field
    #[error("Identity field {field} missing at index {index}")]
    MissingIdentityField { field: &'static str, index: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ScrapeError::Decode(DecodeError::BadFrequency {
            group: 3,
            value: "abc Hz".to_string(),
        });
        let msg = err.to_string();
        assert!(msg.contains("group 3"));
        assert!(msg.contains("abc Hz"));
    }

    #[test]
    fn test_extraction_empty_display() {
        let err = ScrapeError::ExtractionEmpty {
            page: Page::Data,
            index: 2,
            found: 0,
        };
        assert_eq!(
            err.to_string(),
            "No data found on data page: tag-value list #2 requested, 0 extracted"
        );
    }

    #[test]
    fn test_decode_error_conversion() {
        let decode = DecodeError::BadCount {
            value: "x".to_string(),
        };
        let err: ScrapeError = decode.clone().into();
        assert!(matches!(err, ScrapeError::Decode(e) if e == decode));
    }
}
