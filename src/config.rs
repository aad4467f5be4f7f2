//! Configuration types for the modem connection

use std::time::Duration;

/// Default modem address on the cable side of most NETGEAR modems
pub const DEFAULT_HOST: &str = "192.168.100.1";

/// Username accepted by the web interface
pub const DEFAULT_USERNAME: &str = "admin";

/// Factory default password
pub const DEFAULT_PASSWORD: &str = "admin";

/// Default per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Page carrying identity fields and the model meta tag
pub const STATUS_PAGE: &str = "RouterStatus.htm";

/// Page carrying the bonded channel tables
pub const DATA_PAGE: &str = "DocsisStatus.htm";

/// Connection settings for one modem
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModemConfig {
    /// Host or `host:port` of the web interface
    pub host: String,

    /// Basic-auth username
    pub username: String,

    /// Basic-auth password
    pub password: String,

    /// Timeout applied to each request
    pub timeout: Duration,
}

impl Default for ModemConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            username: DEFAULT_USERNAME.to_string(),
            password: DEFAULT_PASSWORD.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ModemConfig {
    /// Create a configuration for `host` with the given password
    pub fn new(host: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            password: password.into(),
            ..Default::default()
        }
    }

    /// Set the per-request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Root URL of the web interface, with trailing slash
    pub fn base_url(&self) -> String {
        format!("http://{}/", self.host)
    }

    /// Absolute URL of a page below the root
    pub fn page_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url(), path.trim_start_matches('/'))
    }
}

/// Positions of the tag-value lists this firmware emits.
///
/// The lists are addressed by position only. If a firmware update reorders
/// the script blocks, upstream data would be read as downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableLayout {
    /// Identity record among the status page lists
    pub identity_index: usize,
    /// Upstream bonded channels among the data page lists
    pub upstream_index: usize,
    /// Downstream bonded channels among the data page lists
    pub downstream_index: usize,
}

impl Default for TableLayout {
    fn default() -> Self {
        Self {
            identity_index: 0,
            upstream_index: 1,
            downstream_index: 2,
        }
    }
}
