//! Session client
//!
//! Authenticated access to the modem's web interface. Some firmware only
//! renders the status pages after a Basic-auth request against the root has
//! set a session cookie, so every cycle opens a fresh session, hits the root
//! once and then fetches the pages with the same cookie jar.

use crate::config::{ModemConfig, DATA_PAGE, STATUS_PAGE};
use crate::error::FetchError;
use reqwest::Client;
use tracing::debug;

/// Raw HTML of the two pages scraped each cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModemPages {
    /// `RouterStatus.htm`
    pub status: String,
    /// `DocsisStatus.htm`
    pub data: String,
}

/// One cookie-holding session against the modem
#[derive(Debug, Clone)]
pub struct ModemSession {
    http: Client,
    config: ModemConfig,
}

impl ModemSession {
    /// Open a session with an empty cookie jar
    pub fn open(config: &ModemConfig) -> Result<Self, FetchError> {
        let http = Client::builder()
            .cookie_store(true)
            .timeout(config.timeout)
            .build()
            .map_err(FetchError::Client)?;

        Ok(Self {
            http,
            config: config.clone(),
        })
    }

    /// Hit the root with credentials so the modem issues its session cookie.
    ///
    /// The response body and status are discarded.
    pub async fn authenticate(&self) -> Result<(), FetchError> {
        let response = self.get(&self.config.base_url()).await?;
        debug!("Login request returned HTTP {}", response.status().as_u16());
        Ok(())
    }

    /// Fetch `path` relative to the modem root and return its body
    pub async fn fetch_page(&self, path: &str) -> Result<String, FetchError> {
        let url = self.config.page_url(path);
        let response = self.get(&url).await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url,
                status: status.as_u16(),
            });
        }

        response
            .text()
            .await
            .map_err(|source| FetchError::Request { url, source })
    }

    async fn get(&self, url: &str) -> Result<reqwest::Response, FetchError> {
        self.http
            .get(url)
            .basic_auth(&self.config.username, Some(&self.config.password))
            .send()
            .await
            .map_err(|source| FetchError::Request {
                url: url.to_string(),
                source,
            })
    }
}

/// Open a session, authenticate, then fetch the status and data pages.
///
/// Requests are sequential; the first failure aborts the whole operation.
pub async fn authenticate_and_fetch(config: &ModemConfig) -> Result<ModemPages, FetchError> {
    let session = ModemSession::open(config)?;
    session.authenticate().await?;

    let status = session.fetch_page(STATUS_PAGE).await?;
    let data = session.fetch_page(DATA_PAGE).await?;

    Ok(ModemPages { status, data })
}
