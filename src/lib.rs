//! # netgear-docsis
//!
//! Scraping and decoding of the DOCSIS status pages served by NETGEAR cable
//! modems.
//!
//! ## Pipeline
//!
//! ```text
//! session ──► raw HTML ──► extract ──► tag-value lists ──► decode ──► ModemScrape
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use netgear_docsis::{decode_downstream, DecodeError};
//!
//! let raw = "|1|1|Locked|QAM256|1|579000000 Hz|5.1|40.4|0|0|";
//! let channels = decode_downstream(raw)?;
//! assert_eq!(channels[0].frequency_hz, 579_000_000);
//! # Ok::<(), DecodeError>(())
//! ```
//!
//! ## Modules
//!
//! - [`session`]: Authenticated cookie session against the web interface
//! - [`extract`]: Script-block walk and quoted-literal scanner
//! - [`decode`]: Pipe-delimited positional record decoder
//! - [`pipeline`]: Pages to [`ModemScrape`]
//! - [`model`]: Identity and channel records
//! - [`config`]: Connection settings and table positions

// Modules
pub mod config;
pub mod decode;
pub mod error;
pub mod extract;
pub mod model;
pub mod pipeline;
pub mod session;

// Re-exports for convenient access
pub use config::{ModemConfig, TableLayout, DATA_PAGE, STATUS_PAGE};
pub use decode::{decode_downstream, decode_identity, decode_table, decode_upstream, GroupRecord};
pub use error::{DecodeError, FetchError, Page, Result, ScrapeError};
pub use extract::{extract_tag_value_lists, meta_description, scan_assignments};
pub use model::{
    ChannelRecord, DeviceIdentity, DownstreamChannel, ModemScrape, UpstreamChannel, VENDOR,
};
pub use pipeline::{parse_pages, scrape};
pub use session::{authenticate_and_fetch, ModemPages, ModemSession};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
