//! Data model
//!
//! Device identity and bonded channel records as decoded from one scrape.

/// Vendor label reported for every device
pub const VENDOR: &str = "NETGEAR";

/// Model label used when the status page carries no description meta tag
pub const UNKNOWN_MODEL: &str = "Unknown";

/// Identity of the scraped modem.
///
/// Rebuilt from scratch on every scrape cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceIdentity {
    pub vendor: String,
    pub model: String,
    pub hardware_version: String,
    pub serial_number: String,
    pub mac_address: String,
    pub firmware_version: String,
    pub ip_address: String,
}

/// One downstream bonded channel
#[derive(Debug, Clone, PartialEq)]
pub struct DownstreamChannel {
    /// Opaque channel identifier, used only as a label
    pub channel_id: String,
    pub frequency_hz: u64,
    pub power_dbmv: f64,
    pub snr_db: f64,
}

/// One upstream bonded channel
#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamChannel {
    /// Opaque channel identifier, used only as a label
    pub channel_id: String,
    pub frequency_hz: u64,
    pub power_dbmv: f64,
    pub symbol_rate: u64,
}

/// Direction-tagged view of a channel record
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ChannelRecord<'a> {
    Downstream(&'a DownstreamChannel),
    Upstream(&'a UpstreamChannel),
}

impl<'a> ChannelRecord<'a> {
    pub fn channel_id(&self) -> &'a str {
        match self {
            ChannelRecord::Downstream(ch) => &ch.channel_id,
            ChannelRecord::Upstream(ch) => &ch.channel_id,
        }
    }

    pub fn frequency_hz(&self) -> u64 {
        match self {
            ChannelRecord::Downstream(ch) => ch.frequency_hz,
            ChannelRecord::Upstream(ch) => ch.frequency_hz,
        }
    }

    pub fn power_dbmv(&self) -> f64 {
        match self {
            ChannelRecord::Downstream(ch) => ch.power_dbmv,
            ChannelRecord::Upstream(ch) => ch.power_dbmv,
        }
    }
}

/// Everything decoded from one successful scrape
#[derive(Debug, Clone, PartialEq)]
pub struct ModemScrape {
    pub identity: DeviceIdentity,
    pub downstream: Vec<DownstreamChannel>,
    pub upstream: Vec<UpstreamChannel>,
}

impl ModemScrape {
    /// Downstream records followed by upstream records
    pub fn channels(&self) -> impl Iterator<Item = ChannelRecord<'_>> {
        self.downstream
            .iter()
            .map(ChannelRecord::Downstream)
            .chain(self.upstream.iter().map(ChannelRecord::Upstream))
    }
}
