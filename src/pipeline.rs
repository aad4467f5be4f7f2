//! Page-level pipeline
//!
//! Turns the two fetched pages into a [`ModemScrape`]. Either every stage
//! succeeds or nothing is returned, so a caller never publishes half a cycle.

use crate::config::{ModemConfig, TableLayout};
use crate::decode::{decode_downstream, decode_identity, decode_upstream};
use crate::error::{Page, Result, ScrapeError};
use crate::extract::{
    extract_from_document, meta_description, DATA_SCRIPT_MARKER, STATUS_SCRIPT_MARKER,
    TAG_VALUE_LIST,
};
use crate::model::{ModemScrape, UNKNOWN_MODEL};
use crate::session::{authenticate_and_fetch, ModemPages};
use scraper::Html;
use tracing::warn;

/// Extract and decode both pages
pub fn parse_pages(pages: &ModemPages, layout: &TableLayout) -> Result<ModemScrape> {
    let status = Html::parse_document(&pages.status);
    let status_lists = extract_from_document(&status, STATUS_SCRIPT_MARKER, TAG_VALUE_LIST);
    let model = meta_description(&status).unwrap_or_else(|| {
        warn!("CM model name not found");
        UNKNOWN_MODEL.to_string()
    });

    let data = Html::parse_document(&pages.data);
    let data_lists = extract_from_document(&data, DATA_SCRIPT_MARKER, TAG_VALUE_LIST);

    let identity_raw = list_at(&status_lists, Page::Status, layout.identity_index)?;
    let downstream_raw = list_at(&data_lists, Page::Data, layout.downstream_index)?;
    let upstream_raw = list_at(&data_lists, Page::Data, layout.upstream_index)?;

    Ok(ModemScrape {
        identity: decode_identity(identity_raw, &model)?,
        downstream: decode_downstream(downstream_raw)?,
        upstream: decode_upstream(upstream_raw)?,
    })
}

/// Fetch both pages and decode them
pub async fn scrape(config: &ModemConfig, layout: &TableLayout) -> Result<ModemScrape> {
    let pages = authenticate_and_fetch(config).await?;
    parse_pages(&pages, layout)
}

fn list_at(lists: &[String], page: Page, index: usize) -> Result<&str> {
    lists
        .get(index)
        .map(String::as_str)
        .ok_or(ScrapeError::ExtractionEmpty {
            page,
            index,
            found: lists.len(),
        })
}
