use crate::error::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Site record as returned by the listing API. No field is guaranteed.
pub type RawRecord = Value;

/// Normalized site written to the output document.
///
/// Field order here is the serialized order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteRecord {
    pub id: Value,
    pub title: Value,
    pub description: Option<Value>,
    pub lat: Value,
    pub lng: Value,
    pub url: String,
}

/// Outcome of fetching one page.
#[derive(Debug, Clone, PartialEq)]
pub enum Page {
    /// A non-empty batch of records
    Records(Vec<RawRecord>),
    /// The API returned an empty page; pagination is over
    Exhausted,
}

impl Page {
    pub fn from_records(records: Vec<RawRecord>) -> Self {
        if records.is_empty() {
            Page::Exhausted
        } else {
            Page::Records(records)
        }
    }
}

/// A paginated source of raw site records
#[async_trait::async_trait]
pub trait PageSource: Send + Sync {
    /// Identifier for logs and metrics
    fn source_name(&self) -> &'static str;

    /// Fetch one 1-based page
    async fn fetch_page(&self, page: u32) -> Result<Page>;
}
