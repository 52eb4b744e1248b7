use crate::config::Config;
use crate::constants::{FONDO_AMBIENTE_API, NOT_NULL_FILTER};
use crate::error::{Result, ScraperError};
use crate::types::{Page, PageSource};
use serde_json::Value;
use tracing::{debug, instrument};

/// Page fetcher for the FAI "luoghi" listing API.
pub struct FondoAmbienteClient {
    client: reqwest::Client,
    base_url: String,
    page_size: u32,
}

impl FondoAmbienteClient {
    pub fn new(config: &Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            page_size: config.page_size,
        })
    }

    fn query(&self, page: u32) -> [(&'static str, String); 4] {
        [
            ("limit", self.page_size.to_string()),
            ("page", page.to_string()),
            ("coord_geo_lat", NOT_NULL_FILTER.to_string()),
            ("coord_geo_long", NOT_NULL_FILTER.to_string()),
        ]
    }
}

/// Pull the `data` array out of a response envelope.
pub fn parse_envelope(page: u32, body: &str) -> Result<Page> {
    let envelope: Value = serde_json::from_str(body)?;
    match envelope.get("data") {
        Some(Value::Array(records)) => Ok(Page::from_records(records.clone())),
        Some(other) => Err(ScraperError::MalformedResponse {
            page,
            reason: format!("`data` is not an array: {}", json_kind(other)),
        }),
        None => Err(ScraperError::MalformedResponse {
            page,
            reason: "missing `data` field".into(),
        }),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[async_trait::async_trait]
impl PageSource for FondoAmbienteClient {
    fn source_name(&self) -> &'static str {
        FONDO_AMBIENTE_API
    }

    #[instrument(skip(self))]
    async fn fetch_page(&self, page: u32) -> Result<Page> {
        debug!("Requesting page {} from {}", page, self.base_url);

        let response = self
            .client
            .get(&self.base_url)
            .query(&self.query(page))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScraperError::Status {
                page,
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        parse_envelope(page, &body)
    }
}
