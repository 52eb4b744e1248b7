use crate::error::{Result, ScraperError};
use crate::types::{RawRecord, SiteRecord};
use serde_json::Value;

const SLUG: &str = "slug";
const LAT: &str = "coord_geo_lat";
const LNG: &str = "coord_geo_long";
const ID: &str = "id";
const NAME: &str = "nome";
const DESCRIPTION_FIELDS: [&str; 2] = ["metadescription", "descrizione_short"];

/// Truthiness of an optional JSON value. Absent, null, false, zero, and empty
/// strings, arrays, and objects are all falsy.
pub fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().map_or(true, |f| f != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(a)) => !a.is_empty(),
        Some(Value::Object(o)) => !o.is_empty(),
    }
}

/// Maps raw listing records to `SiteRecord`s.
#[derive(Debug, Clone)]
pub struct SiteNormalizer {
    site_url_base: String,
}

impl SiteNormalizer {
    pub fn new(site_url_base: impl Into<String>) -> Self {
        Self {
            site_url_base: site_url_base.into(),
        }
    }

    /// A record is kept only with a slug and both coordinates.
    pub fn is_valid(&self, record: &RawRecord) -> bool {
        is_truthy(record.get(SLUG)) && is_truthy(record.get(LAT)) && is_truthy(record.get(LNG))
    }

    /// Normalize a record that already passed `is_valid`.
    ///
    /// Fails with `MissingField` when `id` or `nome` is absent or null.
    pub fn normalize(&self, record: &RawRecord) -> Result<SiteRecord> {
        let slug = record
            .get(SLUG)
            .filter(|v| is_truthy(Some(*v)))
            .ok_or_else(|| ScraperError::MissingField(SLUG.into()))?;

        Ok(SiteRecord {
            id: required(record, ID)?,
            title: required(record, NAME)?,
            description: description(record),
            lat: required(record, LAT)?,
            lng: required(record, LNG)?,
            url: self.site_url(slug),
        })
    }

    /// Public page for `slug`. Non-string slugs are appended as their JSON
    /// text, e.g. `true` and `123`.
    pub fn site_url(&self, slug: &Value) -> String {
        match slug {
            Value::String(s) => format!("{}{}", self.site_url_base, s),
            other => format!("{}{}", self.site_url_base, other),
        }
    }
}

fn required(record: &RawRecord, field: &str) -> Result<Value> {
    match record.get(field) {
        None | Some(Value::Null) => Err(ScraperError::MissingField(field.into())),
        Some(v) => Ok(v.clone()),
    }
}

fn description(record: &RawRecord) -> Option<Value> {
    DESCRIPTION_FIELDS
        .iter()
        .map(|field| record.get(*field))
        .find(|v| is_truthy(*v))
        .flatten()
        .cloned()
}
