use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScraperError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status} returned for page {page}")]
    Status { page: u32, status: u16 },

    #[error("JSON (de)serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Malformed response for page {page}: {reason}")]
    MalformedResponse { page: u32, reason: String },

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("API error: {message}")]
    Api { message: String },

    #[error("Pagination did not end within {max_pages} pages")]
    PageLimitExceeded { max_pages: u32 },
}

pub type Result<T> = std::result::Result<T, ScraperError>;
