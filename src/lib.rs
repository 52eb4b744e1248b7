pub mod apis;
pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod normalize;
pub mod observability;
pub mod pipeline;
pub mod types;

pub use config::Config;
pub use error::{Result, ScraperError};
pub use pipeline::{Pipeline, PipelineResult, RunStats};
pub use types::{Page, PageSource, RawRecord, SiteRecord};
