//! Compiled-in defaults for a run. `config.toml` may override any of them.

/// Paginated listing endpoint for FAI sites
pub const BASE_URL: &str = "https://platform.fondoambiente.it/api/luoghi";

/// Public site page; the record slug is appended to build `url`
pub const SITE_URL_BASE: &str = "https://fondoambiente.it/luoghi/";

pub const PAGE_SIZE: u32 = 100;

pub const OUTPUT_PATH: &str = "data/beni-fai.json";

pub const TIMEOUT_SECONDS: u64 = 30;

/// Courtesy pause between consecutive page requests
pub const DELAY_MS: u64 = 300;

/// Filter token the upstream API uses to exclude null values in a field
pub const NOT_NULL_FILTER: &str = "null|NOT";

/// Optional configuration file, read from the working directory
pub const CONFIG_PATH: &str = "config.toml";

/// Name reported by the FAI page source in logs and metrics
pub const FONDO_AMBIENTE_API: &str = "fondo_ambiente";
