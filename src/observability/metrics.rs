//! Run metrics for the scraper.
//!
//! A run is a short-lived job, so nothing is scraped: the binary installs an
//! in-process Prometheus recorder, renders it once the pipeline finishes, and
//! pushes the text to a Pushgateway when one is configured.

use crate::error::{Result, ScraperError};
use crate::pipeline::RunStats;
use ::metrics::{counter, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tracing::{info, warn};

pub const PIPELINE_RUNS: &str = "beni_fai_pipeline_runs_total";
pub const PAGES_FETCHED: &str = "beni_fai_pages_fetched_total";
pub const RAW_RECORDS: &str = "beni_fai_raw_records_total";
pub const VALID_RECORDS: &str = "beni_fai_valid_records_total";
pub const FILTERED_RECORDS: &str = "beni_fai_filtered_records_total";
pub const SKIPPED_RECORDS: &str = "beni_fai_skipped_records_total";
pub const PIPELINE_DURATION: &str = "beni_fai_pipeline_duration_seconds";

const PUSH_JOB: &str = "beni_fai_scraper";

/// Install the global Prometheus recorder. Returns `None` if one is already set.
pub fn init_metrics() -> Option<PrometheusHandle> {
    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => {
            info!("Prometheus recorder installed");
            Some(handle)
        }
        Err(e) => {
            warn!("Failed to install Prometheus recorder: {}", e);
            None
        }
    }
}

pub fn run_started() {
    counter!(PIPELINE_RUNS).increment(1);
}

pub fn page_fetched(records: usize) {
    counter!(PAGES_FETCHED).increment(1);
    counter!(RAW_RECORDS).increment(records as u64);
}

pub fn run_finished(stats: &RunStats, duration_secs: f64) {
    counter!(VALID_RECORDS).increment(stats.valid_records as u64);
    counter!(FILTERED_RECORDS).increment(stats.filtered_records as u64);
    counter!(SKIPPED_RECORDS).increment(stats.skipped_records as u64);
    histogram!(PIPELINE_DURATION).record(duration_secs);
}

/// POST rendered metrics to `{gateway}/metrics/job/beni_fai_scraper/instance/{instance}`.
pub async fn push_to_gateway(
    client: &reqwest::Client,
    gateway: &str,
    instance: &str,
    body: String,
) -> Result<()> {
    let push_url = format!(
        "{}/metrics/job/{}/instance/{}",
        gateway.trim_end_matches('/'),
        PUSH_JOB,
        instance
    );

    let response = client
        .post(&push_url)
        .header("Content-Type", "text/plain; version=0.0.4")
        .body(body)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        return Err(ScraperError::Api {
            message: format!("Pushgateway responded with status {}", status.as_u16()),
        });
    }

    info!("Pushed metrics to Pushgateway for instance={}", instance);
    Ok(())
}
