use crate::config::Config;
use crate::error::{Result, ScraperError};
use crate::normalize::SiteNormalizer;
use crate::types::{Page, PageSource, SiteRecord};
use chrono::{DateTime, Utc};
use crate::observability::metrics;
use serde::Serialize;
use std::fs::{self, Permissions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, trace, warn, Instrument};
use uuid::Uuid;

/// Counters accumulated while paging through the source
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunStats {
    pub pages_fetched: u32,
    pub raw_records: usize,
    pub valid_records: usize,
    /// Records without a slug or coordinates
    pub filtered_records: usize,
    /// Records that passed the filter but lacked `id` or `nome`
    pub skipped_records: usize,
}

/// Result of a complete pipeline run
#[derive(Debug, Serialize)]
pub struct PipelineResult {
    pub run_id: Uuid,
    pub source: String,
    pub stats: RunStats,
    pub output_file: PathBuf,
    pub finished_at: DateTime<Utc>,
}

pub struct Pipeline {
    config: Config,
    source: Box<dyn PageSource>,
    normalizer: SiteNormalizer,
}

impl Pipeline {
    pub fn new(config: Config, source: Box<dyn PageSource>) -> Self {
        let normalizer = SiteNormalizer::new(config.site_url_base.clone());
        Self {
            config,
            source,
            normalizer,
        }
    }

    /// Fetch, filter, and normalize, then write the output document.
    pub async fn run(&self) -> Result<PipelineResult> {
        let run_id = Uuid::new_v4();
        let source = self.source.source_name();
        let span = tracing::info_span!("pipeline", %run_id, source);

        async move {
            info!("🚀 Starting pipeline for {}", source);
            metrics::run_started();
            let started = std::time::Instant::now();

            let (sites, stats) = self.collect().await?;
            let output_file = persist_to_json(&sites, &self.config.output_path)?;

            metrics::run_finished(&stats, started.elapsed().as_secs_f64());
            info!(
                raw = stats.raw_records,
                valid = stats.valid_records,
                filtered = stats.filtered_records,
                skipped = stats.skipped_records,
                "💾 Saved {} sites to {}",
                sites.len(),
                output_file.display()
            );

            Ok::<_, ScraperError>(PipelineResult {
                run_id,
                source: source.to_string(),
                stats,
                output_file,
                finished_at: Utc::now(),
            })
        }
        .instrument(span)
        .await
    }

    /// Page through the source until it reports an empty page.
    pub async fn collect(&self) -> Result<(Vec<SiteRecord>, RunStats)> {
        let mut sites = Vec::new();
        let mut stats = RunStats::default();
        let mut page: u32 = 1;

        loop {
            if let Some(max_pages) = self.config.max_pages {
                if page > max_pages {
                    return Err(ScraperError::PageLimitExceeded { max_pages });
                }
            }

            info!("📥 Fetching page {}", page);
            let records = match self.source.fetch_page(page).await? {
                Page::Exhausted => {
                    info!("Page {} is empty, pagination finished", page);
                    break;
                }
                Page::Records(records) => records,
            };

            stats.pages_fetched += 1;
            stats.raw_records += records.len();
            metrics::page_fetched(records.len());

            for record in &records {
                if !self.normalizer.is_valid(record) {
                    trace!("Dropping record without slug or coordinates");
                    stats.filtered_records += 1;
                    continue;
                }

                match self.normalizer.normalize(record) {
                    Ok(site) => sites.push(site),
                    Err(e) => {
                        warn!(page, slug = %record["slug"], "Skipping site: {}", e);
                        stats.skipped_records += 1;
                    }
                }
            }
            debug!("Page {} done, {} sites so far", page, sites.len());

            page += 1;
            let delay = self.config.delay();
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
        }

        stats.valid_records = sites.len();
        Ok((sites, stats))
    }
}

/// Write `sites` as a pretty-printed JSON array.
///
/// The document goes to a temporary file next to `path` which then replaces
/// `path`, so a failed write never leaves a truncated file behind. The result
/// keeps the mode of the file it replaces, or gets 0644 when new.
#[instrument(skip(sites))]
pub fn persist_to_json(sites: &[SiteRecord], path: &Path) -> Result<PathBuf> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let json_content = serde_json::to_string_pretty(sites)?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(json_content.as_bytes())?;
    tmp.flush()?;
    tmp.as_file().set_permissions(output_permissions(path, tmp.as_file())?)?;
    tmp.persist(path).map_err(|e| e.error)?;

    Ok(path.to_path_buf())
}

fn output_permissions(path: &Path, tmp: &fs::File) -> std::io::Result<Permissions> {
    if let Ok(existing) = fs::metadata(path) {
        return Ok(existing.permissions());
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let _ = tmp;
        Ok(Permissions::from_mode(0o644))
    }

    #[cfg(not(unix))]
    {
        tmp.metadata().map(|m| m.permissions())
    }
}
