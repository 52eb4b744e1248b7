use anyhow::Context;
use beni_fai_scraper::apis::FondoAmbienteClient;
use beni_fai_scraper::constants::CONFIG_PATH;
use beni_fai_scraper::observability::metrics;
use beni_fai_scraper::{logging, Config, Pipeline};
use tracing::{debug, error, warn};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Load environment variables (RUST_LOG may live in .env)
    dotenv::dotenv().ok();

    logging::init_logging();
    let metrics_handle = metrics::init_metrics();

    let config = Config::load(CONFIG_PATH).context("failed to load configuration")?;
    let source = FondoAmbienteClient::new(&config).context("failed to build HTTP client")?;
    let pushgateway_url = config.pushgateway_url.clone();
    let pipeline = Pipeline::new(config, Box::new(source));

    let outcome = pipeline.run().await;

    if let Some(handle) = &metrics_handle {
        let rendered = handle.render();
        match &pushgateway_url {
            Some(gateway) => {
                let instance = beni_fai_scraper::constants::FONDO_AMBIENTE_API;
                if let Err(e) = metrics::push_to_gateway(&reqwest::Client::new(), gateway, instance, rendered).await {
                    warn!("Failed to push metrics to Pushgateway: {}", e);
                }
            }
            None => debug!("Run metrics:\n{}", rendered),
        }
    }

    match outcome {
        Ok(result) => {
            println!("\n📊 Pipeline Results for {}:", result.source);
            println!("   Pages fetched: {}", result.stats.pages_fetched);
            println!("   Raw records: {}", result.stats.raw_records);
            println!("   Valid records: {}", result.stats.valid_records);
            if result.stats.skipped_records > 0 {
                println!("   ⚠️  Skipped (missing id/nome): {}", result.stats.skipped_records);
            }
            println!("✅ Saved {} sites to {}", result.stats.valid_records, result.output_file.display());
            Ok(())
        }
        Err(e) => {
            error!("Pipeline failed: {}", e);
            Err(e).context("pipeline run failed")
        }
    }
}
