use anyhow::Result;
use beni_fai_scraper::apis::FondoAmbienteClient;
use beni_fai_scraper::{Config, Pipeline};
use serde_json::{json, Value};
use std::fs;
use tempfile::tempdir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_page(server: &MockServer, page: &str, body: Value, expected_calls: u64) {
    Mock::given(method("GET"))
        .and(path("/api/luoghi"))
        .and(query_param("page", page))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(expected_calls)
        .mount(server)
        .await;
}

fn config_for(server: &MockServer, output_path: std::path::PathBuf) -> Config {
    Config {
        base_url: format!("{}/api/luoghi", server.uri()),
        output_path,
        delay_ms: 0,
        ..Config::default()
    }
}

#[tokio::test]
async fn test_two_pages_one_valid_record() -> Result<()> {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "1",
        json!({
            "data": [
                {
                    "id": 101,
                    "nome": "Villa A",
                    "slug": "a",
                    "coord_geo_lat": 10.0,
                    "coord_geo_long": 20.0,
                    "descrizione_short": "Una villa"
                },
                {
                    "id": 102,
                    "nome": "Senza latitudine",
                    "slug": "b",
                    "coord_geo_long": 21.0
                }
            ]
        }),
        1,
    )
    .await;
    mount_page(&server, "2", json!({"data": []}), 1).await;
    // Pagination must stop at the empty page
    mount_page(&server, "3", json!({"data": [{"slug": "never"}]}), 0).await;

    let temp_dir = tempdir()?;
    let output = temp_dir.path().join("data").join("beni-fai.json");
    assert!(!output.parent().unwrap().exists());

    let source = FondoAmbienteClient::new(&config_for(&server, output.clone()))?;
    let pipeline = Pipeline::new(config_for(&server, output.clone()), Box::new(source));
    let result = pipeline.run().await?;

    assert_eq!(result.stats.raw_records, 2);
    assert_eq!(result.stats.valid_records, 1);
    assert_eq!(result.stats.pages_fetched, 1);
    assert_eq!(result.output_file, output);

    let written: Value = serde_json::from_str(&fs::read_to_string(&output)?)?;
    assert_eq!(
        written,
        json!([
            {
                "id": 101,
                "title": "Villa A",
                "description": "Una villa",
                "lat": 10.0,
                "lng": 20.0,
                "url": "https://fondoambiente.it/luoghi/a"
            }
        ])
    );

    Ok(())
}

#[tokio::test]
async fn test_empty_first_page_writes_empty_array() -> Result<()> {
    let server = MockServer::start().await;
    mount_page(&server, "1", json!({"data": []}), 1).await;
    mount_page(&server, "2", json!({"data": []}), 0).await;

    let temp_dir = tempdir()?;
    let output = temp_dir.path().join("beni-fai.json");
    let config = config_for(&server, output.clone());
    let pipeline = Pipeline::new(config.clone(), Box::new(FondoAmbienteClient::new(&config)?));

    let result = pipeline.run().await?;

    assert_eq!(result.stats.raw_records, 0);
    let written: Value = serde_json::from_str(&fs::read_to_string(&output)?)?;
    assert_eq!(written, json!([]));
    Ok(())
}

#[tokio::test]
async fn test_missing_data_key_aborts_without_writing() -> Result<()> {
    let server = MockServer::start().await;
    mount_page(&server, "1", json!({"message": "maintenance"}), 1).await;

    let temp_dir = tempdir()?;
    let output = temp_dir.path().join("beni-fai.json");
    let config = config_for(&server, output.clone());
    let pipeline = Pipeline::new(config.clone(), Box::new(FondoAmbienteClient::new(&config)?));

    let err = pipeline.run().await.unwrap_err();

    assert!(err.to_string().contains("missing `data` field"));
    assert!(!output.exists());
    Ok(())
}
