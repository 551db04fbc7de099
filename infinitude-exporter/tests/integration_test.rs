//! Integration tests for the exporter.
//!
//! These tests run the collectors against a mock Infinitude server and
//! verify the full flow through to the HTTP /metrics endpoint.

use std::sync::Arc;
use std::time::Duration;

use infinitude_exporter::config::{FilterConfig, InfinitudeConfig};
use infinitude_exporter::{
    Collector, EnergyCollector, ExporterConfig, HttpServer, JsonFetcher, SharedRegistry,
    StatusCollector, build_registry,
};
use tokio::sync::watch;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const STATUS_FIXTURE: &str = include_str!("fixtures/status.json");
const ENERGY_FIXTURE: &str = include_str!("fixtures/energy.json");

/// Mount a JSON document on the mock server.
async fn mount_json(server: &MockServer, route: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "application/json"),
        )
        .mount(server)
        .await;
}

/// Helper to create a config pointing at the mock server.
fn config_for(base_url: &str) -> ExporterConfig {
    ExporterConfig {
        infinitude: InfinitudeConfig {
            base_url: base_url.to_string(),
            timeout_secs: 2,
        },
        ..Default::default()
    }
}

fn registry_for(base_url: &str) -> SharedRegistry {
    build_registry(&config_for(base_url)).expect("Failed to build registry")
}

fn fetcher() -> JsonFetcher {
    JsonFetcher::new(Duration::from_secs(2)).unwrap()
}

/// Helper to find a sample line and parse its value.
fn sample_value(output: &str, series: &str) -> Option<f64> {
    output
        .lines()
        .filter(|line| !line.starts_with('#'))
        .find_map(|line| {
            let (name, value) = line.rsplit_once(' ')?;
            (name == series).then(|| value.parse().ok()).flatten()
        })
}

fn count_samples(output: &str, prefix: &str) -> usize {
    output
        .lines()
        .filter(|line| !line.starts_with('#') && line.starts_with(prefix))
        .count()
}

#[tokio::test]
async fn test_status_collector_against_fixture() {
    let server = MockServer::start().await;
    mount_json(&server, "/status.json", STATUS_FIXTURE).await;

    let collector = StatusCollector::new(fetcher(), format!("{}/status.json", server.uri()));
    let measurements = collector.collect().await;

    // 2 unlabeled + 2 enabled zones x 4
    assert_eq!(measurements.len(), 10);
    assert!(
        measurements
            .iter()
            .all(|m| m.label("zone_id") != Some("3"))
    );

    let basement_rt = measurements
        .iter()
        .find(|m| m.name() == "infinitude_status_rt" && m.label("zone_id") == Some("2"))
        .map(|m| m.value);
    assert_eq!(basement_rt, Some(0.0));
}

#[tokio::test]
async fn test_energy_collector_against_fixture() {
    let server = MockServer::start().await;
    mount_json(&server, "/energy.json", ENERGY_FIXTURE).await;

    let collector = EnergyCollector::new(fetcher(), format!("{}/energy.json", server.uri()));
    let measurements = collector.collect().await;

    let usage = measurements
        .iter()
        .filter(|m| m.name().starts_with("infinitude_energy_usage_"))
        .count();
    let cost = measurements
        .iter()
        .filter(|m| m.name().starts_with("infinitude_energy_cost_"))
        .count();

    assert_eq!(usage, 3 * 8);
    assert_eq!(cost, 2 * 8);
}

#[tokio::test]
async fn test_empty_energy_envelope_yields_nothing() {
    let server = MockServer::start().await;
    mount_json(&server, "/energy.json", r#"{"energy": []}"#).await;

    let collector = EnergyCollector::new(fetcher(), format!("{}/energy.json", server.uri()));

    // Not an error: the pass succeeds with no data
    let measurements = collector.scrape().await.expect("empty envelope is not an error");
    assert!(measurements.is_empty());
}

#[tokio::test]
async fn test_null_lists_are_not_failures() {
    let server = MockServer::start().await;
    mount_json(
        &server,
        "/status.json",
        r#"{"status": [{"oat": ["55.5"], "filtrlvl": ["80"], "zones": null}]}"#,
    )
    .await;
    mount_json(&server, "/energy.json", r#"{"energy": null}"#).await;

    let registry = registry_for(&server.uri());
    let output = registry.render().await;

    assert_eq!(sample_value(&output, "infinitude_status_oat"), Some(55.5));
    assert_eq!(sample_value(&output, "infinitude_status_filtrlvl"), Some(80.0));
    assert_eq!(count_samples(&output, "infinitude_energy_"), 0);
    assert_eq!(
        sample_value(
            &output,
            "infinitude_exporter_collector_success{collector=\"energy\"}"
        ),
        Some(1.0)
    );
    assert_eq!(
        sample_value(&output, "infinitude_exporter_collection_failures_total"),
        Some(0.0)
    );
}

#[tokio::test]
async fn test_render_end_to_end() {
    let server = MockServer::start().await;
    mount_json(
        &server,
        "/status.json",
        r#"{"status": [{
            "oat": ["55.5"],
            "filtrlvl": ["80"],
            "zones": [{"zone": [{
                "id": "1", "enabled": ["on"],
                "rh": ["45"], "htsp": ["68"], "clsp": ["74"], "rt": ["71"]
            }]}]
        }]}"#,
    )
    .await;
    mount_json(&server, "/energy.json", ENERGY_FIXTURE).await;

    let output = registry_for(&server.uri()).render().await;

    assert_eq!(sample_value(&output, "infinitude_status_oat"), Some(55.5));
    assert_eq!(sample_value(&output, "infinitude_status_filtrlvl"), Some(80.0));
    assert_eq!(
        sample_value(&output, "infinitude_status_rh{zone_id=\"1\"}"),
        Some(45.0)
    );
    assert_eq!(
        sample_value(&output, "infinitude_status_rt{zone_id=\"1\"}"),
        Some(71.0)
    );
    assert_eq!(
        sample_value(&output, "infinitude_status_htsp{zone_id=\"1\"}"),
        Some(68.0)
    );
    assert_eq!(
        sample_value(&output, "infinitude_status_clsp{zone_id=\"1\"}"),
        Some(74.0)
    );

    assert_eq!(
        sample_value(&output, "infinitude_energy_usage_hpheat{period_id=\"month1\"}"),
        Some(310.0)
    );
    assert_eq!(
        sample_value(&output, "infinitude_energy_usage_reheat{period_id=\"month1\"}"),
        Some(0.0)
    );
    assert_eq!(
        sample_value(&output, "infinitude_energy_cost_hpheat{period_id=\"day2\"}"),
        Some(1.95)
    );

    assert!(output.contains("# TYPE infinitude_status_oat gauge"));
    assert!(output.contains("# TYPE infinitude_energy_cost_gas gauge"));
    assert_eq!(
        sample_value(
            &output,
            "infinitude_exporter_collector_success{collector=\"status\"}"
        ),
        Some(1.0)
    );
}

#[tokio::test]
async fn test_failed_energy_fetch_keeps_status() {
    let server = MockServer::start().await;
    mount_json(&server, "/status.json", STATUS_FIXTURE).await;
    Mock::given(method("GET"))
        .and(path("/energy.json"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let output = registry_for(&server.uri()).render().await;

    assert_eq!(count_samples(&output, "infinitude_status_"), 10);
    assert_eq!(count_samples(&output, "infinitude_energy_"), 0);
    assert!(!output.contains("# TYPE infinitude_energy_usage_fan"));
    assert_eq!(
        sample_value(
            &output,
            "infinitude_exporter_collector_success{collector=\"energy\"}"
        ),
        Some(0.0)
    );
}

#[tokio::test]
async fn test_malformed_status_keeps_energy() {
    let server = MockServer::start().await;
    mount_json(&server, "/status.json", "{ this is not json").await;
    mount_json(&server, "/energy.json", ENERGY_FIXTURE).await;

    let output = registry_for(&server.uri()).render().await;

    assert_eq!(count_samples(&output, "infinitude_status_"), 0);
    assert_eq!(count_samples(&output, "infinitude_energy_"), 40);
}

#[tokio::test]
async fn test_unreachable_controller() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let registry = registry_for(&format!("http://{}", addr));
    let output = registry.render().await;

    assert_eq!(count_samples(&output, "infinitude_status_"), 0);
    assert_eq!(count_samples(&output, "infinitude_energy_"), 0);
    assert_eq!(
        sample_value(&output, "infinitude_exporter_collection_failures_total"),
        Some(2.0)
    );
    assert_eq!(registry.stats().collection_failures, 2);
}

#[tokio::test]
async fn test_each_scrape_fetches_fresh() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/status.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string(STATUS_FIXTURE))
        .expect(3)
        .mount(&server)
        .await;
    mount_json(&server, "/energy.json", r#"{"energy": []}"#).await;

    let registry = registry_for(&server.uri());
    for _ in 0..3 {
        registry.render().await;
    }

    assert_eq!(registry.stats().scrapes, 3);
    server.verify().await;
}

#[tokio::test]
async fn test_filtered_families_are_hidden() {
    let server = MockServer::start().await;
    mount_json(&server, "/status.json", STATUS_FIXTURE).await;
    mount_json(&server, "/energy.json", ENERGY_FIXTURE).await;

    let mut config = config_for(&server.uri());
    config.filters = FilterConfig {
        include_metrics: vec!["infinitude_*".to_string()],
        exclude_metrics: vec!["infinitude_energy_cost_*".to_string()],
    };
    let output = build_registry(&config).unwrap().render().await;

    assert_eq!(count_samples(&output, "infinitude_energy_cost_"), 0);
    assert_eq!(count_samples(&output, "infinitude_energy_usage_"), 24);
    assert_eq!(count_samples(&output, "infinitude_status_"), 10);
}

#[tokio::test]
async fn test_http_server_end_to_end() {
    let upstream = MockServer::start().await;
    mount_json(&upstream, "/status.json", STATUS_FIXTURE).await;
    Mock::given(method("GET"))
        .and(path("/energy.json"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&upstream)
        .await;

    let registry = registry_for(&upstream.uri());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let server = HttpServer::new(Arc::clone(&registry), addr, "/metrics".to_string());
    let server_handle = tokio::spawn(async move {
        let _ = server.serve(listener, shutdown_rx).await;
    });

    let client = reqwest::Client::new();

    let health = client
        .get(format!("http://{}/health", addr))
        .send()
        .await
        .expect("health request");
    assert_eq!(health.status().as_u16(), 200);
    assert_eq!(health.text().await.unwrap(), r#"{"status":"healthy"}"#);

    let metrics = client
        .get(format!("http://{}/metrics", addr))
        .send()
        .await
        .expect("metrics request");
    assert_eq!(metrics.status().as_u16(), 200);
    let body = metrics.text().await.unwrap();
    assert_eq!(sample_value(&body, "infinitude_status_oat"), Some(55.5));
    assert_eq!(count_samples(&body, "infinitude_energy_"), 0);

    shutdown_tx.send(true).unwrap();
    let _ = tokio::time::timeout(Duration::from_secs(5), server_handle).await;
}
