use super::*;
use crate::source::fixture::{snapshot_dir, utc_source, SNAPSHOT};
use aag_core::Reading;
use chrono::{TimeZone, Utc};
use tempfile::TempDir;

fn build_source(dir: &TempDir) -> Arc<SnapshotSource> {
    Arc::new(utc_source(dir))
}

fn content_type(res: &warp::http::Response<warp::hyper::body::Bytes>) -> &str {
    res.headers()["content-type"].to_str().unwrap()
}

#[tokio::test]
async fn test_rest_aag() {
    // Prepare
    let dir = snapshot_dir(Some(SNAPSHOT), None);
    let routes = aag_routes::routes(&build_source(&dir));

    // Execute
    let res = warp::test::request().path("/aag").reply(&routes).await;

    // Validate
    assert_eq!(200, res.status());
    assert_eq!("application/json", content_type(&res));
    let body: serde_json::Value = serde_json::from_slice(res.body()).unwrap();
    assert_eq!("2024-03-07T13:45:02Z", body["timestamp"]);
    assert_eq!("Serial: 2101, FW: 5.89", body["cloudWatcherInfo"]);
    assert_eq!("", body["skyLightDetectorData"]);
    assert_eq!(true, body["switchClosed"]);
    assert_eq!(false, body["lightSafe"]);
    assert_eq!(61.0, body["humidity"]);
    assert!(body.get("hum").is_none());

    let reading: Reading = serde_json::from_slice(res.body()).unwrap();
    assert_eq!(
        Utc.with_ymd_and_hms(2024, 3, 7, 13, 45, 2).unwrap(),
        reading.timestamp
    );
    assert_eq!(-13.9, reading.raw_infrared);
}

#[tokio::test]
async fn test_rest_aag_reads_fresh() {
    // Prepare
    let dir = snapshot_dir(Some(SNAPSHOT), None);
    let source = build_source(&dir);
    let routes = aag_routes::routes(&source);
    let first = warp::test::request().path("/aag").reply(&routes).await;
    let warmer = SNAPSHOT.replace("\"temp\": 12.5", "\"temp\": 14.25");
    std::fs::write(source.snapshot_path(), warmer).unwrap();

    // Execute
    let second = warp::test::request().path("/aag").reply(&routes).await;

    // Validate
    let first: Reading = serde_json::from_slice(first.body()).unwrap();
    let second: Reading = serde_json::from_slice(second.body()).unwrap();
    assert_eq!(12.5, first.temperature);
    assert_eq!(14.25, second.temperature);
}

#[tokio::test]
async fn test_rest_aag_missing_snapshot() {
    // Prepare
    let dir = snapshot_dir(None, None);
    let routes = aag_routes::routes(&build_source(&dir));

    // Execute
    let res = warp::test::request().path("/aag").reply(&routes).await;

    // Validate
    assert_eq!(500, res.status());
    let body: serde_json::Value = serde_json::from_slice(res.body()).unwrap();
    assert!(body["error"].as_str().unwrap().contains("aag_json.dat"));
}

#[tokio::test]
async fn test_rest_aag_malformed_snapshot() {
    // Prepare
    let broken = SNAPSHOT.replace("2024/03/07 13:45:02", "2024-03-07 13:45:02");
    let dir = snapshot_dir(Some(broken.as_str()), None);
    let routes = aag_routes::routes(&build_source(&dir));

    // Execute
    let res = warp::test::request().path("/aag").reply(&routes).await;

    // Validate
    assert_eq!(500, res.status());
}

#[tokio::test]
async fn test_rest_debug() {
    // Prepare
    let dir = snapshot_dir(None, Some("a\r\nb\rc\n"));
    let routes = aag_routes::routes(&build_source(&dir));

    // Execute
    let res = warp::test::request().path("/debug").reply(&routes).await;

    // Validate
    assert_eq!(200, res.status());
    assert_eq!("text/plain; charset=utf-8", content_type(&res));
    assert_eq!("a\nb\nc\n", std::str::from_utf8(res.body()).unwrap());
}

#[tokio::test]
async fn test_rest_debug_missing() {
    // Prepare
    let dir = snapshot_dir(Some(SNAPSHOT), None);
    let routes = aag_routes::routes(&build_source(&dir));

    // Execute
    let res = warp::test::request().path("/debug").reply(&routes).await;

    // Validate
    assert_eq!(500, res.status());
}

#[tokio::test]
async fn test_rest_unknown_path() {
    // Prepare
    let dir = snapshot_dir(Some(SNAPSHOT), None);
    let routes = aag_routes::routes(&build_source(&dir));

    // Execute
    let res = warp::test::request().path("/aag/1").reply(&routes).await;

    // Validate
    assert_eq!(404, res.status());
}

#[tokio::test]
async fn test_rest_metrics() {
    // Prepare
    let dir = snapshot_dir(Some(SNAPSHOT), None);
    let metrics = Arc::new(AagMetrics::new().unwrap());
    let routes = metric_routes::routes(&build_source(&dir), &metrics);

    // Execute
    let res = warp::test::request().path("/metrics").reply(&routes).await;

    // Validate
    assert_eq!(200, res.status());
    assert_eq!(prometheus::TEXT_FORMAT, content_type(&res));
    let body = std::str::from_utf8(res.body()).unwrap();
    assert!(body.contains("\naag_temperature 12.5\n"));
    assert!(body.contains("\naag_switch 1\n"));
}

#[tokio::test]
async fn test_rest_metrics_failed_cycle() {
    // Prepare
    let dir = snapshot_dir(Some(SNAPSHOT), None);
    let source = build_source(&dir);
    let metrics = Arc::new(AagMetrics::new().unwrap());
    let routes = metric_routes::routes(&source, &metrics);
    let ok = warp::test::request().path("/metrics").reply(&routes).await;
    std::fs::remove_file(source.snapshot_path()).unwrap();

    // Execute
    let failed = warp::test::request().path("/metrics").reply(&routes).await;

    // Validate
    assert_eq!(200, ok.status());
    assert_eq!(500, failed.status());
    let body = std::str::from_utf8(failed.body()).unwrap();
    assert!(!body.contains("aag_temperature"));
}
