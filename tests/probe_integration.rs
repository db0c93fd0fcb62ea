//! Probe runner integration tests against mock HTTP backends
//!
//! These tests drive the real reqwest transport against wiremock servers
//! standing in for the two backend endpoints.

use backend_latency_probe::{
    client::{ClientSettings, ReqwestConnector},
    logging::{LogEntry, LogSink, Logger},
    models::{Endpoint, RequestPayload},
    server::{self, HttpState},
    ProbeRunner,
};
use std::{sync::Arc, time::Duration};
use wiremock::{
    matchers::{body_json, header, method, path},
    Mock, MockServer, ResponseTemplate,
};

const EXECUTE_PATH: &str = "/tools/internal/execute";

/// Mock backend answering POSTs on the execute path
struct MockBackend {
    server: MockServer,
}

impl MockBackend {
    async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    fn url(&self) -> String {
        format!("{}{}", self.server.uri(), EXECUTE_PATH)
    }

    /// Answer every request with `status` after `delay`, expecting exactly `expected` calls
    async fn respond(&self, status: u16, delay: Duration, expected: u64) {
        Mock::given(method("POST"))
            .and(path(EXECUTE_PATH))
            .respond_with(
                ResponseTemplate::new(status)
                    .set_body_json(serde_json::json!({"ok": status < 400}))
                    .set_delay(delay),
            )
            .expect(expected)
            .mount(&self.server)
            .await;
    }
}

fn test_logger(sink: &LogSink) -> Logger {
    Logger::new("PROBE".to_string()).with_sink(sink.clone())
}

fn connector() -> Arc<ReqwestConnector> {
    Arc::new(ReqwestConnector::new(ClientSettings {
        timeout: Duration::from_secs(5),
        ..ClientSettings::default()
    }))
}

fn request_entries(entries: &[LogEntry]) -> Vec<&LogEntry> {
    entries.iter().filter(|e| e.fields.contains_key("sequence")).collect()
}

#[tokio::test]
async fn test_probe_against_two_backends() {
    let k8s = MockBackend::start().await;
    let ebs = MockBackend::start().await;
    k8s.respond(200, Duration::from_millis(20), 10).await;
    ebs.respond(200, Duration::from_millis(60), 10).await;

    let sink = LogSink::memory();
    let runner = ProbeRunner::new(
        vec![
            Endpoint::new("K8S", k8s.url(), RequestPayload::default()),
            Endpoint::new("EBS", ebs.url(), RequestPayload::default()),
        ],
        10,
        connector(),
        test_logger(&sink),
    )
    .unwrap();

    let report = runner.run().await.unwrap();

    assert_eq!(report.names(), vec!["K8S", "EBS"]);
    let k8s_summary = report.get("K8S").unwrap();
    let ebs_summary = report.get("EBS").unwrap();
    assert_eq!(k8s_summary.sample_count, 10);
    assert_eq!(ebs_summary.sample_count, 10);
    assert!(k8s_summary.min_secs >= 0.020);
    assert!(ebs_summary.min_secs >= 0.060);
    for summary in [k8s_summary, ebs_summary] {
        assert!(summary.min_secs <= summary.avg_secs);
        assert!(summary.avg_secs <= summary.max_secs);
    }

    // Log order: all K8S requests, then all EBS requests
    let entries = sink.entries();
    let order: Vec<String> = request_entries(&entries)
        .iter()
        .map(|e| e.fields["endpoint"].as_str().unwrap().to_string())
        .collect();
    let mut expected = vec!["K8S".to_string(); 10];
    expected.extend(vec!["EBS".to_string(); 10]);
    assert_eq!(order, expected);

    // wiremock verifies the `expect(10)` counts on drop
}

#[tokio::test]
async fn test_requests_carry_headers_and_payload() {
    let backend = MockBackend::start().await;
    Mock::given(method("POST"))
        .and(path(EXECUTE_PATH))
        .and(header("content-type", "application/json"))
        .and(header("connection", "close"))
        .and(body_json(serde_json::json!({
            "name": "zendesk_list_all_articles",
            "company_id": "2438",
            "context": {}
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(3)
        .mount(&backend.server)
        .await;

    let sink = LogSink::memory();
    let runner = ProbeRunner::new(
        vec![Endpoint::new("ONLY", backend.url(), RequestPayload::default())],
        3,
        connector(),
        test_logger(&sink),
    )
    .unwrap();

    let report = runner.run().await.unwrap();
    assert_eq!(report.get("ONLY").unwrap().sample_count, 3);

    // Every request matched the strict mock above
    let entries = sink.entries();
    assert!(request_entries(&entries).iter().all(|e| e.fields["status"] == 200));
}

#[tokio::test]
async fn test_server_errors_still_produce_statistics() {
    let backend = MockBackend::start().await;
    backend.respond(500, Duration::ZERO, 10).await;

    let sink = LogSink::memory();
    let runner = ProbeRunner::new(
        vec![Endpoint::new("K8S", backend.url(), RequestPayload::default())],
        10,
        connector(),
        test_logger(&sink),
    )
    .unwrap();

    let report = runner.run().await.unwrap();
    assert_eq!(report.get("K8S").unwrap().sample_count, 10);

    let entries = sink.entries();
    let lines = request_entries(&entries);
    assert_eq!(lines.len(), 10);
    assert!(lines.iter().all(|e| e.fields["status"] == 500));
    assert!(lines[0].message.starts_with("[K8S - #1] Status: 500, Time: "));
}

#[tokio::test]
async fn test_connection_refused_fails_the_run() {
    let healthy = MockBackend::start().await;
    healthy.respond(200, Duration::ZERO, 10).await;

    // Reserve a port, then free it so nothing is listening there
    let closed_addr = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    };
    let dead_url = format!("http://{}{}", closed_addr, EXECUTE_PATH);

    let sink = LogSink::memory();
    let runner = ProbeRunner::new(
        vec![
            Endpoint::new("K8S", healthy.url(), RequestPayload::default()),
            Endpoint::new("EBS", dead_url, RequestPayload::default()),
        ],
        10,
        connector(),
        test_logger(&sink),
    )
    .unwrap();

    let err = runner.run().await.unwrap_err();
    assert!(err.is_transport(), "unexpected error: {}", err);

    let entries = sink.entries();
    assert_eq!(request_entries(&entries).len(), 10);
    assert!(entries.iter().all(|e| !e.fields.contains_key("min_secs")));
}

#[tokio::test]
async fn test_timeout_fails_the_run() {
    let slow = MockBackend::start().await;
    Mock::given(method("POST"))
        .and(path(EXECUTE_PATH))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
        .mount(&slow.server)
        .await;

    let sink = LogSink::memory();
    let runner = ProbeRunner::new(
        vec![Endpoint::new("SLOW", slow.url(), RequestPayload::default())],
        1,
        Arc::new(ReqwestConnector::new(ClientSettings {
            timeout: Duration::from_millis(200),
            ..ClientSettings::default()
        })),
        test_logger(&sink),
    )
    .unwrap();

    let err = runner.run().await.unwrap_err();
    assert_eq!(err.category(), "TIMEOUT");
}

#[tokio::test]
async fn test_http_endpoint_end_to_end() {
    let k8s = MockBackend::start().await;
    let ebs = MockBackend::start().await;
    k8s.respond(200, Duration::ZERO, 10).await;
    ebs.respond(503, Duration::ZERO, 10).await;

    let sink = LogSink::memory();
    let logger = test_logger(&sink);
    let runner = ProbeRunner::new(
        vec![
            Endpoint::new("K8S", k8s.url(), RequestPayload::default()),
            Endpoint::new("EBS", ebs.url(), RequestPayload::default()),
        ],
        10,
        connector(),
        logger.clone(),
    )
    .unwrap();

    let router = server::create_router(HttpState {
        runner: Arc::new(runner),
        logger,
    });
    let listener = server::bind("127.0.0.1:0".parse().unwrap()).await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, router).await });

    let response = reqwest::get(format!("http://{}/", addr)).await.unwrap();
    assert_eq!(response.status().as_u16(), 200);

    let body: serde_json::Value = response.json().await.unwrap();
    let keys: Vec<&String> = body.as_object().unwrap().keys().collect();
    assert_eq!(keys.len(), 2);
    for name in ["K8S", "EBS"] {
        for field in ["min", "max", "avg"] {
            assert!(body[name][field].as_str().unwrap().ends_with(" sec"));
        }
    }
}
