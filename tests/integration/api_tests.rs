use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use link_harvest::config::CrawlerConfig;
use link_harvest::crawler::Coordinator;
use link_harvest::crawler::HttpFetcher;
use link_harvest::server::build_router;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_router() -> Router {
    let config = CrawlerConfig {
        idle_poll_ms: 10,
        max_workers: 4,
        ..CrawlerConfig::default()
    };
    let fetcher = HttpFetcher::new(&Default::default()).expect("Failed to build fetcher");
    build_router(Coordinator::new(config, Arc::new(fetcher)))
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.expect("Request failed");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_submit_poll_and_fetch_result() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"<html><body><img src="/a.png"><a href="/b">B</a></body></html>"#)
                .insert_header("content-type", "text/html"),
        )
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/b"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"<html><body><img src="b.png"></body></html>"#)
                .insert_header("content-type", "text/html"),
        )
        .mount(&mock_server)
        .await;

    let app = test_router();
    let seed = format!("{}/", base_url);
    let (status, body) = send(
        &app,
        post_json("/", &json!({ "urls": [seed, seed], "threads": 2 })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["threads"], 2);
    assert_eq!(body["levels"], 2);
    assert_eq!(body["urls"], json!([seed]));
    let job_id = body["job_id"].as_str().expect("job_id missing").to_string();

    // Poll until the job reports its results
    let mut result = Value::Null;
    for _ in 0..200 {
        let (status, body) = send(&app, get(&format!("/result/{}", job_id))).await;
        match status {
            StatusCode::OK => {
                result = body;
                break;
            }
            StatusCode::ACCEPTED => {
                assert_eq!(body["status"], "pending");
                tokio::time::sleep(Duration::from_millis(25)).await;
            }
            other => panic!("unexpected status {}", other),
        }
    }

    assert_eq!(result["phase"], "finished");
    assert_eq!(result["results"][&seed], json!([format!("{}/a.png", base_url)]));
    assert_eq!(
        result["results"][&format!("{}/b", base_url)],
        json!([format!("{}/b.png", base_url)])
    );

    let (status, body) = send(&app, get(&format!("/status/{}", job_id))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["completed"], 2);
    assert_eq!(body["inprogress"], 0);
    assert_eq!(body["failed"], 0);

    // Finished jobs answer identically on every query
    let (_, again) = send(&app, get(&format!("/result/{}", job_id))).await;
    assert_eq!(again, result);
}

#[tokio::test]
async fn test_missing_url_list_is_rejected() {
    let app = test_router();
    let (status, body) = send(&app, post_json("/jobs", &json!({ "threads": 1 }))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing url list node");
}

#[tokio::test]
async fn test_invalid_submissions_are_rejected() {
    let app = test_router();

    for payload in [
        json!({ "urls": [] }),
        json!({ "urls": ["https://example.com/"], "threads": 0 }),
        json!({ "urls": ["https://example.com/"], "threads": 99 }),
        json!({ "urls": ["https://example.com/"], "levels": 0 }),
        json!({ "urls": ["not a url"] }),
    ] {
        let (status, body) = send(&app, post_json("/", &payload)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "payload {}", payload);
        assert!(body["error"].as_str().unwrap().starts_with("Invalid request"));
    }

    let (_, health) = send(&app, get("/health")).await;
    assert_eq!(health["jobs"], 0);
}

#[tokio::test]
async fn test_malformed_json_is_rejected() {
    let app = test_router();
    let request = Request::builder()
        .method("POST")
        .uri("/")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let (status, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_jobs_are_not_found() {
    let app = test_router();
    let unknown = "00000000-0000-4000-8000-000000000000";

    for uri in [
        format!("/status/{}", unknown),
        format!("/result/{}", unknown),
        "/status/not-a-job".to_string(),
    ] {
        let (status, body) = send(&app, get(&uri)).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{}", uri);
        assert!(body["error"].as_str().unwrap().contains("not found"));
    }

    let cancel = Request::builder()
        .method("DELETE")
        .uri(format!("/jobs/{}", unknown))
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&app, cancel).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unknown_route_uses_fallback() {
    let app = test_router();
    let (status, body) = send(&app, get("/nowhere")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": 404, "text": "Page not found" }));
}

#[tokio::test]
async fn test_health() {
    let app = test_router();
    let (status, body) = send(&app, get("/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}
