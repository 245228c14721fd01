use link_harvest::config::{Config, CrawlerConfig, FetcherConfig};
use link_harvest::crawler::{http_coordinator, Coordinator, JobRequest};
use link_harvest::state::JobPhase;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration with fast polling and short timeouts
fn create_test_config() -> Config {
    Config {
        crawler: CrawlerConfig {
            default_workers: 2,
            default_max_depth: 2,
            max_workers: 8,
            retention_secs: 600,
            idle_poll_ms: 10, // Very short for testing
            job_deadline_secs: None,
        },
        fetcher: FetcherConfig {
            user_agent: "TestHarvester/1.0".to_string(),
            timeout_secs: 5,
            connect_timeout_secs: 1,
            max_redirects: 5,
        },
        ..Config::default()
    }
}

fn create_coordinator() -> Coordinator {
    http_coordinator(&create_test_config()).expect("Failed to create coordinator")
}

async fn mount_page(server: &MockServer, route: &str, body: String, expected_hits: u64) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html"),
        )
        .expect(expected_hits)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_full_crawl_single_site() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    // Home links to both pages and to itself
    mount_page(
        &mock_server,
        "/",
        format!(
            r#"<html><head><title>Home</title></head><body>
            <img src="/home.png">
            <a href="{0}/page1">Page 1</a>
            <a href="/page2">Page 2</a>
            <a href="/">Home</a>
            </body></html>"#,
            base_url
        ),
        1,
    )
    .await;

    // page1 links back home; at depth 1 nothing further is enqueued anyway
    mount_page(
        &mock_server,
        "/page1",
        r#"<html><body><img src="one.png"><a href="/">Home</a><a href="/deep">Deep</a></body></html>"#
            .to_string(),
        1,
    )
    .await;

    mount_page(
        &mock_server,
        "/page2",
        r#"<html><body>Content 2</body></html>"#.to_string(),
        1,
    )
    .await;

    // Beyond the depth bound, must never be requested
    mount_page(&mock_server, "/deep", String::new(), 0).await;

    let coordinator = create_coordinator();
    let job = coordinator
        .submit(JobRequest::new([format!("{}/", base_url)]))
        .expect("Failed to submit job");
    let report = coordinator.wait(&job.id).await.expect("Job vanished");

    assert_eq!(report.phase, JobPhase::Finished);
    assert_eq!(report.results.len(), 3);
    assert_eq!(
        report.results[&format!("{}/", base_url)],
        vec![format!("{}/home.png", base_url)]
    );
    assert_eq!(
        report.results[&format!("{}/page1", base_url)],
        vec![format!("{}/one.png", base_url)]
    );
    assert!(report.results[&format!("{}/page2", base_url)].is_empty());
    assert!(report.failed.is_empty());

    let status = coordinator.status(&job.id).expect("Job vanished");
    assert_eq!(status.completed, 3);
    assert_eq!(status.in_progress, 0);

    // Wiremock verifies the expected hit counts when mock_server drops
}

#[tokio::test]
async fn test_broken_link_is_recorded_as_failed() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        r#"<html><body><a href="/ok">OK</a><a href="/broken">Broken</a></body></html>"#
            .to_string(),
        1,
    )
    .await;
    mount_page(&mock_server, "/ok", "<html></html>".to_string(), 1).await;

    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1) // never retried
        .mount(&mock_server)
        .await;

    let coordinator = create_coordinator();
    let job = coordinator
        .submit(JobRequest::new([format!("{}/", base_url)]).with_workers(3))
        .expect("Failed to submit job");
    let report = coordinator.wait(&job.id).await.expect("Job vanished");

    assert_eq!(report.phase, JobPhase::Finished);
    assert_eq!(report.results.len(), 2);
    let broken = format!("{}/broken", base_url);
    assert!(report.failed[&broken].contains("500"));

    let status = coordinator.status(&job.id).expect("Job vanished");
    assert_eq!(status.failed, 1);
    assert_eq!(status.in_progress, 0);
}

#[tokio::test]
async fn test_unreachable_seed_still_finishes() {
    let coordinator = create_coordinator();
    let job = coordinator
        .submit(JobRequest::new(["http://127.0.0.1:1/"]))
        .expect("Failed to submit job");
    let report = coordinator.wait(&job.id).await.expect("Job vanished");

    assert_eq!(report.phase, JobPhase::Finished);
    assert!(report.results.is_empty());
    assert_eq!(report.failed.len(), 1);
}
