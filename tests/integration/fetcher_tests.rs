use link_harvest::config::FetcherConfig;
use link_harvest::crawler::{HttpFetcher, PageFetcher};
use link_harvest::FetchError;
use url::Url;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_fetcher() -> HttpFetcher {
    let config = FetcherConfig {
        user_agent: "TestHarvester/1.0".to_string(),
        timeout_secs: 5,
        connect_timeout_secs: 1,
        max_redirects: 5,
    };
    HttpFetcher::new(&config).expect("Failed to build fetcher")
}

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(format!("<html><body>{}</body></html>", body))
        .insert_header("content-type", "text/html")
}

#[tokio::test]
async fn test_fetch_extracts_absolute_links_and_images() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/docs/index.html"))
        .and(header("user-agent", "TestHarvester/1.0"))
        .respond_with(html(
            r#"<a href="intro.html">Intro</a>
               <a href="/about">About</a>
               <a href="https://other.example/">Elsewhere</a>
               <a href="mailto:someone@example.com">Mail</a>
               <img src="img/diagram.png">
               <img src="/logo.svg">"#,
        ))
        .expect(1)
        .mount(&mock_server)
        .await;

    let url = Url::parse(&format!("{}/docs/index.html", base_url)).unwrap();
    let page = test_fetcher().fetch(&url).await.expect("Fetch failed");

    assert_eq!(
        page.links,
        vec![
            format!("{}/docs/intro.html", base_url),
            format!("{}/about", base_url),
            "https://other.example/".to_string(),
        ]
    );
    assert_eq!(
        page.resources,
        vec![
            format!("{}/docs/img/diagram.png", base_url),
            format!("{}/logo.svg", base_url),
        ]
    );
}

#[tokio::test]
async fn test_fetch_resolves_against_redirect_target() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let target = format!("{}/new/", base_url);

    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(ResponseTemplate::new(301).insert_header("location", target.as_str()))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/new/"))
        .respond_with(html(r#"<a href="child">Child</a>"#))
        .mount(&mock_server)
        .await;

    let url = Url::parse(&format!("{}/old", base_url)).unwrap();
    let page = test_fetcher().fetch(&url).await.expect("Fetch failed");

    assert_eq!(page.links, vec![format!("{}/new/child", base_url)]);
}

#[tokio::test]
async fn test_fetch_reports_http_errors() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let url = Url::parse(&format!("{}/gone", mock_server.uri())).unwrap();
    let result = test_fetcher().fetch(&url).await;

    assert!(matches!(result, Err(FetchError::Status { status: 404, .. })));
}

#[tokio::test]
async fn test_fetch_reports_unreachable_host() {
    // Nothing listens on port 1
    let url = Url::parse("http://127.0.0.1:1/").unwrap();
    let result = test_fetcher().fetch(&url).await;

    assert!(matches!(result, Err(FetchError::Request { .. })));
}

#[tokio::test]
async fn test_non_html_body_yields_no_links() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data.json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"{"href": "/not-a-link"}"#)
                .insert_header("content-type", "application/json"),
        )
        .mount(&mock_server)
        .await;

    let url = Url::parse(&format!("{}/data.json", mock_server.uri())).unwrap();
    let page = test_fetcher().fetch(&url).await.expect("Fetch failed");

    assert!(page.links.is_empty());
    assert!(page.resources.is_empty());
}
