//! End-to-end conversion against a local mock HTTP server.

use std::fs;
use std::time::Duration;

use web2md::{url_to_markdown, Error, Options};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ARTICLE_PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <title>Restoring Old Bicycles | Workshop Journal</title>
    <meta name="author" content="Ada Brennan">
    <meta property="article:published_time" content="2023-11-20T07:00:00Z">
</head>
<body>
    <header><a href="/">Workshop Journal</a></header>
    <nav><a href="/tools">Tools</a> <a href="/projects">Projects</a></nav>
    <article>
        <h1>Restoring Old Bicycles</h1>
        <p>Most frames found in sheds and garages can be brought back to riding
        condition with patience, a few basic tools and a weekend of careful work.</p>
        <h2>Stripping the frame</h2>
        <p>Remove every component and keep the small parts in labelled bags so the
        reassembly goes smoothly. Photograph the drivetrain before taking it apart.</p>
        <ul>
            <li>Chain and cassette</li>
            <li>Brakes and cables</li>
        </ul>
    </article>
    <aside>Subscribe to our newsletter</aside>
    <footer>Copyright Workshop Journal</footer>
</body>
</html>"#;

async fn serve(status: u16, body: &str) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/bicycles"))
        .respond_with(
            ResponseTemplate::new(status)
                .insert_header("content-type", "text/html; charset=utf-8")
                .set_body_string(body),
        )
        .mount(&server)
        .await;
    server
}

async fn convert(url: String, options: Options) -> web2md::Result<String> {
    tokio::task::spawn_blocking(move || url_to_markdown(&url, &options))
        .await
        .expect("conversion thread panicked")
}

fn quick() -> Options {
    Options {
        timeout: Duration::from_secs(5),
        retry_delay: Duration::from_millis(10),
        ..Options::default()
    }
}

#[tokio::test]
async fn converts_article_without_metadata() {
    let server = serve(200, ARTICLE_PAGE).await;
    let markdown = convert(format!("{}/bicycles", server.uri()), quick())
        .await
        .expect("conversion should succeed");

    assert!(markdown.starts_with("# Restoring Old Bicycles\n\n"), "{markdown}");
    assert!(markdown.contains("## Stripping the frame"), "{markdown}");
    assert!(markdown.contains("Chain and cassette"), "{markdown}");
    assert!(!markdown.contains("Subscribe"), "{markdown}");
    assert!(!markdown.contains("Copyright"), "{markdown}");
    assert!(!markdown.contains("Projects"), "{markdown}");
    assert!(!markdown.starts_with("---"));
}

#[tokio::test]
async fn converts_article_with_metadata() {
    let server = serve(200, ARTICLE_PAGE).await;
    let url = format!("{}/bicycles", server.uri());
    let options = Options {
        include_metadata: true,
        ..quick()
    };

    let markdown = convert(url.clone(), options).await.expect("conversion should succeed");
    let expected_head = format!(
        "---\ntitle: \"Restoring Old Bicycles\"\nauthor: \"Ada Brennan\"\ndate: \"2023-11-20\"\nsource: \"{url}\"\nextracted_at: \""
    );
    assert!(markdown.starts_with(&expected_head), "{markdown}");
    assert!(markdown.contains("Z\"\n---\n\n# Restoring Old Bicycles\n\n"), "{markdown}");
}

#[tokio::test]
async fn writes_output_file() {
    let server = serve(200, ARTICLE_PAGE).await;
    let dir = tempfile::tempdir().expect("tempdir");
    let target = dir.path().join("out").join("bicycles.md");
    let options = Options {
        output_path: Some(target.clone()),
        ..quick()
    };

    let markdown = convert(format!("{}/bicycles", server.uri()), options)
        .await
        .expect("conversion should succeed");

    let written = fs::read_to_string(&target).expect("output file should exist");
    assert_eq!(written, markdown);
}

#[tokio::test]
async fn http_error_is_a_fetch_error() {
    let server = serve(404, "not here").await;
    let err = convert(format!("{}/bicycles", server.uri()), quick())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Fetch { status: Some(404), .. }), "{err:?}");
    assert_eq!(err.exit_code(), 1);
}

#[tokio::test]
async fn page_without_content_is_an_extraction_error() {
    let server = serve(200, "<html><body><nav>Home</nav></body></html>").await;
    let dir = tempfile::tempdir().expect("tempdir");
    let target = dir.path().join("never.md");
    let options = Options {
        output_path: Some(target.clone()),
        ..quick()
    };

    let err = convert(format!("{}/bicycles", server.uri()), options)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Extraction { .. }), "{err:?}");
    assert_eq!(err.exit_code(), 2);
    assert!(!target.exists(), "nothing should be written on failure");
}

#[test]
fn invalid_url_is_rejected_before_fetching() {
    let err = url_to_markdown("ftp://example.com/file", &quick()).unwrap_err();
    assert_eq!(err.to_string(), "Invalid URL scheme: ftp");
    assert_eq!(err.exit_code(), 1);
}
