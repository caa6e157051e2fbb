//! Full download run against a local stand-in for the court website.
//! Run with `cargo test -- --ignored` on a machine with Chrome installed.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::extract::Query;
use axum::http::header;
use axum::response::{Html, IntoResponse};
use axum::routing::get;
use causelist_config::Config;
use causelist_scraper::{CauseListRequest, CauseListRunner};

const OUTER: &str = r#"<html><body><h1>Cause List</h1><iframe src="/form"></iframe></body></html>"#;

const FORM: &str = r#"<html><body>
<form action="/results" method="get">
  <select name="complex">
    <option value="">Select</option>
    <option value="ph">Patiala House Court Complex</option>
    <option value="sk">Saket Court Complex</option>
  </select>
  <input name="date" type="text">
  <button type="submit">Search</button>
</form>
</body></html>"#;

async fn results(Query(params): Query<HashMap<String, String>>) -> Html<String> {
    let matched = params.get("complex").map(String::as_str) == Some("sk")
        && params.get("date").map(String::as_str) == Some("17-10-2026");
    let body = if matched {
        r#"<a href="/files/court-1.pdf">Court 1</a><a href="/files/court-2.pdf">Court 2</a>"#
    } else {
        "No records found"
    };
    Html(format!("<html><body>{}</body></html>", body))
}

async fn pdf() -> impl IntoResponse {
    (
        [
            (header::CONTENT_TYPE, "application/pdf"),
            (header::CONTENT_DISPOSITION, "attachment"),
        ],
        "%PDF-1.4\n%%EOF\n",
    )
}

async fn serve_site() -> SocketAddr {
    let app = Router::new()
        .route("/", get(|| async { Html(OUTER) }))
        .route("/form", get(|| async { Html(FORM) }))
        .route("/results", get(results))
        .route("/files/court-1.pdf", get(pdf))
        .route("/files/court-2.pdf", get(pdf));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

#[tokio::test]
#[ignore = "requires a local Chrome"]
async fn test_run_downloads_and_renames_cause_lists() {
    let addr = serve_site().await;
    let temp = tempfile::tempdir().unwrap();
    let dir = temp.path().join("Court PDFs");

    let mut config = Config::default();
    config.browser.headless = true;
    config.browser.debug_port = 9340;
    config.browser.profile_dir = Some(temp.path().join("profile"));
    config.site.url = format!("http://{}/", addr);
    config.site.wait_timeout_secs = 15;
    config.download.directory = dir.clone();
    config.download.completion_timeout_secs = 30;
    config.download.screenshot_on_error = false;

    let runner = CauseListRunner::new(Arc::new(config));
    let request = CauseListRequest::parse("2026-10-17", "Saket Court Complex").unwrap();
    let outcome = runner.run(&request).await.unwrap();

    assert_eq!(outcome.files.len(), 2);
    assert_eq!(outcome.directory, dir);
    for n in 1..=2 {
        let expected = dir.join(format!("Saket_Court_Complex_2026-10-17_{}.pdf", n));
        assert!(expected.is_file(), "missing {}", expected.display());
        assert!(outcome.files.contains(&expected));
    }
}

#[tokio::test]
#[ignore = "requires a local Chrome"]
async fn test_run_without_links_reports_no_cause_lists() {
    let addr = serve_site().await;
    let temp = tempfile::tempdir().unwrap();

    let mut config = Config::default();
    config.browser.headless = true;
    config.browser.debug_port = 9341;
    config.browser.profile_dir = Some(temp.path().join("profile"));
    config.site.url = format!("http://{}/", addr);
    config.site.wait_timeout_secs = 5;
    config.download.directory = temp.path().join("Court PDFs");
    config.download.screenshot_on_error = false;

    let runner = CauseListRunner::new(Arc::new(config));
    let request = CauseListRequest::parse("2026-10-17", "Patiala House Court Complex").unwrap();
    let err = runner.run(&request).await.unwrap_err();

    assert!(matches!(err, causelist_scraper::ScraperError::NoCauseLists { .. }));
}
