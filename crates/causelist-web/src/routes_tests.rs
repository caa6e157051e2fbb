use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use causelist_scraper::{CauseListFetcher, CauseListOutcome, ScraperError};
use tower::ServiceExt;

use super::*;

/// Fetcher that either "downloads" two files or times out.
pub(crate) struct MockFetcher {
    fail: bool,
    calls: AtomicUsize,
}

impl MockFetcher {
    pub(crate) fn ok() -> Self {
        Self {
            fail: false,
            calls: AtomicUsize::new(0),
        }
    }

    pub(crate) fn failing() -> Self {
        Self {
            fail: true,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl CauseListFetcher for MockFetcher {
    async fn fetch(&self, request: &CauseListRequest) -> Result<CauseListOutcome, ScraperError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(ScraperError::DownloadTimeout {
                expected: 2,
                completed: 0,
                timeout: std::time::Duration::from_secs(120),
            });
        }
        Ok(CauseListOutcome {
            run_id: uuid::Uuid::nil(),
            complex: request.complex,
            date: request.date,
            directory: PathBuf::from("/pdfs"),
            files: vec![PathBuf::from("/pdfs/a.pdf"), PathBuf::from("/pdfs/b.pdf")],
        })
    }
}

fn app_with(fetcher: Arc<MockFetcher>) -> (Router, Arc<AppState>) {
    let state = Arc::new(AppState::new(fetcher));
    (create_router(state.clone()), state)
}

fn post_download(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/download")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn read_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_index_serves_form() {
    let (app, _) = app_with(Arc::new(MockFetcher::ok()));
    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let html = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(html.contains("Download All PDFs"));
    assert!(html.contains("Rouse Avenue Court Complex"));
    assert!(html.contains("/download"));
}

#[tokio::test]
async fn test_download_success() {
    let fetcher = Arc::new(MockFetcher::ok());
    let (app, state) = app_with(fetcher.clone());

    let response = app
        .oneshot(post_download(
            r#"{"date":"2026-10-17","complexName":"Saket Court Complex"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: DownloadResponse = read_json(response).await;
    assert_eq!(
        body,
        DownloadResponse::success(
            "Downloaded 2 cause list PDF(s) for Saket Court Complex on 2026-10-17 into /pdfs"
        )
    );
    assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
    assert_eq!(state.runs_succeeded(), 1);
}

#[tokio::test]
async fn test_download_missing_date() {
    let fetcher = Arc::new(MockFetcher::ok());
    let (app, _) = app_with(fetcher.clone());

    let response = app
        .oneshot(post_download(r#"{"complexName":"Saket Court Complex"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: DownloadResponse = read_json(response).await;
    assert_eq!(body.status, "error");
    assert_eq!(body.message, "Please select a date.");
    assert_eq!(fetcher.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_download_unknown_complex() {
    let (app, _) = app_with(Arc::new(MockFetcher::ok()));

    let response = app
        .oneshot(post_download(
            r#"{"date":"2026-10-17","complexName":"Moon Court"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: DownloadResponse = read_json(response).await;
    assert!(body.message.contains("Moon Court"));
}

#[tokio::test]
async fn test_download_malformed_json() {
    let (app, _) = app_with(Arc::new(MockFetcher::ok()));

    let response = app.oneshot(post_download("{not json")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: DownloadResponse = read_json(response).await;
    assert_eq!(body.status, "error");
}

#[tokio::test]
async fn test_download_run_failure_is_generic() {
    let fetcher = Arc::new(MockFetcher::failing());
    let (app, state) = app_with(fetcher.clone());

    let response = app
        .oneshot(post_download(
            r#"{"date":"2026-10-17","complexName":"Dwarka Court Complex"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: DownloadResponse = read_json(response).await;
    assert_eq!(
        body,
        DownloadResponse::error("An error occurred. Check terminal.")
    );
    assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
    assert_eq!(state.runs_failed(), 1);
}

#[tokio::test]
async fn test_health() {
    let (app, _) = app_with(Arc::new(MockFetcher::ok()));
    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = read_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["runs"]["failed"], 0);
}

#[tokio::test]
async fn test_list_complexes() {
    let (app, _) = app_with(Arc::new(MockFetcher::ok()));
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/complexes")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let names: Vec<String> = read_json(response).await;
    assert_eq!(names.len(), 7);
    assert_eq!(names[0], "Patiala House Court Complex");
}

#[tokio::test]
async fn test_download_requires_post() {
    let (app, _) = app_with(Arc::new(MockFetcher::ok()));
    let response = app
        .oneshot(Request::builder().uri("/download").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}
