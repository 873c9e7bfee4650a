use std::path::Path;

use sprig_client::{HttpClient, ReqwestDownloader, ReqwestFetcher};
use sprig_core::AppError;
use sprig_core::traits::{AssetDownloader, Fetcher};

use crate::common::{IMAGE_BYTES, local_http, spawn_server};

#[tokio::test]
async fn fetches_profile_page() {
    let base = spawn_server().await;
    let fetcher = ReqwestFetcher::new(local_http());

    let html = fetcher.fetch(&format!("{base}/jane")).await.unwrap();

    assert!(html.contains(r#"id="profile-title""#));
}

#[tokio::test]
async fn non_success_status_is_http_status_error() {
    let base = spawn_server().await;
    let fetcher = ReqwestFetcher::new(local_http());

    let err = fetcher.fetch(&format!("{base}/broken")).await.unwrap_err();
    assert!(matches!(err, AppError::HttpStatus { status: 500, .. }));

    let err = fetcher.fetch(&format!("{base}/nope")).await.unwrap_err();
    assert!(matches!(err, AppError::HttpStatus { status: 404, .. }));
}

#[tokio::test]
async fn empty_body_is_malformed() {
    let base = spawn_server().await;
    let fetcher = ReqwestFetcher::new(local_http());

    let err = fetcher.fetch(&format!("{base}/empty")).await.unwrap_err();
    assert!(matches!(err, AppError::MalformedBody(_)));
}

#[tokio::test]
async fn non_utf8_body_is_malformed() {
    let base = spawn_server().await;
    let fetcher = ReqwestFetcher::new(local_http());

    let err = fetcher.fetch(&format!("{base}/latin1")).await.unwrap_err();
    assert!(matches!(err, AppError::MalformedBody(_)), "got {err:?}");
    assert!(err.to_string().contains("not UTF-8"));
}

#[tokio::test]
async fn connection_refused_is_network_error() {
    // Bind then drop to get a port nothing listens on.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let fetcher = ReqwestFetcher::new(local_http());
    let err = fetcher.fetch(&format!("http://{addr}/jane")).await.unwrap_err();

    assert!(matches!(err, AppError::NetworkError(_)), "got {err:?}");
    assert!(err.is_fetch_error());
}

#[tokio::test]
async fn private_guard_blocks_local_server_by_default() {
    let base = spawn_server().await;
    let fetcher = ReqwestFetcher::new(HttpClient::new().unwrap());

    let err = fetcher.fetch(&format!("{base}/jane")).await.unwrap_err();
    assert!(err.to_string().contains("Blocked request"));
}

#[tokio::test]
async fn downloads_image_bytes() {
    let base = spawn_server().await;
    let dir = tempfile::tempdir().unwrap();
    let dest = dir.path().join("jane.jpg");
    let downloader = ReqwestDownloader::new(local_http());

    let written = downloader
        .download(&format!("{base}/img/ok.jpg"), &dest)
        .await
        .unwrap();

    assert_eq!(written, IMAGE_BYTES.len() as u64);
    assert_eq!(std::fs::read(&dest).unwrap(), IMAGE_BYTES);
}

#[tokio::test]
async fn download_truncates_existing_file() {
    let base = spawn_server().await;
    let dir = tempfile::tempdir().unwrap();
    let dest = dir.path().join("jane.jpg");
    std::fs::write(&dest, vec![0u8; 4096]).unwrap();

    ReqwestDownloader::new(local_http())
        .download(&format!("{base}/img/ok.jpg"), &dest)
        .await
        .unwrap();

    assert_eq!(std::fs::read(&dest).unwrap().len(), IMAGE_BYTES.len());
}

#[tokio::test]
async fn download_404_is_download_error_and_writes_nothing() {
    let base = spawn_server().await;
    let dir = tempfile::tempdir().unwrap();
    let dest = dir.path().join("jane.jpg");

    let err = ReqwestDownloader::new(local_http())
        .download(&format!("{base}/img/missing.jpg"), &dest)
        .await
        .unwrap_err();

    match &err {
        AppError::DownloadError { reason, .. } => assert_eq!(reason, "HTTP 404"),
        other => panic!("unexpected error: {other}"),
    }
    assert!(!err.is_fatal());
    assert!(!Path::new(&dest).exists());
}

#[tokio::test]
async fn download_into_missing_directory_fails() {
    let base = spawn_server().await;
    let dir = tempfile::tempdir().unwrap();
    let dest = dir.path().join("missing").join("jane.jpg");

    let err = ReqwestDownloader::new(local_http())
        .download(&format!("{base}/img/ok.jpg"), &dest)
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::DownloadError { .. }));
}
