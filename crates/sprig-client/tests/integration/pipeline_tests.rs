use sprig_client::{ReqwestDownloader, ReqwestFetcher};
use sprig_core::{
    AppError, FsStore, ImageOutcome, OutputLayout, ProfileExtractor, ProfileRecord, ProfileUrl,
    ScrapeService,
};

use crate::common::{IMAGE_BYTES, local_http, spawn_server};

fn service(
    base: &str,
    dir: &std::path::Path,
) -> ScrapeService<ReqwestFetcher, FsStore, ReqwestDownloader> {
    let http = local_http();
    ScrapeService::new(
        ReqwestFetcher::new(http.clone()),
        FsStore,
        ReqwestDownloader::new(http),
        ProfileExtractor::linktree().unwrap(),
    )
    .with_profile_url(ProfileUrl::new(base).unwrap())
    .with_layout(OutputLayout::new(dir))
}

#[tokio::test]
async fn writes_json_only() -> anyhow::Result<()> {
    let base = spawn_server().await;
    let dir = tempfile::tempdir()?;

    let outcome = service(&base, dir.path()).scrape("jane").await?;

    assert!(matches!(outcome.image, ImageOutcome::Skipped));
    let record: ProfileRecord =
        serde_json::from_str(&std::fs::read_to_string(dir.path().join("Jane Doe.json"))?)?;
    assert_eq!(record.title, "Jane | Linktree");
    assert_eq!(record.links["My Site"], "https://example.com");
    assert_eq!(record.icon_links["Instagram"], "https://instagram.com/jane");
    assert!(!dir.path().join("jane.jpg").exists());
    Ok(())
}

#[tokio::test]
async fn image_404_keeps_json() -> anyhow::Result<()> {
    let base = spawn_server().await;
    let dir = tempfile::tempdir()?;

    let outcome = service(&base, dir.path()).scrape("jane-404-image").await?;

    assert!(dir.path().join("Jane Doe.json").exists());
    assert!(!dir.path().join("jane-404-image.jpg").exists());
    assert!(matches!(
        outcome.image,
        ImageOutcome::Failed(AppError::DownloadError { .. })
    ));
    Ok(())
}

#[tokio::test]
async fn saves_image_under_identifier() -> anyhow::Result<()> {
    let base = spawn_server().await;
    let dir = tempfile::tempdir()?;

    let outcome = service(&base, dir.path()).scrape("jane-with-image").await?;

    assert!(matches!(outcome.image, ImageOutcome::Saved { .. }));
    assert_eq!(std::fs::read(dir.path().join("jane-with-image.jpg"))?, IMAGE_BYTES);
    assert!(dir.path().join("Jane Doe.json").exists());
    Ok(())
}

#[tokio::test]
async fn missing_profile_title_writes_nothing() -> anyhow::Result<()> {
    let base = spawn_server().await;
    let dir = tempfile::tempdir()?;

    let err = service(&base, dir.path())
        .scrape("no-profile-title")
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::ValidationError { .. }));
    assert_eq!(std::fs::read_dir(dir.path())?.count(), 0);
    Ok(())
}
