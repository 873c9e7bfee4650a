use std::path::PathBuf;

use crate::config::{OutputLayout, ProfileUrl};
use crate::error::AppError;
use crate::extract::ProfileExtractor;
use crate::models::{ValidatedProfile, validate};
use crate::store::serialize;
use crate::traits::{AssetDownloader, Fetcher, ProfileStore};

/// What happened to the profile image.
#[derive(Debug)]
pub enum ImageOutcome {
    /// The page had no profile image.
    Skipped,
    Saved { path: PathBuf, bytes: u64 },
    /// Download failed. The JSON result is unaffected.
    Failed(AppError),
}

/// Result of a completed scrape.
#[derive(Debug)]
pub struct ScrapeOutcome {
    pub identifier: String,
    pub profile: ValidatedProfile,
    pub json_path: PathBuf,
    pub image: ImageOutcome,
}

/// Orchestrates the pipeline: fetch → extract → validate → write JSON → download image.
///
/// Generic over I/O via traits, so tests can run it without HTTP or disk.
/// Holds no per-profile state; one instance can serve many scrapes.
pub struct ScrapeService<F, S, D>
where
    F: Fetcher,
    S: ProfileStore,
    D: AssetDownloader,
{
    fetcher: F,
    store: S,
    downloader: D,
    extractor: ProfileExtractor,
    profile_url: ProfileUrl,
    layout: OutputLayout,
}

impl<F, S, D> ScrapeService<F, S, D>
where
    F: Fetcher,
    S: ProfileStore,
    D: AssetDownloader,
{
    pub fn new(fetcher: F, store: S, downloader: D, extractor: ProfileExtractor) -> Self {
        Self {
            fetcher,
            store,
            downloader,
            extractor,
            profile_url: ProfileUrl::default(),
            layout: OutputLayout::default(),
        }
    }

    pub fn with_profile_url(mut self, profile_url: ProfileUrl) -> Self {
        self.profile_url = profile_url;
        self
    }

    pub fn with_layout(mut self, layout: OutputLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Run the full pipeline for one profile identifier.
    ///
    /// 1. Fetch the profile page
    /// 2. Extract fields with the rule table
    /// 3. Validate mandatory fields
    /// 4. Serialize and write `<profileName>.json`
    /// 5. Download the image to `<identifier>.jpg` (failure is reported, not returned)
    pub async fn scrape(&self, identifier: &str) -> Result<ScrapeOutcome, AppError> {
        // 1. Fetch
        let url = self.profile_url.resolve(identifier)?;
        tracing::info!("Visiting {}", url);
        let html = self.fetcher.fetch(&url).await?;
        tracing::debug!("Fetched {} bytes of HTML", html.len());

        // 2 & 3. Extract + validate
        let record = self.extractor.extract_html(&html)?;
        let profile = validate(record)?;
        tracing::info!(
            profile_name = %profile.profile_name,
            links = profile.links.len(),
            icon_links = profile.icon_links.len(),
            "Extraction complete"
        );

        // 4. Persist
        let bytes = serialize(&profile)?;
        let json_path = self.layout.json_path(&profile.profile_name)?;
        self.store.write(&bytes, &json_path).await?;
        tracing::info!("Data successfully saved to {}", json_path.display());

        // 5. Image
        let image = match profile.image_url() {
            None => ImageOutcome::Skipped,
            Some(image_url) => {
                let dest = self.layout.image_path(identifier);
                match self.downloader.download(image_url, &dest).await {
                    Ok(bytes) => {
                        tracing::info!("Profile image successfully saved as {}", dest.display());
                        ImageOutcome::Saved { path: dest, bytes }
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "Failed to download profile image");
                        ImageOutcome::Failed(e)
                    }
                }
            }
        };

        Ok(ScrapeOutcome {
            identifier: identifier.to_string(),
            profile,
            json_path,
            image,
        })
    }
}
