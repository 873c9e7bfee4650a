use std::path::Path;

use sprig_core::error::AppError;
use sprig_core::traits::AssetDownloader;
use tokio::io::AsyncWriteExt;

use crate::http::HttpClient;

/// Streams binary assets (profile images) to disk.
#[derive(Clone)]
pub struct ReqwestDownloader {
    http: HttpClient,
}

impl ReqwestDownloader {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    async fn stream_to_file(&self, url: &str, dest: &Path) -> Result<u64, String> {
        let mut response = self.http.get(url).await.map_err(|e| e.to_string())?;

        let status = response.status();
        if !status.is_success() {
            return Err(format!("HTTP {}", status.as_u16()));
        }

        let mut file = tokio::fs::File::create(dest)
            .await
            .map_err(|e| format!("failed to create file {}: {e}", dest.display()))?;

        let mut written = 0u64;
        let copied: Result<(), String> = async {
            while let Some(chunk) = response
                .chunk()
                .await
                .map_err(|e| format!("failed to read body: {e}"))?
            {
                file.write_all(&chunk)
                    .await
                    .map_err(|e| format!("failed to save image to file: {e}"))?;
                written += chunk.len() as u64;
            }
            file.flush()
                .await
                .map_err(|e| format!("failed to save image to file: {e}"))
        }
        .await;

        if let Err(reason) = copied {
            drop(file);
            // A truncated image is worse than none.
            let _ = tokio::fs::remove_file(dest).await;
            return Err(reason);
        }
        Ok(written)
    }
}

impl AssetDownloader for ReqwestDownloader {
    async fn download(&self, url: &str, dest: &Path) -> Result<u64, AppError> {
        let bytes = self
            .stream_to_file(url, dest)
            .await
            .map_err(|reason| AppError::DownloadError {
                url: url.to_string(),
                reason,
            })?;
        tracing::debug!(%url, bytes, "Downloaded asset");
        Ok(bytes)
    }
}
