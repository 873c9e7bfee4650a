use sprig_core::error::AppError;
use sprig_core::traits::Fetcher;

use crate::http::HttpClient;

/// Fetches profile pages over HTTP.
#[derive(Clone)]
pub struct ReqwestFetcher {
    http: HttpClient,
}

impl ReqwestFetcher {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }
}

impl Fetcher for ReqwestFetcher {
    async fn fetch(&self, url: &str) -> Result<String, AppError> {
        let response = self.http.get(url).await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| AppError::MalformedBody(format!("Failed to read response body: {e}")))?;
        let body = String::from_utf8(bytes.to_vec())
            .map_err(|e| AppError::MalformedBody(format!("Response body from {url} is not UTF-8: {e}")))?;
        if body.trim().is_empty() {
            return Err(AppError::MalformedBody(format!("Empty response body from {url}")));
        }
        Ok(body)
    }
}
