use std::future::Future;
use std::path::Path;

use crate::error::AppError;

/// Fetches the raw HTML of a profile page.
///
/// Implementations must keep network failures, non-success statuses and
/// unusable bodies apart (`NetworkError`/`Timeout`, `HttpStatus`,
/// `MalformedBody`).
pub trait Fetcher: Send + Sync + Clone {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<String, AppError>> + Send;
}

/// Persists serialized profile bytes.
pub trait ProfileStore: Send + Sync + Clone {
    fn write(&self, bytes: &[u8], path: &Path)
    -> impl Future<Output = Result<(), AppError>> + Send;
}

/// Retrieves a binary asset and saves it to disk.
pub trait AssetDownloader: Send + Sync + Clone {
    /// Stream `url` into `dest`, creating or truncating it. Returns the
    /// number of bytes written. Every failure is a `DownloadError`.
    fn download(
        &self,
        url: &str,
        dest: &Path,
    ) -> impl Future<Output = Result<u64, AppError>> + Send;
}
