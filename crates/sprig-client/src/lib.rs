pub mod downloader;
pub mod fetcher;
pub mod http;

pub use downloader::ReqwestDownloader;
pub use fetcher::ReqwestFetcher;
pub use http::HttpClient;
