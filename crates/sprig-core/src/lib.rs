pub mod batch;
pub mod config;
pub mod error;
pub mod extract;
pub mod models;
pub mod rules;
pub mod scrape;
pub mod store;
pub mod traits;


pub use batch::{BatchReport, BatchRunner, TracingBatchReporter};
pub use config::{OutputLayout, ProfileUrl};
pub use error::AppError;
pub use extract::{ProfileDocument, ProfileExtractor};
pub use models::{ProfileRecord, ValidatedProfile, validate};
pub use rules::ExtractionRules;
pub use scrape::{ImageOutcome, ScrapeOutcome, ScrapeService};
pub use store::{FsStore, serialize};
pub use traits::{AssetDownloader, Fetcher, ProfileStore};
