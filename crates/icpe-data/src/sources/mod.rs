//! Dataset sources
//!
//! A source only retrieves the raw document; parsing and shuffling happen in
//! [`crate::RecordStore`].

pub mod file_source;
pub mod http_source;
pub mod retry;

use std::time::Duration;
use async_trait::async_trait;
use icpe_core::{DatasetLocation, Settings};

use crate::DataError;

pub use file_source::FileSource;
pub use http_source::HttpSource;
pub use retry::RetryingSource;

/// Trait for dataset sources
#[async_trait]
pub trait DatasetSource: Send + Sync {
    /// Retrieve the GeoJSON document
    async fn fetch(&self) -> Result<String, DataError>;

    /// Get the source name/path
    fn source_name(&self) -> &str;
}

/// Build the source named by the settings, wrapped with retry and backoff
pub fn source_from_settings(settings: &Settings) -> RetryingSource {
    let inner: Box<dyn DatasetSource> = match &settings.dataset {
        DatasetLocation::File { path } => Box::new(FileSource::new(path.clone())),
        DatasetLocation::Http { url } => Box::new(HttpSource::new(url.clone())),
    };

    RetryingSource::new(
        inner,
        settings.fetch_attempts,
        Duration::from_millis(settings.fetch_backoff_ms),
    )
}
