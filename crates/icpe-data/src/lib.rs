//! Dataset loading, record store and filter catalog for the ICPE map

pub mod catalog;
pub mod features;
pub mod sources;
pub mod store;

use tokio::task::JoinError;
use thiserror::Error;

// Re-exports
pub use catalog::{FilterCatalog, FilterDefinition};
pub use sources::{DatasetSource, FileSource, HttpSource, RetryingSource, source_from_settings};
pub use store::RecordStore;

/// Errors that prevent the dataset from loading
///
/// Every variant is fatal to startup; there is no partial dataset.
#[derive(Error, Debug)]
pub enum DataError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP status {status} from {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("GeoJSON parsing error: {0}")]
    Parse(#[from] geojson::Error),

    #[error("Expected a GeoJSON FeatureCollection, found a {0}")]
    NotFeatureCollection(&'static str),

    #[error("Join error: {0}")]
    Join(#[from] JoinError),
}
