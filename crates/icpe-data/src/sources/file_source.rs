use std::path::PathBuf;
use async_trait::async_trait;

use super::DatasetSource;
use crate::DataError;

/// Dataset stored on the local filesystem
pub struct FileSource {
    path: PathBuf,
    name: String,
}

impl FileSource {
    pub fn new(path: PathBuf) -> Self {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown.geo.json")
            .to_string();

        Self { path, name }
    }
}

#[async_trait]
impl DatasetSource for FileSource {
    async fn fetch(&self) -> Result<String, DataError> {
        tracing::debug!("Reading dataset from {:?}", self.path);
        Ok(tokio::fs::read_to_string(&self.path).await?)
    }

    fn source_name(&self) -> &str {
        &self.name
    }
}
