use async_trait::async_trait;

use super::DatasetSource;
use crate::DataError;

/// Dataset served over HTTP, fetched with a single GET
pub struct HttpSource {
    url: String,
    client: reqwest::Client,
}

impl HttpSource {
    pub fn new(url: String) -> Self {
        Self::with_client(url, reqwest::Client::new())
    }

    /// Use a preconfigured client (timeouts, proxies)
    pub fn with_client(url: String, client: reqwest::Client) -> Self {
        Self { url, client }
    }
}

#[async_trait]
impl DatasetSource for HttpSource {
    async fn fetch(&self) -> Result<String, DataError> {
        tracing::debug!("GET {}", self.url);

        let response = self.client.get(&self.url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(DataError::HttpStatus {
                url: self.url.clone(),
                status: status.as_u16(),
            });
        }

        Ok(response.text().await?)
    }

    fn source_name(&self) -> &str {
        &self.url
    }
}
