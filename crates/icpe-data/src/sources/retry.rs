use std::time::Duration;
use async_trait::async_trait;

use super::DatasetSource;
use crate::DataError;

/// Retries a failing source with exponential backoff
pub struct RetryingSource {
    inner: Box<dyn DatasetSource>,
    attempts: u32,
    base_delay: Duration,
}

impl RetryingSource {
    /// `attempts` counts the first try; values below 1 are treated as 1
    pub fn new(inner: Box<dyn DatasetSource>, attempts: u32, base_delay: Duration) -> Self {
        Self {
            inner,
            attempts: attempts.max(1),
            base_delay,
        }
    }

    fn delay_before_retry(&self, retry: u32) -> Duration {
        self.base_delay.saturating_mul(1u32 << retry.min(16))
    }
}

#[async_trait]
impl DatasetSource for RetryingSource {
    async fn fetch(&self) -> Result<String, DataError> {
        let mut attempt = 1;
        loop {
            match self.inner.fetch().await {
                Ok(text) => return Ok(text),
                Err(e) if attempt < self.attempts => {
                    let delay = self.delay_before_retry(attempt - 1);
                    tracing::warn!(
                        "Fetching {} failed (attempt {}/{}): {}; retrying in {:?}",
                        self.inner.source_name(),
                        attempt,
                        self.attempts,
                        e,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    fn source_name(&self) -> &str {
        self.inner.source_name()
    }
}
