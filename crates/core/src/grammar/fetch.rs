//! Remote grammar retrieval.

use crate::error::{Result, TreescopeError};
use async_trait::async_trait;

/// Downloads grammar libraries that are missing from the local cache.
#[async_trait]
pub trait GrammarFetcher: Send + Sync {
    /// Fetch the raw bytes of `file_name` (e.g. `tree-sitter-go.so`).
    async fn fetch(&self, file_name: &str) -> Result<Vec<u8>>;
}

/// Fetches grammar libraries over HTTP from `<base_url>/<file_name>`.
pub struct HttpGrammarFetcher {
    client: reqwest::Client,
    base_url: String,
}

impl HttpGrammarFetcher {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    pub fn url_for(&self, file_name: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), file_name)
    }
}

#[async_trait]
impl GrammarFetcher for HttpGrammarFetcher {
    async fn fetch(&self, file_name: &str) -> Result<Vec<u8>> {
        let url = self.url_for(file_name);
        tracing::info!("Downloading grammar from {}", url);

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(TreescopeError::Internal(format!(
                "Failed to download {}: HTTP {}",
                url, status
            )));
        }
        let bytes = response.bytes().await?;
        Ok(bytes.to_vec())
    }
}
