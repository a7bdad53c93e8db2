//! Model hub access: URLs and the `config.json` fetch

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::config::{SelectorConfig, DEFAULT_HUB_URL};
use crate::error::{Error, Result};

const CONFIG_FILE: &str = "config.json";

/// Fetches the configuration artifact of a hub model.
#[async_trait]
pub trait ArtifactFetcher: Send + Sync {
    async fn fetch_config(&self, model_id: &str) -> Result<Vec<u8>>;

    /// Page for the model on the hub, offered as a manual fallback.
    fn model_page_url(&self, model_id: &str) -> String;
}

/// HTTP client for a Hugging Face compatible hub
pub struct HubClient {
    base_url: String,
    http_client: Client,
}

impl Default for HubClient {
    fn default() -> Self {
        Self::new(DEFAULT_HUB_URL)
    }
}

impl HubClient {
    pub fn new(base_url: &str) -> Self {
        let http_client = Client::builder()
            .user_agent(concat!("llm-selector/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http_client,
        }
    }

    pub fn from_config(config: &SelectorConfig) -> Self {
        Self::new(&config.hub_url)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `<hub>/<model_id>/resolve/main/config.json`
    pub fn config_url(&self, model_id: &str) -> String {
        format!("{}/{}/resolve/main/{}", self.base_url, model_id, CONFIG_FILE)
    }
}

#[async_trait]
impl ArtifactFetcher for HubClient {
    async fn fetch_config(&self, model_id: &str) -> Result<Vec<u8>> {
        let url = self.config_url(model_id);
        debug!("Downloading from URL: {}", url);

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::DownloadFailed(format!("HTTP request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::DownloadFailed(format!(
                "HTTP {} for {}",
                response.status(),
                url
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| Error::DownloadFailed(format!("Failed to read response: {}", e)))?;

        debug!("Downloaded {} bytes for {}", bytes.len(), model_id);
        Ok(bytes.to_vec())
    }

    fn model_page_url(&self, model_id: &str) -> String {
        format!("{}/{}", self.base_url, model_id)
    }
}

/// Local file name for a downloaded config: `<owner>_<repo>_config.json`.
///
/// Every path separator becomes `_` and `..` is collapsed, so the name is a
/// single component whatever the database holds.
pub fn artifact_file_name(model_id: &str) -> String {
    let flat: String = model_id
        .chars()
        .map(|ch| if ch == '/' || ch == '\\' { '_' } else { ch })
        .collect();
    format!("{}_config.json", flat.replace("..", "_"))
}
