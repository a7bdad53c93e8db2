//! Where catalog records come from

use async_trait::async_trait;
use reqwest::Client;
use std::cmp::Reverse;
use std::path::PathBuf;
use tracing::debug;

use super::record::ModelRecord;
use crate::config::SelectorConfig;
use crate::error::{Error, Result};

const MODELS_TABLE: &str = "llm_models";

/// A read-only source of model records.
///
/// Implementations return every record ordered by release date, newest first.
#[async_trait]
pub trait RecordSource: Send + Sync {
    async fn fetch_all(&self) -> Result<Vec<ModelRecord>>;

    /// Short description for logs.
    fn describe(&self) -> String;
}

/// Hosted Supabase table, queried through its PostgREST endpoint.
pub struct SupabaseSource {
    http_client: Client,
    base_url: String,
    anon_key: String,
}

impl SupabaseSource {
    pub fn new(base_url: &str, anon_key: &str) -> Result<Self> {
        let http_client = Client::builder()
            .user_agent(concat!("llm-selector/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::LoadFailed(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key: anon_key.to_string(),
        })
    }

    pub fn from_config(config: &SelectorConfig) -> Result<Self> {
        config.validate()?;
        Self::new(
            config.supabase_url.as_deref().unwrap_or_default(),
            config.supabase_anon_key.as_deref().unwrap_or_default(),
        )
    }

    /// `SELECT * FROM llm_models ORDER BY release_date DESC`
    pub fn query_url(&self) -> String {
        format!(
            "{}/rest/v1/{}?select=*&order=release_date.desc",
            self.base_url, MODELS_TABLE
        )
    }
}

#[async_trait]
impl RecordSource for SupabaseSource {
    async fn fetch_all(&self) -> Result<Vec<ModelRecord>> {
        let url = self.query_url();
        debug!("Fetching catalog from URL: {}", url);

        let response = self
            .http_client
            .get(&url)
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.anon_key)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| Error::LoadFailed(format!("HTTP request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::LoadFailed(format!("HTTP {} for {}: {}", status, url, body)));
        }

        let records: Vec<ModelRecord> = response
            .json()
            .await
            .map_err(|e| Error::LoadFailed(format!("Failed to decode records: {}", e)))?;

        debug!("Fetched {} records", records.len());
        Ok(records)
    }

    fn describe(&self) -> String {
        format!("supabase table {} at {}", MODELS_TABLE, self.base_url)
    }
}

/// A JSON array of records on disk, e.g. an exported snapshot of the table.
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl RecordSource for JsonFileSource {
    async fn fetch_all(&self) -> Result<Vec<ModelRecord>> {
        let raw = tokio::fs::read(&self.path).await.map_err(|e| {
            Error::LoadFailed(format!("Failed to read {}: {}", self.path.display(), e))
        })?;
        let mut records: Vec<ModelRecord> = serde_json::from_slice(&raw).map_err(|e| {
            Error::LoadFailed(format!("Failed to decode {}: {}", self.path.display(), e))
        })?;

        sort_by_release_date_desc(&mut records);
        Ok(records)
    }

    fn describe(&self) -> String {
        format!("file {}", self.path.display())
    }
}

/// Newest first, undated records first, like Postgres `ORDER BY ... DESC`.
pub fn sort_by_release_date_desc(records: &mut [ModelRecord]) {
    records.sort_by_key(|r| Reverse(r.release_date.map_or((1, None), |d| (0, Some(d)))));
}
