//! In-memory record store, filled once per session

use tracing::{error, info};

use super::record::ModelRecord;
use super::source::RecordSource;

/// Message shown to the user when the catalog cannot be loaded.
pub const LOAD_FAILURE_MESSAGE: &str = "Failed to load models. Please try again later.";

/// Load status of the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    /// No load has completed yet
    Loading,
    Ready,
    /// The last load failed; holds the user-facing message
    Failed(String),
}

/// Holds the full, unfiltered record list.
#[derive(Debug)]
pub struct RecordStore {
    records: Vec<ModelRecord>,
    state: LoadState,
}

impl Default for RecordStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordStore {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            state: LoadState::Loading,
        }
    }

    /// A store that is already loaded with `records`.
    pub fn with_records(records: Vec<ModelRecord>) -> Self {
        Self {
            records,
            state: LoadState::Ready,
        }
    }

    /// Fetch every record from `source` once.
    ///
    /// On success the contents are replaced and any earlier error is cleared.
    /// On failure the store is left empty and the failure message is kept.
    pub async fn load(&mut self, source: &dyn RecordSource) -> &LoadState {
        info!("Loading catalog from {}", source.describe());

        match source.fetch_all().await {
            Ok(records) => {
                info!("Catalog loaded: {} models", records.len());
                self.records = records;
                self.state = LoadState::Ready;
            }
            Err(e) => {
                error!("Error loading models: {}", e);
                self.records.clear();
                self.state = LoadState::Failed(LOAD_FAILURE_MESSAGE.to_string());
            }
        }

        &self.state
    }

    pub fn records(&self) -> &[ModelRecord] {
        &self.records
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

}
