//! Error types for the catalog core

use thiserror::Error;

/// Result type used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// The data source could not be reached or answered with an error.
    #[error("Failed to load catalog: {0}")]
    LoadFailed(String),

    /// The hub artifact fetch failed or returned a non-success status.
    #[error("Download failed: {0}")]
    DownloadFailed(String),

    /// The record has no hub model identifier, so there is nothing to download.
    #[error("Model {0} has no downloadable artifact")]
    NotDownloadable(String),

    #[error("Cannot {action} while download is {from}")]
    InvalidTransition {
        from: &'static str,
        action: &'static str,
    },

    #[error("Model not found: {0}")]
    RecordNotFound(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
