//! llm-selector core - catalog browsing for language-model metadata
//!
//! Loads model records from a hosted table, filters them locally and fetches
//! `config.json` artifacts from a model hub.
//!
//! # Example
//!
//! ```ignore
//! use llm_selector_core::{CatalogController, SelectorConfig, SupabaseSource, Modality};
//!
//! let config = SelectorConfig::load(None)?;
//! let source = SupabaseSource::from_config(&config)?;
//!
//! let mut catalog = CatalogController::default();
//! catalog.load(&source).await?;
//! catalog.toggle_modality(Modality::Vision);
//! println!("{} models found", catalog.view().matched());
//! ```

pub mod catalog;
pub mod config;
pub mod download;
pub mod error;

pub use config::SelectorConfig;
pub use error::{Error, Result};

pub use catalog::{
    find_record, CatalogController, CatalogView, FilterCriteria, FilterStage, HostingType,
    JsonFileSource, LicenseType, LoadState, Modality, ModelRecord, OciAvailability,
    RecordSource, RecordStore, SupabaseSource, LOAD_FAILURE_MESSAGE,
};

pub use download::{
    artifact_file_name, download_command, requirements, ArtifactFetcher, DownloadFlow,
    DownloadState, HubClient, DOWNLOAD_FAILURE_MESSAGE,
};
