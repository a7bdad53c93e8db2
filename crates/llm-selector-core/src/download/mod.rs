//! Config downloads from the model hub.

pub mod flow;
pub mod hub;
pub mod snippet;

pub use flow::{DownloadFlow, DownloadState, DOWNLOAD_FAILURE_MESSAGE};
pub use hub::{artifact_file_name, ArtifactFetcher, HubClient};
pub use snippet::{download_command, requirements};
