//! Download dialog state machine
//!
//! ```text
//! Idle ──start──▶ Downloading ──▶ Success ──(delay)──▶ Dismissed
//!  ▲                   │
//!  └──────retry─── Error ◀┘
//! ```
//!
//! A flow can only be opened for a record with a hub model id. Failures are
//! never retried automatically; the user has to call [`DownloadFlow::retry`]
//! and then start again.

use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::broadcast;
use tracing::{error, info};

use super::hub::{artifact_file_name, ArtifactFetcher};
use super::snippet::download_command;
use crate::catalog::ModelRecord;
use crate::config::SelectorConfig;
use crate::error::{Error, Result};

/// Message shown when the artifact could not be fetched or saved.
pub const DOWNLOAD_FAILURE_MESSAGE: &str =
    "Failed to download model. Please try accessing the model directly on Hugging Face.";

const STATE_CHANNEL_CAPACITY: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadState {
    Idle,
    Downloading,
    Success { path: PathBuf },
    Error { message: String },
    /// The dialog has been closed
    Dismissed,
}

impl DownloadState {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Downloading => "downloading",
            Self::Success { .. } => "success",
            Self::Error { .. } => "error",
            Self::Dismissed => "dismissed",
        }
    }
}

/// One download dialog for one record.
pub struct DownloadFlow {
    model_id: String,
    model_name: String,
    download_dir: PathBuf,
    dismiss_delay: Duration,
    state: DownloadState,
    state_tx: broadcast::Sender<DownloadState>,
}

impl DownloadFlow {
    /// Open a dialog for `record`, starting in [`DownloadState::Idle`].
    pub fn open(
        record: &ModelRecord,
        download_dir: impl Into<PathBuf>,
        dismiss_delay: Duration,
    ) -> Result<Self> {
        let model_id = record
            .downloadable_id()
            .ok_or_else(|| Error::NotDownloadable(record.name.clone()))?;
        let (state_tx, _) = broadcast::channel(STATE_CHANNEL_CAPACITY);

        Ok(Self {
            model_id: model_id.to_string(),
            model_name: record.name.clone(),
            download_dir: download_dir.into(),
            dismiss_delay,
            state: DownloadState::Idle,
            state_tx,
        })
    }

    pub fn with_config(record: &ModelRecord, config: &SelectorConfig) -> Result<Self> {
        Self::open(record, config.download_dir.clone(), config.dismiss_delay())
    }

    /// Receive every state the flow enters from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<DownloadState> {
        self.state_tx.subscribe()
    }

    pub fn state(&self) -> &DownloadState {
        &self.state
    }

    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    /// Where a successful download will be written.
    pub fn artifact_path(&self) -> PathBuf {
        self.download_dir.join(artifact_file_name(&self.model_id))
    }

    pub fn command_snippet(&self) -> String {
        download_command(&self.model_id)
    }

    /// Fetch and save the config artifact.
    ///
    /// Only valid from `Idle`. A failed fetch is not an `Err` here: the flow
    /// moves to `Error` and the returned state carries the message.
    pub async fn start(&mut self, fetcher: &dyn ArtifactFetcher) -> Result<&DownloadState> {
        if self.state != DownloadState::Idle {
            return Err(self.invalid("start"));
        }

        self.transition(DownloadState::Downloading);
        info!("Downloading config for {}", self.model_id);

        let outcome = match fetcher.fetch_config(&self.model_id).await {
            Ok(bytes) => self.save_artifact(&bytes).await,
            Err(e) => Err(e),
        };

        match outcome {
            Ok(path) => {
                info!("Saved {} config to {:?}", self.model_id, path);
                self.transition(DownloadState::Success { path });
            }
            Err(e) => {
                error!("Download error for {}: {}", self.model_id, e);
                self.transition(DownloadState::Error {
                    message: DOWNLOAD_FAILURE_MESSAGE.to_string(),
                });
            }
        }

        Ok(&self.state)
    }

    /// "Try Again": go back to `Idle` without fetching.
    pub fn retry(&mut self) -> Result<()> {
        match self.state {
            DownloadState::Error { .. } => {
                self.transition(DownloadState::Idle);
                Ok(())
            }
            _ => Err(self.invalid("retry")),
        }
    }

    /// Keep the success state on screen for the dismiss delay, then close.
    pub async fn dismiss_after_success(&mut self) -> Result<()> {
        if !matches!(self.state, DownloadState::Success { .. }) {
            return Err(self.invalid("auto-dismiss"));
        }

        tokio::time::sleep(self.dismiss_delay).await;
        self.transition(DownloadState::Dismissed);
        Ok(())
    }

    /// Close the dialog. Not allowed while a download is in flight.
    pub fn close(&mut self) -> Result<()> {
        match self.state {
            DownloadState::Downloading => Err(self.invalid("close")),
            DownloadState::Dismissed => Ok(()),
            _ => {
                self.transition(DownloadState::Dismissed);
                Ok(())
            }
        }
    }

    async fn save_artifact(&self, bytes: &[u8]) -> Result<PathBuf> {
        let dest = self.artifact_path();
        if dest.parent() != Some(self.download_dir.as_path()) {
            return Err(Error::DownloadFailed(format!(
                "refusing to write {} outside {}",
                dest.display(),
                self.download_dir.display()
            )));
        }

        tokio::fs::create_dir_all(&self.download_dir).await?;
        tokio::fs::write(&dest, bytes).await?;
        Ok(dest)
    }

    fn transition(&mut self, next: DownloadState) {
        self.state = next;
        // No subscribers is fine.
        let _ = self.state_tx.send(self.state.clone());
    }

    fn invalid(&self, action: &'static str) -> Error {
        Error::InvalidTransition {
            from: self.state.name(),
            action,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::record::fixtures::record;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StubFetcher {
        fail: bool,
        calls: AtomicUsize,
    }

    impl StubFetcher {
        fn ok() -> Self {
            Self {
                fail: false,
                calls: AtomicUsize::new(0),
            }
        }

        fn failing() -> Self {
            Self {
                fail: true,
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ArtifactFetcher for StubFetcher {
        async fn fetch_config(&self, _model_id: &str) -> Result<Vec<u8>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(Error::DownloadFailed("HTTP 404 Not Found".to_string()))
            } else {
                Ok(br#"{"model_type": "llama"}"#.to_vec())
            }
        }

        fn model_page_url(&self, model_id: &str) -> String {
            format!("https://hub.test/{model_id}")
        }
    }

    fn downloadable() -> ModelRecord {
        let mut r = record("foo");
        r.model_id = Some("acme/foo".to_string());
        r
    }

    fn drain(rx: &mut broadcast::Receiver<DownloadState>) -> Vec<&'static str> {
        let mut seen = Vec::new();
        while let Ok(state) = rx.try_recv() {
            seen.push(state.name());
        }
        seen
    }

    #[test]
    fn record_without_model_id_cannot_open() {
        let result = DownloadFlow::open(&record("bare"), ".", Duration::from_secs(2));
        assert!(matches!(result, Err(Error::NotDownloadable(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn successful_download_then_auto_dismiss() {
        let dir = tempfile::tempdir().unwrap();
        let mut flow =
            DownloadFlow::open(&downloadable(), dir.path(), Duration::from_secs(2)).unwrap();
        let mut rx = flow.subscribe();
        assert_eq!(flow.state(), &DownloadState::Idle);

        let fetcher = StubFetcher::ok();
        let state = flow.start(&fetcher).await.unwrap().clone();
        let expected = dir.path().join("acme_foo_config.json");
        assert_eq!(state, DownloadState::Success { path: expected.clone() });
        assert_eq!(
            std::fs::read_to_string(&expected).unwrap(),
            r#"{"model_type": "llama"}"#
        );

        let before = tokio::time::Instant::now();
        flow.dismiss_after_success().await.unwrap();
        assert!(before.elapsed() >= Duration::from_secs(2));

        assert_eq!(drain(&mut rx), vec!["downloading", "success", "dismissed"]);
        assert_eq!(fetcher.calls(), 1);
    }

    #[tokio::test]
    async fn failed_fetch_waits_for_retry() {
        let dir = tempfile::tempdir().unwrap();
        let mut flow =
            DownloadFlow::open(&downloadable(), dir.path(), Duration::from_secs(2)).unwrap();
        let mut rx = flow.subscribe();
        let fetcher = StubFetcher::failing();

        let state = flow.start(&fetcher).await.unwrap().clone();
        assert_eq!(
            state,
            DownloadState::Error {
                message: DOWNLOAD_FAILURE_MESSAGE.to_string()
            }
        );
        assert!(!flow.artifact_path().exists());

        flow.retry().unwrap();
        assert_eq!(flow.state(), &DownloadState::Idle);
        assert_eq!(drain(&mut rx), vec!["downloading", "error", "idle"]);
        assert_eq!(fetcher.calls(), 1);
    }

    #[tokio::test]
    async fn start_is_only_valid_from_idle() {
        let dir = tempfile::tempdir().unwrap();
        let mut flow =
            DownloadFlow::open(&downloadable(), dir.path(), Duration::from_secs(2)).unwrap();
        let fetcher = StubFetcher::ok();
        flow.start(&fetcher).await.unwrap();

        let err = flow.start(&fetcher).await.unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidTransition {
                from: "success",
                action: "start"
            }
        ));
        assert_eq!(fetcher.calls(), 1);
    }

    #[tokio::test]
    async fn traversal_model_id_stays_in_download_dir() {
        let root = tempfile::tempdir().unwrap();
        let downloads = root.path().join("downloads");
        let mut r = record("evil");
        r.model_id = Some("acme/../../../escaped".to_string());
        let mut flow = DownloadFlow::open(&r, &downloads, Duration::from_secs(2)).unwrap();

        let state = flow.start(&StubFetcher::ok()).await.unwrap().clone();

        let DownloadState::Success { path } = state else {
            panic!("expected success, got {:?}", state);
        };
        assert_eq!(path.parent(), Some(downloads.as_path()));
        assert!(path.exists());
        assert!(!root.path().join("escaped_config.json").exists());
        assert_eq!(std::fs::read_dir(root.path()).unwrap().count(), 1);
    }

    #[test]
    fn retry_and_dismiss_need_matching_state() {
        let mut flow = DownloadFlow::open(&downloadable(), ".", Duration::from_secs(2)).unwrap();
        assert!(flow.retry().is_err());
        assert!(flow.close().is_ok());
        assert_eq!(flow.state(), &DownloadState::Dismissed);
    }

    #[tokio::test]
    async fn dismiss_requires_success() {
        let mut flow = DownloadFlow::open(&downloadable(), ".", Duration::from_millis(1)).unwrap();
        assert!(flow.dismiss_after_success().await.is_err());
        assert_eq!(flow.state(), &DownloadState::Idle);
    }

    #[test]
    fn snippet_uses_model_id() {
        let flow = DownloadFlow::open(&downloadable(), ".", Duration::from_secs(2)).unwrap();
        assert!(flow.command_snippet().contains("huggingface-cli download acme/foo"));
        assert_eq!(flow.model_name(), "Model foo");
    }
}
