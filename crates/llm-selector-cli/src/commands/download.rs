use anyhow::{bail, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};
use tracing::debug;

use llm_selector_core::{
    ArtifactFetcher, DownloadFlow, DownloadState, Error, HubClient, ModelRecord,
};

use super::{confirm, load_catalog, Context};
use crate::style::Theme;
use crate::view;

/// How an interactive download dialog behaves
#[derive(Debug, Clone, Copy, Default)]
pub struct DialogOptions {
    /// Skip the confirmation prompt and fail instead of offering a retry
    pub assume_yes: bool,
    /// Keep the success message up for the dismiss delay before closing
    pub auto_dismiss: bool,
    /// Show a spinner while fetching
    pub progress: bool,
}

pub async fn execute(
    ctx: &Context,
    model: &str,
    output_dir: Option<PathBuf>,
    yes: bool,
) -> Result<()> {
    let catalog = load_catalog(ctx).await?;
    let record = catalog.find(model)?;
    if !record.is_downloadable() {
        bail!(Error::NotDownloadable(record.name.clone()));
    }

    let download_dir = output_dir.unwrap_or_else(|| ctx.config.download_dir.clone());
    let mut flow = DownloadFlow::open(record, download_dir, ctx.config.dismiss_delay())?;
    let fetcher = HubClient::from_config(&ctx.config);

    let mut input = BufReader::new(tokio::io::stdin()).lines();
    let mut out = std::io::stdout();
    let options = DialogOptions {
        assume_yes: yes,
        auto_dismiss: false,
        progress: true,
    };

    run_dialog(
        &mut flow,
        record,
        &fetcher,
        &mut input,
        &mut out,
        &ctx.theme,
        options,
    )
    .await?;
    Ok(())
}

/// Drive one download dialog until it is closed.
///
/// Returns the saved path on success, `None` when the user backs out.
pub async fn run_dialog<R, W>(
    flow: &mut DownloadFlow,
    record: &ModelRecord,
    fetcher: &dyn ArtifactFetcher,
    input: &mut Lines<R>,
    out: &mut W,
    theme: &Theme,
    options: DialogOptions,
) -> Result<Option<PathBuf>>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let page_url = fetcher.model_page_url(flow.model_id());
    write!(
        out,
        "{}",
        view::render_download_dialog(record, &flow.command_snippet(), &page_url, theme)
    )?;

    loop {
        if !options.assume_yes {
            writeln!(out)?;
            let question = format!("Download config to {}?", flow.artifact_path().display());
            if !confirm(input, out, &question, true).await? {
                flow.close()?;
                return Ok(None);
            }
        }

        let spinner = if options.progress {
            fetch_spinner(flow.model_id())
        } else {
            ProgressBar::hidden()
        };

        // Render every state the flow passes through while the fetch runs.
        let mut states = flow.subscribe();
        let outcome = {
            let start = flow.start(fetcher);
            tokio::pin!(start);
            loop {
                tokio::select! {
                    biased;
                    result = &mut start => break result.map(DownloadState::clone),
                    Ok(state) = states.recv() => {
                        spinner.suspend(|| render_state(out, &state, &page_url, theme))?;
                    }
                }
            }
        };
        while let Ok(state) = states.try_recv() {
            render_state(out, &state, &page_url, theme)?;
        }
        spinner.finish_and_clear();

        let state = outcome?;
        debug!("Download dialog for {} is {}", flow.model_id(), state.name());

        match state {
            DownloadState::Success { path } => {
                if options.auto_dismiss {
                    flow.dismiss_after_success().await?;
                } else {
                    flow.close()?;
                }
                return Ok(Some(path));
            }
            DownloadState::Error { message } => {
                if options.assume_yes {
                    flow.close()?;
                    bail!(Error::DownloadFailed(message));
                }
                if !confirm(input, out, "Try again?", false).await? {
                    flow.close()?;
                    return Ok(None);
                }
                flow.retry()?;
            }
            other => bail!(Error::InvalidTransition {
                from: other.name(),
                action: "finish",
            }),
        }
    }
}

fn render_state<W: Write>(
    out: &mut W,
    state: &DownloadState,
    page_url: &str,
    theme: &Theme,
) -> std::io::Result<()> {
    write!(out, "{}", view::render_download_state(state, page_url, theme))?;
    out.flush()
}

fn fetch_spinner(model_id: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) =
        ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}")
    {
        pb.set_style(style);
    }
    pb.set_message(format!("Downloading {}", model_id));
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
