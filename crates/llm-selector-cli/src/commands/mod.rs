pub mod browse;
pub mod config;
pub mod download;
pub mod list;
pub mod show;
pub mod snippet;

use anyhow::Result;
use std::path::{Path, PathBuf};
use tokio::io::{AsyncBufRead, Lines};

use llm_selector_core::{
    CatalogController, JsonFileSource, RecordSource, SelectorConfig, SupabaseSource,
};

use crate::style::Theme;
use crate::view;
use crate::OutputFormat;

/// Settings shared by every command
pub struct Context {
    pub config: SelectorConfig,
    pub catalog_file: Option<PathBuf>,
    pub output_format: OutputFormat,
    pub theme: Theme,
}

impl Context {
    pub fn new(
        config_path: Option<&Path>,
        catalog_file: Option<PathBuf>,
        hub_url: Option<String>,
        output_format: OutputFormat,
        theme: Theme,
    ) -> Result<Self> {
        let mut config = SelectorConfig::load(config_path)?;
        if let Some(hub_url) = hub_url {
            config.hub_url = hub_url;
        }

        Ok(Self {
            config,
            catalog_file,
            output_format,
            theme,
        })
    }

    fn record_source(&self) -> Result<Box<dyn RecordSource>> {
        Ok(match &self.catalog_file {
            Some(path) => Box::new(JsonFileSource::new(path)),
            None => Box::new(SupabaseSource::from_config(&self.config)?),
        })
    }
}

/// Load the catalog once. A failed load is terminal: the message is shown on
/// its own and the process exits.
pub async fn load_catalog(ctx: &Context) -> Result<CatalogController> {
    let source = ctx.record_source()?;
    let mut controller = CatalogController::default();

    if controller.load(source.as_ref()).await.is_err() {
        let message = match controller.load_state() {
            llm_selector_core::LoadState::Failed(message) => message.clone(),
            _ => llm_selector_core::LOAD_FAILURE_MESSAGE.to_string(),
        };
        eprint!("{}", view::render_load_failure(&message, &ctx.theme));
        std::process::exit(1);
    }

    Ok(controller)
}

/// Ask a yes/no question on `input`. EOF counts as the default answer.
pub async fn confirm<R, W>(
    input: &mut Lines<R>,
    out: &mut W,
    question: &str,
    default: bool,
) -> Result<bool>
where
    R: AsyncBufRead + Unpin,
    W: std::io::Write,
{
    let hint = if default { "[Y/n]" } else { "[y/N]" };
    write!(out, "{} {} ", question, hint)?;
    out.flush()?;

    let answer = input.next_line().await?;
    Ok(match answer.as_deref().map(str::trim) {
        Some(a) if a.eq_ignore_ascii_case("y") || a.eq_ignore_ascii_case("yes") => true,
        Some(a) if a.eq_ignore_ascii_case("n") || a.eq_ignore_ascii_case("no") => false,
        _ => default,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncBufReadExt;

    #[tokio::test]
    async fn confirm_reads_answers_and_defaults() {
        let mut input = "y\nNO\n\n".as_bytes().lines();
        let mut out = Vec::new();

        assert!(confirm(&mut input, &mut out, "Go?", false).await.unwrap());
        assert!(!confirm(&mut input, &mut out, "Go?", true).await.unwrap());
        assert!(confirm(&mut input, &mut out, "Go?", true).await.unwrap());
        // EOF
        assert!(!confirm(&mut input, &mut out, "Go?", false).await.unwrap());

        assert!(String::from_utf8(out).unwrap().starts_with("Go? [y/N] Go? [Y/n]"));
    }
}
