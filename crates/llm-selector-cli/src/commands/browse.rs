//! Interactive catalog session
//!
//! The catalog is loaded once. Every command edits the filter criteria or
//! opens a dialog, and the filtered view is re-rendered afterwards.

use anyhow::{anyhow, bail, Result};
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};
use tracing::{debug, warn};

use llm_selector_core::{
    ArtifactFetcher, CatalogController, DownloadFlow, FilterCriteria, HostingType, HubClient,
    LicenseType, Modality, OciAvailability, SelectorConfig,
};

use super::download::{run_dialog, DialogOptions};
use super::{load_catalog, Context};
use crate::style::Theme;
use crate::view;

const HELP: &str = "\
Commands:
  search <text>        Set the search text (no text clears it)
  modality <name>      Toggle a required modality (text, vision, audio, realtime)
  license <name>       Toggle an accepted license (open_source, open_weights, closed_source)
  hosting <name>       Toggle an accepted hosting type (api_based, self_hosted)
  oci <name>           Toggle an accepted OCI catalog (generative_ai, data_science)
  prod                 Toggle production-ready only
  clear                Clear all filters
  list                 Show the current results
  show <n>             Show the full card of result n
  download <n>         Open the download dialog for result n
  help                 Show this help
  quit                 Leave the session
";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowseCommand {
    Search(String),
    Modality(Modality),
    License(LicenseType),
    Hosting(HostingType),
    Oci(OciAvailability),
    ProductionOnly,
    Clear,
    List,
    Show(usize),
    Download(usize),
    Help,
    Quit,
}

impl BrowseCommand {
    /// Parse one input line. A blank line re-lists the results.
    pub fn parse(line: &str) -> Result<Self> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        Ok(match word.to_ascii_lowercase().as_str() {
            "" | "list" | "ls" => Self::List,
            "search" | "s" | "/" => Self::Search(rest.to_string()),
            "modality" | "m" => Self::Modality(rest.parse()?),
            "license" | "l" => Self::License(rest.parse()?),
            "hosting" => Self::Hosting(rest.parse()?),
            "oci" => Self::Oci(OciAvailability::parse_filter(rest)?),
            "prod" | "production" | "p" => Self::ProductionOnly,
            "clear" | "c" => Self::Clear,
            "show" => Self::Show(position(rest)?),
            "download" | "d" => Self::Download(position(rest)?),
            "help" | "h" | "?" => Self::Help,
            "quit" | "q" | "exit" => Self::Quit,
            other => bail!("unknown command '{}' (type `help`)", other),
        })
    }
}

fn position(arg: &str) -> Result<usize> {
    match arg.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(anyhow!("expected a result number, got '{}'", arg)),
    }
}

pub async fn execute(ctx: &Context, criteria: FilterCriteria) -> Result<()> {
    let mut catalog = load_catalog(ctx).await?;
    catalog.set_criteria(criteria);

    let fetcher = HubClient::from_config(&ctx.config);
    let mut input = BufReader::new(tokio::io::stdin()).lines();
    let mut out = std::io::stdout();

    let mut session = Session {
        catalog: &mut catalog,
        config: &ctx.config,
        fetcher: &fetcher,
        theme: &ctx.theme,
        progress: true,
    };
    session.run(&mut input, &mut out).await
}

/// State of one interactive session
pub struct Session<'a> {
    pub catalog: &'a mut CatalogController,
    pub config: &'a SelectorConfig,
    pub fetcher: &'a dyn ArtifactFetcher,
    pub theme: &'a Theme,
    pub progress: bool,
}

impl Session<'_> {
    /// Read commands until `quit` or end of input.
    pub async fn run<R, W>(&mut self, input: &mut Lines<R>, out: &mut W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        write!(out, "{}", view::render_catalog(&self.catalog.view(), self.theme))?;

        loop {
            write!(out, "{} ", self.theme.accent.apply_to(">"))?;
            out.flush()?;

            let Some(line) = input.next_line().await? else {
                writeln!(out)?;
                return Ok(());
            };

            let command = match BrowseCommand::parse(&line) {
                Ok(command) => command,
                Err(e) => {
                    writeln!(out, "{}", self.theme.error.apply_to(e))?;
                    continue;
                }
            };
            debug!("browse command: {:?}", command);

            if !self.apply(command, input, out).await? {
                return Ok(());
            }
        }
    }

    /// Returns false when the session should end.
    async fn apply<R, W>(
        &mut self,
        command: BrowseCommand,
        input: &mut Lines<R>,
        out: &mut W,
    ) -> Result<bool>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        match command {
            BrowseCommand::Search(query) => self.catalog.set_search(query),
            BrowseCommand::Modality(modality) => self.catalog.toggle_modality(modality),
            BrowseCommand::License(license) => self.catalog.toggle_license(license),
            BrowseCommand::Hosting(hosting) => self.catalog.toggle_hosting(hosting),
            BrowseCommand::Oci(oci) => self.catalog.toggle_oci(oci),
            BrowseCommand::ProductionOnly => self.catalog.toggle_production_only(),
            BrowseCommand::Clear => self.catalog.clear_filters(),
            BrowseCommand::List => {}
            BrowseCommand::Show(n) => {
                match self.catalog.visible_at(n) {
                    Some(record) => {
                        write!(out, "{}", view::render_card(Some(n), record, self.theme))?
                    }
                    None => self.no_such_result(n, out)?,
                }
                return Ok(true);
            }
            BrowseCommand::Download(n) => {
                self.download(n, input, out).await?;
                return Ok(true);
            }
            BrowseCommand::Help => {
                write!(out, "{}", HELP)?;
                return Ok(true);
            }
            BrowseCommand::Quit => return Ok(false),
        }

        write!(out, "{}", view::render_catalog(&self.catalog.view(), self.theme))?;
        Ok(true)
    }

    async fn download<R, W>(&mut self, n: usize, input: &mut Lines<R>, out: &mut W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        let Some(record) = self.catalog.visible_at(n) else {
            return self.no_such_result(n, out);
        };
        if !record.is_downloadable() {
            writeln!(
                out,
                "{}",
                self.theme
                    .error
                    .apply_to(format!("{} has no Hugging Face model id", record.name))
            )?;
            return Ok(());
        }

        let record = record.clone();
        let mut flow = DownloadFlow::with_config(&record, self.config)?;
        let options = DialogOptions {
            assume_yes: false,
            auto_dismiss: true,
            progress: self.progress,
        };

        if let Err(e) = run_dialog(
            &mut flow,
            &record,
            self.fetcher,
            input,
            out,
            self.theme,
            options,
        )
        .await
        {
            warn!("Download dialog for {} ended with error: {}", record.name, e);
            writeln!(out, "{}", self.theme.error.apply_to(e))?;
        }
        Ok(())
    }

    fn no_such_result<W: Write>(&self, n: usize, out: &mut W) -> Result<()> {
        writeln!(
            out,
            "{}",
            self.theme.error.apply_to(format!(
                "No result {} ({} models found)",
                n,
                self.catalog.view().matched()
            ))
        )?;
        Ok(())
    }
}
