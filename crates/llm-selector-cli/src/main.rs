//! llm-selector CLI - browse, filter and download entries of an LLM catalog

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

mod commands;
mod style;
mod view;

use anyhow::Result;
use llm_selector_core::{FilterCriteria, HostingType, LicenseType, Modality, OciAvailability};
use style::Theme;

/// llm-selector - find and compare production-ready LLMs
///
/// Loads the model catalog from the hosted database, filters it locally and
/// downloads model configuration files from the hub.
///
/// Examples:
///   llm-selector list --modality vision --production-only
///   llm-selector show "Llama 3.1 8B"
///   llm-selector download meta-llama/Llama-3.1-8B
///   llm-selector browse
#[derive(Parser)]
#[command(
    name = "llm-selector",
    about = "Find and compare production-ready LLMs",
    version = env!("CARGO_PKG_VERSION"),
    help_template = style::HELP_TEMPLATE,
    arg_required_else_help = true,
    propagate_version = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Read the catalog from a JSON export instead of the hosted database
    #[arg(long, global = true, value_name = "PATH", env = "LLM_SELECTOR_CATALOG")]
    pub catalog: Option<PathBuf>,

    /// Model hub base URL
    #[arg(long, global = true, value_name = "URL")]
    pub hub_url: Option<String>,

    /// Output format
    #[arg(
        long = "output-format",
        global = true,
        value_enum,
        default_value = "table"
    )]
    pub output_format: OutputFormat,

    /// Enable verbose output
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List catalog entries matching the given filters
    #[command(name = "list", alias = "ls")]
    List {
        #[command(flatten)]
        filters: FilterArgs,

        /// Show full model cards instead of a table
        #[arg(short, long)]
        detailed: bool,
    },

    /// Show the full card of one model
    #[command(name = "show", alias = "info")]
    Show {
        /// Catalog id, hub model id or model name
        model: String,
    },

    /// Download a model's config.json from the hub
    #[command(name = "download", alias = "pull")]
    Download {
        /// Catalog id, hub model id or model name
        model: String,

        /// Directory to save the config into
        #[arg(short, long, value_name = "DIR")]
        output_dir: Option<PathBuf>,

        /// Download without confirmation
        #[arg(short, long)]
        yes: bool,
    },

    /// Print commands for fetching a model by hand
    #[command(name = "snippet", alias = "command")]
    Snippet {
        /// Catalog id, hub model id or model name
        model: String,
    },

    /// Interactive browser: toggle filters and download from one session
    #[command(name = "browse")]
    Browse {
        #[command(flatten)]
        filters: FilterArgs,
    },

    /// Inspect configuration
    #[command(name = "config")]
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the effective configuration
    Show,

    /// Show the default configuration file path
    Path,
}

/// Filter flags shared by `list` and `browse`
#[derive(Args, Debug, Default, Clone)]
pub struct FilterArgs {
    /// Case-insensitive text matched against name, provider and description
    #[arg(short, long)]
    pub search: Option<String>,

    /// Required modality; repeat to require several (text, vision, audio, realtime)
    #[arg(short, long = "modality", value_name = "MODALITY")]
    pub modalities: Vec<Modality>,

    /// Accepted license; repeat to accept several (open_source, open_weights, closed_source)
    #[arg(short, long = "license", value_name = "LICENSE")]
    pub licenses: Vec<LicenseType>,

    /// Accepted hosting type; repeat to accept several (api_based, self_hosted)
    #[arg(long = "hosting", value_name = "HOSTING")]
    pub hosting: Vec<HostingType>,

    /// Accepted OCI catalog; repeat to accept several (generative_ai, data_science)
    #[arg(long = "oci", value_name = "OCI", value_parser = OciAvailability::parse_filter)]
    pub oci: Vec<OciAvailability>,

    /// Only production-ready models
    #[arg(short, long)]
    pub production_only: bool,
}

impl FilterArgs {
    pub fn into_criteria(self) -> FilterCriteria {
        FilterCriteria {
            search: self.search.unwrap_or_default(),
            modalities: self.modalities.into_iter().collect(),
            license_types: self.licenses.into_iter().collect(),
            hosting_types: self.hosting.into_iter().collect(),
            oci: self.oci.into_iter().collect(),
            production_only: self.production_only,
        }
    }
}

#[derive(Clone, Copy, ValueEnum, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable table format
    Table,
    /// JSON output
    Json,
    /// Plain text, one model name per line
    Plain,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let no_color = cli.no_color || std::env::var_os("NO_COLOR").is_some();

    let theme = if no_color {
        Theme::no_color()
    } else {
        Theme::default()
    };

    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "llm_selector=info,llm_selector_core=debug".into()),
            )
            .with_writer(std::io::stderr)
            .init();
    }

    let ctx = commands::Context::new(
        cli.config.as_deref(),
        cli.catalog,
        cli.hub_url,
        cli.output_format,
        theme,
    )?;

    match cli.command {
        Commands::List { filters, detailed } => {
            commands::list::execute(&ctx, filters.into_criteria(), detailed).await?;
        }

        Commands::Show { model } => {
            commands::show::execute(&ctx, &model).await?;
        }

        Commands::Download {
            model,
            output_dir,
            yes,
        } => {
            commands::download::execute(&ctx, &model, output_dir, yes).await?;
        }

        Commands::Snippet { model } => {
            commands::snippet::execute(&ctx, &model).await?;
        }

        Commands::Browse { filters } => {
            commands::browse::execute(&ctx, filters.into_criteria()).await?;
        }

        Commands::Config { command } => {
            commands::config::execute(&ctx, command, cli.config.as_deref())?;
        }
    }

    Ok(())
}
