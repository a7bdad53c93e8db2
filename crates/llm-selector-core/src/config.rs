//! Configuration for the catalog browser

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

use crate::error::{Error, Result};

/// Public Hugging Face hub, used when no other hub is configured.
pub const DEFAULT_HUB_URL: &str = "https://huggingface.co";

/// Main selector configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectorConfig {
    /// Base URL of the hosted database (Supabase project URL)
    #[serde(default = "default_supabase_url")]
    pub supabase_url: Option<String>,

    /// Anonymous API key for the hosted database
    #[serde(default = "default_supabase_anon_key")]
    pub supabase_anon_key: Option<String>,

    /// Model hub serving `config.json` artifacts and model pages
    #[serde(default = "default_hub_url")]
    pub hub_url: String,

    /// Directory that downloaded artifacts are saved into
    #[serde(default = "default_download_dir")]
    pub download_dir: PathBuf,

    /// How long a successful download stays on screen before it is dismissed
    #[serde(default = "default_dismiss_delay_ms")]
    pub dismiss_delay_ms: u64,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            supabase_url: default_supabase_url(),
            supabase_anon_key: default_supabase_anon_key(),
            hub_url: default_hub_url(),
            download_dir: default_download_dir(),
            dismiss_delay_ms: default_dismiss_delay_ms(),
        }
    }
}

impl SelectorConfig {
    /// Load a TOML config file. Credentials found in the environment win over the file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            Error::ConfigError(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let mut config: SelectorConfig = toml::from_str(&raw).map_err(|e| {
            Error::ConfigError(format!("Failed to parse {}: {}", path.display(), e))
        })?;

        if let Some(url) = env_credential("SUPABASE_URL") {
            config.supabase_url = Some(url);
        }
        if let Some(key) = env_credential("SUPABASE_ANON_KEY") {
            config.supabase_anon_key = Some(key);
        }

        debug!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Load from `path` when given, otherwise from the default location if it
    /// exists, otherwise fall back to defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::from_file(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    /// `<config dir>/llm-selector/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("llm-selector").join("config.toml"))
    }

    /// Check that both data source credentials are present.
    pub fn validate(&self) -> Result<()> {
        if self.supabase_url.as_deref().map_or(true, str::is_empty) {
            return Err(Error::ConfigError(
                "missing data source URL (set SUPABASE_URL)".to_string(),
            ));
        }
        if self.supabase_anon_key.as_deref().map_or(true, str::is_empty) {
            return Err(Error::ConfigError(
                "missing data source key (set SUPABASE_ANON_KEY)".to_string(),
            ));
        }
        Ok(())
    }

    pub fn dismiss_delay(&self) -> Duration {
        Duration::from_millis(self.dismiss_delay_ms)
    }

    /// Copy of the config that is safe to print.
    pub fn redacted(&self) -> Self {
        let mut shown = self.clone();
        shown.supabase_anon_key = shown.supabase_anon_key.as_deref().map(mask_secret);
        shown
    }
}

fn mask_secret(secret: &str) -> String {
    let visible: String = secret.chars().take(4).collect();
    format!("{visible}****")
}

/// Read a credential from `NAME`, falling back to the `VITE_NAME` spelling.
fn env_credential(name: &str) -> Option<String> {
    [name.to_string(), format!("VITE_{name}")]
        .iter()
        .filter_map(|key| std::env::var(key).ok())
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())
}

fn default_supabase_url() -> Option<String> {
    env_credential("SUPABASE_URL")
}

fn default_supabase_anon_key() -> Option<String> {
    env_credential("SUPABASE_ANON_KEY")
}

fn default_hub_url() -> String {
    DEFAULT_HUB_URL.to_string()
}

fn default_download_dir() -> PathBuf {
    if let Ok(from_env) = std::env::var("LLM_SELECTOR_DOWNLOAD_DIR") {
        let trimmed = from_env.trim();
        if !trimmed.is_empty() {
            return PathBuf::from(trimmed);
        }
    }

    PathBuf::from(".")
}

fn default_dismiss_delay_ms() -> u64 {
    2000
}
