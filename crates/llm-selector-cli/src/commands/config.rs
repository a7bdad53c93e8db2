use anyhow::Result;
use std::path::Path;

use llm_selector_core::SelectorConfig;

use super::Context;
use crate::ConfigCommands;
use crate::OutputFormat;

pub fn execute(ctx: &Context, command: ConfigCommands, config_path: Option<&Path>) -> Result<()> {
    match command {
        ConfigCommands::Show => {
            let shown = ctx.config.redacted();
            match ctx.output_format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&shown)?),
                _ => print!("{}", toml::to_string_pretty(&shown)?),
            }
        }
        ConfigCommands::Path => {
            let path = config_path
                .map(Path::to_path_buf)
                .or_else(SelectorConfig::default_path);
            match path {
                Some(path) => println!("{}", path.display()),
                None => println!("(no configuration directory on this platform)"),
            }
        }
    }
    Ok(())
}
