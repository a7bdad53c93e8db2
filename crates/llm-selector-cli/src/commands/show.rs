use anyhow::Result;

use super::{load_catalog, Context};
use crate::view;
use crate::OutputFormat;

/// Print the card of a single model
pub async fn execute(ctx: &Context, model: &str) -> Result<()> {
    let catalog = load_catalog(ctx).await?;
    let record = catalog.find(model)?;

    match ctx.output_format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(record)?),
        OutputFormat::Plain => println!("{}", record.name),
        OutputFormat::Table => print!("{}", view::render_card(None, record, &ctx.theme)),
    }
    Ok(())
}
