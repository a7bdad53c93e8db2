use anyhow::Result;

use llm_selector_core::{download_command, ArtifactFetcher, Error, HubClient};

use super::{load_catalog, Context};

/// Print manual retrieval commands for a model
pub async fn execute(ctx: &Context, model: &str) -> Result<()> {
    let catalog = load_catalog(ctx).await?;
    let record = catalog.find(model)?;
    let model_id = record
        .downloadable_id()
        .ok_or_else(|| Error::NotDownloadable(record.name.clone()))?;

    println!("{}", download_command(model_id));
    println!();
    println!(
        "# Model page: {}",
        HubClient::from_config(&ctx.config).model_page_url(model_id)
    );
    Ok(())
}
