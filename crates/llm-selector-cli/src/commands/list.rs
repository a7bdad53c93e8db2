use anyhow::Result;
use serde::Serialize;
use tracing::info;

use llm_selector_core::{CatalogView, FilterCriteria, ModelRecord};

use super::{load_catalog, Context};
use crate::style::Theme;
use crate::view;
use crate::OutputFormat;

#[derive(Serialize)]
struct ListOutput<'a> {
    count: usize,
    total: usize,
    criteria: &'a FilterCriteria,
    models: &'a [&'a ModelRecord],
}

/// List catalog entries that pass `criteria`
pub async fn execute(ctx: &Context, criteria: FilterCriteria, detailed: bool) -> Result<()> {
    let mut catalog = load_catalog(ctx).await?;
    catalog.set_criteria(criteria);

    let view = catalog.view();
    info!("{} of {} models match", view.matched(), view.total);
    print!("{}", render(&view, ctx.output_format, detailed, &ctx.theme)?);
    Ok(())
}

fn render(
    view: &CatalogView<'_>,
    format: OutputFormat,
    detailed: bool,
    theme: &Theme,
) -> Result<String> {
    Ok(match format {
        OutputFormat::Json => {
            let output = ListOutput {
                count: view.matched(),
                total: view.total,
                criteria: view.criteria,
                models: &view.records,
            };
            format!("{}\n", serde_json::to_string_pretty(&output)?)
        }
        OutputFormat::Plain => view
            .records
            .iter()
            .map(|r| format!("{}\n", r.name))
            .collect(),
        OutputFormat::Table if detailed => view::render_catalog(view, theme),
        OutputFormat::Table => view::render_table(view, theme),
    })
}
