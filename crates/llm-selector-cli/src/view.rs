//! Rendering of catalog snapshots, model cards and the download dialog
//!
//! Everything here is a pure function from state to text. Callers decide
//! where the text goes.

use chrono::NaiveDate;
use std::fmt::Write;

use llm_selector_core::download::requirements;
use llm_selector_core::{
    CatalogView, DownloadState, FilterCriteria, HostingType, LicenseType, Modality,
    ModelRecord, OciAvailability,
};

use crate::style::Theme;

const MAX_GPUS: usize = 3;
const MAX_BENCHMARKS: usize = 3;

/// Filter panel with the running result count.
pub fn render_filter_panel(criteria: &FilterCriteria, matched: usize, theme: &Theme) -> String {
    let mut out = String::new();

    let _ = write!(out, "{}", theme.heading.apply_to("Filters"));
    if criteria.has_active_filters() {
        let _ = write!(out, "  {}", theme.accent.apply_to("(clear all: `clear`)"));
    }
    out.push('\n');

    let search = if criteria.search.is_empty() {
        "-".to_string()
    } else {
        format!("\"{}\"", criteria.search)
    };
    let _ = writeln!(out, "  Search:    {}", search);
    let _ = writeln!(
        out,
        "  {} Production Ready Only",
        checkbox(criteria.production_only)
    );
    let _ = writeln!(
        out,
        "  Modality:  {}",
        options(Modality::all(), &criteria.modalities, |m| m.as_str())
    );
    let _ = writeln!(
        out,
        "  License:   {}",
        options(LicenseType::all(), &criteria.license_types, |l| l.label())
    );
    let _ = writeln!(
        out,
        "  Hosting:   {}",
        options(HostingType::all(), &criteria.hosting_types, |h| h.label())
    );
    let _ = writeln!(
        out,
        "  OCI:       {}",
        options(OciAvailability::selectable(), &criteria.oci, |o| o.label())
    );
    let _ = writeln!(out, "  {} models found", theme.heading.apply_to(matched));

    out
}

fn checkbox(checked: bool) -> &'static str {
    if checked {
        "[x]"
    } else {
        "[ ]"
    }
}

fn options<T: Ord>(
    all: &[T],
    selected: &std::collections::BTreeSet<T>,
    label: impl Fn(&T) -> &'static str,
) -> String {
    all.iter()
        .map(|item| format!("{} {}", checkbox(selected.contains(item)), label(item)))
        .collect::<Vec<_>>()
        .join("  ")
}

/// Panel followed by one card per record, or the empty-state hint.
pub fn render_catalog(view: &CatalogView<'_>, theme: &Theme) -> String {
    let mut out = render_filter_panel(view.criteria, view.matched(), theme);
    out.push('\n');

    if view.is_empty() {
        let _ = writeln!(out, "{}", theme.heading.apply_to("No models found."));
        let _ = writeln!(out, "{}", theme.muted.apply_to("Try adjusting filters."));
        return out;
    }

    for (idx, record) in view.records.iter().enumerate() {
        out.push_str(&render_card(Some(idx + 1), record, theme));
        out.push('\n');
    }
    out
}

/// One line per record.
pub fn render_table(view: &CatalogView<'_>, theme: &Theme) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{}",
        theme.heading.apply_to(format!(
            "{:>3}  {:<28} {:<14} {:<14} {:<22} {:>8} {:>10}  {}",
            "#", "NAME", "PROVIDER", "LICENSE", "MODALITY", "PARAMS", "CONTEXT", "PROD"
        ))
    );

    for (idx, record) in view.records.iter().enumerate() {
        let modality = record
            .modality
            .iter()
            .map(|m| m.as_str())
            .collect::<Vec<_>>()
            .join(",");
        let _ = writeln!(
            out,
            "{:>3}  {:<28} {:<14} {:<14} {:<22} {:>8} {:>10}  {}",
            idx + 1,
            truncate(&record.name, 28),
            truncate(&record.provider, 14),
            record.license_type.label(),
            truncate(&modality, 22),
            record.parameters.as_deref().unwrap_or("-"),
            record
                .context_window
                .map(format_thousands)
                .unwrap_or_else(|| "-".to_string()),
            if record.is_production_ready { "yes" } else { "" }
        );
    }

    let _ = writeln!(out, "\n{} of {} models found", view.matched(), view.total);
    out
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
    cut.push('…');
    cut
}

/// Full model card.
pub fn render_card(position: Option<usize>, record: &ModelRecord, theme: &Theme) -> String {
    let mut out = String::new();

    if let Some(position) = position {
        let _ = write!(out, "{} ", theme.muted.apply_to(format!("[{position}]")));
    }
    let _ = write!(out, "{}", theme.heading.apply_to(&record.name));
    if record.is_production_ready {
        let _ = write!(out, "  {}", theme.badge.apply_to("Production Ready"));
    }
    let _ = writeln!(out, "  [{}]", record.license_type.label());
    let _ = writeln!(out, "    {}", theme.muted.apply_to(&record.provider));

    if !record.description.is_empty() {
        let _ = writeln!(out, "    {}", record.description);
    }
    if !record.modality.is_empty() {
        let tags: Vec<_> = record.modality.iter().map(|m| m.label()).collect();
        let _ = writeln!(out, "    Modality: {}", tags.join(", "));
    }
    if let Some(parameters) = &record.parameters {
        let _ = writeln!(out, "    Parameters: {}", parameters);
    }
    if let Some(context_window) = record.context_window {
        let _ = writeln!(out, "    Context Window: {}", format_thousands(context_window));
    }
    if record.shows_oci_availability() {
        let tags: Vec<_> = record.oci_availability.iter().map(|o| o.label()).collect();
        let _ = writeln!(out, "    OCI Availability: {}", tags.join(", "));
    }
    if !record.best_gpu.is_empty() {
        let gpus: Vec<_> = record
            .best_gpu
            .iter()
            .take(MAX_GPUS)
            .map(|gpu| gpu.replace('_', " "))
            .collect();
        let _ = writeln!(out, "    Recommended GPUs: {}", gpus.join(", "));
    }
    if !record.performance_metrics.is_empty() {
        let scores: Vec<_> = record
            .performance_metrics
            .iter()
            .take(MAX_BENCHMARKS)
            .map(|(name, score)| format!("{} {}", name.to_uppercase(), score))
            .collect();
        let _ = writeln!(out, "    Benchmarks: {}", scores.join("  "));
    }
    if let Some(pricing) = &record.pricing {
        let _ = writeln!(out, "    Pricing: {}", pricing);
    }
    if let Some(release_date) = record.release_date {
        let _ = writeln!(out, "    Released: {}", format_release_date(release_date));
    }

    let mut actions = Vec::new();
    if let Some(model_id) = record.downloadable_id() {
        actions.push(format!(
            "{} {}",
            theme.accent.apply_to("Download Model:"),
            model_id
        ));
    }
    if let Some(url) = &record.model_card_url {
        actions.push(format!("{} {}", theme.accent.apply_to("Model Card:"), url));
    }
    for action in actions {
        let _ = writeln!(out, "    {}", action);
    }

    out
}

/// Idle download dialog: model info, manual commands and requirements.
pub fn render_download_dialog(
    record: &ModelRecord,
    snippet: &str,
    page_url: &str,
    theme: &Theme,
) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "{}", theme.heading.apply_to("Download Model"));
    let _ = writeln!(out, "{}\n", theme.muted.apply_to(&record.name));

    let _ = writeln!(out, "{}", theme.heading.apply_to("Model Information"));
    let _ = writeln!(
        out,
        "  Model ID: {}",
        record.downloadable_id().unwrap_or_default()
    );
    let _ = writeln!(out, "  Provider: {}", record.provider);
    let _ = writeln!(out, "  License:  {}", record.license_type.as_str().replace('_', " "));
    if let Some(parameters) = &record.parameters {
        let _ = writeln!(out, "  Size:     {}", parameters);
    }

    let _ = writeln!(out, "\n{}", theme.heading.apply_to("Command Line"));
    for line in snippet.lines() {
        let _ = writeln!(out, "  {}", theme.code.apply_to(line));
    }

    let _ = writeln!(out, "\n{}", theme.heading.apply_to("Requirements"));
    for item in requirements(record) {
        let _ = writeln!(out, "  - {}", item);
    }

    let _ = writeln!(out, "\nVisit Hugging Face: {}", page_url);
    out
}

/// Status line(s) for a non-idle download state.
pub fn render_download_state(state: &DownloadState, page_url: &str, theme: &Theme) -> String {
    match state {
        DownloadState::Idle => String::new(),
        DownloadState::Downloading => format!(
            "{}\nFetching model configuration from Hugging Face\n",
            theme.heading.apply_to("Downloading...")
        ),
        DownloadState::Success { path } => format!(
            "{}\nModel configuration downloaded successfully: {}\n",
            theme.success.apply_to("Download Complete!"),
            path.display()
        ),
        DownloadState::Error { message } => format!(
            "{}\n{}\nOpen on Hugging Face: {}\n",
            theme.error.apply_to("Download Failed"),
            message,
            page_url
        ),
        DownloadState::Dismissed => String::new(),
    }
}

/// Whole-screen message for a failed initial load.
pub fn render_load_failure(message: &str, theme: &Theme) -> String {
    format!("{}\n", theme.error.apply_to(message))
}

/// `128000` -> `128,000`
pub fn format_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Long US style, e.g. `July 23, 2024`.
pub fn format_release_date(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};
    use llm_selector_core::{CatalogController, RecordStore};

    fn sample(id: &str, model_id: Option<&str>) -> ModelRecord {
        ModelRecord {
            id: id.to_string(),
            name: format!("Model {id}"),
            provider: "Acme".to_string(),
            model_id: model_id.map(str::to_string),
            description: "A helpful model".to_string(),
            modality: vec![Modality::Text, Modality::Vision],
            parameters: Some("8B".to_string()),
            context_window: Some(128_000),
            license_type: LicenseType::OpenWeights,
            hosting_type: vec![HostingType::SelfHosted],
            oci_availability: vec![OciAvailability::None],
            best_gpu: vec!["A10".into(), "L40S".into(), "H100_80GB".into(), "B200".into()],
            features: serde_json::Map::new(),
            performance_metrics: [
                ("mmlu".to_string(), 66.7),
                ("gsm8k".to_string(), 80.0),
                ("humaneval".to_string(), 72.5),
                ("arc".to_string(), 1.0),
            ]
            .into_iter()
            .collect(),
            model_card_url: Some("https://example.com/card".to_string()),
            pricing: None,
            release_date: NaiveDate::from_ymd_opt(2024, 7, 23),
            is_production_ready: true,
            created_at: DateTime::<Utc>::from_timestamp(1_700_000_000, 0).unwrap(),
        }
    }

    #[test]
    fn thousands_separator() {
        assert_eq!(format_thousands(0), "0");
        assert_eq!(format_thousands(999), "999");
        assert_eq!(format_thousands(8192), "8,192");
        assert_eq!(format_thousands(1_048_576), "1,048,576");
    }

    #[test]
    fn release_date_long_format() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 3).unwrap();
        assert_eq!(format_release_date(date), "May 3, 2024");
    }

    #[test]
    fn card_without_model_id_has_no_download_action() {
        let theme = Theme::no_color();
        let card = render_card(None, &sample("a", None), &theme);
        assert!(!card.contains("Download Model"));
        assert!(card.contains("Model Card: https://example.com/card"));

        let card = render_card(None, &sample("b", Some("acme/b")), &theme);
        assert!(card.contains("Download Model: acme/b"));
    }

    #[test]
    fn card_truncates_lists_and_hides_oci_none() {
        let card = render_card(Some(1), &sample("a", None), &Theme::no_color());
        assert!(card.starts_with("[1] Model a  Production Ready  [Open Weights]"));
        assert!(card.contains("Context Window: 128,000"));
        assert!(card.contains("Recommended GPUs: A10, L40S, H100 80GB\n"));
        assert!(card.contains("Benchmarks: MMLU 66.7  GSM8K 80  HUMANEVAL 72.5\n"));
        assert!(card.contains("Released: July 23, 2024"));
        assert!(!card.contains("OCI Availability"));
    }

    #[test]
    fn empty_result_shows_hint() {
        let mut controller =
            CatalogController::new(RecordStore::with_records(vec![sample("a", None)]));
        controller.set_search("no such model");
        let text = render_catalog(&controller.view(), &Theme::no_color());
        assert!(text.contains("0 models found"));
        assert!(text.contains("No models found.\nTry adjusting filters."));
        assert!(text.contains("(clear all: `clear`)"));
    }

    #[test]
    fn panel_marks_selected_options() {
        let mut criteria = FilterCriteria::default();
        criteria.toggle_hosting(HostingType::ApiBased);
        criteria.set_production_only(true);
        let panel = render_filter_panel(&criteria, 4, &Theme::no_color());
        assert!(panel.contains("[x] Production Ready Only"));
        assert!(panel.contains("Hosting:   [x] API Based  [ ] Self Hosted"));
        assert!(panel.contains("OCI:       [ ] Generative AI  [ ] Data Science\n"));
        assert!(panel.ends_with("  4 models found\n"));
    }

    #[test]
    fn error_state_offers_fallback_link() {
        let state = DownloadState::Error {
            message: "Failed to download model.".to_string(),
        };
        let text = render_download_state(
            &state,
            "https://huggingface.co/acme/foo",
            &Theme::no_color(),
        );
        assert!(text.contains("Download Failed"));
        assert!(text.contains("Open on Hugging Face: https://huggingface.co/acme/foo"));
    }

    #[test]
    fn dialog_lists_info_and_requirements() {
        let record = sample("a", Some("acme/a"));
        let text = render_download_dialog(
            &record,
            "huggingface-cli download acme/a",
            "https://huggingface.co/acme/a",
            &Theme::no_color(),
        );
        assert!(text.contains("Model ID: acme/a"));
        assert!(text.contains("License:  open weights"));
        assert!(text.contains("Size:     8B"));
        assert!(text.contains("Recommended GPU: A10"));
        assert!(text.contains("Visit Hugging Face: https://huggingface.co/acme/a"));
    }
}
