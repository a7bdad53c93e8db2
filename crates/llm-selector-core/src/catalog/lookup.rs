//! Resolving user-typed model references to catalog records

use super::record::ModelRecord;
use crate::error::{Error, Result};

/// Find a record by id, hub model id, hub repo tail or display name.
///
/// Exact id matches win. Other aliases are compared after stripping
/// punctuation and case, so `llama-3.1-8b`, `Llama 3.1 8B` and
/// `meta-llama/Llama-3.1-8B` all resolve to the same record.
pub fn find_record<'a>(records: &'a [ModelRecord], query: &str) -> Result<&'a ModelRecord> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return Err(Error::RecordNotFound("empty model reference".to_string()));
    }

    if let Some(record) = records.iter().find(|r| r.id == trimmed) {
        return Ok(record);
    }

    let normalized = normalize_identifier(trimmed);
    records
        .iter()
        .find(|r| matches_record_alias(r, trimmed, &normalized))
        .ok_or_else(|| Error::RecordNotFound(trimmed.to_string()))
}

fn matches_record_alias(record: &ModelRecord, raw: &str, normalized: &str) -> bool {
    if let Some(model_id) = record.model_id.as_deref() {
        if model_id.eq_ignore_ascii_case(raw) {
            return true;
        }
        let repo_tail = model_id.rsplit('/').next().unwrap_or(model_id);
        if normalize_identifier(model_id) == normalized
            || normalize_identifier(repo_tail) == normalized
        {
            return true;
        }
    }

    normalize_identifier(&record.name) == normalized
}

fn normalize_identifier(input: &str) -> String {
    input
        .chars()
        .filter(|ch| ch.is_ascii_alphanumeric())
        .map(|ch| ch.to_ascii_lowercase())
        .collect()
}
