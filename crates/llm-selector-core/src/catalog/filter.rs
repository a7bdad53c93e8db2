//! Filter criteria and the filter pipeline
//!
//! The pipeline is an ordered list of [`FilterStage`]s built from the current
//! [`FilterCriteria`]. A record is kept when every stage accepts it. Stages
//! with nothing selected accept everything.
//!
//! Modality selections must *all* be present on a record, because a user
//! asking for vision and text needs both. License, hosting and OCI selections
//! are alternatives: any one of them is enough.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::record::{HostingType, LicenseType, Modality, ModelRecord, OciAvailability};

/// Active filter values, owned by the controller and changed by user input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub search: String,
    pub modalities: BTreeSet<Modality>,
    pub license_types: BTreeSet<LicenseType>,
    pub hosting_types: BTreeSet<HostingType>,
    pub oci: BTreeSet<OciAvailability>,
    pub production_only: bool,
}

impl FilterCriteria {
    pub fn set_search(&mut self, query: impl Into<String>) {
        self.search = query.into();
    }

    pub fn set_production_only(&mut self, enabled: bool) {
        self.production_only = enabled;
    }

    pub fn toggle_modality(&mut self, modality: Modality) {
        toggle(&mut self.modalities, modality);
    }

    pub fn toggle_license(&mut self, license: LicenseType) {
        toggle(&mut self.license_types, license);
    }

    pub fn toggle_hosting(&mut self, hosting: HostingType) {
        toggle(&mut self.hosting_types, hosting);
    }

    pub fn toggle_oci(&mut self, oci: OciAvailability) {
        toggle(&mut self.oci, oci);
    }

    /// Reset every dimension to its initial value.
    pub fn clear_all(&mut self) {
        *self = Self::default();
    }

    pub fn has_active_filters(&self) -> bool {
        !self.search.is_empty()
            || !self.modalities.is_empty()
            || !self.license_types.is_empty()
            || !self.hosting_types.is_empty()
            || !self.oci.is_empty()
            || self.production_only
    }

    /// Pipeline stages in evaluation order.
    pub fn stages(&self) -> [FilterStage<'_>; 6] {
        [
            FilterStage::Search(&self.search),
            FilterStage::Modality(&self.modalities),
            FilterStage::License(&self.license_types),
            FilterStage::Hosting(&self.hosting_types),
            FilterStage::Oci(&self.oci),
            FilterStage::ProductionOnly(self.production_only),
        ]
    }

    /// Whether `record` passes every stage.
    pub fn matches(&self, record: &ModelRecord) -> bool {
        self.stages()
            .iter()
            .fold(true, |keep, stage| keep && stage.matches(record))
    }
}

fn toggle<T: Ord>(selected: &mut BTreeSet<T>, value: T) {
    if !selected.remove(&value) {
        selected.insert(value);
    }
}

/// One predicate of the pipeline.
#[derive(Debug, Clone, Copy)]
pub enum FilterStage<'a> {
    /// Case-insensitive substring of name, provider or description.
    Search(&'a str),
    /// Every selected modality must be present.
    Modality(&'a BTreeSet<Modality>),
    /// The license must be one of the selected ones.
    License(&'a BTreeSet<LicenseType>),
    /// At least one hosting tag must be selected.
    Hosting(&'a BTreeSet<HostingType>),
    /// At least one OCI tag must be selected.
    Oci(&'a BTreeSet<OciAvailability>),
    ProductionOnly(bool),
}

impl FilterStage<'_> {
    /// Inactive stages accept every record.
    pub fn is_active(&self) -> bool {
        match self {
            Self::Search(query) => !query.trim().is_empty(),
            Self::Modality(selected) => !selected.is_empty(),
            Self::License(selected) => !selected.is_empty(),
            Self::Hosting(selected) => !selected.is_empty(),
            Self::Oci(selected) => !selected.is_empty(),
            Self::ProductionOnly(enabled) => *enabled,
        }
    }

    pub fn matches(&self, record: &ModelRecord) -> bool {
        if !self.is_active() {
            return true;
        }

        match self {
            Self::Search(query) => {
                // The query is matched as typed; blank queries never get here.
                let query = query.to_lowercase();
                [&record.name, &record.provider, &record.description]
                    .iter()
                    .any(|field| field.to_lowercase().contains(&query))
            }
            Self::Modality(selected) => selected.iter().all(|m| record.modality.contains(m)),
            Self::License(selected) => selected.contains(&record.license_type),
            Self::Hosting(selected) => record.hosting_type.iter().any(|h| selected.contains(h)),
            Self::Oci(selected) => record.oci_availability.iter().any(|o| selected.contains(o)),
            Self::ProductionOnly(_) => record.is_production_ready,
        }
    }
}

/// Records passing all stages, in store order.
pub fn apply<'a>(records: &'a [ModelRecord], criteria: &FilterCriteria) -> Vec<&'a ModelRecord> {
    records.iter().filter(|r| criteria.matches(r)).collect()
}

/// Like [`apply`] but returns positions into `records`.
pub fn apply_indices(records: &[ModelRecord], criteria: &FilterCriteria) -> Vec<usize> {
    records
        .iter()
        .enumerate()
        .filter(|(_, r)| criteria.matches(r))
        .map(|(idx, _)| idx)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::record::fixtures::record;

    fn ids(records: &[&ModelRecord]) -> Vec<String> {
        records.iter().map(|r| r.id.clone()).collect()
    }

    fn hosting_catalog() -> Vec<ModelRecord> {
        let mut api = record("api");
        api.hosting_type = vec![HostingType::ApiBased];
        let mut selfh = record("self");
        selfh.hosting_type = vec![HostingType::SelfHosted];
        let mut both = record("both");
        both.hosting_type = vec![HostingType::ApiBased, HostingType::SelfHosted];
        vec![api, selfh, both]
    }

    #[test]
    fn empty_criteria_keeps_everything_in_order() {
        let records: Vec<_> = ["c", "a", "b"].into_iter().map(record).collect();
        let out = apply(&records, &FilterCriteria::default());
        assert_eq!(ids(&out), vec!["c", "a", "b"]);
    }

    #[test]
    fn search_is_case_insensitive_across_fields() {
        let mut by_name = record("1");
        by_name.name = "GPT-4o Mini".to_string();
        let mut by_provider = record("2");
        by_provider.provider = "OpenAI".to_string();
        let mut by_description = record("3");
        by_description.description = "Distilled from a larger MINI model".to_string();
        let other = record("4");
        let records = vec![by_name, by_provider, by_description, other];

        let mut criteria = FilterCriteria::default();
        criteria.set_search("mini");
        assert_eq!(ids(&apply(&records, &criteria)), vec!["1", "3"]);

        criteria.set_search("OPENai");
        assert_eq!(ids(&apply(&records, &criteria)), vec!["2"]);
    }

    #[test]
    fn blank_search_is_inactive() {
        let records: Vec<_> = ["a", "b"].into_iter().map(record).collect();
        let mut criteria = FilterCriteria::default();
        criteria.set_search("   ");
        assert!(!criteria.stages()[0].is_active());
        assert_eq!(apply(&records, &criteria).len(), 2);
    }

    #[test]
    fn modality_requires_every_selection() {
        let mut text = record("text");
        text.modality = vec![Modality::Text];
        let mut multi = record("multi");
        multi.modality = vec![Modality::Text, Modality::Vision];
        let empty = record("empty");
        let records = vec![text, multi, empty];

        let mut criteria = FilterCriteria::default();
        criteria.toggle_modality(Modality::Text);
        assert_eq!(ids(&apply(&records, &criteria)), vec!["text", "multi"]);

        criteria.toggle_modality(Modality::Vision);
        assert_eq!(ids(&apply(&records, &criteria)), vec!["multi"]);
    }

    #[test]
    fn license_is_membership() {
        let mut open = record("open");
        open.license_type = LicenseType::OpenSource;
        let mut weights = record("weights");
        weights.license_type = LicenseType::OpenWeights;
        let mut closed = record("closed");
        closed.license_type = LicenseType::ClosedSource;
        let records = vec![open, weights, closed];

        let mut criteria = FilterCriteria::default();
        criteria.toggle_license(LicenseType::OpenSource);
        criteria.toggle_license(LicenseType::ClosedSource);
        assert_eq!(ids(&apply(&records, &criteria)), vec!["open", "closed"]);
    }

    #[test]
    fn hosting_is_any_overlap() {
        let records = hosting_catalog();

        let mut criteria = FilterCriteria::default();
        criteria.toggle_hosting(HostingType::ApiBased);
        criteria.toggle_hosting(HostingType::SelfHosted);
        assert_eq!(ids(&apply(&records, &criteria)), vec!["api", "self", "both"]);

        criteria.toggle_hosting(HostingType::ApiBased);
        assert_eq!(ids(&apply(&records, &criteria)), vec!["self", "both"]);
    }

    #[test]
    fn oci_matches_literal_none_tag() {
        let mut none = record("none");
        none.oci_availability = vec![OciAvailability::None];
        let mut genai = record("genai");
        genai.oci_availability = vec![OciAvailability::GenerativeAi];
        let untagged = record("untagged");
        let records = vec![none, genai, untagged];

        let mut criteria = FilterCriteria::default();
        criteria.toggle_oci(OciAvailability::GenerativeAi);
        assert_eq!(ids(&apply(&records, &criteria)), vec!["genai"]);

        criteria.toggle_oci(OciAvailability::None);
        assert_eq!(ids(&apply(&records, &criteria)), vec!["none", "genai"]);
    }

    #[test]
    fn production_toggle_is_reversible() {
        let mut ready = record("ready");
        ready.is_production_ready = true;
        let records = vec![record("draft"), ready];

        let mut criteria = FilterCriteria::default();
        criteria.set_production_only(true);
        assert_eq!(ids(&apply(&records, &criteria)), vec!["ready"]);

        criteria.set_production_only(false);
        assert_eq!(ids(&apply(&records, &criteria)), vec!["draft", "ready"]);
    }

    #[test]
    fn stages_combine_conjunctively() {
        let mut hit = record("hit");
        hit.name = "Vision Pro".to_string();
        hit.modality = vec![Modality::Vision];
        hit.is_production_ready = true;
        let mut miss = hit.clone();
        miss.id = "miss".to_string();
        miss.is_production_ready = false;
        let records = vec![hit, miss];

        let mut criteria = FilterCriteria::default();
        criteria.set_search("vision");
        criteria.toggle_modality(Modality::Vision);
        criteria.set_production_only(true);
        assert_eq!(ids(&apply(&records, &criteria)), vec!["hit"]);
        assert_eq!(apply_indices(&records, &criteria), vec![0]);
    }

    #[test]
    fn toggle_twice_restores_selection() {
        let mut criteria = FilterCriteria::default();
        criteria.toggle_license(LicenseType::OpenWeights);
        assert!(criteria.has_active_filters());
        criteria.toggle_license(LicenseType::OpenWeights);
        assert!(!criteria.has_active_filters());
    }

    #[test]
    fn clear_all_resets_every_dimension() {
        let mut criteria = FilterCriteria::default();
        criteria.set_search("llama");
        criteria.toggle_modality(Modality::Audio);
        criteria.toggle_oci(OciAvailability::DataScience);
        criteria.set_production_only(true);

        criteria.clear_all();
        assert_eq!(criteria, FilterCriteria::default());
    }
}
