//! Top-level catalog controller
//!
//! Owns the record store, the filter criteria and the current filter result.
//! Front ends mutate state only through the controller and render from the
//! read-only [`CatalogView`] it hands out. Every criteria change re-runs the
//! whole pipeline.

use super::filter::{self, FilterCriteria};
use super::lookup;
use super::record::{HostingType, LicenseType, Modality, ModelRecord, OciAvailability};
use super::source::RecordSource;
use super::store::{LoadState, RecordStore};
use crate::error::{Error, Result};

pub struct CatalogController {
    store: RecordStore,
    criteria: FilterCriteria,
    visible: Vec<usize>,
}

/// Read-only snapshot for rendering
#[derive(Debug)]
pub struct CatalogView<'a> {
    pub records: Vec<&'a ModelRecord>,
    pub criteria: &'a FilterCriteria,
    pub total: usize,
    pub has_active_filters: bool,
}

impl CatalogView<'_> {
    /// Running count of matched records
    pub fn matched(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl Default for CatalogController {
    fn default() -> Self {
        Self::new(RecordStore::new())
    }
}

impl CatalogController {
    pub fn new(store: RecordStore) -> Self {
        let mut controller = Self {
            store,
            criteria: FilterCriteria::default(),
            visible: Vec::new(),
        };
        controller.refilter();
        controller
    }

    /// Populate the store from `source`. Called once at start-up.
    pub async fn load(&mut self, source: &dyn RecordSource) -> Result<()> {
        let state = self.store.load(source).await.clone();
        self.refilter();
        match state {
            LoadState::Failed(message) => Err(Error::LoadFailed(message)),
            _ => Ok(()),
        }
    }

    pub fn load_state(&self) -> &LoadState {
        self.store.state()
    }

    pub fn view(&self) -> CatalogView<'_> {
        let records = self.store.records();
        CatalogView {
            records: self.visible.iter().map(|&idx| &records[idx]).collect(),
            criteria: &self.criteria,
            total: records.len(),
            has_active_filters: self.criteria.has_active_filters(),
        }
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    /// Replace the criteria wholesale, e.g. from command-line flags.
    pub fn set_criteria(&mut self, criteria: FilterCriteria) {
        self.criteria = criteria;
        self.refilter();
    }

    pub fn set_search(&mut self, query: impl Into<String>) {
        self.criteria.set_search(query);
        self.refilter();
    }

    pub fn set_production_only(&mut self, enabled: bool) {
        self.criteria.set_production_only(enabled);
        self.refilter();
    }

    pub fn toggle_production_only(&mut self) {
        let enabled = !self.criteria.production_only;
        self.set_production_only(enabled);
    }

    pub fn toggle_modality(&mut self, modality: Modality) {
        self.criteria.toggle_modality(modality);
        self.refilter();
    }

    pub fn toggle_license(&mut self, license: LicenseType) {
        self.criteria.toggle_license(license);
        self.refilter();
    }

    pub fn toggle_hosting(&mut self, hosting: HostingType) {
        self.criteria.toggle_hosting(hosting);
        self.refilter();
    }

    pub fn toggle_oci(&mut self, oci: OciAvailability) {
        self.criteria.toggle_oci(oci);
        self.refilter();
    }

    pub fn clear_filters(&mut self) {
        self.criteria.clear_all();
        self.refilter();
    }

    /// Record at `position` (1-based) in the current filtered view.
    pub fn visible_at(&self, position: usize) -> Option<&ModelRecord> {
        position
            .checked_sub(1)
            .and_then(|idx| self.visible.get(idx))
            .map(|&idx| &self.store.records()[idx])
    }

    /// Resolve a user-typed reference against the full catalog.
    pub fn find(&self, reference: &str) -> Result<&ModelRecord> {
        lookup::find_record(self.store.records(), reference)
    }

    fn refilter(&mut self) {
        self.visible = filter::apply_indices(self.store.records(), &self.criteria);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::record::fixtures::record;

    fn controller() -> CatalogController {
        let mut ready = record("ready");
        ready.is_production_ready = true;
        ready.modality = vec![Modality::Text, Modality::Vision];
        let mut draft = record("draft");
        draft.modality = vec![Modality::Text];
        draft.license_type = LicenseType::ClosedSource;
        CatalogController::new(RecordStore::with_records(vec![ready, draft]))
    }

    fn visible_ids(controller: &CatalogController) -> Vec<String> {
        controller.view().records.iter().map(|r| r.id.clone()).collect()
    }

    #[test]
    fn initial_view_shows_everything() {
        let controller = controller();
        let view = controller.view();
        assert_eq!(view.matched(), 2);
        assert_eq!(view.total, 2);
        assert!(!view.has_active_filters);
    }

    #[test]
    fn each_change_refilters() {
        let mut controller = controller();

        controller.toggle_modality(Modality::Vision);
        assert_eq!(visible_ids(&controller), vec!["ready"]);

        controller.toggle_modality(Modality::Vision);
        controller.toggle_license(LicenseType::ClosedSource);
        assert_eq!(visible_ids(&controller), vec!["draft"]);

        controller.toggle_production_only();
        assert!(controller.view().is_empty());

        controller.clear_filters();
        assert_eq!(visible_ids(&controller), vec!["ready", "draft"]);
    }

    #[test]
    fn positions_follow_the_filtered_view() {
        let mut controller = controller();
        controller.set_production_only(true);
        assert_eq!(controller.visible_at(1).map(|r| r.id.as_str()), Some("ready"));
        assert!(controller.visible_at(2).is_none());
        assert!(controller.visible_at(0).is_none());
    }

    #[test]
    fn set_criteria_replaces_everything() {
        let mut controller = controller();
        controller.set_search("nothing matches this");
        assert!(controller.view().is_empty());

        let mut criteria = FilterCriteria::default();
        criteria.toggle_hosting(HostingType::SelfHosted);
        controller.set_criteria(criteria);
        assert_eq!(controller.criteria().search, "");
        assert!(controller.view().is_empty());
        assert!(controller.view().has_active_filters);
    }
}
