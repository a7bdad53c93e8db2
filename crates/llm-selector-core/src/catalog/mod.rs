//! Model catalog: records, their source, the store and the filter pipeline.

pub mod controller;
pub mod filter;
pub mod lookup;
pub mod record;
pub mod source;
pub mod store;

pub use controller::{CatalogController, CatalogView};
pub use filter::{FilterCriteria, FilterStage};
pub use lookup::find_record;
pub use record::{
    HostingType, LicenseType, Modality, ModelRecord, OciAvailability, ParseTagError,
};
pub use source::{JsonFileSource, RecordSource, SupabaseSource};
pub use store::{LoadState, RecordStore, LOAD_FAILURE_MESSAGE};
