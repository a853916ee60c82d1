//! Records module
//!
//! The persisted data model (plants and dose events) and the record
//! store that owns both collections.

pub mod models;
pub mod store;

pub use models::{
    parse_time, CreatePlantRequest, DoseEvent, FrequencyPreset, Plant, PlantDuration,
    DURATION_PRESETS, FREQUENCY_PRESETS,
};
pub use store::RecordStore;
