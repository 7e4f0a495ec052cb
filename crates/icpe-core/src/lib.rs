//! Core types for the ICPE facility map
//!
//! This crate holds the data model shared by the loading, selection and
//! rendering crates: records, geographic bounds, the per-pass selection
//! state and application settings.

pub mod geo;
pub mod record;
pub mod settings;
pub mod state;

// Re-export commonly used types
pub use geo::{GeoPoint, Viewport};
pub use record::Record;
pub use settings::{DatasetLocation, EmptySelectionPolicy, FieldSchema, FilterField, Settings, SettingsError};
pub use state::SelectionState;
