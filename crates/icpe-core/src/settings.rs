//! Application settings
//!
//! Settings are read from an optional JSON file; every field has a default so
//! a partial file only overrides what it names.

use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geo::GeoPoint;

/// Errors raised while reading a settings file
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed settings: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid settings: {0}")]
    Invalid(String),
}

/// Where the dataset is fetched from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DatasetLocation {
    File { path: PathBuf },
    Http { url: String },
}

impl Default for DatasetLocation {
    fn default() -> Self {
        DatasetLocation::Http {
            url: "http://localhost:8080/icpe/data/icpe.geo.json".to_string(),
        }
    }
}

/// What to show when neither a filter nor a search narrows the selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptySelectionPolicy {
    /// Nothing is drawn until the user picks at least one constraint
    #[default]
    ShowNothing,
    /// Every record in the viewport is eligible, within the budget
    ShowAllInViewport,
}

/// A categorical attribute offered as a filter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterField {
    pub key: String,
    pub label: String,
}

impl FilterField {
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
        }
    }
}

/// Which record attributes play which role
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldSchema {
    /// Filterable attributes, in display order
    pub filters: Vec<FilterField>,

    /// Attributes matched by the free-text search
    pub search: Vec<String>,

    /// Attributes listed in a marker popup, in order
    pub popup: Vec<String>,

    /// Attribute holding the external record sheet URL
    pub link: Option<String>,
}

impl Default for FieldSchema {
    fn default() -> Self {
        let filters = [
            ("num_dep", "Département"),
            ("code_naf", "Code NAF"),
            ("lib_naf", "Activité (NAF)"),
            ("regime", "Code régime"),
            ("lib_regime", "Régime"),
            ("ippc", "IPPC"),
            ("seveso", "Code Seveso"),
            ("lib_seveso", "Seveso"),
            ("Seveso", "Statut Seveso"),
            ("famille_ic", "Famille"),
        ]
        .into_iter()
        .map(|(key, label)| FilterField::new(key, label))
        .collect();

        Self {
            filters,
            search: ["lib_naf", "famille_ic", "nom_ets", "nom_commune"]
                .into_iter()
                .map(String::from)
                .collect(),
            popup: ["nom_ets", "lib_naf", "famille_ic", "lib_regime", "nom_commune"]
                .into_iter()
                .map(String::from)
                .collect(),
            link: Some("url_fiche".to_string()),
        }
    }
}

/// Application settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Dataset location
    pub dataset: DatasetLocation,

    /// Map center at startup
    pub initial_center: GeoPoint,

    /// Map zoom level at startup
    pub initial_zoom: f64,

    /// Maximum number of markers drawn at once
    pub default_budget: usize,

    /// Budget added by each "increase limit" action
    pub budget_step: usize,

    /// Minimum search length, in characters, before search narrows results
    pub min_search_len: usize,

    /// Behaviour when no filter and no search is active
    pub empty_selection: EmptySelectionPolicy,

    /// Fixed seed for the load-time shuffle; random when unset
    pub shuffle_seed: Option<u64>,

    /// Total fetch attempts before giving up
    pub fetch_attempts: u32,

    /// Delay before the first retry, doubled on each further retry
    pub fetch_backoff_ms: u64,

    /// Attribute roles
    pub fields: FieldSchema,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            dataset: DatasetLocation::default(),
            initial_center: GeoPoint::new(48.393011982751744, -2.6470516079040847),
            initial_zoom: 13.0,
            default_budget: 500,
            budget_step: 500,
            min_search_len: 3,
            empty_selection: EmptySelectionPolicy::default(),
            shuffle_seed: None,
            fetch_attempts: 3,
            fetch_backoff_ms: 500,
            fields: FieldSchema::default(),
        }
    }
}

impl Settings {
    /// Default settings file name, looked up in the working directory
    pub const FILE_NAME: &'static str = "icpe-map.json";

    /// Read and validate a settings file
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let text = std::fs::read_to_string(path)?;
        let settings: Settings = serde_json::from_str(&text)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Read a settings file, falling back to defaults when it does not exist
    pub fn load_or_default(path: &Path) -> Result<Self, SettingsError> {
        if !path.exists() {
            tracing::info!("No settings file at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let settings = Self::load(path)?;
        tracing::info!("Loaded settings from {:?}", path);
        Ok(settings)
    }

    /// Check values that would make the map unusable
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.default_budget == 0 {
            return Err(SettingsError::Invalid("default_budget must be positive".to_string()));
        }
        if self.budget_step == 0 {
            return Err(SettingsError::Invalid("budget_step must be positive".to_string()));
        }
        if self.fetch_attempts == 0 {
            return Err(SettingsError::Invalid("fetch_attempts must be at least 1".to_string()));
        }
        Ok(())
    }
}
