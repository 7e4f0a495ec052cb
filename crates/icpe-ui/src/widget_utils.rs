//! Widget ID helpers
//!
//! Filter widgets are generated from data, so their IDs are derived from the
//! attribute key rather than from their label.

use std::fmt::Display;

/// Unique widget ID for a given context
pub fn widget_id(base: impl Display, suffix: impl Display) -> String {
    format!("{}_{}", base, suffix)
}
