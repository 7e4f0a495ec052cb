//! User interface components for the ICPE map
//!
//! The filter panel is the only producer of user interactions; it reports
//! them as [`PanelAction`]s and leaves applying them to the map session.

pub mod filter_panel;
pub mod theme;
pub mod widget_utils;

pub use filter_panel::{FilterPanel, PanelAction};
pub use theme::{Theme, apply_theme};
pub use widget_utils::widget_id;
