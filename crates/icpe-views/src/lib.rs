//! Selection and rendering for the ICPE map
//!
//! [`SelectionEngine`] decides which records are shown, [`RenderCoordinator`]
//! turns that decision into a single marker layer on a [`MapSurface`], and
//! [`MapSession`] ties both to the user's filter, search and budget inputs.

mod coordinator;
mod map_view;
mod marker;
mod selection;
mod session;
mod surface;

pub use coordinator::{RenderCoordinator, RenderSummary};
pub use map_view::{MapResponse, MapStyle, MapView};
pub use marker::{LayerId, Marker, MarkerLayer, Popup, PopupLine};
pub use selection::{Rejection, SelectionEngine, SelectionOutcome, Verdict};
pub use session::{MapSession, SharedSession, TriggerToken};
pub use surface::MapSurface;
