//! Commands emitted to the presentation layer.
//!
//! The core never renders anything. It describes what the kiosk surfaces
//! should show, and a presenter turns these into widget updates, line
//! renderers, and camera moves.

use serde::Serialize;

use crate::geometry::Vec3;

/// One instruction for the presentation layer.
///
/// Serializes internally tagged:
///
/// ```json
/// {"command":"render_path","corners":[[0.0,0.0,0.0],[10.0,0.0,20.0]]}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum UiCommand {
    /// Show the camera preview and scan overlay.
    ShowScanner,
    /// Hide the camera preview and scan overlay.
    HideScanner,
    /// Reveal the search input and result dropdown.
    ShowSearchSurface,
    /// Hide the search input and result dropdown.
    HideSearchSurface,
    /// Replace the dropdown options.
    SetResultList { names: Vec<String> },
    ShowResultList,
    HideResultList,
    /// Write the chosen destination back into the search input.
    SetQueryText { text: String },
    /// Move the target marker to the new destination.
    PlaceTargetMarker { position: Vec3 },
    /// Draw the walking path through these corners, in order.
    RenderPath { corners: Vec<Vec3> },
    /// Move the overview camera.
    PositionCamera { position: Vec3, look_at: Vec3 },
}
