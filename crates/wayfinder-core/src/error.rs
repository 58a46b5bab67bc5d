//! Error kinds shared by the decision core and the native shell.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum WayfindError {
    /// The camera or marker decoder could not produce frames.
    #[error("marker decoder unavailable: {0}")]
    DecodeUnavailable(String),

    /// The directory backend could not be reached or answered with a failure status.
    #[error("destination directory unavailable: {0}")]
    DirectoryUnavailable(String),

    /// A resolve response was not three comma-separated numbers.
    #[error("malformed destination position: {0}")]
    MalformedPosition(String),

    /// The navmesh service returned no corners for the current target.
    #[error("no walkable path found to the target")]
    NoPathFound,

    /// A selection index outside the visible result list.
    #[error("selection index {index} out of range (results: {len})")]
    InvalidSelection { index: usize, len: usize },
}

impl WayfindError {
    /// Stable machine-readable code, used in JSON output.
    pub fn code(&self) -> &'static str {
        match self {
            WayfindError::DecodeUnavailable(_) => "decode_unavailable",
            WayfindError::DirectoryUnavailable(_) => "directory_unavailable",
            WayfindError::MalformedPosition(_) => "malformed_position",
            WayfindError::NoPathFound => "no_path_found",
            WayfindError::InvalidSelection { .. } => "invalid_selection",
        }
    }

    /// `InvalidSelection` is a UI-contract error: logged, never shown to visitors.
    pub fn is_user_visible(&self) -> bool {
        !matches!(self, WayfindError::InvalidSelection { .. })
    }
}
