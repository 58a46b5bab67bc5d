//! Data types that flow through the scan-to-navigate pipeline.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::geometry::Vec3;

/// Text recovered from a camera frame by the marker decoder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedText {
    pub text: String,
}

impl DecodedText {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// One processed frame's decode result, stamped when it was produced.
#[derive(Debug, Clone)]
pub struct MarkerEvent {
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

impl MarkerEvent {
    pub fn now(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Lifecycle of the marker scan that gates the search surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanState {
    #[default]
    Idle,
    Scanning,
    Unlocked,
}

/// A filter request issued for the text the user typed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub raw_text: String,
    /// Monotonic within a session; later queries supersede earlier ones.
    pub sequence_id: u64,
}

/// A destination name as listed by the directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DestinationEntry {
    pub name: String,
}

/// The single live navigation target.
///
/// `generation` is the target's identity. Two targets resolved to the same
/// coordinates by different selections are still different targets.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NavigationTarget {
    pub generation: u64,
    pub position: Vec3,
}

/// Walkable polyline to the target it was computed for.
#[derive(Debug, Clone, PartialEq)]
pub struct PathResult {
    pub generation: u64,
    pub corners: Vec<Vec3>,
}
