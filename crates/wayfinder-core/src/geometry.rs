//! Venue-space geometry.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A point in venue space (metres, y up).
///
/// Serializes as a three-element array so config files can write
/// `position = [10.0, 0.0, 20.0]`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "[f32; 3]", into = "[f32; 3]")]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl From<[f32; 3]> for Vec3 {
    fn from([x, y, z]: [f32; 3]) -> Self {
        Self { x, y, z }
    }
}

impl From<Vec3> for [f32; 3] {
    fn from(v: Vec3) -> Self {
        [v.x, v.y, v.z]
    }
}

/// Formats as the directory wire form, `x,y,z`.
impl fmt::Display for Vec3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.x, self.y, self.z)
    }
}

/// Offsets of the overview camera relative to the navigation target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraRig {
    /// Distance above the target.
    pub height_offset: f32,
    /// Distance behind the target along -z.
    pub back_offset: f32,
}

impl Default for CameraRig {
    fn default() -> Self {
        Self {
            height_offset: 10.0,
            back_offset: 10.0,
        }
    }
}

/// Where to put the overview camera and what it should look at.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CameraPose {
    pub position: Vec3,
    pub look_at: Vec3,
}

impl CameraRig {
    /// Places the camera above and behind `target`, looking at it.
    pub fn pose_for(&self, target: Vec3) -> CameraPose {
        CameraPose {
            position: Vec3::new(
                target.x,
                target.y + self.height_offset,
                target.z - self.back_offset,
            ),
            look_at: target,
        }
    }
}
