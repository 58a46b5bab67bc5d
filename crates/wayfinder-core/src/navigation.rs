//! Navigation target ownership.
//!
//! [`NavigationTargetController`] holds the single authoritative target and
//! the path currently on screen. Two kinds of asynchronous answers feed it,
//! and both are checked for staleness before they may change anything:
//!
//! - **Resolve responses** carry the ticket handed out by
//!   [`begin_resolve`](NavigationTargetController::begin_resolve). Only the
//!   latest ticket may set the target.
//! - **Path responses** carry the generation of the target they were
//!   computed for. Only the current target's generation may render.
//!
//! [`supersede_pending`](NavigationTargetController::supersede_pending)
//! retires both kinds of in-flight answers at once without touching what is
//! already on screen.
//!
//! Generations are identities, not coordinates: selecting two destinations
//! that happen to share a position still yields two distinct targets.

use crate::error::WayfindError;
use crate::geometry::{CameraPose, CameraRig, Vec3};
use crate::models::{NavigationTarget, PathResult};

/// A path computation the caller should hand to the navmesh service.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathRequest {
    pub generation: u64,
    pub origin: Vec3,
    pub destination: Vec3,
}

/// What to draw once a path for the current target arrives.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderPlan {
    pub corners: Vec<Vec3>,
    pub camera: CameraPose,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PathOutcome {
    /// The target changed while the path was being computed.
    Stale,
    Rendered(RenderPlan),
}

#[derive(Debug, Clone)]
pub struct NavigationTargetController {
    rig: CameraRig,
    observer: Vec3,
    target: Option<NavigationTarget>,
    path: Option<PathResult>,
    generation: u64,
    resolve_ticket: u64,
    /// Generation whose path answer is still awaited.
    pending_path: Option<u64>,
}

impl NavigationTargetController {
    pub fn new(rig: CameraRig, observer: Vec3) -> Self {
        Self {
            rig,
            observer,
            target: None,
            path: None,
            generation: 0,
            resolve_ticket: 0,
            pending_path: None,
        }
    }

    pub fn target(&self) -> Option<&NavigationTarget> {
        self.target.as_ref()
    }

    /// The path currently rendered, if any.
    pub fn path(&self) -> Option<&PathResult> {
        self.path.as_ref()
    }

    pub fn observer(&self) -> Vec3 {
        self.observer
    }

    /// Moves the path origin. Takes effect on the next path request.
    pub fn set_observer(&mut self, position: Vec3) {
        self.observer = position;
    }

    /// Opens a resolve for a newly selected destination.
    ///
    /// Any resolve still in flight for an earlier selection is superseded.
    pub fn begin_resolve(&mut self) -> u64 {
        self.resolve_ticket += 1;
        self.resolve_ticket
    }

    pub fn is_current_resolve(&self, ticket: u64) -> bool {
        ticket == self.resolve_ticket
    }

    /// Drops every resolve and path answer still in flight.
    ///
    /// The current target and rendered path are kept.
    pub fn supersede_pending(&mut self) {
        self.resolve_ticket += 1;
        self.pending_path = None;
    }

    /// Applies a resolve response.
    ///
    /// `Ok(None)` means the response was stale and dropped. Errors leave the
    /// current target untouched.
    pub fn on_resolved(
        &mut self,
        ticket: u64,
        result: Result<Vec3, WayfindError>,
    ) -> Result<Option<PathRequest>, WayfindError> {
        if !self.is_current_resolve(ticket) {
            return Ok(None);
        }
        let position = result?;
        Ok(Some(self.set_target(position)))
    }

    /// Replaces the target wholesale and returns the path request for it.
    pub fn set_target(&mut self, position: Vec3) -> PathRequest {
        self.generation += 1;
        self.target = Some(NavigationTarget {
            generation: self.generation,
            position,
        });
        self.pending_path = Some(self.generation);
        PathRequest {
            generation: self.generation,
            origin: self.observer,
            destination: position,
        }
    }

    /// Applies a navmesh answer.
    ///
    /// An empty corner list for the current target is `NoPathFound`; the
    /// previously rendered path stays as it is.
    pub fn on_path_result(
        &mut self,
        generation: u64,
        corners: Vec<Vec3>,
    ) -> Result<PathOutcome, WayfindError> {
        if self.pending_path != Some(generation) {
            return Ok(PathOutcome::Stale);
        }
        let Some(target) = self.target.filter(|t| t.generation == generation) else {
            return Ok(PathOutcome::Stale);
        };
        self.pending_path = None;
        if corners.is_empty() {
            return Err(WayfindError::NoPathFound);
        }
        self.path = Some(PathResult {
            generation,
            corners: corners.clone(),
        });
        Ok(PathOutcome::Rendered(RenderPlan {
            corners,
            camera: self.rig.pose_for(target.position),
        }))
    }
}

impl Default for NavigationTargetController {
    fn default() -> Self {
        Self::new(CameraRig::default(), Vec3::default())
    }
}
