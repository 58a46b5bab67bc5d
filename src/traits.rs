//! Capability traits for everything the orchestrator does not own.
//!
//! The [`Orchestrator`](crate::orchestrator::Orchestrator) never reaches for
//! a camera, socket, or renderer on its own. Each external collaborator is a
//! trait object handed in through [`Capabilities`], so a kiosk build plugs
//! in real hardware and tests plug in fakes.
//!
//! ```text
//! ┌────────────────────────────────────────────────┐
//! │                  Orchestrator                  │
//! └──┬──────────┬──────────┬───────────┬───────────┘
//!    ▼          ▼          ▼           ▼
//!  Camera   Directory  PathPlanner  Presenter
//!  +Decoder  (HTTP)    (navmesh)    (UI, logs)
//! ```
//!
//! Synchronous traits ([`Camera`], [`MarkerDecoder`], [`Presenter`]) run
//! inside the event loop and must return promptly. Asynchronous traits
//! ([`Directory`], [`PathPlanner`]) run as tasks whose results are posted
//! back into the loop.

use async_trait::async_trait;
use std::sync::Arc;

use wayfinder_core::commands::UiCommand;
use wayfinder_core::error::WayfindError;
use wayfinder_core::geometry::Vec3;
use wayfinder_core::models::DecodedText;

// ═══════════════════════════════════════════════════════════════════════
// Directory
// ═══════════════════════════════════════════════════════════════════════

/// The destination directory backend.
///
/// Both operations are read-only and idempotent. Implementations hold no
/// session state and must tolerate concurrent calls. They must not retry;
/// whether to try again is the caller's decision.
///
/// # Example
///
/// ```rust
/// use async_trait::async_trait;
/// use wayfinder::traits::Directory;
/// use wayfinder_core::error::WayfindError;
/// use wayfinder_core::geometry::Vec3;
///
/// struct SingleRoom;
///
/// #[async_trait]
/// impl Directory for SingleRoom {
///     async fn filter(&self, query: &str) -> Result<Vec<String>, WayfindError> {
///         Ok(if "lobby".contains(&query.to_lowercase()) {
///             vec!["Lobby".to_string()]
///         } else {
///             Vec::new()
///         })
///     }
///
///     async fn resolve(&self, _destination: &str) -> Result<Vec3, WayfindError> {
///         Ok(Vec3::new(0.0, 0.0, 0.0))
///     }
/// }
/// ```
#[async_trait]
pub trait Directory: Send + Sync {
    /// Returns destination names matching `query`, in server order.
    ///
    /// Fails with [`WayfindError::DirectoryUnavailable`].
    async fn filter(&self, query: &str) -> Result<Vec<String>, WayfindError>;

    /// Returns the venue position of `destination`.
    ///
    /// Fails with [`WayfindError::DirectoryUnavailable`] or
    /// [`WayfindError::MalformedPosition`].
    async fn resolve(&self, destination: &str) -> Result<Vec3, WayfindError>;
}

// ═══════════════════════════════════════════════════════════════════════
// Camera + Decoder
// ═══════════════════════════════════════════════════════════════════════

/// One captured camera frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub pixels: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// The kiosk camera.
pub trait Camera: Send {
    /// Powers the camera up. Called when scanning begins.
    fn start(&mut self) -> Result<(), WayfindError>;

    /// Grabs the current frame. Failures are [`WayfindError::DecodeUnavailable`].
    fn capture(&mut self) -> Result<Frame, WayfindError>;

    /// Releases the camera. Called when scanning ends for any reason.
    fn stop(&mut self);
}

/// 2D-barcode decoder.
pub trait MarkerDecoder: Send {
    /// Returns the decoded payload, or `None` when the frame holds no marker.
    fn decode(&self, frame: &Frame) -> Option<DecodedText>;
}

// ═══════════════════════════════════════════════════════════════════════
// Navmesh
// ═══════════════════════════════════════════════════════════════════════

/// The pathfinding service.
#[async_trait]
pub trait PathPlanner: Send + Sync {
    /// Returns waypoints from `origin` to `destination`, in walking order.
    ///
    /// An empty list means no walkable route exists.
    async fn calculate_path(&self, origin: Vec3, destination: Vec3) -> Vec<Vec3>;
}

// ═══════════════════════════════════════════════════════════════════════
// Presenter
// ═══════════════════════════════════════════════════════════════════════

/// Receives everything the kiosk should show.
pub trait Presenter: Send + Sync {
    /// Apply a UI command.
    fn command(&self, command: UiCommand);

    /// Surface a non-fatal failure, e.g. as a transient status message.
    fn report(&self, error: &WayfindError);
}

/// The full set of collaborators an orchestrator runs against.
pub struct Capabilities {
    pub directory: Arc<dyn Directory>,
    pub camera: Box<dyn Camera>,
    pub decoder: Box<dyn MarkerDecoder>,
    pub planner: Arc<dyn PathPlanner>,
    pub presenter: Arc<dyn Presenter>,
}
