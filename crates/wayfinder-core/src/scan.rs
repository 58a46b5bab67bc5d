//! Marker scan gate.
//!
//! The search surface stays hidden until the camera decodes the unlock
//! marker. [`ScanGate`] is the state machine deciding when that happens:
//!
//! ```text
//!          start()              marker decoded
//!   Idle ──────────▶ Scanning ─────────────────▶ Unlocked
//!    ▲                 │  stop() / fail()            │
//!    └─────────────────┘◀────────── reset() ─────────┘
//! ```
//!
//! The gate owns no timer. [`ScanGate::start`] tells the caller to begin
//! sampling frames and returns the epoch of the new scanning session; the
//! caller tags each sample tick with it and checks [`ScanGate::is_current`]
//! so ticks queued by an earlier session are never processed.

use crate::error::WayfindError;
use crate::models::{DecodedText, ScanState};

/// Result of [`ScanGate::start`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanStart {
    /// A new scanning session began; sample frames tagged with this epoch.
    Began { epoch: u64 },
    /// Already scanning; nothing to do.
    AlreadyScanning,
    /// The surface is unlocked; scanning again requires `reset()`.
    AlreadyUnlocked,
}

/// Result of [`ScanGate::on_frame_decoded`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// No transition.
    Ignored,
    /// The marker was recognized. Stop sampling and show the search surface.
    Unlocked,
}

#[derive(Debug, Clone)]
pub struct ScanGate {
    state: ScanState,
    unlock_marker: String,
    epoch: u64,
}

impl ScanGate {
    pub fn new(unlock_marker: impl Into<String>) -> Self {
        Self {
            state: ScanState::Idle,
            unlock_marker: unlock_marker.into(),
            epoch: 0,
        }
    }

    pub fn state(&self) -> ScanState {
        self.state
    }

    pub fn unlock_marker(&self) -> &str {
        &self.unlock_marker
    }

    /// Whether a tick tagged with `epoch` belongs to the live scanning session.
    pub fn is_current(&self, epoch: u64) -> bool {
        self.state == ScanState::Scanning && self.epoch == epoch
    }

    pub fn start(&mut self) -> ScanStart {
        match self.state {
            ScanState::Idle => {
                self.epoch += 1;
                self.state = ScanState::Scanning;
                ScanStart::Began { epoch: self.epoch }
            }
            ScanState::Scanning => ScanStart::AlreadyScanning,
            ScanState::Unlocked => ScanStart::AlreadyUnlocked,
        }
    }

    /// Feeds one frame's decode result.
    ///
    /// Only the exact unlock marker, while scanning, causes a transition.
    /// Once unlocked, further marker sightings are ignored.
    pub fn on_frame_decoded(&mut self, result: Option<&DecodedText>) -> FrameOutcome {
        if self.state != ScanState::Scanning {
            return FrameOutcome::Ignored;
        }
        match result {
            Some(decoded) if decoded.text == self.unlock_marker => {
                self.state = ScanState::Unlocked;
                FrameOutcome::Unlocked
            }
            _ => FrameOutcome::Ignored,
        }
    }

    /// Cancels scanning. Returns `true` if a scanning session was stopped.
    pub fn stop(&mut self) -> bool {
        if self.state == ScanState::Scanning {
            self.state = ScanState::Idle;
            true
        } else {
            false
        }
    }

    /// Records a camera or decoder failure and drops back to `Idle`.
    ///
    /// The returned error is for the caller to surface; the gate does not retry.
    /// An unlocked gate stays unlocked.
    pub fn fail(&mut self, detail: impl Into<String>) -> WayfindError {
        if self.state == ScanState::Scanning {
            self.state = ScanState::Idle;
        }
        WayfindError::DecodeUnavailable(detail.into())
    }

    /// Re-locks the search surface for the next visitor.
    pub fn reset(&mut self) {
        self.state = ScanState::Idle;
    }
}

impl Default for ScanGate {
    fn default() -> Self {
        Self::new(crate::UNLOCK_MARKER)
    }
}
