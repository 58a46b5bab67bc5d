//! # Wayfinder Core
//!
//! Pure decision logic for the Wayfinder kiosk: the data model, the three
//! state machines that make up the scan-to-navigate pipeline, the directory
//! wire format, and the command vocabulary emitted to a presentation layer.
//!
//! This crate performs no I/O. It holds no timers, sockets, or runtime
//! handles. Every operation takes an event and returns a decision; the
//! native shell (the `wayfinder` crate) executes the side effects and feeds
//! the results back in.
//!
//! ```text
//! frames ──▶ ScanGate ──unlock──▶ SearchSession ──select──▶ NavigationTargetController
//!                                      ▲                           │
//!                               filter responses            path results
//! ```
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`geometry`] | `Vec3` and overview camera placement |
//! | [`models`] | Marker events, queries, destinations, targets, paths |
//! | [`error`] | Typed error kinds shared by core and shell |
//! | [`commands`] | UI commands consumed by a presenter |
//! | [`wire`] | Directory response parsing |
//! | [`scan`] | `ScanGate` state machine |
//! | [`search`] | `SearchSession` with sequence-based staleness |
//! | [`navigation`] | `NavigationTargetController` with generation-based staleness |

pub mod commands;
pub mod error;
pub mod geometry;
pub mod models;
pub mod navigation;
pub mod scan;
pub mod search;
pub mod wire;

/// The decoded marker payload that unlocks the destination search surface.
pub const UNLOCK_MARKER: &str = "DEST_MENU";
