//! # Wayfinder
//!
//! Scan-to-navigate orchestration for indoor AR wayfinding kiosks.
//!
//! A visitor scans a fixed marker to unlock destination search, types or
//! browses a filtered destination list, picks one, and the kiosk draws a
//! walking path and swings an overview camera to the destination. This
//! crate is the native shell around the pure state machines in
//! [`wayfinder_core`]: it loads configuration, talks to the directory
//! backend over HTTP, runs the event loop, and prints UI commands.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐  ticks  ┌──────────────────────────────┐  commands  ┌───────────┐
//! │ Camera + │────────▶│         Orchestrator         │───────────▶│ Presenter │
//! │ Decoder  │         │ ScanGate · SearchSession ·   │            └───────────┘
//! └──────────┘         │ NavigationTargetController   │
//!                      └──────┬────────────────┬──────┘
//!                             ▼                ▼
//!                      ┌────────────┐   ┌────────────┐
//!                      │ Directory  │   │ PathPlanner│
//!                      │  (HTTP)    │   │ (navmesh)  │
//!                      └────────────┘   └────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! wayfind serve                 # reference directory from [[destinations]]
//! wayfind run                   # interactive kiosk on the terminal
//! wayfind search "Lib"          # one-shot filter
//! wayfind resolve "Library"     # one-shot resolve
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`traits`] | Capability traits for camera, directory, navmesh, presenter |
//! | [`directory`] | HTTP directory client |
//! | [`navmesh`] | Built-in path planners |
//! | [`orchestrator`] | Event loop wiring the state machines together |
//! | [`presenter`] | Human, JSON, and recording presenters |
//! | [`sim`] | Simulated camera and decoder |
//! | [`console`] | Terminal kiosk session |
//! | [`server`] | Reference directory backend |

pub mod config;
pub mod console;
pub mod directory;
pub mod navmesh;
pub mod orchestrator;
pub mod presenter;
pub mod server;
pub mod sim;
pub mod traits;
