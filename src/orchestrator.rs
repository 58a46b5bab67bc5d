//! The scan-to-navigate event loop.
//!
//! [`Orchestrator`] owns the three state machines from `wayfinder-core`
//! and a single queue of [`Event`]s. Everything that happens to the kiosk
//! arrives on that queue:
//!
//! | Source | Event |
//! |--------|-------|
//! | UI callbacks (via [`OrchestratorHandle`]) | [`Event::Ui`] |
//! | Frame sampler task | [`Event::SampleTick`] |
//! | Directory tasks | [`Event::FilterResponse`], [`Event::ResolveResponse`] |
//! | Navmesh tasks | [`Event::PathResponse`] |
//!
//! Each event is handled to completion before the next is taken. Network
//! and path requests run as tokio tasks that post their answer back, tagged
//! with the sequence id, resolve ticket, or target generation they were
//! issued for; the state machines drop answers that have been superseded.
//! In-flight requests are never aborted.
//!
//! The sampler is a cancellable task, not a thread. Stopping it aborts the
//! task, and ticks already queued by it carry an epoch the gate no longer
//! accepts.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use wayfinder_core::commands::UiCommand;
use wayfinder_core::error::WayfindError;
use wayfinder_core::geometry::Vec3;
use wayfinder_core::models::{MarkerEvent, NavigationTarget, PathResult, ScanState, SearchQuery};
use wayfinder_core::navigation::{NavigationTargetController, PathOutcome, PathRequest};
use wayfinder_core::scan::{FrameOutcome, ScanGate, ScanStart};
use wayfinder_core::search::{FilterOutcome, QueryDecision, SearchSession};

use crate::config::Config;
use crate::traits::{Camera, Capabilities, Directory, MarkerDecoder, PathPlanner, Presenter};

/// Input from the kiosk UI.
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    /// The visitor pressed the scan button.
    StartScan,
    StopScan,
    /// Re-lock the kiosk for the next visitor.
    Reset,
    /// The search field's text changed.
    QueryChanged(String),
    /// The visitor pressed enter in the search field.
    Submit(String),
    /// The visitor picked a dropdown entry.
    Select(usize),
    /// The kiosk's own position in the venue changed.
    ObserverMoved(Vec3),
    /// Stop the event loop.
    Shutdown,
}

#[derive(Debug)]
pub enum Event {
    Ui(UiEvent),
    SampleTick {
        epoch: u64,
    },
    FilterResponse {
        sequence_id: u64,
        result: Result<Vec<String>, WayfindError>,
    },
    ResolveResponse {
        ticket: u64,
        destination: String,
        result: Result<Vec3, WayfindError>,
    },
    PathResponse {
        generation: u64,
        corners: Vec<Vec3>,
    },
}

/// Cloneable sender for UI events.
#[derive(Debug, Clone)]
pub struct OrchestratorHandle {
    tx: mpsc::UnboundedSender<Event>,
}

impl OrchestratorHandle {
    pub fn send(&self, event: UiEvent) -> anyhow::Result<()> {
        self.tx
            .send(Event::Ui(event))
            .map_err(|_| anyhow::anyhow!("orchestrator has shut down"))
    }

    pub fn start_scan(&self) -> anyhow::Result<()> {
        self.send(UiEvent::StartScan)
    }

    pub fn stop_scan(&self) -> anyhow::Result<()> {
        self.send(UiEvent::StopScan)
    }

    pub fn reset(&self) -> anyhow::Result<()> {
        self.send(UiEvent::Reset)
    }

    pub fn query_changed(&self, text: impl Into<String>) -> anyhow::Result<()> {
        self.send(UiEvent::QueryChanged(text.into()))
    }

    pub fn submit(&self, text: impl Into<String>) -> anyhow::Result<()> {
        self.send(UiEvent::Submit(text.into()))
    }

    pub fn select(&self, index: usize) -> anyhow::Result<()> {
        self.send(UiEvent::Select(index))
    }

    pub fn observer_moved(&self, position: Vec3) -> anyhow::Result<()> {
        self.send(UiEvent::ObserverMoved(position))
    }

    pub fn shutdown(&self) -> anyhow::Result<()> {
        self.send(UiEvent::Shutdown)
    }
}

pub struct Orchestrator {
    gate: ScanGate,
    session: SearchSession,
    nav: NavigationTargetController,
    directory: Arc<dyn Directory>,
    camera: Box<dyn Camera>,
    decoder: Box<dyn MarkerDecoder>,
    planner: Arc<dyn PathPlanner>,
    presenter: Arc<dyn Presenter>,
    sample_interval: Duration,
    sampler: Option<JoinHandle<()>>,
    unlocked_by: Option<MarkerEvent>,
    tx: mpsc::UnboundedSender<Event>,
    rx: mpsc::UnboundedReceiver<Event>,
}

impl Orchestrator {
    pub fn new(config: &Config, capabilities: Capabilities) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            gate: ScanGate::new(config.scan.unlock_marker.clone()),
            session: SearchSession::new(),
            nav: NavigationTargetController::new(config.camera, config.observer.position),
            directory: capabilities.directory,
            camera: capabilities.camera,
            decoder: capabilities.decoder,
            planner: capabilities.planner,
            presenter: capabilities.presenter,
            sample_interval: config.scan.sample_interval(),
            sampler: None,
            unlocked_by: None,
            tx,
            rx,
        }
    }

    pub fn handle(&self) -> OrchestratorHandle {
        OrchestratorHandle {
            tx: self.tx.clone(),
        }
    }

    pub fn scan_state(&self) -> ScanState {
        self.gate.state()
    }

    /// Destination names currently in the result list.
    pub fn results(&self) -> Vec<String> {
        self.session.names()
    }

    pub fn target(&self) -> Option<NavigationTarget> {
        self.nav.target().copied()
    }

    pub fn rendered_path(&self) -> Option<&PathResult> {
        self.nav.path()
    }

    /// The decode that unlocked search, until the next reset.
    pub fn unlocked_by(&self) -> Option<&MarkerEvent> {
        self.unlocked_by.as_ref()
    }

    /// Puts every surface into its locked starting state.
    pub fn initialize(&self) {
        self.presenter.command(UiCommand::HideScanner);
        self.presenter.command(UiCommand::HideSearchSurface);
        self.presenter.command(UiCommand::HideResultList);
    }

    /// Runs until [`UiEvent::Shutdown`].
    pub async fn run(mut self) -> anyhow::Result<()> {
        self.initialize();
        while self.step().await {}
        self.cancel_sampler();
        info!("orchestrator stopped");
        Ok(())
    }

    /// Waits for the next event and handles it. Returns `false` on shutdown.
    pub async fn step(&mut self) -> bool {
        match self.rx.recv().await {
            None | Some(Event::Ui(UiEvent::Shutdown)) => false,
            Some(event) => {
                self.dispatch(event);
                true
            }
        }
    }

    /// Handles one event to completion.
    pub fn dispatch(&mut self, event: Event) {
        match event {
            Event::Ui(ui) => self.on_ui(ui),
            Event::SampleTick { epoch } => self.on_sample_tick(epoch),
            Event::FilterResponse {
                sequence_id,
                result,
            } => self.on_filter_response(sequence_id, result),
            Event::ResolveResponse {
                ticket,
                destination,
                result,
            } => self.on_resolve_response(ticket, &destination, result),
            Event::PathResponse {
                generation,
                corners,
            } => self.on_path_response(generation, corners),
        }
    }

    fn on_ui(&mut self, event: UiEvent) {
        match event {
            UiEvent::StartScan => self.start_scan(),
            UiEvent::StopScan => {
                if self.gate.stop() {
                    self.end_scan();
                }
            }
            UiEvent::Reset => self.reset(),
            UiEvent::QueryChanged(text) => {
                if self.search_unlocked() {
                    let decision = self.session.on_query_changed(&text);
                    self.apply_query(decision);
                }
            }
            UiEvent::Submit(text) => {
                if self.search_unlocked() {
                    let decision = self.session.on_submit(&text);
                    self.apply_query(decision);
                }
            }
            UiEvent::Select(index) => {
                if self.search_unlocked() {
                    self.select(index);
                }
            }
            UiEvent::ObserverMoved(position) => self.nav.set_observer(position),
            UiEvent::Shutdown => {}
        }
    }

    // ============ Scanning ============

    fn start_scan(&mut self) {
        let epoch = match self.gate.start() {
            ScanStart::Began { epoch } => epoch,
            ScanStart::AlreadyScanning => {
                debug!("scan already running");
                return;
            }
            ScanStart::AlreadyUnlocked => {
                debug!("search already unlocked; reset to scan again");
                return;
            }
        };

        if let Err(err) = self.camera.start() {
            let err = self.gate.fail(decode_detail(err));
            warn!(%err, "camera failed to start");
            self.presenter.report(&err);
            return;
        }

        info!(epoch, interval = ?self.sample_interval, "scanning for marker");
        self.presenter.command(UiCommand::ShowScanner);
        self.spawn_sampler(epoch);
    }

    fn spawn_sampler(&mut self, epoch: u64) {
        self.cancel_sampler();
        let tx = self.tx.clone();
        // interval() panics on a zero period.
        let period = self.sample_interval.max(Duration::from_millis(1));
        self.sampler = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if tx.send(Event::SampleTick { epoch }).is_err() {
                    break;
                }
            }
        }));
    }

    fn cancel_sampler(&mut self) {
        if let Some(sampler) = self.sampler.take() {
            sampler.abort();
        }
    }

    fn on_sample_tick(&mut self, epoch: u64) {
        if !self.gate.is_current(epoch) {
            debug!(epoch, "dropping tick from a finished scan");
            return;
        }

        let frame = match self.camera.capture() {
            Ok(frame) => frame,
            Err(err) => {
                let err = self.gate.fail(decode_detail(err));
                self.end_scan();
                warn!(%err, "frame capture failed");
                self.presenter.report(&err);
                return;
            }
        };

        let decoded = self.decoder.decode(&frame);
        if let Some(d) = &decoded {
            debug!(text = %d.text, "decoded marker");
        }

        if self.gate.on_frame_decoded(decoded.as_ref()) == FrameOutcome::Unlocked {
            let event = MarkerEvent::now(self.gate.unlock_marker());
            info!(marker = %event.text, at = %event.timestamp, "unlock marker recognized");
            self.unlocked_by = Some(event);
            self.end_scan();
            self.presenter.command(UiCommand::ShowSearchSurface);
        }
    }

    /// Stops sampling and releases the camera.
    fn end_scan(&mut self) {
        self.cancel_sampler();
        self.camera.stop();
        self.presenter.command(UiCommand::HideScanner);
    }

    fn reset(&mut self) {
        if self.gate.stop() {
            self.end_scan();
        }
        self.gate.reset();
        self.session.clear();
        self.nav.supersede_pending();
        self.unlocked_by = None;
        info!("kiosk reset");
        self.presenter.command(UiCommand::SetResultList { names: Vec::new() });
        self.presenter.command(UiCommand::HideResultList);
        self.presenter.command(UiCommand::HideSearchSurface);
    }

    // ============ Search ============

    fn search_unlocked(&self) -> bool {
        let unlocked = self.gate.state() == ScanState::Unlocked;
        if !unlocked {
            debug!("search surface is locked; ignoring input");
        }
        unlocked
    }

    fn apply_query(&mut self, decision: QueryDecision) {
        match decision {
            QueryDecision::Ignore => {}
            QueryDecision::Clear => {
                self.presenter.command(UiCommand::SetResultList { names: Vec::new() });
                self.presenter.command(UiCommand::HideResultList);
            }
            QueryDecision::Issue(query) => self.spawn_filter(query),
        }
    }

    fn spawn_filter(&self, query: SearchQuery) {
        debug!(sequence_id = query.sequence_id, query = %query.raw_text, "filter request");
        let directory = Arc::clone(&self.directory);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = directory.filter(&query.raw_text).await;
            let _ = tx.send(Event::FilterResponse {
                sequence_id: query.sequence_id,
                result,
            });
        });
    }

    fn on_filter_response(&mut self, sequence_id: u64, result: Result<Vec<String>, WayfindError>) {
        match result {
            Ok(lines) => match self.session.on_filter_response(sequence_id, lines) {
                FilterOutcome::Stale => {
                    debug!(sequence_id, "discarding stale filter response");
                }
                FilterOutcome::Updated { visible } => {
                    self.presenter.command(UiCommand::SetResultList {
                        names: self.session.names(),
                    });
                    self.presenter.command(if visible {
                        UiCommand::ShowResultList
                    } else {
                        UiCommand::HideResultList
                    });
                }
            },
            Err(err) => {
                let detail = match err {
                    WayfindError::DirectoryUnavailable(detail) => detail,
                    other => other.to_string(),
                };
                match self.session.on_filter_failure(sequence_id, detail) {
                    Some(err) => {
                        warn!(%err, "filter request failed; keeping last results");
                        self.presenter.report(&err);
                    }
                    None => debug!(sequence_id, "discarding stale filter failure"),
                }
            }
        }
    }

    fn select(&mut self, index: usize) {
        let entry = match self.session.on_select(index) {
            Ok(entry) => entry,
            Err(err) => {
                warn!(%err, "ignoring selection");
                return;
            }
        };

        self.presenter.command(UiCommand::SetQueryText {
            text: entry.name.clone(),
        });

        let ticket = self.nav.begin_resolve();
        debug!(ticket, destination = %entry.name, "resolve request");
        let directory = Arc::clone(&self.directory);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = directory.resolve(&entry.name).await;
            let _ = tx.send(Event::ResolveResponse {
                ticket,
                destination: entry.name,
                result,
            });
        });
    }

    // ============ Navigation ============

    fn on_resolve_response(
        &mut self,
        ticket: u64,
        destination: &str,
        result: Result<Vec3, WayfindError>,
    ) {
        match self.nav.on_resolved(ticket, result) {
            Ok(None) => debug!(ticket, destination, "discarding stale resolve response"),
            Ok(Some(request)) => {
                info!(destination, position = %request.destination, "navigation target set");
                self.presenter.command(UiCommand::PlaceTargetMarker {
                    position: request.destination,
                });
                self.spawn_path(request);
            }
            Err(err) => {
                warn!(%err, destination, "resolve failed; keeping current target");
                self.presenter.report(&err);
            }
        }
    }

    fn spawn_path(&self, request: PathRequest) {
        let planner = Arc::clone(&self.planner);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let corners = planner
                .calculate_path(request.origin, request.destination)
                .await;
            let _ = tx.send(Event::PathResponse {
                generation: request.generation,
                corners,
            });
        });
    }

    fn on_path_response(&mut self, generation: u64, corners: Vec<Vec3>) {
        match self.nav.on_path_result(generation, corners) {
            Ok(PathOutcome::Stale) => debug!(generation, "discarding path for a replaced target"),
            Ok(PathOutcome::Rendered(plan)) => {
                self.presenter.command(UiCommand::RenderPath {
                    corners: plan.corners,
                });
                self.presenter.command(UiCommand::PositionCamera {
                    position: plan.camera.position,
                    look_at: plan.camera.look_at,
                });
            }
            Err(err) => {
                warn!(%err, generation, "keeping previous path");
                self.presenter.report(&err);
            }
        }
    }
}

impl Drop for Orchestrator {
    fn drop(&mut self) {
        self.cancel_sampler();
    }
}

fn decode_detail(err: WayfindError) -> String {
    match err {
        WayfindError::DecodeUnavailable(detail) => detail,
        other => other.to_string(),
    }
}
