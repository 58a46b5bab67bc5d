//! Presenters for the command-line kiosk.
//!
//! A real kiosk drives widgets and a line renderer from [`UiCommand`]s.
//! The CLI instead prints them: human-readable lines on **stderr**, or one
//! JSON object per line on **stdout** so a separate presentation process
//! can consume them.

use std::io::Write;
use std::sync::Mutex;

use wayfinder_core::commands::UiCommand;
use wayfinder_core::error::WayfindError;

use crate::traits::Presenter;

/// Human-friendly output on stderr: `search  showing 2 destinations`.
pub struct HumanPresenter;

impl Presenter for HumanPresenter {
    fn command(&self, command: UiCommand) {
        let line = format!("{}\n", describe(&command));
        let _ = std::io::stderr().lock().write_all(line.as_bytes());
    }

    fn report(&self, error: &WayfindError) {
        let _ = writeln!(std::io::stderr().lock(), "status  {}", error);
    }
}

fn describe(command: &UiCommand) -> String {
    match command {
        UiCommand::ShowScanner => "scanner  camera on, hold the marker in view".to_string(),
        UiCommand::HideScanner => "scanner  camera off".to_string(),
        UiCommand::ShowSearchSurface => "search   unlocked".to_string(),
        UiCommand::HideSearchSurface => "search   locked".to_string(),
        UiCommand::SetResultList { names } => {
            let mut out = format!("search   {} destination(s)", names.len());
            for (index, name) in names.iter().enumerate() {
                out.push_str(&format!("\n         [{}] {}", index, name));
            }
            out
        }
        UiCommand::ShowResultList => "search   list shown".to_string(),
        UiCommand::HideResultList => "search   list hidden".to_string(),
        UiCommand::SetQueryText { text } => format!("search   selected '{}'", text),
        UiCommand::PlaceTargetMarker { position } => format!("target   {}", position),
        UiCommand::RenderPath { corners } => {
            let points: Vec<String> = corners.iter().map(|c| format!("({})", c)).collect();
            format!("path     {}", points.join(" -> "))
        }
        UiCommand::PositionCamera { position, look_at } => {
            format!("camera   at ({}) looking at ({})", position, look_at)
        }
    }
}

/// Machine-readable output: one JSON object per line on stdout.
pub struct JsonPresenter;

impl Presenter for JsonPresenter {
    fn command(&self, command: UiCommand) {
        let mut obj = match serde_json::to_value(&command) {
            Ok(v) => v,
            Err(_) => return,
        };
        if let Some(map) = obj.as_object_mut() {
            map.insert("event".to_string(), serde_json::json!("command"));
        }
        emit_line(&obj);
    }

    fn report(&self, error: &WayfindError) {
        emit_line(&serde_json::json!({
            "event": "error",
            "code": error.code(),
            "message": error.to_string(),
        }));
    }
}

fn emit_line(obj: &serde_json::Value) {
    if let Ok(line) = serde_json::to_string(obj) {
        let mut out = std::io::stdout().lock();
        let _ = writeln!(out, "{}", line);
        let _ = out.flush();
    }
}

/// Keeps every command and error in memory, in order.
#[derive(Default)]
pub struct RecordingPresenter {
    commands: Mutex<Vec<UiCommand>>,
    errors: Mutex<Vec<WayfindError>>,
}

impl RecordingPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> Vec<UiCommand> {
        self.commands.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn errors(&self) -> Vec<WayfindError> {
        self.errors.lock().map(|e| e.clone()).unwrap_or_default()
    }

    /// Drops what has been recorded so far.
    pub fn clear(&self) {
        if let Ok(mut c) = self.commands.lock() {
            c.clear();
        }
        if let Ok(mut e) = self.errors.lock() {
            e.clear();
        }
    }
}

impl Presenter for RecordingPresenter {
    fn command(&self, command: UiCommand) {
        if let Ok(mut c) = self.commands.lock() {
            c.push(command);
        }
    }

    fn report(&self, error: &WayfindError) {
        if let Ok(mut e) = self.errors.lock() {
            e.push(error.clone());
        }
    }
}

/// Output mode for `wayfind run`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PresenterMode {
    Human,
    Json,
}

impl PresenterMode {
    /// Human output when stdout is a TTY, JSON when piped.
    pub fn default_for_tty() -> Self {
        if atty::is(atty::Stream::Stdout) {
            PresenterMode::Human
        } else {
            PresenterMode::Json
        }
    }

    pub fn parse(s: &str) -> anyhow::Result<Self> {
        match s {
            "human" => Ok(PresenterMode::Human),
            "json" => Ok(PresenterMode::Json),
            other => anyhow::bail!("Unknown output mode: '{}'. Must be human or json.", other),
        }
    }

    pub fn presenter(&self) -> std::sync::Arc<dyn Presenter> {
        match self {
            PresenterMode::Human => std::sync::Arc::new(HumanPresenter),
            PresenterMode::Json => std::sync::Arc::new(JsonPresenter),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wayfinder_core::geometry::Vec3;

    #[test]
    fn describe_lists_results_with_indices() {
        let text = describe(&UiCommand::SetResultList {
            names: vec!["Library".into(), "Library Annex".into()],
        });
        assert!(text.contains("2 destination(s)"));
        assert!(text.contains("[0] Library"));
        assert!(text.contains("[1] Library Annex"));
    }

    #[test]
    fn describe_path_joins_corners() {
        let text = describe(&UiCommand::RenderPath {
            corners: vec![Vec3::new(0.0, 0.0, 0.0), Vec3::new(10.0, 0.0, 20.0)],
        });
        assert_eq!(text, "path     (0,0,0) -> (10,0,20)");
    }

    #[test]
    fn parse_modes() {
        assert_eq!(PresenterMode::parse("json").unwrap(), PresenterMode::Json);
        assert_eq!(PresenterMode::parse("human").unwrap(), PresenterMode::Human);
        assert!(PresenterMode::parse("xml").is_err());
    }

    #[test]
    fn recording_keeps_order() {
        let rec = RecordingPresenter::new();
        rec.command(UiCommand::ShowSearchSurface);
        rec.command(UiCommand::HideResultList);
        rec.report(&WayfindError::NoPathFound);
        assert_eq!(
            rec.commands(),
            vec![UiCommand::ShowSearchSurface, UiCommand::HideResultList]
        );
        assert_eq!(rec.errors(), vec![WayfindError::NoPathFound]);
        rec.clear();
        assert!(rec.commands().is_empty());
    }
}
