//! Interactive kiosk session on the terminal (`wayfind run`).
//!
//! Stands in for the touch UI and camera: each stdin line is one UI action
//! or a change to what the simulated camera sees.
//!
//! | Line | Effect |
//! |------|--------|
//! | `scan` | press the scan button |
//! | `stop` | cancel scanning |
//! | `reset` | re-lock for the next visitor |
//! | `show <text>` | hold a marker with payload `<text>` in front of the camera |
//! | `hide` | take the marker away |
//! | `type [text]` | set the search field (no text clears it) |
//! | `submit <text>` | press enter in the search field |
//! | `select <index>` | pick a dropdown entry |
//! | `observer x,y,z` | move the kiosk's own position |
//! | `help` / `quit` | |

use anyhow::{bail, Context, Result};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

use wayfinder_core::wire::parse_position;

use crate::config::Config;
use crate::directory::DirectoryClient;
use crate::navmesh::create_planner;
use crate::orchestrator::{Orchestrator, UiEvent};
use crate::presenter::PresenterMode;
use crate::sim::{Scene, SimulatedCamera, TextFrameDecoder};
use crate::traits::Capabilities;

const HELP: &str = "commands: scan | stop | reset | show <text> | hide | type [text] | \
submit <text> | select <index> | observer x,y,z | help | quit";

#[derive(Debug, Clone, PartialEq)]
pub enum ConsoleInput {
    Ui(UiEvent),
    Show(String),
    Hide,
    Help,
    Quit,
}

/// Parses one console line. Blank lines yield `None`.
pub fn parse_line(line: &str) -> Result<Option<ConsoleInput>> {
    let line = line.trim_end_matches(['\r', '\n']);
    if line.trim().is_empty() {
        return Ok(None);
    }
    let trimmed = line.trim_start();
    let (word, rest) = trimmed.split_once(' ').unwrap_or((trimmed, ""));

    let input = match word {
        "scan" => ConsoleInput::Ui(UiEvent::StartScan),
        "stop" => ConsoleInput::Ui(UiEvent::StopScan),
        "reset" => ConsoleInput::Ui(UiEvent::Reset),
        "show" => {
            if rest.is_empty() {
                bail!("usage: show <text>");
            }
            ConsoleInput::Show(rest.to_string())
        }
        "hide" => ConsoleInput::Hide,
        "type" => ConsoleInput::Ui(UiEvent::QueryChanged(rest.to_string())),
        "submit" => ConsoleInput::Ui(UiEvent::Submit(rest.to_string())),
        "select" => {
            let index: usize = rest
                .trim()
                .parse()
                .with_context(|| format!("select expects an index, got '{}'", rest.trim()))?;
            ConsoleInput::Ui(UiEvent::Select(index))
        }
        "observer" => {
            let position = parse_position(rest).context("observer expects x,y,z")?;
            ConsoleInput::Ui(UiEvent::ObserverMoved(position))
        }
        "help" => ConsoleInput::Help,
        "quit" | "exit" => ConsoleInput::Quit,
        other => bail!("unknown command '{}'. {}", other, HELP),
    };
    Ok(Some(input))
}

/// Runs a kiosk session against the configured directory until `quit` or EOF.
pub async fn run_kiosk(config: &Config, mode: PresenterMode) -> Result<()> {
    let scene = Scene::new();
    let capabilities = Capabilities {
        directory: Arc::new(DirectoryClient::new(&config.directory)?),
        camera: Box::new(SimulatedCamera::new(scene.clone())),
        decoder: Box::new(TextFrameDecoder),
        planner: create_planner(&config.navmesh)?,
        presenter: mode.presenter(),
    };

    let orchestrator = Orchestrator::new(config, capabilities);
    let handle = orchestrator.handle();
    let event_loop = tokio::spawn(orchestrator.run());

    eprintln!("Wayfinder kiosk, directory {}", config.directory.base_url);
    eprintln!("{}", HELP);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let input = match parse_line(&line) {
            Ok(Some(input)) => input,
            Ok(None) => continue,
            Err(e) => {
                eprintln!("{}", e);
                continue;
            }
        };
        match input {
            ConsoleInput::Ui(event) => handle.send(event)?,
            ConsoleInput::Show(text) => scene.show(text),
            ConsoleInput::Hide => scene.clear(),
            ConsoleInput::Help => eprintln!("{}", HELP),
            ConsoleInput::Quit => break,
        }
    }

    // The loop may already be gone if it failed; its result is reported below.
    let _ = handle.shutdown();
    event_loop.await??;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use wayfinder_core::geometry::Vec3;

    fn parse(line: &str) -> ConsoleInput {
        parse_line(line).unwrap().expect("expected an input")
    }

    #[test]
    fn blank_lines_are_skipped() {
        assert!(parse_line("").unwrap().is_none());
        assert!(parse_line("   \r\n").unwrap().is_none());
    }

    #[test]
    fn type_keeps_text_verbatim() {
        assert_eq!(
            parse("type Library Annex"),
            ConsoleInput::Ui(UiEvent::QueryChanged("Library Annex".into()))
        );
        assert_eq!(
            parse("type  Lib"),
            ConsoleInput::Ui(UiEvent::QueryChanged(" Lib".into()))
        );
    }

    #[test]
    fn bare_type_clears() {
        assert_eq!(parse("type"), ConsoleInput::Ui(UiEvent::QueryChanged(String::new())));
    }

    #[test]
    fn select_parses_index() {
        assert_eq!(parse("select 1"), ConsoleInput::Ui(UiEvent::Select(1)));
        assert!(parse_line("select one").is_err());
        assert!(parse_line("select -1").is_err());
    }

    #[test]
    fn observer_parses_position() {
        assert_eq!(
            parse("observer 1,0,-2.5"),
            ConsoleInput::Ui(UiEvent::ObserverMoved(Vec3::new(1.0, 0.0, -2.5)))
        );
        assert!(parse_line("observer 1,0").is_err());
    }

    #[test]
    fn show_and_hide() {
        assert_eq!(parse("show DEST_MENU"), ConsoleInput::Show("DEST_MENU".into()));
        assert_eq!(parse("hide"), ConsoleInput::Hide);
        assert!(parse_line("show").is_err());
    }

    #[test]
    fn unknown_command_errors() {
        let err = parse_line("fly").unwrap_err();
        assert!(err.to_string().contains("unknown command"));
    }

    #[test]
    fn quit_aliases() {
        assert_eq!(parse("quit"), ConsoleInput::Quit);
        assert_eq!(parse("exit"), ConsoleInput::Quit);
    }
}
