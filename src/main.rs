//! # Wayfinder CLI (`wayfind`)
//!
//! Runs a wayfinding kiosk session on the terminal, queries the destination
//! directory, and serves a reference directory backend.
//!
//! ## Usage
//!
//! ```bash
//! wayfind --config ./config/wayfind.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `wayfind run` | Interactive kiosk session (stdin actions, simulated camera) |
//! | `wayfind search "<query>"` | Filter the directory and print matching names |
//! | `wayfind resolve "<name>"` | Resolve a destination to `x,y,z` |
//! | `wayfind serve` | Start the reference directory backend |
//! | `wayfind check` | Validate the configuration and print a summary |
//!
//! Logging goes to stderr and is controlled with `RUST_LOG`
//! (default `wayfinder=info`).

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use wayfinder::config::{self, Config};
use wayfinder::presenter::PresenterMode;
use wayfinder::{console, directory, server};

const DEFAULT_CONFIG: &str = "./config/wayfind.toml";

/// Wayfinder: scan-to-navigate orchestration for indoor AR wayfinding kiosks.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file. See `config/wayfind.example.toml` for a full example.
#[derive(Parser)]
#[command(
    name = "wayfind",
    about = "Wayfinder: scan-to-navigate orchestration for indoor AR wayfinding kiosks",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// Defaults to `./config/wayfind.toml`. If the default file does not
    /// exist, built-in defaults are used.
    #[arg(long, global = true, default_value = DEFAULT_CONFIG)]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run an interactive kiosk session.
    ///
    /// Reads one action per line from stdin (`scan`, `show DEST_MENU`,
    /// `type Lib`, `select 0`, ...). Type `help` for the full list.
    Run {
        /// Output format: `human` (stderr) or `json` (one object per line on stdout).
        /// Defaults to human on a terminal and json when piped.
        #[arg(long)]
        output: Option<String>,
    },

    /// Filter the directory and print matching destination names.
    Search {
        /// Free-text query.
        query: String,
    },

    /// Resolve a destination name to its venue position.
    Resolve {
        /// Exact destination name.
        name: String,
    },

    /// Start the reference directory backend.
    ///
    /// Serves `[[destinations]]` from the config on `[server].bind`.
    Serve,

    /// Validate the configuration and print a summary.
    Check,
}

fn load(path: &Path) -> anyhow::Result<Config> {
    if !path.exists() && path == Path::new(DEFAULT_CONFIG) {
        tracing::debug!("no config at {}, using defaults", path.display());
        return Ok(Config::default());
    }
    config::load_config(path)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wayfinder=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let cfg = load(&cli.config)?;

    match cli.command {
        Commands::Run { output } => {
            let mode = match output {
                Some(s) => PresenterMode::parse(&s)?,
                None => PresenterMode::default_for_tty(),
            };
            console::run_kiosk(&cfg, mode).await?;
        }
        Commands::Search { query } => {
            directory::run_search(&cfg, &query).await?;
        }
        Commands::Resolve { name } => {
            directory::run_resolve(&cfg, &name).await?;
        }
        Commands::Serve => {
            server::run_server(&cfg).await?;
        }
        Commands::Check => {
            println!("Configuration OK.");
            println!("  directory:     {}", cfg.directory.base_url);
            println!("  unlock marker: {}", cfg.scan.unlock_marker);
            println!("  sample every:  {}s", cfg.scan.sample_interval_secs);
            println!("  navmesh:       {}", cfg.navmesh.provider);
            println!("  observer:      {}", cfg.observer.position);
            println!("  destinations:  {}", cfg.destinations.len());
        }
    }

    Ok(())
}
