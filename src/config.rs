//! TOML configuration.
//!
//! Every section is optional; a missing file section falls back to the
//! values the kiosk ships with. See `config/wayfind.example.toml`.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

use wayfinder_core::geometry::{CameraRig, Vec3};

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub directory: DirectoryConfig,
    #[serde(default)]
    pub scan: ScanConfig,
    #[serde(default)]
    pub camera: CameraRig,
    #[serde(default)]
    pub observer: ObserverConfig,
    #[serde(default)]
    pub navmesh: NavmeshConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub destinations: Vec<DestinationConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DirectoryConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:8080/unityAR/getTargetCube.php".to_string()
}
fn default_timeout_secs() -> u64 {
    10
}

#[derive(Debug, Deserialize, Clone)]
pub struct ScanConfig {
    #[serde(default = "default_sample_interval")]
    pub sample_interval_secs: f64,
    #[serde(default = "default_unlock_marker")]
    pub unlock_marker: String,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            sample_interval_secs: default_sample_interval(),
            unlock_marker: default_unlock_marker(),
        }
    }
}

impl ScanConfig {
    /// Values no `Duration` can hold fall back to the default interval.
    pub fn sample_interval(&self) -> Duration {
        Duration::try_from_secs_f64(self.sample_interval_secs)
            .unwrap_or_else(|_| Duration::from_secs_f64(default_sample_interval()))
    }
}

fn default_sample_interval() -> f64 {
    0.5
}
fn default_unlock_marker() -> String {
    wayfinder_core::UNLOCK_MARKER.to_string()
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct ObserverConfig {
    #[serde(default)]
    pub position: Vec3,
}

#[derive(Debug, Deserialize, Clone)]
pub struct NavmeshConfig {
    #[serde(default = "default_navmesh_provider")]
    pub provider: String,
}

impl Default for NavmeshConfig {
    fn default() -> Self {
        Self {
            provider: default_navmesh_provider(),
        }
    }
}

fn default_navmesh_provider() -> String {
    "direct".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
    #[serde(default = "default_server_path")]
    pub path: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            path: default_server_path(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:8080".to_string()
}
fn default_server_path() -> String {
    "/unityAR/getTargetCube.php".to_string()
}

/// A destination served by `wayfind serve`.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct DestinationConfig {
    pub name: String,
    pub position: Vec3,
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;
    validate(&config)?;
    Ok(config)
}

/// Checks the invariants serde cannot express.
pub fn validate(config: &Config) -> Result<()> {
    // Directory
    let url = reqwest::Url::parse(&config.directory.base_url).with_context(|| {
        format!(
            "directory.base_url is not a URL: {}",
            config.directory.base_url
        )
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        anyhow::bail!("directory.base_url must be http or https, got '{}'", url.scheme());
    }
    if config.directory.timeout_secs == 0 {
        anyhow::bail!("directory.timeout_secs must be > 0");
    }

    // Scan
    let interval = config.scan.sample_interval_secs;
    if !interval.is_finite() || interval <= 0.0 {
        anyhow::bail!("scan.sample_interval_secs must be > 0");
    }
    if Duration::try_from_secs_f64(interval).is_err() {
        anyhow::bail!("scan.sample_interval_secs is too large: {}", interval);
    }
    if config.scan.unlock_marker.is_empty() {
        anyhow::bail!("scan.unlock_marker must not be empty");
    }

    // Camera and observer
    for (key, value) in [
        ("camera.height_offset", config.camera.height_offset),
        ("camera.back_offset", config.camera.back_offset),
    ] {
        if !value.is_finite() {
            anyhow::bail!("{} must be a finite number", key);
        }
    }
    if !config.observer.position.is_finite() {
        anyhow::bail!("observer.position must be finite");
    }

    match config.navmesh.provider.as_str() {
        "direct" | "disabled" => {}
        other => anyhow::bail!(
            "Unknown navmesh provider: '{}'. Must be direct or disabled.",
            other
        ),
    }

    if !config.server.path.starts_with('/') {
        anyhow::bail!("server.path must start with '/'");
    }

    // Destinations go over a newline-separated wire format.
    let mut seen = HashSet::new();
    for dest in &config.destinations {
        if dest.name.trim().is_empty() {
            anyhow::bail!("destination names must not be empty");
        }
        if dest.name.contains(['\n', '\r']) {
            anyhow::bail!("destination name {:?} must not contain line breaks", dest.name);
        }
        if dest.name.trim() != dest.name {
            anyhow::bail!(
                "destination name {:?} must not have leading or trailing whitespace",
                dest.name
            );
        }
        if !dest.position.is_finite() {
            anyhow::bail!("destination '{}' has a non-finite position", dest.name);
        }
        if !seen.insert(dest.name.as_str()) {
            anyhow::bail!("duplicate destination: '{}'", dest.name);
        }
    }

    Ok(())
}
