//! Smoke tests for the `wayfind` binary.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::Duration;
use tempfile::TempDir;

use wayfinder::config::load_config;
use wayfinder::server::spawn_server;

fn wayfind_binary() -> PathBuf {
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove deps/
    path.push("wayfind");
    path
}

const VENUE: &str = r#"
[scan]
sample_interval_secs = 0.05

[server]
bind = "127.0.0.1:0"

[[destinations]]
name = "Library"
position = [1.5, 2.0, -3.25]

[[destinations]]
name = "Library Annex"
position = [10.0, 0.0, 20.0]
"#;

fn write_config(dir: &TempDir, content: &str) -> PathBuf {
    let path = dir.path().join("wayfind.toml");
    fs::write(&path, content).unwrap();
    path
}

fn run_wayfind(config_path: &Path, args: &[&str]) -> (String, String, bool) {
    let binary = wayfind_binary();
    let output = Command::new(&binary)
        .arg("--config")
        .arg(config_path)
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("Failed to run wayfind binary at {:?}: {}", binary, e));

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (stdout, stderr, output.status.success())
}

#[test]
fn check_summarizes_valid_config() {
    let tmp = TempDir::new().unwrap();
    let config = write_config(&tmp, VENUE);

    let (stdout, stderr, success) = run_wayfind(&config, &["check"]);
    assert!(success, "check failed: {}", stderr);
    assert!(stdout.contains("Configuration OK."));
    assert!(stdout.contains("unlock marker: DEST_MENU"));
    assert!(stdout.contains("destinations:  2"));
}

#[test]
fn check_rejects_zero_sample_interval() {
    let tmp = TempDir::new().unwrap();
    let config = write_config(&tmp, "[scan]\nsample_interval_secs = 0.0\n");

    let (_, stderr, success) = run_wayfind(&config, &["check"]);
    assert!(!success);
    assert!(stderr.contains("sample_interval_secs"), "stderr: {}", stderr);
}

#[test]
fn check_rejects_duplicate_destinations() {
    let tmp = TempDir::new().unwrap();
    let config = write_config(
        &tmp,
        "[[destinations]]\nname = \"Gym\"\nposition = [0.0, 0.0, 0.0]\n\n\
         [[destinations]]\nname = \"Gym\"\nposition = [1.0, 0.0, 1.0]\n",
    );

    let (_, stderr, success) = run_wayfind(&config, &["check"]);
    assert!(!success);
    assert!(stderr.contains("duplicate destination"), "stderr: {}", stderr);
}

#[test]
fn missing_explicit_config_is_an_error() {
    let tmp = TempDir::new().unwrap();
    let (_, stderr, success) = run_wayfind(&tmp.path().join("absent.toml"), &["check"]);
    assert!(!success);
    assert!(stderr.contains("Failed to read config file"));
}

#[test]
fn example_config_is_valid() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("config/wayfind.example.toml");
    let config = load_config(&path).unwrap();
    assert_eq!(config.scan.unlock_marker, "DEST_MENU");
    assert!(!config.destinations.is_empty());
}

#[test]
fn run_json_unlocks_on_marker() {
    let tmp = TempDir::new().unwrap();
    let config = write_config(&tmp, VENUE);

    let mut child = Command::new(wayfind_binary())
        .arg("--config")
        .arg(&config)
        .args(["run", "--output", "json"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();

    let mut stdin = child.stdin.take().unwrap();
    stdin.write_all(b"show DEST_MENU\nscan\n").unwrap();
    stdin.flush().unwrap();
    std::thread::sleep(Duration::from_millis(800));
    stdin.write_all(b"quit\n").unwrap();
    drop(stdin);

    let output = child.wait_with_output().unwrap();
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let commands: Vec<String> = stdout
        .lines()
        .map(|line| {
            let value: serde_json::Value = serde_json::from_str(line).unwrap();
            assert_eq!(value["event"], "command");
            value["command"].as_str().unwrap().to_string()
        })
        .collect();
    assert_eq!(
        commands,
        vec![
            "hide_scanner",
            "hide_search_surface",
            "hide_result_list",
            "show_scanner",
            "hide_scanner",
            "show_search_surface"
        ]
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn search_and_resolve_against_reference_server() {
    let tmp = TempDir::new().unwrap();
    let venue = load_config(&write_config(&tmp, VENUE)).unwrap();
    let (addr, _server) = spawn_server(&venue).await.unwrap();

    let client_config = write_config(
        &tmp,
        &format!(
            "[directory]\nbase_url = \"http://{}{}\"\n",
            addr, venue.server.path
        ),
    );

    let (stdout, stderr, success) = run_wayfind(&client_config, &["search", "lib"]);
    assert!(success, "search failed: {}", stderr);
    let names: Vec<&str> = stdout.lines().map(|l| l.trim()).collect();
    assert_eq!(names, vec!["0  Library", "1  Library Annex"]);

    let (stdout, stderr, success) = run_wayfind(&client_config, &["resolve", "Library Annex"]);
    assert!(success, "resolve failed: {}", stderr);
    assert_eq!(stdout.trim(), "10,0,20");

    let (_, stderr, success) = run_wayfind(&client_config, &["resolve", "Observatory"]);
    assert!(!success);
    assert!(stderr.contains("404"), "stderr: {}", stderr);
}
