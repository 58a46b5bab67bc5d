//! Directory client against a live HTTP backend.
//!
//! Most tests start the reference server on an ephemeral port; the
//! malformed-body cases stand up a one-route axum app instead.

use axum::{routing::get, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use wayfinder::config::{Config, DestinationConfig, DirectoryConfig};
use wayfinder::directory::DirectoryClient;
use wayfinder::navmesh::create_planner;
use wayfinder::orchestrator::Orchestrator;
use wayfinder::presenter::RecordingPresenter;
use wayfinder::server::spawn_server;
use wayfinder::sim::{Scene, SimulatedCamera, TextFrameDecoder};
use wayfinder::traits::{Capabilities, Directory};
use wayfinder_core::commands::UiCommand;
use wayfinder_core::error::WayfindError;
use wayfinder_core::geometry::Vec3;
use wayfinder_core::models::ScanState;

const PATH: &str = "/unityAR/getTargetCube.php";

fn venue() -> Config {
    let mut config = Config::default();
    config.server.bind = "127.0.0.1:0".to_string();
    config.destinations = [
        ("Cafeteria", Vec3::new(-6.0, 0.0, 12.0)),
        ("Library", Vec3::new(1.5, 2.0, -3.25)),
        ("Library Annex", Vec3::new(10.0, 0.0, 20.0)),
    ]
    .into_iter()
    .map(|(name, position)| DestinationConfig {
        name: name.to_string(),
        position,
    })
    .collect();
    config
}

fn client_for(addr: SocketAddr) -> DirectoryClient {
    DirectoryClient::new(&DirectoryConfig {
        base_url: format!("http://{}{}", addr, PATH),
        timeout_secs: 5,
    })
    .unwrap()
}

async fn start_venue() -> (Config, DirectoryClient) {
    let mut config = venue();
    let (addr, _server) = spawn_server(&config).await.unwrap();
    config.directory.base_url = format!("http://{}{}", addr, PATH);
    (config, client_for(addr))
}

/// Serves `body` for every request on the directory path.
async fn serve_body(body: &'static str) -> SocketAddr {
    let app = Router::new().route(PATH, get(move || async move { body }));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

#[tokio::test]
async fn filter_returns_names_in_server_order() {
    let (_, client) = start_venue().await;
    let names = client.filter("lib").await.unwrap();
    assert_eq!(names, vec!["Library", "Library Annex"]);
}

#[tokio::test]
async fn filter_with_no_matches_is_empty() {
    let (_, client) = start_venue().await;
    assert!(client.filter("zzz").await.unwrap().is_empty());
}

#[tokio::test]
async fn filter_query_is_url_encoded() {
    let (_, client) = start_venue().await;
    let names = client.filter("Library A").await.unwrap();
    assert_eq!(names, vec!["Library Annex"]);
}

#[tokio::test]
async fn resolve_parses_position() {
    let (_, client) = start_venue().await;
    assert_eq!(
        client.resolve("Library").await.unwrap(),
        Vec3::new(1.5, 2.0, -3.25)
    );
    assert_eq!(
        client.resolve("Library Annex").await.unwrap(),
        Vec3::new(10.0, 0.0, 20.0)
    );
}

#[tokio::test]
async fn unknown_destination_is_directory_unavailable() {
    let (_, client) = start_venue().await;
    match client.resolve("Observatory").await {
        Err(WayfindError::DirectoryUnavailable(detail)) => assert!(detail.contains("404")),
        other => panic!("expected DirectoryUnavailable, got {:?}", other),
    }
}

#[tokio::test]
async fn two_part_position_is_malformed() {
    let addr = serve_body("1.5,2.0").await;
    let err = client_for(addr).resolve("Library").await.unwrap_err();
    assert_eq!(err, WayfindError::MalformedPosition("1.5,2.0".into()));
}

#[tokio::test]
async fn non_numeric_position_is_malformed() {
    let addr = serve_body("north,0,7").await;
    let err = client_for(addr).resolve("Library").await.unwrap_err();
    assert!(matches!(err, WayfindError::MalformedPosition(_)));
}

#[tokio::test]
async fn blank_lines_in_listing_are_dropped() {
    let addr = serve_body("Library\n\n  Library Annex \n").await;
    let names = client_for(addr).filter("Lib").await.unwrap();
    assert_eq!(names, vec!["Library", "Library Annex"]);
}

#[tokio::test]
async fn unreachable_backend_is_directory_unavailable() {
    // Bind then drop to get a port nothing listens on.
    let addr = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    };
    let err = client_for(addr).filter("Lib").await.unwrap_err();
    assert!(matches!(err, WayfindError::DirectoryUnavailable(_)));
}

#[tokio::test]
async fn empty_filter_never_touches_the_network() {
    let addr = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    };
    assert!(client_for(addr).filter("").await.unwrap().is_empty());
}

#[tokio::test]
async fn health_reports_ok() {
    let (config, _) = start_venue().await;
    let base = reqwest::Url::parse(&config.directory.base_url).unwrap();
    let health = base.join("/health").unwrap();
    let body: serde_json::Value = reqwest::get(health).await.unwrap().json().await.unwrap();
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn request_without_parameters_is_rejected() {
    let (config, _) = start_venue().await;
    let status = reqwest::get(&config.directory.base_url)
        .await
        .unwrap()
        .status();
    assert_eq!(status, reqwest::StatusCode::BAD_REQUEST);
}

/// Steps the orchestrator until `done` holds.
async fn drive(orch: &mut Orchestrator, done: impl Fn(&Orchestrator) -> bool) {
    let steps = async {
        while !done(orch) {
            assert!(orch.step().await);
        }
    };
    tokio::time::timeout(Duration::from_secs(5), steps)
        .await
        .expect("orchestrator did not reach the expected state");
}

#[tokio::test]
async fn kiosk_navigates_against_reference_server() {
    let (mut config, client) = start_venue().await;
    config.scan.sample_interval_secs = 60.0;

    let scene = Scene::new();
    scene.show("DEST_MENU");
    let presenter = Arc::new(RecordingPresenter::new());
    let mut orch = Orchestrator::new(
        &config,
        Capabilities {
            directory: Arc::new(client),
            camera: Box::new(SimulatedCamera::new(scene)),
            decoder: Box::new(TextFrameDecoder),
            planner: create_planner(&config.navmesh).unwrap(),
            presenter: presenter.clone(),
        },
    );
    let handle = orch.handle();

    handle.start_scan().unwrap();
    drive(&mut orch, |o| o.scan_state() == ScanState::Unlocked).await;

    handle.query_changed("Lib").unwrap();
    drive(&mut orch, |o| !o.results().is_empty()).await;
    assert_eq!(orch.results(), vec!["Library", "Library Annex"]);

    handle.select(1).unwrap();
    drive(&mut orch, |o| o.rendered_path().is_some()).await;

    assert_eq!(
        orch.target().unwrap().position,
        Vec3::new(10.0, 0.0, 20.0)
    );
    let commands = presenter.commands();
    assert!(commands.contains(&UiCommand::PlaceTargetMarker {
        position: Vec3::new(10.0, 0.0, 20.0)
    }));
    assert!(commands.contains(&UiCommand::RenderPath {
        corners: vec![Vec3::new(0.0, 0.0, 0.0), Vec3::new(10.0, 0.0, 20.0)]
    }));
    assert!(commands.contains(&UiCommand::PositionCamera {
        position: Vec3::new(10.0, 10.0, 10.0),
        look_at: Vec3::new(10.0, 0.0, 20.0)
    }));
    assert!(presenter.errors().is_empty());
}
