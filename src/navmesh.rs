//! Built-in path planners.
//!
//! A venue deployment plugs its navmesh engine in through
//! [`PathPlanner`]. The planners here cover the configurations that ship
//! without one:
//!
//! - **`direct`**: [`DirectPlanner`], a straight segment from origin to
//!   destination. Useful for open-plan venues and demos.
//! - **`disabled`**: [`DisabledPlanner`], never finds a path, so every
//!   target reports `NoPathFound`.

use anyhow::{bail, Result};
use async_trait::async_trait;
use std::sync::Arc;

use wayfinder_core::geometry::Vec3;

use crate::config::NavmeshConfig;
use crate::traits::PathPlanner;

pub struct DirectPlanner;

#[async_trait]
impl PathPlanner for DirectPlanner {
    async fn calculate_path(&self, origin: Vec3, destination: Vec3) -> Vec<Vec3> {
        vec![origin, destination]
    }
}

pub struct DisabledPlanner;

#[async_trait]
impl PathPlanner for DisabledPlanner {
    async fn calculate_path(&self, _origin: Vec3, _destination: Vec3) -> Vec<Vec3> {
        Vec::new()
    }
}

/// Instantiates the planner named by `navmesh.provider`.
pub fn create_planner(config: &NavmeshConfig) -> Result<Arc<dyn PathPlanner>> {
    match config.provider.as_str() {
        "direct" => Ok(Arc::new(DirectPlanner)),
        "disabled" => Ok(Arc::new(DisabledPlanner)),
        other => bail!("Unknown navmesh provider: {}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn direct_is_two_corners() {
        let planner = create_planner(&NavmeshConfig::default()).unwrap();
        let corners = planner
            .calculate_path(Vec3::new(0.0, 0.0, 0.0), Vec3::new(10.0, 0.0, 20.0))
            .await;
        assert_eq!(corners, vec![Vec3::new(0.0, 0.0, 0.0), Vec3::new(10.0, 0.0, 20.0)]);
    }

    #[tokio::test]
    async fn disabled_finds_nothing() {
        let planner = create_planner(&NavmeshConfig {
            provider: "disabled".to_string(),
        })
        .unwrap();
        assert!(planner
            .calculate_path(Vec3::default(), Vec3::new(1.0, 0.0, 1.0))
            .await
            .is_empty());
    }

    #[test]
    fn unknown_provider_errors() {
        assert!(create_planner(&NavmeshConfig {
            provider: "recast".to_string(),
        })
        .is_err());
    }
}
