//! HTTP client for the destination directory backend.
//!
//! Two request shapes against a single base URL:
//!
//! | Request | Response body |
//! |---------|---------------|
//! | `GET <base>?search=<query>` | names separated by `\n` |
//! | `GET <base>?destination=<name>` | `x,y,z` |
//!
//! An empty filter query is answered locally with no matches.
//! Any transport error or non-2xx status is `DirectoryUnavailable`. There is
//! no retry here; a failed filter simply leaves the last good list on screen.

use async_trait::async_trait;
use std::time::Duration;

use wayfinder_core::error::WayfindError;
use wayfinder_core::geometry::Vec3;
use wayfinder_core::wire::{parse_destination_list, parse_position};

use crate::config::DirectoryConfig;
use crate::traits::Directory;

/// Stateless directory client. Cheap to clone; clones share one connection pool.
#[derive(Debug, Clone)]
pub struct DirectoryClient {
    client: reqwest::Client,
    base_url: reqwest::Url,
}

impl DirectoryClient {
    pub fn new(config: &DirectoryConfig) -> anyhow::Result<Self> {
        let base_url = reqwest::Url::parse(&config.base_url)?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &reqwest::Url {
        &self.base_url
    }

    /// Issues `GET <base>?<key>=<value>` and returns the body text.
    async fn get_text(&self, key: &str, value: &str) -> Result<String, WayfindError> {
        let response = self
            .client
            .get(self.base_url.clone())
            .query(&[(key, value)])
            .send()
            .await
            .map_err(|e| WayfindError::DirectoryUnavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(WayfindError::DirectoryUnavailable(format!(
                "{} returned HTTP {}",
                key, status
            )));
        }

        response
            .text()
            .await
            .map_err(|e| WayfindError::DirectoryUnavailable(e.to_string()))
    }
}

#[async_trait]
impl Directory for DirectoryClient {
    async fn filter(&self, query: &str) -> Result<Vec<String>, WayfindError> {
        if query.is_empty() {
            return Ok(Vec::new());
        }
        let body = self.get_text("search", query).await?;
        Ok(parse_destination_list(&body))
    }

    async fn resolve(&self, destination: &str) -> Result<Vec3, WayfindError> {
        let body = self.get_text("destination", destination).await?;
        parse_position(&body)
    }
}

/// One-shot filter for `wayfind search`.
pub async fn run_search(config: &crate::config::Config, query: &str) -> anyhow::Result<()> {
    let client = DirectoryClient::new(&config.directory)?;
    let names = client.filter(query).await?;

    if names.is_empty() {
        println!("No destinations match '{}'.", query);
        return Ok(());
    }
    for (index, name) in names.iter().enumerate() {
        println!("{:>3}  {}", index, name);
    }
    Ok(())
}

/// One-shot resolve for `wayfind resolve`.
pub async fn run_resolve(config: &crate::config::Config, destination: &str) -> anyhow::Result<()> {
    let client = DirectoryClient::new(&config.directory)?;
    let position = client.resolve(destination).await?;
    println!("{}", position);
    Ok(())
}
