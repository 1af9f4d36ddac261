//! HTTP catalog client
//!
//! Talks to a media server's item-listing API and maps its envelope into
//! [`CatalogItem`]s. Only movies and episodes are requested, recursively, so
//! the snapshot covers everything a playback timeline can be attached to.

use super::{CatalogItem, CatalogProvider};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, info};

/// Catalog backed by a media server's HTTP API.
#[derive(Debug, Clone)]
pub struct HttpCatalogProvider {
    client: Client,
    base_url: String,
    api_key: String,
}

/// Item-listing response envelope.
#[derive(Debug, Deserialize)]
struct ItemsEnvelope {
    #[serde(rename = "Items", default)]
    items: Vec<ItemDto>,
}

#[derive(Debug, Deserialize)]
struct ItemDto {
    #[serde(rename = "Id")]
    id: String,
    #[serde(rename = "Name", default)]
    name: String,
    #[serde(rename = "ProductionYear")]
    production_year: Option<i32>,
    #[serde(rename = "ProviderIds", default)]
    provider_ids: HashMap<String, String>,
}

impl HttpCatalogProvider {
    /// Create a new catalog client.
    pub fn new(base_url: &str, api_key: &str, timeout_seconds: u64) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }
}

#[async_trait]
impl CatalogProvider for HttpCatalogProvider {
    async fn video_items(&self) -> Result<Vec<CatalogItem>> {
        let url = format!("{}/Items", self.base_url);
        debug!("Fetching catalog items from {}", url);

        let response = self
            .client
            .get(&url)
            .header("X-Emby-Token", &self.api_key)
            .query(&[
                ("IncludeItemTypes", "Movie,Episode"),
                ("Recursive", "true"),
                ("Fields", "ProviderIds,ProductionYear"),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "catalog request failed with status {}",
                response.status()
            ));
        }

        let envelope: ItemsEnvelope = response.json().await?;
        let items: Vec<CatalogItem> = envelope
            .items
            .into_iter()
            .filter(|dto| !dto.name.is_empty())
            .map(|dto| CatalogItem {
                id: dto.id,
                name: dto.name,
                production_year: dto.production_year,
                provider_ids: dto.provider_ids,
            })
            .collect();

        info!("✅ Fetched {} video items from catalog", items.len());
        Ok(items)
    }
}
