//! Media catalog integration
//!
//! The catalog is the host's library of known movies and episodes. The core
//! only needs a read-only enumeration of video items with their names,
//! production years and external provider identifiers; everything else about
//! the library stays on the host's side of the boundary.

pub mod http;
pub mod matcher;

// Re-export main types
pub use http::HttpCatalogProvider;
pub use matcher::CatalogIndex;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Provider-id namespace for IMDb identifiers (e.g. "tt26581740").
pub const PROVIDER_IMDB: &str = "Imdb";
/// Provider-id namespace for TMDb identifiers.
pub const PROVIDER_TMDB: &str = "Tmdb";

/// One video item known to the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogItem {
    /// Catalog-assigned item identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Release year, if the catalog knows it
    pub production_year: Option<i32>,
    /// External identifiers keyed by provider namespace
    #[serde(default)]
    pub provider_ids: HashMap<String, String>,
}

impl CatalogItem {
    pub fn imdb_id(&self) -> Option<&str> {
        self.provider_ids.get(PROVIDER_IMDB).map(|s| s.as_str())
    }

    pub fn tmdb_id(&self) -> Option<&str> {
        self.provider_ids.get(PROVIDER_TMDB).map(|s| s.as_str())
    }
}

/// Read-only access to the catalog's video items.
///
/// Implementations must enumerate recursively and include both movies and
/// episodes. Lookups never mutate the catalog.
#[async_trait]
pub trait CatalogProvider: Send + Sync {
    async fn video_items(&self) -> Result<Vec<CatalogItem>>;
}

/// Fixed in-memory catalog, used by tests and offline imports.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    items: Vec<CatalogItem>,
}

impl StaticCatalog {
    pub fn new(items: Vec<CatalogItem>) -> Self {
        Self { items }
    }
}

#[async_trait]
impl CatalogProvider for StaticCatalog {
    async fn video_items(&self) -> Result<Vec<CatalogItem>> {
        Ok(self.items.clone())
    }
}
