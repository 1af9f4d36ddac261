//! Catalog matching
//!
//! Resolves free-text titles and external identifiers from import rows to
//! exactly one catalog item. Matching runs against a snapshot of the
//! catalog's enumeration; when several items are equally plausible the first
//! one in enumeration order wins silently.

use super::{CatalogItem, CatalogProvider};
use anyhow::Result;
use regex::Regex;
use tracing::{debug, info, warn};

/// Snapshot of the catalog's video items with lookup methods.
#[derive(Debug, Clone)]
pub struct CatalogIndex {
    items: Vec<CatalogItem>,
}

impl CatalogIndex {
    /// Snapshot the catalog's current enumeration.
    pub async fn load(provider: &dyn CatalogProvider) -> Result<Self> {
        let items = provider.video_items().await?;
        info!("📚 Catalog snapshot loaded: {} video items", items.len());
        Ok(Self { items })
    }

    /// Build an index directly from items (tests, pre-fetched snapshots).
    pub fn from_items(items: Vec<CatalogItem>) -> Self {
        Self { items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Look up an item by external provider id.
    ///
    /// IMDb ids are checked first, as the more reliable namespace; TMDb is
    /// the fallback. Returns `None` when neither id is supplied or no item
    /// carries a matching id.
    pub fn find_by_external_id(
        &self,
        imdb_id: Option<&str>,
        tmdb_id: Option<&str>,
    ) -> Option<String> {
        if let Some(imdb) = imdb_id.filter(|s| !s.is_empty()) {
            if let Some(item) = self.items.iter().find(|i| i.imdb_id() == Some(imdb)) {
                debug!("Matched {:?} by IMDb id {}", item.name, imdb);
                return Some(item.id.clone());
            }
        }

        if let Some(tmdb) = tmdb_id.filter(|s| !s.is_empty()) {
            if let Some(item) = self.items.iter().find(|i| i.tmdb_id() == Some(tmdb)) {
                debug!("Matched {:?} by TMDb id {}", item.name, tmdb);
                return Some(item.id.clone());
            }
        }

        None
    }

    /// Look up an item by free-text title.
    ///
    /// Tried in strict priority order, first hit wins:
    /// 1. case-insensitive exact name match,
    /// 2. case-insensitive substring match (item name contains the input),
    /// 3. `Title (YYYY)` structural match against name + production year,
    /// 4. relaxed retry of step 3 ignoring the year (logged as low
    ///    confidence - catalogs disagree about release years often enough
    ///    that a year mismatch alone should not lose the row).
    pub fn find_by_name(&self, text: &str) -> Option<String> {
        let needle = text.trim();
        if needle.is_empty() {
            return None;
        }
        let needle_lower = needle.to_lowercase();

        // 1. Exact match
        if let Some(item) = self
            .items
            .iter()
            .find(|i| i.name.to_lowercase() == needle_lower)
        {
            debug!("Matched {:?} by exact name", item.name);
            return Some(item.id.clone());
        }

        // 2. Substring match
        if let Some(item) = self
            .items
            .iter()
            .find(|i| i.name.to_lowercase().contains(&needle_lower))
        {
            debug!("Matched {:?} by name substring {:?}", item.name, needle);
            return Some(item.id.clone());
        }

        // 3./4. Structural "Title (YYYY)" match
        if let Some((title, year)) = split_title_and_year(needle) {
            let title_lower = title.to_lowercase();

            if let Some(item) = self.items.iter().find(|i| {
                i.name.to_lowercase() == title_lower && i.production_year == Some(year)
            }) {
                debug!("Matched {:?} by title and year {}", item.name, year);
                return Some(item.id.clone());
            }

            // Relaxed: title equality with the year ignored
            if let Some(item) = self
                .items
                .iter()
                .find(|i| i.name.to_lowercase() == title_lower)
            {
                warn!(
                    "⚠️ Low-confidence match for {:?}: title matched {:?} but year {} disagrees with catalog ({:?})",
                    needle, item.name, year, item.production_year
                );
                return Some(item.id.clone());
            }
        }

        None
    }
}

/// Split inputs shaped like `Weapons (2025)` into title and year.
fn split_title_and_year(text: &str) -> Option<(String, i32)> {
    if let Ok(re) = Regex::new(r"^(.*?)\s*\((\d{4})\)$") {
        if let Some(caps) = re.captures(text) {
            let title = caps[1].trim().to_string();
            let year: i32 = caps[2].parse().ok()?;
            if !title.is_empty() {
                return Some((title, year));
            }
        }
    }
    None
}
