//! Segment service orchestration
//!
//! Ties the catalog, the record store, the tuning configuration and the
//! deriver together behind the operations the host actually calls: import,
//! per-item segment queries, statistics and clearing.

use anyhow::Result;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info};

use crate::catalog::{CatalogIndex, CatalogProvider};
use crate::config::{ConfigRepository, PersistedState, SegmentTuning};
use crate::import::{self, ImportError};
use crate::segments::{derive_interval, DisplayInterval};
use crate::store::{RecordStore, StoreStats};

/// Summary returned to the caller of a bulk import.
#[derive(Debug, Clone, Serialize)]
pub struct ImportSummary {
    pub success: bool,
    pub imported_count: usize,
    pub skipped_count: usize,
    pub total_rows: usize,
    pub message: String,
}

/// The one long-lived service instance.
///
/// Holds the authoritative record collection; every collaborator comes in
/// through the constructor so the service stays testable in isolation.
pub struct SegmentService {
    catalog: Arc<dyn CatalogProvider>,
    repository: Arc<dyn ConfigRepository>,
    store: RecordStore,
    tuning: RwLock<SegmentTuning>,
}

impl SegmentService {
    /// Build the service from persisted state.
    pub async fn initialize(
        catalog: Arc<dyn CatalogProvider>,
        repository: Arc<dyn ConfigRepository>,
    ) -> Result<Self> {
        let state = repository.load().await?;
        info!(
            "🔧 Segment service initialized: {} records, deltas ({}, {})",
            state.records.len(),
            state.tuning.start_delta_seconds,
            state.tuning.end_delta_seconds
        );

        Ok(Self {
            catalog,
            repository,
            store: RecordStore::new(state.records),
            tuning: RwLock::new(state.tuning),
        })
    }

    /// Import raw delimited text, merging accepted rows into the store.
    ///
    /// Row-level problems skip the row and show up only in the counts; an
    /// unreadable payload or an unreachable catalog fails the whole call.
    pub async fn import_csv(&self, text: &str) -> Result<ImportSummary, ImportError> {
        let index = CatalogIndex::load(self.catalog.as_ref())
            .await
            .map_err(|e| ImportError::CatalogUnavailable(e.to_string()))?;

        let parsed = import::parse_import(text, &index)?;
        let total_rows = parsed.total_rows;
        let unmatched = parsed.skipped();

        let outcome = self.store.add_merge(parsed.records).await;
        self.persist()
            .await
            .map_err(|e| ImportError::PersistenceUnavailable(e.to_string()))?;

        let skipped_count = unmatched + outcome.skipped;
        let message = format!(
            "Imported {} of {} rows ({} skipped)",
            outcome.added, total_rows, skipped_count
        );
        info!("✅ {}", message);

        Ok(ImportSummary {
            success: true,
            imported_count: outcome.added,
            skipped_count,
            total_rows,
            message,
        })
    }

    /// All display intervals for one catalog item, in stored record order.
    ///
    /// Never fails: an item with no records is the common case and yields
    /// an empty list, so the caller's playback flow is never blocked.
    pub async fn segments_for_item(&self, item_id: &str) -> Vec<DisplayInterval> {
        let records = self.store.records_for_item(item_id).await;
        if records.is_empty() {
            return Vec::new();
        }

        let tuning = *self.tuning.read().await;
        records
            .iter()
            .map(|record| {
                derive_interval(
                    record,
                    tuning.start_delta_seconds,
                    tuning.end_delta_seconds,
                )
            })
            .collect()
    }

    /// Aggregate store statistics.
    pub async fn statistics(&self) -> StoreStats {
        self.store.statistics().await
    }

    /// Remove every record. Returns how many were removed.
    pub async fn clear_all(&self) -> Result<usize> {
        let removed = self.store.clear().await;
        self.persist().await?;
        Ok(removed)
    }

    /// Current tuning.
    pub async fn tuning(&self) -> SegmentTuning {
        *self.tuning.read().await
    }

    /// Replace the tuning. Takes effect on the next segment query; nothing
    /// stored needs migrating.
    pub async fn update_tuning(&self, tuning: SegmentTuning) -> Result<()> {
        {
            let mut current = self.tuning.write().await;
            *current = tuning;
        }
        info!(
            "🔧 Tuning updated: deltas ({}, {})",
            tuning.start_delta_seconds, tuning.end_delta_seconds
        );
        self.persist().await
    }

    async fn persist(&self) -> Result<()> {
        let state = PersistedState {
            tuning: *self.tuning.read().await,
            records: self.store.snapshot().await,
        };
        if let Err(e) = self.repository.save(&state).await {
            error!("❌ Failed to persist state: {}", e);
            return Err(e);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CatalogItem, StaticCatalog, PROVIDER_IMDB};
    use crate::timecode::TICKS_PER_SECOND;
    use std::collections::HashMap;
    use tempfile::TempDir;

    const HEADER: &str = "ItemName,IMDb,TMDb,Timestamp,Intensity,Description,Type";

    fn weapons_catalog() -> Arc<StaticCatalog> {
        let mut provider_ids = HashMap::new();
        provider_ids.insert(PROVIDER_IMDB.to_string(), "tt26581740".to_string());

        Arc::new(StaticCatalog::new(vec![CatalogItem {
            id: "x1".to_string(),
            name: "Weapons".to_string(),
            production_year: Some(2025),
            provider_ids,
        }]))
    }

    async fn service_with(catalog: Arc<StaticCatalog>) -> (SegmentService, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let repository = Arc::new(crate::config::JsonStateRepository::new(
            temp_dir.path().join("state.json"),
        ));
        let service = SegmentService::initialize(catalog, repository)
            .await
            .unwrap();
        (service, temp_dir)
    }

    #[tokio::test]
    async fn test_import_then_query_segments() {
        let (service, _guard) = service_with(weapons_catalog()).await;

        let csv = format!(
            "{}\nWeapons (2025),tt26581740,1078605,00:11:51,Minor,Ghost appears,Visual",
            HEADER
        );
        let summary = service.import_csv(&csv).await.unwrap();
        assert!(summary.success);
        assert_eq!(summary.imported_count, 1);
        assert_eq!(summary.skipped_count, 0);

        let segments = service.segments_for_item("x1").await;
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].start_ticks, 709 * TICKS_PER_SECOND);
        assert_eq!(segments[0].end_ticks, 713 * TICKS_PER_SECOND);
    }

    #[tokio::test]
    async fn test_unknown_item_yields_empty_not_error() {
        let (service, _guard) = service_with(weapons_catalog()).await;
        assert!(service.segments_for_item("nope").await.is_empty());
    }

    #[tokio::test]
    async fn test_reimport_skips_duplicates() {
        let (service, _guard) = service_with(weapons_catalog()).await;
        let csv = format!("{}\nWeapons,,,05:00,Major,,Visual", HEADER);

        let first = service.import_csv(&csv).await.unwrap();
        assert_eq!(first.imported_count, 1);

        let second = service.import_csv(&csv).await.unwrap();
        assert_eq!(second.imported_count, 0);
        assert_eq!(second.skipped_count, 1);
        assert_eq!(second.total_rows, 1);
    }

    #[tokio::test]
    async fn test_tuning_change_applies_retroactively() {
        let (service, _guard) = service_with(weapons_catalog()).await;
        let csv = format!("{}\nWeapons,,,01:40,Major,,Visual", HEADER);
        service.import_csv(&csv).await.unwrap();

        let before = service.segments_for_item("x1").await;
        assert_eq!(before[0].start_ticks, 98 * TICKS_PER_SECOND);

        service
            .update_tuning(SegmentTuning {
                start_delta_seconds: -10,
                end_delta_seconds: 5,
            })
            .await
            .unwrap();

        let after = service.segments_for_item("x1").await;
        assert_eq!(after[0].start_ticks, 90 * TICKS_PER_SECOND);
        assert_eq!(after[0].end_ticks, 105 * TICKS_PER_SECOND);
    }

    #[tokio::test]
    async fn test_clear_then_stats() {
        let (service, _guard) = service_with(weapons_catalog()).await;
        let csv = format!(
            "{}\nWeapons,,,01:00,Major,,Visual\nWeapons,,,02:00,Minor,,Audio",
            HEADER
        );
        service.import_csv(&csv).await.unwrap();
        assert_eq!(service.statistics().await.total_records, 2);

        assert_eq!(service.clear_all().await.unwrap(), 2);
        let stats = service.statistics().await;
        assert_eq!(stats.total_records, 0);
        assert_eq!(stats.distinct_items, 0);
    }

    #[tokio::test]
    async fn test_state_survives_restart() {
        let temp_dir = TempDir::new().unwrap();
        let repository = Arc::new(crate::config::JsonStateRepository::new(
            temp_dir.path().join("state.json"),
        ));

        {
            let service =
                SegmentService::initialize(weapons_catalog(), repository.clone())
                    .await
                    .unwrap();
            let csv = format!("{}\nWeapons,,,05:00,Major,,Visual", HEADER);
            service.import_csv(&csv).await.unwrap();
        }

        let revived = SegmentService::initialize(weapons_catalog(), repository)
            .await
            .unwrap();
        assert_eq!(revived.statistics().await.total_records, 1);
        assert_eq!(revived.segments_for_item("x1").await.len(), 1);
    }
}
