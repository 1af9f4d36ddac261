//! Canonical jump-scare records and the reconciliation store
//!
//! The store owns the authoritative record collection for the lifetime of
//! the process. Every record is keyed by `(item_id, timestamp_ticks)`; the
//! store never holds two records with the same key.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

/// Provenance tag for records created by the CSV importer.
pub const SOURCE_CSV_IMPORT: &str = "csv_import";

/// What kind of scare an event is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScareKind {
    Visual,
    Audio,
    Combined,
    Other,
}

impl ScareKind {
    /// Case-insensitive label lookup.
    pub fn from_label(text: &str) -> Option<Self> {
        match text.trim().to_lowercase().as_str() {
            "visual" => Some(Self::Visual),
            "audio" => Some(Self::Audio),
            "combined" => Some(Self::Combined),
            "other" => Some(Self::Other),
            _ => None,
        }
    }

    /// Label lookup with the documented default for unrecognized text.
    pub fn from_label_or_default(text: &str) -> Self {
        Self::from_label(text).unwrap_or(Self::Other)
    }
}

/// How strong a scare is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScareIntensity {
    Minor,
    Major,
}

impl ScareIntensity {
    /// Case-insensitive label lookup.
    pub fn from_label(text: &str) -> Option<Self> {
        match text.trim().to_lowercase().as_str() {
            "minor" => Some(Self::Minor),
            "major" => Some(Self::Major),
            _ => None,
        }
    }

    /// Label lookup with the documented default for unrecognized text.
    pub fn from_label_or_default(text: &str) -> Self {
        Self::from_label(text).unwrap_or(Self::Minor)
    }
}

/// One committed jump-scare event bound to a catalog item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScareRecord {
    /// Unique record id, assigned at creation
    pub id: Uuid,

    /// Catalog item this event belongs to
    pub item_id: String,

    /// Point in time of the event, in ticks (10,000,000 per second)
    pub timestamp_ticks: i64,

    /// Optional free-text description
    pub description: Option<String>,

    /// Kind of scare
    pub kind: Option<ScareKind>,

    /// Intensity of the scare
    pub intensity: Option<ScareIntensity>,

    /// Display-only title, not authoritative
    pub item_name: Option<String>,

    /// Provenance tag ("csv_import", "manual", ...)
    pub source: String,

    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl ScareRecord {
    /// Dedup key: no two records in the store share this pair.
    pub fn dedup_key(&self) -> (String, i64) {
        (self.item_id.clone(), self.timestamp_ticks)
    }
}

/// Result of one batch merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MergeOutcome {
    pub added: usize,
    pub skipped: usize,
}

/// Aggregate statistics over the store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StoreStats {
    pub total_records: usize,
    pub distinct_items: usize,
    pub major_count: usize,
    pub minor_count: usize,
}

/// Thread-safe collection of canonical records.
///
/// All mutation goes through `add_merge` and `clear`; readers observe whole
/// batches or nothing.
#[derive(Debug, Clone)]
pub struct RecordStore {
    records: Arc<RwLock<Vec<ScareRecord>>>,
}

impl RecordStore {
    /// Create a store seeded with previously persisted records.
    pub fn new(initial: Vec<ScareRecord>) -> Self {
        Self {
            records: Arc::new(RwLock::new(initial)),
        }
    }

    /// Merge a batch of candidates into the store.
    ///
    /// Candidates are processed in input order. A candidate whose dedup key
    /// already exists - in the prior state or earlier in this same batch -
    /// is skipped; the first occurrence wins.
    pub async fn add_merge(&self, candidates: Vec<ScareRecord>) -> MergeOutcome {
        let mut records = self.records.write().await;

        let mut seen: HashSet<(String, i64)> =
            records.iter().map(|r| r.dedup_key()).collect();

        let mut outcome = MergeOutcome { added: 0, skipped: 0 };
        for candidate in candidates {
            let key = candidate.dedup_key();
            if seen.contains(&key) {
                debug!(
                    "Skipping duplicate record for item {} at {} ticks",
                    key.0, key.1
                );
                outcome.skipped += 1;
                continue;
            }
            seen.insert(key);
            records.push(candidate);
            outcome.added += 1;
        }

        info!(
            "📥 Merged batch: {} added, {} skipped, {} total",
            outcome.added,
            outcome.skipped,
            records.len()
        );
        outcome
    }

    /// Remove every record, returning how many were removed.
    pub async fn clear(&self) -> usize {
        let mut records = self.records.write().await;
        let removed = records.len();
        records.clear();
        info!("🗑️ Cleared {} records from store", removed);
        removed
    }

    /// Aggregate statistics. Records with no intensity set count in neither
    /// intensity bucket.
    pub async fn statistics(&self) -> StoreStats {
        let records = self.records.read().await;

        let distinct_items = records
            .iter()
            .map(|r| r.item_id.as_str())
            .collect::<HashSet<_>>()
            .len();

        StoreStats {
            total_records: records.len(),
            distinct_items,
            major_count: records
                .iter()
                .filter(|r| r.intensity == Some(ScareIntensity::Major))
                .count(),
            minor_count: records
                .iter()
                .filter(|r| r.intensity == Some(ScareIntensity::Minor))
                .count(),
        }
    }

    /// All records for one catalog item, in stored order.
    pub async fn records_for_item(&self, item_id: &str) -> Vec<ScareRecord> {
        let records = self.records.read().await;
        records
            .iter()
            .filter(|r| r.item_id == item_id)
            .cloned()
            .collect()
    }

    /// Copy of the full collection, in stored order (for persistence).
    pub async fn snapshot(&self) -> Vec<ScareRecord> {
        self.records.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }
}
