//! Tuning configuration and state persistence
//!
//! The host owns physical persistence; the core only needs to read and
//! write one structured blob: the interval tuning plus the record
//! collection. `ConfigRepository` is that seam, with a JSON-file
//! implementation for stand-alone deployments.

use crate::store::ScareRecord;
use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Signed second offsets applied around each event timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentTuning {
    /// Offset added to the event time to get the interval start
    pub start_delta_seconds: i64,
    /// Offset added to the event time to get the interval end
    pub end_delta_seconds: i64,
}

impl Default for SegmentTuning {
    fn default() -> Self {
        Self {
            start_delta_seconds: -2,
            end_delta_seconds: 2,
        }
    }
}

/// Everything the service persists between runs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PersistedState {
    #[serde(default)]
    pub tuning: SegmentTuning,
    #[serde(default)]
    pub records: Vec<ScareRecord>,
}

/// Read/write access to the persisted state.
#[async_trait]
pub trait ConfigRepository: Send + Sync {
    /// Load the persisted state, falling back to defaults when none exists.
    async fn load(&self) -> Result<PersistedState>;

    /// Persist the full state.
    async fn save(&self, state: &PersistedState) -> Result<()>;
}

/// Single-file JSON repository.
#[derive(Debug, Clone)]
pub struct JsonStateRepository {
    path: PathBuf,
}

impl JsonStateRepository {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

#[async_trait]
impl ConfigRepository for JsonStateRepository {
    async fn load(&self) -> Result<PersistedState> {
        if !self.path.exists() {
            debug!("No state file at {}, using defaults", self.path.display());
            return Ok(PersistedState::default());
        }

        let content = tokio::fs::read_to_string(&self.path).await?;
        match serde_json::from_str::<PersistedState>(&content) {
            Ok(state) => {
                info!(
                    "📂 Loaded state: {} records, deltas ({}, {})",
                    state.records.len(),
                    state.tuning.start_delta_seconds,
                    state.tuning.end_delta_seconds
                );
                Ok(state)
            }
            Err(e) => {
                warn!(
                    "Failed to parse state file {}: {}, using defaults",
                    self.path.display(),
                    e
                );
                Ok(PersistedState::default())
            }
        }
    }

    async fn save(&self, state: &PersistedState) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let content = serde_json::to_string_pretty(state)?;
        tokio::fs::write(&self.path, content).await?;
        debug!(
            "💾 Saved state: {} records to {}",
            state.records.len(),
            self.path.display()
        );
        Ok(())
    }
}
