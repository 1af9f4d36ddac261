//! API request handlers
//!
//! Thin delegation onto the segment service; transport-level concerns stay
//! in the server module.

use anyhow::Result;
use serde_json::Value;
use std::sync::Arc;

use super::models::ClearResponse;
use crate::config::SegmentTuning;
use crate::import::ImportError;
use crate::segments::DisplayInterval;
use crate::service::{ImportSummary, SegmentService};
use crate::store::StoreStats;

/// Handle health check requests
pub async fn health_check() -> Result<Value> {
    Ok(serde_json::json!({
        "status": "healthy",
        "service": "jumpscare-segments",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// Handle a bulk import of raw delimited text
pub async fn import_csv(
    service: &Arc<SegmentService>,
    csv: &str,
) -> Result<ImportSummary, ImportError> {
    service.import_csv(csv).await
}

/// Handle a per-item segment query
pub async fn item_segments(
    service: &Arc<SegmentService>,
    item_id: &str,
) -> Vec<DisplayInterval> {
    service.segments_for_item(item_id).await
}

/// Handle a statistics request
pub async fn statistics(service: &Arc<SegmentService>) -> StoreStats {
    service.statistics().await
}

/// Handle a destructive clear
pub async fn clear_records(service: &Arc<SegmentService>) -> Result<ClearResponse> {
    let removed = service.clear_all().await?;
    Ok(ClearResponse {
        success: true,
        removed,
    })
}

/// Read the current tuning
pub async fn get_tuning(service: &Arc<SegmentService>) -> SegmentTuning {
    service.tuning().await
}

/// Replace the tuning
pub async fn update_tuning(
    service: &Arc<SegmentService>,
    tuning: SegmentTuning,
) -> Result<SegmentTuning> {
    service.update_tuning(tuning).await?;
    Ok(tuning)
}
