//! Jump-scare segment service
//!
//! Ingests community-sourced jump-scare timestamps, reconciles them against
//! a media catalog, and serves derived display intervals for playback
//! timeline annotation.

pub mod api;
pub mod catalog;
pub mod config;
pub mod import;
pub mod segments;
pub mod service;
pub mod store;
pub mod timecode;

// Re-export main types for easy access
pub use crate::catalog::{CatalogIndex, CatalogItem, CatalogProvider, HttpCatalogProvider};
pub use crate::config::{ConfigRepository, JsonStateRepository, SegmentTuning};
pub use crate::import::{ImportError, ParsedImport};
pub use crate::segments::{derive_interval, DisplayInterval};
pub use crate::service::{ImportSummary, SegmentService};
pub use crate::store::{
    MergeOutcome, RecordStore, ScareIntensity, ScareKind, ScareRecord, StoreStats,
};
pub use crate::timecode::{parse_timestamp, TICKS_PER_SECOND};
