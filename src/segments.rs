//! Segment derivation
//!
//! Converts a point-in-time scare record into the bounded interval shown on
//! the playback timeline. Intervals are derived on demand from the current
//! tuning, never stored, so changing the deltas retroactively changes every
//! displayed interval.

use crate::store::ScareRecord;
use crate::timecode::TICKS_PER_SECOND;
use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

/// One display window on the playback timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayInterval {
    /// Id of the record this interval was derived from
    pub id: Uuid,
    /// Catalog item the interval belongs to
    pub item_id: String,
    /// Inclusive start, in ticks
    pub start_ticks: i64,
    /// Exclusive end, in ticks
    pub end_ticks: i64,
}

/// Derive the display interval for one record.
///
/// The deltas are applied to the event timestamp, then two repairs run in
/// a fixed order:
///
/// 1. an inverted or empty interval collapses to a flat one-second window
///    starting at the event timestamp;
/// 2. a start that is still negative is clamped to zero, leaving the end
///    untouched.
///
/// Applying the clamp after the inversion check means a record at timestamp
/// zero under deltas (-2, +2) yields `[0, +2s)` rather than the flat window.
pub fn derive_interval(
    record: &ScareRecord,
    start_delta_seconds: i64,
    end_delta_seconds: i64,
) -> DisplayInterval {
    let mut start_ticks = record.timestamp_ticks + start_delta_seconds * TICKS_PER_SECOND;
    let mut end_ticks = record.timestamp_ticks + end_delta_seconds * TICKS_PER_SECOND;

    if start_ticks >= end_ticks {
        debug!(
            "Record {} derived an inverted interval ({}..{}), using a flat one-second window",
            record.id, start_ticks, end_ticks
        );
        start_ticks = record.timestamp_ticks;
        end_ticks = record.timestamp_ticks + TICKS_PER_SECOND;
    }

    if start_ticks < 0 {
        debug!(
            "Record {} derived a negative start ({} ticks), clamping to zero",
            record.id, start_ticks
        );
        start_ticks = 0;
    }

    DisplayInterval {
        id: record.id,
        item_id: record.item_id.clone(),
        start_ticks,
        end_ticks,
    }
}
