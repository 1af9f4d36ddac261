//! Community import parsing
//!
//! Turns community-sourced delimited text (one jump scare per row) into
//! canonical records. Rows that cannot be reconciled - wrong shape, no
//! catalog match, unreadable timestamp - are skipped and counted, never
//! fatal; only an empty or header-only file fails the whole import.

use crate::catalog::CatalogIndex;
use crate::store::{ScareIntensity, ScareKind, ScareRecord, SOURCE_CSV_IMPORT};
use crate::timecode;
use chrono::Utc;
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Number of columns every data row must carry:
/// `ItemName, IMDb, TMDb, Timestamp, Intensity, Description, Type`.
const REQUIRED_FIELDS: usize = 7;

/// Failures that abort an import outright.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("import data is empty or contains no data rows")]
    InvalidInput,

    #[error("catalog unavailable: {0}")]
    CatalogUnavailable(String),

    #[error("state persistence unavailable: {0}")]
    PersistenceUnavailable(String),
}

/// Outcome of parsing one import payload.
#[derive(Debug)]
pub struct ParsedImport {
    /// Records that survived reconciliation, in row order
    pub records: Vec<ScareRecord>,
    /// Data rows seen before any filtering
    pub total_rows: usize,
}

impl ParsedImport {
    pub fn skipped(&self) -> usize {
        self.total_rows - self.records.len()
    }
}

/// Parse raw delimited text into canonical records.
///
/// The first line is a header and is ignored. Blank lines are not rows.
/// Each surviving record gets a fresh id, the `csv_import` source tag and a
/// creation timestamp.
pub fn parse_import(text: &str, catalog: &CatalogIndex) -> Result<ParsedImport, ImportError> {
    if text.trim().is_empty() {
        return Err(ImportError::InvalidInput);
    }

    let lines: Vec<&str> = text.lines().collect();
    if lines.len() < 2 {
        return Err(ImportError::InvalidInput);
    }

    let mut records = Vec::new();
    let mut total_rows = 0;

    for (line_number, line) in lines.iter().enumerate().skip(1) {
        if line.trim().is_empty() {
            continue;
        }
        total_rows += 1;

        match parse_row(line, catalog) {
            Some(record) => records.push(record),
            None => debug!("Skipped import row {}", line_number + 1),
        }
    }

    info!(
        "📄 Parsed import: {} of {} rows accepted",
        records.len(),
        total_rows
    );

    Ok(ParsedImport { records, total_rows })
}

/// Parse a single data row, or `None` when the row must be skipped.
fn parse_row(line: &str, catalog: &CatalogIndex) -> Option<ScareRecord> {
    let fields: Vec<&str> = line.split(',').collect();
    if fields.len() < REQUIRED_FIELDS {
        warn!(
            "⚠️ Skipping row with {} of {} required fields: {:?}",
            fields.len(),
            REQUIRED_FIELDS,
            line
        );
        return None;
    }

    let title = fields[0].trim();
    let imdb_id = fields[1].trim();
    let tmdb_id = fields[2].trim();
    let timestamp_text = fields[3].trim();
    let intensity_text = fields[4].trim();
    let description = fields[5].trim();
    let kind_text = fields[6].trim();

    // External ids are the reliable path; the title heuristics are the fallback.
    let item_id = catalog
        .find_by_external_id(
            (!imdb_id.is_empty()).then_some(imdb_id),
            (!tmdb_id.is_empty()).then_some(tmdb_id),
        )
        .or_else(|| catalog.find_by_name(title));

    let item_id = match item_id {
        Some(id) => id,
        None => {
            warn!("⚠️ No catalog match for {:?}, skipping row", title);
            return None;
        }
    };

    let timestamp_ticks = match timecode::parse_timestamp(timestamp_text) {
        Ok(ticks) => ticks,
        Err(e) => {
            warn!("⚠️ {} for {:?}, skipping row", e, title);
            return None;
        }
    };

    Some(ScareRecord {
        id: Uuid::new_v4(),
        item_id,
        timestamp_ticks,
        description: (!description.is_empty()).then(|| description.to_string()),
        kind: Some(ScareKind::from_label_or_default(kind_text)),
        intensity: Some(ScareIntensity::from_label_or_default(intensity_text)),
        item_name: (!title.is_empty()).then(|| title.to_string()),
        source: SOURCE_CSV_IMPORT.to_string(),
        created_at: Some(Utc::now()),
        updated_at: None,
    })
}
