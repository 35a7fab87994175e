//! Bulk loading from part-number files
//!
//! Runs are strictly sequential: one part number is fully processed and
//! stored before the next starts, so allocations of different parts never
//! interleave. A failing part is counted and the run moves on.

use crate::error::FetchError;
use crate::processor::{log_failure, ComponentProcessor};
use chrono::{DateTime, Utc};
use kipipe_common::{Error, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Default CSV column holding part numbers
pub const DEFAULT_CSV_COLUMN: &str = "part_number";

/// Header line some part lists carry in place of a part number
const HEADER_LINE: &str = "part number";

/// Where the part numbers of a run come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PartNumberSource {
    Single(String),
    Txt(PathBuf),
    Csv { path: PathBuf, column: String },
}

impl PartNumberSource {
    /// Read and clean the part numbers
    pub fn load(&self) -> Result<Vec<String>> {
        let raw = match self {
            PartNumberSource::Single(pn) => vec![pn.clone()],
            PartNumberSource::Txt(path) => read_txt(path)?,
            PartNumberSource::Csv { path, column } => read_csv(path, column)?,
        };
        Ok(clean(raw))
    }
}

/// Trim, then drop empty entries and the header line
pub fn clean<I>(part_numbers: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    part_numbers
        .into_iter()
        .map(|pn| pn.trim().to_string())
        .filter(|pn| !pn.is_empty() && !pn.eq_ignore_ascii_case(HEADER_LINE))
        .collect()
}

fn read_txt(path: &Path) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path)?;
    Ok(content.lines().map(str::to_string).collect())
}

fn read_csv(path: &Path, column: &str) -> Result<Vec<String>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(|e| csv_error(path, e))?;

    let index = reader
        .headers()
        .map_err(|e| csv_error(path, e))?
        .iter()
        .position(|h| h.trim() == column)
        .ok_or_else(|| {
            Error::Config(format!(
                "CSV file {} has no column '{}'",
                path.display(),
                column
            ))
        })?;

    let mut part_numbers = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| csv_error(path, e))?;
        if let Some(value) = record.get(index) {
            part_numbers.push(value.to_string());
        }
    }

    Ok(part_numbers)
}

fn csv_error(path: &Path, err: csv::Error) -> Error {
    if err.is_io_error() {
        match err.into_kind() {
            csv::ErrorKind::Io(io) => Error::Io(io),
            other => Error::InvalidInput(format!("{}: {:?}", path.display(), other)),
        }
    } else {
        Error::InvalidInput(format!("{}: {}", path.display(), err))
    }
}

/// Outcome counts of one batch run
#[derive(Debug, Clone, Serialize)]
pub struct BatchSummary {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub total: usize,
    /// Records built and upserted
    pub stored: usize,
    /// Not found, or no category mapping (expected, nothing to store)
    pub not_stored: usize,
    /// Data-integrity or store failures
    pub failed: usize,
}

/// Process every part number in order, storing each success
pub async fn run_batch(processor: &ComponentProcessor, part_numbers: &[String]) -> BatchSummary {
    let run_id = Uuid::new_v4();
    let started_at = Utc::now();
    let mut stored = 0;
    let mut not_stored = 0;
    let mut failed = 0;

    tracing::info!(run_id = %run_id, total = part_numbers.len(), "Starting batch run");

    for (index, part_number) in part_numbers.iter().enumerate() {
        tracing::debug!(
            run_id = %run_id,
            position = index + 1,
            total = part_numbers.len(),
            part_number = %part_number,
            "Batch item"
        );

        match processor.process_and_store(part_number).await {
            Ok(_) => stored += 1,
            Err(e) => {
                log_failure(part_number, &e);
                match e {
                    FetchError::NotFound(_) | FetchError::CategoryUnresolved { .. } => {
                        not_stored += 1
                    }
                    FetchError::CategoryDetailsMissing(_) | FetchError::Store(_) => failed += 1,
                }
            }
        }
    }

    let summary = BatchSummary {
        run_id,
        started_at,
        finished_at: Utc::now(),
        total: part_numbers.len(),
        stored,
        not_stored,
        failed,
    };

    tracing::info!(
        run_id = %run_id,
        stored = summary.stored,
        not_stored = summary.not_stored,
        failed = summary.failed,
        "Batch run complete"
    );

    summary
}
