use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::matching::normalizer::Ranking;
use crate::utils::validation::delimiter_for;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to write delimited output: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to write JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Report columns, in output order
pub const REPORT_COLUMNS: [&str; 5] = [
    "signal",
    "best_reference",
    "best_probability",
    "second_reference",
    "second_probability",
];

/// One report row: the top two candidates for an experimental signal
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    pub signal: String,
    pub best_reference: String,
    pub best_probability: f64,
    pub second_reference: String,
    pub second_probability: f64,
}

impl ReportRow {
    #[must_use]
    pub fn from_ranking(signal: impl Into<String>, ranking: &Ranking) -> Self {
        let best = ranking.best();
        let second = ranking.second();
        Self {
            signal: signal.into(),
            best_reference: best.name.to_string(),
            best_probability: best.probability,
            second_reference: second.name.to_string(),
            second_probability: second.probability,
        }
    }
}

/// Appends rows to a tabular report file.
///
/// The header is written only when the file is missing or empty, so repeated
/// runs accumulate rows under a single header. `.tsv`/`.txt` files are tab
/// delimited, everything else comma delimited.
#[derive(Debug, Clone)]
pub struct ReportWriter {
    path: PathBuf,
    delimiter: u8,
}

impl ReportWriter {
    #[must_use]
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            delimiter: delimiter_for(path),
        }
    }

    /// Append rows, creating the file and header if needed
    ///
    /// # Errors
    ///
    /// Returns `ReportError::Io` if the file cannot be opened, or
    /// `ReportError::Csv` if writing fails.
    pub fn append(&self, rows: &[ReportRow]) -> Result<(), ReportError> {
        let needs_header = std::fs::metadata(&self.path).map_or(true, |m| m.len() == 0);

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        let mut wtr = csv::WriterBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(false)
            .from_writer(file);

        if needs_header {
            wtr.write_record(REPORT_COLUMNS)?;
        }
        for row in rows {
            wtr.serialize(row)?;
        }
        wtr.flush()?;

        debug!(path = %self.path.display(), rows = rows.len(), "Appended report rows");
        Ok(())
    }
}
