//! Parser for delimited (time, intensity) signal files.
//!
//! Supported layouts:
//! - A header row naming `Time` and `Intensity` columns (case-insensitive,
//!   any position, extra columns ignored)
//! - No header, in which case the first two columns are time and intensity
//!
//! Files ending in `.gz`/`.bgz` are decompressed transparently.

use std::io::{BufReader, Read};
use std::path::Path;

use flate2::read::MultiGzDecoder;
use thiserror::Error;
use tracing::debug;

use crate::core::signal::{Sample, Signal, SignalError};
use crate::utils::validation::{check_sample_limit, delimiter_for, is_gzipped, MAX_SAMPLES};

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed delimited text: {0}")]
    Csv(#[from] csv::Error),

    #[error("Header has no '{0}' column")]
    MissingColumn(String),

    #[error("Invalid {column} value on line {line}: '{raw}'")]
    InvalidValue {
        line: u64,
        column: &'static str,
        raw: String,
    },

    #[error("No samples found")]
    NoSamples,

    #[error("Too many samples: {0} exceeds maximum allowed ({MAX_SAMPLES})")]
    TooManySamples(usize),

    #[error("Invalid signal: {0}")]
    InvalidSignal(#[from] SignalError),
}

/// Column positions of time and intensity within a record
#[derive(Debug, Clone, Copy)]
struct Columns {
    time: usize,
    intensity: usize,
}

impl Columns {
    const POSITIONAL: Self = Self {
        time: 0,
        intensity: 1,
    };

    /// Locate columns by header name
    fn from_header(header: &csv::StringRecord) -> Result<Self, ParseError> {
        let find = |wanted: &str| {
            header
                .iter()
                .position(|field| field.trim().eq_ignore_ascii_case(wanted))
        };

        let time = find("time").ok_or_else(|| ParseError::MissingColumn("Time".to_string()))?;
        let intensity =
            find("intensity").ok_or_else(|| ParseError::MissingColumn("Intensity".to_string()))?;

        Ok(Self { time, intensity })
    }
}

/// A record is a header if any of its fields is not a number
fn is_header(record: &csv::StringRecord) -> bool {
    record.iter().any(|field| field.trim().parse::<f64>().is_err())
}

/// Parse a signal file, choosing the delimiter from the extension.
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be read, or any error from
/// [`parse_signal_reader`].
pub fn parse_signal_file(path: &Path) -> Result<Signal, ParseError> {
    let file = std::fs::File::open(path)?;
    let delimiter = delimiter_for(path);

    let signal = if is_gzipped(path) {
        parse_signal_reader(BufReader::new(MultiGzDecoder::new(file)), delimiter)?
    } else {
        parse_signal_reader(BufReader::new(file), delimiter)?
    };

    debug!(path = %path.display(), samples = signal.len(), "Parsed signal file");
    Ok(signal)
}

/// Parse signal text with the given delimiter.
///
/// # Errors
///
/// See [`parse_signal_reader`].
pub fn parse_signal_text(text: &str, delimiter: u8) -> Result<Signal, ParseError> {
    parse_signal_reader(text.as_bytes(), delimiter)
}

/// Parse delimited signal data from any reader.
///
/// # Errors
///
/// Returns `ParseError::Csv` for malformed records, `ParseError::MissingColumn`
/// if a header lacks `Time` or `Intensity`, `ParseError::InvalidValue` for
/// unparseable cells, `ParseError::NoSamples` if there is no data,
/// `ParseError::TooManySamples` above the limit, and `ParseError::InvalidSignal`
/// if the samples are out of time order or non-finite.
pub fn parse_signal_reader<R: Read>(reader: R, delimiter: u8) -> Result<Signal, ParseError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .comment(Some(b'#'))
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut columns: Option<Columns> = None;
    let mut samples = Vec::new();

    for result in rdr.records() {
        let record = result?;
        // Line numbers in errors are 1-based for user friendliness
        let line = record.position().map_or(0, csv::Position::line);

        // The first record decides the layout
        let cols = if let Some(cols) = columns {
            cols
        } else {
            if is_header(&record) {
                columns = Some(Columns::from_header(&record)?);
                continue;
            }
            columns = Some(Columns::POSITIONAL);
            Columns::POSITIONAL
        };

        let time = parse_field(&record, cols.time, line, "time")?;
        let intensity = parse_field(&record, cols.intensity, line, "intensity")?;

        // Check sample limit for DOS protection
        if check_sample_limit(samples.len()).is_some() {
            return Err(ParseError::TooManySamples(samples.len() + 1));
        }

        samples.push(Sample::new(time, intensity));
    }

    if samples.is_empty() {
        return Err(ParseError::NoSamples);
    }

    Ok(Signal::new(samples)?)
}

fn parse_field(
    record: &csv::StringRecord,
    index: usize,
    line: u64,
    column: &'static str,
) -> Result<f64, ParseError> {
    let raw = record.get(index).unwrap_or("");
    raw.parse().map_err(|_| ParseError::InvalidValue {
        line,
        column,
        raw: raw.to_string(),
    })
}
