//! Centralized validation and helper functions.

use std::path::Path;

/// Maximum number of samples allowed in a single signal (DOS protection)
pub const MAX_SAMPLES: usize = 10_000_000;

/// Maximum number of references loaded into one reference set
pub const MAX_REFERENCES: usize = 100_000;

/// Check if adding another sample would exceed the maximum allowed.
///
/// Call this with the current count BEFORE adding a new sample.
/// Returns an error message if adding would exceed the limit, None if safe to add.
#[must_use]
pub fn check_sample_limit(count: usize) -> Option<String> {
    if count >= MAX_SAMPLES {
        Some(format!(
            "Too many samples: adding another would exceed maximum of {MAX_SAMPLES}"
        ))
    } else {
        None
    }
}

/// Check if adding another reference would exceed the maximum allowed.
#[must_use]
pub fn check_reference_limit(count: usize) -> Option<String> {
    if count >= MAX_REFERENCES {
        Some(format!(
            "Too many references: adding another would exceed maximum of {MAX_REFERENCES}"
        ))
    } else {
        None
    }
}

/// Check if the path is a gzipped file
#[allow(clippy::case_sensitive_file_extension_comparisons)] // Already lowercased
#[must_use]
pub fn is_gzipped(path: &Path) -> bool {
    let path_str = path.to_string_lossy().to_lowercase();
    path_str.ends_with(".gz") || path_str.ends_with(".bgz")
}

/// Check if the path looks like a delimited signal file.
///
/// Recognised: `.csv`, `.tsv`, `.txt`, each optionally gzip compressed.
///
/// # Examples
///
/// ```
/// use signal_solver::utils::validation::is_signal_file;
/// use std::path::Path;
///
/// assert!(is_signal_file(Path::new("ref_signal0.csv")));
/// assert!(is_signal_file(Path::new("trace.tsv.gz")));
/// assert!(!is_signal_file(Path::new("catalog.json")));
/// ```
#[must_use]
pub fn is_signal_file(path: &Path) -> bool {
    let path_str = path.to_string_lossy().to_lowercase();
    let stem = path_str
        .strip_suffix(".gz")
        .or_else(|| path_str.strip_suffix(".bgz"))
        .unwrap_or(&path_str);

    [".csv", ".tsv", ".txt"]
        .iter()
        .any(|ext| stem.ends_with(ext))
}

/// Field delimiter for a signal or report path: tab for `.tsv`/`.txt`, comma otherwise
#[must_use]
pub fn delimiter_for(path: &Path) -> u8 {
    let path_str = path.to_string_lossy().to_lowercase();
    let stem = path_str
        .strip_suffix(".gz")
        .or_else(|| path_str.strip_suffix(".bgz"))
        .unwrap_or(&path_str);

    if stem.ends_with(".tsv") || stem.ends_with(".txt") {
        b'\t'
    } else {
        b','
    }
}
