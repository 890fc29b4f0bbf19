//! Parsers for loading signals from delimited text files.
//!
//! ## Example
//!
//! ```rust,no_run
//! use signal_solver::parsing::signal::{parse_signal_file, parse_signal_text};
//! use std::path::Path;
//!
//! // Parse from a CSV file with Time and Intensity columns
//! let signal = parse_signal_file(Path::new("ref_signal0.csv")).unwrap();
//!
//! // Or parse from raw text
//! let signal = parse_signal_text("Time,Intensity\n0.0,1.2\n0.1,1.9\n", b',').unwrap();
//! ```
//!
//! ## Recognised Columns
//!
//! | Column | Description | Required |
//! |--------|-------------|----------|
//! | Time | Sample time, non-decreasing | Yes |
//! | Intensity | Measured intensity | Yes |
//!
//! Other columns are ignored. Without a header row the first two columns are
//! read as time and intensity.

pub mod signal;
