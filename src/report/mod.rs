//! Output of matching results.
//!
//! - [`writer`]: appends the top two candidates per experimental signal to a
//!   CSV/TSV report
//! - [`overlay`]: exports aligned overlay data for plotting

pub mod overlay;
pub mod writer;

pub use writer::{ReportError, ReportRow, ReportWriter};
