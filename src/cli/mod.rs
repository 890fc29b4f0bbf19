//! Command-line interface for signal-solver.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **identify**: Rank references for one or more experimental signals
//! - **align**: Show the best offset and error against every reference
//! - **catalog**: List or show a reference set, or export it as a JSON catalog
//! - **overlay**: Export aligned overlay data for plotting
//!
//! ## Usage
//!
//! ```text
//! # Identify experimental signals against a directory of references
//! signal-solver identify exp1.csv exp2.csv --references signal_data/reference
//!
//! # Append the top two candidates to a report
//! signal-solver identify signal_data/experimental/*.csv -r refs/ --report results.csv
//!
//! # JSON output for scripting
//! signal-solver identify exp1.csv -r refs/ --format json
//!
//! # Freeze a reference directory into a catalog
//! signal-solver catalog export refs/ refs.json
//! ```

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};

use crate::catalog::store::ReferenceSet;
use crate::core::signal::Signal;
use crate::matching::metric::ErrorMetric;
use crate::parsing::signal::{parse_signal_file, parse_signal_text};

pub mod align;
pub mod catalog;
pub mod identify;
pub mod overlay;

#[derive(Parser)]
#[command(name = "signal-solver")]
#[command(author = "Fulcrum Genomics")]
#[command(version)]
#[command(about = "Identify which reference signal an experimental time series matches")]
#[command(
    long_about = "signal-solver slides each experimental signal along every reference signal, finds the offset with the lowest residual error, and ranks the references.\n\nRanking uses inverse-error weights normalized to sum to 1. These are relative likelihoods for ordering references, not calibrated probabilities."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Rank references for experimental signals
    Identify(identify::IdentifyArgs),

    /// Align one experimental signal against every reference
    Align(align::AlignArgs),

    /// Inspect or export a reference set
    Catalog(catalog::CatalogArgs),

    /// Export overlay data of an aligned signal for plotting
    Overlay(overlay::OverlayArgs),
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
}

/// Window error metric
#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
pub enum MetricArg {
    /// Sum of squared differences
    #[default]
    Squared,
    /// Sum of absolute differences
    Absolute,
}

impl From<MetricArg> for ErrorMetric {
    fn from(arg: MetricArg) -> Self {
        match arg {
            MetricArg::Squared => ErrorMetric::SumOfSquares,
            MetricArg::Absolute => ErrorMetric::SumOfAbsolute,
        }
    }
}

/// Where to load reference signals from
#[derive(clap::Args)]
#[group(required = true, multiple = false)]
pub struct ReferenceArgs {
    /// Directory of reference signal files (CSV/TSV, optionally gzipped)
    #[arg(short, long)]
    pub references: Option<PathBuf>,

    /// JSON reference catalog (see `catalog export`)
    #[arg(long)]
    pub catalog: Option<PathBuf>,
}

impl ReferenceArgs {
    /// Load the selected reference set
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or catalog cannot be loaded.
    pub fn load(&self) -> anyhow::Result<ReferenceSet> {
        match (&self.references, &self.catalog) {
            (Some(dir), _) => ReferenceSet::load_from_dir(dir)
                .with_context(|| format!("loading references from {}", dir.display())),
            (None, Some(path)) => ReferenceSet::load_from_file(path)
                .with_context(|| format!("loading catalog {}", path.display())),
            (None, None) => anyhow::bail!("one of --references or --catalog is required"),
        }
    }
}

/// Identifier used for an experimental signal in output and reports
#[must_use]
pub fn signal_id(path: &Path) -> String {
    path.file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned())
}

/// Load an experimental signal from a file, or from stdin for `-`
///
/// # Errors
///
/// Returns an error if the input cannot be read or parsed.
pub fn load_signal(path: &Path) -> anyhow::Result<Signal> {
    if path.to_string_lossy() == "-" {
        let mut buffer = String::new();
        std::io::stdin().read_to_string(&mut buffer)?;
        let delimiter = if buffer.lines().next().is_some_and(|l| l.contains('\t')) {
            b'\t'
        } else {
            b','
        };
        return parse_signal_text(&buffer, delimiter).context("parsing signal from stdin");
    }

    parse_signal_file(path).with_context(|| format!("parsing {}", path.display()))
}
