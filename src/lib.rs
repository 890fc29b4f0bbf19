//! # signal-solver
//!
//! A library for identifying which reference signal an experimental time
//! series was drawn from.
//!
//! Each experimental signal is slid along every reference signal. The offset
//! with the lowest residual error is that reference's best alignment, and the
//! references are then ranked by inverse-error weights normalized to sum to 1.
//!
//! ## Features
//!
//! - **Exhaustive alignment**: Every window of every reference is scored
//! - **Selectable metric**: Sum of squared or absolute differences
//! - **Skip and continue**: References shorter than the experiment are reported, not fatal
//! - **Perfect-match detection**: An exact window takes all of the probability
//! - **Parallel batches**: Alignment and batch identification run on rayon
//!
//! The probabilities are relative likelihoods for ordering references. They
//! are not calibrated.
//!
//! ## Example
//!
//! ```rust
//! use signal_solver::{MatchingEngine, ReferenceSet, Signal};
//!
//! let mut references = ReferenceSet::new();
//! references
//!     .insert("ramp".into(), Signal::from_intensities(vec![0.0, 1.0, 2.0, 3.0]).unwrap())
//!     .unwrap();
//! references
//!     .insert("flat".into(), Signal::from_intensities(vec![5.0, 5.0, 5.0]).unwrap())
//!     .unwrap();
//!
//! let experimental = Signal::from_intensities(vec![1.2, 2.1]).unwrap();
//! let result = MatchingEngine::new(&references).identify(&experimental).unwrap();
//!
//! let best = result.ranking.best();
//! println!("{}: {:.1}%", best.name, best.probability * 100.0);
//! ```
//!
//! ## Modules
//!
//! - [`catalog`]: Reference set storage and JSON catalogs
//! - [`core`]: Core data types for signals and reference names
//! - [`matching`]: Alignment, ranking, and the matching engine
//! - [`parsing`]: Parsers for delimited signal files
//! - [`report`]: Report and overlay output
//! - [`cli`]: Command-line interface implementation

pub mod catalog;
pub mod cli;
pub mod core;
pub mod matching;
pub mod parsing;
pub mod report;
pub mod utils;

// Re-export commonly used types for convenience
pub use catalog::store::{ReferenceSet, ReferenceSignal};
pub use core::signal::{Sample, Signal};
pub use core::types::*;
pub use matching::aligner::{Aligner, AlignmentError, AlignmentResult, Alignments};
pub use matching::engine::{MatchResult, MatchingConfig, MatchingEngine};
pub use matching::metric::ErrorMetric;
pub use matching::normalizer::{RankError, Ranking, RankingKind};
