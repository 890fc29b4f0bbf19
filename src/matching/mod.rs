//! Signal alignment and ranking.
//!
//! This module provides the core matching functionality:
//!
//! - [`Aligner`]: Finds the best start offset of an experimental signal in each reference
//! - [`normalizer::rank`]: Converts alignment errors into a ranked distribution
//! - [`MatchingEngine`]: Runs both steps for one or many experimental signals
//!
//! ## Alignment
//!
//! For each reference, every integer offset `s` from `0` to
//! `len(reference) - len(experimental)` is scored with the configured
//! [`ErrorMetric`] (sum of squared differences by default). The lowest error
//! wins; ties keep the lowest offset. References shorter than the
//! experimental signal are skipped, not fatal.
//!
//! ## Ranking
//!
//! Each usable reference gets weight `1 / error`, normalized to sum to 1.
//! These are relative likelihoods, not calibrated probabilities. A zero error
//! short-circuits to a perfect match with probability 1.0.
//!
//! ## Example
//!
//! ```rust
//! use signal_solver::{MatchingEngine, ReferenceSet, Signal};
//!
//! let mut references = ReferenceSet::new();
//! references
//!     .insert("A".into(), Signal::from_intensities(vec![0.0, 1.0, 2.0, 3.0, 4.0]).unwrap())
//!     .unwrap();
//! references
//!     .insert("B".into(), Signal::from_intensities(vec![5.0; 5]).unwrap())
//!     .unwrap();
//!
//! let experimental = Signal::from_intensities(vec![1.0, 2.0, 3.0]).unwrap();
//! let engine = MatchingEngine::new(&references);
//! let result = engine.identify(&experimental).unwrap();
//!
//! assert_eq!(result.ranking.best().name.as_str(), "A");
//! assert_eq!(result.ranking.best().probability, 1.0);
//! ```

pub mod aligner;
pub mod engine;
pub mod metric;
pub mod normalizer;

pub use aligner::{Aligner, AlignmentError, AlignmentResult, Alignments};
pub use engine::{MatchResult, MatchingConfig, MatchingEngine};
pub use metric::ErrorMetric;
pub use normalizer::{RankError, Ranking, RankingKind, ScoredReference};
