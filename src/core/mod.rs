//! Core data types for signal identification.
//!
//! - [`Signal`]: an ordered, validated sequence of (time, intensity) samples
//! - [`Sample`]: a single observation
//! - [`ReferenceName`]: unique name of a reference within a reference set
//! - [`Confidence`]: display classification of a ranked probability
//!
//! Alignment operates on sample indices. Time values are carried for
//! reporting and overlay export, never interpolated.

pub mod signal;
pub mod types;

pub use signal::{Sample, Signal, SignalError};
pub use types::{Confidence, ReferenceName};
