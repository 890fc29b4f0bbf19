use rayon::prelude::*;
use serde::Serialize;
use thiserror::Error;

use crate::catalog::store::{ReferenceSet, ReferenceSignal};
use crate::core::signal::Signal;
use crate::core::types::ReferenceName;
use crate::matching::metric::ErrorMetric;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AlignmentError {
    #[error("Reference has {reference_len} samples, fewer than the {experimental_len} of the experimental signal")]
    ReferenceTooShort {
        reference_len: usize,
        experimental_len: usize,
    },

    #[error("Experimental signal has no samples")]
    EmptyExperimental,

    #[error("Error of every window overflows a 64-bit float")]
    ErrorOverflow,
}

/// Best fit of an experimental signal against one reference
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AlignmentResult {
    /// Start index in the reference of the best-fitting window
    pub best_offset: usize,

    /// Error of that window; zero only on an exact match
    pub best_error: f64,
}

impl AlignmentResult {
    /// True if the experimental intensities occur verbatim in the reference
    #[must_use]
    pub fn is_exact(&self) -> bool {
        self.best_error == 0.0
    }
}

/// Outcome of aligning against a single named reference
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceAlignment {
    pub name: ReferenceName,
    pub outcome: Result<AlignmentResult, AlignmentError>,
}

/// Per-reference alignment outcomes, in reference-set order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Alignments {
    entries: Vec<ReferenceAlignment>,
}

impl Alignments {
    #[must_use]
    pub fn new(entries: Vec<ReferenceAlignment>) -> Self {
        Self { entries }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ReferenceAlignment> {
        self.entries.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Outcome for a named reference
    #[must_use]
    pub fn get(&self, name: &ReferenceName) -> Option<&Result<AlignmentResult, AlignmentError>> {
        self.entries
            .iter()
            .find(|entry| &entry.name == name)
            .map(|entry| &entry.outcome)
    }

    /// Successful alignments, in reference-set order
    pub fn usable(&self) -> impl Iterator<Item = (&ReferenceName, &AlignmentResult)> + '_ {
        self.entries
            .iter()
            .filter_map(|entry| entry.outcome.as_ref().ok().map(|a| (&entry.name, a)))
    }

    /// References that could not be aligned, in reference-set order
    pub fn skipped(&self) -> impl Iterator<Item = (&ReferenceName, &AlignmentError)> + '_ {
        self.entries
            .iter()
            .filter_map(|entry| entry.outcome.as_ref().err().map(|e| (&entry.name, e)))
    }
}

impl<'a> IntoIterator for &'a Alignments {
    type Item = &'a ReferenceAlignment;
    type IntoIter = std::slice::Iter<'a, ReferenceAlignment>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Exhaustive sliding-window aligner.
///
/// Every start offset of every reference is scored; there is no
/// cross-correlation shortcut, so the cost is O(references × reference
/// length × experimental length).
#[derive(Debug, Clone, Copy, Default)]
pub struct Aligner {
    metric: ErrorMetric,
    parallel: bool,
}

impl Aligner {
    #[must_use]
    pub fn new(metric: ErrorMetric) -> Self {
        Self {
            metric,
            parallel: false,
        }
    }

    /// Align against references on the rayon thread pool
    #[must_use]
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    #[must_use]
    pub fn metric(&self) -> ErrorMetric {
        self.metric
    }

    /// Find the best offset of `experimental` within one reference.
    ///
    /// # Errors
    ///
    /// Returns `AlignmentError::EmptyExperimental` if the experimental signal
    /// has no samples, `AlignmentError::ReferenceTooShort` if the reference
    /// has fewer samples than the experimental signal, or
    /// `AlignmentError::ErrorOverflow` if no window has a finite error.
    pub fn align_one(
        &self,
        experimental: &Signal,
        reference: &Signal,
    ) -> Result<AlignmentResult, AlignmentError> {
        best_alignment(
            experimental.intensities(),
            reference.intensities(),
            self.metric,
        )
    }

    /// Align `experimental` against every reference in the set.
    ///
    /// A reference that cannot be aligned gets an error entry; the rest are
    /// unaffected. Entries are returned in reference-set order regardless of
    /// whether the work ran in parallel.
    #[must_use]
    pub fn align(&self, experimental: &Signal, references: &ReferenceSet) -> Alignments {
        let align = |reference: &ReferenceSignal| ReferenceAlignment {
            name: reference.name.clone(),
            outcome: self.align_one(experimental, &reference.signal),
        };

        let entries = if self.parallel {
            references.as_slice().par_iter().map(align).collect()
        } else {
            references.iter().map(align).collect()
        };

        Alignments::new(entries)
    }
}

/// Scan every offset of `reference` and return the lowest-error window.
///
/// Ties keep the earliest offset. Windows whose error overflows to infinity
/// never win; if all of them do, the reference cannot be aligned.
///
/// # Errors
///
/// See [`Aligner::align_one`].
pub fn best_alignment(
    experimental: &[f64],
    reference: &[f64],
    metric: ErrorMetric,
) -> Result<AlignmentResult, AlignmentError> {
    if experimental.is_empty() {
        return Err(AlignmentError::EmptyExperimental);
    }
    if reference.len() < experimental.len() {
        return Err(AlignmentError::ReferenceTooShort {
            reference_len: reference.len(),
            experimental_len: experimental.len(),
        });
    }

    let mut best = AlignmentResult {
        best_offset: 0,
        best_error: f64::INFINITY,
    };

    for (offset, window) in reference.windows(experimental.len()).enumerate() {
        let error = metric.window_error(window, experimental);
        // Strict comparison keeps the first offset on ties
        if error < best.best_error {
            best = AlignmentResult {
                best_offset: offset,
                best_error: error,
            };
        }
    }

    if best.best_error.is_infinite() {
        return Err(AlignmentError::ErrorOverflow);
    }

    Ok(best)
}
