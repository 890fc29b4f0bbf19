//! Conversion of per-reference alignment errors into a ranked distribution.
//!
//! Each usable reference gets weight `1 / best_error`; weights are divided by
//! their sum so the scores add up to 1. Weights are computed as
//! `min_error / best_error`, which normalizes to the same values while keeping
//! the sum in `[1, n]` for errors close to zero. This treats error as inversely and
//! linearly related to likelihood. The result is a relative-likelihood
//! heuristic for ordering references, **not** a calibrated posterior
//! probability, and should not be read as one.
//!
//! A zero error cannot be weighted this way. When one is present the ranking
//! takes the perfect-match path instead: the first exact reference gets 1.0,
//! every other reference gets 0.0, and the ranking is marked
//! [`RankingKind::PerfectMatch`].

use serde::Serialize;
use thiserror::Error;

use crate::core::types::{Confidence, ReferenceName};
use crate::matching::aligner::{AlignmentResult, Alignments};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RankError {
    #[error("Need at least 2 usable alignments to rank, found {found}")]
    InsufficientCandidates { found: usize },

    #[error("Alignment error for '{name}' cannot be weighted: {error}")]
    NonFiniteError { name: String, error: f64 },
}

/// How the probabilities of a ranking were derived
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RankingKind {
    /// Inverse-error weights normalized to sum to 1
    Weighted,
    /// A reference matched exactly; it holds all of the probability
    PerfectMatch,
}

/// One reference with its relative probability
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredReference {
    pub name: ReferenceName,

    /// Relative likelihood in `[0, 1]`; not calibrated
    pub probability: f64,

    pub best_offset: usize,
    pub best_error: f64,
}

/// References ordered by descending probability.
///
/// Always holds at least two entries.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ranking {
    kind: RankingKind,
    scores: Vec<ScoredReference>,
}

impl Ranking {
    #[must_use]
    pub fn kind(&self) -> RankingKind {
        self.kind
    }

    #[must_use]
    pub fn is_perfect_match(&self) -> bool {
        self.kind == RankingKind::PerfectMatch
    }

    /// All ranked references, best first
    #[must_use]
    pub fn scores(&self) -> &[ScoredReference] {
        &self.scores
    }

    #[must_use]
    pub fn best(&self) -> &ScoredReference {
        &self.scores[0]
    }

    #[must_use]
    pub fn second(&self) -> &ScoredReference {
        &self.scores[1]
    }

    /// Display confidence for the entry at `rank` (0-based)
    #[must_use]
    pub fn confidence(&self, rank: usize) -> Confidence {
        let perfect = rank == 0 && self.is_perfect_match();
        self.scores
            .get(rank)
            .map_or(Confidence::Low, |s| {
                Confidence::from_probability(s.probability, perfect)
            })
    }
}

/// Rank the successful alignments of one experimental signal.
///
/// References that failed to align are not candidates.
///
/// # Errors
///
/// See [`rank`].
pub fn rank_alignments(alignments: &Alignments) -> Result<Ranking, RankError> {
    rank(alignments.usable())
}

/// Rank candidates by inverse-error weighting.
///
/// Candidates are taken in iteration order; that order breaks probability
/// ties, so equal scores keep the reference seen first.
///
/// # Errors
///
/// Returns `RankError::InsufficientCandidates` with fewer than two
/// candidates, and `RankError::NonFiniteError` if an error is not finite.
pub fn rank<'a, I>(candidates: I) -> Result<Ranking, RankError>
where
    I: IntoIterator<Item = (&'a ReferenceName, &'a AlignmentResult)>,
{
    let mut scores: Vec<ScoredReference> = candidates
        .into_iter()
        .map(|(name, alignment)| ScoredReference {
            name: name.clone(),
            probability: 0.0,
            best_offset: alignment.best_offset,
            best_error: alignment.best_error,
        })
        .collect();

    if scores.len() < 2 {
        return Err(RankError::InsufficientCandidates {
            found: scores.len(),
        });
    }

    if let Some(bad) = scores.iter().find(|s| !s.best_error.is_finite()) {
        return Err(RankError::NonFiniteError {
            name: bad.name.0.clone(),
            error: bad.best_error,
        });
    }

    if let Some(exact) = scores.iter().position(|s| s.best_error == 0.0) {
        let mut best = scores.remove(exact);
        best.probability = 1.0;

        // Runner-up is the lowest remaining error; stable sort keeps first-seen on ties
        scores.sort_by(|a, b| a.best_error.total_cmp(&b.best_error));
        scores.insert(0, best);

        return Ok(Ranking {
            kind: RankingKind::PerfectMatch,
            scores,
        });
    }

    // Every error is finite and positive here, so each weight lies in (0, 1]
    let min_error = scores
        .iter()
        .map(|s| s.best_error)
        .fold(f64::INFINITY, f64::min);
    let weights: Vec<f64> = scores.iter().map(|s| min_error / s.best_error).collect();

    let total: f64 = weights.iter().sum();
    for (score, weight) in scores.iter_mut().zip(&weights) {
        score.probability = weight / total;
    }

    scores.sort_by(|a, b| b.probability.total_cmp(&a.probability));

    Ok(Ranking {
        kind: RankingKind::Weighted,
        scores,
    })
}
