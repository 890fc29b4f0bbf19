use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::catalog::store::ReferenceSet;
use crate::core::signal::Signal;
use crate::matching::aligner::{Aligner, Alignments};
use crate::matching::metric::ErrorMetric;
use crate::matching::normalizer::{rank_alignments, RankError, Ranking};

/// Result of matching one experimental signal against the reference set
#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult {
    /// Alignment outcome for every reference, including skipped ones
    pub alignments: Alignments,

    /// Usable references ranked by relative probability
    pub ranking: Ranking,
}

/// Configuration for the matching engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchingConfig {
    /// Window error metric
    pub metric: ErrorMetric,
    /// Fan work out across the rayon thread pool
    pub parallel: bool,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            metric: ErrorMetric::SumOfSquares,
            parallel: true,
        }
    }
}

/// The main matching engine.
///
/// Holds no state between calls: every experimental signal is aligned
/// against the full reference set and ranked on its own.
pub struct MatchingEngine<'a> {
    references: &'a ReferenceSet,
    /// Configuration including metric and parallelism
    config: MatchingConfig,
}

impl<'a> MatchingEngine<'a> {
    /// Create a new matching engine with default configuration
    #[must_use]
    pub fn new(references: &'a ReferenceSet) -> Self {
        Self {
            references,
            config: MatchingConfig::default(),
        }
    }

    /// Create a new matching engine with custom configuration
    #[must_use]
    pub fn with_config(references: &'a ReferenceSet, config: MatchingConfig) -> Self {
        Self { references, config }
    }

    #[must_use]
    pub fn config(&self) -> &MatchingConfig {
        &self.config
    }

    fn aligner(&self) -> Aligner {
        Aligner::new(self.config.metric).with_parallel(self.config.parallel)
    }

    /// Align an experimental signal against every reference without ranking
    #[must_use]
    pub fn align(&self, experimental: &Signal) -> Alignments {
        self.aligner().align(experimental, self.references)
    }

    /// Align and rank one experimental signal.
    ///
    /// References that cannot be aligned are logged and left out of the
    /// ranking.
    ///
    /// # Errors
    ///
    /// Returns a [`RankError`] if fewer than two references could be aligned
    /// or an alignment error cannot be weighted.
    pub fn identify(&self, experimental: &Signal) -> Result<MatchResult, RankError> {
        let alignments = self.align(experimental);

        for (name, error) in alignments.skipped() {
            warn!(reference = %name, %error, "Skipping reference");
        }
        for (name, alignment) in alignments.usable() {
            debug!(
                reference = %name,
                offset = alignment.best_offset,
                error = alignment.best_error,
                "Aligned"
            );
        }

        let ranking = rank_alignments(&alignments)?;
        if ranking.is_perfect_match() {
            info!(reference = %ranking.best().name, "Exact match found");
        }

        Ok(MatchResult {
            alignments,
            ranking,
        })
    }

    /// Identify many experimental signals.
    ///
    /// Results are returned in input order, each paired with its identifier.
    /// A failure for one signal does not affect the others.
    #[must_use]
    pub fn identify_all<'s>(
        &self,
        experiments: &'s [(String, Signal)],
    ) -> Vec<(&'s str, Result<MatchResult, RankError>)> {
        let identify = |(id, signal): &'s (String, Signal)| (id.as_str(), self.identify(signal));

        if self.config.parallel {
            experiments.par_iter().map(identify).collect()
        } else {
            experiments.iter().map(identify).collect()
        }
    }
}
