use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::utils::validation::MAX_SAMPLES;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SignalError {
    #[error("Non-finite value at sample {index}")]
    NonFiniteValue { index: usize },

    #[error("Time decreases at sample {index} ({previous} -> {current})")]
    TimeDecreasing {
        index: usize,
        previous: f64,
        current: f64,
    },

    #[error("Too many samples: {0} exceeds maximum allowed ({MAX_SAMPLES})")]
    TooManySamples(usize),
}

/// A single (time, intensity) observation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub time: f64,
    pub intensity: f64,
}

impl Sample {
    #[must_use]
    pub fn new(time: f64, intensity: f64) -> Self {
        Self { time, intensity }
    }
}

/// An ordered, validated time series of intensity samples.
///
/// Times are non-decreasing and every value is finite. Sampling may be
/// non-uniform; alignment works on sample indices, never on time values.
///
/// Times and intensities are stored separately so that alignment can slice
/// the intensity column directly.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<Sample>", into = "Vec<Sample>")]
pub struct Signal {
    times: Vec<f64>,
    intensities: Vec<f64>,
}

impl Signal {
    /// Build a signal from samples, validating ordering and finiteness.
    ///
    /// # Errors
    ///
    /// Returns `SignalError::TooManySamples` above the sample limit,
    /// `SignalError::NonFiniteValue` for NaN or infinite values, and
    /// `SignalError::TimeDecreasing` if a time is lower than its predecessor.
    pub fn new(samples: Vec<Sample>) -> Result<Self, SignalError> {
        if samples.len() > MAX_SAMPLES {
            return Err(SignalError::TooManySamples(samples.len()));
        }

        let mut times = Vec::with_capacity(samples.len());
        let mut intensities = Vec::with_capacity(samples.len());

        for (index, sample) in samples.into_iter().enumerate() {
            if !sample.time.is_finite() || !sample.intensity.is_finite() {
                return Err(SignalError::NonFiniteValue { index });
            }
            if let Some(&previous) = times.last() {
                if sample.time < previous {
                    return Err(SignalError::TimeDecreasing {
                        index,
                        previous,
                        current: sample.time,
                    });
                }
            }
            times.push(sample.time);
            intensities.push(sample.intensity);
        }

        Ok(Self { times, intensities })
    }

    /// Build a uniformly sampled signal whose times are the sample indices.
    ///
    /// # Errors
    ///
    /// Same as [`Signal::new`].
    pub fn from_intensities(intensities: Vec<f64>) -> Result<Self, SignalError> {
        #[allow(clippy::cast_precision_loss)]
        let samples = intensities
            .into_iter()
            .enumerate()
            .map(|(i, intensity)| Sample::new(i as f64, intensity))
            .collect();
        Self::new(samples)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.intensities.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.intensities.is_empty()
    }

    #[must_use]
    pub fn times(&self) -> &[f64] {
        &self.times
    }

    #[must_use]
    pub fn intensities(&self) -> &[f64] {
        &self.intensities
    }

    /// Iterate over the samples in order
    pub fn samples(&self) -> impl Iterator<Item = Sample> + '_ {
        self.times
            .iter()
            .zip(&self.intensities)
            .map(|(&time, &intensity)| Sample::new(time, intensity))
    }

    /// Time span covered by the signal, if it has any samples
    #[must_use]
    pub fn time_range(&self) -> Option<(f64, f64)> {
        Some((*self.times.first()?, *self.times.last()?))
    }
}

impl TryFrom<Vec<Sample>> for Signal {
    type Error = SignalError;

    fn try_from(samples: Vec<Sample>) -> Result<Self, Self::Error> {
        Self::new(samples)
    }
}

impl From<Signal> for Vec<Sample> {
    fn from(signal: Signal) -> Self {
        signal.samples().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_signal() {
        let signal = Signal::new(vec![
            Sample::new(0.0, 1.0),
            Sample::new(0.5, 2.0),
            Sample::new(0.5, 3.0),
        ])
        .unwrap();

        assert_eq!(signal.len(), 3);
        assert_eq!(signal.intensities(), &[1.0, 2.0, 3.0]);
        assert_eq!(signal.times(), &[0.0, 0.5, 0.5]);
        assert_eq!(signal.time_range(), Some((0.0, 0.5)));
    }

    #[test]
    fn test_rejects_decreasing_time() {
        let result = Signal::new(vec![Sample::new(1.0, 1.0), Sample::new(0.5, 2.0)]);
        assert!(matches!(
            result,
            Err(SignalError::TimeDecreasing { index: 1, .. })
        ));
    }

    #[test]
    fn test_rejects_non_finite() {
        let result = Signal::from_intensities(vec![1.0, f64::NAN]);
        assert_eq!(result, Err(SignalError::NonFiniteValue { index: 1 }));

        let result = Signal::new(vec![Sample::new(f64::INFINITY, 1.0)]);
        assert_eq!(result, Err(SignalError::NonFiniteValue { index: 0 }));
    }

    #[test]
    fn test_from_intensities_uses_index_as_time() {
        let signal = Signal::from_intensities(vec![4.0, 5.0, 6.0]).unwrap();
        assert_eq!(signal.times(), &[0.0, 1.0, 2.0]);
    }

    #[test]
    fn test_empty_signal() {
        let signal = Signal::new(Vec::new()).unwrap();
        assert!(signal.is_empty());
        assert_eq!(signal.time_range(), None);
    }

    #[test]
    fn test_serde_as_sample_list() {
        let signal = Signal::from_intensities(vec![1.0, 2.0]).unwrap();
        let json = serde_json::to_string(&signal).unwrap();
        assert_eq!(
            json,
            r#"[{"time":0.0,"intensity":1.0},{"time":1.0,"intensity":2.0}]"#
        );

        let parsed: Signal = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, signal);

        let bad = r#"[{"time":1.0,"intensity":1.0},{"time":0.0,"intensity":2.0}]"#;
        assert!(serde_json::from_str::<Signal>(bad).is_err());
    }
}
