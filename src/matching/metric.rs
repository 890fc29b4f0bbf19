use serde::{Deserialize, Serialize};

/// Dissimilarity between an experimental signal and an equally long
/// reference window.
///
/// The two metrics are not interchangeable: squared differences weigh
/// outlier samples far more heavily than absolute differences, so the same
/// data can select different offsets under each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorMetric {
    /// Residual sum of squares, `Σ (r[i] - e[i])²`
    #[default]
    SumOfSquares,
    /// Sum of absolute differences, `Σ |r[i] - e[i]|`
    SumOfAbsolute,
}

impl ErrorMetric {
    /// Error between a reference window and the experimental intensities.
    ///
    /// Both slices are expected to have the same length; extra samples in the
    /// longer one are ignored.
    #[must_use]
    pub fn window_error(self, window: &[f64], experimental: &[f64]) -> f64 {
        let diffs = window.iter().zip(experimental).map(|(r, e)| r - e);
        match self {
            Self::SumOfSquares => diffs.map(|d| d * d).sum(),
            Self::SumOfAbsolute => diffs.map(f64::abs).sum(),
        }
    }
}

impl std::fmt::Display for ErrorMetric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SumOfSquares => write!(f, "sum of squares"),
            Self::SumOfAbsolute => write!(f, "sum of absolute differences"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sum_of_squares() {
        let error = ErrorMetric::SumOfSquares.window_error(&[2.0, 2.0, 2.0], &[1.0, 1.0, 1.0]);
        assert!((error - 3.0).abs() < f64::EPSILON);

        let error = ErrorMetric::SumOfSquares.window_error(&[0.0, 3.0], &[1.0, 1.0]);
        assert!((error - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_sum_of_absolute() {
        let error = ErrorMetric::SumOfAbsolute.window_error(&[0.0, 3.0], &[1.0, 1.0]);
        assert!((error - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_identical_windows_have_zero_error() {
        let values = [1.5, -2.0, 7.25];
        assert_eq!(ErrorMetric::SumOfSquares.window_error(&values, &values), 0.0);
        assert_eq!(ErrorMetric::SumOfAbsolute.window_error(&values, &values), 0.0);
    }

    #[test]
    fn test_default_is_sum_of_squares() {
        assert_eq!(ErrorMetric::default(), ErrorMetric::SumOfSquares);
    }
}
