use serde::{Deserialize, Serialize};

/// Unique name of a reference signal within a reference set (e.g. its file name)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReferenceName(pub String);

impl ReferenceName {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ReferenceName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ReferenceName {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Coarse reading of a relative probability for display
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    Low,
    Medium,
    High,
    Exact,
}

impl Confidence {
    /// Classify a probability produced by the score normalizer.
    ///
    /// `perfect` marks a zero-error alignment, which is always `Exact`.
    #[must_use]
    pub fn from_probability(probability: f64, perfect: bool) -> Self {
        if perfect {
            Self::Exact
        } else if probability >= 0.80 {
            Self::High
        } else if probability >= 0.50 {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "LOW"),
            Self::Medium => write!(f, "MEDIUM"),
            Self::High => write!(f, "HIGH"),
            Self::Exact => write!(f, "EXACT"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confidence_from_probability() {
        assert_eq!(Confidence::from_probability(1.0, true), Confidence::Exact);
        assert_eq!(Confidence::from_probability(0.9, false), Confidence::High);
        assert_eq!(Confidence::from_probability(0.6, false), Confidence::Medium);
        assert_eq!(Confidence::from_probability(0.2, false), Confidence::Low);
    }

    #[test]
    fn test_reference_name_serializes_as_string() {
        let name = ReferenceName::new("ref_signal0.csv");
        assert_eq!(serde_json::to_string(&name).unwrap(), "\"ref_signal0.csv\"");
        assert_eq!(name.to_string(), "ref_signal0.csv");
    }
}
