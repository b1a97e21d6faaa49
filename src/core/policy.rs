//! Scoring policy: weights, tolerances and thresholds.

use serde::{Deserialize, Serialize};

use super::claims::DEFAULT_WINDOW;
use super::numeric::DEFAULT_TOLERANCE;
use crate::domain::AnchorKind;

/// How the hallucination score is computed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringMode {
    /// Anchor extraction and verification with drift fallback
    #[default]
    Claims,
    /// Plain n-gram overlap against the context
    Ngram,
}

impl std::str::FromStr for ScoringMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "claims" => Ok(ScoringMode::Claims),
            "ngram" => Ok(ScoringMode::Ngram),
            other => Err(format!("unknown scoring mode '{other}' (expected claims or ngram)")),
        }
    }
}

/// Tunable constants of the scorer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringPolicy {
    #[serde(default)]
    pub mode: ScoringMode,

    /// N-gram size for `ngram` mode (default: 1)
    #[serde(default = "default_ngram_size")]
    pub ngram_size: usize,

    /// Absolute tolerance for numeric equality (default: 0.01)
    #[serde(default = "default_numeric_tolerance")]
    pub numeric_tolerance: f64,

    /// Max character distance between claim subject and object (default: 300)
    #[serde(default = "default_claim_window")]
    pub claim_window: usize,

    /// Weight of numeric and date anchors (default: 1.0)
    #[serde(default = "default_fact_weight")]
    pub fact_weight: f64,

    /// Weight of claim anchors (default: 0.5)
    #[serde(default = "default_claim_weight")]
    pub claim_weight: f64,

    /// Unigram overlap below which a response counts as drifted (default: 0.2)
    #[serde(default = "default_drift_threshold")]
    pub drift_threshold: f64,

    /// Score assigned to a drifted response (default: 0.2)
    #[serde(default = "default_drift_penalty")]
    pub drift_penalty: f64,

    /// Score above which the verdict is FAIL (default: 0.5)
    #[serde(default = "default_fail_threshold")]
    pub fail_threshold: f64,
}

fn default_ngram_size() -> usize {
    1
}
fn default_numeric_tolerance() -> f64 {
    DEFAULT_TOLERANCE
}
fn default_claim_window() -> usize {
    DEFAULT_WINDOW
}
fn default_fact_weight() -> f64 {
    1.0
}
fn default_claim_weight() -> f64 {
    0.5
}
fn default_drift_threshold() -> f64 {
    0.2
}
fn default_drift_penalty() -> f64 {
    0.2
}
fn default_fail_threshold() -> f64 {
    0.5
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        Self {
            mode: ScoringMode::default(),
            ngram_size: default_ngram_size(),
            numeric_tolerance: default_numeric_tolerance(),
            claim_window: default_claim_window(),
            fact_weight: default_fact_weight(),
            claim_weight: default_claim_weight(),
            drift_threshold: default_drift_threshold(),
            drift_penalty: default_drift_penalty(),
            fail_threshold: default_fail_threshold(),
        }
    }
}

impl ScoringPolicy {
    /// Weight of an anchor in the error rate
    pub fn weight(&self, kind: AnchorKind) -> f64 {
        match kind {
            AnchorKind::Numeric | AnchorKind::Date => self.fact_weight,
            AnchorKind::Claim => self.claim_weight,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let policy = ScoringPolicy::default();
        assert_eq!(policy.mode, ScoringMode::Claims);
        assert_eq!(policy.weight(AnchorKind::Numeric), 1.0);
        assert_eq!(policy.weight(AnchorKind::Date), 1.0);
        assert_eq!(policy.weight(AnchorKind::Claim), 0.5);
        assert_eq!(policy.claim_window, 300);
        assert_eq!(policy.numeric_tolerance, 0.01);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let policy: ScoringPolicy = serde_yaml::from_str("claim_weight: 0.25\nmode: ngram\n").unwrap();
        assert_eq!(policy.claim_weight, 0.25);
        assert_eq!(policy.mode, ScoringMode::Ngram);
        assert_eq!(policy.drift_penalty, 0.2);
    }

    #[test]
    fn test_mode_from_str() {
        assert_eq!("NGRAM".parse::<ScoringMode>(), Ok(ScoringMode::Ngram));
        assert!("bleu".parse::<ScoringMode>().is_err());
    }
}
