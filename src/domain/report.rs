//! Evaluation results.

use serde::{Deserialize, Serialize};

use super::anchor::{Anchor, AnchorKind};

/// Category of an unsupported-claim entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClaimType {
    Numeric,
    Date,
    Claim,
    /// The evaluation had no context to check against
    Context,
}

impl From<AnchorKind> for ClaimType {
    fn from(kind: AnchorKind) -> Self {
        match kind {
            AnchorKind::Numeric => ClaimType::Numeric,
            AnchorKind::Date => ClaimType::Date,
            AnchorKind::Claim => ClaimType::Claim,
        }
    }
}

/// One entry of the unsupported-claims list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnsupportedClaim {
    #[serde(rename = "type")]
    pub claim_type: ClaimType,
    pub text: String,
    pub reason: String,
}

/// Result of checking one anchor. Lives only for one evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct VerificationOutcome {
    pub anchor: Anchor,
    pub supported: bool,
    pub reason: String,
}

impl VerificationOutcome {
    pub fn supported(anchor: Anchor, reason: impl Into<String>) -> Self {
        Self {
            anchor,
            supported: true,
            reason: reason.into(),
        }
    }

    pub fn unsupported(anchor: Anchor, detail: Option<&str>) -> Self {
        let reason = match detail {
            Some(detail) => format!("'{}' not found in context ({})", anchor.text(), detail),
            None => format!("'{}' not found in context", anchor.text()),
        };
        Self {
            anchor,
            supported: false,
            reason,
        }
    }

    /// Report entry for an unsupported outcome
    pub fn to_unsupported_claim(&self) -> Option<UnsupportedClaim> {
        (!self.supported).then(|| UnsupportedClaim {
            claim_type: self.anchor.kind().into(),
            text: self.anchor.text().to_string(),
            reason: self.reason.clone(),
        })
    }
}

/// Pass/fail reading of a report against a risk threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Verdict {
    Pass,
    Fail,
}

/// The externally visible result of one evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    /// Hallucination score: 0 = fully grounded, 1 = unsupported
    pub score: f64,
    pub unsupported_claims: Vec<UnsupportedClaim>,
}

impl EvaluationReport {
    /// Nothing to assess
    pub fn grounded() -> Self {
        Self {
            score: 0.0,
            unsupported_claims: Vec::new(),
        }
    }

    /// Fail-closed result when there is no evidence at all
    pub fn without_context() -> Self {
        Self {
            score: 1.0,
            unsupported_claims: vec![UnsupportedClaim {
                claim_type: ClaimType::Context,
                text: String::new(),
                reason: "cannot verify without context".to_string(),
            }],
        }
    }

    pub fn with_score(score: f64, unsupported_claims: Vec<UnsupportedClaim>) -> Self {
        Self {
            score: score.clamp(0.0, 1.0),
            unsupported_claims,
        }
    }

    /// `Fail` when the score exceeds `threshold`
    pub fn verdict(&self, threshold: f64) -> Verdict {
        if self.score > threshold {
            Verdict::Fail
        } else {
            Verdict::Pass
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::anchor::Span;

    #[test]
    fn test_without_context() {
        let report = EvaluationReport::without_context();
        assert_eq!(report.score, 1.0);
        assert_eq!(report.unsupported_claims.len(), 1);
        assert_eq!(report.unsupported_claims[0].claim_type, ClaimType::Context);
        assert_eq!(report.verdict(0.5), Verdict::Fail);
    }

    #[test]
    fn test_unsupported_reason_names_anchor() {
        let outcome = VerificationOutcome::unsupported(Anchor::numeric("$150", Span::new(13, 17)), None);
        let entry = outcome.to_unsupported_claim().unwrap();
        assert_eq!(entry.claim_type, ClaimType::Numeric);
        assert_eq!(entry.reason, "'$150' not found in context");
    }

    #[test]
    fn test_supported_outcome_has_no_entry() {
        let outcome = VerificationOutcome::supported(Anchor::numeric("5", Span::new(0, 1)), "literal match");
        assert!(outcome.to_unsupported_claim().is_none());
    }

    #[test]
    fn test_score_is_clamped() {
        assert_eq!(EvaluationReport::with_score(1.7, vec![]).score, 1.0);
        assert_eq!(EvaluationReport::with_score(-0.1, vec![]).score, 0.0);
    }

    #[test]
    fn test_report_json_shape() {
        let json = serde_json::to_value(EvaluationReport::without_context()).unwrap();
        assert_eq!(json["unsupported_claims"][0]["type"], "context");
        assert_eq!(json["score"], 1.0);
    }
}
