//! Grounding scorer: extraction, per-anchor verification, aggregation.
//!
//! Policy, in order of precedence:
//!
//! 1. Empty response → 0.0, nothing to hallucinate
//! 2. No context → 1.0 with a single `context` entry (fail-closed). A
//!    whitespace-only response still gets here
//! 3. No anchors → topic drift score alone
//! 4. Otherwise the weighted share of unsupported anchors; when that is
//!    exactly zero the drift score is reported instead
//!
//! Each call is independent. Nothing is cached between calls.

use std::sync::Arc;

use tracing::{debug, info};

use super::claims::match_claim;
use super::dates::match_date;
use super::drift::{drift_score, ngram_score};
use super::extractor::AnchorExtractor;
use super::numeric::{approx_eq, leading_number, normalize, scan_numbers};
use super::policy::{ScoringMode, ScoringPolicy};
use crate::annotate::{AnnotateError, Annotator};
use crate::domain::{Anchor, EvaluationReport, Fact, VerificationOutcome};

/// Lowercased context with derived lookups, built once per evaluation
#[derive(Debug, Clone)]
pub struct ContextIndex {
    text: String,
    numbers: Vec<f64>,
}

impl ContextIndex {
    /// Join passages with a single space and lowercase the result
    pub fn new<S: AsRef<str>>(passages: &[S]) -> Self {
        let text = passages
            .iter()
            .map(|p| p.as_ref())
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase();
        let numbers = scan_numbers(&text);
        Self { text, numbers }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// True when every passage is blank
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Check a numeric anchor value (lowercased) against the context
pub fn verify_numeric(value: &str, context: &ContextIndex, tolerance: f64) -> Option<&'static str> {
    // Separators are only stripped from the anchor side
    let plain = value.replace(',', "");
    if context.text.contains(value) || context.text.contains(&plain) {
        return Some("literal match");
    }

    if let Some(wanted) = normalize(value) {
        if context.numbers.iter().any(|&n| approx_eq(n, wanted, tolerance)) {
            return Some("numeric match within tolerance");
        }
    }

    if value.contains('%') {
        if let Some(number) = leading_number(value) {
            if context.text.contains(&format!("{number} percent")) {
                return Some("percent spelled out");
            }
        }
    }

    None
}

/// Orchestrates one grounding evaluation
#[derive(Clone)]
pub struct GroundingScorer {
    extractor: AnchorExtractor,
    policy: ScoringPolicy,
}

impl GroundingScorer {
    pub fn new(annotator: Arc<dyn Annotator>, policy: ScoringPolicy) -> Self {
        Self {
            extractor: AnchorExtractor::new(annotator),
            policy,
        }
    }

    pub fn policy(&self) -> &ScoringPolicy {
        &self.policy
    }

    pub fn extractor(&self) -> &AnchorExtractor {
        &self.extractor
    }

    /// Score how well `response` is grounded in `context`.
    ///
    /// The only failure is the annotator's; empty inputs are valid and
    /// produce defined reports. A context whose passages are all blank
    /// (`[]`, `[""]`, `["  "]`) counts as no context and fails closed.
    pub fn evaluate<S: AsRef<str>>(
        &self,
        response: &str,
        context: &[S],
    ) -> Result<EvaluationReport, AnnotateError> {
        if response.is_empty() {
            return Ok(EvaluationReport::grounded());
        }

        let index = ContextIndex::new(context);
        if index.is_empty() {
            info!("no context supplied; failing closed");
            return Ok(EvaluationReport::without_context());
        }

        let report = match self.policy.mode {
            ScoringMode::Claims => self.score_claims(response, &index)?,
            ScoringMode::Ngram => EvaluationReport::with_score(
                ngram_score(response, index.text(), self.policy.ngram_size),
                Vec::new(),
            ),
        };

        info!(
            mode = ?self.policy.mode,
            score = report.score,
            unsupported = report.unsupported_claims.len(),
            "evaluation complete"
        );
        Ok(report)
    }

    fn score_claims(
        &self,
        response: &str,
        index: &ContextIndex,
    ) -> Result<EvaluationReport, AnnotateError> {
        let drift = drift_score(
            response,
            index.text(),
            self.policy.drift_threshold,
            self.policy.drift_penalty,
        );

        let anchors = self.extractor.extract(response)?;
        if anchors.is_empty() {
            debug!(drift, "no anchors; using drift score");
            return Ok(EvaluationReport::with_score(drift, Vec::new()));
        }

        let outcomes = self.verify(anchors, index);

        let mut total = 0.0;
        let mut failed = 0.0;
        for outcome in &outcomes {
            let weight = self.policy.weight(outcome.anchor.kind());
            total += weight;
            if !outcome.supported {
                failed += weight;
            }
        }
        let error_rate = if total > 0.0 { failed / total } else { 0.0 };

        // Any failing anchor takes precedence over the coarse drift signal
        let score = if error_rate > 0.0 { error_rate } else { drift };
        debug!(error_rate, drift, score, "aggregated anchor outcomes");

        let unsupported = outcomes
            .iter()
            .filter_map(VerificationOutcome::to_unsupported_claim)
            .collect();
        Ok(EvaluationReport::with_score(score, unsupported))
    }

    /// Verify each anchor against the context, preserving order
    pub fn verify(&self, anchors: Vec<Anchor>, index: &ContextIndex) -> Vec<VerificationOutcome> {
        anchors
            .into_iter()
            .map(|anchor| {
                let outcome = self.verify_one(anchor, index);
                debug!(
                    kind = %outcome.anchor.kind(),
                    anchor = outcome.anchor.text(),
                    supported = outcome.supported,
                    reason = %outcome.reason,
                    "verified anchor"
                );
                outcome
            })
            .collect()
    }

    fn verify_one(&self, anchor: Anchor, index: &ContextIndex) -> VerificationOutcome {
        // Ok(how it matched) or Err(optional detail on the miss)
        let result: Result<&'static str, Option<&'static str>> = match anchor.fact() {
            Fact::Numeric(value) => {
                verify_numeric(value, index, self.policy.numeric_tolerance).ok_or(None)
            }
            Fact::Date(value) => match_date(value, index.text())
                .map(|strategy| strategy.as_str())
                .ok_or(None),
            Fact::Claim(triple) => {
                let claim = match_claim(
                    &triple.subject,
                    &triple.object,
                    index.text(),
                    self.policy.claim_window,
                );
                if claim.is_supported() {
                    Ok(claim.as_str())
                } else {
                    Err(Some(claim.as_str()))
                }
            }
        };

        match result {
            Ok(how) => VerificationOutcome::supported(anchor, how),
            Err(detail) => VerificationOutcome::unsupported(anchor, detail),
        }
    }
}
