//! Core grounding engine.
//!
//! This module contains:
//! - Extractor: annotated response → anchors
//! - Numeric, Dates, Claims: per-kind verification against context
//! - Drift: unigram-overlap fallback and n-gram scoring
//! - Scorer: orchestration and the scoring policy
//! - Limits: request-level input and time bounds

pub mod claims;
pub mod dates;
pub mod drift;
pub mod extractor;
pub mod limits;
pub mod numeric;
pub mod policy;
pub mod scorer;

// Re-export commonly used types
pub use claims::{match_claim, ClaimMatch};
pub use dates::{match_date, DateStrategy};
pub use drift::{drift_score, ngram_score, overlap_ratio};
pub use extractor::{anchors_from_annotation, AnchorExtractor, ASSERTIVE_VERBS, HEDGING_VERBS};
pub use limits::{EvaluationLimits, LimitViolation};
pub use numeric::normalize;
pub use policy::{ScoringMode, ScoringPolicy};
pub use scorer::{ContextIndex, GroundingScorer};
