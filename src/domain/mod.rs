//! Domain types for grounding evaluation.
//!
//! - Anchor: a verifiable fact extracted from a response
//! - VerificationOutcome: the per-anchor result inside one evaluation
//! - EvaluationReport: score plus unsupported claims, the only output

pub mod anchor;
pub mod report;

pub use anchor::{Anchor, AnchorKind, ClaimTriple, Fact, Span};
pub use report::{ClaimType, EvaluationReport, UnsupportedClaim, VerificationOutcome, Verdict};
