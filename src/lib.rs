//! groundcheck - claim-based grounding verification
//!
//! Scores whether a generated answer is supported by a set of reference
//! passages and lists the specific facts that are not.
//!
//! # Architecture
//!
//! The engine is a pure, synchronous pipeline:
//! - An injected annotator tokenizes, tags and parses the response
//! - Numeric, date and subject-verb-object anchors are extracted
//! - Each anchor is verified against the lowercased context
//! - Weighted failures become the score, with a topic-drift fallback
//!
//! # Modules
//!
//! - `annotate`: Annotator boundary (subprocess, fixtures, rule-based)
//! - `core`: Extraction, verification, scoring policy, limits
//! - `domain`: Data structures (Anchor, EvaluationReport)
//! - `cli`: Command-line interface
//!
//! # Usage
//!
//! ```bash
//! # Score a response against retrieved passages
//! groundcheck evaluate --response "The price is \$150." --context ctx.json
//!
//! # Inspect the anchors extracted from a response
//! groundcheck anchors --response "Google was founded in 1998."
//! ```

pub mod annotate;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;

// Re-export main types at crate root for convenience
pub use annotate::{Annotation, Annotator, AnnotateError, CommandAnnotator, FixtureAnnotator, RuleAnnotator};
pub use core::{GroundingScorer, ScoringMode, ScoringPolicy};
pub use domain::{Anchor, AnchorKind, ClaimType, EvaluationReport, UnsupportedClaim, Verdict};
