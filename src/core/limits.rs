//! Request-level limits for evaluations.
//!
//! The engine defines no cancellation of its own. Callers bound each
//! evaluation with these limits:
//! - Input size (response plus all context passages)
//! - A coarse wall-clock timeout around annotation and scoring
//! - Number of context passages

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Limits applied to one evaluation request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationLimits {
    /// Maximum combined input size in bytes (default: 1MB)
    #[serde(default = "default_max_input_bytes")]
    pub max_input_bytes: u64,

    /// Maximum number of context passages (default: 1000)
    #[serde(default = "default_max_passages")]
    pub max_passages: usize,

    /// Wall-clock budget for one evaluation in seconds (default: 30)
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

fn default_max_input_bytes() -> u64 {
    1024 * 1024
} // 1MB
fn default_max_passages() -> usize {
    1000
}
fn default_timeout_seconds() -> u64 {
    30
}

impl Default for EvaluationLimits {
    fn default() -> Self {
        Self {
            max_input_bytes: default_max_input_bytes(),
            max_passages: default_max_passages(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

impl EvaluationLimits {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// Validate a request against the size limits
    pub fn validate_input<S: AsRef<str>>(
        &self,
        response: &str,
        context: &[S],
    ) -> Result<(), LimitViolation> {
        if context.len() > self.max_passages {
            return Err(LimitViolation::MaxPassages {
                actual: context.len(),
                limit: self.max_passages,
            });
        }

        let size = response.len() as u64
            + context.iter().map(|p| p.as_ref().len() as u64).sum::<u64>();
        if size > self.max_input_bytes {
            return Err(LimitViolation::MaxInputBytes {
                actual: size,
                limit: self.max_input_bytes,
            });
        }

        Ok(())
    }
}

/// Limit violation errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LimitViolation {
    #[error("Maximum input bytes exceeded: {actual} > {limit}")]
    MaxInputBytes { actual: u64, limit: u64 },

    #[error("Maximum context passages exceeded: {actual} > {limit}")]
    MaxPassages { actual: usize, limit: usize },

    #[error("Evaluation timeout: exceeded {limit_seconds}s")]
    Timeout { limit_seconds: u64 },
}
