//! Pre-computed annotations keyed by exact text.
//!
//! Fixture files are JSON objects mapping the annotated text to its
//! [`Annotation`]. They let an evaluation be replayed offline with the
//! exact parse a real annotator produced.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};

use super::{AnnotateError, Annotation, Annotator};

/// Annotator answering from a fixed table
#[derive(Debug, Clone, Default)]
pub struct FixtureAnnotator {
    annotations: HashMap<String, Annotation>,
}

impl FixtureAnnotator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the annotation for `text`
    pub fn with(mut self, text: impl Into<String>, annotation: Annotation) -> Self {
        self.annotations.insert(text.into(), annotation);
        self
    }

    /// Load a fixture table from a JSON file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read annotation fixtures: {}", path.display()))?;
        let annotations = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse annotation fixtures: {}", path.display()))?;
        Ok(Self { annotations })
    }

    pub fn len(&self) -> usize {
        self.annotations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
    }
}

impl Annotator for FixtureAnnotator {
    fn name(&self) -> &str {
        "fixture"
    }

    fn annotate(&self, text: &str) -> Result<Annotation, AnnotateError> {
        self.annotations
            .get(text)
            .cloned()
            .ok_or_else(|| AnnotateError::MissingFixture {
                preview: text.chars().take(60).collect(),
            })
    }
}
