//! Linguistic annotation boundary.
//!
//! The grounding engine never tokenizes or parses text itself. It asks an
//! [`Annotator`] for tokens (with part-of-speech and dependency structure)
//! and named entities, then works purely on that structure.
//!
//! Three implementations ship with the crate:
//!
//! - [`CommandAnnotator`]: runs an external annotator program (e.g. a spaCy
//!   script) as a subprocess and reads JSON from its stdout
//! - [`FixtureAnnotator`]: pre-computed annotations keyed by exact text
//! - [`RuleAnnotator`]: a deterministic pattern-based stand-in, used when no
//!   external annotator is configured
//!
//! The JSON shape matches what a spaCy `Doc` exports with the field names
//! below, so a ten-line Python wrapper is enough to plug in a real parser.

pub mod command;
pub mod fixture;
pub mod rules;

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use command::CommandAnnotator;
pub use fixture::FixtureAnnotator;
pub use rules::RuleAnnotator;

/// Errors raised by an annotator
#[derive(Debug, Error)]
pub enum AnnotateError {
    #[error("failed to spawn annotator '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("annotator '{command}' I/O failure: {source}")]
    Io {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("annotator '{command}' exited with code {code}: {stderr}")]
    Failed {
        command: String,
        code: i32,
        stderr: String,
    },

    #[error("annotator '{command}' produced invalid output: {source}")]
    InvalidOutput {
        command: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("no fixture annotation for text: {preview:?}")]
    MissingFixture { preview: String },
}

/// A component that turns raw text into tokens and entities.
///
/// Implementations must be safe to call from several threads at once; the
/// engine treats them as read-only after construction.
pub trait Annotator: Send + Sync {
    /// Human-readable annotator name (for logs)
    fn name(&self) -> &str;

    /// Annotate a block of text
    fn annotate(&self, text: &str) -> Result<Annotation, AnnotateError>;
}

/// Full annotation of one text block
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    #[serde(default)]
    pub entities: Vec<Entity>,
    #[serde(default)]
    pub tokens: Vec<Token>,
}

impl Annotation {
    /// Token at index `i`, if the index is valid
    pub fn token(&self, i: usize) -> Option<&Token> {
        self.tokens.get(i)
    }

    /// Children of token `i` in dependency order, skipping dangling refs
    pub fn children(&self, i: usize) -> impl Iterator<Item = (usize, &Token)> + '_ {
        self.tokens
            .get(i)
            .map(|t| t.children.as_slice())
            .unwrap_or(&[])
            .iter()
            .filter_map(move |&c| self.tokens.get(c).map(|t| (c, t)))
    }

    /// Head of token `i`, or `None` for a root (head points at itself)
    pub fn head(&self, i: usize) -> Option<&Token> {
        let token = self.tokens.get(i)?;
        if token.head == i {
            None
        } else {
            self.tokens.get(token.head)
        }
    }
}

/// A named entity span. Offsets are character (not byte) offsets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub label: EntityLabel,
    pub text: String,
    pub start: usize,
    pub end: usize,
}

/// A single token with its syntactic attachments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub text: String,
    pub lemma: String,
    pub pos: PosTag,
    pub dep: DepRel,
    /// Index of the head token; equal to the token's own index at the root
    pub head: usize,
    #[serde(default)]
    pub children: Vec<usize>,
    /// Character offset of the token in the annotated text
    pub idx: usize,
}

impl Token {
    /// Character offset one past the token's last character
    pub fn end(&self) -> usize {
        self.idx + self.text.chars().count()
    }
}

// ============================================================================
// Label vocabularies
// ============================================================================

/// Declares a string-backed enum with an `Other` catch-all, so labels a real
/// annotator emits that we do not care about still deserialize.
macro_rules! label_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $tag:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(from = "String", into = "String")]
        pub enum $name {
            $($variant,)+
            Other(String),
        }

        impl $name {
            pub fn as_str(&self) -> &str {
                match self {
                    $($name::$variant => $tag,)+
                    $name::Other(s) => s.as_str(),
                }
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                match s.as_str() {
                    $($tag => $name::$variant,)+
                    _ => $name::Other(s),
                }
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                $name::from(s.to_string())
            }
        }

        impl From<$name> for String {
            fn from(v: $name) -> String {
                v.as_str().to_string()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

label_enum! {
    /// Named-entity label (OntoNotes names)
    EntityLabel {
        Money => "MONEY",
        Cardinal => "CARDINAL",
        Quantity => "QUANTITY",
        Percent => "PERCENT",
        Date => "DATE",
        Time => "TIME",
    }
}

label_enum! {
    /// Universal part-of-speech tag
    PosTag {
        Verb => "VERB",
        Aux => "AUX",
        Noun => "NOUN",
        Propn => "PROPN",
        Pron => "PRON",
        Det => "DET",
        Adp => "ADP",
        Adj => "ADJ",
        Adv => "ADV",
        Num => "NUM",
        Cconj => "CCONJ",
        Part => "PART",
        Punct => "PUNCT",
        Sym => "SYM",
    }
}

label_enum! {
    /// Dependency relation (ClearNLP labels as used by spaCy English models)
    DepRel {
        Root => "ROOT",
        Nsubj => "nsubj",
        NsubjPass => "nsubjpass",
        Dobj => "dobj",
        Attr => "attr",
        Acomp => "acomp",
        Prep => "prep",
        Pobj => "pobj",
        Aux => "aux",
        AuxPass => "auxpass",
        Advmod => "advmod",
        Det => "det",
        Compound => "compound",
        Nummod => "nummod",
        Punct => "punct",
        Dep => "dep",
    }
}
