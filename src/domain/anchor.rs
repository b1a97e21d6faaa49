//! Anchors: verifiable facts extracted from a response.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Character-offset range `[start, end)` in the response text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    /// Build a span, ordering the bounds if they arrive reversed
    pub fn new(start: usize, end: usize) -> Self {
        Self {
            start: start.min(end),
            end: start.max(end),
        }
    }
}

/// Anchor category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnchorKind {
    Numeric,
    Date,
    Claim,
}

impl AnchorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnchorKind::Numeric => "numeric",
            AnchorKind::Date => "date",
            AnchorKind::Claim => "claim",
        }
    }
}

impl fmt::Display for AnchorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Subject, verb and object of an assertive clause
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimTriple {
    pub subject: String,
    pub verb: String,
    pub object: String,
}

/// What an anchor asserts. Each variant has exactly one verification rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum Fact {
    /// Lowercased numeric entity text
    Numeric(String),
    /// Lowercased date/time entity text
    Date(String),
    Claim(ClaimTriple),
}

/// A verifiable fact located in the response. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Anchor {
    text: String,
    span: Span,
    #[serde(flatten)]
    fact: Fact,
}

impl Anchor {
    pub fn numeric(text: impl Into<String>, span: Span) -> Self {
        let text = text.into();
        let value = text.to_lowercase();
        Self {
            text,
            span,
            fact: Fact::Numeric(value),
        }
    }

    pub fn date(text: impl Into<String>, span: Span) -> Self {
        let text = text.into();
        let value = text.to_lowercase();
        Self {
            text,
            span,
            fact: Fact::Date(value),
        }
    }

    pub fn claim(triple: ClaimTriple, span: Span) -> Self {
        let text = format!("{} {} {}", triple.subject, triple.verb, triple.object);
        Self {
            text,
            span,
            fact: Fact::Claim(triple),
        }
    }

    /// Text as it appears in the response (claims: "subject verb object")
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn fact(&self) -> &Fact {
        &self.fact
    }

    pub fn kind(&self) -> AnchorKind {
        match self.fact {
            Fact::Numeric(_) => AnchorKind::Numeric,
            Fact::Date(_) => AnchorKind::Date,
            Fact::Claim(_) => AnchorKind::Claim,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_is_lowercased() {
        let anchor = Anchor::date("March 5th", Span::new(10, 19));
        assert_eq!(anchor.text(), "March 5th");
        assert_eq!(anchor.fact(), &Fact::Date("march 5th".to_string()));
        assert_eq!(anchor.kind(), AnchorKind::Date);
    }

    #[test]
    fn test_claim_text() {
        let anchor = Anchor::claim(
            ClaimTriple {
                subject: "Microsoft".into(),
                verb: "released".into(),
                object: "phone".into(),
            },
            Span::new(0, 34),
        );
        assert_eq!(anchor.text(), "Microsoft released phone");
        assert_eq!(anchor.kind(), AnchorKind::Claim);
    }

    #[test]
    fn test_span_orders_bounds() {
        assert_eq!(Span::new(9, 3), Span { start: 3, end: 9 });
    }

    #[test]
    fn test_serialized_shape() {
        let anchor = Anchor::numeric("$150", Span::new(13, 17));
        let json = serde_json::to_value(&anchor).unwrap();
        assert_eq!(json["type"], "numeric");
        assert_eq!(json["value"], "$150");
        assert_eq!(json["text"], "$150");
        assert_eq!(json["span"]["start"], 13);
    }
}
