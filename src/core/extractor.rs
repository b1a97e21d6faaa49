//! Anchor extraction from annotated response text.
//!
//! Numeric and date anchors come straight from named entities. Claim anchors
//! come from assertive verbs that have both a subject and an object among
//! their dependents. Hedged clauses never produce claims: a hedge is not a
//! falsifiable commitment.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::annotate::{AnnotateError, Annotation, Annotator, DepRel, EntityLabel, PosTag, Token};
use crate::domain::{Anchor, ClaimTriple, Span};

/// Verb forms whose clauses are treated as factual assertions
pub const ASSERTIVE_VERBS: &[&str] = &[
    "be", "is", "are", "was", "were", "cost", "costs", "include", "includes", "included",
    "offer", "offers", "offered", "release", "released", "releases", "announce", "announced",
    "acquire", "acquired", "buy", "bought", "sell", "sold", "win", "won", "lose", "lost",
    "found", "founded", "locate", "located",
];

/// Words marking a statement as uncertain
pub const HEDGING_VERBS: &[&str] = &[
    "may", "might", "could", "can", "appears", "seems", "suggests", "estimated", "likely",
    "possibly", "probably",
];

/// Turns a response into anchors using an injected annotator
#[derive(Clone)]
pub struct AnchorExtractor {
    annotator: Arc<dyn Annotator>,
}

impl AnchorExtractor {
    pub fn new(annotator: Arc<dyn Annotator>) -> Self {
        Self { annotator }
    }

    pub fn annotator_name(&self) -> &str {
        self.annotator.name()
    }

    /// Annotate `text` and extract its anchors in document order
    pub fn extract(&self, text: &str) -> Result<Vec<Anchor>, AnnotateError> {
        let annotation = self.annotator.annotate(text).map_err(|e| {
            warn!(annotator = self.annotator.name(), error = %e, "annotation failed");
            e
        })?;
        let anchors = anchors_from_annotation(&annotation);
        debug!(
            annotator = self.annotator.name(),
            anchors = anchors.len(),
            "extracted anchors"
        );
        Ok(anchors)
    }
}

/// Extract anchors from an existing annotation.
///
/// No deduplication is done; overlapping spans are kept. Anchors are sorted
/// by span start, ties keeping entity-before-claim order.
pub fn anchors_from_annotation(annotation: &Annotation) -> Vec<Anchor> {
    let mut anchors: Vec<Anchor> = annotation
        .entities
        .iter()
        .filter_map(|entity| {
            let span = Span::new(entity.start, entity.end);
            match entity.label {
                EntityLabel::Money
                | EntityLabel::Cardinal
                | EntityLabel::Quantity
                | EntityLabel::Percent => Some(Anchor::numeric(entity.text.clone(), span)),
                EntityLabel::Date | EntityLabel::Time => Some(Anchor::date(entity.text.clone(), span)),
                EntityLabel::Other(_) => None,
            }
        })
        .collect();

    anchors.extend(
        (0..annotation.tokens.len()).filter_map(|i| claim_at(annotation, i)),
    );

    anchors.sort_by_key(|a| a.span().start);
    anchors
}

fn mentions_hedge(token: &Token) -> bool {
    let text = token.text.to_lowercase();
    let lemma = token.lemma.to_lowercase();
    HEDGING_VERBS.contains(&text.as_str()) || HEDGING_VERBS.contains(&lemma.as_str())
}

/// A verb is hedged when it, one of its dependents, or its head is a hedge
fn is_hedged(annotation: &Annotation, i: usize, verb: &Token) -> bool {
    mentions_hedge(verb)
        || annotation.children(i).any(|(_, child)| mentions_hedge(child))
        || annotation.head(i).is_some_and(mentions_hedge)
}

fn claim_at(annotation: &Annotation, i: usize) -> Option<Anchor> {
    let verb = annotation.token(i)?;
    if verb.pos != PosTag::Verb {
        return None;
    }
    if !ASSERTIVE_VERBS.contains(&verb.lemma.to_lowercase().as_str()) {
        return None;
    }
    if is_hedged(annotation, i, verb) {
        return None;
    }

    let subject = annotation
        .children(i)
        .find(|(_, t)| matches!(t.dep, DepRel::Nsubj | DepRel::NsubjPass))
        .map(|(_, t)| t)?;

    let object = annotation
        .children(i)
        .find(|(_, t)| matches!(t.dep, DepRel::Dobj | DepRel::Attr | DepRel::Acomp))
        .map(|(_, t)| t)
        .or_else(|| {
            annotation
                .children(i)
                .filter(|(_, t)| t.dep == DepRel::Prep)
                .find_map(|(p, _)| {
                    annotation
                        .children(p)
                        .find(|(_, t)| t.dep == DepRel::Pobj)
                        .map(|(_, t)| t)
                })
        })?;

    let triple = ClaimTriple {
        subject: subject.text.clone(),
        verb: verb.text.clone(),
        object: object.text.clone(),
    };
    Some(Anchor::claim(triple, Span::new(subject.idx, object.end())))
}
