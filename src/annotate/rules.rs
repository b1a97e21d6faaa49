//! Deterministic pattern-based annotator.
//!
//! This is a stand-in for a statistical parser, good enough for short,
//! declarative answer sentences:
//!
//! - **Entities**: regex recognition of MONEY, PERCENT, DATE, TIME, QUANTITY
//!   and CARDINAL spans, earlier labels winning on overlap
//! - **POS**: closed-class word lists plus a small verb lexicon; everything
//!   else is a noun (capitalized → proper noun)
//! - **Dependencies**: noun-phrase chunking and one shallow attachment pass
//!   per predicate (subject chunk on the left, object or prepositional
//!   object chunk on the right)
//!
//! It never fails. Text it cannot analyse simply yields fewer relations.

use std::sync::LazyLock;

use regex::Regex;

use super::{AnnotateError, Annotation, Annotator, DepRel, Entity, EntityLabel, PosTag, Token};

static TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\d+(?:[.,]\d+)*|\p{L}+(?:['’]\p{L}+)*|\S").expect("valid token pattern")
});

/// Entity patterns in priority order: an earlier label claims a span first.
static ENTITY_PATTERNS: LazyLock<Vec<(EntityLabel, Regex)>> = LazyLock::new(|| {
    let num = r"(?:\d{1,3}(?:,\d{3})+(?:\.\d+)?|\d+(?:\.\d+)?)";
    let scale = r"(?:\s?(?:k|m|b|bn)\b|\s(?:thousand|million|billion|trillion)\b)";
    let month = r"(?:jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?|aug(?:ust)?|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?)";
    let ord = r"(?:st|nd|rd|th)?";

    let specs = [
        (
            EntityLabel::Money,
            format!(r"(?i)[$€£]\s?{num}{scale}?|\b{num}{scale}?\s?(?:dollars|usd|euros|eur|pounds)\b"),
        ),
        (
            EntityLabel::Percent,
            format!(r"(?i)\b{num}\s?(?:%|percent\b|per cent\b)"),
        ),
        (
            EntityLabel::Date,
            format!(
                "(?i){}",
                [
                    format!(r"\b{month}\.?\s+\d{{1,2}}{ord}(?:,?\s+\d{{4}})?\b"),
                    format!(r"\b\d{{1,2}}{ord}\s+(?:of\s+)?{month}\b(?:,?\s+\d{{4}})?"),
                    format!(r"\b{month}\.?,?\s+\d{{4}}\b"),
                    r"\b\d{4}-\d{1,2}-\d{1,2}\b".to_string(),
                    r"\b\d{1,2}/\d{1,2}(?:/\d{2,4})?\b".to_string(),
                    format!(r"\b{num}\s(?:days?|weeks?|months?|years?)(?:\s+ago)?\b"),
                    r"\b(?:19|20)\d{2}s?\b".to_string(),
                ]
                .join("|")
            ),
        ),
        (
            EntityLabel::Time,
            format!(r"(?i)\b\d{{1,2}}:\d{{2}}(?:\s?(?:am|pm))?\b|\b\d{{1,2}}\s?(?:am|pm)\b|\b{num}\s(?:hours?|minutes?|seconds?)\b"),
        ),
        (
            EntityLabel::Quantity,
            format!(r"(?i)\b{num}\s?(?:km|kilometers?|kilometres?|miles?|meters?|metres?|kg|kilograms?|grams?|lbs?|tons?|tonnes?|liters?|litres?|gallons?|feet|foot|ft|inches|cm|mm|mph|gb|mb|tb)\b"),
        ),
        (EntityLabel::Cardinal, format!(r"(?i)\b{num}{scale}?")),
    ];

    specs
        .into_iter()
        .map(|(label, pattern)| {
            let re = Regex::new(&pattern).expect("valid entity pattern");
            (label, re)
        })
        .collect()
});

const DETERMINERS: &[&str] = &[
    "the", "a", "an", "this", "that", "these", "those", "its", "their", "his", "her", "our",
    "my", "your", "some", "any", "each", "every", "no", "all", "both",
];

const PRONOUNS: &[&str] = &[
    "i", "you", "he", "she", "it", "we", "they", "me", "him", "us", "them", "who", "which",
    "what",
];

const PREPOSITIONS: &[&str] = &[
    "in", "on", "at", "by", "for", "with", "from", "to", "of", "into", "over", "under", "about",
    "after", "before", "during", "since", "until", "between", "through", "per", "around",
    "across", "near", "against", "via", "than", "among", "within", "without",
];

const CONJUNCTIONS: &[&str] = &["and", "or", "but", "nor", "so", "yet"];

const AUXILIARIES: &[(&str, &str)] = &[
    ("be", "be"),
    ("is", "be"),
    ("are", "be"),
    ("was", "be"),
    ("were", "be"),
    ("been", "be"),
    ("being", "be"),
    ("am", "be"),
    ("has", "have"),
    ("have", "have"),
    ("had", "have"),
    ("do", "do"),
    ("does", "do"),
    ("did", "do"),
    ("will", "will"),
    ("would", "would"),
    ("shall", "shall"),
    ("should", "should"),
    ("may", "may"),
    ("might", "might"),
    ("can", "can"),
    ("could", "could"),
    ("must", "must"),
];

const ADVERBS: &[&str] = &[
    "also", "very", "just", "still", "already", "now", "then", "often", "never", "recently",
    "nearly", "almost", "roughly", "approximately", "possibly", "probably", "likely",
    "reportedly", "only", "even", "soon", "later",
];

/// Words ending in -ly that are not adverbs
const LY_NOUNS: &[&str] = &[
    "supply", "family", "reply", "apply", "rally", "assembly", "italy", "july", "monopoly",
    "butterfly", "ally", "anomaly",
];

const VERBS: &[(&str, &str)] = &[
    ("release", "release"),
    ("releases", "release"),
    ("released", "release"),
    ("announce", "announce"),
    ("announces", "announce"),
    ("announced", "announce"),
    ("acquire", "acquire"),
    ("acquires", "acquire"),
    ("acquired", "acquire"),
    ("buy", "buy"),
    ("buys", "buy"),
    ("bought", "buy"),
    ("sell", "sell"),
    ("sells", "sell"),
    ("sold", "sell"),
    ("win", "win"),
    ("wins", "win"),
    ("won", "win"),
    ("lose", "lose"),
    ("loses", "lose"),
    ("lost", "lose"),
    ("found", "found"),
    ("founds", "found"),
    ("founded", "found"),
    ("locate", "locate"),
    ("located", "locate"),
    ("cost", "cost"),
    ("costs", "cost"),
    ("include", "include"),
    ("includes", "include"),
    ("included", "include"),
    ("offer", "offer"),
    ("offers", "offer"),
    ("offered", "offer"),
    ("launch", "launch"),
    ("launches", "launch"),
    ("launched", "launch"),
    ("reported", "report"),
    ("reports", "report"),
    ("appear", "appear"),
    ("appears", "appear"),
    ("appeared", "appear"),
    ("seem", "seem"),
    ("seems", "seem"),
    ("seemed", "seem"),
    ("suggest", "suggest"),
    ("suggests", "suggest"),
    ("suggested", "suggest"),
    ("estimates", "estimate"),
    ("estimated", "estimate"),
    ("make", "make"),
    ("makes", "make"),
    ("made", "make"),
    ("reach", "reach"),
    ("reached", "reach"),
    ("reaches", "reach"),
    ("grew", "grow"),
    ("grows", "grow"),
    ("grown", "grow"),
    ("increased", "increase"),
    ("increases", "increase"),
    ("declined", "decline"),
    ("fell", "fall"),
    ("rose", "rise"),
    ("raised", "raise"),
    ("raises", "raise"),
    ("hired", "hire"),
    ("hires", "hire"),
    ("employs", "employ"),
    ("employed", "employ"),
    ("owns", "own"),
    ("owned", "own"),
    ("opened", "open"),
    ("opens", "open"),
    ("built", "build"),
    ("builds", "build"),
    ("created", "create"),
    ("creates", "create"),
    ("developed", "develop"),
    ("develops", "develop"),
    ("produced", "produce"),
    ("produces", "produce"),
    ("signed", "sign"),
    ("held", "hold"),
    ("holds", "hold"),
    ("led", "lead"),
    ("said", "say"),
    ("says", "say"),
    ("became", "become"),
    ("becomes", "become"),
    ("paid", "pay"),
    ("pays", "pay"),
    ("spent", "spend"),
];

const IRREGULAR_PARTICIPLES: &[&str] = &[
    "sold", "bought", "won", "lost", "found", "built", "made", "held", "led", "said", "grown",
    "paid", "spent",
];

const SENTENCE_END: &[&str] = &[".", "!", "?", ";"];

fn lookup(table: &[(&'static str, &'static str)], word: &str) -> Option<&'static str> {
    table.iter().find(|(form, _)| *form == word).map(|(_, lemma)| *lemma)
}

/// Pattern-based annotator; see module docs
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleAnnotator;

impl RuleAnnotator {
    pub fn new() -> Self {
        Self
    }
}

impl Annotator for RuleAnnotator {
    fn name(&self) -> &str {
        "rules"
    }

    fn annotate(&self, text: &str) -> Result<Annotation, AnnotateError> {
        let offsets = CharOffsets::new(text);
        Ok(Annotation {
            entities: recognize_entities(text, &offsets),
            tokens: parse_tokens(text, &offsets),
        })
    }
}

/// Byte → character offset conversion for one text
struct CharOffsets {
    boundaries: Vec<usize>,
}

impl CharOffsets {
    fn new(text: &str) -> Self {
        Self {
            boundaries: text.char_indices().map(|(b, _)| b).collect(),
        }
    }

    fn char_at(&self, byte: usize) -> usize {
        self.boundaries.partition_point(|&b| b < byte)
    }
}

fn recognize_entities(text: &str, offsets: &CharOffsets) -> Vec<Entity> {
    let mut claimed: Vec<(usize, usize, EntityLabel)> = Vec::new();

    for (label, re) in ENTITY_PATTERNS.iter() {
        for m in re.find_iter(text) {
            let (start, end) = (m.start(), m.end());
            let overlaps = claimed.iter().any(|(s, e, _)| start < *e && *s < end);
            if !overlaps {
                claimed.push((start, end, label.clone()));
            }
        }
    }

    claimed.sort_by_key(|(start, _, _)| *start);
    claimed
        .into_iter()
        .map(|(start, end, label)| Entity {
            label,
            text: text[start..end].to_string(),
            start: offsets.char_at(start),
            end: offsets.char_at(end),
        })
        .collect()
}

// ============================================================================
// Tokens, tags and shallow dependencies
// ============================================================================

fn tag(word: &str, lower: &str, prev: Option<&PosTag>) -> (PosTag, String) {
    let first = word.chars().next().unwrap_or(' ');

    if first.is_ascii_digit() {
        return (PosTag::Num, lower.to_string());
    }
    if !first.is_alphanumeric() {
        let pos = match word {
            "$" | "€" | "£" | "%" => PosTag::Sym,
            _ => PosTag::Punct,
        };
        return (pos, word.to_string());
    }
    if DETERMINERS.contains(&lower) {
        return (PosTag::Det, lower.to_string());
    }
    if PRONOUNS.contains(&lower) {
        return (PosTag::Pron, lower.to_string());
    }
    if PREPOSITIONS.contains(&lower) {
        return (PosTag::Adp, lower.to_string());
    }
    if CONJUNCTIONS.contains(&lower) {
        return (PosTag::Cconj, lower.to_string());
    }
    if lower == "not" || lower == "n't" {
        return (PosTag::Part, "not".to_string());
    }
    if let Some(lemma) = lookup(AUXILIARIES, lower) {
        return (PosTag::Aux, lemma.to_string());
    }
    if ADVERBS.contains(&lower)
        || (lower.len() > 4 && lower.ends_with("ly") && !LY_NOUNS.contains(&lower))
    {
        return (PosTag::Adv, lower.to_string());
    }
    if let Some(lemma) = lookup(VERBS, lower) {
        // "the costs", "of sales": a verb form right after a determiner,
        // preposition or number is read as a noun
        let nominal_context = matches!(
            prev,
            Some(PosTag::Det) | Some(PosTag::Adp) | Some(PosTag::Num) | Some(PosTag::Sym)
        );
        if !nominal_context {
            return (PosTag::Verb, lemma.to_string());
        }
    }
    if first.is_uppercase() {
        (PosTag::Propn, lower.to_string())
    } else {
        (PosTag::Noun, lower.to_string())
    }
}

fn is_nominal(pos: &PosTag) -> bool {
    matches!(
        pos,
        PosTag::Det | PosTag::Noun | PosTag::Propn | PosTag::Num | PosTag::Sym | PosTag::Adj
    )
}

fn is_participle(lower: &str) -> bool {
    lower.ends_with("ed") || IRREGULAR_PARTICIPLES.contains(&lower)
}

/// A noun-phrase chunk `[start, end)` with its head token
#[derive(Debug, Clone, Copy)]
struct Chunk {
    start: usize,
    end: usize,
    head: usize,
}

struct Parser {
    tokens: Vec<Token>,
}

impl Parser {
    fn attach(&mut self, child: usize, head: usize, dep: DepRel) {
        self.tokens[child].head = head;
        self.tokens[child].dep = dep;
    }

    fn is_attached(&self, i: usize) -> bool {
        self.tokens[i].head != i
    }

    fn lower(&self, i: usize) -> String {
        self.tokens[i].text.to_lowercase()
    }

    fn chunks(&mut self, start: usize, end: usize) -> Vec<Chunk> {
        let mut chunks = Vec::new();
        let mut i = start;
        while i < end {
            let pos = self.tokens[i].pos.clone();
            if pos == PosTag::Pron {
                chunks.push(Chunk { start: i, end: i + 1, head: i });
                i += 1;
                continue;
            }
            if !is_nominal(&pos) {
                i += 1;
                continue;
            }

            let run_start = i;
            while i < end && is_nominal(&self.tokens[i].pos) {
                i += 1;
            }
            let run = run_start..i;
            let head = run
                .clone()
                .rev()
                .find(|&j| matches!(self.tokens[j].pos, PosTag::Noun | PosTag::Propn))
                .or_else(|| run.clone().rev().find(|&j| self.tokens[j].pos == PosTag::Num))
                .unwrap_or(i - 1);

            for j in run.clone().filter(|&j| j != head) {
                let dep = match self.tokens[j].pos {
                    PosTag::Det => DepRel::Det,
                    PosTag::Num => DepRel::Nummod,
                    PosTag::Noun | PosTag::Propn => DepRel::Compound,
                    _ => DepRel::Dep,
                };
                self.attach(j, head, dep);
            }
            chunks.push(Chunk { start: run_start, end: i, head });
        }
        chunks
    }

    /// Attach the auxiliary/adverb group in front of predicate `p`; returns
    /// the group's first index and whether it makes `p` passive.
    fn attach_group(&mut self, p: usize, floor: usize) -> (usize, bool) {
        let mut g = p;
        while g > floor
            && matches!(self.tokens[g - 1].pos, PosTag::Aux | PosTag::Adv | PosTag::Part)
            && !self.is_attached(g - 1)
        {
            g -= 1;
        }

        let passive = self.tokens[p].pos == PosTag::Verb
            && is_participle(&self.lower(p))
            && (g..p).any(|j| self.tokens[j].pos == PosTag::Aux && self.tokens[j].lemma == "be");

        for j in g..p {
            let dep = match self.tokens[j].pos {
                PosTag::Aux if passive && self.tokens[j].lemma == "be" => DepRel::AuxPass,
                PosTag::Aux => DepRel::Aux,
                PosTag::Part => DepRel::Other("neg".to_string()),
                _ => DepRel::Advmod,
            };
            self.attach(j, p, dep);
        }
        (g, passive)
    }

    fn attach_arguments(&mut self, p: usize, group_start: usize, passive: bool, chunks: &[Chunk]) {
        if let Some(subject) = chunks.iter().find(|c| c.end == group_start) {
            if !self.is_attached(subject.head) {
                let dep = if passive { DepRel::NsubjPass } else { DepRel::Nsubj };
                self.attach(subject.head, p, dep);
            }
        }

        let end = self.tokens.len();
        let mut k = p + 1;
        while k < end && self.tokens[k].pos == PosTag::Adv && !self.is_attached(k) {
            self.attach(k, p, DepRel::Advmod);
            k += 1;
        }

        let starting_at = |k: usize| chunks.iter().find(|c| c.start == k).copied();

        if let Some(object) = starting_at(k) {
            if !self.is_attached(object.head) {
                let dep = if self.tokens[p].pos == PosTag::Verb {
                    DepRel::Dobj
                } else {
                    DepRel::Attr
                };
                self.attach(object.head, p, dep);
            }
            k = object.end;
        }

        if k < end && self.tokens[k].pos == PosTag::Adp && !self.is_attached(k) {
            if let Some(pobj) = starting_at(k + 1) {
                self.attach(k, p, DepRel::Prep);
                if !self.is_attached(pobj.head) {
                    self.attach(pobj.head, k, DepRel::Pobj);
                }
            }
        }
    }

    fn parse_sentence(&mut self, start: usize, end: usize) {
        let chunks = self.chunks(start, end);
        let mut predicates = Vec::new();

        // Lexical verbs absorb the auxiliaries in front of them
        for p in start..end {
            if self.tokens[p].pos == PosTag::Verb {
                let (g, passive) = self.attach_group(p, start);
                predicates.push((p, g, passive));
            }
        }

        // Remaining auxiliaries act as copular predicates ("price is $150");
        // within a run of them the last one heads the group
        let mut i = start;
        while i < end {
            if self.tokens[i].pos == PosTag::Aux && !self.is_attached(i) {
                let mut j = i;
                while j + 1 < end
                    && matches!(self.tokens[j + 1].pos, PosTag::Aux | PosTag::Adv | PosTag::Part)
                    && !self.is_attached(j + 1)
                {
                    j += 1;
                }
                let p = (i..=j)
                    .rev()
                    .find(|&x| self.tokens[x].pos == PosTag::Aux)
                    .unwrap_or(i);
                let (g, passive) = self.attach_group(p, start);
                for x in p + 1..=j {
                    self.attach(x, p, DepRel::Advmod);
                }
                predicates.push((p, g, passive));
                i = j + 1;
            } else {
                i += 1;
            }
        }

        predicates.sort_by_key(|(p, _, _)| *p);
        for &(p, g, passive) in &predicates {
            self.attach_arguments(p, g, passive, &chunks);
        }
        if let Some(&(root, _, _)) = predicates.first() {
            if !self.is_attached(root) {
                self.tokens[root].dep = DepRel::Root;
            }
        }
        for x in start..end {
            if SENTENCE_END.contains(&self.tokens[x].text.as_str()) && !self.is_attached(x) {
                if let Some(&(root, _, _)) = predicates.first() {
                    self.attach(x, root, DepRel::Punct);
                }
            }
        }
    }

    fn finish(mut self) -> Vec<Token> {
        for i in 0..self.tokens.len() {
            let head = self.tokens[i].head;
            if head != i {
                self.tokens[head].children.push(i);
            }
        }
        self.tokens
    }
}

fn parse_tokens(text: &str, offsets: &CharOffsets) -> Vec<Token> {
    let mut tokens: Vec<Token> = Vec::new();
    for m in TOKEN_RE.find_iter(text) {
        let word = m.as_str();
        let lower = word.to_lowercase();
        let (pos, lemma) = tag(word, &lower, tokens.last().map(|t| &t.pos));
        let i = tokens.len();
        tokens.push(Token {
            text: word.to_string(),
            lemma,
            pos,
            dep: DepRel::Dep,
            head: i,
            children: Vec::new(),
            idx: offsets.char_at(m.start()),
        });
    }

    let mut parser = Parser { tokens };
    let mut start = 0;
    for i in 0..parser.tokens.len() {
        if SENTENCE_END.contains(&parser.tokens[i].text.as_str()) {
            parser.parse_sentence(start, i + 1);
            start = i + 1;
        }
    }
    if start < parser.tokens.len() {
        let end = parser.tokens.len();
        parser.parse_sentence(start, end);
    }
    parser.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn annotate(text: &str) -> Annotation {
        RuleAnnotator::new().annotate(text).unwrap()
    }

    fn entity_texts(annotation: &Annotation) -> Vec<(String, String)> {
        annotation
            .entities
            .iter()
            .map(|e| (e.label.to_string(), e.text.clone()))
            .collect()
    }

    fn find<'a>(annotation: &'a Annotation, text: &str) -> (usize, &'a Token) {
        annotation
            .tokens
            .iter()
            .enumerate()
            .find(|(_, t)| t.text == text)
            .unwrap()
    }

    #[test]
    fn test_money_and_cardinal() {
        let a = annotate("The price is $150 and 50,000 units shipped.");
        assert_eq!(
            entity_texts(&a),
            vec![
                ("MONEY".to_string(), "$150".to_string()),
                ("CARDINAL".to_string(), "50,000".to_string()),
            ]
        );
        assert_eq!(a.entities[0].start, 13);
        assert_eq!(a.entities[0].end, 17);
    }

    #[test]
    fn test_dates_win_over_cardinals() {
        let a = annotate("It launched on March 5th, 2021 at 10:30 am.");
        let labels = entity_texts(&a);
        assert!(labels.contains(&("DATE".to_string(), "March 5th, 2021".to_string())));
        assert!(labels.contains(&("TIME".to_string(), "10:30 am".to_string())));
        assert!(!labels.iter().any(|(l, _)| l == "CARDINAL"));
    }

    #[test]
    fn test_percent_and_scaled_numbers() {
        let a = annotate("Revenue grew 12% to 1 million.");
        let labels = entity_texts(&a);
        assert!(labels.contains(&("PERCENT".to_string(), "12%".to_string())));
        assert!(labels.contains(&("CARDINAL".to_string(), "1 million".to_string())));
    }

    #[test]
    fn test_offsets_are_characters() {
        let a = annotate("Café costs €5.");
        let money = &a.entities[0];
        assert_eq!(money.text, "€5");
        assert_eq!(money.start, 11);
        let (_, cafe) = find(&a, "Café");
        assert_eq!(cafe.end(), 4);
    }

    #[test]
    fn test_active_svo() {
        let a = annotate("Microsoft released the Pixel phone.");
        let (v, verb) = find(&a, "released");
        assert_eq!(verb.pos, PosTag::Verb);
        assert_eq!(verb.lemma, "release");

        let deps: Vec<(&str, DepRel)> = a
            .children(v)
            .map(|(_, t)| (t.text.as_str(), t.dep.clone()))
            .collect();
        assert!(deps.contains(&("Microsoft", DepRel::Nsubj)));
        assert!(deps.contains(&("phone", DepRel::Dobj)));
    }

    #[test]
    fn test_passive_with_prepositional_object() {
        let a = annotate("Google was founded in 1998.");
        let (v, _) = find(&a, "founded");
        let (_, subject) = find(&a, "Google");
        assert_eq!(subject.dep, DepRel::NsubjPass);
        assert_eq!(subject.head, v);

        let (p, prep) = find(&a, "in");
        assert_eq!(prep.dep, DepRel::Prep);
        let (_, year) = find(&a, "1998");
        assert_eq!(year.dep, DepRel::Pobj);
        assert_eq!(year.head, p);
    }

    #[test]
    fn test_copula_is_aux_predicate() {
        let a = annotate("The price is $150.");
        let (c, copula) = find(&a, "is");
        assert_eq!(copula.pos, PosTag::Aux);
        assert_eq!(copula.dep, DepRel::Root);
        let (_, price) = find(&a, "price");
        assert_eq!(price.dep, DepRel::Nsubj);
        assert_eq!(price.head, c);
    }

    #[test]
    fn test_modal_attaches_as_aux() {
        let a = annotate("Google may release a phone.");
        let (v, _) = find(&a, "release");
        let (_, modal) = find(&a, "may");
        assert_eq!(modal.dep, DepRel::Aux);
        assert_eq!(modal.head, v);
    }

    #[test]
    fn test_verb_form_after_determiner_is_noun() {
        let a = annotate("The costs rose.");
        let (_, costs) = find(&a, "costs");
        assert_eq!(costs.pos, PosTag::Noun);
    }

    #[test]
    fn test_children_are_consistent_with_heads() {
        let a = annotate("Apple bought Beats in 2014. The deal cost $3 billion.");
        for (i, token) in a.tokens.iter().enumerate() {
            for &c in &token.children {
                assert_eq!(a.tokens[c].head, i);
            }
        }
    }

    #[test]
    fn test_empty_text() {
        let a = annotate("");
        assert!(a.tokens.is_empty());
        assert!(a.entities.is_empty());
    }
}
