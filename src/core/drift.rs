//! Topic drift and n-gram overlap.
//!
//! Both signals work on lowercased word tokens. Punctuation is dropped so a
//! shared full stop cannot mask a wholesale change of topic. Tokenizers
//! that emit punctuation tokens report higher overlap on short sentences,
//! so ratios here run lower than theirs.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

static WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\w+(?:[.,'’]\w+)*").expect("valid word pattern"));

/// Lowercased word tokens of `text`, in order
pub fn word_tokens(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    WORD_RE
        .find_iter(&lower)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Fraction of the response's unigrams that also occur in the context, or
/// `None` when the response has no unigrams
pub fn overlap_ratio(response: &str, context: &str) -> Option<f64> {
    let response_terms: HashSet<String> = word_tokens(response).into_iter().collect();
    if response_terms.is_empty() {
        return None;
    }
    let context_terms: HashSet<String> = word_tokens(context).into_iter().collect();
    let shared = response_terms.intersection(&context_terms).count();
    Some(shared as f64 / response_terms.len() as f64)
}

/// Fixed-penalty drift score: `penalty` when the unigram overlap falls below
/// `threshold`, otherwise 0. A response with no unigrams scores 0.
pub fn drift_score(response: &str, context: &str, threshold: f64, penalty: f64) -> f64 {
    match overlap_ratio(response, context) {
        Some(ratio) if ratio < threshold => penalty,
        _ => 0.0,
    }
}

fn ngrams(tokens: &[String], n: usize) -> HashSet<Vec<String>> {
    if n == 0 || tokens.len() < n {
        return HashSet::new();
    }
    tokens.windows(n).map(|w| w.to_vec()).collect()
}

/// N-gram hallucination score: `1 - |shared n-grams| / |response n-grams|`.
///
/// A response too short to form a single n-gram scores 0 when it appears
/// verbatim (case-insensitive) in the context, 1 otherwise.
pub fn ngram_score(response: &str, context: &str, n: usize) -> f64 {
    let response_grams = ngrams(&word_tokens(response), n);
    if response_grams.is_empty() {
        let found = context.to_lowercase().contains(&response.trim().to_lowercase());
        return if found { 0.0 } else { 1.0 };
    }
    let context_grams = ngrams(&word_tokens(context), n);
    let shared = response_grams.intersection(&context_grams).count();
    1.0 - shared as f64 / response_grams.len() as f64
}
