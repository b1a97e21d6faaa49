//! Numeric normalization and matching.
//!
//! Numbers are compared as floats with an absolute tolerance. That
//! under-tolerates large magnitudes and over-tolerates tiny ones; it is
//! deliberately simple.

use std::sync::LazyLock;

use regex::Regex;

/// Default absolute tolerance for numeric equality
pub const DEFAULT_TOLERANCE: f64 = 0.01;

/// Numeric-looking spans in context text: optional currency, digits with
/// separators, optional magnitude suffix
static CONTEXT_NUMBER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)[$€£]?\s?(?:\d{1,3}(?:,\d{3})+|\d+)(?:\.\d+)?(?:\s?(?:k|m|b|bn)\b|\s(?:thousand|million|billion|trillion)\b)?",
    )
    .expect("valid context number pattern")
});

static PLAIN_NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+(?:\.\d+)?").expect("valid number pattern"));

const MAGNITUDE_WORDS: &[(&str, f64)] = &[
    ("thousand", 1e3),
    ("million", 1e6),
    ("billion", 1e9),
    ("trillion", 1e12),
    ("bn", 1e9),
];

const CURRENCY_WORDS: &[&str] = &["dollars", "usd", "euros", "eur", "pounds"];

/// Parse a numeric-looking string into a canonical value.
///
/// Strips currency symbols (`$`, `€`, `£`), thousands separators and
/// whitespace, then applies a trailing magnitude (`k`, `m`, `b`, or the
/// words thousand/million/billion). Returns `None` when the remainder is not
/// a decimal number; callers fall back to literal comparison.
pub fn normalize(raw: &str) -> Option<f64> {
    let mut s: String = raw
        .to_lowercase()
        .chars()
        .filter(|c| !matches!(c, '$' | '€' | '£' | ',') && !c.is_whitespace())
        .collect();

    for word in CURRENCY_WORDS {
        if let Some(stripped) = s.strip_suffix(word) {
            s = stripped.to_string();
            break;
        }
    }

    let mut multiplier = 1.0;
    if let Some((stripped, factor)) = MAGNITUDE_WORDS
        .iter()
        .find_map(|(word, factor)| s.strip_suffix(word).map(|rest| (rest.to_string(), *factor)))
    {
        s = stripped;
        multiplier = factor;
    } else if let Some(last) = s.chars().last() {
        let factor = match last {
            'k' => Some(1e3),
            'm' => Some(1e6),
            'b' => Some(1e9),
            _ => None,
        };
        if let Some(factor) = factor {
            s.pop();
            multiplier = factor;
        }
    }

    if s.is_empty() || !s.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return None;
    }
    let value: f64 = s.parse().ok()?;
    let value = value * multiplier;
    value.is_finite().then_some(value)
}

/// Whether two normalized values are equal within `tolerance`
pub fn approx_eq(a: f64, b: f64, tolerance: f64) -> bool {
    (a - b).abs() < tolerance
}

/// All parseable numbers found in `text`, in order of appearance
pub fn scan_numbers(text: &str) -> Vec<f64> {
    CONTEXT_NUMBER_RE
        .find_iter(text)
        .filter_map(|m| normalize(m.as_str()))
        .collect()
}

/// The first plain decimal number inside `text` (used for percentages)
pub fn leading_number(text: &str) -> Option<&str> {
    PLAIN_NUMBER_RE.find(text).map(|m| m.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_and_decimal_are_equal() {
        let a = normalize("100").unwrap();
        let b = normalize("100.00").unwrap();
        assert!(approx_eq(a, b, DEFAULT_TOLERANCE));
    }

    #[test]
    fn test_suffixes() {
        assert_eq!(normalize("10k"), Some(10_000.0));
        assert_eq!(normalize("10K"), Some(10_000.0));
        assert_eq!(normalize("$2.5m"), Some(2_500_000.0));
        assert_eq!(normalize("3b"), Some(3_000_000_000.0));
        assert_eq!(normalize("1 million"), Some(1_000_000.0));
        assert_eq!(normalize("$3 billion"), Some(3_000_000_000.0));
    }

    #[test]
    fn test_currency_and_separators() {
        assert_eq!(normalize("$1,234.50"), Some(1234.5));
        assert_eq!(normalize("€ 50,000"), Some(50_000.0));
        assert_eq!(normalize("£7"), Some(7.0));
        assert_eq!(normalize("40 dollars"), Some(40.0));
    }

    #[test]
    fn test_unparseable() {
        assert_eq!(normalize("about"), None);
        assert_eq!(normalize("12%"), None);
        assert_eq!(normalize(""), None);
        assert_eq!(normalize("$"), None);
        assert_eq!(normalize("k"), None);
        assert_eq!(normalize("1.2.3"), None);
    }

    #[test]
    fn test_tolerance_is_absolute() {
        assert!(approx_eq(1_000_000.0, 1_000_000.005, DEFAULT_TOLERANCE));
        assert!(!approx_eq(1_000_000.0, 1_000_000.5, DEFAULT_TOLERANCE));
        assert!(approx_eq(0.001, 0.009, DEFAULT_TOLERANCE));
    }

    #[test]
    fn test_scan_numbers() {
        let found = scan_numbers("the car costs $50,000 and weighs 1.2k kg in 2020.");
        assert_eq!(found, vec![50_000.0, 1_200.0, 2_020.0]);
    }

    #[test]
    fn test_scan_numbers_requires_thousands_groups() {
        assert_eq!(scan_numbers("rows 1,2 and 3"), vec![1.0, 2.0, 3.0]);
        assert_eq!(scan_numbers("1,234,567 units"), vec![1_234_567.0]);
    }

    #[test]
    fn test_leading_number() {
        assert_eq!(leading_number("12.5%"), Some("12.5"));
        assert_eq!(leading_number("%"), None);
    }
}
