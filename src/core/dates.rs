//! Date anchor matching.
//!
//! Strategies are tried in order, cheapest and strictest first:
//!
//! 1. **Literal**: the anchor text appears verbatim in context
//! 2. **Normalized**: equal after stripping ordinal suffixes and commas
//! 3. **Month/day**: the anchor names a month and a day, and context carries
//!    the same `MM-DD` or `MM/DD`
//! 4. **Years**: every 4-digit year in the anchor appears in context
//!
//! All inputs are expected to be lowercased already.

use std::sync::LazyLock;

use regex::Regex;

static ORDINAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d+)(?:st|nd|rd|th)\b").expect("valid ordinal pattern"));

static MONTH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*\b")
        .expect("valid month pattern")
});

static DAY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{1,2})\b").expect("valid day pattern"));

static YEAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(?:19|20)\d{2}\b").expect("valid year pattern"));

const MONTHS: &[(&str, &str, u32)] = &[
    ("jan", "january", 1),
    ("feb", "february", 2),
    ("mar", "march", 3),
    ("apr", "april", 4),
    ("may", "may", 5),
    ("jun", "june", 6),
    ("jul", "july", 7),
    ("aug", "august", 8),
    ("sep", "september", 9),
    ("oct", "october", 10),
    ("nov", "november", 11),
    ("dec", "december", 12),
];

/// Which strategy supported a date anchor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateStrategy {
    Literal,
    Normalized,
    MonthDay,
    Years,
}

impl DateStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            DateStrategy::Literal => "literal match",
            DateStrategy::Normalized => "match after ordinal/comma normalization",
            DateStrategy::MonthDay => "month/day match",
            DateStrategy::Years => "year match",
        }
    }
}

/// Strip ordinal suffixes ("5th" → "5") and commas
pub fn normalize_date(text: &str) -> String {
    ORDINAL_RE.replace_all(text, "$1").replace(',', "")
}

/// Month number (1–12) for a full or 3-letter month name
pub fn month_number(word: &str) -> Option<u32> {
    MONTHS
        .iter()
        .find(|(abbr, full, _)| word == *abbr || word == *full || (word.len() > 3 && full.starts_with(word)))
        .map(|(_, _, n)| *n)
}

/// Month and day named in the anchor, e.g. "march 5th" → (3, 5)
pub fn month_day(anchor: &str) -> Option<(u32, u32)> {
    let normalized = normalize_date(anchor);
    let month = MONTH_RE
        .captures_iter(&normalized)
        .find_map(|c| month_number(c.get(0)?.as_str()))?;
    let day = DAY_RE
        .captures_iter(&normalized)
        .filter_map(|c| c.get(1)?.as_str().parse::<u32>().ok())
        .find(|d| (1..=31).contains(d))?;
    Some((month, day))
}

/// All 4-digit years (19xx / 20xx) in the text
pub fn years(text: &str) -> Vec<&str> {
    YEAR_RE.find_iter(text).map(|m| m.as_str()).collect()
}

/// Find the first strategy under which `anchor` is supported by `context`
pub fn match_date(anchor: &str, context: &str) -> Option<DateStrategy> {
    if anchor.is_empty() {
        return None;
    }
    if context.contains(anchor) {
        return Some(DateStrategy::Literal);
    }

    let normalized_anchor = normalize_date(anchor);
    if !normalized_anchor.trim().is_empty() && normalize_date(context).contains(&normalized_anchor)
    {
        return Some(DateStrategy::Normalized);
    }

    if let Some((month, day)) = month_day(anchor) {
        let dashed = format!("{month:02}-{day:02}");
        let slashed = format!("{month:02}/{day:02}");
        if context.contains(&dashed) || context.contains(&slashed) {
            return Some(DateStrategy::MonthDay);
        }
    }

    let anchor_years = years(anchor);
    if !anchor_years.is_empty() && anchor_years.iter().all(|y| context.contains(y)) {
        return Some(DateStrategy::Years);
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal() {
        assert_eq!(
            match_date("march 2021", "launched in march 2021 worldwide"),
            Some(DateStrategy::Literal)
        );
    }

    #[test]
    fn test_ordinals_and_commas() {
        assert_eq!(
            match_date("march 5th, 2021", "released on march 5 2021."),
            Some(DateStrategy::Normalized)
        );
        assert_eq!(normalize_date("june 1st, 2020"), "june 1 2020");
    }

    #[test]
    fn test_month_day_against_iso() {
        assert_eq!(
            match_date("march 5th", "the filing is dated 2021-03-05."),
            Some(DateStrategy::MonthDay)
        );
        assert_eq!(
            match_date("sept 9", "scheduled for 09/09 this year"),
            Some(DateStrategy::MonthDay)
        );
    }

    #[test]
    fn test_year_subset() {
        assert_eq!(
            match_date("early 2019", "the company was founded in 2019."),
            Some(DateStrategy::Years)
        );
        // Every year must appear
        assert_eq!(match_date("1999 to 2004", "from 1999 onwards"), None);
    }

    #[test]
    fn test_no_year_means_no_year_rule() {
        assert_eq!(match_date("last tuesday", "the meeting in 2020"), None);
    }

    #[test]
    fn test_unsupported() {
        assert_eq!(match_date("april 1st, 2022", "founded on march 3, 2020"), None);
        assert_eq!(match_date("", "anything"), None);
    }

    #[test]
    fn test_month_lookup() {
        assert_eq!(month_number("jan"), Some(1));
        assert_eq!(month_number("september"), Some(9));
        assert_eq!(month_number("sept"), Some(9));
        assert_eq!(month_number("maybe"), None);
        assert_eq!(month_day("december 31st, 1999"), Some((12, 31)));
        assert_eq!(month_day("2021"), None);
    }
}
