//! Subject-verb-object claim matching.
//!
//! A claim counts as supported when its subject and object both occur in
//! the context and some occurrence of each lies within a fixed character
//! window of the other. This is a co-occurrence proxy, not a check of the
//! grammatical relation between them.

/// Default proximity window in characters
pub const DEFAULT_WINDOW: usize = 300;

/// Outcome of matching one claim
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimMatch {
    Supported,
    SubjectMissing,
    ObjectMissing,
    TooFarApart,
}

impl ClaimMatch {
    pub fn is_supported(&self) -> bool {
        matches!(self, ClaimMatch::Supported)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ClaimMatch::Supported => "subject and object co-occur",
            ClaimMatch::SubjectMissing => "subject missing",
            ClaimMatch::ObjectMissing => "object missing",
            ClaimMatch::TooFarApart => "subject and object too far apart",
        }
    }
}

/// Character offsets of every occurrence of `needle` in `haystack`
pub fn char_positions(haystack: &str, needle: &str) -> Vec<usize> {
    if needle.is_empty() {
        return Vec::new();
    }
    let mut positions = Vec::new();
    let mut chars_seen = 0;
    let mut last_byte = 0;
    for (byte, _) in haystack.match_indices(needle) {
        chars_seen += haystack[last_byte..byte].chars().count();
        last_byte = byte;
        positions.push(chars_seen);
    }
    positions
}

/// Match a claim's subject and object against lowercased `context`
pub fn match_claim(subject: &str, object: &str, context: &str, window: usize) -> ClaimMatch {
    let subject = subject.to_lowercase();
    let object = object.to_lowercase();

    let subject_at = char_positions(context, subject.trim());
    if subject_at.is_empty() {
        return ClaimMatch::SubjectMissing;
    }
    let object_at = char_positions(context, object.trim());
    if object_at.is_empty() {
        return ClaimMatch::ObjectMissing;
    }

    if within_window(&subject_at, &object_at, window) {
        ClaimMatch::Supported
    } else {
        ClaimMatch::TooFarApart
    }
}

/// Whether any pair from two ascending position lists is at most `window` apart
fn within_window(left: &[usize], right: &[usize], window: usize) -> bool {
    let (mut i, mut j) = (0, 0);
    while i < left.len() && j < right.len() {
        let (l, r) = (left[i], right[j]);
        if l.abs_diff(r) <= window {
            return true;
        }
        // The smaller position is even farther from everything after the other
        if l < r {
            i += 1;
        } else {
            j += 1;
        }
    }
    false
}
