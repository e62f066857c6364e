//! Match Scoring
//!
//! Banded scorer for one text field against one query term. Exact beats
//! prefix beats substring beats fuzzy subsequence; the first matching rule
//! wins so the bands never mix. The fuzzy branch is a greedy left-to-right
//! subsequence walk, typo-tolerant but deliberately not an edit-distance
//! metric. Downstream ranking and tests are pinned to these exact values.

/// Score for a case-insensitive exact match
pub const SCORE_EXACT: u32 = 100;
/// Score for a case-insensitive prefix match
pub const SCORE_PREFIX: u32 = 80;
/// Score for a case-insensitive substring match
pub const SCORE_SUBSTRING: u32 = 60;
/// Points per term character consumed by the fuzzy walk
pub const FUZZY_CHAR_POINTS: u32 = 2;
/// Bonus when the fuzzy walk consumes the entire term
pub const FUZZY_COMPLETION_BONUS: u32 = 10;

/// Score `text` against a single query `term`, case-insensitively.
pub fn score(text: &str, term: &str) -> u32 {
    let text = text.to_lowercase();
    let term = term.to_lowercase();

    if text == term {
        return SCORE_EXACT;
    }
    if text.starts_with(&term) {
        return SCORE_PREFIX;
    }
    if text.contains(&term) {
        return SCORE_SUBSTRING;
    }

    fuzzy_subsequence(&text, &term)
}

/// Greedy left-to-right subsequence walk over already-lowercased inputs.
///
/// Consumes term characters in order as they appear in `text`; +2 per
/// consumed character, +10 once the whole term is consumed. A partial walk
/// keeps whatever it accumulated, which may be 0.
fn fuzzy_subsequence(text: &str, term: &str) -> u32 {
    let mut term_chars = term.chars().peekable();
    let mut accumulated = 0;

    for c in text.chars() {
        match term_chars.peek() {
            Some(&expected) if expected == c => {
                term_chars.next();
                accumulated += FUZZY_CHAR_POINTS;
            }
            Some(_) => {}
            None => break,
        }
    }

    if term_chars.peek().is_none() {
        accumulated + FUZZY_COMPLETION_BONUS
    } else {
        accumulated
    }
}
