//! Local Index Matcher
//!
//! Scans the in-memory product snapshot and produces a ranked candidate list
//! for the current query. Each product is scored against every expanded term
//! (the normalized query plus synonym expansions) and keeps the maximum, so a
//! strong match on any one term is enough to rank well. Word-level matches
//! are scored alongside the whole searchable blob: a name ending in the exact
//! word "sneaker" outranks one containing "sneakers".

use std::collections::HashMap;

use crate::models::Product;
use crate::services::search::scoring::score;

/// Scores at or below this are pure noise and are discarded
pub const MIN_CANDIDATE_SCORE: u32 = 10;
/// Cap on the local candidate list, bounding work done by the merge step
pub const MAX_LOCAL_CANDIDATES: usize = 40;

/// Built-in synonym map: lowercase trigger phrase to expansion phrases.
///
/// An entry fires when its key contains the normalized query or the query
/// contains the key, so near-misses like "sneaker" still trigger "sneakers".
pub fn default_synonyms() -> HashMap<String, Vec<String>> {
    let entries: &[(&str, &[&str])] = &[
        ("sneakers", &["running shoes", "trainers"]),
        ("tv", &["television"]),
        ("couch", &["sofa"]),
        ("laptop", &["notebook"]),
        ("headphones", &["earbuds", "earphones"]),
        ("fridge", &["refrigerator"]),
        ("hoodie", &["sweatshirt"]),
    ];
    entries
        .iter()
        .map(|(key, expansions)| {
            (
                key.to_string(),
                expansions.iter().map(|e| e.to_string()).collect(),
            )
        })
        .collect()
}

/// A query after normalization and synonym expansion
#[derive(Debug, Clone)]
pub struct ExpandedQuery {
    /// The text exactly as typed
    pub raw: String,
    /// Trimmed, lowercased form; cache key and matcher input
    pub normalized: String,
    /// Normalized query first, then deduplicated synonym expansions
    pub terms: Vec<String>,
}

impl ExpandedQuery {
    pub fn parse(raw: &str, synonyms: &HashMap<String, Vec<String>>) -> Self {
        let normalized = raw.trim().to_lowercase();
        let mut terms = Vec::new();

        if !normalized.is_empty() {
            terms.push(normalized.clone());
            for (key, expansions) in synonyms {
                if key.contains(&normalized) || normalized.contains(key.as_str()) {
                    for expansion in expansions {
                        let expansion = expansion.to_lowercase();
                        if !terms.contains(&expansion) {
                            terms.push(expansion);
                        }
                    }
                }
            }
        }

        Self {
            raw: raw.to_string(),
            normalized,
            terms,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.normalized.is_empty()
    }
}

/// A locally matched product with its final candidate score
#[derive(Debug, Clone)]
pub struct LocalCandidate {
    pub product: Product,
    pub score: u32,
}

/// Single searchable blob: name, description, category, joined tags.
///
/// Missing fields become empty strings; the field layout is fixed because
/// prefix scoring against the blob is effectively prefix scoring against the
/// name.
pub fn search_blob(product: &Product) -> String {
    let description = product.description.as_deref().unwrap_or("");
    let category = product.category.as_deref().unwrap_or("");
    let tags = product
        .tags
        .as_ref()
        .map(|tags| tags.join(" "))
        .unwrap_or_default();
    format!("{} {} {} {}", product.name, description, category, tags)
}

/// Best score for one product across all expanded terms
fn candidate_score(blob: &str, terms: &[String]) -> u32 {
    let mut best = 0;
    for term in terms {
        let mut term_score = score(blob, term);
        for word in blob.split_whitespace() {
            term_score = term_score.max(score(word, term));
        }
        best = best.max(term_score);
    }
    best
}

/// Rank the full product set against an expanded query.
///
/// Survivors are sorted by score descending; the sort is stable so ties keep
/// catalog iteration order. The list is capped at `MAX_LOCAL_CANDIDATES`.
pub fn rank_local(products: &[Product], query: &ExpandedQuery) -> Vec<LocalCandidate> {
    if query.is_empty() {
        return Vec::new();
    }

    let mut candidates: Vec<LocalCandidate> = Vec::new();
    for product in products {
        let blob = search_blob(product);
        let best = candidate_score(&blob, &query.terms);
        if best > MIN_CANDIDATE_SCORE {
            candidates.push(LocalCandidate {
                product: product.clone(),
                score: best,
            });
        }
    }

    candidates.sort_by(|a, b| b.score.cmp(&a.score));
    candidates.truncate(MAX_LOCAL_CANDIDATES);

    tracing::debug!(
        query = %query.normalized,
        scanned = products.len(),
        matched = candidates.len(),
        "Local match pass complete"
    );
    candidates
}
