//! # Search Scoring Module
//!
//! Client-side fuzzy scoring for product lookup. This is the fallback corpus
//! ranker behind the exact SKU/barcode strategies: every cached variant gets
//! a weighted score against the query and the best ten win.
//!
//! ## Scoring Ladder
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │              fuzzy_score(query, target) → 0..=100                       │
//! │                                                                         │
//! │  exact match (case-insensitive)  ──────────────►  100                   │
//! │  target starts with query        ──────────────►   90                   │
//! │  target contains query           ──────────────►   70                   │
//! │  all query chars in order        ──────────────►  1..=50                │
//! │  anything else                   ──────────────►    0                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Field Weights
//! The combined score trusts fields in this order: SKU (×2.0) over
//! barcode (×1.5) over product name (×1.0). A query that equals a SKU
//! exactly therefore scores 200, the maximum achievable, and always sorts
//! first. This is a heuristic ranking function, not an edit-distance metric;
//! ties keep the original candidate order.

use crate::types::ProductVariant;

/// Maximum number of results a ranked search returns.
pub const MAX_SEARCH_RESULTS: usize = 10;

/// Scores a query against a single target string. Higher is better.
///
/// Returns 0 when either side is empty or when the query characters cannot
/// be found in order inside the target.
pub fn fuzzy_score(query: &str, target: &str) -> u32 {
    if query.is_empty() || target.is_empty() {
        return 0;
    }

    let query = query.to_lowercase();
    let target = target.to_lowercase();

    // Exact match
    if target == query {
        return 100;
    }

    // Starts-with match (high priority)
    if target.starts_with(&query) {
        return 90;
    }

    // Contains match
    if target.contains(&query) {
        return 70;
    }

    // Fuzzy character matching: walk the target once, consuming query
    // characters in order, 10 points apiece
    let query_chars: Vec<char> = query.chars().collect();
    let max_score = query_chars.len() as u32 * 10;

    let mut query_idx = 0;
    let mut score: u32 = 0;
    for target_char in target.chars() {
        if query_idx < query_chars.len() && query_chars[query_idx] == target_char {
            score += 10;
            query_idx += 1;
        }
    }

    // Only count it if every query character matched
    if query_idx != query_chars.len() {
        return 0;
    }

    ((score as f64 / max_score as f64) * 50.0).round() as u32
}

/// Combines per-field scores with trust weights and takes the best.
///
/// Weights reflect field trust ordering: SKU > barcode > name.
pub fn combined_score(query: &str, sku: &str, barcode: Option<&str>, name: &str) -> f64 {
    let sku_score = fuzzy_score(query, sku) as f64 * 2.0;
    let barcode_score = fuzzy_score(query, barcode.unwrap_or("")) as f64 * 1.5;
    let name_score = fuzzy_score(query, name) as f64;

    sku_score.max(barcode_score).max(name_score)
}

/// Ranks a variant corpus against a query.
///
/// Filters out zero scores, sorts descending by combined score (stable, so
/// ties keep corpus order), and truncates to [`MAX_SEARCH_RESULTS`].
pub fn rank_variants(query: &str, variants: &[ProductVariant]) -> Vec<ProductVariant> {
    let mut scored: Vec<(f64, &ProductVariant)> = variants
        .iter()
        .map(|v| {
            (
                combined_score(query, &v.sku, v.barcode.as_deref(), &v.product_name),
                v,
            )
        })
        .filter(|(score, _)| *score > 0.0)
        .collect();

    // sort_by is stable: equal scores preserve the original corpus order
    scored.sort_by(|a, b| b.0.total_cmp(&a.0));

    scored
        .into_iter()
        .take(MAX_SEARCH_RESULTS)
        .map(|(_, v)| v.clone())
        .collect()
}

// =============================================================================
// Unit Tests
// =============================================================================
