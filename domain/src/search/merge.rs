//! Dedup-merge of search result lists

use super::entities::SearchResult;
use std::collections::HashSet;

/// Merge `new` into `existing`, deduplicating by url.
///
/// Existing order is preserved and only unseen urls are appended, in the
/// order they appear in `new`. The list never shrinks.
pub fn merge_results(existing: &[SearchResult], new: &[SearchResult]) -> Vec<SearchResult> {
    let mut seen: HashSet<&str> = existing.iter().map(|r| r.url.as_str()).collect();
    let mut merged = existing.to_vec();
    for result in new {
        if seen.insert(result.url.as_str()) {
            merged.push(result.clone());
        }
    }
    merged
}
