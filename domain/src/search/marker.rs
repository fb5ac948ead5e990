//! Inline search-request markers
//!
//! A model with on-demand search enabled may write `[[SEARCH: query]]`
//! anywhere in its reply. The orchestrator runs each query and strips the
//! markers before the text becomes a message.

use regex::Regex;
use std::sync::LazyLock;

pub const SEARCH_MARKER_OPEN: &str = "[[SEARCH:";
pub const SEARCH_MARKER_CLOSE: &str = "]]";

static MARKER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\[\[SEARCH:\s*([^\]\n]*?)\s*\]\]").expect("valid search marker regex")
});

/// Queries requested in `text`, in order of appearance, without duplicates.
pub fn extract_search_requests(text: &str) -> Vec<String> {
    let mut queries: Vec<String> = Vec::new();
    for caps in MARKER_RE.captures_iter(text) {
        let query = caps[1].trim();
        if query.is_empty() || queries.iter().any(|q| q.eq_ignore_ascii_case(query)) {
            continue;
        }
        queries.push(query.to_string());
    }
    queries
}

/// Remove every marker from `text`.
///
/// Only lines that held a marker change: their trailing whitespace goes, and
/// a line left empty is dropped together with one of the blank lines around
/// it, so paragraphs stay separated by a single blank line.
pub fn strip_search_markers(text: &str) -> String {
    if !MARKER_RE.is_match(text) {
        return text.to_string();
    }
    let lines: Vec<&str> = text.split('\n').collect();
    let mut out: Vec<String> = Vec::with_capacity(lines.len());
    let mut skip_blank = false;

    for (i, line) in lines.iter().enumerate() {
        if !MARKER_RE.is_match(line) {
            if std::mem::take(&mut skip_blank) && line.trim().is_empty() {
                continue;
            }
            out.push((*line).to_string());
            continue;
        }
        skip_blank = false;
        let stripped = MARKER_RE.replace_all(line, "");
        if !stripped.trim().is_empty() {
            out.push(stripped.trim_end().to_string());
            continue;
        }

        let next_blank = lines.get(i + 1).is_none_or(|next| next.trim().is_empty());
        match out.last() {
            None => skip_blank = true,
            Some(prev) if prev.trim().is_empty() && next_blank => {
                out.pop();
            }
            Some(_) => {}
        }
    }
    out.join("\n")
}
