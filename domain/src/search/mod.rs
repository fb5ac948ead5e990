//! Web search domain
//!
//! Result records, search configuration, the dedup-merge of result lists
//! and the inline `[[SEARCH: ...]]` marker a model can emit to ask for a
//! search in the middle of its turn.

pub mod entities;
pub mod marker;
pub mod merge;

pub use entities::{SearchCategory, SearchConfig, SearchResult, SearchTiming};
pub use marker::{
    SEARCH_MARKER_CLOSE, SEARCH_MARKER_OPEN, extract_search_requests, strip_search_markers,
};
pub use merge::merge_results;
