//! # Folio Search
//!
//! Search and replace over a [`TextDocument`](folio_buffer::TextDocument).
//!
//! ## Flow
//!
//! ```text
//!  Query ──compile──▶ SearchIndex ──find_all──▶ MatchSet ──▶ next/prev, "3 of 7"
//!                          │
//!                          └──replace_*──▶ TextDocument (back to front)
//! ```
//!
//! Every match is reported in character offsets. A `MatchSet` belongs to
//! one revision of the document; after any edit it is stale and must be
//! recomputed.

mod escape;
mod index;
mod matches;
mod query;

pub use escape::{escape_pattern, escape_replacement, has_line_anchors};
pub use index::SearchIndex;
pub use matches::{Match, MatchSet, SelectMatch, is_selection_on_match, selection_contains_match};
pub use query::Query;

/// Result type for search operations
pub type SearchResult<T> = Result<T, SearchError>;

/// Errors that can occur while searching or replacing
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("Invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Document error: {0}")]
    Document(#[from] folio_buffer::DocumentError),
}
