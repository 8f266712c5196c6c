//! # Folio Core
//!
//! Everything between a file on disk and the text core.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌───────────────────────────────────────────────┐
//! │                    Session                     │
//! │   ┌─────────────┐   ┌──────────────────────┐  │
//! │   │   Config    │   │  path index (canon)  │  │
//! │   └─────────────┘   └──────────────────────┘  │
//! │   ┌──────────┐ ┌──────────┐ ┌──────────┐      │
//! │   │  Entry 1 │ │  Entry 2 │ │  Entry 3 │ ...  │
//! │   │ doc+sel  │ │ doc+sel  │ │ doc+sel  │      │
//! │   └──────────┘ └──────────┘ └──────────┘      │
//! └───────────────────────────────────────────────┘
//! ```
//!
//! Each entry owns one `TextDocument` and its `SelectionModel`. Entries
//! are keyed by `DocumentId`, never by anything a UI toolkit hands out.

pub mod config;
pub mod paths;
pub mod session;

pub use config::Config;
pub use session::{DocumentId, Entry, Session};

/// Result type for core operations
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in core operations
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Document not found: {0}")]
    DocumentNotFound(DocumentId),

    #[error("Document {0} has no file path")]
    NoPath(DocumentId),

    #[error("{path} is too large ({size} bytes, limit {limit})")]
    FileTooLarge {
        path: String,
        size: u64,
        limit: u64,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Document error: {0}")]
    Document(#[from] folio_buffer::DocumentError),

    #[error("Search error: {0}")]
    Search(#[from] folio_search::SearchError),
}
