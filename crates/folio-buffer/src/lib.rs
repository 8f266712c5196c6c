//! # Folio Buffer
//!
//! Plain-text document model backed by a rope.
//!
//! ## Key Concepts
//!
//! ### Character offsets
//! - Every offset in this crate counts Unicode scalar values, never bytes
//! - `TextDocument` owns the rope; `SelectionModel` only holds offsets into it
//! - Mutations require `&mut TextDocument`, so a selection can never
//!   observe a half-applied edit
//!
//! ### Normalization
//! - Files are validated and normalized on load (no NUL, valid UTF-8,
//!   no trailing whitespace, no trailing blank lines)
//! - Serialization re-applies the same rules, so whatever the buffer
//!   looks like while editing, the saved file is always clean

mod document;
mod position;
mod selection;

pub use document::{TextDocument, normalize};
pub use position::Position;
pub use selection::SelectionModel;

/// Result type for document operations
pub type DocumentResult<T> = Result<T, DocumentError>;

/// Errors that can occur while loading or editing a document
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("File looks binary: NUL byte at offset {offset}")]
    BinaryFile { offset: usize },

    #[error("File is not valid UTF-8: {0}")]
    Encoding(#[from] std::str::Utf8Error),

    #[error("Offset {offset} is out of bounds (document has {len} characters)")]
    OffsetOutOfRange { offset: usize, len: usize },

    #[error("Invalid range: start {start} is after end {end}")]
    InvalidRange { start: usize, end: usize },

    #[error("Line {line} is out of range (document has {count} lines)")]
    LineOutOfRange { line: usize, count: usize },
}

impl DocumentError {
    /// Returns true for the offset/line errors that navigation ignores.
    pub fn is_range_error(&self) -> bool {
        matches!(
            self,
            DocumentError::OffsetOutOfRange { .. }
                | DocumentError::InvalidRange { .. }
                | DocumentError::LineOutOfRange { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_creation() {
        let doc = TextDocument::new();
        assert!(doc.is_empty());
        assert_eq!(doc.len_chars(), 0);
        assert!(!doc.is_modified());
    }

    #[test]
    fn test_load_and_edit() {
        let mut doc = TextDocument::load(b"Hello\n").unwrap();
        assert_eq!(doc.text(), "Hello");

        doc.insert(5, ", World!").unwrap();
        assert_eq!(doc.text(), "Hello, World!");

        doc.delete(5, 7).unwrap();
        assert_eq!(doc.text(), "HelloWorld!");
        assert!(doc.is_modified());
    }

    #[test]
    fn test_range_errors_are_classified() {
        let mut doc = TextDocument::from("abc");
        let err = doc.insert(10, "x").unwrap_err();
        assert!(err.is_range_error());

        let err = TextDocument::load(b"a\0b").unwrap_err();
        assert!(!err.is_range_error());
    }

    #[test]
    fn test_line_operations() {
        let doc = TextDocument::from("Line 1\nLine 2\nLine 3");
        assert_eq!(doc.line_count(), 3);
        assert_eq!(doc.line_start(2).unwrap(), 7);
        assert_eq!(doc.line_end(2).unwrap(), 13);
        assert_eq!(doc.line_end(3).unwrap(), 20);
    }
}
