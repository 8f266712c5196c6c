//! The text document: a rope plus load/save normalization.
//!
//! ## Normalization at the edges
//!
//! Loading and saving apply the same rules:
//! - trailing spaces and tabs are stripped from every line
//! - trailing blank lines are dropped
//! - the file on disk ends with exactly one `\n`
//!
//! In memory the document holds no final line terminator, and nothing is
//! normalized while editing. Trimming a line the user is still typing on
//! would move their cursor, so the rules are enforced by `serialize`.

use ropey::Rope;
use std::borrow::Cow;
use std::path::{Path, PathBuf};

use crate::{DocumentError, DocumentResult, Position};

/// An in-memory plain-text document.
///
/// All offsets are character offsets (Unicode scalar values). Line numbers
/// in the public API are 1-indexed, matching what a "go to line" prompt
/// shows the user.
#[derive(Debug, Clone)]
pub struct TextDocument {
    /// The rope holding our text content
    rope: Rope,

    /// Whether the document has unsaved changes
    modified: bool,

    /// Where the document was loaded from or last saved to
    path: Option<PathBuf>,

    /// Bumped on every content mutation
    revision: u64,
}

impl TextDocument {
    /// Creates a new empty document.
    ///
    /// # Example
    /// ```
    /// use folio_buffer::TextDocument;
    ///
    /// let doc = TextDocument::new();
    /// assert!(doc.is_empty());
    /// assert_eq!(doc.serialize(), b"\n");
    /// ```
    pub fn new() -> Self {
        Self {
            rope: Rope::new(),
            modified: false,
            path: None,
            revision: 0,
        }
    }

    /// Decodes and normalizes raw file bytes into a document.
    ///
    /// Fails with [`DocumentError::BinaryFile`] if any NUL byte is present
    /// and with [`DocumentError::Encoding`] if the bytes are not UTF-8.
    pub fn load(bytes: &[u8]) -> DocumentResult<Self> {
        let text = decode(bytes)?;
        Ok(Self {
            rope: Rope::from_str(&normalize(text)),
            ..Self::default()
        })
    }

    /// Replaces the content with freshly loaded bytes, keeping the path.
    ///
    /// On error the document is left untouched.
    pub fn reload(&mut self, bytes: &[u8]) -> DocumentResult<()> {
        let text = decode(bytes)?;
        self.rope = Rope::from_str(&normalize(text));
        self.modified = false;
        self.revision += 1;
        Ok(())
    }

    /// Produces the on-disk form of the document.
    ///
    /// Every line is stripped of trailing whitespace and terminated by
    /// `\n`; trailing blank lines are dropped, so the output always ends
    /// with exactly one newline. Does not touch `modified`.
    pub fn serialize(&self) -> Vec<u8> {
        let mut out = normalize(&self.text());
        out.push('\n');
        out.into_bytes()
    }

    /// Records a successful write of the serialized document to `path`.
    pub fn mark_saved(&mut self, path: impl Into<PathBuf>) {
        self.path = Some(path.into());
        self.modified = false;
    }

    // ==================== Text Access ====================

    /// Returns the entire text content.
    #[inline]
    pub fn text(&self) -> Cow<'_, str> {
        self.rope.slice(..).into()
    }

    /// Returns the text between two character offsets.
    pub fn slice(&self, start: usize, end: usize) -> DocumentResult<Cow<'_, str>> {
        self.check_range(start, end)?;
        Ok(self.rope.slice(start..end).into())
    }

    /// Returns true if the document holds no text.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rope.len_chars() == 0
    }

    /// Returns the number of characters in the document.
    #[inline]
    pub fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    // ==================== Mutations ====================

    /// Inserts text at a character offset.
    pub fn insert(&mut self, offset: usize, text: &str) -> DocumentResult<()> {
        self.check_offset(offset)?;
        self.rope.insert(offset, text);
        self.touch();
        Ok(())
    }

    /// Deletes the text in `[start, end)` and returns it.
    pub fn delete(&mut self, start: usize, end: usize) -> DocumentResult<String> {
        self.check_range(start, end)?;
        let deleted: String = self.rope.slice(start..end).into();
        self.rope.remove(start..end);
        self.touch();
        Ok(deleted)
    }

    /// Replaces `[start, end)` with `text`: a delete followed by an insert
    /// at `start`.
    pub fn replace(&mut self, start: usize, end: usize, text: &str) -> DocumentResult<String> {
        let deleted = self.delete(start, end)?;
        self.insert(start, text)?;
        Ok(deleted)
    }

    fn touch(&mut self) {
        self.modified = true;
        self.revision += 1;
    }

    // ==================== Lines ====================

    /// Returns the number of lines. An empty document has one line.
    #[inline]
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Returns the offset of the first character of a 1-indexed line.
    pub fn line_start(&self, line: usize) -> DocumentResult<usize> {
        self.check_line(line)?;
        Ok(self.rope.line_to_char(line - 1))
    }

    /// Returns the offset just past the last character of a 1-indexed
    /// line, not counting its `\n`.
    pub fn line_end(&self, line: usize) -> DocumentResult<usize> {
        self.check_line(line)?;
        if line == self.line_count() {
            Ok(self.len_chars())
        } else {
            Ok(self.rope.line_to_char(line) - 1)
        }
    }

    /// Returns the 1-indexed line containing a character offset.
    pub fn line_of(&self, offset: usize) -> DocumentResult<usize> {
        self.check_offset(offset)?;
        Ok(self.rope.char_to_line(offset) + 1)
    }

    // ==================== Position Conversion ====================

    /// Converts a character offset to a (line, column) position.
    pub fn char_to_position(&self, offset: usize) -> DocumentResult<Position> {
        self.check_offset(offset)?;
        let line = self.rope.char_to_line(offset);
        let column = offset - self.rope.line_to_char(line);
        Ok(Position { line, column })
    }

    /// Converts a (line, column) position to a character offset.
    ///
    /// The column may point at the end of the line, but not past it.
    pub fn position_to_char(&self, pos: Position) -> DocumentResult<usize> {
        let start = self.line_start(pos.line + 1)?;
        let end = self.line_end(pos.line + 1)?;
        if start + pos.column > end {
            return Err(DocumentError::OffsetOutOfRange {
                offset: start + pos.column,
                len: self.len_chars(),
            });
        }
        Ok(start + pos.column)
    }

    // ==================== State Queries ====================

    /// Returns true if the document has unsaved changes.
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// Returns the associated file path, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Associates the document with a path without saving.
    pub fn set_path(&mut self, path: impl Into<PathBuf>) {
        self.path = Some(path.into());
    }

    /// Returns the content revision.
    ///
    /// Two reads returning the same revision saw the same text.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    // ==================== Bounds Checking ====================

    fn check_offset(&self, offset: usize) -> DocumentResult<()> {
        if offset > self.len_chars() {
            return Err(DocumentError::OffsetOutOfRange {
                offset,
                len: self.len_chars(),
            });
        }
        Ok(())
    }

    fn check_range(&self, start: usize, end: usize) -> DocumentResult<()> {
        if start > end {
            return Err(DocumentError::InvalidRange { start, end });
        }
        self.check_offset(end)
    }

    fn check_line(&self, line: usize) -> DocumentResult<()> {
        if line == 0 || line > self.line_count() {
            return Err(DocumentError::LineOutOfRange {
                line,
                count: self.line_count(),
            });
        }
        Ok(())
    }
}

impl Default for TextDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&str> for TextDocument {
    /// Wraps text verbatim, without load normalization.
    fn from(s: &str) -> Self {
        Self {
            rope: Rope::from_str(s),
            ..Self::default()
        }
    }
}

impl From<String> for TextDocument {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

/// Rejects NUL bytes, then validates UTF-8.
fn decode(bytes: &[u8]) -> DocumentResult<&str> {
    if let Some(offset) = bytes.iter().position(|&b| b == 0) {
        return Err(DocumentError::BinaryFile { offset });
    }
    Ok(std::str::from_utf8(bytes)?)
}

/// Strips trailing spaces and tabs from every line and drops trailing
/// blank lines. The result has no final `\n`.
pub fn normalize(text: &str) -> String {
    let mut lines: Vec<&str> = text
        .split('\n')
        .map(|line| line.trim_end_matches([' ', '\t']))
        .collect();
    while lines.last().is_some_and(|line| line.is_empty()) {
        lines.pop();
    }
    lines.join("\n")
}
