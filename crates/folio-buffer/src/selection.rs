//! Cursor and selection state, independent of any widget.
//!
//! ## Anchor and cursor
//!
//! A selection is two character offsets: the `anchor`, where the gesture
//! started, and the `cursor`, where it is now. Either may come first, so
//! the direction of the gesture survives. Every query that needs a range
//! goes through [`SelectionModel::normalized`], which always returns
//! `(min, max)`.
//!
//! Ranges are half-open: an empty selection (anchor == cursor) is just a
//! cursor, and the selected length is `second - first`.

use serde::{Deserialize, Serialize};

use crate::TextDocument;

/// The current cursor/selection of one document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SelectionModel {
    anchor: usize,
    cursor: usize,
}

impl SelectionModel {
    /// Creates a zero-width selection at an offset.
    pub fn caret(offset: usize) -> Self {
        Self {
            anchor: offset,
            cursor: offset,
        }
    }

    /// Creates a selection from `anchor` to `cursor`.
    pub fn new(anchor: usize, cursor: usize) -> Self {
        Self { anchor, cursor }
    }

    /// Selects from `a` to `b`: `a` becomes the anchor, `b` the cursor.
    pub fn set_range(&mut self, a: usize, b: usize) {
        self.anchor = a;
        self.cursor = b;
    }

    /// Returns the anchor offset.
    pub fn anchor(&self) -> usize {
        self.anchor
    }

    /// Returns the cursor offset.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Returns the selection as `(first, second)` with `first <= second`.
    pub fn normalized(&self) -> (usize, usize) {
        (self.anchor.min(self.cursor), self.anchor.max(self.cursor))
    }

    /// Returns true if nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.anchor == self.cursor
    }

    /// Returns true if the cursor sits before the anchor.
    pub fn is_backward(&self) -> bool {
        self.cursor < self.anchor
    }

    /// Returns true if an offset is inside the selection (end exclusive).
    pub fn contains(&self, offset: usize) -> bool {
        let (first, second) = self.normalized();
        offset >= first && offset < second
    }

    /// Returns true if `[start, end)` lies entirely inside the selection.
    pub fn contains_range(&self, start: usize, end: usize) -> bool {
        let (first, second) = self.normalized();
        start >= first && end <= second
    }

    /// Selects whole lines `start_line..=end_line` (1-indexed).
    ///
    /// The range includes the `\n` after `end_line` unless it is the last
    /// line. Out-of-range lines leave the selection unchanged and return
    /// `false`.
    pub fn select_lines(&mut self, doc: &TextDocument, start_line: usize, end_line: usize) -> bool {
        let (start_line, end_line) = (start_line.min(end_line), start_line.max(end_line));
        let (Ok(start), Ok(end)) = (doc.line_start(start_line), doc.line_end(end_line)) else {
            return false;
        };
        let end = if end_line < doc.line_count() { end + 1 } else { end };
        self.set_range(start, end);
        true
    }

    /// Grows the selection to whole lines.
    ///
    /// `first` moves to the start of its line; `second` moves to the start
    /// of the following line unless it already sits at a line start.
    pub fn extend_to_line_boundaries(&mut self, doc: &TextDocument) {
        self.clamp_to(doc);
        let (first, second) = self.normalized();

        let first = doc
            .line_of(first)
            .and_then(|line| doc.line_start(line))
            .unwrap_or(first);

        let second = match doc.line_of(second) {
            Ok(line) if doc.line_start(line).ok() != Some(second) => doc
                .line_start(line + 1)
                .unwrap_or_else(|_| doc.len_chars()),
            _ => second,
        };

        if self.is_backward() {
            self.set_range(second, first);
        } else {
            self.set_range(first, second);
        }
    }

    /// Collapses to a caret at the end of the selection.
    pub fn collapse_to_end(&mut self) {
        let (_, second) = self.normalized();
        *self = Self::caret(second);
    }

    /// Collapses to a caret at the start of the selection.
    pub fn collapse_to_start(&mut self) {
        let (first, _) = self.normalized();
        *self = Self::caret(first);
    }

    /// Selects the whole document.
    pub fn select_all(&mut self, doc: &TextDocument) {
        self.set_range(0, doc.len_chars());
    }

    /// Pulls both ends back inside the document after an edit shrank it.
    pub fn clamp_to(&mut self, doc: &TextDocument) {
        let len = doc.len_chars();
        self.anchor = self.anchor.min(len);
        self.cursor = self.cursor.min(len);
    }
}
