//! Match ranges and the ordered list produced by one search.

use folio_buffer::{SelectionModel, TextDocument};

/// A half-open range of character offsets `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Match {
    pub start: usize,
    pub end: usize,
}

impl Match {
    /// Creates a match. `start` must not exceed `end`.
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "match start {start} after end {end}");
        Self { start, end }
    }

    /// Length in characters.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Returns true for a zero-width match.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

impl From<Match> for SelectionModel {
    fn from(m: Match) -> Self {
        SelectionModel::new(m.start, m.end)
    }
}

/// Selection helpers that take a [`Match`].
pub trait SelectMatch {
    /// Selects the match, anchor at its start and cursor at its end.
    fn select_match(&mut self, m: Match);
}

impl SelectMatch for SelectionModel {
    fn select_match(&mut self, m: Match) {
        self.set_range(m.start, m.end);
    }
}

/// Returns true if the normalized selection is exactly some match.
pub fn is_selection_on_match(selection: &SelectionModel, matches: &[Match]) -> bool {
    let (first, second) = selection.normalized();
    matches.iter().any(|m| m.start == first && m.end == second)
}

/// Returns true if some match lies entirely inside the selection.
pub fn selection_contains_match(selection: &SelectionModel, matches: &[Match]) -> bool {
    matches
        .iter()
        .any(|m| selection.contains_range(m.start, m.end))
}

/// All matches of one query against one revision of a document.
///
/// Matches are sorted by `start` and never overlap.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchSet {
    matches: Vec<Match>,
    revision: u64,
}

impl MatchSet {
    pub(crate) fn new(matches: Vec<Match>, revision: u64) -> Self {
        debug_assert!(
            matches.windows(2).all(|w| w[0].end <= w[1].start && w[0].start < w[1].start),
            "matches must be ordered and disjoint"
        );
        Self { matches, revision }
    }

    /// Returns the matches in ascending order.
    pub fn matches(&self) -> &[Match] {
        &self.matches
    }

    /// Returns the number of matches.
    pub fn len(&self) -> usize {
        self.matches.len()
    }

    /// Returns true if nothing matched.
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    /// Returns the document revision these matches were computed against.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Returns true if the document changed since this set was computed.
    pub fn is_stale(&self, doc: &TextDocument) -> bool {
        doc.revision() != self.revision
    }

    /// The first match starting after `offset`, wrapping to the first.
    pub fn next_after(&self, offset: usize) -> Option<Match> {
        self.matches
            .iter()
            .find(|m| m.start > offset)
            .or_else(|| self.matches.first())
            .copied()
    }

    /// The first match starting at or after `offset`, wrapping to the first.
    pub fn first_from(&self, offset: usize) -> Option<Match> {
        self.matches
            .iter()
            .find(|m| m.start >= offset)
            .or_else(|| self.matches.first())
            .copied()
    }

    /// The last match ending at or before `offset`, wrapping to the last.
    pub fn prev_before(&self, offset: usize) -> Option<Match> {
        self.matches
            .iter()
            .rev()
            .find(|m| m.end <= offset)
            .or_else(|| self.matches.last())
            .copied()
    }

    /// The 1-based index of the match the selection sits on, for
    /// "3 of 7" status text.
    pub fn index_of(&self, selection: &SelectionModel) -> Option<usize> {
        let (first, second) = selection.normalized();
        self.matches
            .binary_search_by(|m| m.start.cmp(&first))
            .ok()
            .filter(|&i| self.matches[i].end == second)
            .map(|i| i + 1)
    }

    /// Matches entirely inside the selection.
    pub fn within<'a>(&'a self, selection: &'a SelectionModel) -> impl Iterator<Item = &'a Match> {
        self.matches
            .iter()
            .filter(move |m| selection.contains_range(m.start, m.end))
    }
}
