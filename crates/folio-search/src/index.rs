//! The search engine: compiles a query once, then finds and replaces.
//!
//! ## Offsets
//!
//! `regex` reports byte offsets into a `&str`; the document speaks in
//! characters. Matches come out of the regex in ascending order, so a
//! single forward-moving counter translates them without ever rescanning
//! the text from the start.
//!
//! ## Replacing back to front
//!
//! All replacements of one call are collected first, then applied from
//! the highest offset down. An edit only shifts text after it, so every
//! match still waiting to be applied keeps its original offsets.

use folio_buffer::{SelectionModel, TextDocument};
use regex::{Captures, Regex, RegexBuilder};

use crate::escape::{escape_pattern, escape_replacement, has_line_anchors};
use crate::{Match, MatchSet, Query, SearchResult, SelectMatch};

/// A compiled query, ready to run against any document.
#[derive(Debug, Clone)]
pub struct SearchIndex {
    query: Query,
    /// `None` for an empty query
    matcher: Option<Matcher>,
}

#[derive(Debug, Clone)]
struct Matcher {
    regex: Regex,
    /// Match each line on its own so `^`/`$` mean line start/end
    per_line: bool,
}

/// A pending replacement: the range to remove and the expanded text.
type Edit = (Match, String);

impl SearchIndex {
    /// Compiles a query.
    ///
    /// Literal queries are escaped into a regex, so both modes share one
    /// matching path. Fails with [`SearchError::Pattern`](crate::SearchError)
    /// for a malformed pattern.
    pub fn new(query: Query) -> SearchResult<Self> {
        if query.is_empty() {
            return Ok(Self {
                query,
                matcher: None,
            });
        }

        let (pattern, per_line) = if query.literal {
            (escape_pattern(&query.text), false)
        } else {
            (query.text.clone(), has_line_anchors(&query.text))
        };
        let regex = RegexBuilder::new(&pattern)
            .case_insensitive(!query.case_sensitive)
            .build()?;

        Ok(Self {
            query,
            matcher: Some(Matcher { regex, per_line }),
        })
    }

    /// Returns the query this index was built from.
    pub fn query(&self) -> &Query {
        &self.query
    }

    /// Finds every match in the document, in ascending order.
    pub fn find_all(&self, doc: &TextDocument) -> MatchSet {
        let mut matches = Vec::new();
        if let Some(matcher) = &self.matcher {
            let text = doc.text();
            matcher.scan(&text, |m, _| matches.push(m));
        }
        tracing::debug!("'{}': {} matches", self.query.text, matches.len());
        MatchSet::new(matches, doc.revision())
    }

    /// The first match starting after `from`, wrapping around.
    pub fn next_match(&self, doc: &TextDocument, from: usize) -> Option<Match> {
        self.find_all(doc).next_after(from)
    }

    /// The last match ending at or before `from`, wrapping around.
    pub fn prev_match(&self, doc: &TextDocument, from: usize) -> Option<Match> {
        self.find_all(doc).prev_before(from)
    }

    // ==================== Replace ====================

    /// Replaces every match. Returns how many were replaced.
    ///
    /// In pattern mode `$1` / `${name}` in the replacement expand to
    /// capture groups; in literal mode the replacement is inserted as is.
    pub fn replace_all(&self, doc: &mut TextDocument, replacement: &str) -> SearchResult<usize> {
        let edits = self.collect_edits(doc, replacement, |_| true);
        apply_edits(doc, &edits)
    }

    /// Replaces only the matches lying entirely inside `selection`.
    pub fn replace_in_selection(
        &self,
        doc: &mut TextDocument,
        selection: &SelectionModel,
        replacement: &str,
    ) -> SearchResult<usize> {
        let edits = self.collect_edits(doc, replacement, |m| {
            selection.contains_range(m.start, m.end)
        });
        apply_edits(doc, &edits)
    }

    /// Replaces the selected match and selects the next one.
    ///
    /// If the selection is not exactly on a match, nothing is replaced and
    /// the selection jumps to the first match at or after its start.
    /// Returns the match that ends up selected, or `None` if none is left.
    pub fn replace_selected(
        &self,
        doc: &mut TextDocument,
        selection: &mut SelectionModel,
        replacement: &str,
    ) -> SearchResult<Option<Match>> {
        let (first, second) = selection.normalized();
        let edits = self.collect_edits(doc, replacement, |m| m.start == first && m.end == second);
        let (resume_at, replaced) = match edits.first() {
            Some((m, text)) => {
                apply_edits(doc, &edits)?;
                (m.start + text.chars().count(), true)
            }
            None => (first, false),
        };

        let set = self.find_all(doc);
        let next = if replaced {
            // A zero-width match at the resume point is the one just replaced.
            set.matches()
                .iter()
                .find(|m| m.start > resume_at || (m.start == resume_at && !m.is_empty()))
                .or_else(|| set.matches().first())
                .copied()
        } else {
            set.first_from(resume_at)
        };
        match next {
            Some(m) => selection.select_match(m),
            None => *selection = SelectionModel::caret(resume_at.min(doc.len_chars())),
        }
        Ok(next)
    }

    /// Expands the replacement for each match accepted by `keep`.
    fn collect_edits(
        &self,
        doc: &TextDocument,
        replacement: &str,
        keep: impl Fn(&Match) -> bool,
    ) -> Vec<Edit> {
        let Some(matcher) = &self.matcher else {
            return Vec::new();
        };

        let template = if self.query.literal {
            escape_replacement(replacement)
        } else {
            replacement.to_string()
        };

        let text = doc.text();
        let mut edits = Vec::new();
        matcher.scan(&text, |m, caps| {
            if keep(&m) {
                let mut expanded = String::new();
                caps.expand(&template, &mut expanded);
                edits.push((m, expanded));
            }
        });
        edits
    }
}

/// Applies edits from the last match to the first.
fn apply_edits(doc: &mut TextDocument, edits: &[Edit]) -> SearchResult<usize> {
    let mut last_start = usize::MAX;
    for (m, text) in edits.iter().rev() {
        debug_assert!(m.start < last_start || m.is_empty(), "edits out of order");
        last_start = m.start;
        doc.replace(m.start, m.end, text)?;
    }
    if !edits.is_empty() {
        tracing::debug!("Replaced {} matches", edits.len());
    }
    Ok(edits.len())
}

impl Matcher {
    /// Runs the regex over `text`, reporting each match in character
    /// offsets together with its capture groups.
    fn scan<'t>(&self, text: &'t str, mut visit: impl FnMut(Match, &Captures<'t>)) {
        let mut counter = CharCounter::default();
        let mut report = |base: usize, caps: Captures<'t>| {
            let Some(whole) = caps.get(0) else {
                return;
            };
            let start = counter.advance(text, base + whole.start());
            let end = counter.advance(text, base + whole.end());
            visit(Match::new(start, end), &caps);
        };

        if self.per_line {
            let mut base = 0;
            for line in text.split('\n') {
                for caps in self.regex.captures_iter(line) {
                    report(base, caps);
                }
                base += line.len() + 1;
            }
        } else {
            for caps in self.regex.captures_iter(text) {
                report(0, caps);
            }
        }
    }
}

/// Translates ascending byte offsets into character offsets.
#[derive(Default)]
struct CharCounter {
    byte: usize,
    chars: usize,
}

impl CharCounter {
    fn advance(&mut self, text: &str, byte: usize) -> usize {
        debug_assert!(byte >= self.byte, "byte offsets must not go backwards");
        self.chars += text[self.byte..byte].chars().count();
        self.byte = byte;
        self.chars
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SearchError;

    fn literal(text: &str) -> SearchIndex {
        SearchIndex::new(Query::literal(text)).unwrap()
    }

    fn pattern(text: &str) -> SearchIndex {
        SearchIndex::new(Query::pattern(text)).unwrap()
    }

    fn ranges(set: &MatchSet) -> Vec<(usize, usize)> {
        set.matches().iter().map(|m| (m.start, m.end)).collect()
    }

    #[test]
    fn test_literal_matches() {
        let doc = TextDocument::from("foo bar foo");
        let index = literal("foo");
        assert_eq!(ranges(&index.find_all(&doc)), vec![(0, 3), (8, 11)]);
        assert_eq!(index.next_match(&doc, 0), Some(Match::new(8, 11)));
        assert_eq!(index.next_match(&doc, 8), Some(Match::new(0, 3)));
        assert_eq!(index.prev_match(&doc, 0), Some(Match::new(8, 11)));
    }

    #[test]
    fn test_literal_is_non_overlapping() {
        let doc = TextDocument::from("aaaa");
        assert_eq!(ranges(&literal("aa").find_all(&doc)), vec![(0, 2), (2, 4)]);
    }

    #[test]
    fn test_literal_ignores_metacharacters() {
        let doc = TextDocument::from("a.c abc a.c");
        assert_eq!(ranges(&literal("a.c").find_all(&doc)), vec![(0, 3), (8, 11)]);
    }

    #[test]
    fn test_offsets_count_characters() {
        let doc = TextDocument::from("日本語 foo ñ foo");
        let set = literal("foo").find_all(&doc);
        assert_eq!(ranges(&set), vec![(4, 7), (10, 13)]);
        for m in set.matches() {
            assert_eq!(doc.slice(m.start, m.end).unwrap(), "foo");
        }
    }

    #[test]
    fn test_empty_query_matches_nothing() {
        let doc = TextDocument::from("anything");
        let index = literal("");
        assert!(index.find_all(&doc).is_empty());
        assert_eq!(index.next_match(&doc, 0), None);
        assert_eq!(pattern("").find_all(&doc).len(), 0);
    }

    #[test]
    fn test_malformed_pattern() {
        let err = SearchIndex::new(Query::pattern("(unclosed")).unwrap_err();
        assert!(matches!(err, SearchError::Pattern(_)));
    }

    #[test]
    fn test_case_insensitive() {
        let doc = TextDocument::from("Foo foo FOO");
        let index = SearchIndex::new(Query::literal("foo").case_sensitive(false)).unwrap();
        assert_eq!(index.find_all(&doc).len(), 3);
    }

    #[test]
    fn test_anchored_pattern_runs_per_line() {
        let doc = TextDocument::from("ab\nab\nxab");
        assert_eq!(ranges(&pattern("^ab").find_all(&doc)), vec![(0, 2), (3, 5)]);
        assert_eq!(ranges(&pattern("b$").find_all(&doc)), vec![(1, 2), (4, 5), (8, 9)]);
    }

    #[test]
    fn test_per_line_offsets_count_characters() {
        let doc = TextDocument::from("é\néa");
        assert_eq!(ranges(&pattern("a$").find_all(&doc)), vec![(3, 4)]);
    }

    #[test]
    fn test_unanchored_pattern_spans_lines() {
        let doc = TextDocument::from("a\nb");
        assert_eq!(ranges(&pattern(r"a\nb").find_all(&doc)), vec![(0, 3)]);
    }

    #[test]
    fn test_replace_all() {
        let mut doc = TextDocument::from("abcabcabc");
        assert_eq!(literal("abc").replace_all(&mut doc, "x").unwrap(), 3);
        assert_eq!(doc.text(), "xxx");
        assert!(doc.is_modified());
    }

    #[test]
    fn test_replace_all_growing() {
        let mut doc = TextDocument::from("a-a-a");
        literal("a").replace_all(&mut doc, "long").unwrap();
        assert_eq!(doc.text(), "long-long-long");
    }

    #[test]
    fn test_literal_replacement_is_verbatim() {
        let mut doc = TextDocument::from("price");
        literal("price").replace_all(&mut doc, "$1.00").unwrap();
        assert_eq!(doc.text(), "$1.00");
    }

    #[test]
    fn test_pattern_replacement_expands_groups() {
        let mut doc = TextDocument::from("john smith\njane doe");
        let index = pattern(r"^(\w+) (\w+)$");
        assert_eq!(index.replace_all(&mut doc, "$2, $1").unwrap(), 2);
        assert_eq!(doc.text(), "smith, john\ndoe, jane");
    }

    #[test]
    fn test_zero_width_replacement() {
        let mut doc = TextDocument::from("a\nb");
        pattern("^").replace_all(&mut doc, "> ").unwrap();
        assert_eq!(doc.text(), "> a\n> b");
    }

    #[test]
    fn test_replace_in_selection() {
        let mut doc = TextDocument::from("foo foo foo");
        let sel = SelectionModel::new(11, 3);
        assert_eq!(literal("foo").replace_in_selection(&mut doc, &sel, "X").unwrap(), 2);
        assert_eq!(doc.text(), "foo X X");
    }

    #[test]
    fn test_replace_in_selection_without_match_is_noop() {
        let mut doc = TextDocument::from("foo bar foo");
        let sel = SelectionModel::new(2, 9);
        let count = literal("foo").replace_in_selection(&mut doc, &sel, "X").unwrap();
        assert_eq!(count, 0);
        assert_eq!(doc.text(), "foo bar foo");
        assert!(!doc.is_modified());
    }

    #[test]
    fn test_replace_selected_advances() {
        let mut doc = TextDocument::from("foo bar foo");
        let index = literal("foo");
        let mut sel = SelectionModel::new(0, 3);

        let next = index.replace_selected(&mut doc, &mut sel, "fooo").unwrap();
        assert_eq!(doc.text(), "fooo bar foo");
        assert_eq!(next, Some(Match::new(9, 12)));
        assert_eq!(sel.normalized(), (9, 12));
    }

    #[test]
    fn test_replace_selected_off_match_only_moves() {
        let mut doc = TextDocument::from("foo bar foo");
        let index = literal("foo");
        let mut sel = SelectionModel::caret(5);

        let next = index.replace_selected(&mut doc, &mut sel, "X").unwrap();
        assert_eq!(next, Some(Match::new(8, 11)));
        assert_eq!(doc.text(), "foo bar foo");
        assert!(!doc.is_modified());
    }

    #[test]
    fn test_replace_selected_last_match() {
        let mut doc = TextDocument::from("foo");
        let index = literal("foo");
        let mut sel = SelectionModel::new(0, 3);

        assert_eq!(index.replace_selected(&mut doc, &mut sel, "bar").unwrap(), None);
        assert_eq!(doc.text(), "bar");
        assert_eq!(sel, SelectionModel::caret(3));
    }

    #[test]
    fn test_replace_selected_zero_width_advances() {
        let mut doc = TextDocument::from("a\nb");
        let index = pattern("^");
        let mut sel = SelectionModel::caret(0);

        let next = index.replace_selected(&mut doc, &mut sel, "").unwrap();
        assert_eq!(next, Some(Match::new(2, 2)));
        assert_eq!(sel, SelectionModel::caret(2));

        let next = index.replace_selected(&mut doc, &mut sel, "").unwrap();
        assert_eq!(next, Some(Match::new(0, 0)));
        assert_eq!(doc.text(), "a\nb");
    }

    #[test]
    fn test_replace_selected_prefix_lines_in_turn() {
        let mut doc = TextDocument::from("a\nb");
        let index = pattern("^");
        let mut sel = SelectionModel::caret(0);

        index.replace_selected(&mut doc, &mut sel, "> ").unwrap();
        assert_eq!(sel, SelectionModel::caret(4));
        index.replace_selected(&mut doc, &mut sel, "> ").unwrap();
        assert_eq!(doc.text(), "> a\n> b");
    }

    #[test]
    fn test_replace_inside_selected_lines_only() {
        let mut doc = TextDocument::from("foo\nfoo foo\nfoo");
        let mut sel = SelectionModel::default();
        assert!(sel.select_lines(&doc, 2, 2));

        let set = literal("foo").find_all(&doc);
        assert_eq!(set.within(&sel).count(), 2);

        literal("foo").replace_in_selection(&mut doc, &sel, "x").unwrap();
        assert_eq!(doc.text(), "foo\nx x\nfoo");
    }

    #[test]
    fn test_match_set_goes_stale_after_replace() {
        let mut doc = TextDocument::from("foo");
        let index = literal("foo");
        let set = index.find_all(&doc);
        index.replace_all(&mut doc, "f").unwrap();
        assert!(set.is_stale(&doc));
        assert!(!index.find_all(&doc).is_stale(&doc));
    }
}
