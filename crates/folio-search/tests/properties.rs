//! Property tests for match ordering, navigation and replacement.

use folio_buffer::TextDocument;
use folio_search::{Query, SearchIndex};
use proptest::prelude::*;

fn haystack() -> impl Strategy<Value = String> {
    proptest::collection::vec(
        prop_oneof![Just('a'), Just('b'), Just('c'), Just('\n'), Just('ü'), Just(' ')],
        0..80,
    )
    .prop_map(|chars| chars.into_iter().collect())
}

fn needle() -> impl Strategy<Value = String> {
    "[abü]{1,4}"
}

proptest! {
    #[test]
    fn matches_are_sorted_and_disjoint(text in haystack(), query in needle()) {
        let doc = TextDocument::from(text.as_str());
        let set = SearchIndex::new(Query::literal(query.as_str())).unwrap().find_all(&doc);
        for pair in set.matches().windows(2) {
            prop_assert!(pair[0].start < pair[1].start);
            prop_assert!(pair[0].end <= pair[1].start);
        }
        for m in set.matches() {
            prop_assert_eq!(doc.slice(m.start, m.end).unwrap(), query.as_str());
        }
    }

    #[test]
    fn pattern_matches_are_sorted_and_disjoint(text in haystack(), anchored in any::<bool>()) {
        let doc = TextDocument::from(text.as_str());
        let pattern = if anchored { "^[ab]*" } else { "[ab]*c?" };
        let set = SearchIndex::new(Query::pattern(pattern)).unwrap().find_all(&doc);
        for pair in set.matches().windows(2) {
            prop_assert!(pair[0].start < pair[1].start);
            prop_assert!(pair[0].end <= pair[1].start);
        }
        prop_assert!(set.matches().iter().all(|m| m.end <= doc.len_chars()));
    }

    #[test]
    fn literal_replace_all_matches_str_replace(
        text in haystack(),
        query in needle(),
        replacement in "[xyz$1]{0,3}",
    ) {
        let mut doc = TextDocument::from(text.as_str());
        let index = SearchIndex::new(Query::literal(query.as_str())).unwrap();
        let expected_count = text.matches(query.as_str()).count();
        prop_assert_eq!(index.replace_all(&mut doc, &replacement).unwrap(), expected_count);
        prop_assert_eq!(doc.text(), text.replace(query.as_str(), &replacement));
    }

    #[test]
    fn repeated_needle_collapses(needle in needle(), times in 1usize..8) {
        let mut doc = TextDocument::from(needle.repeat(times));
        SearchIndex::new(Query::literal(needle.as_str()))
            .unwrap()
            .replace_all(&mut doc, "x")
            .unwrap();
        prop_assert_eq!(doc.text(), "x".repeat(times));
    }

    #[test]
    fn navigation_wraps(text in haystack(), query in needle()) {
        let doc = TextDocument::from(text.as_str());
        let index = SearchIndex::new(Query::literal(query.as_str())).unwrap();
        let set = index.find_all(&doc);
        match (set.matches().first(), set.matches().last()) {
            (Some(first), Some(last)) => {
                prop_assert_eq!(index.next_match(&doc, last.start), Some(*first));
                prop_assert_eq!(index.prev_match(&doc, first.end - 1), Some(*last));
            }
            _ => {
                prop_assert_eq!(index.next_match(&doc, 0), None);
                prop_assert_eq!(index.prev_match(&doc, 0), None);
            }
        }
    }
}
