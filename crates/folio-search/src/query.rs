//! What the user typed into the search bar.

/// A search query and its matching options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    /// The text to look for
    pub text: String,
    /// Exact substring match when true, regex otherwise
    pub literal: bool,
    /// Whether letter case must match
    pub case_sensitive: bool,
}

impl Query {
    /// A case-sensitive literal query.
    pub fn literal(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            literal: true,
            case_sensitive: true,
        }
    }

    /// A case-sensitive regex query.
    pub fn pattern(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            literal: false,
            case_sensitive: true,
        }
    }

    /// Sets case sensitivity.
    pub fn case_sensitive(mut self, yes: bool) -> Self {
        self.case_sensitive = yes;
        self
    }

    /// Returns true if the query can never match anything.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}
