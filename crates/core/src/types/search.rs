//! Case-insensitive substring search used by the leads manager.

/// A normalized search term.
///
/// Matching is a case-insensitive substring test. A blank term matches
/// everything.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchTerm(String);

impl SearchTerm {
    /// Normalize user input into a search term.
    #[must_use]
    pub fn new(input: &str) -> Self {
        Self(input.trim().to_lowercase())
    }

    /// Whether the term is blank.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether `haystack` contains the term, ignoring case.
    #[must_use]
    pub fn matches(&self, haystack: &str) -> bool {
        self.is_blank() || haystack.to_lowercase().contains(&self.0)
    }

    /// Whether any of the given fields contains the term.
    #[must_use]
    pub fn matches_any<'a>(&self, fields: impl IntoIterator<Item = &'a str>) -> bool {
        self.is_blank() || fields.into_iter().any(|field| self.matches(field))
    }

    /// The normalized term.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}
