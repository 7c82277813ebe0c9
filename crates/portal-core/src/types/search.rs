//! Free-text search terms shared by list filters.

use serde::{Deserialize, Serialize};

/// A normalized, case-insensitive substring search term.
///
/// Blank input is treated as "no search". The SQL form escapes `LIKE`
/// wildcards so that a literal `%` or `_` typed by the user only matches
/// itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SearchTerm(String);

impl SearchTerm {
    /// Build a term from raw input; returns `None` for blank input.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    /// The trimmed term as typed.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `ILIKE` pattern with escaped wildcards, e.g. `%cs202%`.
    ///
    /// Pair with `ESCAPE '\'` in the query.
    pub fn like_pattern(&self) -> String {
        let mut pattern = String::with_capacity(self.0.len() + 2);
        pattern.push('%');
        for ch in self.0.chars() {
            if matches!(ch, '%' | '_' | '\\') {
                pattern.push('\\');
            }
            pattern.push(ch);
        }
        pattern.push('%');
        pattern
    }

    /// Case-insensitive substring test against any of the given fields.
    pub fn matches_any<'a>(&self, fields: impl IntoIterator<Item = Option<&'a str>>) -> bool {
        let needle = self.0.to_lowercase();
        fields
            .into_iter()
            .flatten()
            .any(|field| field.to_lowercase().contains(&needle))
    }
}

/// Parse an optional raw search string.
pub fn search_term(raw: Option<&str>) -> Option<SearchTerm> {
    raw.and_then(SearchTerm::parse)
}
