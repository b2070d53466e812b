//! Search term classification
//!
//! Every caller-supplied string classifies to exactly one [`SearchTerm`]
//! variant. `Name` is the fallback, so classification never fails.

use uuid::Uuid;

/// A search term tagged with the identifier kind it looks like
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchTerm {
    /// The whole term parses as an integer: try it as an ordinal
    Numeric(i64),
    /// The term has storage-id syntax
    StorageId(Uuid),
    /// Free text, matched against the normalized name
    Name(String),
}

pub fn classify(term: &str) -> SearchTerm {
    if let Ok(value) = term.parse::<i64>() {
        return SearchTerm::Numeric(value);
    }
    if let Ok(id) = Uuid::parse_str(term) {
        return SearchTerm::StorageId(id);
    }
    SearchTerm::Name(term.to_string())
}
