//! External species API response types
//!
//! Reference: https://pokeapi.co/api/v2/pokemon?limit=N

use serde::{Deserialize, Serialize};

/// One page of a named-resource collection
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SpeciesPage {
    #[serde(default)]
    pub count: Option<u64>,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
    pub results: Vec<NamedResource>,
}

/// A raw collection entry: display name plus canonical reference URL,
/// e.g. `{ "name": "pikachu", "url": "https://pokeapi.co/api/v2/pokemon/25/" }`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct NamedResource {
    pub name: String,
    pub url: String,
}

impl NamedResource {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }

    /// The trailing numeric path segment of the reference URL
    pub fn ordinal(&self) -> Option<i64> {
        ordinal_from_url(&self.url)
    }
}

/// Extract the last non-empty path segment of `url` as a positive integer.
///
/// `https://pokeapi.co/api/v2/pokemon/25/` yields `Some(25)`.
pub fn ordinal_from_url(url: &str) -> Option<i64> {
    let parsed = url::Url::parse(url).ok()?;
    let segment = parsed
        .path_segments()?
        .rfind(|s| !s.is_empty())?;
    segment.parse::<i64>().ok().filter(|n| *n > 0)
}
