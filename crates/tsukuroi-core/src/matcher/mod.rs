//! # Matchers
//!
//! Text → [`MatchResult`]. A matcher never errors on input: a miss is an
//! empty result. Configuration mistakes (bad patterns, unmapped groups) are
//! reported when the matcher is built.

pub mod alternation;
pub mod extension;
pub mod pattern;

use std::collections::BTreeMap;
use std::collections::btree_map;
use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::property::PropertyKey;

pub use alternation::AlternationMatcher;
pub use extension::MatcherExtension;
pub use pattern::{GroupTarget, PatternMatcher, PatternMatcherBuilder};

/// Substrings captured per property.
///
/// A key that is absent was not captured; a key mapped to `""` was captured
/// empty. Iteration follows [`PropertyKey`] order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MatchResult(BTreeMap<PropertyKey, String>);

impl MatchResult {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` for "no match".
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn get(&self, key: &PropertyKey) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    #[must_use]
    pub fn contains(&self, key: &PropertyKey) -> bool {
        self.0.contains_key(key)
    }

    /// Returns `true` if any of `keys` was captured.
    #[must_use]
    pub fn contains_any(&self, keys: &[PropertyKey]) -> bool {
        keys.iter().any(|k| self.contains(k))
    }

    pub fn iter(&self) -> btree_map::Iter<'_, PropertyKey, String> {
        self.0.iter()
    }

    /// Adds `value` under `key`, joining with one space if the key already
    /// holds a value.
    pub fn merge(&mut self, key: PropertyKey, value: &str) {
        match self.0.entry(key) {
            btree_map::Entry::Vacant(entry) => {
                entry.insert(value.to_string());
            }
            btree_map::Entry::Occupied(mut entry) => {
                let existing = entry.get_mut();
                existing.push(' ');
                existing.push_str(value);
            }
        }
    }

    /// Merges every entry of `other` key by key.
    pub fn merge_all(&mut self, other: MatchResult) {
        for (key, value) in other.0 {
            self.merge(key, &value);
        }
    }
}

impl<'a> IntoIterator for &'a MatchResult {
    type Item = (&'a PropertyKey, &'a String);
    type IntoIter = btree_map::Iter<'a, PropertyKey, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<S: AsRef<str>> FromIterator<(PropertyKey, S)> for MatchResult {
    fn from_iter<I: IntoIterator<Item = (PropertyKey, S)>>(iter: I) -> Self {
        let mut result = Self::new();
        for (key, value) in iter {
            result.merge(key, value.as_ref());
        }
        result
    }
}

impl fmt::Display for MatchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (key, value)) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{key}={value:?}")?;
        }
        f.write_str("}")
    }
}

/// Extracts property substrings from a whole input text.
pub trait Matcher: fmt::Debug + Send + Sync {
    /// Matches the whole of `text`; an empty result means no match.
    fn match_text(&self, text: &str) -> MatchResult;
}

impl<M: Matcher + ?Sized> Matcher for Arc<M> {
    fn match_text(&self, text: &str) -> MatchResult {
        (**self).match_text(text)
    }
}

impl<M: Matcher + ?Sized> Matcher for Box<M> {
    fn match_text(&self, text: &str) -> MatchResult {
        (**self).match_text(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::keys::{EPISODE_NUMBER_IN_SEASON, SERIES_NAME};

    #[test]
    fn merge_joins_with_single_space() {
        let mut result = MatchResult::new();
        result.merge(EPISODE_NUMBER_IN_SEASON, "01");
        result.merge(EPISODE_NUMBER_IN_SEASON, "02");
        assert_eq!(result.get(&EPISODE_NUMBER_IN_SEASON), Some("01 02"));
        assert_eq!(result.len(), 1);
    }

    #[test]
    fn absent_differs_from_empty() {
        let result: MatchResult = [(SERIES_NAME, "")].into_iter().collect();
        assert!(!result.is_empty());
        assert_eq!(result.get(&SERIES_NAME), Some(""));
        assert_eq!(result.get(&EPISODE_NUMBER_IN_SEASON), None);
    }

    #[test]
    fn display_lists_keys_in_order() {
        let result: MatchResult = [(SERIES_NAME, "Psych"), (EPISODE_NUMBER_IN_SEASON, "1")]
            .into_iter()
            .collect();
        assert_eq!(
            result.to_string(),
            r#"{Episode.number_in_season="1", Series.name="Psych"}"#
        );
    }
}
