use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use regex::Regex;
use tracing::debug;

use crate::error::{Result, TsukuroiError};
use crate::matcher::{MatchResult, Matcher};
use crate::property::PropertyKey;

/// Where a capture group's substring goes.
#[derive(Clone)]
pub enum GroupTarget {
    /// Stored under the key.
    Key(PropertyKey),
    /// Re-matched by another matcher whose result is merged in.
    Nested(Arc<dyn Matcher>),
}

impl From<PropertyKey> for GroupTarget {
    fn from(key: PropertyKey) -> Self {
        Self::Key(key)
    }
}

impl fmt::Debug for GroupTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(key) => write!(f, "{key}"),
            Self::Nested(matcher) => f.debug_tuple("Nested").field(matcher).finish(),
        }
    }
}

/// Matcher over one regular expression, anchored to the whole input.
///
/// Every capture group is mapped to exactly one [`GroupTarget`]. Predefined
/// entries are emitted on every successful match, before any group.
#[derive(Clone)]
pub struct PatternMatcher {
    pattern: String,
    regex: Regex,
    groups: BTreeMap<usize, GroupTarget>,
    predefined: BTreeMap<PropertyKey, String>,
}

impl PatternMatcher {
    /// Maps group `i + 1` to `keys[i]`.
    ///
    /// # Errors
    ///
    /// Returns an error if the pattern does not compile or its group count
    /// differs from the number of keys.
    pub fn new(pattern: &str, keys: &[PropertyKey]) -> Result<Self> {
        keys.iter()
            .enumerate()
            .fold(Self::builder(pattern), |builder, (i, key)| {
                builder.key(i + 1, *key)
            })
            .build()
    }

    #[must_use]
    pub fn builder(pattern: &str) -> PatternMatcherBuilder {
        PatternMatcherBuilder {
            pattern: pattern.to_string(),
            groups: BTreeMap::new(),
            predefined: BTreeMap::new(),
        }
    }

    /// The pattern as given, without anchors.
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    #[must_use]
    pub fn groups(&self) -> &BTreeMap<usize, GroupTarget> {
        &self.groups
    }

    #[must_use]
    pub fn predefined(&self) -> &BTreeMap<PropertyKey, String> {
        &self.predefined
    }

    /// Number of capture groups in the pattern.
    #[must_use]
    pub fn group_count(&self) -> usize {
        self.regex.captures_len() - 1
    }
}

impl Matcher for PatternMatcher {
    fn match_text(&self, text: &str) -> MatchResult {
        let Some(captures) = self.regex.captures(text) else {
            debug!(pattern = %self.pattern, text, "pattern did not match");
            return MatchResult::new();
        };

        let mut result = MatchResult::new();
        for (key, value) in &self.predefined {
            result.merge(*key, value);
        }

        for (index, target) in &self.groups {
            let Some(group) = captures.get(*index) else {
                continue;
            };
            match target {
                GroupTarget::Key(key) => result.merge(*key, group.as_str()),
                GroupTarget::Nested(matcher) => {
                    let nested = matcher.match_text(group.as_str());
                    if nested.is_empty() {
                        debug!(
                            pattern = %self.pattern,
                            group = index,
                            text = group.as_str(),
                            "nested matcher found nothing in group"
                        );
                    }
                    result.merge_all(nested);
                }
            }
        }

        result
    }
}

impl fmt::Debug for PatternMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PatternMatcher")
            .field("pattern", &self.pattern)
            .field("groups", &self.groups)
            .field("predefined", &self.predefined)
            .finish()
    }
}

/// Builder for [`PatternMatcher`].
#[derive(Debug, Clone)]
pub struct PatternMatcherBuilder {
    pattern: String,
    groups: BTreeMap<usize, GroupTarget>,
    predefined: BTreeMap<PropertyKey, String>,
}

impl PatternMatcherBuilder {
    /// Stores group `index` under `key`.
    #[must_use]
    pub fn key(mut self, index: usize, key: PropertyKey) -> Self {
        self.groups.insert(index, GroupTarget::Key(key));
        self
    }

    /// Re-matches group `index` with `matcher`.
    #[must_use]
    pub fn nested(mut self, index: usize, matcher: Arc<dyn Matcher>) -> Self {
        self.groups.insert(index, GroupTarget::Nested(matcher));
        self
    }

    #[must_use]
    pub fn target(mut self, index: usize, target: GroupTarget) -> Self {
        self.groups.insert(index, target);
        self
    }

    /// Emits `value` under `key` on every match.
    #[must_use]
    pub fn predefined(mut self, key: PropertyKey, value: &str) -> Self {
        self.predefined.insert(key, value.to_string());
        self
    }

    /// Compiles the anchored pattern and checks the group mapping.
    ///
    /// # Errors
    ///
    /// - `TsukuroiError::RegexError` if the pattern does not compile
    /// - `TsukuroiError::UnknownGroup` if a mapped index is not a group
    /// - `TsukuroiError::UnmappedGroup` if a group has no target
    pub fn build(self) -> Result<PatternMatcher> {
        let regex = Regex::new(&format!("^(?:{})$", self.pattern))?;
        let available = regex.captures_len() - 1;

        if let Some(&group) = self
            .groups
            .keys()
            .find(|&&index| index == 0 || index > available)
        {
            return Err(TsukuroiError::UnknownGroup {
                pattern: self.pattern,
                group,
                available,
            });
        }

        if let Some(group) = (1..=available).find(|index| !self.groups.contains_key(index)) {
            return Err(TsukuroiError::UnmappedGroup {
                pattern: self.pattern,
                group,
            });
        }

        Ok(PatternMatcher {
            pattern: self.pattern,
            regex,
            groups: self.groups,
            predefined: self.predefined,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::keys::{
        EPISODE_NUMBER_IN_SEASON, RELEASE_GROUP, SEASON_NUMBER, SERIES_NAME, SERIES_YEAR,
    };

    fn episode_matcher() -> PatternMatcher {
        PatternMatcher::new(
            r"(.+)\.S(\d{2})E(\d{2})(?:\+(\d{2}))?",
            &[
                SERIES_NAME,
                SEASON_NUMBER,
                EPISODE_NUMBER_IN_SEASON,
                EPISODE_NUMBER_IN_SEASON,
            ],
        )
        .unwrap()
    }

    #[test]
    fn captures_mapped_groups() {
        let result = episode_matcher().match_text("Psych.S01E05");
        assert_eq!(result.get(&SERIES_NAME), Some("Psych"));
        assert_eq!(result.get(&SEASON_NUMBER), Some("01"));
        assert_eq!(result.get(&EPISODE_NUMBER_IN_SEASON), Some("05"));
    }

    #[test]
    fn groups_with_same_key_concatenate() {
        let result = episode_matcher().match_text("Psych.S01E01+02");
        assert_eq!(result.get(&EPISODE_NUMBER_IN_SEASON), Some("01 02"));
    }

    #[test]
    fn anchored_to_whole_input() {
        let matcher = episode_matcher();
        assert!(matcher.match_text("Psych.S01E05.720p").is_empty());
        assert!(matcher.match_text("").is_empty());
    }

    #[test]
    fn predefined_entries_come_first() {
        let matcher = PatternMatcher::builder(r"(\w+)")
            .key(1, SERIES_NAME)
            .predefined(SERIES_NAME, "The")
            .predefined(SEASON_NUMBER, "1")
            .build()
            .unwrap();
        let result = matcher.match_text("Office");
        assert_eq!(result.get(&SERIES_NAME), Some("The Office"));
        assert_eq!(result.get(&SEASON_NUMBER), Some("1"));
    }

    #[test]
    fn nested_matcher_refines_group() {
        let name_with_year: Arc<dyn Matcher> =
            Arc::new(PatternMatcher::new(r"(.+)\.(\d{4})", &[SERIES_NAME, SERIES_YEAR]).unwrap());
        let matcher = PatternMatcher::builder(r"(.+)-(\w+)")
            .nested(1, name_with_year)
            .key(2, RELEASE_GROUP)
            .build()
            .unwrap();

        let result = matcher.match_text("Castle.2009-LOL");
        assert_eq!(result.get(&SERIES_NAME), Some("Castle"));
        assert_eq!(result.get(&SERIES_YEAR), Some("2009"));
        assert_eq!(result.get(&RELEASE_GROUP), Some("LOL"));
    }

    #[test]
    fn nested_miss_keeps_outer_groups() {
        let needs_year: Arc<dyn Matcher> =
            Arc::new(PatternMatcher::new(r"(.+)\.(\d{4})", &[SERIES_NAME, SERIES_YEAR]).unwrap());
        let matcher = PatternMatcher::builder(r"(.+)-(\w+)")
            .nested(1, needs_year)
            .key(2, RELEASE_GROUP)
            .build()
            .unwrap();

        let result = matcher.match_text("Castle-LOL");
        assert_eq!(result.get(&RELEASE_GROUP), Some("LOL"));
        assert_eq!(result.get(&SERIES_NAME), None);
        assert_eq!(result.get(&SERIES_YEAR), None);
    }

    #[test]
    fn rejects_unknown_group() {
        let err = PatternMatcher::builder(r"(\w+)")
            .key(1, SERIES_NAME)
            .key(2, SEASON_NUMBER)
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            TsukuroiError::UnknownGroup { group: 2, available: 1, .. }
        ));
    }

    #[test]
    fn rejects_unmapped_group() {
        let err = PatternMatcher::new(r"(\w+)\.(\d+)", &[SERIES_NAME]).unwrap_err();
        assert!(matches!(err, TsukuroiError::UnmappedGroup { group: 2, .. }));
    }

    #[test]
    fn rejects_invalid_pattern() {
        let err = PatternMatcher::new(r"(\w+", &[SERIES_NAME]).unwrap_err();
        assert!(matches!(err, TsukuroiError::RegexError(_)));
    }
}
