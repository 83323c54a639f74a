use regex::Regex;

use crate::error::{Result, TsukuroiError};
use crate::matcher::pattern::PatternMatcher;
use crate::property::PropertyKey;

/// Derives new pattern matchers by wrapping existing ones in a prefix and a
/// suffix pattern.
///
/// Used to build release matchers from media matchers (group suffix) and
/// subtitle-file matchers from release matchers (language suffix). Prefix
/// groups take indices `1..=p`, the wrapped matcher's groups shift by `p` and
/// keep their targets, suffix groups come last.
#[derive(Debug, Clone)]
pub struct MatcherExtension {
    prefix: String,
    prefix_keys: Vec<PropertyKey>,
    suffix: String,
    suffix_keys: Vec<PropertyKey>,
}

impl MatcherExtension {
    /// # Errors
    ///
    /// Returns an error if the prefix or suffix does not compile or its group
    /// count differs from its key count.
    pub fn new(
        prefix: &str,
        prefix_keys: &[PropertyKey],
        suffix: &str,
        suffix_keys: &[PropertyKey],
    ) -> Result<Self> {
        check_groups("prefix", prefix, prefix_keys)?;
        check_groups("suffix", suffix, suffix_keys)?;
        Ok(Self {
            prefix: prefix.to_string(),
            prefix_keys: prefix_keys.to_vec(),
            suffix: suffix.to_string(),
            suffix_keys: suffix_keys.to_vec(),
        })
    }

    /// An extension that only appends.
    ///
    /// # Errors
    ///
    /// See [`MatcherExtension::new`].
    pub fn suffix(suffix: &str, keys: &[PropertyKey]) -> Result<Self> {
        Self::new("", &[], suffix, keys)
    }

    /// Wraps `base`, keeping its predefined entries.
    ///
    /// # Errors
    ///
    /// Returns an error if the combined pattern does not compile.
    pub fn apply(&self, base: &PatternMatcher) -> Result<PatternMatcher> {
        let pattern = format!("{}(?:{}){}", self.prefix, base.pattern(), self.suffix);
        let shift = self.prefix_keys.len();

        let mut builder = PatternMatcher::builder(&pattern);
        for (i, key) in self.prefix_keys.iter().enumerate() {
            builder = builder.key(i + 1, *key);
        }
        for (index, target) in base.groups() {
            builder = builder.target(index + shift, target.clone());
        }
        let offset = shift + base.group_count();
        for (i, key) in self.suffix_keys.iter().enumerate() {
            builder = builder.key(offset + i + 1, *key);
        }
        for (key, value) in base.predefined() {
            builder = builder.predefined(*key, value);
        }

        builder.build()
    }

    /// Applies the extension to every matcher in `bases`, in order.
    ///
    /// # Errors
    ///
    /// Returns the first error of [`MatcherExtension::apply`].
    pub fn apply_all(&self, bases: &[PatternMatcher]) -> Result<Vec<PatternMatcher>> {
        bases.iter().map(|base| self.apply(base)).collect()
    }
}

fn check_groups(part: &'static str, pattern: &str, keys: &[PropertyKey]) -> Result<()> {
    let groups = Regex::new(pattern)?.captures_len() - 1;
    if groups != keys.len() {
        return Err(TsukuroiError::GroupCountMismatch {
            part,
            pattern: pattern.to_string(),
            groups,
            keys: keys.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::matcher::{Matcher, GroupTarget};
    use crate::property::keys::{
        EPISODE_NUMBER_IN_SEASON, RELEASE_GROUP, RELEASE_TAGS, SEASON_NUMBER, SERIES_NAME,
        SERIES_YEAR, SUBTITLE_LANGUAGE,
    };

    fn episode_matcher() -> PatternMatcher {
        PatternMatcher::new(
            r"(.+)\.S(\d{2})E(\d{2})",
            &[SERIES_NAME, SEASON_NUMBER, EPISODE_NUMBER_IN_SEASON],
        )
        .unwrap()
    }

    #[test]
    fn suffix_groups_follow_base_groups() {
        let extension = MatcherExtension::suffix(r"\.(.+)-(\w+)", &[RELEASE_TAGS, RELEASE_GROUP])
            .unwrap();
        let release = extension.apply(&episode_matcher()).unwrap();

        assert_eq!(release.group_count(), 5);
        let result = release.match_text("Psych.S01E05.720p.HDTV.x264-IMMERSE");
        assert_eq!(result.get(&SERIES_NAME), Some("Psych"));
        assert_eq!(result.get(&EPISODE_NUMBER_IN_SEASON), Some("05"));
        assert_eq!(result.get(&RELEASE_TAGS), Some("720p.HDTV.x264"));
        assert_eq!(result.get(&RELEASE_GROUP), Some("IMMERSE"));
    }

    #[test]
    fn prefix_shifts_base_groups() {
        let extension =
            MatcherExtension::new(r"\[(\w+)\]", &[SUBTITLE_LANGUAGE], "", &[]).unwrap();
        let matcher = extension.apply(&episode_matcher()).unwrap();

        assert!(matches!(matcher.groups()[&1], GroupTarget::Key(k) if k == SUBTITLE_LANGUAGE));
        assert!(matches!(matcher.groups()[&2], GroupTarget::Key(k) if k == SERIES_NAME));
        let result = matcher.match_text("[de]Psych.S01E05");
        assert_eq!(result.get(&SUBTITLE_LANGUAGE), Some("de"));
        assert_eq!(result.get(&SEASON_NUMBER), Some("01"));
    }

    #[test]
    fn keeps_nested_targets_and_predefined_entries() {
        let name: Arc<dyn Matcher> =
            Arc::new(PatternMatcher::new(r"(.+)\.(\d{4})", &[SERIES_NAME, SERIES_YEAR]).unwrap());
        let base = PatternMatcher::builder(r"(.+)\.S(\d{2})")
            .nested(1, name)
            .key(2, SEASON_NUMBER)
            .predefined(RELEASE_TAGS, "COMPLETE")
            .build()
            .unwrap();
        let extension = MatcherExtension::suffix(r"-(\w+)", &[RELEASE_GROUP]).unwrap();

        let result = extension.apply(&base).unwrap().match_text("Castle.2009.S02-LOL");
        assert_eq!(result.get(&SERIES_YEAR), Some("2009"));
        assert_eq!(result.get(&RELEASE_TAGS), Some("COMPLETE"));
        assert_eq!(result.get(&RELEASE_GROUP), Some("LOL"));
    }

    #[test]
    fn group_count_mismatch_is_rejected() {
        let err = MatcherExtension::suffix(r"\.(.+)-(\w+)", &[RELEASE_GROUP]).unwrap_err();
        assert!(matches!(
            err,
            TsukuroiError::GroupCountMismatch { part: "suffix", groups: 2, keys: 1, .. }
        ));
    }
}
