//! Shipped standardization rules and their registration.

use std::sync::Arc;

use regex::Regex;
use tracing::debug;

use crate::config::{SeriesNameConfig, StandardizingConfig, TagRuleConfig};
use crate::correction::{
    CorrectionService, PropertyRule, Replacer, TagDeduplicator, TagSequenceReplacer,
    TextPropertiesRule,
};
use crate::error::{Result, TsukuroiError};
use crate::language::LanguageNormalizer;
use crate::model::{MEDIA, Release, Series, Subtitle, SubtitleRelease, Tag};

/// Trims text and collapses inner whitespace runs to one space.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextCleaner;

impl Replacer<String> for TextCleaner {
    fn replace(&self, value: &String) -> String {
        value.split_whitespace().collect::<Vec<_>>().join(" ")
    }
}

/// Renames names matching a pattern (whole name) to one canonical name.
#[derive(Debug, Clone)]
pub struct NameCorrector {
    pattern: Regex,
    name: String,
}

impl NameCorrector {
    /// # Errors
    ///
    /// Returns an error if the pattern does not compile or the name is blank.
    pub fn new(pattern: &str, name: &str) -> Result<Self> {
        if name.trim().is_empty() {
            return Err(TsukuroiError::InvalidConfig(format!(
                "empty canonical name for pattern {pattern:?}"
            )));
        }
        Ok(Self {
            pattern: Regex::new(&format!("^(?:{pattern})$"))?,
            name: name.to_string(),
        })
    }

    /// # Errors
    ///
    /// Returns an error if the pattern does not compile.
    pub fn from_config(config: &SeriesNameConfig) -> Result<Self> {
        Self::new(&config.pattern, &config.name)
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Replacer<String> for NameCorrector {
    fn replace(&self, value: &String) -> String {
        if self.pattern.is_match(value) {
            self.name.clone()
        } else {
            value.clone()
        }
    }
}

/// Builds the replacer a tag rule configuration describes.
///
/// # Errors
///
/// Returns `TsukuroiError::EmptyTagQuery` if the query is empty.
pub fn tag_replacer(config: &TagRuleConfig) -> Result<TagSequenceReplacer> {
    Ok(TagSequenceReplacer::new(
        Tag::list(config.query.iter().cloned()),
        Tag::list(config.replacement.iter().cloned()),
    )?
    .with_mode(config.mode)
    .with_scope(config.scope)
    .with_ignore_order(config.ignore_order))
}

fn register_tag_rule<R>(service: &CorrectionService, name: &str, replacer: R)
where
    R: Replacer<Vec<Tag>> + Clone + 'static,
{
    service.register::<Release>(PropertyRule::<Vec<Tag>>::new(name, "tags", replacer.clone()));
    service.register::<Subtitle>(PropertyRule::<Vec<Tag>>::new(name, "tags", replacer.clone()));
    service.register::<SubtitleRelease>(PropertyRule::<Vec<Tag>>::new(name, "tags", replacer));
}

/// Registers the rules `config` describes, in a fixed order: media text
/// cleanup, series names, tag sequences, tag de-duplication, subtitle
/// languages.
///
/// # Errors
///
/// Returns an error if a pattern does not compile or a tag query is empty.
pub fn register_standard(service: &CorrectionService, config: &StandardizingConfig) -> Result<()> {
    if config.trim_media_text {
        service.register_rule(
            &MEDIA,
            Arc::new(TextPropertiesRule::new("trim media text", TextCleaner)),
        );
    }

    for entry in &config.series_names {
        let corrector = NameCorrector::from_config(entry)?;
        service.register::<Series>(PropertyRule::<String>::new(
            format!("series name: {}", entry.name),
            "name",
            corrector,
        ));
    }

    for rule in &config.tag_rules {
        register_tag_rule(service, &rule.name, tag_replacer(rule)?);
    }

    if config.deduplicate_tags {
        register_tag_rule(service, "deduplicate tags", TagDeduplicator);
    }

    if config.normalize_languages {
        let normalizer = LanguageNormalizer::from_config(&config.language)?;
        service.register::<Subtitle>(PropertyRule::<String>::new(
            "subtitle language",
            "language",
            normalizer,
        ));
    }

    debug!(rules = service.rule_count(), "registered standard rules");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EntityRef, Value, shared};

    #[test]
    fn text_cleaner_collapses_whitespace() {
        assert_eq!(TextCleaner.replace(&"  The   Office ".to_string()), "The Office");
    }

    #[test]
    fn name_corrector_matches_whole_name() {
        let corrector = NameCorrector::new(r"(?i)grey'?s\s+anatomy", "Grey's Anatomy").unwrap();
        assert_eq!(corrector.replace(&"Greys Anatomy".to_string()), "Grey's Anatomy");
        assert_eq!(
            corrector.replace(&"Greys Anatomy Extra".to_string()),
            "Greys Anatomy Extra"
        );
    }

    #[test]
    fn blank_canonical_name_is_rejected() {
        assert!(matches!(
            NameCorrector::new("(?i)psych", " "),
            Err(TsukuroiError::InvalidConfig(_))
        ));
    }

    #[test]
    fn shipped_series_names_are_stable() {
        for entry in &StandardizingConfig::default().series_names {
            let corrector = NameCorrector::from_config(entry).unwrap();
            assert_eq!(corrector.replace(&entry.name), entry.name, "{}", entry.pattern);
        }
    }

    #[test]
    fn standard_rules_fix_series_names() {
        let service = CorrectionService::standard(&StandardizingConfig::default()).unwrap();
        let series = shared(Series::named("Marvels Agents of S H I E L D "));
        let changes = service.process(&EntityRef::new(&series)).unwrap();

        assert_eq!(series.read().name, "Marvel's Agents of S.H.I.E.L.D.");
        assert_eq!(changes.len(), 2);
        assert_eq!(changes[0].rule, "trim media text");
        assert_eq!(changes[1].new_value, Value::from("Marvel's Agents of S.H.I.E.L.D."));
    }

    #[test]
    fn standard_rules_normalize_subtitle_language() {
        let service = CorrectionService::standard(&StandardizingConfig::default()).unwrap();
        let subtitle = shared(Subtitle {
            language: Some("deutsch".into()),
            ..Subtitle::default()
        });
        service.process_shared(&subtitle).unwrap();
        assert_eq!(subtitle.read().language.as_deref(), Some("German"));
    }

    #[test]
    fn empty_tag_query_fails_registration() {
        let config = StandardizingConfig::empty().with_tag_rule(TagRuleConfig::new("bad", &[], &["X"]));
        assert!(CorrectionService::standard(&config).is_err());
    }
}
