//! # Standardization Configuration
//!
//! Serializable description of the shipped rule set. [`Default`] yields the
//! rules Tsukuroi ships with; [`StandardizingConfig::empty`] yields none.
//!
//! ```rust
//! use tsukuroi_core::config::{StandardizingConfig, TagRuleConfig};
//! use tsukuroi_core::language::LanguageFormat;
//!
//! let config = StandardizingConfig::default()
//!     .with_tag_rule(TagRuleConfig::new("DVDRip", &["DVD", "Rip"], &["DVDRip"]))
//!     .with_language_format(LanguageFormat::Tag);
//! assert!(config.tag_rules.iter().any(|r| r.name == "DVDRip"));
//! ```

use serde::{Deserialize, Serialize};

use crate::correction::{QueryMode, ReplaceScope};
use crate::language::{DisplayLanguage, Language, LanguageFormat};

/// Which shipped rules to register and how to configure them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StandardizingConfig {
    /// Subtitle language normalization.
    pub language: LanguageConfig,
    /// Whether subtitle languages are normalized at all.
    pub normalize_languages: bool,
    /// Tag sequence replacements for release, subtitle and subtitle-file tags.
    pub tag_rules: Vec<TagRuleConfig>,
    /// Series name corrections.
    pub series_names: Vec<SeriesNameConfig>,
    /// Remove repeated tags.
    pub deduplicate_tags: bool,
    /// Trim and collapse whitespace in every text property of media.
    pub trim_media_text: bool,
}

impl Default for StandardizingConfig {
    fn default() -> Self {
        Self {
            language: LanguageConfig::default(),
            normalize_languages: true,
            tag_rules: default_tag_rules(),
            series_names: default_series_names(),
            deduplicate_tags: true,
            trim_media_text: true,
        }
    }
}

impl StandardizingConfig {
    /// Create a new configuration with the shipped rules.
    pub fn new() -> Self {
        Self::default()
    }

    /// A configuration that registers no rules.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            language: LanguageConfig::default(),
            normalize_languages: false,
            tag_rules: Vec::new(),
            series_names: Vec::new(),
            deduplicate_tags: false,
            trim_media_text: false,
        }
    }

    /// Set the language normalization settings.
    #[must_use]
    pub fn with_language(mut self, language: LanguageConfig) -> Self {
        self.language = language;
        self.normalize_languages = true;
        self
    }

    /// Set only the output format of normalized languages.
    #[must_use]
    pub fn with_language_format(mut self, format: LanguageFormat) -> Self {
        self.language.format = format;
        self
    }

    /// Append a tag sequence rule.
    #[must_use]
    pub fn with_tag_rule(mut self, rule: TagRuleConfig) -> Self {
        self.tag_rules.push(rule);
        self
    }

    /// Append a series name correction.
    #[must_use]
    pub fn with_series_name(mut self, pattern: &str, name: &str) -> Self {
        self.series_names.push(SeriesNameConfig {
            pattern: pattern.to_string(),
            name: name.to_string(),
        });
        self
    }

    #[must_use]
    pub fn with_deduplicate_tags(mut self, enabled: bool) -> Self {
        self.deduplicate_tags = enabled;
        self
    }

    #[must_use]
    pub fn with_trim_media_text(mut self, enabled: bool) -> Self {
        self.trim_media_text = enabled;
        self
    }

    #[must_use]
    pub fn with_normalize_languages(mut self, enabled: bool) -> Self {
        self.normalize_languages = enabled;
        self
    }
}

/// Settings of the language normalizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LanguageConfig {
    /// Output representation.
    pub format: LanguageFormat,
    /// Language display names are written in.
    pub display_language: DisplayLanguage,
    /// Languages whose display names are accepted as input.
    pub parse_languages: Vec<DisplayLanguage>,
    /// Patterns tried before the catalog, in order.
    pub custom_parse: Vec<LanguagePattern>,
    /// Outputs overriding the configured format.
    pub custom_format: Vec<LanguageOverride>,
}

impl Default for LanguageConfig {
    fn default() -> Self {
        Self {
            format: LanguageFormat::DisplayName,
            display_language: DisplayLanguage::English,
            parse_languages: DisplayLanguage::ALL.to_vec(),
            custom_parse: Vec::new(),
            custom_format: Vec::new(),
        }
    }
}

/// Input matching `pattern` (whole, case-insensitive) means `language`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguagePattern {
    pub pattern: String,
    pub language: Language,
}

/// `language` is written as `text`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageOverride {
    pub language: Language,
    pub text: String,
}

/// One tag sequence replacement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagRuleConfig {
    /// Rule name recorded in change records.
    pub name: String,
    pub query: Vec<String>,
    #[serde(default)]
    pub replacement: Vec<String>,
    #[serde(default)]
    pub mode: QueryMode,
    #[serde(default)]
    pub scope: ReplaceScope,
    #[serde(default)]
    pub ignore_order: bool,
}

impl TagRuleConfig {
    /// An order-sensitive, in-place replacement.
    #[must_use]
    pub fn new(name: &str, query: &[&str], replacement: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            query: query.iter().map(|s| s.to_string()).collect(),
            replacement: replacement.iter().map(|s| s.to_string()).collect(),
            mode: QueryMode::default(),
            scope: ReplaceScope::default(),
            ignore_order: false,
        }
    }

    #[must_use]
    pub fn with_mode(mut self, mode: QueryMode) -> Self {
        self.mode = mode;
        self
    }

    #[must_use]
    pub fn with_scope(mut self, scope: ReplaceScope) -> Self {
        self.scope = scope;
        self
    }

    #[must_use]
    pub fn with_ignore_order(mut self, ignore_order: bool) -> Self {
        self.ignore_order = ignore_order;
        self
    }
}

/// Series names matching `pattern` (whole name) are renamed to `name`.
///
/// The canonical name should match its own pattern, so the correction is
/// stable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesNameConfig {
    pub pattern: String,
    pub name: String,
}

fn default_tag_rules() -> Vec<TagRuleConfig> {
    vec![
        TagRuleConfig::new("H.264", &["H", "264"], &["H.264"]),
        TagRuleConfig::new("H.264", &["H264"], &["H.264"]),
        TagRuleConfig::new("H.265", &["H", "265"], &["H.265"]),
        TagRuleConfig::new("H.265", &["H265"], &["H.265"]),
        TagRuleConfig::new("DD5.1", &["DD5", "1"], &["DD5.1"]),
        TagRuleConfig::new("DD2.0", &["DD2", "0"], &["DD2.0"]),
        TagRuleConfig::new("AAC2.0", &["AAC2", "0"], &["AAC2.0"]),
        TagRuleConfig::new("WEB-DL", &["WEBDL"], &["WEB-DL"]),
        TagRuleConfig::new("WEB-DL", &["WEB", "DL"], &["WEB-DL"]),
    ]
}

fn default_series_names() -> Vec<SeriesNameConfig> {
    [
        (
            r"(?i)marvel'?s?\s+agents\s+of\s+s\W*h\W*i\W*e\W*l\W*d\W*",
            "Marvel's Agents of S.H.I.E.L.D.",
        ),
        (r"(?i)grey'?s\s+anatomy", "Grey's Anatomy"),
        (r"(?i)csi\W+ny", "CSI: NY"),
        (
            r"(?i)law\s+(?:and|&)\s+order:?\s+(?:svu|special\s+victims\s+unit)",
            "Law & Order: Special Victims Unit",
        ),
    ]
    .into_iter()
    .map(|(pattern, name)| SeriesNameConfig {
        pattern: pattern.to_string(),
        name: name.to_string(),
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_ships_rules() {
        let config = StandardizingConfig::default();
        assert!(config.normalize_languages);
        assert!(config.deduplicate_tags);
        assert!(config.tag_rules.iter().any(|r| r.query == ["H", "264"]));
        assert!(!config.series_names.is_empty());
    }

    #[test]
    fn empty_has_no_rules() {
        let config = StandardizingConfig::empty();
        assert!(config.tag_rules.is_empty());
        assert!(!config.normalize_languages);
        assert!(!config.trim_media_text);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config: StandardizingConfig = serde_json::from_str(
            r#"{
                "language": { "format": "tag", "custom_parse": [{ "pattern": "vo", "language": "en" }] },
                "tag_rules": [{ "name": "DVDRip", "query": ["DVD", "Rip"], "replacement": ["DVDRip"] }],
                "deduplicate_tags": false
            }"#,
        )
        .unwrap();

        assert_eq!(config.language.format, LanguageFormat::Tag);
        assert_eq!(config.language.display_language, DisplayLanguage::English);
        assert_eq!(config.language.custom_parse[0].language, Language::new("en"));
        assert_eq!(config.tag_rules.len(), 1);
        assert_eq!(config.tag_rules[0].scope, ReplaceScope::MatchedSequence);
        assert!(!config.deduplicate_tags);
        assert!(config.trim_media_text);
    }

    #[test]
    fn invalid_language_tag_is_rejected() {
        let result: Result<LanguageOverride, _> =
            serde_json::from_str(r#"{ "language": "not a tag", "text": "x" }"#);
        assert!(result.is_err());
    }

    #[test]
    fn builders_append() {
        let config = StandardizingConfig::empty()
            .with_series_name("(?i)the office us", "The Office (US)")
            .with_tag_rule(TagRuleConfig::new("HI", &["HI"], &[]))
            .with_language_format(LanguageFormat::Iso3);
        assert_eq!(config.series_names.len(), 1);
        assert_eq!(config.tag_rules[0].replacement.len(), 0);
        assert_eq!(config.language.format, LanguageFormat::Iso3);
    }
}
