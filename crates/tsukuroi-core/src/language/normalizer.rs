use std::collections::HashMap;

use regex::Regex;
use tracing::trace;

use crate::config::LanguageConfig;
use crate::correction::Replacer;
use crate::error::Result;
use crate::language::{DisplayLanguage, Language, LanguageFormat, catalog};

/// Turns free-text language names into one configured representation.
///
/// Parsing tries, in order: the custom pattern table, an exact
/// case-insensitive match against the catalog's codes, tags and display names
/// in the configured source languages, then 3-letter codes. Formatting uses the
/// custom override table before the configured [`LanguageFormat`].
#[derive(Debug, Clone)]
pub struct LanguageNormalizer {
    custom_parse: Vec<(Regex, Language)>,
    parse_languages: Vec<DisplayLanguage>,
    custom_format: HashMap<Language, String>,
    format: LanguageFormat,
    display_language: DisplayLanguage,
}

impl LanguageNormalizer {
    #[must_use]
    pub fn builder() -> LanguageNormalizerBuilder {
        LanguageNormalizerBuilder::default()
    }

    /// Builds a normalizer from its serializable configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if a custom parse pattern fails to compile.
    pub fn from_config(config: &LanguageConfig) -> Result<Self> {
        let mut builder = Self::builder()
            .format(config.format)
            .display_language(config.display_language)
            .parse_languages(config.parse_languages.iter().copied());
        for entry in &config.custom_parse {
            builder = builder.custom_parse(&entry.pattern, entry.language.clone());
        }
        for entry in &config.custom_format {
            builder = builder.custom_format(entry.language.clone(), &entry.text);
        }
        builder.build()
    }

    /// Resolves free text to a language identity.
    #[must_use]
    pub fn parse(&self, raw: &str) -> Option<Language> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }

        if let Some((_, language)) = self.custom_parse.iter().find(|(re, _)| re.is_match(raw)) {
            trace!(raw, %language, "custom language pattern matched");
            return Some(language.clone());
        }

        catalog::find(raw, &self.parse_languages).or_else(|| catalog::find_iso3(raw))
    }

    /// Renders an identity in the configured output representation.
    ///
    /// Identities the catalog cannot name fall back to their tag.
    #[must_use]
    pub fn format(&self, language: &Language) -> String {
        if let Some(text) = self.custom_format.get(language) {
            return text.clone();
        }

        match self.format {
            LanguageFormat::Code => language.code(),
            LanguageFormat::Tag => language.tag(),
            LanguageFormat::Iso3 => catalog::iso3(language)
                .map_or_else(|| language.tag(), str::to_string),
            LanguageFormat::DisplayName => catalog::display_name(language, self.display_language)
                .unwrap_or_else(|| language.tag()),
            LanguageFormat::DisplayLanguage => {
                catalog::display_language(language, self.display_language)
                    .map_or_else(|| language.tag(), str::to_string)
            }
        }
    }

    /// Parses then formats; unrecognized input is returned unchanged.
    #[must_use]
    pub fn normalize(&self, raw: &str) -> String {
        match self.parse(raw) {
            Some(language) => self.format(&language),
            None => raw.to_string(),
        }
    }

    #[must_use]
    pub fn output_format(&self) -> LanguageFormat {
        self.format
    }
}

impl Default for LanguageNormalizer {
    fn default() -> Self {
        Self {
            custom_parse: Vec::new(),
            parse_languages: DisplayLanguage::ALL.to_vec(),
            custom_format: HashMap::new(),
            format: LanguageFormat::DisplayName,
            display_language: DisplayLanguage::English,
        }
    }
}

impl Replacer<String> for LanguageNormalizer {
    fn replace(&self, value: &String) -> String {
        self.normalize(value)
    }
}

/// Builder for [`LanguageNormalizer`].
#[derive(Debug, Clone)]
pub struct LanguageNormalizerBuilder {
    custom_parse: Vec<(String, Language)>,
    parse_languages: Vec<DisplayLanguage>,
    custom_format: HashMap<Language, String>,
    format: LanguageFormat,
    display_language: DisplayLanguage,
}

impl Default for LanguageNormalizerBuilder {
    fn default() -> Self {
        let defaults = LanguageNormalizer::default();
        Self {
            custom_parse: Vec::new(),
            parse_languages: defaults.parse_languages,
            custom_format: defaults.custom_format,
            format: defaults.format,
            display_language: defaults.display_language,
        }
    }
}

impl LanguageNormalizerBuilder {
    /// Maps input matching `pattern` (whole input, case-insensitive) to
    /// `language`. Custom patterns are tried in insertion order.
    #[must_use]
    pub fn custom_parse(mut self, pattern: &str, language: Language) -> Self {
        self.custom_parse.push((pattern.to_string(), language));
        self
    }

    /// Overrides the output for one identity.
    #[must_use]
    pub fn custom_format(mut self, language: Language, text: &str) -> Self {
        self.custom_format.insert(language, text.to_string());
        self
    }

    /// Display languages whose names are accepted as input.
    #[must_use]
    pub fn parse_languages(mut self, languages: impl IntoIterator<Item = DisplayLanguage>) -> Self {
        self.parse_languages = languages.into_iter().collect();
        self
    }

    #[must_use]
    pub fn format(mut self, format: LanguageFormat) -> Self {
        self.format = format;
        self
    }

    #[must_use]
    pub fn display_language(mut self, display_language: DisplayLanguage) -> Self {
        self.display_language = display_language;
        self
    }

    /// Compiles the custom patterns.
    ///
    /// # Errors
    ///
    /// Returns an error if a custom pattern fails to compile.
    pub fn build(self) -> Result<LanguageNormalizer> {
        let custom_parse = self
            .custom_parse
            .into_iter()
            .map(|(pattern, language)| {
                let re = Regex::new(&format!("(?i)^(?:{pattern})$"))?;
                Ok((re, language))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(LanguageNormalizer {
            custom_parse,
            parse_languages: self.parse_languages,
            custom_format: self.custom_format,
            format: self.format,
            display_language: self.display_language,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_FORMATS: [LanguageFormat; 5] = [
        LanguageFormat::Code,
        LanguageFormat::Tag,
        LanguageFormat::Iso3,
        LanguageFormat::DisplayName,
        LanguageFormat::DisplayLanguage,
    ];

    fn normalizer(format: LanguageFormat, display: DisplayLanguage) -> LanguageNormalizer {
        LanguageNormalizer::builder()
            .format(format)
            .display_language(display)
            .build()
            .unwrap()
    }

    #[test]
    fn free_text_to_display_name() {
        let n = LanguageNormalizer::default();
        assert_eq!(n.normalize("german"), "German");
        assert_eq!(n.normalize("Deutsch"), "German");
        assert_eq!(n.normalize("deu"), "German");
        assert_eq!(n.normalize("de"), "German");
        assert_eq!(n.normalize("pt-br"), "Portuguese (Brazil)");
    }

    #[test]
    fn unknown_input_is_unchanged() {
        let n = LanguageNormalizer::default();
        assert_eq!(n.normalize("Klingon"), "Klingon");
        assert_eq!(n.normalize(""), "");
        assert_eq!(n.parse("   "), None);
    }

    #[test]
    fn custom_patterns_take_precedence() {
        let n = LanguageNormalizer::builder()
            .custom_parse("ger|vo-de", Language::new("de"))
            .custom_parse("español latino", Language::new("es").with_region("MX"))
            .format(LanguageFormat::Tag)
            .build()
            .unwrap();
        assert_eq!(n.normalize("GER"), "de");
        assert_eq!(n.normalize("Español Latino"), "es-MX");
        assert_eq!(n.normalize("gerx"), "gerx");
    }

    #[test]
    fn custom_format_overrides_output() {
        let n = LanguageNormalizer::builder()
            .custom_format(Language::new("en").with_region("US"), "English (US)")
            .build()
            .unwrap();
        assert_eq!(n.normalize("en-US"), "English (US)");
        assert_eq!(n.normalize("en-GB"), "English (United Kingdom)");
    }

    #[test]
    fn parse_languages_restrict_display_names() {
        let n = LanguageNormalizer::builder()
            .parse_languages([DisplayLanguage::English])
            .build()
            .unwrap();
        assert_eq!(n.parse("French"), Some(Language::new("fr")));
        assert_eq!(n.parse("Französisch"), None);
    }

    #[test]
    fn formats_in_german() {
        let n = normalizer(LanguageFormat::DisplayName, DisplayLanguage::German);
        assert_eq!(n.normalize("English"), "Englisch");
        assert_eq!(n.normalize("de_AT"), "Deutsch (Österreich)");
    }

    #[test]
    fn lossy_formats_drop_qualifiers() {
        let iso3 = normalizer(LanguageFormat::Iso3, DisplayLanguage::English);
        assert_eq!(iso3.normalize("Portuguese (Brazil)"), "por");
        let lang = normalizer(LanguageFormat::DisplayLanguage, DisplayLanguage::English);
        assert_eq!(lang.normalize("pt_BR"), "Portuguese");
    }

    #[test]
    fn invalid_custom_pattern_fails_build() {
        let result = LanguageNormalizer::builder()
            .custom_parse("(unclosed", Language::new("de"))
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn every_catalog_entry_round_trips() {
        for format in ALL_FORMATS {
            for display in DisplayLanguage::ALL {
                let n = normalizer(format, display);
                for language in catalog::known_languages() {
                    if !format.is_lossless() && language.is_qualified() {
                        continue;
                    }
                    let text = n.format(&language);
                    assert_eq!(
                        n.parse(&text).as_ref(),
                        Some(&language),
                        "{language} via {format:?}/{display:?} ({text:?})"
                    );
                }
            }
        }
    }

    #[test]
    fn normalize_is_idempotent() {
        for format in ALL_FORMATS {
            let n = normalizer(format, DisplayLanguage::English);
            for raw in ["German", "deutsch", "pt_BR", "zh-Hant-TW", "por", "Klingon"] {
                let once = n.normalize(raw);
                assert_eq!(n.normalize(&once), once, "{raw} via {format:?}");
            }
        }
    }
}
