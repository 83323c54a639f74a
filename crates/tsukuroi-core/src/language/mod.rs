//! # Languages
//!
//! Canonical language identities, the shipped language catalog and the
//! [`LanguageNormalizer`] rule primitive that turns free-text language names
//! ("German", "Deutsch", "ger", "de") into one configured representation.

pub mod catalog;
pub mod normalizer;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TsukuroiError};

pub use normalizer::{LanguageNormalizer, LanguageNormalizerBuilder};

/// A language identity: language code plus optional script and region.
///
/// Stored normalized: language lowercase, script title case, region
/// uppercase. Serialized as its tag ("pt-BR").
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Language {
    language: String,
    script: Option<String>,
    region: Option<String>,
}

impl Language {
    /// An unqualified language ("de").
    #[must_use]
    pub fn new(language: &str) -> Self {
        Self {
            language: language.to_ascii_lowercase(),
            script: None,
            region: None,
        }
    }

    #[must_use]
    pub fn with_script(mut self, script: &str) -> Self {
        self.script = Some(title_case(script));
        self
    }

    #[must_use]
    pub fn with_region(mut self, region: &str) -> Self {
        self.region = Some(region.to_ascii_uppercase());
        self
    }

    /// Parses a tag or code such as `"pt-BR"`, `"pt_BR"` or `"zh-Hans-CN"`.
    ///
    /// # Errors
    ///
    /// Returns `TsukuroiError::InvalidLanguage` if a subtag is neither a
    /// 2–3 letter language, a 4 letter script nor a 2 letter / 3 digit region.
    pub fn parse_tag(tag: &str) -> Result<Self> {
        let invalid = || TsukuroiError::InvalidLanguage(tag.to_string());
        let mut parts = tag.trim().split(['-', '_']);

        let language = parts.next().filter(|p| is_alpha(p, 2..=3)).ok_or_else(invalid)?;
        let mut result = Self::new(language);

        for part in parts {
            if is_alpha(part, 4..=4) && result.script.is_none() && result.region.is_none() {
                result = result.with_script(part);
            } else if (is_alpha(part, 2..=2) || is_digits(part, 3))
                && result.region.is_none()
            {
                result = result.with_region(part);
            } else {
                return Err(invalid());
            }
        }

        Ok(result)
    }

    #[must_use]
    pub fn language(&self) -> &str {
        &self.language
    }

    #[must_use]
    pub fn script(&self) -> Option<&str> {
        self.script.as_deref()
    }

    #[must_use]
    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }

    /// Returns `true` if a script or region is present.
    #[must_use]
    pub fn is_qualified(&self) -> bool {
        self.script.is_some() || self.region.is_some()
    }

    /// Underscore-joined code ("pt_BR").
    #[must_use]
    pub fn code(&self) -> String {
        self.join("_")
    }

    /// Hyphen-joined tag ("pt-BR").
    #[must_use]
    pub fn tag(&self) -> String {
        self.join("-")
    }

    fn join(&self, separator: &str) -> String {
        let mut out = self.language.clone();
        for part in [&self.script, &self.region].into_iter().flatten() {
            out.push_str(separator);
            out.push_str(part);
        }
        out
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tag())
    }
}

impl TryFrom<String> for Language {
    type Error = TsukuroiError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse_tag(&value)
    }
}

impl From<Language> for String {
    fn from(value: Language) -> Self {
        value.tag()
    }
}

fn is_alpha(s: &str, len: std::ops::RangeInclusive<usize>) -> bool {
    len.contains(&s.len()) && s.bytes().all(|b| b.is_ascii_alphabetic())
}

fn is_digits(s: &str, len: usize) -> bool {
    s.len() == len && s.bytes().all(|b| b.is_ascii_digit())
}

fn title_case(s: &str) -> String {
    let lower = s.to_ascii_lowercase();
    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}

/// Language in which display names are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayLanguage {
    English,
    German,
}

impl DisplayLanguage {
    pub const ALL: [DisplayLanguage; 2] = [DisplayLanguage::English, DisplayLanguage::German];
}

impl fmt::Display for DisplayLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::English => write!(f, "English"),
            Self::German => write!(f, "German"),
        }
    }
}

/// Output representation of a normalized language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LanguageFormat {
    /// "pt_BR"
    Code,
    /// "pt-BR"
    Tag,
    /// "por" — drops script and region.
    Iso3,
    /// "Portuguese (Brazil)"
    DisplayName,
    /// "Portuguese" — drops script and region.
    DisplayLanguage,
}

impl LanguageFormat {
    /// Returns `false` for formats that drop script and region.
    #[must_use]
    pub fn is_lossless(self) -> bool {
        matches!(self, Self::Code | Self::Tag | Self::DisplayName)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_tag_normalizes_case() {
        let lang = Language::parse_tag("PT_br").unwrap();
        assert_eq!(lang, Language::new("pt").with_region("BR"));
        assert_eq!(lang.code(), "pt_BR");
        assert_eq!(lang.tag(), "pt-BR");
    }

    #[test]
    fn parse_tag_with_script_and_region() {
        let lang = Language::parse_tag("zh-hant-TW").unwrap();
        assert_eq!(lang.script(), Some("Hant"));
        assert_eq!(lang.region(), Some("TW"));
        assert_eq!(lang.to_string(), "zh-Hant-TW");
        assert!(lang.is_qualified());
    }

    #[test]
    fn parse_tag_rejects_garbage() {
        assert!(Language::parse_tag("").is_err());
        assert!(Language::parse_tag("german").is_err());
        assert!(Language::parse_tag("de-DE-AT").is_err());
        assert!(Language::parse_tag("de-1").is_err());
    }

    #[test]
    fn region_may_be_numeric() {
        let lang = Language::parse_tag("es-419").unwrap();
        assert_eq!(lang.region(), Some("419"));
    }

    #[test]
    fn serializes_as_tag() {
        let lang = Language::new("de").with_region("at");
        let json = serde_json::to_string(&lang).unwrap();
        assert_eq!(json, "\"de-AT\"");
        let back: Language = serde_json::from_str(&json).unwrap();
        assert_eq!(back, lang);
    }

    #[test]
    fn lossy_formats() {
        assert!(LanguageFormat::Tag.is_lossless());
        assert!(!LanguageFormat::Iso3.is_lossless());
        assert!(!LanguageFormat::DisplayLanguage.is_lossless());
    }
}
