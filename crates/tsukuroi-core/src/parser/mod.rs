//! # Parsing Services
//!
//! A [`ParsingService`] pairs a matcher with a mapper: text in, structured
//! entities out. [`parse`] tries several services in order.

pub mod catalog;
pub mod values;

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::error::Result;
use crate::mapper::Mapper;
use crate::matcher::{MatchResult, Matcher};

pub use catalog::StandardParsers;
pub use values::{
    ParseTarget, Splitter, ValueParser, ValueParserRegistry, ValueParserRegistryBuilder, ValueType,
    default_parse,
};

/// Named matcher + mapper pair.
pub struct ParsingService<T> {
    name: String,
    matcher: Arc<dyn Matcher>,
    mapper: Arc<dyn Mapper<T>>,
}

impl<T> ParsingService<T> {
    pub fn new(
        name: impl Into<String>,
        matcher: Arc<dyn Matcher>,
        mapper: Arc<dyn Mapper<T>>,
    ) -> Self {
        Self {
            name: name.into(),
            matcher,
            mapper,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The raw match result for `text`, without mapping.
    #[must_use]
    pub fn match_text(&self, text: &str) -> MatchResult {
        self.matcher.match_text(text.trim())
    }

    /// Matches `text` and maps the result.
    ///
    /// Returns `Ok(None)` if the text is blank or does not match.
    ///
    /// # Errors
    ///
    /// Returns an error if the text matches but a captured substring cannot
    /// be converted.
    pub fn parse(&self, text: &str) -> Result<Option<T>> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(None);
        }
        let result = self.matcher.match_text(text);
        if result.is_empty() {
            debug!(service = %self.name, text, "no match");
            return Ok(None);
        }
        debug!(service = %self.name, %result, "matched");
        self.mapper.map(&result).map(Some)
    }
}

impl<T> Clone for ParsingService<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            matcher: self.matcher.clone(),
            mapper: self.mapper.clone(),
        }
    }
}

impl<T> fmt::Debug for ParsingService<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParsingService")
            .field("name", &self.name)
            .field("matcher", &self.matcher)
            .finish_non_exhaustive()
    }
}

/// Returns the result of the first service whose matcher accepts `text`.
///
/// # Errors
///
/// Returns the mapping error of the first matching service; later services
/// are not tried.
///
/// # Examples
///
/// ```
/// use tsukuroi_core::parser::{StandardParsers, parse};
///
/// let parsers = StandardParsers::new().unwrap();
/// let releases = parse("Psych.S01E05.720p.HDTV.x264-IMMERSE", &[parsers.releases.clone()])
///     .unwrap()
///     .unwrap();
/// assert_eq!(releases.len(), 1);
/// ```
pub fn parse<T>(text: &str, services: &[ParsingService<T>]) -> Result<Option<T>> {
    for service in services {
        if let Some(parsed) = service.parse(text)? {
            return Ok(Some(parsed));
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TsukuroiError;
    use crate::matcher::PatternMatcher;
    use crate::property::keys::{MOVIE_NAME, MOVIE_YEAR};

    fn year_service(name: &str, pattern: &str) -> ParsingService<i32> {
        let matcher = PatternMatcher::new(pattern, &[MOVIE_NAME, MOVIE_YEAR]).unwrap();
        let values = Arc::new(ValueParserRegistry::new().unwrap());
        ParsingService::new(
            name,
            Arc::new(matcher),
            Arc::new(move |result: &MatchResult| values.parse_required::<i32>(result, &MOVIE_YEAR)),
        )
    }

    #[test]
    fn blank_and_unmatched_text_is_none() {
        let service = year_service("dotted", r"(.+)\.(\d{4})");
        assert!(service.parse("   ").unwrap().is_none());
        assert!(service.parse("Heat").unwrap().is_none());
        assert_eq!(service.parse(" Heat.1995 ").unwrap(), Some(1995));
    }

    #[test]
    fn first_matching_service_wins() {
        let services = [
            year_service("spaced", r"(.+) \((\d{4})\)"),
            year_service("dotted", r"(.+)\.(\w{4})"),
        ];
        assert_eq!(parse("Heat (1995)", &services).unwrap(), Some(1995));
        assert_eq!(parse("Heat.1995", &services).unwrap(), Some(1995));
        assert_eq!(parse("Heat", &services).unwrap(), None);
    }

    #[test]
    fn mapping_errors_propagate() {
        let services = [year_service("dotted", r"(.+)\.(\w{4})")];
        assert!(matches!(
            parse("Heat.abcd", &services),
            Err(TsukuroiError::ValueParse { .. })
        ));
    }
}
