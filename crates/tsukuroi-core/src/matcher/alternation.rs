use std::sync::Arc;

use crate::error::{Result, TsukuroiError};
use crate::matcher::{MatchResult, Matcher};

/// Tries matchers in order; the first non-empty result wins.
#[derive(Debug, Clone)]
pub struct AlternationMatcher {
    matchers: Vec<Arc<dyn Matcher>>,
}

impl AlternationMatcher {
    /// # Errors
    ///
    /// Returns `TsukuroiError::EmptyMatcherList` if `matchers` is empty.
    pub fn new(matchers: Vec<Arc<dyn Matcher>>) -> Result<Self> {
        if matchers.is_empty() {
            return Err(TsukuroiError::EmptyMatcherList);
        }
        Ok(Self { matchers })
    }

    #[must_use]
    pub fn matchers(&self) -> &[Arc<dyn Matcher>] {
        &self.matchers
    }
}

impl Matcher for AlternationMatcher {
    fn match_text(&self, text: &str) -> MatchResult {
        self.matchers
            .iter()
            .map(|m| m.match_text(text))
            .find(|result| !result.is_empty())
            .unwrap_or_default()
    }
}
