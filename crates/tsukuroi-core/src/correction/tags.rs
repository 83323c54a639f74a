//! # Tag Sequence Replacement
//!
//! Finds a query sequence in an ordered tag list and replaces it, either in
//! place or by swapping out the whole list.

use serde::{Deserialize, Serialize};

use crate::correction::Replacer;
use crate::error::{Result, TsukuroiError};
use crate::model::Tag;

/// When a tag list counts as matching the query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryMode {
    /// The whole list is the query.
    Equals,
    /// The query occurs inside the list.
    #[default]
    Contains,
}

/// What a match replaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplaceScope {
    /// The list becomes the replacement.
    WholeList,
    /// Every matched window is spliced out for the replacement.
    #[default]
    MatchedSequence,
}

/// Replaces occurrences of a tag sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagSequenceReplacer {
    query: Vec<Tag>,
    replacement: Vec<Tag>,
    mode: QueryMode,
    scope: ReplaceScope,
    ignore_order: bool,
}

impl TagSequenceReplacer {
    /// An order-sensitive replacer of contiguous occurrences of `query`.
    ///
    /// # Errors
    ///
    /// Returns `TsukuroiError::EmptyTagQuery` if `query` is empty.
    pub fn new(query: Vec<Tag>, replacement: Vec<Tag>) -> Result<Self> {
        if query.is_empty() {
            return Err(TsukuroiError::EmptyTagQuery);
        }
        Ok(Self {
            query,
            replacement,
            mode: QueryMode::default(),
            scope: ReplaceScope::default(),
            ignore_order: false,
        })
    }

    /// Shorthand for tags given by name.
    ///
    /// # Errors
    ///
    /// Returns `TsukuroiError::EmptyTagQuery` if `query` is empty.
    pub fn from_names(query: &[&str], replacement: &[&str]) -> Result<Self> {
        Self::new(Tag::list(query.iter().copied()), Tag::list(replacement.iter().copied()))
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

    #[must_use]
    pub fn query(&self) -> &[Tag] {
        &self.query
    }

    #[must_use]
    pub fn replacement(&self) -> &[Tag] {
        &self.replacement
    }

    /// Returns the list with the configured replacement applied.
    #[must_use]
    pub fn apply(&self, tags: &[Tag]) -> Vec<Tag> {
        if tags.is_empty() {
            return Vec::new();
        }
        match (self.mode, self.scope) {
            (QueryMode::Equals, _) => {
                if self.window_matches(tags) {
                    self.replacement.clone()
                } else {
                    tags.to_vec()
                }
            }
            (QueryMode::Contains, ReplaceScope::WholeList) => {
                if self.contained_in(tags) {
                    self.replacement.clone()
                } else {
                    tags.to_vec()
                }
            }
            (QueryMode::Contains, ReplaceScope::MatchedSequence) => self.splice(tags),
        }
    }

    fn window_matches(&self, window: &[Tag]) -> bool {
        if window.len() != self.query.len() {
            return false;
        }
        if self.ignore_order {
            sorted(window) == sorted(&self.query)
        } else {
            window == self.query.as_slice()
        }
    }

    fn contained_in(&self, tags: &[Tag]) -> bool {
        if self.ignore_order {
            let mut remaining: Vec<&Tag> = tags.iter().collect();
            self.query.iter().all(|wanted| {
                match remaining.iter().position(|tag| *tag == wanted) {
                    Some(index) => {
                        remaining.swap_remove(index);
                        true
                    }
                    None => false,
                }
            })
        } else {
            tags.windows(self.query.len()).any(|w| w == self.query.as_slice())
        }
    }

    fn splice(&self, tags: &[Tag]) -> Vec<Tag> {
        let width = self.query.len();
        let mut out = Vec::with_capacity(tags.len());
        let mut i = 0;
        while i < tags.len() {
            if i + width <= tags.len() && self.window_matches(&tags[i..i + width]) {
                out.extend(self.replacement.iter().cloned());
                i += width;
            } else {
                out.push(tags[i].clone());
                i += 1;
            }
        }
        out
    }
}

fn sorted(tags: &[Tag]) -> Vec<&Tag> {
    let mut sorted: Vec<&Tag> = tags.iter().collect();
    sorted.sort();
    sorted
}

impl Replacer<Vec<Tag>> for TagSequenceReplacer {
    fn replace(&self, value: &Vec<Tag>) -> Vec<Tag> {
        self.apply(value)
    }
}

/// Removes repeated tags, keeping the first occurrence of each.
#[derive(Debug, Clone, Copy, Default)]
pub struct TagDeduplicator;

impl TagDeduplicator {
    #[must_use]
    pub fn apply(&self, tags: &[Tag]) -> Vec<Tag> {
        let mut out: Vec<Tag> = Vec::with_capacity(tags.len());
        for tag in tags {
            if !out.contains(tag) {
                out.push(tag.clone());
            }
        }
        out
    }
}

impl Replacer<Vec<Tag>> for TagDeduplicator {
    fn replace(&self, value: &Vec<Tag>) -> Vec<Tag> {
        self.apply(value)
    }
}
