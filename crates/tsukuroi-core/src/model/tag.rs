use std::fmt;

use serde::{Deserialize, Serialize};

/// An atomic label of a release or subtitle name ("720p", "WEB-DL", "H.264").
///
/// Tags compare by value; lists of tags keep the order they appear in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Tag {
    /// The label as written in names.
    pub name: String,
    /// Optional long form ("HI" → "Hearing Impaired").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub long_name: Option<String>,
}

impl Tag {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            long_name: None,
        }
    }

    #[must_use]
    pub fn with_long_name(name: impl Into<String>, long_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            long_name: Some(long_name.into()),
        }
    }

    /// Builds a tag list from names.
    pub fn list<I, S>(names: I) -> Vec<Tag>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        names.into_iter().map(Tag::new).collect()
    }

    /// Joins tag names with `separator`.
    #[must_use]
    pub fn join(tags: &[Tag], separator: &str) -> String {
        tags.iter()
            .map(|t| t.name.as_str())
            .collect::<Vec<_>>()
            .join(separator)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// A release or subtitle group ("DIMENSION", "SubCentral").
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Group {
    pub name: String,
}

impl Group {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
