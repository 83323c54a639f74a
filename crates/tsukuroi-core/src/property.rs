//! # Property Keys
//!
//! A [`PropertyKey`] names one field of one entity kind. Matchers capture
//! substrings under keys, mappers read them back, value parsers can be
//! registered per key.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Serialize, Serializer};

use crate::model::EntityType;

/// Immutable `(entity type, property name)` pair.
///
/// Ordered by type name, then property name, so maps keyed by it enumerate
/// deterministically.
#[derive(Clone, Copy)]
pub struct PropertyKey {
    entity_type: &'static EntityType,
    property: &'static str,
}

impl PropertyKey {
    #[must_use]
    pub const fn new(entity_type: &'static EntityType, property: &'static str) -> Self {
        Self {
            entity_type,
            property,
        }
    }

    #[must_use]
    pub fn entity_type(&self) -> &'static EntityType {
        self.entity_type
    }

    #[must_use]
    pub fn property(&self) -> &'static str {
        self.property
    }
}

impl PartialEq for PropertyKey {
    fn eq(&self, other: &Self) -> bool {
        self.entity_type == other.entity_type && self.property == other.property
    }
}

impl Eq for PropertyKey {}

impl Hash for PropertyKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.entity_type.hash(state);
        self.property.hash(state);
    }
}

impl PartialOrd for PropertyKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PropertyKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.entity_type
            .cmp(other.entity_type)
            .then_with(|| self.property.cmp(other.property))
    }
}

impl fmt::Debug for PropertyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.entity_type, self.property)
    }
}

impl fmt::Display for PropertyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.entity_type, self.property)
    }
}

impl Serialize for PropertyKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Keys of the shipped entity types.
pub mod keys {
    use super::PropertyKey;
    use crate::model::{
        EPISODE, MOVIE, NAMED_MEDIA, RELEASE, SEASON, SERIES, SUBTITLE, SUBTITLE_RELEASE,
    };

    pub const SERIES_NAME: PropertyKey = PropertyKey::new(&SERIES, "name");
    pub const SERIES_YEAR: PropertyKey = PropertyKey::new(&SERIES, "year");

    pub const SEASON_NUMBER: PropertyKey = PropertyKey::new(&SEASON, "number");
    pub const SEASON_TITLE: PropertyKey = PropertyKey::new(&SEASON, "title");

    pub const EPISODE_NUMBER_IN_SEASON: PropertyKey =
        PropertyKey::new(&EPISODE, "number_in_season");
    pub const EPISODE_NUMBER_IN_SERIES: PropertyKey =
        PropertyKey::new(&EPISODE, "number_in_series");
    pub const EPISODE_TITLE: PropertyKey = PropertyKey::new(&EPISODE, "title");
    pub const EPISODE_DATE: PropertyKey = PropertyKey::new(&EPISODE, "date");

    pub const MOVIE_NAME: PropertyKey = PropertyKey::new(&MOVIE, "name");
    pub const MOVIE_YEAR: PropertyKey = PropertyKey::new(&MOVIE, "year");

    pub const NAMED_MEDIA_NAME: PropertyKey = PropertyKey::new(&NAMED_MEDIA, "name");

    pub const RELEASE_TAGS: PropertyKey = PropertyKey::new(&RELEASE, "tags");
    pub const RELEASE_GROUP: PropertyKey = PropertyKey::new(&RELEASE, "group");
    pub const RELEASE_DATE: PropertyKey = PropertyKey::new(&RELEASE, "date");

    pub const SUBTITLE_LANGUAGE: PropertyKey = PropertyKey::new(&SUBTITLE, "language");
    pub const SUBTITLE_GROUP: PropertyKey = PropertyKey::new(&SUBTITLE, "group");
    pub const SUBTITLE_TAGS: PropertyKey = PropertyKey::new(&SUBTITLE, "tags");

    pub const SUBTITLE_RELEASE_TAGS: PropertyKey = PropertyKey::new(&SUBTITLE_RELEASE, "tags");
}
