use chrono::NaiveDate;

use crate::model::entity::{Entity, EntityRef, EntityType, Property, Shared};
use crate::model::value::{FromValue, Value};

/// Supertype of everything a release can contain.
pub const MEDIA: EntityType = EntityType::root("Media");
pub const SERIES: EntityType = EntityType::child("Series", &MEDIA);
pub const SEASON: EntityType = EntityType::child("Season", &MEDIA);
pub const EPISODE: EntityType = EntityType::child("Episode", &MEDIA);
pub const MOVIE: EntityType = EntityType::child("Movie", &MEDIA);
pub const NAMED_MEDIA: EntityType = EntityType::child("NamedMedia", &MEDIA);

/// A TV series.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Series {
    pub name: String,
    /// Disambiguating year ("Castle (2009)").
    pub year: Option<i32>,
}

impl Series {
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            year: None,
        }
    }
}

static SERIES_PROPERTIES: &[Property<Series>] = &[
    Property::new(
        "name",
        |s| Value::from(s.name.clone()),
        |s, v| {
            s.name = String::from_value(v)?;
            Ok(())
        },
    ),
    Property::new(
        "year",
        |s| Value::from(s.year),
        |s, v| {
            s.year = Option::from_value(v)?;
            Ok(())
        },
    ),
];

impl Entity for Series {
    const TYPE: &'static EntityType = &SERIES;

    fn properties() -> &'static [Property<Self>] {
        SERIES_PROPERTIES
    }
}

/// A season of a series.
#[derive(Debug, Clone, Default)]
pub struct Season {
    pub series: Option<Shared<Series>>,
    pub number: Option<u32>,
    /// Named seasons ("Specials").
    pub title: Option<String>,
}

static SEASON_PROPERTIES: &[Property<Season>] = &[
    Property::new(
        "number",
        |s| Value::from(s.number),
        |s, v| {
            s.number = Option::from_value(v)?;
            Ok(())
        },
    ),
    Property::new(
        "title",
        |s| Value::from(s.title.clone()),
        |s, v| {
            s.title = Option::from_value(v)?;
            Ok(())
        },
    ),
];

impl Entity for Season {
    const TYPE: &'static EntityType = &SEASON;

    fn properties() -> &'static [Property<Self>] {
        SEASON_PROPERTIES
    }
}

/// A single episode, optionally linked to its series and season.
#[derive(Debug, Clone, Default)]
pub struct Episode {
    pub series: Option<Shared<Series>>,
    pub season: Option<Shared<Season>>,
    pub number_in_season: Option<u32>,
    pub number_in_series: Option<u32>,
    pub title: Option<String>,
    /// Air date, for daily shows.
    pub date: Option<NaiveDate>,
}

static EPISODE_PROPERTIES: &[Property<Episode>] = &[
    Property::new(
        "number_in_season",
        |e| Value::from(e.number_in_season),
        |e, v| {
            e.number_in_season = Option::from_value(v)?;
            Ok(())
        },
    ),
    Property::new(
        "number_in_series",
        |e| Value::from(e.number_in_series),
        |e, v| {
            e.number_in_series = Option::from_value(v)?;
            Ok(())
        },
    ),
    Property::new(
        "title",
        |e| Value::from(e.title.clone()),
        |e, v| {
            e.title = Option::from_value(v)?;
            Ok(())
        },
    ),
    Property::new(
        "date",
        |e| Value::from(e.date),
        |e, v| {
            e.date = Option::from_value(v)?;
            Ok(())
        },
    ),
];

impl Entity for Episode {
    const TYPE: &'static EntityType = &EPISODE;

    fn properties() -> &'static [Property<Self>] {
        EPISODE_PROPERTIES
    }
}

/// A movie.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Movie {
    pub name: String,
    pub year: Option<i32>,
}

static MOVIE_PROPERTIES: &[Property<Movie>] = &[
    Property::new(
        "name",
        |m| Value::from(m.name.clone()),
        |m, v| {
            m.name = String::from_value(v)?;
            Ok(())
        },
    ),
    Property::new(
        "year",
        |m| Value::from(m.year),
        |m, v| {
            m.year = Option::from_value(v)?;
            Ok(())
        },
    ),
];

impl Entity for Movie {
    const TYPE: &'static EntityType = &MOVIE;

    fn properties() -> &'static [Property<Self>] {
        MOVIE_PROPERTIES
    }
}

/// Media known only by its name (concerts, documentaries, one-offs).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NamedMedia {
    pub name: String,
}

static NAMED_MEDIA_PROPERTIES: &[Property<NamedMedia>] = &[Property::new(
    "name",
    |m| Value::from(m.name.clone()),
    |m, v| {
        m.name = String::from_value(v)?;
        Ok(())
    },
)];

impl Entity for NamedMedia {
    const TYPE: &'static EntityType = &NAMED_MEDIA;

    fn properties() -> &'static [Property<Self>] {
        NAMED_MEDIA_PROPERTIES
    }
}

/// A media item contained in a release or addressed by a subtitle.
#[derive(Debug, Clone)]
pub enum Media {
    Series(Shared<Series>),
    Season(Shared<Season>),
    Episode(Shared<Episode>),
    Movie(Shared<Movie>),
    Named(Shared<NamedMedia>),
}

impl Media {
    /// Type-erased handle sharing identity with the wrapped entity.
    #[must_use]
    pub fn entity(&self) -> EntityRef {
        match self {
            Self::Series(s) => EntityRef::new(s),
            Self::Season(s) => EntityRef::new(s),
            Self::Episode(e) => EntityRef::new(e),
            Self::Movie(m) => EntityRef::new(m),
            Self::Named(n) => EntityRef::new(n),
        }
    }

    #[must_use]
    pub fn as_episode(&self) -> Option<&Shared<Episode>> {
        match self {
            Self::Episode(e) => Some(e),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_movie(&self) -> Option<&Shared<Movie>> {
        match self {
            Self::Movie(m) => Some(m),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_season(&self) -> Option<&Shared<Season>> {
        match self {
            Self::Season(s) => Some(s),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::shared;

    #[test]
    fn media_entity_shares_identity() {
        let episode = shared(Episode::default());
        let media = Media::Episode(episode.clone());
        assert_eq!(media.entity().id(), EntityRef::new(&episode).id());
        assert_eq!(media.entity().entity_type(), &EPISODE);
    }

    #[test]
    fn episode_accessors_round_trip_values() {
        let entity = EntityRef::from_entity(Episode::default());
        entity.set("number_in_season", Value::Int(3)).unwrap();
        entity.set("title", Value::from("Pilot")).unwrap();
        let date = NaiveDate::from_ymd_opt(2014, 5, 2).unwrap();
        entity.set("date", Value::Date(date)).unwrap();

        assert_eq!(entity.get("number_in_season").unwrap(), Value::Int(3));
        assert_eq!(entity.get("title").unwrap(), Value::from("Pilot"));
        assert_eq!(entity.get("date").unwrap(), Value::Date(date));
        assert_eq!(entity.get("number_in_series").unwrap(), Value::Null);
    }
}
