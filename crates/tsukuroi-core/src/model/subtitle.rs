use crate::model::entity::{Entity, EntityType, Property, Shared};
use crate::model::media::Media;
use crate::model::release::Release;
use crate::model::tag::{Group, Tag};
use crate::model::value::{FromValue, Value};

pub const SUBTITLE: EntityType = EntityType::root("Subtitle");
pub const SUBTITLE_RELEASE: EntityType = EntityType::root("SubtitleRelease");

/// A subtitle for one media item.
#[derive(Debug, Clone, Default)]
pub struct Subtitle {
    pub media: Option<Media>,
    /// Free-text language as found in the name ("de", "German", "VO").
    pub language: Option<String>,
    pub group: Option<Group>,
    pub tags: Vec<Tag>,
}

static SUBTITLE_PROPERTIES: &[Property<Subtitle>] = &[
    Property::new(
        "language",
        |s| Value::from(s.language.clone()),
        |s, v| {
            s.language = Option::from_value(v)?;
            Ok(())
        },
    ),
    Property::new(
        "group",
        |s| Value::from(s.group.clone()),
        |s, v| {
            s.group = Option::from_value(v)?;
            Ok(())
        },
    ),
    Property::new(
        "tags",
        |s| Value::from(s.tags.clone()),
        |s, v| {
            s.tags = Vec::from_value(v)?;
            Ok(())
        },
    ),
];

impl Entity for Subtitle {
    const TYPE: &'static EntityType = &SUBTITLE;

    fn properties() -> &'static [Property<Self>] {
        SUBTITLE_PROPERTIES
    }
}

/// A subtitle file: subtitles for every media item of the releases it fits.
#[derive(Debug, Clone, Default)]
pub struct SubtitleRelease {
    pub subtitles: Vec<Shared<Subtitle>>,
    /// Releases the file is synchronized to.
    pub matching_releases: Vec<Shared<Release>>,
    pub tags: Vec<Tag>,
}

static SUBTITLE_RELEASE_PROPERTIES: &[Property<SubtitleRelease>] = &[Property::new(
    "tags",
    |s| Value::from(s.tags.clone()),
    |s, v| {
        s.tags = Vec::from_value(v)?;
        Ok(())
    },
)];

impl Entity for SubtitleRelease {
    const TYPE: &'static EntityType = &SUBTITLE_RELEASE;

    fn properties() -> &'static [Property<Self>] {
        SUBTITLE_RELEASE_PROPERTIES
    }
}
