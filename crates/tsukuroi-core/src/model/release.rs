use chrono::NaiveDate;

use crate::model::entity::{Entity, EntityType, Property};
use crate::model::media::Media;
use crate::model::tag::{Group, Tag};
use crate::model::value::{FromValue, Value};

pub const RELEASE: EntityType = EntityType::root("Release");

/// A scene or P2P release of one or more media items.
#[derive(Debug, Clone, Default)]
pub struct Release {
    pub media: Vec<Media>,
    pub tags: Vec<Tag>,
    pub group: Option<Group>,
    /// Pre date.
    pub date: Option<NaiveDate>,
}

impl Release {
    /// Tag names joined with `.`, as they appear in release names.
    #[must_use]
    pub fn tag_string(&self) -> String {
        Tag::join(&self.tags, ".")
    }
}

static RELEASE_PROPERTIES: &[Property<Release>] = &[
    Property::new(
        "tags",
        |r| Value::from(r.tags.clone()),
        |r, v| {
            r.tags = Vec::from_value(v)?;
            Ok(())
        },
    ),
    Property::new(
        "group",
        |r| Value::from(r.group.clone()),
        |r, v| {
            r.group = Option::from_value(v)?;
            Ok(())
        },
    ),
    Property::new(
        "date",
        |r| Value::from(r.date),
        |r, v| {
            r.date = Option::from_value(v)?;
            Ok(())
        },
    ),
];

impl Entity for Release {
    const TYPE: &'static EntityType = &RELEASE;

    fn properties() -> &'static [Property<Self>] {
        RELEASE_PROPERTIES
    }
}
