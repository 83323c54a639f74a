pub mod entity;
pub mod media;
pub mod release;
pub mod subtitle;
pub mod tag;
pub mod value;

pub use entity::{
    Entity, EntityId, EntityRef, EntitySnapshot, EntityType, Property, Shared, shared,
};
pub use media::{
    EPISODE, Episode, MEDIA, MOVIE, Media, Movie, NAMED_MEDIA, NamedMedia, SEASON, SERIES, Season,
    Series,
};
pub use release::{RELEASE, Release};
pub use subtitle::{SUBTITLE, SUBTITLE_RELEASE, Subtitle, SubtitleRelease};
pub use tag::{Group, Tag};
pub use value::{FromValue, Value};
