use std::sync::Arc;

use crate::error::Result;
use crate::mapper::Mapper;
use crate::mapper::release::ReleaseMapper;
use crate::matcher::MatchResult;
use crate::model::{Group, Shared, Subtitle, SubtitleRelease, Tag, shared};
use crate::parser::ValueParserRegistry;
use crate::property::keys::{
    SUBTITLE_GROUP, SUBTITLE_LANGUAGE, SUBTITLE_RELEASE_TAGS, SUBTITLE_TAGS,
};

/// Maps a subtitle file name.
///
/// The release part is mapped with [`ReleaseMapper`]; the resulting releases
/// become the matching releases. One subtitle is created per media item of
/// those releases, so a two-part release yields a file with two subtitles.
#[derive(Debug, Clone)]
pub struct SubtitleReleaseMapper {
    values: Arc<ValueParserRegistry>,
    releases: ReleaseMapper,
}

impl SubtitleReleaseMapper {
    /// # Errors
    ///
    /// Returns an error if the release mapper cannot be built.
    pub fn new(values: Arc<ValueParserRegistry>) -> Result<Self> {
        Ok(Self {
            releases: ReleaseMapper::new(values.clone())?,
            values,
        })
    }
}

impl Mapper<Shared<SubtitleRelease>> for SubtitleReleaseMapper {
    fn map(&self, result: &MatchResult) -> Result<Shared<SubtitleRelease>> {
        let matching_releases = self.releases.map(result)?;
        let media = matching_releases
            .first()
            .map(|release| release.read().media.clone())
            .unwrap_or_default();

        let language: Option<String> = self.values.parse_match(result, &SUBTITLE_LANGUAGE)?;
        let group: Option<Group> = self.values.parse_match(result, &SUBTITLE_GROUP)?;
        let tags: Vec<Tag> = self.values.parse_list_match(result, &SUBTITLE_TAGS);

        let template = Subtitle {
            media: None,
            language,
            group,
            tags,
        };
        let subtitles = if media.is_empty() {
            vec![shared(template)]
        } else {
            media
                .into_iter()
                .map(|item| {
                    shared(Subtitle {
                        media: Some(item),
                        ..template.clone()
                    })
                })
                .collect()
        };

        Ok(shared(SubtitleRelease {
            subtitles,
            matching_releases,
            tags: self.values.parse_list_match(result, &SUBTITLE_RELEASE_TAGS),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::keys::{
        EPISODE_NUMBER_IN_SEASON, RELEASE_GROUP, RELEASE_TAGS, SEASON_NUMBER, SERIES_NAME,
    };

    fn mapper() -> SubtitleReleaseMapper {
        SubtitleReleaseMapper::new(Arc::new(ValueParserRegistry::new().unwrap())).unwrap()
    }

    #[test]
    fn one_subtitle_per_media_item() {
        let result: MatchResult = [
            (SERIES_NAME, "Psych"),
            (SEASON_NUMBER, "01"),
            (EPISODE_NUMBER_IN_SEASON, "01 02"),
            (RELEASE_TAGS, "720p.HDTV.x264"),
            (RELEASE_GROUP, "IMMERSE"),
            (SUBTITLE_LANGUAGE, "German"),
            (SUBTITLE_RELEASE_TAGS, "HI"),
            (SUBTITLE_GROUP, "SubCentral"),
        ]
        .into_iter()
        .collect();

        let file = mapper().map(&result).unwrap();
        let file = file.read();
        assert_eq!(file.matching_releases.len(), 1);
        assert_eq!(file.subtitles.len(), 2);
        assert_eq!(file.tags, Tag::list(["HI"]));

        let release_media = file.matching_releases[0].read().media.clone();
        for (subtitle, media) in file.subtitles.iter().zip(&release_media) {
            let subtitle = subtitle.read();
            assert_eq!(subtitle.language.as_deref(), Some("German"));
            assert_eq!(subtitle.group, Some(Group::new("SubCentral")));
            assert_eq!(
                subtitle.media.as_ref().unwrap().entity().id(),
                media.entity().id()
            );
        }
    }

    #[test]
    fn subtitle_without_media() {
        let result: MatchResult = [(SUBTITLE_LANGUAGE, "de")].into_iter().collect();
        let file = mapper().map(&result).unwrap();
        let file = file.read();
        assert_eq!(file.subtitles.len(), 1);
        assert!(file.subtitles[0].read().media.is_none());
    }
}
