use std::sync::Arc;

use crate::error::Result;
use crate::mapper::Mapper;
use crate::mapper::media::MediaMapper;
use crate::matcher::MatchResult;
use crate::model::{Group, Release, Shared, Tag, shared};
use crate::parser::ValueParserRegistry;
use crate::property::keys::{RELEASE_DATE, RELEASE_GROUP, RELEASE_TAGS};

/// Maps releases with their media, tags and group.
///
/// A group field listing several groups ("LOL,DIMENSION") describes
/// alternative releases of the same content: one release is produced per
/// group, all sharing the same media entities and equal tags.
#[derive(Debug, Clone)]
pub struct ReleaseMapper {
    values: Arc<ValueParserRegistry>,
    media: MediaMapper,
}

impl ReleaseMapper {
    /// # Errors
    ///
    /// Returns an error if the media mapper cannot be built.
    pub fn new(values: Arc<ValueParserRegistry>) -> Result<Self> {
        Ok(Self {
            media: MediaMapper::new(values.clone())?,
            values,
        })
    }

    fn groups(&self, result: &MatchResult) -> Result<Vec<Option<Group>>> {
        let Some(raw) = result.get(&RELEASE_GROUP) else {
            return Ok(vec![None]);
        };
        let groups = raw
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(|name| self.values.parse::<Group>(name, &RELEASE_GROUP).map(Some))
            .collect::<Result<Vec<_>>>()?;

        if groups.is_empty() {
            Ok(vec![None])
        } else {
            Ok(groups)
        }
    }
}

impl Mapper<Vec<Shared<Release>>> for ReleaseMapper {
    fn map(&self, result: &MatchResult) -> Result<Vec<Shared<Release>>> {
        let media = self.media.map(result)?;
        let tags: Vec<Tag> = self.values.parse_list_match(result, &RELEASE_TAGS);
        let date = self.values.parse_match(result, &RELEASE_DATE)?;

        Ok(self
            .groups(result)?
            .into_iter()
            .map(|group| {
                shared(Release {
                    media: media.clone(),
                    tags: tags.clone(),
                    group,
                    date,
                })
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::keys::{EPISODE_NUMBER_IN_SEASON, SEASON_NUMBER, SERIES_NAME};

    fn mapper() -> ReleaseMapper {
        ReleaseMapper::new(Arc::new(ValueParserRegistry::new().unwrap())).unwrap()
    }

    fn episode_result(group: &str) -> MatchResult {
        [
            (SERIES_NAME, "Psych"),
            (SEASON_NUMBER, "01"),
            (EPISODE_NUMBER_IN_SEASON, "05"),
            (RELEASE_TAGS, "720p.HDTV.x264"),
            (RELEASE_GROUP, group),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn single_group_single_release() {
        let releases = mapper().map(&episode_result("IMMERSE")).unwrap();
        assert_eq!(releases.len(), 1);
        let release = releases[0].read();
        assert_eq!(release.group, Some(Group::new("IMMERSE")));
        assert_eq!(release.tag_string(), "720p.HDTV.x264");
        assert_eq!(release.media.len(), 1);
    }

    #[test]
    fn comma_separated_groups_share_media() {
        let releases = mapper().map(&episode_result("LOL,DIMENSION")).unwrap();
        assert_eq!(releases.len(), 2);

        let first = releases[0].read();
        let second = releases[1].read();
        assert_eq!(first.group, Some(Group::new("LOL")));
        assert_eq!(second.group, Some(Group::new("DIMENSION")));
        assert_eq!(first.tags, second.tags);
        assert_eq!(first.media[0].entity().id(), second.media[0].entity().id());
    }

    #[test]
    fn missing_group_still_yields_release() {
        let result: MatchResult = [(SERIES_NAME, "Psych"), (SEASON_NUMBER, "2")]
            .into_iter()
            .collect();
        let releases = mapper().map(&result).unwrap();
        assert_eq!(releases.len(), 1);
        assert!(releases[0].read().group.is_none());
        assert!(releases[0].read().tags.is_empty());
    }
}
