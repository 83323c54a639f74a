//! # Pattern Catalog
//!
//! Shipped matchers for scene-style names:
//!
//! | Shape               | Example                                   |
//! |---------------------|-------------------------------------------|
//! | episode `SxxEyy`    | `Psych.S01E05`, `Show.S01E01-E03`         |
//! | episode `NxMM`      | `Psych 1x05`                              |
//! | daily episode       | `The.Daily.Show.2012.03.05`               |
//! | season pack         | `Psych.S02`                               |
//! | movie               | `Heat.1995`                               |
//!
//! Series names may carry a year (`Castle.2009`), split off by a nested
//! matcher. Release matchers append `.tags-GROUP` to every media matcher,
//! subtitle-file matchers append `.Language[.HI]-SubGroup` to every release
//! matcher.

use std::sync::Arc;

use crate::error::Result;
use crate::mapper::{MediaMapper, ReleaseMapper, SubtitleReleaseMapper};
use crate::matcher::{AlternationMatcher, Matcher, MatcherExtension, PatternMatcher};
use crate::model::{Media, Release, Shared, SubtitleRelease, Value};
use crate::parser::{ParsingService, ValueParserRegistry};
use crate::property::PropertyKey;
use crate::property::keys::{
    EPISODE_DATE, EPISODE_NUMBER_IN_SEASON, EPISODE_TITLE, MOVIE_NAME, MOVIE_YEAR,
    NAMED_MEDIA_NAME, RELEASE_GROUP, RELEASE_TAGS, SEASON_NUMBER, SEASON_TITLE, SERIES_NAME,
    SERIES_YEAR, SUBTITLE_GROUP, SUBTITLE_LANGUAGE, SUBTITLE_RELEASE_TAGS,
};

const SERIES_WITH_YEAR: &str = r"(.+?)[\. _]\(?((?:19|20)\d{2})\)?";
const ANY_NAME: &str = r"(.+)";

const EPISODE_SXXEYY: &str =
    r"(?i)(.+?)[\. _-]+S(\d{1,2})[\. _-]?E(\d{1,3}(?:(?:[-+]E?|E)\d{1,3})*)";
const EPISODE_NXMM: &str = r"(?i)(.+?)[\. _-]+(\d{1,2})x(\d{2,3}(?:(?:[-+]x?|x)\d{2,3})*)";
const EPISODE_DAILY: &str = r"(.+?)[\. _-]+((?:19|20)\d{2}[\.-]\d{2}[\.-]\d{2})";
const SEASON_PACK: &str = r"(?i)(.+?)[\. _-]+(?:S|Season[\. _-]?)(\d{1,2})";
const MOVIE_WITH_YEAR: &str = r"(.+?)[\. _-]+\(?((?:19|20)\d{2})\)?";

const RELEASE_SUFFIX: &str = r"(?:[\. ](.+?))?-([\w,]+)";
const SUBTITLE_SUFFIX: &str =
    r"\.([A-Za-z]{2,}(?:-[A-Za-z]{2,4})?)(?:\.(HI|SDH))?-(\w+)(?:\.(?:srt|sub|ass|ssa|idx))?";

/// Name fields whose separators are dots or underscores in scene names.
const NAME_KEYS: [PropertyKey; 5] = [
    SERIES_NAME,
    SEASON_TITLE,
    EPISODE_TITLE,
    MOVIE_NAME,
    NAMED_MEDIA_NAME,
];

/// Value parsers for scene names: name fields get their separators turned
/// into single spaces.
///
/// # Errors
///
/// Returns `TsukuroiError::RegexError` if the default tokenizer fails to
/// compile (should never happen).
pub fn standard_values() -> Result<ValueParserRegistry> {
    NAME_KEYS
        .into_iter()
        .fold(ValueParserRegistry::builder(), |builder, key| {
            builder.key_parser(key, spaced_name)
        })
        .build()
}

fn spaced_name(raw: &str) -> Option<Value> {
    let name = raw
        .split(['.', '_', ' '])
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    (!name.is_empty()).then_some(Value::Text(name))
}

/// Splits a captured series name into name and optional year.
///
/// # Errors
///
/// Returns an error if a shipped pattern fails to compile (should never
/// happen).
pub fn series_name_matcher() -> Result<AlternationMatcher> {
    AlternationMatcher::new(vec![
        Arc::new(PatternMatcher::new(SERIES_WITH_YEAR, &[SERIES_NAME, SERIES_YEAR])?),
        Arc::new(PatternMatcher::new(ANY_NAME, &[SERIES_NAME])?),
    ])
}

fn with_series(
    pattern: &str,
    series: &Arc<dyn Matcher>,
    keys: &[PropertyKey],
) -> Result<PatternMatcher> {
    keys.iter()
        .enumerate()
        .fold(
            PatternMatcher::builder(pattern).nested(1, series.clone()),
            |builder, (i, key)| builder.key(i + 2, *key),
        )
        .build()
}

/// Media matchers in priority order, without the named-media fallback.
///
/// # Errors
///
/// Returns an error if a shipped pattern fails to compile (should never
/// happen).
pub fn media_patterns() -> Result<Vec<PatternMatcher>> {
    let series: Arc<dyn Matcher> = Arc::new(series_name_matcher()?);
    Ok(vec![
        with_series(
            EPISODE_SXXEYY,
            &series,
            &[SEASON_NUMBER, EPISODE_NUMBER_IN_SEASON],
        )?,
        with_series(
            EPISODE_NXMM,
            &series,
            &[SEASON_NUMBER, EPISODE_NUMBER_IN_SEASON],
        )?,
        with_series(EPISODE_DAILY, &series, &[EPISODE_DATE])?,
        with_series(SEASON_PACK, &series, &[SEASON_NUMBER])?,
        PatternMatcher::new(MOVIE_WITH_YEAR, &[MOVIE_NAME, MOVIE_YEAR])?,
    ])
}

/// Matcher for bare media names. Anything not recognized becomes named
/// media.
///
/// # Errors
///
/// Returns an error if a shipped pattern fails to compile (should never
/// happen).
pub fn media_matcher() -> Result<AlternationMatcher> {
    let mut matchers = erase(media_patterns()?);
    matchers.push(Arc::new(PatternMatcher::new(ANY_NAME, &[NAMED_MEDIA_NAME])?));
    AlternationMatcher::new(matchers)
}

/// Release matchers: every media matcher followed by `.tags-GROUP`.
///
/// # Errors
///
/// Returns an error if a shipped pattern fails to compile (should never
/// happen).
pub fn release_patterns() -> Result<Vec<PatternMatcher>> {
    MatcherExtension::suffix(RELEASE_SUFFIX, &[RELEASE_TAGS, RELEASE_GROUP])?
        .apply_all(&media_patterns()?)
}

/// # Errors
///
/// Returns an error if a shipped pattern fails to compile (should never
/// happen).
pub fn release_matcher() -> Result<AlternationMatcher> {
    AlternationMatcher::new(erase(release_patterns()?))
}

/// Subtitle-file matcher: every release matcher followed by the subtitle
/// language, an optional hearing-impaired marker and the subtitle group.
///
/// # Errors
///
/// Returns an error if a shipped pattern fails to compile (should never
/// happen).
pub fn subtitle_release_matcher() -> Result<AlternationMatcher> {
    let extension = MatcherExtension::suffix(
        SUBTITLE_SUFFIX,
        &[SUBTITLE_LANGUAGE, SUBTITLE_RELEASE_TAGS, SUBTITLE_GROUP],
    )?;
    AlternationMatcher::new(erase(extension.apply_all(&release_patterns()?)?))
}

fn erase(matchers: Vec<PatternMatcher>) -> Vec<Arc<dyn Matcher>> {
    matchers
        .into_iter()
        .map(|m| Arc::new(m) as Arc<dyn Matcher>)
        .collect()
}

/// The shipped parsing services, sharing one value parser registry.
#[derive(Debug, Clone)]
pub struct StandardParsers {
    pub values: Arc<ValueParserRegistry>,
    pub media: ParsingService<Vec<Media>>,
    pub releases: ParsingService<Vec<Shared<Release>>>,
    pub subtitle_releases: ParsingService<Shared<SubtitleRelease>>,
}

impl StandardParsers {
    /// Services using [`standard_values`].
    ///
    /// # Errors
    ///
    /// Returns an error if a shipped pattern fails to compile (should never
    /// happen).
    pub fn new() -> Result<Self> {
        Self::with_values(Arc::new(standard_values()?))
    }

    /// Services using the given value parsers.
    ///
    /// # Errors
    ///
    /// Returns an error if a shipped pattern fails to compile (should never
    /// happen).
    pub fn with_values(values: Arc<ValueParserRegistry>) -> Result<Self> {
        Ok(Self {
            media: ParsingService::new(
                "media",
                Arc::new(media_matcher()?),
                Arc::new(MediaMapper::new(values.clone())?),
            ),
            releases: ParsingService::new(
                "release",
                Arc::new(release_matcher()?),
                Arc::new(ReleaseMapper::new(values.clone())?),
            ),
            subtitle_releases: ParsingService::new(
                "subtitle file",
                Arc::new(subtitle_release_matcher()?),
                Arc::new(SubtitleReleaseMapper::new(values.clone())?),
            ),
            values,
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::model::{Group, Tag};

    fn parsers() -> StandardParsers {
        StandardParsers::new().unwrap()
    }

    fn single_release(name: &str) -> Shared<Release> {
        let mut releases = parsers().releases.parse(name).unwrap().unwrap();
        assert_eq!(releases.len(), 1, "{name}");
        releases.remove(0)
    }

    #[test]
    fn spaced_name_collapses_separators() {
        assert_eq!(spaced_name("The.Office_US"), Some(Value::from("The Office US")));
        assert_eq!(spaced_name(".."), None);
    }

    #[test]
    fn episode_release() {
        let release = single_release("Psych.S01E05.720p.HDTV.x264-IMMERSE");
        let release = release.read();
        assert_eq!(release.tags, Tag::list(["720p", "HDTV", "x264"]));
        assert_eq!(release.group, Some(Group::new("IMMERSE")));

        let episode = release.media[0].as_episode().unwrap().read();
        assert_eq!(episode.number_in_season, Some(5));
        assert_eq!(episode.season.as_ref().unwrap().read().number, Some(1));
        assert_eq!(episode.series.as_ref().unwrap().read().name, "Psych");
    }

    #[test]
    fn episode_range_shares_series() {
        let release = single_release("Show.S01E01-E03.720p.HDTV.x264-GRP");
        let release = release.read();
        let numbers: Vec<_> = release
            .media
            .iter()
            .map(|m| m.as_episode().unwrap().read().number_in_season)
            .collect();
        assert_eq!(numbers, vec![Some(1), Some(2), Some(3)]);

        let first = release.media[0].as_episode().unwrap().read();
        let last = release.media[2].as_episode().unwrap().read();
        assert!(Arc::ptr_eq(
            first.series.as_ref().unwrap(),
            last.series.as_ref().unwrap()
        ));
    }

    #[test]
    fn joined_episodes() {
        let release = single_release("Show.S01E01E02.720p-GRP");
        let numbers: Vec<_> = release
            .read()
            .media
            .iter()
            .map(|m| m.as_episode().unwrap().read().number_in_season)
            .collect();
        assert_eq!(numbers, vec![Some(1), Some(2)]);
    }

    #[test]
    fn series_year_is_split_off() {
        let release = single_release("Castle.2009.S03E11.HDTV.XviD-LOL");
        let release = release.read();
        let episode = release.media[0].as_episode().unwrap().read();
        let series = episode.series.as_ref().unwrap().read();
        assert_eq!(series.name, "Castle");
        assert_eq!(series.year, Some(2009));
    }

    #[test]
    fn daily_episode() {
        let release = single_release("The.Daily.Show.2012.03.05.HDTV.x264-LMAO");
        let release = release.read();
        let episode = release.media[0].as_episode().unwrap().read();
        assert_eq!(episode.date, NaiveDate::from_ymd_opt(2012, 3, 5));
        assert_eq!(
            episode.series.as_ref().unwrap().read().name,
            "The Daily Show"
        );
    }

    #[test]
    fn season_pack() {
        let release = single_release("Psych.S02.720p.BluRay.x264-SiNNERS");
        let release = release.read();
        let season = release.media[0].as_season().unwrap().read();
        assert_eq!(season.number, Some(2));
    }

    #[test]
    fn movie_release() {
        let release = single_release("Heat.1995.1080p.BluRay.x264-GRP");
        let release = release.read();
        let movie = release.media[0].as_movie().unwrap().read();
        assert_eq!(movie.name, "Heat");
        assert_eq!(movie.year, Some(1995));
    }

    #[test]
    fn group_alternatives() {
        let releases = parsers()
            .releases
            .parse("Psych.S01E05.720p.HDTV.x264-LOL,DIMENSION")
            .unwrap()
            .unwrap();
        assert_eq!(releases.len(), 2);
    }

    #[test]
    fn subtitle_file() {
        let file = parsers()
            .subtitle_releases
            .parse("Psych.S01E01E02.720p.HDTV.x264-IMMERSE.German.HI-SubCentral")
            .unwrap()
            .unwrap();
        let file = file.read();
        assert_eq!(file.tags, Tag::list(["HI"]));
        assert_eq!(file.subtitles.len(), 2);
        assert_eq!(file.matching_releases[0].read().group, Some(Group::new("IMMERSE")));

        let subtitle = file.subtitles[0].read();
        assert_eq!(subtitle.language.as_deref(), Some("German"));
        assert_eq!(subtitle.group, Some(Group::new("SubCentral")));
    }

    #[test]
    fn bare_media_names() {
        let parsers = parsers();
        let media = parsers.media.parse("Psych 1x05").unwrap().unwrap();
        assert_eq!(media[0].as_episode().unwrap().read().number_in_season, Some(5));

        let media = parsers.media.parse("Some Documentary").unwrap().unwrap();
        assert!(matches!(&media[0], Media::Named(named) if named.read().name == "Some Documentary"));
    }

    #[test]
    fn unrelated_text_is_no_release() {
        assert!(parsers().releases.parse("just some words").unwrap().is_none());
    }
}
