use std::sync::Arc;

use tracing::debug;

use crate::error::Result;
use crate::mapper::Mapper;
use crate::mapper::episodes::MultiEpisodeMapper;
use crate::matcher::MatchResult;
use crate::model::{Episode, Media, Movie, NamedMedia, Season, Series, Shared, shared};
use crate::parser::ValueParserRegistry;
use crate::property::keys::{
    EPISODE_DATE, EPISODE_NUMBER_IN_SEASON, EPISODE_NUMBER_IN_SERIES, EPISODE_TITLE, MOVIE_NAME,
    MOVIE_YEAR, NAMED_MEDIA_NAME, SEASON_NUMBER, SEASON_TITLE, SERIES_NAME, SERIES_YEAR,
};

/// Keys whose presence makes a match result describe an episode.
pub const EPISODE_KEYS: [crate::property::PropertyKey; 4] = [
    EPISODE_NUMBER_IN_SEASON,
    EPISODE_NUMBER_IN_SERIES,
    EPISODE_DATE,
    EPISODE_TITLE,
];

/// Keys whose presence makes a match result describe a season.
pub const SEASON_KEYS: [crate::property::PropertyKey; 2] = [SEASON_NUMBER, SEASON_TITLE];

/// Maps `Series.name` (required) and `Series.year`.
#[derive(Debug, Clone)]
pub struct SeriesMapper {
    values: Arc<ValueParserRegistry>,
}

impl SeriesMapper {
    #[must_use]
    pub fn new(values: Arc<ValueParserRegistry>) -> Self {
        Self { values }
    }

    /// The series of `result`, if a name was captured.
    ///
    /// # Errors
    ///
    /// Returns an error if the name or year cannot be converted.
    pub fn map_optional(&self, result: &MatchResult) -> Result<Option<Shared<Series>>> {
        if !result.contains(&SERIES_NAME) {
            return Ok(None);
        }
        self.map(result).map(|series| Some(shared(series)))
    }
}

impl Mapper<Series> for SeriesMapper {
    fn map(&self, result: &MatchResult) -> Result<Series> {
        Ok(Series {
            name: self.values.parse_required(result, &SERIES_NAME)?,
            year: self.values.parse_match(result, &SERIES_YEAR)?,
        })
    }
}

/// Maps `Season.number` and `Season.title`, linked to the captured series.
#[derive(Debug, Clone)]
pub struct SeasonMapper {
    values: Arc<ValueParserRegistry>,
    series: SeriesMapper,
}

impl SeasonMapper {
    #[must_use]
    pub fn new(values: Arc<ValueParserRegistry>) -> Self {
        Self {
            series: SeriesMapper::new(values.clone()),
            values,
        }
    }

    /// Maps the season, linking it to an already mapped series.
    ///
    /// # Errors
    ///
    /// Returns an error if the number or title cannot be converted.
    pub fn map_with_series(
        &self,
        result: &MatchResult,
        series: Option<Shared<Series>>,
    ) -> Result<Season> {
        Ok(Season {
            series,
            number: self.values.parse_match(result, &SEASON_NUMBER)?,
            title: self.values.parse_match(result, &SEASON_TITLE)?,
        })
    }
}

impl Mapper<Season> for SeasonMapper {
    fn map(&self, result: &MatchResult) -> Result<Season> {
        let series = self.series.map_optional(result)?;
        self.map_with_series(result, series)
    }
}

/// Maps a single episode with its series and season.
///
/// The episode-number substring is parsed as one number; see
/// [`MultiEpisodeMapper`] for names covering several episodes.
#[derive(Debug, Clone)]
pub struct EpisodeMapper {
    values: Arc<ValueParserRegistry>,
    series: SeriesMapper,
    season: SeasonMapper,
}

impl EpisodeMapper {
    #[must_use]
    pub fn new(values: Arc<ValueParserRegistry>) -> Self {
        Self {
            series: SeriesMapper::new(values.clone()),
            season: SeasonMapper::new(values.clone()),
            values,
        }
    }

    /// Maps the series and the season of `result`, the season linked to the
    /// series. Both are created once per call.
    ///
    /// # Errors
    ///
    /// Returns an error if a captured value cannot be converted.
    pub fn map_parents(
        &self,
        result: &MatchResult,
    ) -> Result<(Option<Shared<Series>>, Option<Shared<Season>>)> {
        let series = self.series.map_optional(result)?;
        let season = if result.contains_any(&SEASON_KEYS) {
            Some(shared(self.season.map_with_series(result, series.clone())?))
        } else {
            None
        };
        Ok((series, season))
    }

    /// An episode of the given parents carrying the episode fields of
    /// `result` except the numbers.
    ///
    /// # Errors
    ///
    /// Returns an error if the title or date cannot be converted.
    pub fn map_unnumbered(
        &self,
        result: &MatchResult,
        series: Option<Shared<Series>>,
        season: Option<Shared<Season>>,
    ) -> Result<Episode> {
        Ok(Episode {
            series,
            season,
            number_in_season: None,
            number_in_series: None,
            title: self.values.parse_match(result, &EPISODE_TITLE)?,
            date: self.values.parse_match(result, &EPISODE_DATE)?,
        })
    }
}

impl Mapper<Episode> for EpisodeMapper {
    fn map(&self, result: &MatchResult) -> Result<Episode> {
        let (series, season) = self.map_parents(result)?;
        let mut episode = self.map_unnumbered(result, series, season)?;
        episode.number_in_season = self.values.parse_match(result, &EPISODE_NUMBER_IN_SEASON)?;
        episode.number_in_series = self.values.parse_match(result, &EPISODE_NUMBER_IN_SERIES)?;
        Ok(episode)
    }
}

/// Maps `Movie.name` (required) and `Movie.year`.
#[derive(Debug, Clone)]
pub struct MovieMapper {
    values: Arc<ValueParserRegistry>,
}

impl MovieMapper {
    #[must_use]
    pub fn new(values: Arc<ValueParserRegistry>) -> Self {
        Self { values }
    }
}

impl Mapper<Movie> for MovieMapper {
    fn map(&self, result: &MatchResult) -> Result<Movie> {
        Ok(Movie {
            name: self.values.parse_required(result, &MOVIE_NAME)?,
            year: self.values.parse_match(result, &MOVIE_YEAR)?,
        })
    }
}

/// Maps `NamedMedia.name` (required).
#[derive(Debug, Clone)]
pub struct NamedMediaMapper {
    values: Arc<ValueParserRegistry>,
}

impl NamedMediaMapper {
    #[must_use]
    pub fn new(values: Arc<ValueParserRegistry>) -> Self {
        Self { values }
    }
}

impl Mapper<NamedMedia> for NamedMediaMapper {
    fn map(&self, result: &MatchResult) -> Result<NamedMedia> {
        Ok(NamedMedia {
            name: self.values.parse_required(result, &NAMED_MEDIA_NAME)?,
        })
    }
}

/// Maps whatever media a match result describes.
///
/// Dispatch goes by the captured keys, most specific first: episode keys,
/// season keys, movie name, named-media name, series name. Episodes are
/// expanded by [`MultiEpisodeMapper`], so the result may hold several items.
/// A result without any media key maps to no media.
#[derive(Debug, Clone)]
pub struct MediaMapper {
    episodes: MultiEpisodeMapper,
    season: SeasonMapper,
    movie: MovieMapper,
    named: NamedMediaMapper,
    series: SeriesMapper,
}

impl MediaMapper {
    /// # Errors
    ///
    /// Returns an error if the episode-number pattern fails to compile.
    pub fn new(values: Arc<ValueParserRegistry>) -> Result<Self> {
        Ok(Self {
            episodes: MultiEpisodeMapper::new(values.clone())?,
            season: SeasonMapper::new(values.clone()),
            movie: MovieMapper::new(values.clone()),
            named: NamedMediaMapper::new(values.clone()),
            series: SeriesMapper::new(values),
        })
    }
}

impl Mapper<Vec<Media>> for MediaMapper {
    fn map(&self, result: &MatchResult) -> Result<Vec<Media>> {
        if result.contains_any(&EPISODE_KEYS) {
            let episodes = self.episodes.map(result)?;
            return Ok(episodes.into_iter().map(Media::Episode).collect());
        }
        if result.contains_any(&SEASON_KEYS) {
            return Ok(vec![Media::Season(shared(self.season.map(result)?))]);
        }
        if result.contains(&MOVIE_NAME) {
            return Ok(vec![Media::Movie(shared(self.movie.map(result)?))]);
        }
        if result.contains(&NAMED_MEDIA_NAME) {
            return Ok(vec![Media::Named(shared(self.named.map(result)?))]);
        }
        if result.contains(&SERIES_NAME) {
            return Ok(vec![Media::Series(shared(self.series.map(result)?))]);
        }
        debug!(%result, "match result names no media");
        Ok(Vec::new())
    }
}
