use std::sync::Arc;

use regex::Regex;
use tracing::debug;

use crate::error::Result;
use crate::mapper::Mapper;
use crate::mapper::media::EpisodeMapper;
use crate::matcher::MatchResult;
use crate::model::{Episode, Shared, shared};
use crate::parser::ValueParserRegistry;
use crate::property::PropertyKey;
use crate::property::keys::{EPISODE_NUMBER_IN_SEASON, EPISODE_NUMBER_IN_SERIES};

/// Expands names covering several episodes into one episode per number.
///
/// The episode-number substring is read as a range when it contains a dash
/// and exactly two numbers ("01-04", "01-E04"; descending ranges are
/// reordered), otherwise as a list of numbers ("01+02", "01E02", or "01 02"
/// after group concatenation). All episodes share one series and one season.
#[derive(Debug, Clone)]
pub struct MultiEpisodeMapper {
    values: Arc<ValueParserRegistry>,
    episode: EpisodeMapper,
    re_number: Regex,
}

impl MultiEpisodeMapper {
    /// # Errors
    ///
    /// Returns `TsukuroiError::RegexError` if the number pattern fails to
    /// compile (should never happen).
    pub fn new(values: Arc<ValueParserRegistry>) -> Result<Self> {
        Ok(Self {
            episode: EpisodeMapper::new(values.clone()),
            values,
            re_number: Regex::new(r"\d+")?,
        })
    }

    /// The episode numbers named by `raw`, in the order they are listed.
    ///
    /// # Errors
    ///
    /// Returns an error if a number cannot be converted.
    pub fn numbers(&self, raw: &str, key: &PropertyKey) -> Result<Vec<u32>> {
        let numbers = self
            .re_number
            .find_iter(raw)
            .map(|m| self.values.parse::<u32>(m.as_str(), key))
            .collect::<Result<Vec<_>>>()?;

        match (raw.contains('-'), numbers.as_slice()) {
            (true, &[first, last]) => Ok((first.min(last)..=first.max(last)).collect()),
            // Let the value parser report the whole substring.
            (_, []) => Ok(vec![self.values.parse::<u32>(raw, key)?]),
            _ => Ok(numbers),
        }
    }
}

impl Mapper<Vec<Shared<Episode>>> for MultiEpisodeMapper {
    fn map(&self, result: &MatchResult) -> Result<Vec<Shared<Episode>>> {
        let (series, season) = self.episode.map_parents(result)?;
        let template = self
            .episode
            .map_unnumbered(result, series.clone(), season.clone())?;

        let key = if result.contains(&EPISODE_NUMBER_IN_SEASON) {
            EPISODE_NUMBER_IN_SEASON
        } else if result.contains(&EPISODE_NUMBER_IN_SERIES) {
            EPISODE_NUMBER_IN_SERIES
        } else {
            return Ok(vec![shared(template)]);
        };

        let raw = result.get(&key).unwrap_or_default();
        let numbers = self.numbers(raw, &key)?;
        debug!(raw, ?numbers, "expanding episode numbers");

        let in_series: Option<u32> = if key == EPISODE_NUMBER_IN_SEASON {
            self.values.parse_match(result, &EPISODE_NUMBER_IN_SERIES)?
        } else {
            None
        };

        Ok(numbers
            .into_iter()
            .map(|number| {
                let mut episode = template.clone();
                if key == EPISODE_NUMBER_IN_SEASON {
                    episode.number_in_season = Some(number);
                    episode.number_in_series = in_series;
                } else {
                    episode.number_in_series = Some(number);
                }
                shared(episode)
            })
            .collect())
    }
}
