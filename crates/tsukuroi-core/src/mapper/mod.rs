//! # Mappers
//!
//! Turn a [`MatchResult`] into structured entities, converting substrings
//! through a shared [`ValueParserRegistry`](crate::parser::ValueParserRegistry).
//! Mapping is deterministic: the same match result always yields equal
//! entities.

pub mod episodes;
pub mod media;
pub mod release;
pub mod subtitle;

use crate::error::Result;
use crate::matcher::MatchResult;

pub use episodes::MultiEpisodeMapper;
pub use media::{
    EpisodeMapper, MediaMapper, MovieMapper, NamedMediaMapper, SeasonMapper, SeriesMapper,
};
pub use release::ReleaseMapper;
pub use subtitle::SubtitleReleaseMapper;

/// Builds a `T` from captured substrings.
pub trait Mapper<T>: Send + Sync {
    /// # Errors
    ///
    /// Returns an error if a required key is missing or a substring cannot be
    /// converted.
    fn map(&self, result: &MatchResult) -> Result<T>;
}

impl<T, F> Mapper<T> for F
where
    F: Fn(&MatchResult) -> Result<T> + Send + Sync,
{
    fn map(&self, result: &MatchResult) -> Result<T> {
        self(result)
    }
}
