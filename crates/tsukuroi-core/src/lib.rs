//! # Tsukuroi Core
//!
//! Release-name parsing and rule-based metadata standardization. Scene-style
//! names of TV episodes, movies and subtitle files are matched by regular
//! expressions, mapped into a graph of shared entities and then repaired by
//! registered correction rules, with every change recorded.
//!
//! ## Quick Start
//!
//! ```rust
//! use tsukuroi_core::{CorrectionService, StandardParsers, StandardizingConfig};
//! use tsukuroi_core::model::{EntityRef, Tag};
//!
//! let parsers = StandardParsers::new().unwrap();
//! let releases = parsers
//!     .releases
//!     .parse("Psych.S01E05.720p.WEB-DL.DD5.1.H.264-NTb")
//!     .unwrap()
//!     .unwrap();
//!
//! let service = CorrectionService::standard(&StandardizingConfig::default()).unwrap();
//! let changes = service.process(&EntityRef::new(&releases[0])).unwrap();
//!
//! assert_eq!(
//!     releases[0].read().tags,
//!     Tag::list(["720p", "WEB-DL", "DD5.1", "H.264"])
//! );
//! assert_eq!(changes.len(), 2);
//! ```
pub mod config;
pub mod correction;
pub mod error;
pub mod language;
pub mod mapper;
pub mod matcher;
pub mod model;
pub mod parser;
pub mod property;

// Re-export primary API
pub use config::{LanguageConfig, StandardizingConfig, TagRuleConfig};
pub use correction::{ChangeRecord, CorrectionService, Rule, TagSequenceReplacer};
pub use error::{Result, TsukuroiError};
pub use language::{Language, LanguageFormat, LanguageNormalizer};
pub use mapper::Mapper;
pub use matcher::{AlternationMatcher, MatchResult, Matcher, MatcherExtension, PatternMatcher};
pub use model::{Entity, EntityRef, EntityType, Shared, Value, shared};
pub use parser::{ParsingService, StandardParsers, ValueParserRegistry, parse};
pub use property::PropertyKey;
