//! # Value Parsers
//!
//! Converts captured substrings into typed values. Resolution order for a
//! scalar: parser registered for the property key, parser registered for the
//! target type, built-in default, identity for text.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use regex::Regex;
use serde::Serialize;
use tracing::warn;

use crate::error::{Result, TsukuroiError};
use crate::language::{Language, catalog};
use crate::matcher::MatchResult;
use crate::model::{FromValue, Group, Tag, Value};
use crate::property::PropertyKey;

/// Target type of a value conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueType {
    Bool,
    Int,
    Float,
    Date,
    DateTime,
    Text,
    Tag,
    Group,
    Language,
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Bool => "bool",
            Self::Int => "integer",
            Self::Float => "decimal",
            Self::Date => "date",
            Self::DateTime => "date-time",
            Self::Text => "text",
            Self::Tag => "tag",
            Self::Group => "group",
            Self::Language => "language",
        };
        f.write_str(name)
    }
}

/// Rust types a substring can be parsed into.
pub trait ParseTarget: FromValue {
    const TYPE: ValueType;
}

macro_rules! parse_target {
    ($($ty:ty => $value_type:ident),* $(,)?) => {
        $(impl ParseTarget for $ty {
            const TYPE: ValueType = ValueType::$value_type;
        })*
    };
}

parse_target! {
    bool => Bool,
    i64 => Int,
    i32 => Int,
    u32 => Int,
    f64 => Float,
    NaiveDate => Date,
    NaiveDateTime => DateTime,
    String => Text,
    Tag => Tag,
    Group => Group,
    Language => Language,
}

/// A substring → value conversion. `None` means the substring is invalid.
pub type ValueParser = Arc<dyn Fn(&str) -> Option<Value> + Send + Sync>;

/// Splits a captured substring into list elements.
#[derive(Debug, Clone)]
pub enum Splitter {
    /// Elements are the pieces between separator matches.
    Separator(Regex),
    /// Elements are the matches themselves.
    Tokens(Regex),
}

impl Splitter {
    /// # Errors
    ///
    /// Returns an error if the pattern does not compile.
    pub fn separator(pattern: &str) -> Result<Self> {
        Ok(Self::Separator(Regex::new(pattern)?))
    }

    /// # Errors
    ///
    /// Returns an error if the pattern does not compile.
    pub fn tokens(pattern: &str) -> Result<Self> {
        Ok(Self::Tokens(Regex::new(pattern)?))
    }

    /// Non-empty elements of `raw`, in order.
    #[must_use]
    pub fn split<'a>(&self, raw: &'a str) -> Vec<&'a str> {
        match self {
            Self::Separator(re) => re
                .split(raw)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .collect(),
            Self::Tokens(re) => re.find_iter(raw).map(|m| m.as_str()).collect(),
        }
    }
}

const DEFAULT_TOKENS: &str = r"[\w-]+";

/// Registry of substring → value conversions.
#[derive(Clone)]
pub struct ValueParserRegistry {
    key_parsers: HashMap<PropertyKey, ValueParser>,
    type_parsers: HashMap<ValueType, ValueParser>,
    key_splitters: HashMap<PropertyKey, Splitter>,
    splitter: Splitter,
}

impl ValueParserRegistry {
    /// A registry with built-in parsers only.
    ///
    /// # Errors
    ///
    /// Returns `TsukuroiError::RegexError` if the default tokenizer fails to
    /// compile (should never happen).
    pub fn new() -> Result<Self> {
        Self::builder().build()
    }

    #[must_use]
    pub fn builder() -> ValueParserRegistryBuilder {
        ValueParserRegistryBuilder::default()
    }

    /// Parses `raw`, captured for `key`, into `T`.
    ///
    /// # Errors
    ///
    /// Returns `TsukuroiError::ValueParse` if no parser accepts `raw`.
    pub fn parse<T: ParseTarget>(&self, raw: &str, key: &PropertyKey) -> Result<T> {
        let value = self.parse_value(raw, key, T::TYPE)?;
        T::from_value(value).map_err(|_| parse_error(raw, key, T::TYPE))
    }

    /// Parses the substring captured for `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns `TsukuroiError::ValueParse` if the captured substring is invalid.
    pub fn parse_match<T: ParseTarget>(
        &self,
        result: &MatchResult,
        key: &PropertyKey,
    ) -> Result<Option<T>> {
        result.get(key).map(|raw| self.parse(raw, key)).transpose()
    }

    /// Parses the substring captured for `key`, which must be present.
    ///
    /// # Errors
    ///
    /// Returns `TsukuroiError::MissingProperty` if `key` was not captured or
    /// `TsukuroiError::ValueParse` if the substring is invalid.
    pub fn parse_required<T: ParseTarget>(
        &self,
        result: &MatchResult,
        key: &PropertyKey,
    ) -> Result<T> {
        self.parse_match(result, key)?
            .ok_or(TsukuroiError::MissingProperty(*key))
    }

    /// Parses `raw` into the value kind of `target`.
    ///
    /// # Errors
    ///
    /// Returns `TsukuroiError::ValueParse` if no parser accepts `raw`.
    pub fn parse_value(&self, raw: &str, key: &PropertyKey, target: ValueType) -> Result<Value> {
        let parsed = match self
            .key_parsers
            .get(key)
            .or_else(|| self.type_parsers.get(&target))
        {
            Some(parser) => parser(raw),
            None => default_parse(raw, target),
        };
        parsed.ok_or_else(|| parse_error(raw, key, target))
    }

    /// Splits `raw` and parses every element; invalid elements are dropped.
    #[must_use]
    pub fn parse_list<T: ParseTarget>(&self, raw: &str, key: &PropertyKey) -> Vec<T> {
        self.splitter_for(key)
            .split(raw)
            .into_iter()
            .filter_map(|token| match self.parse(token, key) {
                Ok(value) => Some(value),
                Err(err) => {
                    warn!(%key, token, error = %err, "dropping unparsable list element");
                    None
                }
            })
            .collect()
    }

    /// List variant of [`ValueParserRegistry::parse_match`]; absent keys give
    /// an empty list.
    #[must_use]
    pub fn parse_list_match<T: ParseTarget>(&self, result: &MatchResult, key: &PropertyKey) -> Vec<T> {
        result
            .get(key)
            .map(|raw| self.parse_list(raw, key))
            .unwrap_or_default()
    }

    fn splitter_for(&self, key: &PropertyKey) -> &Splitter {
        self.key_splitters.get(key).unwrap_or(&self.splitter)
    }
}

impl fmt::Debug for ValueParserRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValueParserRegistry")
            .field("key_parsers", &self.key_parsers.keys().collect::<Vec<_>>())
            .field("type_parsers", &self.type_parsers.keys().collect::<Vec<_>>())
            .field("key_splitters", &self.key_splitters)
            .field("splitter", &self.splitter)
            .finish()
    }
}

fn parse_error(raw: &str, key: &PropertyKey, target: ValueType) -> TsukuroiError {
    TsukuroiError::ValueParse {
        raw: raw.to_string(),
        key: *key,
        target,
    }
}

/// Builder for [`ValueParserRegistry`].
#[derive(Default)]
pub struct ValueParserRegistryBuilder {
    key_parsers: HashMap<PropertyKey, ValueParser>,
    type_parsers: HashMap<ValueType, ValueParser>,
    key_splitters: Vec<(PropertyKey, SplitterSpec)>,
    splitter: Option<SplitterSpec>,
}

enum SplitterSpec {
    Separator(String),
    Tokens(String),
}

impl SplitterSpec {
    fn compile(&self) -> Result<Splitter> {
        match self {
            Self::Separator(pattern) => Splitter::separator(pattern),
            Self::Tokens(pattern) => Splitter::tokens(pattern),
        }
    }
}

impl ValueParserRegistryBuilder {
    /// Parser for substrings captured under `key`.
    #[must_use]
    pub fn key_parser<F>(mut self, key: PropertyKey, parser: F) -> Self
    where
        F: Fn(&str) -> Option<Value> + Send + Sync + 'static,
    {
        self.key_parsers.insert(key, Arc::new(parser));
        self
    }

    /// Parser for every conversion into `target` without a key parser.
    #[must_use]
    pub fn type_parser<F>(mut self, target: ValueType, parser: F) -> Self
    where
        F: Fn(&str) -> Option<Value> + Send + Sync + 'static,
    {
        self.type_parsers.insert(target, Arc::new(parser));
        self
    }

    /// Splits lists captured under `key` at matches of `pattern`.
    #[must_use]
    pub fn key_separator(mut self, key: PropertyKey, pattern: &str) -> Self {
        self.key_splitters
            .push((key, SplitterSpec::Separator(pattern.to_string())));
        self
    }

    /// Takes the matches of `pattern` as list elements for `key`.
    #[must_use]
    pub fn key_tokens(mut self, key: PropertyKey, pattern: &str) -> Self {
        self.key_splitters
            .push((key, SplitterSpec::Tokens(pattern.to_string())));
        self
    }

    /// Global separator replacing the default tokenizer.
    #[must_use]
    pub fn separator(mut self, pattern: &str) -> Self {
        self.splitter = Some(SplitterSpec::Separator(pattern.to_string()));
        self
    }

    /// Global tokenizer replacing the default `[\w-]+`.
    #[must_use]
    pub fn tokens(mut self, pattern: &str) -> Self {
        self.splitter = Some(SplitterSpec::Tokens(pattern.to_string()));
        self
    }

    /// # Errors
    ///
    /// Returns `TsukuroiError::RegexError` if a splitter pattern does not
    /// compile.
    pub fn build(self) -> Result<ValueParserRegistry> {
        let splitter = match &self.splitter {
            Some(spec) => spec.compile()?,
            None => Splitter::tokens(DEFAULT_TOKENS)?,
        };
        let key_splitters = self
            .key_splitters
            .iter()
            .map(|(key, spec)| Ok((*key, spec.compile()?)))
            .collect::<Result<HashMap<_, _>>>()?;

        Ok(ValueParserRegistry {
            key_parsers: self.key_parsers,
            type_parsers: self.type_parsers,
            key_splitters,
            splitter,
        })
    }
}

/// Built-in conversion of `raw` into `target`.
#[must_use]
pub fn default_parse(raw: &str, target: ValueType) -> Option<Value> {
    let trimmed = raw.trim();
    match target {
        ValueType::Bool => parse_bool(trimmed).map(Value::Bool),
        ValueType::Int => trimmed.parse::<i64>().ok().map(Value::Int),
        ValueType::Float => trimmed.replace(',', ".").parse::<f64>().ok().map(Value::Float),
        ValueType::Date => parse_date_time(trimmed)
            .map(|dt| dt.date())
            .or_else(|| parse_date(trimmed))
            .map(Value::Date),
        ValueType::DateTime => parse_date_time(trimmed)
            .or_else(|| parse_date(trimmed).and_then(|d| d.and_hms_opt(0, 0, 0)))
            .map(Value::DateTime),
        ValueType::Text => Some(Value::Text(raw.to_string())),
        ValueType::Tag => (!trimmed.is_empty()).then(|| Value::Tag(Tag::new(trimmed))),
        ValueType::Group => (!trimmed.is_empty()).then(|| Value::Group(Group::new(trimmed))),
        ValueType::Language => catalog::lookup(trimmed)
            .or_else(|| Language::parse_tag(trimmed).ok())
            .map(Value::Language),
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "true" | "yes" | "y" | "1" => Some(true),
        "false" | "no" | "n" | "0" => Some(false),
        _ => None,
    }
}

const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y.%m.%d %H:%M:%S",
    "%Y.%m.%d %H:%M",
];

fn parse_date_time(raw: &str) -> Option<NaiveDateTime> {
    DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
}

/// Full date, then year-month (first of month), then year (January 1st).
/// Accepts `-`, `.`, `_`, `/` and space as separators, day-first for
/// `dd.mm.yyyy`.
fn parse_date(raw: &str) -> Option<NaiveDate> {
    let parts: Vec<&str> = raw.split(['-', '.', '_', '/', ' ']).collect();
    if parts.iter().any(|p| p.is_empty() || !p.bytes().all(|b| b.is_ascii_digit())) {
        return None;
    }
    let number = |s: &str| s.parse::<u32>().ok();

    match parts.as_slice() {
        [y, m, d] if y.len() == 4 => {
            NaiveDate::from_ymd_opt(y.parse().ok()?, number(m)?, number(d)?)
        }
        [d, m, y] if y.len() == 4 => {
            NaiveDate::from_ymd_opt(y.parse().ok()?, number(m)?, number(d)?)
        }
        [y, m] if y.len() == 4 => NaiveDate::from_ymd_opt(y.parse().ok()?, number(m)?, 1),
        [y] if y.len() == 4 => NaiveDate::from_ymd_opt(y.parse().ok()?, 1, 1),
        [ymd] if ymd.len() == 8 => NaiveDate::parse_from_str(ymd, "%Y%m%d").ok(),
        _ => None,
    }
}
