use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::error::{Result, TsukuroiError};
use crate::language::Language;
use crate::model::tag::{Group, Tag};

/// Dynamically typed property value.
///
/// Values are owned: reading a property copies it out of the entity, so a
/// recorded value cannot change when the entity is mutated later.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    Tag(Tag),
    Tags(Vec<Tag>),
    Group(Group),
    Language(Language),
}

impl Value {
    /// Short name of the value kind, used in error messages.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "integer",
            Self::Float(_) => "decimal",
            Self::Text(_) => "text",
            Self::Date(_) => "date",
            Self::DateTime(_) => "date-time",
            Self::Tag(_) => "tag",
            Self::Tags(_) => "tag list",
            Self::Group(_) => "group",
            Self::Language(_) => "language",
        }
    }

    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    fn mismatch(self, expected: &'static str) -> TsukuroiError {
        TsukuroiError::TypeMismatch {
            expected,
            found: self.kind(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Text(s) => write!(f, "{s:?}"),
            Self::Date(d) => write!(f, "{d}"),
            Self::DateTime(d) => write!(f, "{d}"),
            Self::Tag(t) => write!(f, "{t}"),
            Self::Tags(tags) => write!(f, "[{}]", Tag::join(tags, ", ")),
            Self::Group(g) => write!(f, "{g}"),
            Self::Language(l) => write!(f, "{l}"),
        }
    }
}

/// Conversion out of a [`Value`].
///
/// `Option<T>` maps [`Value::Null`] to `None`; every other target rejects it.
pub trait FromValue: Sized {
    fn from_value(value: Value) -> Result<Self>;
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

impl FromValue for Value {
    fn from_value(value: Value) -> Result<Self> {
        Ok(value)
    }
}

impl FromValue for String {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Text(s) => Ok(s),
            other => Err(other.mismatch("text")),
        }
    }
}

impl FromValue for bool {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Bool(b) => Ok(b),
            other => Err(other.mismatch("bool")),
        }
    }
}

impl FromValue for i64 {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Int(i) => Ok(i),
            other => Err(other.mismatch("integer")),
        }
    }
}

impl FromValue for i32 {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Int(i) => i32::try_from(i).map_err(|_| Value::Int(i).mismatch("32-bit integer")),
            other => Err(other.mismatch("integer")),
        }
    }
}

impl FromValue for u32 {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Int(i) => {
                u32::try_from(i).map_err(|_| Value::Int(i).mismatch("unsigned integer"))
            }
            other => Err(other.mismatch("integer")),
        }
    }
}

impl FromValue for f64 {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Float(x) => Ok(x),
            Value::Int(i) => Ok(i as f64),
            other => Err(other.mismatch("decimal")),
        }
    }
}

impl FromValue for NaiveDate {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Date(d) => Ok(d),
            other => Err(other.mismatch("date")),
        }
    }
}

impl FromValue for NaiveDateTime {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::DateTime(d) => Ok(d),
            other => Err(other.mismatch("date-time")),
        }
    }
}

impl FromValue for Tag {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Tag(t) => Ok(t),
            other => Err(other.mismatch("tag")),
        }
    }
}

impl FromValue for Vec<Tag> {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Tags(tags) => Ok(tags),
            other => Err(other.mismatch("tag list")),
        }
    }
}

impl FromValue for Group {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Group(g) => Ok(g),
            other => Err(other.mismatch("group")),
        }
    }
}

impl FromValue for Language {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Language(l) => Ok(l),
            other => Err(other.mismatch("language")),
        }
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(i64::from(value))
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::Int(i64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<NaiveDate> for Value {
    fn from(value: NaiveDate) -> Self {
        Value::Date(value)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(value: NaiveDateTime) -> Self {
        Value::DateTime(value)
    }
}

impl From<Tag> for Value {
    fn from(value: Tag) -> Self {
        Value::Tag(value)
    }
}

impl From<Vec<Tag>> for Value {
    fn from(value: Vec<Tag>) -> Self {
        Value::Tags(value)
    }
}

impl From<Group> for Value {
    fn from(value: Group) -> Self {
        Value::Group(value)
    }
}

impl From<Language> for Value {
    fn from(value: Language) -> Self {
        Value::Language(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn option_maps_null() {
        assert_eq!(Option::<String>::from_value(Value::Null).unwrap(), None);
        assert_eq!(
            Option::<String>::from_value(Value::from("x")).unwrap(),
            Some("x".to_string())
        );
        assert!(String::from_value(Value::Null).is_err());
    }

    #[test]
    fn integer_conversions_check_range() {
        assert_eq!(u32::from_value(Value::Int(5)).unwrap(), 5);
        assert!(matches!(
            u32::from_value(Value::Int(-1)),
            Err(TsukuroiError::TypeMismatch { expected: "unsigned integer", .. })
        ));
        assert_eq!(f64::from_value(Value::Int(2)).unwrap(), 2.0);
    }

    #[test]
    fn mismatch_names_both_kinds() {
        let err = Vec::<Tag>::from_value(Value::from("H.264")).unwrap_err();
        assert_eq!(err.to_string(), "expected tag list value, found text");
    }

    #[test]
    fn none_converts_to_null() {
        assert_eq!(Value::from(None::<u32>), Value::Null);
        assert_eq!(Value::from(Some(3u32)), Value::Int(3));
    }

    #[test]
    fn display_is_readable() {
        let tags = Value::from(Tag::list(["WEB", "H.264"]));
        assert_eq!(tags.to_string(), "[WEB, H.264]");
        assert_eq!(Value::from("Psych").to_string(), "\"Psych\"");
    }
}
