use thiserror::Error;

use crate::correction::ChangeRecord;
use crate::parser::ValueType;
use crate::property::PropertyKey;

/// Errors that can occur during Tsukuroi core operations.
#[derive(Debug, Error)]
pub enum TsukuroiError {
    /// A regex pattern failed to compile.
    #[error("regex compilation error: {0}")]
    RegexError(#[from] regex::Error),

    /// A matcher maps a group index the compiled pattern does not have.
    #[error("pattern {pattern:?} has {available} groups but group {group} is mapped")]
    UnknownGroup {
        /// The offending pattern.
        pattern: String,
        /// The mapped group index.
        group: usize,
        /// Number of capture groups in the compiled pattern.
        available: usize,
    },

    /// A capture group of the pattern has no target.
    #[error("group {group} of pattern {pattern:?} is not mapped to a key or matcher")]
    UnmappedGroup {
        /// The offending pattern.
        pattern: String,
        /// The unmapped group index.
        group: usize,
    },

    /// Prefix/suffix groups of a matcher extension do not match the given keys.
    #[error("{part} {pattern:?} has {groups} groups but {keys} keys were given")]
    GroupCountMismatch {
        /// `"prefix"` or `"suffix"`.
        part: &'static str,
        /// The prefix or suffix pattern.
        pattern: String,
        /// Capture groups found.
        groups: usize,
        /// Keys provided.
        keys: usize,
    },

    /// An alternation matcher was built without alternatives.
    #[error("alternation matcher requires at least one matcher")]
    EmptyMatcherList,

    /// A tag sequence replacer was built with an empty query.
    #[error("tag sequence query must not be empty")]
    EmptyTagQuery,

    /// A language tag in the configuration could not be parsed.
    #[error("invalid language tag: {0:?}")]
    InvalidLanguage(String),

    /// Configuration values that are inconsistent with each other.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A captured substring could not be converted to its target type.
    #[error("cannot parse {raw:?} for {key} as {target}")]
    ValueParse {
        /// The captured substring.
        raw: String,
        /// The property the substring was captured for.
        key: PropertyKey,
        /// The requested target type.
        target: ValueType,
    },

    /// A required property was not captured.
    #[error("required property {0} was not captured")]
    MissingProperty(PropertyKey),

    /// The entity type has no property with that name.
    #[error("{entity_type} has no property {property:?}")]
    UnknownProperty {
        /// Runtime type name of the entity.
        entity_type: &'static str,
        /// Requested property name.
        property: String,
    },

    /// A value of the wrong kind was used for a property or conversion.
    #[error("expected {expected} value, found {found}")]
    TypeMismatch {
        /// Expected value kind.
        expected: &'static str,
        /// Actual value kind.
        found: &'static str,
    },

    /// A rule failed while the correction service walked an entity graph.
    ///
    /// Changes recorded before the failure are kept, not rolled back.
    #[error("rule {rule:?} failed on {entity_type}: {source}")]
    RuleFailed {
        /// Name of the failing rule.
        rule: String,
        /// Runtime type name of the entity being processed.
        entity_type: &'static str,
        /// The underlying error.
        #[source]
        source: Box<TsukuroiError>,
        /// Changes recorded before the failure.
        changes: Vec<ChangeRecord>,
    },
}

/// Result type alias for Tsukuroi operations.
pub type Result<T> = std::result::Result<T, TsukuroiError>;
