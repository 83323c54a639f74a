use std::fmt;

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use crate::model::{EntityRef, Value};

/// One property change made by a rule.
///
/// Values are copies taken at the time of the change.
#[derive(Debug, Clone)]
pub struct ChangeRecord {
    /// The changed entity.
    pub entity: EntityRef,
    /// Name of the changed property.
    pub property: &'static str,
    pub old_value: Value,
    pub new_value: Value,
    /// Name of the rule that made the change.
    pub rule: String,
}

impl ChangeRecord {
    #[must_use]
    pub fn new(
        entity: EntityRef,
        property: &'static str,
        old_value: Value,
        new_value: Value,
        rule: impl Into<String>,
    ) -> Self {
        Self {
            entity,
            property,
            old_value,
            new_value,
            rule: rule.into(),
        }
    }
}

impl fmt::Display for ChangeRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}.{}: {} -> {} ({})",
            self.entity.entity_type(),
            self.entity.id(),
            self.property,
            self.old_value,
            self.new_value,
            self.rule
        )
    }
}

impl Serialize for ChangeRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut record = serializer.serialize_struct("ChangeRecord", 6)?;
        record.serialize_field("type", self.entity.entity_type().name())?;
        record.serialize_field("id", &self.entity.id())?;
        record.serialize_field("property", self.property)?;
        record.serialize_field("old", &self.old_value)?;
        record.serialize_field("new", &self.new_value)?;
        record.serialize_field("rule", &self.rule)?;
        record.end()
    }
}
