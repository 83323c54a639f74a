use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::correction::ChangeRecord;
use crate::error::Result;
use crate::model::{Entity, EntityRef, FromValue, Value};

/// Inspects one entity and may mutate it, recording every change.
pub trait Rule: Send + Sync {
    /// Name recorded in change records and errors.
    fn name(&self) -> &str;

    /// # Errors
    ///
    /// Returns an error if the entity cannot be read or written. Changes
    /// already pushed to `changes` stay recorded.
    fn apply(&self, entity: &EntityRef, changes: &mut Vec<ChangeRecord>) -> Result<()>;
}

impl fmt::Debug for dyn Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Rule({:?})", self.name())
    }
}

/// Pure value transformation used by property rules.
pub trait Replacer<V>: Send + Sync {
    fn replace(&self, value: &V) -> V;
}

impl<V, F> Replacer<V> for F
where
    F: Fn(&V) -> V + Send + Sync,
{
    fn replace(&self, value: &V) -> V {
        self(value)
    }
}

/// Rewrites one property through a [`Replacer`].
///
/// Null values are left alone; a change is recorded only if the replacement
/// differs from the current value.
pub struct PropertyRule<V> {
    name: String,
    property: &'static str,
    replacer: Arc<dyn Replacer<V>>,
}

impl<V> PropertyRule<V>
where
    V: FromValue + Into<Value> + PartialEq + 'static,
{
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        property: &'static str,
        replacer: impl Replacer<V> + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            property,
            replacer: Arc::new(replacer),
        }
    }

    #[must_use]
    pub fn property(&self) -> &'static str {
        self.property
    }
}

impl<V> Rule for PropertyRule<V>
where
    V: FromValue + Into<Value> + PartialEq + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn apply(&self, entity: &EntityRef, changes: &mut Vec<ChangeRecord>) -> Result<()> {
        let old_value = entity.get(self.property)?;
        if old_value.is_null() {
            return Ok(());
        }

        let current = V::from_value(old_value.clone())?;
        let replaced = self.replacer.replace(&current);
        if replaced == current {
            return Ok(());
        }

        let new_value: Value = replaced.into();
        entity.set(self.property, new_value.clone())?;
        changes.push(ChangeRecord::new(
            entity.clone(),
            self.property,
            old_value,
            new_value,
            self.name.as_str(),
        ));
        Ok(())
    }
}

impl<V> fmt::Debug for PropertyRule<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyRule")
            .field("name", &self.name)
            .field("property", &self.property)
            .finish_non_exhaustive()
    }
}

/// Rewrites every text property of an entity through a [`Replacer`].
///
/// Useful on supertypes, where the concrete property names differ.
pub struct TextPropertiesRule {
    name: String,
    replacer: Arc<dyn Replacer<String>>,
}

impl TextPropertiesRule {
    #[must_use]
    pub fn new(name: impl Into<String>, replacer: impl Replacer<String> + 'static) -> Self {
        Self {
            name: name.into(),
            replacer: Arc::new(replacer),
        }
    }
}

impl Rule for TextPropertiesRule {
    fn name(&self) -> &str {
        &self.name
    }

    fn apply(&self, entity: &EntityRef, changes: &mut Vec<ChangeRecord>) -> Result<()> {
        for property in entity.property_names() {
            let old_value = entity.get(property)?;
            let Value::Text(current) = &old_value else {
                continue;
            };
            let replaced = self.replacer.replace(current);
            if &replaced == current {
                continue;
            }
            let new_value = Value::Text(replaced);
            entity.set(property, new_value.clone())?;
            changes.push(ChangeRecord::new(
                entity.clone(),
                property,
                old_value,
                new_value,
                self.name.as_str(),
            ));
        }
        Ok(())
    }
}

/// Records the changes a [`FnRule`] closure makes to its entity.
pub struct Recorder<'a> {
    entity: &'a EntityRef,
    rule: &'a str,
    changes: &'a mut Vec<ChangeRecord>,
}

impl Recorder<'_> {
    /// Records a change made directly to the entity.
    pub fn record(&mut self, property: &'static str, old: impl Into<Value>, new: impl Into<Value>) {
        self.changes.push(ChangeRecord::new(
            self.entity.clone(),
            property,
            old.into(),
            new.into(),
            self.rule,
        ));
    }

    /// Assigns `new` to `slot` and records the change, unless they are equal.
    /// Returns `true` if the value changed.
    pub fn update<V>(&mut self, property: &'static str, slot: &mut V, new: V) -> bool
    where
        V: Clone + PartialEq + Into<Value>,
    {
        if *slot == new {
            return false;
        }
        let old = std::mem::replace(slot, new.clone());
        self.record(property, old, new);
        true
    }
}

type FnRuleBody<T> = dyn Fn(&mut T, &mut Recorder<'_>) -> Result<()> + Send + Sync;

/// Rule over the typed entity, written as a closure.
///
/// The closure runs with the entity's write lock held and receives the
/// entity by `&mut`; it must record its changes through the [`Recorder`].
/// Entities whose runtime type is not exactly `T` are skipped.
pub struct FnRule<T> {
    name: String,
    body: Box<FnRuleBody<T>>,
    _entity: PhantomData<fn(&mut T)>,
}

impl<T: Entity> FnRule<T> {
    pub fn new<F>(name: impl Into<String>, body: F) -> Self
    where
        F: Fn(&mut T, &mut Recorder<'_>) -> Result<()> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            body: Box::new(body),
            _entity: PhantomData,
        }
    }
}

impl<T: Entity> Rule for FnRule<T> {
    fn name(&self) -> &str {
        &self.name
    }

    fn apply(&self, entity: &EntityRef, changes: &mut Vec<ChangeRecord>) -> Result<()> {
        let Some(handle) = entity.downcast::<T>() else {
            return Ok(());
        };
        let mut guard = handle.write();
        let mut recorder = Recorder {
            entity,
            rule: &self.name,
            changes,
        };
        (self.body)(&mut *guard, &mut recorder)
    }
}
