//! # Entities
//!
//! Type descriptors, per-type property accessor tables and the type-erased
//! [`EntityRef`] handle the correction service walks over.

use std::any::Any;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use parking_lot::RwLock;
use serde::Serialize;

use crate::error::{Result, TsukuroiError};
use crate::model::value::Value;

/// Static descriptor of an entity kind.
///
/// Descriptors form a single-inheritance chain through `parent`; rules
/// registered for a descriptor also apply to every descendant. Equality,
/// hashing and ordering use the name only.
#[derive(Clone, Copy)]
pub struct EntityType {
    name: &'static str,
    parent: Option<&'static EntityType>,
}

impl EntityType {
    /// A descriptor without a supertype.
    #[must_use]
    pub const fn root(name: &'static str) -> Self {
        Self { name, parent: None }
    }

    /// A descriptor whose supertype is `parent`.
    #[must_use]
    pub const fn child(name: &'static str, parent: &'static EntityType) -> Self {
        Self {
            name,
            parent: Some(parent),
        }
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[must_use]
    pub fn parent(&self) -> Option<&'static EntityType> {
        self.parent
    }

    /// Returns `true` if `self` is `other` or one of its descendants.
    #[must_use]
    pub fn is_a(&self, other: &EntityType) -> bool {
        if self == other {
            return true;
        }
        let mut current = self.parent;
        while let Some(ty) = current {
            if ty == other {
                return true;
            }
            current = ty.parent;
        }
        false
    }
}

impl PartialEq for EntityType {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for EntityType {}

impl Hash for EntityType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl PartialOrd for EntityType {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for EntityType {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name.cmp(other.name)
    }
}

impl fmt::Debug for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Getter/setter pair for one named property of `T`.
pub struct Property<T> {
    name: &'static str,
    get: fn(&T) -> Value,
    set: fn(&mut T, Value) -> Result<()>,
}

impl<T> Property<T> {
    pub const fn new(
        name: &'static str,
        get: fn(&T) -> Value,
        set: fn(&mut T, Value) -> Result<()>,
    ) -> Self {
        Self { name, get, set }
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[must_use]
    pub fn get(&self, entity: &T) -> Value {
        (self.get)(entity)
    }

    pub fn set(&self, entity: &mut T, value: Value) -> Result<()> {
        (self.set)(entity, value)
    }
}

/// A structured domain object the correction service can process.
pub trait Entity: fmt::Debug + Send + Sync + Sized + 'static {
    /// Runtime type descriptor.
    const TYPE: &'static EntityType;

    /// Accessor table of the named properties rules may read and write.
    fn properties() -> &'static [Property<Self>];

    /// Looks up a property accessor by name.
    fn property(name: &str) -> Option<&'static Property<Self>> {
        Self::properties().iter().find(|p| p.name == name)
    }
}

/// Shared, mutable handle to an entity.
pub type Shared<T> = Arc<RwLock<T>>;

/// Wraps an entity into a [`Shared`] handle.
pub fn shared<T: Entity>(entity: T) -> Shared<T> {
    Arc::new(RwLock::new(entity))
}

/// Identity of an entity allocation.
///
/// Two handles have the same id exactly when they point at the same
/// allocation, regardless of whether the entities compare equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct EntityId(usize);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:x}", self.0)
    }
}

trait ErasedEntity: Send + Sync {
    fn entity_type(&self) -> &'static EntityType;
    fn get(&self, property: &str) -> Result<Value>;
    fn set(&self, property: &str, value: Value) -> Result<()>;
    fn property_names(&self) -> Vec<&'static str>;
    fn values(&self) -> BTreeMap<&'static str, Value>;
    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
    fn debug(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result;
}

impl<T: Entity> ErasedEntity for RwLock<T> {
    fn entity_type(&self) -> &'static EntityType {
        T::TYPE
    }

    fn get(&self, property: &str) -> Result<Value> {
        let accessor = T::property(property).ok_or_else(|| unknown::<T>(property))?;
        Ok(accessor.get(&self.read()))
    }

    fn set(&self, property: &str, value: Value) -> Result<()> {
        let accessor = T::property(property).ok_or_else(|| unknown::<T>(property))?;
        accessor.set(&mut self.write(), value)
    }

    fn property_names(&self) -> Vec<&'static str> {
        T::properties().iter().map(Property::name).collect()
    }

    fn values(&self) -> BTreeMap<&'static str, Value> {
        let entity = self.read();
        T::properties()
            .iter()
            .map(|p| (p.name, p.get(&entity)))
            .collect()
    }

    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }

    fn debug(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.read(), f)
    }
}

fn unknown<T: Entity>(property: &str) -> TsukuroiError {
    TsukuroiError::UnknownProperty {
        entity_type: T::TYPE.name(),
        property: property.to_string(),
    }
}

/// Type-erased handle to a shared entity.
///
/// Cloning the handle clones the pointer, not the entity. Property access goes
/// through the accessor table of the runtime type; each call takes the entity
/// lock for its own duration only.
#[derive(Clone)]
pub struct EntityRef(Arc<dyn ErasedEntity>);

impl EntityRef {
    /// Erases a shared handle. The result shares identity with `handle`.
    pub fn new<T: Entity>(handle: &Shared<T>) -> Self {
        let erased: Arc<dyn ErasedEntity> = handle.clone();
        Self(erased)
    }

    /// Wraps a freshly created entity.
    pub fn from_entity<T: Entity>(entity: T) -> Self {
        Self::new(&shared(entity))
    }

    #[must_use]
    pub fn id(&self) -> EntityId {
        EntityId(Arc::as_ptr(&self.0) as *const () as usize)
    }

    #[must_use]
    pub fn entity_type(&self) -> &'static EntityType {
        self.0.entity_type()
    }

    /// Returns `true` if the runtime type is `ty` or one of its subtypes.
    #[must_use]
    pub fn is_a(&self, ty: &EntityType) -> bool {
        self.entity_type().is_a(ty)
    }

    /// Reads a property by name.
    pub fn get(&self, property: &str) -> Result<Value> {
        self.0.get(property)
    }

    /// Writes a property by name.
    pub fn set(&self, property: &str, value: Value) -> Result<()> {
        self.0.set(property, value)
    }

    /// Names of all properties in accessor-table order.
    #[must_use]
    pub fn property_names(&self) -> Vec<&'static str> {
        self.0.property_names()
    }

    /// Recovers the typed handle if the runtime type is exactly `T`.
    #[must_use]
    pub fn downcast<T: Entity>(&self) -> Option<Shared<T>> {
        self.0.clone().into_any().downcast::<RwLock<T>>().ok()
    }

    /// Returns `true` if both handles point at the same allocation.
    #[must_use]
    pub fn same_entity(&self, other: &EntityRef) -> bool {
        self.id() == other.id()
    }

    /// Captures the current property values.
    #[must_use]
    pub fn snapshot(&self) -> EntitySnapshot {
        EntitySnapshot {
            entity_type: self.entity_type().name(),
            id: self.id(),
            properties: self.0.values(),
        }
    }
}

impl<T: Entity> From<&Shared<T>> for EntityRef {
    fn from(handle: &Shared<T>) -> Self {
        Self::new(handle)
    }
}

impl fmt::Debug for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.debug(f)
    }
}

/// Serializable copy of an entity's properties at one point in time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntitySnapshot {
    /// Runtime type name.
    #[serde(rename = "type")]
    pub entity_type: &'static str,
    /// Identity of the snapshotted entity.
    pub id: EntityId,
    /// Property values by name.
    pub properties: BTreeMap<&'static str, Value>,
}
