//! Host reference values carried through property bags.
//!
//! The engine never looks inside a host object. It only needs the
//! object's runtime type name (for assignability checks), equality and
//! hashing (for structural equality of synthesized instances), and the
//! ability to hand the same allocation back to the caller. [`ObjectRef`]
//! provides all of that over an `Arc<dyn DynObject>`.

use core::any::{Any, TypeId};
use core::fmt;
use core::hash::{Hash, Hasher};
use std::sync::Arc;

/// A host value that can be bound to a reference-typed accessor.
///
/// Implementors name their runtime type; the registry decides which
/// declared types that name is assignable to.
pub trait EventObject: Any + fmt::Debug + Send + Sync {
    /// The runtime type name, as declared in the type registry.
    fn type_name(&self) -> &str;
}

/// Object-safe equality and hashing over [`EventObject`] values.
///
/// Blanket-implemented for every `EventObject + PartialEq + Hash`; there is
/// no reason to implement it by hand.
pub trait DynObject: EventObject {
    /// Upcast for downcasting.
    fn as_any(&self) -> &dyn Any;

    /// Equality against another erased object; objects of different
    /// concrete types are never equal.
    fn dyn_eq(&self, other: &dyn DynObject) -> bool;

    /// Feed the concrete type and the value into `state`.
    fn dyn_hash(&self, state: &mut dyn Hasher);
}

impl<T> DynObject for T
where
    T: EventObject + PartialEq + Hash,
{
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn dyn_eq(&self, other: &dyn DynObject) -> bool {
        other
            .as_any()
            .downcast_ref::<T>()
            .is_some_and(|other| self == other)
    }

    fn dyn_hash(&self, mut state: &mut dyn Hasher) {
        TypeId::of::<T>().hash(&mut state);
        self.hash(&mut state);
    }
}

/// A shared, type-erased handle to a host object.
///
/// Cloning shares the allocation; [`ObjectRef::ptr_eq`] observes identity.
#[derive(Clone)]
pub struct ObjectRef(Arc<dyn DynObject>);

impl ObjectRef {
    /// Wrap a host value.
    pub fn new<T>(value: T) -> Self
    where
        T: EventObject + PartialEq + Hash,
    {
        Self(Arc::new(value))
    }

    /// Wrap an already shared host value without copying it.
    pub fn from_arc<T>(value: Arc<T>) -> Self
    where
        T: EventObject + PartialEq + Hash,
    {
        Self(value)
    }

    /// The runtime type name of the wrapped object.
    pub fn type_name(&self) -> &str {
        self.0.type_name()
    }

    /// Borrow the wrapped object as `T`, if it is one.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.as_any().downcast_ref::<T>()
    }

    /// Whether both handles point at the same allocation.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for ObjectRef {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || self.0.dyn_eq(other.0.as_ref())
    }
}

impl Eq for ObjectRef {}

impl Hash for ObjectRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.dyn_hash(state);
    }
}

impl fmt::Debug for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.0.as_ref(), f)
    }
}
