//! Synthesized event instances.
//!
//! An [`EventInstance`] is the generic, descriptor-backed implementation of
//! any event interface: a shared descriptor plus an owned value table with
//! one slot per accessor. Accessors dispatch through the descriptor's
//! indexes, by property name or by any method name that maps to the
//! property (inherited spellings included).

use core::any::Any;
use core::fmt;
use core::hash::{Hash, Hasher};
use std::sync::Arc;

use eventforge_types::{EventObject, PropertyBag, PropertyName, TypeName, Value};

use crate::binder::BoundProperties;
use crate::descriptor::InterfaceDescriptor;

/// A read-only object satisfying one interface's accessor contract.
#[derive(Debug, Clone)]
pub struct EventInstance {
    descriptor: Arc<InterfaceDescriptor>,
    values: Box<[Value]>,
}

impl EventInstance {
    /// Build an instance from validated properties. Never fails: every
    /// failure mode is raised while binding.
    pub fn synthesize(bound: BoundProperties) -> Self {
        Self {
            descriptor: bound.descriptor,
            values: bound.values,
        }
    }

    /// The interface this instance implements.
    pub fn interface(&self) -> &TypeName {
        self.descriptor.interface()
    }

    /// The descriptor backing this instance.
    pub fn descriptor(&self) -> &Arc<InterfaceDescriptor> {
        &self.descriptor
    }

    /// Read a property by name. `None` if the interface has no such
    /// accessor; optional accessors without a value return
    /// `Some(&Value::Absent)`.
    pub fn get(&self, property: &str) -> Option<&Value> {
        self.values.get(self.descriptor.position(property)?)
    }

    /// Invoke an accessor by method name, e.g. `getTargetWorld`.
    pub fn invoke(&self, method: &str) -> Option<&Value> {
        self.values.get(self.descriptor.method_position(method)?)
    }

    /// Property names and values, in descriptor order.
    pub fn properties(&self) -> impl Iterator<Item = (&PropertyName, &Value)> {
        self.descriptor
            .accessors()
            .iter()
            .map(|spec| &spec.name)
            .zip(self.values.iter())
    }

    /// Whether this instance implements `interface`, directly or through an
    /// ancestor.
    pub fn is_instance_of(&self, interface: &str) -> bool {
        self.descriptor.extends(interface)
    }

    /// Borrow a host-object property as its concrete type.
    pub fn object<T: Any>(&self, property: &str) -> Option<&T> {
        match self.get(property)? {
            Value::Object(object) => object.downcast_ref::<T>(),
            _ => None,
        }
    }

    /// Borrow a string property.
    pub fn string(&self, property: &str) -> Option<&str> {
        match self.get(property)? {
            Value::Str(text) => Some(text.as_ref()),
            _ => None,
        }
    }
}

/// Equal when both implement the same interface with the same accessors
/// holding pairwise equal values.
impl PartialEq for EventInstance {
    fn eq(&self, other: &Self) -> bool {
        self.interface() == other.interface()
            && self.values == other.values
            && self
                .descriptor
                .accessors()
                .iter()
                .map(|spec| &spec.name)
                .eq(other.descriptor.accessors().iter().map(|spec| &spec.name))
    }
}

impl Eq for EventInstance {}

impl Hash for EventInstance {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.interface().hash(state);
        for (name, value) in self.properties() {
            name.hash(state);
            value.hash(state);
        }
    }
}

impl fmt::Display for EventInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{{", self.interface())?;
        for (i, (name, value)) in self.properties().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{name}={value}")?;
        }
        f.write_str("}")
    }
}

impl EventObject for EventInstance {
    fn type_name(&self) -> &str {
        self.interface().as_str()
    }
}

/// Copies every present value, so a sibling event can be built from an
/// existing one.
impl From<&EventInstance> for PropertyBag {
    fn from(instance: &EventInstance) -> Self {
        instance
            .properties()
            .filter(|(_, value)| !value.is_absent())
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::hash_map::DefaultHasher;

    use eventforge_types::{InterfaceDef, Primitive, TypeShape};

    use super::*;
    use crate::binder::Binder;
    use crate::naming::BeanNaming;
    use crate::registry::TypeRegistry;
    use crate::resolver::Resolver;

    fn registry() -> TypeRegistry {
        let mut builder = TypeRegistry::builder();
        let declared = builder
            .declare_interface(InterfaceDef::new("Event").accessor("getSource", TypeShape::reference("String")))
            .and_then(|b| {
                b.declare_interface(
                    InterfaceDef::new("ChatEvent")
                        .extends("Event")
                        .accessor("getMessage", TypeShape::reference("String"))
                        .accessor("isCancelled", TypeShape::Primitive(Primitive::Boolean))
                        .accessor("getChannel", TypeShape::optional(TypeShape::reference("String"))),
                )
            });
        assert!(declared.is_ok());
        builder.build()
    }

    fn chat(registry: &TypeRegistry, bag: &PropertyBag) -> Option<EventInstance> {
        let descriptor = Resolver::new(registry, &BeanNaming::strict()).resolve("ChatEvent").ok()?;
        let bound = Binder::new(registry).bind(&Arc::new(descriptor), bag).ok()?;
        Some(EventInstance::synthesize(bound))
    }

    fn bag() -> PropertyBag {
        PropertyBag::new()
            .with("source", "console")
            .with("message", "hi")
            .with("cancelled", false)
    }

    fn hash_of(instance: &EventInstance) -> u64 {
        let mut hasher = DefaultHasher::new();
        instance.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn accessors_by_property_and_method() {
        let registry = registry();
        let event = chat(&registry, &bag());
        assert!(event.is_some());
        let Some(event) = event else { return };
        assert_eq!(event.string("message"), Some("hi"));
        assert_eq!(event.invoke("isCancelled"), Some(&Value::Bool(false)));
        assert_eq!(event.invoke("getSource"), Some(&Value::from("console")));
        assert_eq!(event.get("channel"), Some(&Value::Absent));
        assert!(event.get("nope").is_none());
    }

    #[test]
    fn lineage_answers_instance_checks() {
        let registry = registry();
        let event = chat(&registry, &bag());
        assert!(event.as_ref().is_some_and(|e| e.is_instance_of("Event")));
        assert!(event.as_ref().is_some_and(|e| e.is_instance_of("ChatEvent")));
        assert!(!event.as_ref().is_some_and(|e| e.is_instance_of("Cancellable")));
    }

    #[test]
    fn equal_bags_give_equal_but_distinct_instances() {
        let registry = registry();
        let a = chat(&registry, &bag());
        let b = chat(&registry, &bag());
        assert_eq!(a, b);
        assert_eq!(a.as_ref().map(hash_of), b.as_ref().map(hash_of));
        let c = chat(&registry, &bag().with("message", "bye"));
        assert_ne!(a, c);
    }

    #[test]
    fn display_lists_every_property() {
        let registry = registry();
        let text = chat(&registry, &bag()).map(|e| e.to_string());
        assert_eq!(
            text.as_deref(),
            Some("ChatEvent{message=\"hi\", cancelled=false, channel=absent, source=\"console\"}")
        );
    }

    #[test]
    fn bag_from_instance_skips_absent_values() {
        let registry = registry();
        let event = chat(&registry, &bag());
        let derived = event.as_ref().map(PropertyBag::from);
        assert_eq!(derived, Some(bag()));
    }
}
