//! Reconciles a caller's property bag against a resolved descriptor.
//!
//! Binding runs in two passes so failures are deterministic:
//!
//! 1. **Completeness** -- every `Required` accessor must have a present
//!    value. The first missing one in descriptor order is reported,
//!    whatever else the bag contains.
//! 2. **Compatibility** -- every supplied value is checked against its
//!    accessor's expected shape and converted where the widening rules
//!    allow it.
//!
//! Keys the descriptor does not know are ignored. Nothing is copied:
//! strings, objects and lists are bound by sharing their allocation.

use std::sync::Arc;

use tracing::trace;

use eventforge_types::{OBJECT, PropertyBag, STRING, TypeShape, Value};

use crate::descriptor::{InterfaceDescriptor, ValueShape};
use crate::error::BindError;
use crate::registry::TypeRegistry;

/// Reference types that accept a string value.
const STRING_TARGETS: [&str; 3] = [STRING, "CharSequence", OBJECT];

/// Boxed supertype of every numeric primitive.
const NUMBER: &str = "Number";

/// A validated, immutable property table for one descriptor.
///
/// Holds exactly one value per accessor, in descriptor order; optional
/// accessors that were not supplied hold [`Value::Absent`].
#[derive(Debug, Clone)]
pub struct BoundProperties {
    pub(crate) descriptor: Arc<InterfaceDescriptor>,
    pub(crate) values: Box<[Value]>,
}

impl BoundProperties {
    /// The descriptor these properties were validated against.
    pub fn descriptor(&self) -> &Arc<InterfaceDescriptor> {
        &self.descriptor
    }

    /// The bound value of a property.
    pub fn get(&self, property: &str) -> Option<&Value> {
        self.values.get(self.descriptor.position(property)?)
    }

    /// Values in descriptor order.
    pub fn values(&self) -> &[Value] {
        &self.values
    }
}

/// Validates property bags against descriptors.
#[derive(Debug, Clone, Copy)]
pub struct Binder<'a> {
    registry: &'a TypeRegistry,
    trace_ignored: bool,
}

impl<'a> Binder<'a> {
    /// Create a binder that checks reference assignability against
    /// `registry`.
    pub const fn new(registry: &'a TypeRegistry) -> Self {
        Self {
            registry,
            trace_ignored: false,
        }
    }

    /// Log bag keys the descriptor does not declare at `trace` level.
    #[must_use]
    pub const fn trace_ignored_properties(mut self, enabled: bool) -> Self {
        self.trace_ignored = enabled;
        self
    }

    /// Bind `bag` against `descriptor`.
    ///
    /// # Errors
    ///
    /// Returns [`BindError::MissingRequiredProperty`] for the first required
    /// accessor (in descriptor order) without a present value, otherwise
    /// [`BindError::TypeMismatch`] for the first incompatible value.
    pub fn bind(
        &self,
        descriptor: &Arc<InterfaceDescriptor>,
        bag: &PropertyBag,
    ) -> Result<BoundProperties, BindError> {
        if let Some(missing) = descriptor.accessors().iter().find(|spec| {
            spec.value_shape == ValueShape::Required
                && bag.get(spec.name.as_str()).is_none_or(Value::is_absent)
        }) {
            return Err(BindError::MissingRequiredProperty(missing.name.clone()));
        }

        let values = descriptor
            .accessors()
            .iter()
            .map(|spec| {
                let Some(value) = bag.get(spec.name.as_str()) else {
                    return Ok(Value::Absent);
                };
                self.coerce(value, &spec.expected_type)
                    .ok_or_else(|| BindError::TypeMismatch {
                        name: spec.name.clone(),
                        expected: spec.expected_type.clone(),
                        actual: value.kind_name(),
                    })
            })
            .collect::<Result<Box<[Value]>, BindError>>()?;

        if self.trace_ignored && tracing::enabled!(tracing::Level::TRACE) {
            for (name, _) in bag.iter().filter(|(name, _)| descriptor.position(name.as_str()).is_none()) {
                trace!(interface = %descriptor.interface(), property = %name, "ignoring undeclared property");
            }
        }

        Ok(BoundProperties {
            descriptor: Arc::clone(descriptor),
            values,
        })
    }

    /// The value to bind for `value` where `expected` is declared, or
    /// `None` if it does not fit.
    fn coerce(&self, value: &Value, expected: &TypeShape) -> Option<Value> {
        if let TypeShape::Optional(inner) = expected {
            return if value.is_absent() {
                Some(Value::Absent)
            } else {
                self.coerce(value, inner)
            };
        }

        match (expected, value) {
            (_, Value::Absent) | (TypeShape::Void | TypeShape::Optional(_), _) => None,
            (TypeShape::Primitive(target), _) => value.widen(*target),
            (TypeShape::Reference(target), _) => {
                self.fits_reference(value, target.as_str()).then(|| value.clone())
            }
            (TypeShape::Container { element, .. }, Value::List(items)) => self.coerce_list(items, element),
            (TypeShape::Container { .. }, _) => None,
        }
    }

    /// Rebuilds the list only when an element had to be converted, so a
    /// list that already fits keeps its identity.
    fn coerce_list(&self, items: &Arc<[Value]>, element: &TypeShape) -> Option<Value> {
        let coerced = items
            .iter()
            .map(|item| self.coerce(item, element))
            .collect::<Option<Vec<_>>>()?;
        if coerced.iter().zip(items.iter()).all(|(new, old)| new.same_as(old)) {
            Some(Value::List(Arc::clone(items)))
        } else {
            Some(Value::list(coerced))
        }
    }

    fn fits_reference(&self, value: &Value, target: &str) -> bool {
        match value {
            Value::Str(_) => STRING_TARGETS.contains(&target),
            Value::Object(object) => self.registry.is_assignable(object.type_name(), target),
            Value::List(_) => target == OBJECT,
            Value::Absent => false,
            primitive => primitive.primitive().is_some_and(|p| {
                target == p.boxed_name() || target == OBJECT || (target == NUMBER && p.is_numeric())
            }),
        }
    }
}
