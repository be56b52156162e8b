//! Resolved interface descriptors.
//!
//! An [`InterfaceDescriptor`] is the flattened, de-duplicated view of an
//! interface and all of its ancestors: one [`AccessorSpec`] per logical
//! property, in first-declared-wins traversal order. Descriptors are
//! immutable once built and are shared behind an `Arc` by the cache.

use std::collections::HashMap;

use serde::Serialize;

use eventforge_types::{PropertyName, TypeName, TypeShape};

/// Whether an accessor must be supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueShape {
    /// The property bag must carry a present value.
    Required,
    /// The accessor returns an optional wrapper; a missing entry binds the
    /// "no value" marker.
    Optional,
}

impl ValueShape {
    /// The value shape implied by a declared return type.
    pub const fn of(returns: &TypeShape) -> Self {
        if returns.is_optional() {
            Self::Optional
        } else {
            Self::Required
        }
    }
}

/// One logical property of an interface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccessorSpec {
    /// The property-bag key.
    pub name: PropertyName,
    /// Every method name that maps to this property, first-declared first.
    /// Usually one; more when ancestors spell the accessor differently.
    pub methods: Vec<String>,
    /// Every interface that declares an equivalent accessor, in traversal
    /// order. More than one entry means several interfaces in the lineage
    /// declare it, through diamond inheritance or a plain override.
    pub declared_by: Vec<TypeName>,
    /// Required or optional.
    pub value_shape: ValueShape,
    /// The most specific declared shape; used for best-effort binding checks.
    pub expected_type: TypeShape,
}

impl AccessorSpec {
    /// Whether more than one interface in the lineage declares this
    /// accessor.
    pub fn is_multiply_declared(&self) -> bool {
        self.declared_by.len() > 1
    }
}

/// The resolved accessor contract of one interface.
#[derive(Debug, Clone, Serialize)]
pub struct InterfaceDescriptor {
    /// Interface identity.
    interface: TypeName,
    /// The interface and all of its ancestors, breadth-first.
    lineage: Vec<TypeName>,
    /// Accessors in stable traversal order.
    accessors: Vec<AccessorSpec>,
    /// Property name -> position in `accessors`.
    #[serde(skip)]
    by_property: HashMap<PropertyName, usize>,
    /// Method name -> position in `accessors`.
    #[serde(skip)]
    by_method: HashMap<String, usize>,
}

impl InterfaceDescriptor {
    /// Assemble a descriptor from resolved parts, building its indexes.
    pub(crate) fn new(interface: TypeName, lineage: Vec<TypeName>, accessors: Vec<AccessorSpec>) -> Self {
        let by_property = accessors
            .iter()
            .enumerate()
            .map(|(i, spec)| (spec.name.clone(), i))
            .collect();
        let by_method = accessors
            .iter()
            .enumerate()
            .flat_map(|(i, spec)| spec.methods.iter().map(move |m| (m.clone(), i)))
            .collect();
        Self {
            interface,
            lineage,
            accessors,
            by_property,
            by_method,
        }
    }

    /// The interface this descriptor implements.
    pub const fn interface(&self) -> &TypeName {
        &self.interface
    }

    /// The interface followed by every ancestor, breadth-first.
    pub fn lineage(&self) -> &[TypeName] {
        &self.lineage
    }

    /// Accessors in stable traversal order.
    pub fn accessors(&self) -> &[AccessorSpec] {
        &self.accessors
    }

    /// Number of accessors.
    pub fn len(&self) -> usize {
        self.accessors.len()
    }

    /// Whether the interface declares no accessors at all.
    pub fn is_empty(&self) -> bool {
        self.accessors.is_empty()
    }

    /// Look up an accessor by property name.
    pub fn accessor(&self, property: &str) -> Option<&AccessorSpec> {
        self.accessors.get(self.position(property)?)
    }

    /// Position of a property in [`InterfaceDescriptor::accessors`].
    pub fn position(&self, property: &str) -> Option<usize> {
        self.by_property.get(property).copied()
    }

    /// Position of the accessor a method name maps to.
    pub fn method_position(&self, method: &str) -> Option<usize> {
        self.by_method.get(method).copied()
    }

    /// Whether this interface is, or extends, `name`.
    pub fn extends(&self, name: &str) -> bool {
        self.lineage.iter().any(|n| n.as_str() == name)
    }
}

/// Content equality; the lookup indexes are derived and not compared.
impl PartialEq for InterfaceDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.interface == other.interface
            && self.lineage == other.lineage
            && self.accessors == other.accessors
    }
}

impl Eq for InterfaceDescriptor {}
