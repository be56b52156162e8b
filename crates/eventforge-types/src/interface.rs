//! Declarative model of event interfaces and plain reference types.
//!
//! These are the inputs of descriptor resolution. They are usually built
//! in code with the chained constructors below, or deserialized from a
//! YAML [`Catalog`].

use serde::{Deserialize, Serialize};

use crate::names::TypeName;
use crate::shape::TypeShape;

/// One method declared on an interface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodDecl {
    /// The method name (e.g. `getTargetWorld`).
    pub name: String,
    /// Parameter shapes. Accessors have none.
    #[serde(default)]
    pub params: Vec<TypeShape>,
    /// The declared return shape.
    pub returns: TypeShape,
    /// Whether the interface already supplies a body for this method.
    /// Such methods are not synthesized.
    #[serde(default)]
    pub default_impl: bool,
}

impl MethodDecl {
    /// A zero-argument abstract accessor.
    pub fn accessor(name: impl Into<String>, returns: TypeShape) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
            returns,
            default_impl: false,
        }
    }

    /// A single-argument `void` setter. Never valid on an event interface,
    /// but declarable so malformed interfaces can be described.
    pub fn setter(name: impl Into<String>, param: TypeShape) -> Self {
        Self {
            name: name.into(),
            params: vec![param],
            returns: TypeShape::Void,
            default_impl: false,
        }
    }

    /// Mark the method as having a body in the interface.
    #[must_use]
    pub const fn with_default_impl(mut self) -> Self {
        self.default_impl = true;
        self
    }

    /// Whether the method is a zero-argument, non-void method.
    pub fn is_accessor_shaped(&self) -> bool {
        self.params.is_empty() && self.returns != TypeShape::Void
    }
}

/// An event interface: a name, its direct supertypes, and its own methods.
///
/// # Examples
///
/// ```
/// use eventforge_types::{InterfaceDef, TypeShape};
///
/// let def = InterfaceDef::new("ChangeBlockEvent")
///     .extends("TargetWorldEvent")
///     .accessor("getTransactions", TypeShape::list(TypeShape::reference("Transaction")));
///
/// assert_eq!(def.extends.len(), 1);
/// assert_eq!(def.methods.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceDef {
    /// Interface identity.
    pub name: TypeName,
    /// Direct supertypes, in declaration order.
    #[serde(default)]
    pub extends: Vec<TypeName>,
    /// Methods declared directly on this interface, in declaration order.
    #[serde(default)]
    pub methods: Vec<MethodDecl>,
}

impl InterfaceDef {
    /// Start an interface with no supertypes and no methods.
    pub fn new(name: impl Into<TypeName>) -> Self {
        Self {
            name: name.into(),
            extends: Vec::new(),
            methods: Vec::new(),
        }
    }

    /// Add a direct supertype.
    #[must_use]
    pub fn extends(mut self, parent: impl Into<TypeName>) -> Self {
        self.extends.push(parent.into());
        self
    }

    /// Add an abstract zero-argument accessor.
    #[must_use]
    pub fn accessor(self, name: impl Into<String>, returns: TypeShape) -> Self {
        self.method(MethodDecl::accessor(name, returns))
    }

    /// Add an arbitrary method declaration.
    #[must_use]
    pub fn method(mut self, method: MethodDecl) -> Self {
        self.methods.push(method);
        self
    }
}

/// A plain (non-event) reference type and its direct supertypes.
///
/// Declared so the binder can decide whether a host object of one type
/// may be supplied where another is expected (e.g. `Player` -> `Entity`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDecl {
    /// Type identity.
    pub name: TypeName,
    /// Direct supertypes.
    #[serde(default)]
    pub supertypes: Vec<TypeName>,
}

impl TypeDecl {
    /// A type with the given direct supertypes.
    pub fn new<S: Into<TypeName>>(name: impl Into<TypeName>, supertypes: impl IntoIterator<Item = S>) -> Self {
        Self {
            name: name.into(),
            supertypes: supertypes.into_iter().map(Into::into).collect(),
        }
    }
}

/// A serializable universe of types and interfaces.
///
/// ```yaml
/// types:
///   - name: Player
///     supertypes: [Entity]
/// interfaces:
///   - name: TargetEntityEvent
///     methods:
///       - name: getTargetEntity
///         returns: Entity
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    /// Plain reference types.
    #[serde(default)]
    pub types: Vec<TypeDecl>,
    /// Event interfaces.
    #[serde(default)]
    pub interfaces: Vec<InterfaceDef>,
}
