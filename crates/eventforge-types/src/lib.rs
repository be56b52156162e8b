//! Shared contract types for the eventforge synthesis engine.
//!
//! This crate defines everything that crosses the engine boundary: the
//! declarative model of event interfaces the engine consumes, the property
//! bags callers supply, and the dynamic values synthesized events return.
//!
//! # Modules
//!
//! - [`names`] -- Shared-text wrappers for type and property names
//! - [`shape`] -- Structural type descriptors and their textual syntax
//! - [`value`] -- Dynamic property values with widening conversions
//! - [`object`] -- Type-erased host objects bound by reference
//! - [`bag`] -- The name -> value input of a synthesis call
//! - [`interface`] -- Interface, method, and catalogue declarations

pub mod bag;
pub mod interface;
pub mod names;
pub mod object;
pub mod shape;
pub mod value;

// Re-export all public types at crate root for convenience.
pub use bag::PropertyBag;
pub use interface::{Catalog, InterfaceDef, MethodDecl, TypeDecl};
pub use names::{OBJECT, PropertyName, STRING, TypeName};
pub use object::{DynObject, EventObject, ObjectRef};
pub use shape::{ContainerKind, Primitive, ShapeParseError, TypeShape};
pub use value::Value;
