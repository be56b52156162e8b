//! Error types for the `eventforge-core` crate.
//!
//! Descriptor errors are permanent and scoped to one interface; they are
//! cached alongside successful descriptors and returned identically on
//! every later request. Bind errors are scoped to one synthesis call.
//! Neither family ever yields a partially built instance.

use eventforge_types::{PropertyName, TypeName, TypeShape};

/// Errors raised while resolving an interface into a descriptor.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DescriptorError {
    /// The interface, or one of its supertypes, is not declared.
    #[error("interface {0} is not declared")]
    UnknownInterface(TypeName),

    /// An abstract method takes arguments or returns nothing.
    #[error("{interface}.{method} is not a zero-argument accessor")]
    NonAccessorMethod {
        /// The interface declaring the method.
        interface: TypeName,
        /// The offending method.
        method: String,
    },

    /// Two ancestors declare accessors for the same property with
    /// incompatible shapes.
    #[error(
        "accessor {name} has conflicting shapes: {first} (from {first_declared_by}) vs {second} (from {second_declared_by})"
    )]
    ConflictingAccessor {
        /// The contested property.
        name: PropertyName,
        /// Shape recorded first.
        first: TypeShape,
        /// Interface that declared the first shape.
        first_declared_by: TypeName,
        /// Shape that could not be reconciled with it.
        second: TypeShape,
        /// Interface that declared the second shape.
        second_declared_by: TypeName,
    },
}

/// Errors raised while binding a property bag against a descriptor.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BindError {
    /// A required accessor has no (or only an absent) value in the bag.
    #[error("missing required property {0}")]
    MissingRequiredProperty(PropertyName),

    /// A supplied value does not fit the accessor's declared shape.
    #[error("property {name} expects {expected}, got {actual}")]
    TypeMismatch {
        /// The property.
        name: PropertyName,
        /// The declared shape.
        expected: TypeShape,
        /// Runtime kind of the supplied value.
        actual: String,
    },
}

/// Any failure of a full synthesis call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SynthesisError {
    /// The interface could not be resolved.
    #[error(transparent)]
    Descriptor(#[from] DescriptorError),

    /// The property bag did not satisfy the interface.
    #[error(transparent)]
    Bind(#[from] BindError),
}

/// Errors raised while building a type registry.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// The same interface was declared twice.
    #[error("duplicate interface declaration: {0}")]
    DuplicateInterface(TypeName),

    /// The same name was declared twice (as a type, or as both a type and
    /// an interface).
    #[error("duplicate type declaration: {0}")]
    DuplicateType(TypeName),

    /// Failed to read a catalogue file.
    #[error("failed to read catalogue: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse catalogue YAML.
    #[error("failed to parse catalogue YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for RegistryError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}
