//! Structural type descriptors for accessor return types.
//!
//! A [`TypeShape`] is deliberately shallow: it records enough to tell
//! required from optional, primitive from reference, and a container from
//! its element, which is all the binder needs for its best-effort check.
//! It is not a generic type system; unknown generic arguments are erased.
//!
//! Shapes have a compact textual form used by catalogues and diagnostics:
//!
//! ```text
//! int  boolean  Entity  Optional<String>  List<Transaction>  void
//! ```

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::names::{OBJECT, TypeName};

// ---------------------------------------------------------------------------
// Primitives
// ---------------------------------------------------------------------------

/// A primitive value kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Primitive {
    /// `true` or `false`.
    Boolean,
    /// Signed 8-bit integer.
    Byte,
    /// Signed 16-bit integer.
    Short,
    /// A single character.
    Char,
    /// Signed 32-bit integer.
    Int,
    /// Signed 64-bit integer.
    Long,
    /// 32-bit float.
    Float,
    /// 64-bit float.
    Double,
}

impl Primitive {
    /// All primitive kinds, in declaration order.
    pub const ALL: [Self; 8] = [
        Self::Boolean,
        Self::Byte,
        Self::Short,
        Self::Char,
        Self::Int,
        Self::Long,
        Self::Float,
        Self::Double,
    ];

    /// The keyword used in the textual shape syntax.
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Boolean => "boolean",
            Self::Byte => "byte",
            Self::Short => "short",
            Self::Char => "char",
            Self::Int => "int",
            Self::Long => "long",
            Self::Float => "float",
            Self::Double => "double",
        }
    }

    /// The name of the reference type a value of this kind boxes into.
    pub const fn boxed_name(self) -> &'static str {
        match self {
            Self::Boolean => "Boolean",
            Self::Byte => "Byte",
            Self::Short => "Short",
            Self::Char => "Character",
            Self::Int => "Integer",
            Self::Long => "Long",
            Self::Float => "Float",
            Self::Double => "Double",
        }
    }

    /// Whether the kind is numeric (boxes into `Number`).
    pub const fn is_numeric(self) -> bool {
        !matches!(self, Self::Boolean | Self::Char)
    }

    /// Whether a value of this kind may be supplied where `target` is
    /// declared: identity plus the standard widening conversions.
    pub const fn widens_to(self, target: Self) -> bool {
        match self {
            Self::Boolean => matches!(target, Self::Boolean),
            Self::Byte => matches!(
                target,
                Self::Byte | Self::Short | Self::Int | Self::Long | Self::Float | Self::Double
            ),
            Self::Short => matches!(
                target,
                Self::Short | Self::Int | Self::Long | Self::Float | Self::Double
            ),
            Self::Char => matches!(
                target,
                Self::Char | Self::Int | Self::Long | Self::Float | Self::Double
            ),
            Self::Int => matches!(target, Self::Int | Self::Long | Self::Float | Self::Double),
            Self::Long => matches!(target, Self::Long | Self::Float | Self::Double),
            Self::Float => matches!(target, Self::Float | Self::Double),
            Self::Double => matches!(target, Self::Double),
        }
    }

    fn from_keyword(keyword: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.keyword() == keyword)
    }
}

// ---------------------------------------------------------------------------
// Containers
// ---------------------------------------------------------------------------

/// The kind of a parameterized container shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContainerKind {
    /// An ordered sequence.
    List,
    /// An unordered collection of distinct elements.
    Set,
    /// Any collection; `List` and `Set` both satisfy it.
    Collection,
    /// Anything that can be iterated; every other kind satisfies it.
    Iterable,
}

impl ContainerKind {
    /// The type name used in the textual shape syntax.
    pub const fn name(self) -> &'static str {
        match self {
            Self::List => "List",
            Self::Set => "Set",
            Self::Collection => "Collection",
            Self::Iterable => "Iterable",
        }
    }

    /// Whether a container of this kind satisfies a declared `target` kind.
    pub const fn fits(self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::List, Self::List)
                | (Self::Set, Self::Set)
                | (Self::List | Self::Set | Self::Collection, Self::Collection)
                | (_, Self::Iterable)
        )
    }

    fn from_name(name: &str) -> Option<Self> {
        match name {
            "List" => Some(Self::List),
            "Set" => Some(Self::Set),
            "Collection" => Some(Self::Collection),
            "Iterable" => Some(Self::Iterable),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// TypeShape
// ---------------------------------------------------------------------------

/// The structural shape of a declared accessor return (or parameter) type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TypeShape {
    /// A primitive value.
    Primitive(Primitive),
    /// A named reference type (interface or plain type).
    Reference(TypeName),
    /// An optional wrapper around an inner shape.
    Optional(Box<TypeShape>),
    /// A parameterized container.
    Container {
        /// The container kind.
        kind: ContainerKind,
        /// The element shape.
        element: Box<TypeShape>,
    },
    /// No value; only valid for non-accessor methods.
    Void,
}

impl TypeShape {
    /// Shorthand for [`TypeShape::Reference`].
    pub fn reference(name: impl Into<TypeName>) -> Self {
        Self::Reference(name.into())
    }

    /// Shorthand for [`TypeShape::Optional`].
    pub fn optional(inner: Self) -> Self {
        Self::Optional(Box::new(inner))
    }

    /// Shorthand for a `List` container.
    pub fn list(element: Self) -> Self {
        Self::Container {
            kind: ContainerKind::List,
            element: Box::new(element),
        }
    }

    /// Shorthand for a container of any kind.
    pub fn container(kind: ContainerKind, element: Self) -> Self {
        Self::Container {
            kind,
            element: Box::new(element),
        }
    }

    /// Whether the shape is an optional wrapper.
    pub const fn is_optional(&self) -> bool {
        matches!(self, Self::Optional(_))
    }

    /// The shape inside an optional wrapper, or the shape itself.
    pub fn unwrap_optional(&self) -> &Self {
        match self {
            Self::Optional(inner) => inner,
            other => other,
        }
    }
}

impl fmt::Display for TypeShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primitive(p) => f.write_str(p.keyword()),
            Self::Reference(name) => write!(f, "{name}"),
            Self::Optional(inner) => write!(f, "Optional<{inner}>"),
            Self::Container { kind, element } => write!(f, "{}<{element}>", kind.name()),
            Self::Void => f.write_str("void"),
        }
    }
}

/// Error returned when a textual shape cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid type shape {text:?}: {reason}")]
pub struct ShapeParseError {
    /// The text that failed to parse.
    pub text: String,
    /// What was wrong with it.
    pub reason: &'static str,
}

impl FromStr for TypeShape {
    type Err = ShapeParseError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let fail = |reason| ShapeParseError {
            text: text.to_owned(),
            reason,
        };
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(fail("empty shape"));
        }
        if trimmed == "void" {
            return Ok(Self::Void);
        }
        if let Some(p) = Primitive::from_keyword(trimmed) {
            return Ok(Self::Primitive(p));
        }

        let Some(open) = trimmed.find('<') else {
            if trimmed.contains('>') {
                return Err(fail("unbalanced '>'"));
            }
            // A raw container holds elements of any type.
            if let Some(kind) = ContainerKind::from_name(trimmed) {
                return Ok(Self::container(kind, Self::reference(OBJECT)));
            }
            return Ok(Self::reference(trimmed));
        };
        if !trimmed.ends_with('>') {
            return Err(fail("generic arguments must close the shape"));
        }

        let head = trimmed.get(..open).unwrap_or_default().trim();
        let args = trimmed
            .get(open.saturating_add(1)..trimmed.len().saturating_sub(1))
            .unwrap_or_default();
        if head.is_empty() {
            return Err(fail("missing type name before '<'"));
        }
        if args.trim().is_empty() {
            return Err(fail("empty generic arguments"));
        }
        let Some(arity) = top_level_arity(args) else {
            return Err(fail("unbalanced generic arguments"));
        };

        let single = |args: &str| {
            if arity > 1 {
                return Err(fail("expected a single type argument"));
            }
            args.parse::<Self>().map_err(|inner| fail(inner.reason))
        };
        if head == "Optional" {
            return Ok(Self::optional(single(args)?));
        }
        if let Some(kind) = ContainerKind::from_name(head) {
            return Ok(Self::container(kind, single(args)?));
        }
        // Any other generic reference is erased to its raw name.
        Ok(Self::reference(head))
    }
}

/// Number of comma-separated arguments at nesting depth zero, or `None`
/// if the angle brackets do not balance.
fn top_level_arity(args: &str) -> Option<usize> {
    let mut depth = 0_usize;
    let mut arity = 1_usize;
    for c in args.chars() {
        match c {
            '<' => depth = depth.checked_add(1)?,
            '>' => depth = depth.checked_sub(1)?,
            ',' if depth == 0 => arity = arity.checked_add(1)?,
            _ => {}
        }
    }
    (depth == 0).then_some(arity)
}

impl TryFrom<String> for TypeShape {
    type Error = ShapeParseError;

    fn try_from(text: String) -> Result<Self, Self::Error> {
        text.parse()
    }
}

impl From<TypeShape> for String {
    fn from(shape: TypeShape) -> Self {
        shape.to_string()
    }
}

impl From<Primitive> for TypeShape {
    fn from(p: Primitive) -> Self {
        Self::Primitive(p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Option<TypeShape> {
        text.parse().ok()
    }

    #[test]
    fn parses_primitives_and_void() {
        assert_eq!(parse("int"), Some(TypeShape::Primitive(Primitive::Int)));
        assert_eq!(parse(" boolean "), Some(TypeShape::Primitive(Primitive::Boolean)));
        assert_eq!(parse("void"), Some(TypeShape::Void));
    }

    #[test]
    fn parses_nested_generics() {
        assert_eq!(
            parse("Optional<List<Entity>>"),
            Some(TypeShape::optional(TypeShape::list(TypeShape::reference("Entity"))))
        );
    }

    #[test]
    fn erases_unknown_generic_references() {
        assert_eq!(
            parse("List<Transaction<BlockSnapshot>>"),
            Some(TypeShape::list(TypeShape::reference("Transaction")))
        );
    }

    #[test]
    fn raw_containers_hold_objects() {
        assert_eq!(parse("List"), Some(TypeShape::list(TypeShape::reference(OBJECT))));
        assert_eq!(
            parse("Iterable<String>"),
            Some(TypeShape::container(ContainerKind::Iterable, TypeShape::reference("String")))
        );
        assert_eq!(parse("Map<String, Entity>"), Some(TypeShape::reference("Map")));
    }

    #[test]
    fn rejects_malformed_generic_arguments() {
        assert!(parse("List<String, Entity>").is_none());
        assert!(parse("Optional<int, long>").is_none());
        assert!(parse("Transaction<A>>").is_none());
        assert!(parse("Transaction<A<B>").is_none());
        assert!(parse("Foo<A>Bar<B>").is_none());
        assert!(parse("Transaction<>").is_none());
        assert!(parse("List<Map<String, Entity>>").is_some());
    }

    #[test]
    fn rejects_malformed_shapes() {
        assert!(parse("").is_none());
        assert!(parse("List<int").is_none());
        assert!(parse("<int>").is_none());
        assert!(parse("Optional<>").is_none());
        assert!(parse("Entity>").is_none());
    }

    #[test]
    fn display_uses_the_parse_syntax() {
        let shape = TypeShape::container(
            ContainerKind::Set,
            TypeShape::optional(TypeShape::Primitive(Primitive::Long)),
        );
        assert_eq!(shape.to_string(), "Set<Optional<long>>");
        assert_eq!(parse(&shape.to_string()), Some(shape));
    }

    #[test]
    fn widening_follows_primitive_ranks() {
        assert!(Primitive::Byte.widens_to(Primitive::Double));
        assert!(Primitive::Char.widens_to(Primitive::Int));
        assert!(!Primitive::Char.widens_to(Primitive::Short));
        assert!(!Primitive::Long.widens_to(Primitive::Int));
        assert!(!Primitive::Boolean.widens_to(Primitive::Int));
    }

    #[test]
    fn collection_accepts_lists_and_sets() {
        assert!(ContainerKind::List.fits(ContainerKind::Collection));
        assert!(ContainerKind::Set.fits(ContainerKind::Collection));
        assert!(!ContainerKind::Collection.fits(ContainerKind::List));
        assert!(!ContainerKind::Set.fits(ContainerKind::List));
        assert!(ContainerKind::Collection.fits(ContainerKind::Iterable));
        assert!(!ContainerKind::Iterable.fits(ContainerKind::Collection));
    }
}
