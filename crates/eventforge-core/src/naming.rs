//! Accessor method name -> property name derivation.
//!
//! Callers spell property-bag keys the way the target interface's
//! accessors imply, so the derivation rule is a contract between the
//! factory layer and this engine. It is pluggable through
//! [`NamingConvention`]; two conventions ship with the crate:
//!
//! | Convention | `getTargetWorld` | `isCancelled` (boolean) | `isEmpty` (`Object`) | `getURL` | `cause` |
//! |------------|------------------|-------------------------|----------------------|----------|---------|
//! | [`BeanNaming`] strict | `targetWorld` | `cancelled` | `isEmpty` | `URL` | `cause` |
//! | [`BeanNaming`] lenient | `targetWorld` | `cancelled` | `empty` | `URL` | `cause` |
//! | [`VerbatimNaming`] | `getTargetWorld` | `isCancelled` | `isEmpty` | `getURL` | `cause` |

use core::fmt;

use eventforge_types::{Primitive, PropertyName, TypeShape};

/// Maps an accessor to the property-bag key that feeds it.
pub trait NamingConvention: fmt::Debug + Send + Sync {
    /// Derive the property name for an accessor with the given method name
    /// and declared return shape.
    fn property_name(&self, method: &str, returns: &TypeShape) -> PropertyName;
}

/// `JavaBeans`-style derivation: strip `get`/`is` and decapitalize.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BeanNaming {
    /// Only strip `is` from accessors returning a boolean.
    pub strict_is_prefix: bool,
}

impl BeanNaming {
    /// The standard rule: `is` only prefixes boolean accessors.
    pub const fn strict() -> Self {
        Self {
            strict_is_prefix: true,
        }
    }

    /// Strip `is` regardless of the return type.
    pub const fn lenient() -> Self {
        Self {
            strict_is_prefix: false,
        }
    }
}

impl Default for BeanNaming {
    fn default() -> Self {
        Self::strict()
    }
}

impl NamingConvention for BeanNaming {
    fn property_name(&self, method: &str, returns: &TypeShape) -> PropertyName {
        if let Some(rest) = strip_accessor_prefix(method, "get") {
            return PropertyName::from(decapitalize(rest));
        }
        if let Some(rest) = strip_accessor_prefix(method, "is") {
            if !self.strict_is_prefix || returns_boolean(returns) {
                return PropertyName::from(decapitalize(rest));
            }
        }
        PropertyName::from(method)
    }
}

/// The method name is the property name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VerbatimNaming;

impl NamingConvention for VerbatimNaming {
    fn property_name(&self, method: &str, _returns: &TypeShape) -> PropertyName {
        PropertyName::from(method)
    }
}

/// `prefix` followed by an upper-case character; returns the remainder.
fn strip_accessor_prefix<'a>(method: &'a str, prefix: &str) -> Option<&'a str> {
    let rest = method.strip_prefix(prefix)?;
    rest.chars()
        .next()
        .is_some_and(char::is_uppercase)
        .then_some(rest)
}

fn returns_boolean(shape: &TypeShape) -> bool {
    match shape {
        TypeShape::Primitive(Primitive::Boolean) => true,
        TypeShape::Reference(name) => name.as_str() == Primitive::Boolean.boxed_name(),
        _ => false,
    }
}

/// Lower-case the first character, unless the first two are both upper
/// case (so acronyms like `URL` survive).
fn decapitalize(name: &str) -> String {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };
    let rest = chars.as_str();
    if rest.chars().next().is_some_and(char::is_uppercase) && first.is_uppercase() {
        return name.to_owned();
    }
    first.to_lowercase().chain(rest.chars()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bean(method: &str, returns: &TypeShape) -> String {
        BeanNaming::strict().property_name(method, returns).to_string()
    }

    fn boolean() -> TypeShape {
        TypeShape::Primitive(Primitive::Boolean)
    }

    fn entity() -> TypeShape {
        TypeShape::reference("Entity")
    }

    #[test]
    fn get_prefix_is_stripped() {
        assert_eq!(bean("getTargetWorld", &entity()), "targetWorld");
        assert_eq!(bean("getX", &entity()), "x");
    }

    #[test]
    fn get_without_boundary_is_kept() {
        assert_eq!(bean("getaway", &entity()), "getaway");
        assert_eq!(bean("get", &entity()), "get");
    }

    #[test]
    fn acronyms_keep_their_case() {
        assert_eq!(bean("getURL", &entity()), "URL");
        assert_eq!(bean("getUuid", &entity()), "uuid");
    }

    #[test]
    fn is_prefix_applies_to_booleans_only_when_strict() {
        assert_eq!(bean("isCancelled", &boolean()), "cancelled");
        assert_eq!(bean("isCancelled", &TypeShape::reference("Boolean")), "cancelled");
        assert_eq!(bean("isEmpty", &entity()), "isEmpty");
        let lenient = BeanNaming::lenient().property_name("isEmpty", &entity());
        assert_eq!(lenient.as_str(), "empty");
    }

    #[test]
    fn plain_names_pass_through() {
        assert_eq!(bean("cause", &entity()), "cause");
        assert_eq!(VerbatimNaming.property_name("getTargetWorld", &entity()).as_str(), "getTargetWorld");
    }
}
