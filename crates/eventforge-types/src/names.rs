//! Interned-string name wrappers for types and properties.
//!
//! Names are compared on every bind and every accessor lookup, so they are
//! backed by a shared [`Arc<str>`]: cloning a name never copies the text.
//! Each wrapper implements [`Borrow<str>`] so maps keyed by a name can be
//! queried with a plain `&str`.

use std::borrow::Borrow;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Generates a newtype wrapper around [`Arc<str>`] with standard derives.
macro_rules! define_name {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Arc<str>);

        impl $name {
            /// Create a name from anything that converts into shared text.
            pub fn new(name: impl Into<Arc<str>>) -> Self {
                Self(name.into())
            }

            /// Return the name as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(name: &str) -> Self {
                Self(Arc::from(name))
            }
        }

        impl From<String> for $name {
            fn from(name: String) -> Self {
                Self(Arc::from(name))
            }
        }

        impl From<&$name> for $name {
            fn from(name: &$name) -> Self {
                name.clone()
            }
        }
    };
}

define_name! {
    /// Name of an interface or a plain reference type (e.g. `ChangeBlockEvent`,
    /// `Entity`). Interface identity, and therefore the descriptor cache key.
    TypeName
}

define_name! {
    /// Key of one logical property, derived from an accessor's method name
    /// (e.g. `getTargetWorld` -> `targetWorld`). Case-sensitive and exact.
    PropertyName
}

/// The root reference type every other reference type is assignable to.
pub const OBJECT: &str = "Object";

/// The reference type that string values satisfy.
pub const STRING: &str = "String";

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn names_lookup_by_str() {
        let mut map = HashMap::new();
        map.insert(PropertyName::from("targetWorld"), 1_u32);
        assert_eq!(map.get("targetWorld"), Some(&1));
        assert_eq!(map.get("TargetWorld"), None);
    }

    #[test]
    fn clone_shares_text() {
        let name = TypeName::from("ChangeBlockEvent");
        let copy = name.clone();
        assert!(core::ptr::eq(name.as_str(), copy.as_str()));
    }

    #[test]
    fn serde_is_transparent() {
        let name = PropertyName::from("note");
        let json = serde_json::to_string(&name).ok();
        assert_eq!(json.as_deref(), Some("\"note\""));
    }
}
