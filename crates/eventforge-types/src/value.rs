//! Dynamic property values.
//!
//! A [`Value`] is what a property bag maps names to and what a synthesized
//! instance hands back from its accessors. Reference-like variants share
//! their allocation on clone, so binding a value never copies nested data.

use core::fmt;
use core::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::object::{EventObject, ObjectRef};
use crate::shape::Primitive;

/// A property value.
#[derive(Debug, Clone)]
pub enum Value {
    /// The explicit "no value" marker for optional accessors.
    Absent,
    /// A `boolean`.
    Bool(bool),
    /// A `byte`.
    Byte(i8),
    /// A `short`.
    Short(i16),
    /// A `char`.
    Char(char),
    /// An `int`.
    Int(i32),
    /// A `long`.
    Long(i64),
    /// A `float`.
    Float(f32),
    /// A `double`.
    Double(f64),
    /// A shared string.
    Str(Arc<str>),
    /// A shared host object.
    Object(ObjectRef),
    /// A shared sequence of values.
    List(Arc<[Value]>),
}

impl Value {
    /// Wrap a host object.
    pub fn object<T>(value: T) -> Self
    where
        T: EventObject + PartialEq + Hash,
    {
        Self::Object(ObjectRef::new(value))
    }

    /// Build a list value.
    pub fn list(items: impl IntoIterator<Item = Self>) -> Self {
        Self::List(items.into_iter().collect())
    }

    /// Whether this is the "no value" marker.
    pub const fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    /// `None` for [`Value::Absent`], the value otherwise.
    pub const fn present(&self) -> Option<&Self> {
        match self {
            Self::Absent => None,
            other => Some(other),
        }
    }

    /// The primitive kind of this value, if it is a primitive.
    pub const fn primitive(&self) -> Option<Primitive> {
        match self {
            Self::Bool(_) => Some(Primitive::Boolean),
            Self::Byte(_) => Some(Primitive::Byte),
            Self::Short(_) => Some(Primitive::Short),
            Self::Char(_) => Some(Primitive::Char),
            Self::Int(_) => Some(Primitive::Int),
            Self::Long(_) => Some(Primitive::Long),
            Self::Float(_) => Some(Primitive::Float),
            Self::Double(_) => Some(Primitive::Double),
            Self::Absent | Self::Str(_) | Self::Object(_) | Self::List(_) => None,
        }
    }

    /// A short description of the value's runtime kind, for diagnostics.
    pub fn kind_name(&self) -> String {
        match self {
            Self::Absent => "absent".to_owned(),
            Self::Str(_) => crate::names::STRING.to_owned(),
            Self::Object(object) => object.type_name().to_owned(),
            Self::List(_) => "List".to_owned(),
            primitive => primitive
                .primitive()
                .map_or("unknown", Primitive::keyword)
                .to_owned(),
        }
    }

    /// Whether both values are the same allocation (reference variants) or
    /// equal (everything else).
    pub fn same_as(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Str(a), Self::Str(b)) => Arc::ptr_eq(a, b),
            (Self::Object(a), Self::Object(b)) => a.ptr_eq(b),
            (Self::List(a), Self::List(b)) => Arc::ptr_eq(a, b),
            (a, b) => a == b,
        }
    }

    /// Convert a primitive to the `target` kind along a widening path.
    ///
    /// Returns `None` when the value is not a primitive or the conversion
    /// would narrow.
    pub fn widen(&self, target: Primitive) -> Option<Self> {
        let source = self.primitive()?;
        if !source.widens_to(target) {
            return None;
        }
        if source == target {
            return Some(self.clone());
        }
        match target {
            Primitive::Short => match self {
                Self::Byte(v) => Some(Self::Short(i16::from(*v))),
                _ => None,
            },
            Primitive::Int => self.integral().and_then(|v| i32::try_from(v).ok()).map(Self::Int),
            Primitive::Long => self.integral().map(Self::Long),
            Primitive::Float => self.single().map(Self::Float),
            Primitive::Double => self.floating().map(Self::Double),
            Primitive::Boolean | Primitive::Byte | Primitive::Char => None,
        }
    }

    /// Integral primitives as `i64`.
    fn integral(&self) -> Option<i64> {
        match self {
            Self::Byte(v) => Some(i64::from(*v)),
            Self::Short(v) => Some(i64::from(*v)),
            Self::Char(c) => Some(i64::from(u32::from(*c))),
            Self::Int(v) => Some(i64::from(*v)),
            Self::Long(v) => Some(*v),
            _ => None,
        }
    }

    /// Numeric primitives as `f64`.
    #[allow(clippy::cast_precision_loss)]
    fn floating(&self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(f64::from(*v)),
            Self::Double(v) => Some(*v),
            // long -> float/double may round, as the widening rules allow.
            other => other.integral().map(|v| v as f64),
        }
    }

    /// Numeric primitives as `f32`.
    #[allow(clippy::cast_precision_loss)]
    fn single(&self) -> Option<f32> {
        match self {
            Self::Float(v) => Some(*v),
            other => other.integral().map(|v| v as f32),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Absent, Self::Absent) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Byte(a), Self::Byte(b)) => a == b,
            (Self::Short(a), Self::Short(b)) => a == b,
            (Self::Char(a), Self::Char(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Long(a), Self::Long(b)) => a == b,
            // Bit patterns, so NaN equals itself and Eq/Hash agree.
            (Self::Float(a), Self::Float(b)) => a.to_bits() == b.to_bits(),
            (Self::Double(a), Self::Double(b)) => a.to_bits() == b.to_bits(),
            (Self::Str(a), Self::Str(b)) => a == b,
            (Self::Object(a), Self::Object(b)) => a == b,
            (Self::List(a), Self::List(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        core::mem::discriminant(self).hash(state);
        match self {
            Self::Absent => {}
            Self::Bool(v) => v.hash(state),
            Self::Byte(v) => v.hash(state),
            Self::Short(v) => v.hash(state),
            Self::Char(v) => v.hash(state),
            Self::Int(v) => v.hash(state),
            Self::Long(v) => v.hash(state),
            Self::Float(v) => v.to_bits().hash(state),
            Self::Double(v) => v.to_bits().hash(state),
            Self::Str(v) => v.hash(state),
            Self::Object(v) => v.hash(state),
            Self::List(v) => v.hash(state),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Absent => f.write_str("absent"),
            Self::Bool(v) => write!(f, "{v}"),
            Self::Byte(v) => write!(f, "{v}"),
            Self::Short(v) => write!(f, "{v}"),
            Self::Char(v) => write!(f, "{v:?}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Long(v) => write!(f, "{v}L"),
            Self::Float(v) => write!(f, "{v}f"),
            Self::Double(v) => write!(f, "{v}"),
            Self::Str(v) => write!(f, "{v:?}"),
            Self::Object(v) => write!(f, "{v:?}"),
            Self::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
        }
    }
}

macro_rules! impl_from_primitive {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Self::$variant(v)
                }
            }
        )*
    };
}

impl_from_primitive! {
    bool => Bool,
    i8 => Byte,
    i16 => Short,
    char => Char,
    i32 => Int,
    i64 => Long,
    f32 => Float,
    f64 => Double,
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Str(Arc::from(v))
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Str(Arc::from(v))
    }
}

impl From<ObjectRef> for Value {
    fn from(v: ObjectRef) -> Self {
        Self::Object(v)
    }
}

impl<T: Into<Self>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Absent, Into::into)
    }
}
