//! Semantic types.
//!
//! [`Type`] is the static type the checker annotates expressions with:
//! a primitive, a named class or interface, an array, the null type, or
//! void. Parameterized type references are erased to their raw named type
//! during resolution, so no type arguments appear here.

use std::fmt;

use crate::name::ClassName;
use crate::primitive::{PrimitiveKind, WrapperKind};

/// Binary name of the textual class.
pub const STRING_CLASS: &str = "lang.String";

/// Binary name of the root class.
pub const OBJECT_CLASS: &str = "lang.Object";

/// A static type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    /// The type of an absent result.
    Void,
    /// The type of the null literal, assignable to any reference type.
    Null,
    /// A primitive type.
    Primitive(PrimitiveKind),
    /// A class or interface type.
    Named(ClassName),
    /// An array type with the given component type.
    Array(Box<Type>),
}

impl Type {
    /// The `lang.String` type.
    pub fn string() -> Type {
        Type::Named(ClassName::from_binary(STRING_CLASS))
    }

    /// The `lang.Object` type.
    pub fn object() -> Type {
        Type::Named(ClassName::from_binary(OBJECT_CLASS))
    }

    /// An array of this type.
    pub fn array_of(self) -> Type {
        Type::Array(Box::new(self))
    }

    /// Whether this is the textual type, which overloads addition into
    /// concatenation.
    pub fn is_textual(&self) -> bool {
        matches!(self, Type::Named(name) if name.binary() == STRING_CLASS)
    }

    /// Whether this is a reference type (named, array, or null).
    pub fn is_reference(&self) -> bool {
        matches!(self, Type::Named(_) | Type::Array(_) | Type::Null)
    }

    /// The primitive kind, if this is a primitive type.
    pub fn as_primitive(&self) -> Option<PrimitiveKind> {
        match self {
            Type::Primitive(kind) => Some(*kind),
            _ => None,
        }
    }

    /// The named class, if this is a class or interface type.
    pub fn as_named(&self) -> Option<&ClassName> {
        match self {
            Type::Named(name) => Some(name),
            _ => None,
        }
    }

    /// The component type, if this is an array type.
    pub fn component(&self) -> Option<&Type> {
        match self {
            Type::Array(component) => Some(component),
            _ => None,
        }
    }

    /// The wrapper kind, if this is one of the eight wrapper class types.
    pub fn as_wrapper(&self) -> Option<WrapperKind> {
        self.as_named().and_then(WrapperKind::of_class)
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Void => write!(f, "void"),
            Type::Null => write!(f, "null"),
            Type::Primitive(kind) => write!(f, "{}", kind.keyword()),
            Type::Named(name) => write!(f, "{name}"),
            Type::Array(component) => write!(f, "{component}[]"),
        }
    }
}
