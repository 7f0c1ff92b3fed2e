//! Runtime values of the primitive universe.
//!
//! [`Value`] covers the eight primitives plus strings and null — the value
//! domain the evaluation-semantics library computes over. The numeric
//! accessors follow the host's accessor semantics: a wider value truncates
//! when read at a narrower width, and a char reads as its code point.

use std::fmt;

use crate::primitive::PrimitiveKind;

/// A runtime value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Byte(i8),
    Short(i16),
    Char(char),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Str(String),
}

impl Value {
    /// The primitive kind of this value, if it has one.
    pub fn primitive_kind(&self) -> Option<PrimitiveKind> {
        Some(match self {
            Value::Bool(_) => PrimitiveKind::Bool,
            Value::Byte(_) => PrimitiveKind::Byte,
            Value::Short(_) => PrimitiveKind::Short,
            Value::Char(_) => PrimitiveKind::Char,
            Value::Int(_) => PrimitiveKind::Int,
            Value::Long(_) => PrimitiveKind::Long,
            Value::Float(_) => PrimitiveKind::Float,
            Value::Double(_) => PrimitiveKind::Double,
            Value::Null | Value::Str(_) => return None,
        })
    }

    /// Whether this value has a numeric interpretation (char included).
    pub fn is_numeric(&self) -> bool {
        self.primitive_kind()
            .is_some_and(PrimitiveKind::is_numeric)
    }

    /// Read this value at int width, truncating wider representations.
    pub fn to_i32(&self) -> Option<i32> {
        Some(match self {
            Value::Byte(v) => i32::from(*v),
            Value::Short(v) => i32::from(*v),
            Value::Char(v) => *v as i32,
            Value::Int(v) => *v,
            Value::Long(v) => *v as i32,
            Value::Float(v) => *v as i32,
            Value::Double(v) => *v as i32,
            _ => return None,
        })
    }

    /// Read this value at long width.
    pub fn to_i64(&self) -> Option<i64> {
        Some(match self {
            Value::Byte(v) => i64::from(*v),
            Value::Short(v) => i64::from(*v),
            Value::Char(v) => *v as i64,
            Value::Int(v) => i64::from(*v),
            Value::Long(v) => *v,
            Value::Float(v) => *v as i64,
            Value::Double(v) => *v as i64,
            _ => return None,
        })
    }

    /// Read this value at float width.
    pub fn to_f32(&self) -> Option<f32> {
        Some(match self {
            Value::Byte(v) => f32::from(*v),
            Value::Short(v) => f32::from(*v),
            Value::Char(v) => *v as u32 as f32,
            Value::Int(v) => *v as f32,
            Value::Long(v) => *v as f32,
            Value::Float(v) => *v,
            Value::Double(v) => *v as f32,
            _ => return None,
        })
    }

    /// Read this value at double width; chars read as their code point.
    pub fn to_f64(&self) -> Option<f64> {
        Some(match self {
            Value::Byte(v) => f64::from(*v),
            Value::Short(v) => f64::from(*v),
            Value::Char(v) => *v as u32 as f64,
            Value::Int(v) => f64::from(*v),
            Value::Long(v) => *v as f64,
            Value::Float(v) => f64::from(*v),
            Value::Double(v) => *v,
            _ => return None,
        })
    }

    /// Read this value as a bool.
    pub fn to_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(v) => write!(f, "{v}"),
            Value::Byte(v) => write!(f, "{v}"),
            Value::Short(v) => write!(f, "{v}"),
            Value::Char(v) => write!(f, "{v}"),
            Value::Int(v) => write!(f, "{v}"),
            Value::Long(v) => write!(f, "{v}"),
            // {:?} keeps a trailing ".0" on whole floats, matching the
            // host's textual rendering of floating-point values.
            Value::Float(v) => write!(f, "{v:?}"),
            Value::Double(v) => write!(f, "{v:?}"),
            Value::Str(v) => write!(f, "{v}"),
        }
    }
}
