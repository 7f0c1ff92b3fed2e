//! The primitive type universe and its wrapper classes.
//!
//! Eight primitive kinds, each paired with a wrapper class under `lang.*`.
//! Boxing and unboxing are driven by [`WRAPPER_TABLE`], a fixed enumeration
//! mapping each [`WrapperKind`] to its primitive kind, wrapper class name,
//! and no-argument unboxing accessor. The table is indexed by the wrapper
//! kind's discriminant.

use num_enum::{IntoPrimitive, TryFromPrimitive};

use crate::name::ClassName;

/// A primitive type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Bool,
    Byte,
    Char,
    Short,
    Int,
    Long,
    Float,
    Double,
}

impl PrimitiveKind {
    /// Source-level keyword for this primitive.
    pub fn keyword(self) -> &'static str {
        match self {
            PrimitiveKind::Bool => "boolean",
            PrimitiveKind::Byte => "byte",
            PrimitiveKind::Char => "char",
            PrimitiveKind::Short => "short",
            PrimitiveKind::Int => "int",
            PrimitiveKind::Long => "long",
            PrimitiveKind::Float => "float",
            PrimitiveKind::Double => "double",
        }
    }

    /// Parse a primitive keyword.
    pub fn from_keyword(kw: &str) -> Option<Self> {
        Some(match kw {
            "boolean" => PrimitiveKind::Bool,
            "byte" => PrimitiveKind::Byte,
            "char" => PrimitiveKind::Char,
            "short" => PrimitiveKind::Short,
            "int" => PrimitiveKind::Int,
            "long" => PrimitiveKind::Long,
            "float" => PrimitiveKind::Float,
            "double" => PrimitiveKind::Double,
            _ => return None,
        })
    }

    /// Whether this kind participates in arithmetic.
    pub fn is_numeric(self) -> bool {
        !matches!(self, PrimitiveKind::Bool)
    }

    /// Whether this kind is an integral type (char included).
    pub fn is_integral(self) -> bool {
        matches!(
            self,
            PrimitiveKind::Byte
                | PrimitiveKind::Char
                | PrimitiveKind::Short
                | PrimitiveKind::Int
                | PrimitiveKind::Long
        )
    }

    /// Unary numeric promotion: byte, short, and char widen to int before
    /// arithmetic; wider kinds keep their representation.
    pub fn promote_unary(self) -> PrimitiveKind {
        match self {
            PrimitiveKind::Byte | PrimitiveKind::Char | PrimitiveKind::Short | PrimitiveKind::Int => {
                PrimitiveKind::Int
            }
            other => other,
        }
    }

    /// Binary numeric promotion ladder.
    ///
    /// The result representation is the narrowest of double > float > long >
    /// int that is no narrower than either operand's natural width,
    /// defaulting to int.
    pub fn promote_binary(self, other: PrimitiveKind) -> PrimitiveKind {
        use PrimitiveKind::*;
        match (self, other) {
            (Double, _) | (_, Double) => Double,
            (Float, _) | (_, Float) => Float,
            (Long, _) | (_, Long) => Long,
            _ => Int,
        }
    }

    /// Whether a value of this kind widens to `target` without loss of
    /// magnitude (identity excluded).
    pub fn widens_to(self, target: PrimitiveKind) -> bool {
        use PrimitiveKind::*;
        matches!(
            (self, target),
            (Byte, Short)
                | (Byte, Int)
                | (Byte, Long)
                | (Byte, Float)
                | (Byte, Double)
                | (Short, Int)
                | (Short, Long)
                | (Short, Float)
                | (Short, Double)
                | (Char, Int)
                | (Char, Long)
                | (Char, Float)
                | (Char, Double)
                | (Int, Long)
                | (Int, Float)
                | (Int, Double)
                | (Long, Float)
                | (Long, Double)
                | (Float, Double)
        )
    }
}

/// A wrapper class kind, one per primitive.
///
/// The discriminant indexes [`WRAPPER_TABLE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum WrapperKind {
    Boolean = 0,
    Byte = 1,
    Character = 2,
    Short = 3,
    Integer = 4,
    Long = 5,
    Float = 6,
    Double = 7,
}

/// One row of the boxing/unboxing conversion table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WrapperSpec {
    /// The wrapper kind this row describes.
    pub kind: WrapperKind,
    /// The primitive this wrapper boxes.
    pub primitive: PrimitiveKind,
    /// Binary name of the wrapper class.
    pub class_name: &'static str,
    /// Name of the no-argument unboxing accessor.
    pub accessor: &'static str,
}

/// The fixed boxing/unboxing conversion table, indexed by wrapper kind.
pub const WRAPPER_TABLE: [WrapperSpec; 8] = [
    WrapperSpec {
        kind: WrapperKind::Boolean,
        primitive: PrimitiveKind::Bool,
        class_name: "lang.Boolean",
        accessor: "booleanValue",
    },
    WrapperSpec {
        kind: WrapperKind::Byte,
        primitive: PrimitiveKind::Byte,
        class_name: "lang.Byte",
        accessor: "byteValue",
    },
    WrapperSpec {
        kind: WrapperKind::Character,
        primitive: PrimitiveKind::Char,
        class_name: "lang.Character",
        accessor: "charValue",
    },
    WrapperSpec {
        kind: WrapperKind::Short,
        primitive: PrimitiveKind::Short,
        class_name: "lang.Short",
        accessor: "shortValue",
    },
    WrapperSpec {
        kind: WrapperKind::Integer,
        primitive: PrimitiveKind::Int,
        class_name: "lang.Integer",
        accessor: "intValue",
    },
    WrapperSpec {
        kind: WrapperKind::Long,
        primitive: PrimitiveKind::Long,
        class_name: "lang.Long",
        accessor: "longValue",
    },
    WrapperSpec {
        kind: WrapperKind::Float,
        primitive: PrimitiveKind::Float,
        class_name: "lang.Float",
        accessor: "floatValue",
    },
    WrapperSpec {
        kind: WrapperKind::Double,
        primitive: PrimitiveKind::Double,
        class_name: "lang.Double",
        accessor: "doubleValue",
    },
];

impl WrapperKind {
    /// The table row for this wrapper kind.
    pub fn spec(self) -> &'static WrapperSpec {
        let idx: u8 = self.into();
        &WRAPPER_TABLE[idx as usize]
    }

    /// The wrapper kind boxing `primitive`.
    pub fn of_primitive(primitive: PrimitiveKind) -> WrapperKind {
        match primitive {
            PrimitiveKind::Bool => WrapperKind::Boolean,
            PrimitiveKind::Byte => WrapperKind::Byte,
            PrimitiveKind::Char => WrapperKind::Character,
            PrimitiveKind::Short => WrapperKind::Short,
            PrimitiveKind::Int => WrapperKind::Integer,
            PrimitiveKind::Long => WrapperKind::Long,
            PrimitiveKind::Float => WrapperKind::Float,
            PrimitiveKind::Double => WrapperKind::Double,
        }
    }

    /// The wrapper kind whose class has the given binary name, if any.
    pub fn of_class(name: &ClassName) -> Option<WrapperKind> {
        let binary = name.binary();
        WRAPPER_TABLE
            .iter()
            .find(|spec| spec.class_name == binary)
            .map(|spec| spec.kind)
    }

    /// Binary name of the wrapper class.
    pub fn class_name(self) -> ClassName {
        ClassName::from_binary(self.spec().class_name)
    }
}
