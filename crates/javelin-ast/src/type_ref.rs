//! Unresolved source-level type references.

use std::fmt;

use javelin_core::Span;

/// A type as written in source: a primitive keyword or a (possibly
/// qualified, possibly parameterized) class name, with array dimensions.
///
/// References stay unresolved until the checker maps them to semantic
/// types; type arguments are resolved for well-formedness and then erased.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeRef {
    /// The name as written: a primitive keyword, a simple name, or a
    /// dotted qualified name.
    pub name: String,
    /// Type arguments, empty for a raw reference.
    pub args: Vec<TypeRef>,
    /// Array dimensions.
    pub dims: u8,
    pub span: Span,
}

impl TypeRef {
    /// A raw, non-array reference to `name`.
    pub fn named(name: impl Into<String>, span: Span) -> Self {
        Self {
            name: name.into(),
            args: Vec::new(),
            dims: 0,
            span,
        }
    }

    /// This reference with one more array dimension.
    pub fn array(mut self) -> Self {
        self.dims += 1;
        self
    }

    /// This reference with the given type arguments.
    pub fn with_args(mut self, args: Vec<TypeRef>) -> Self {
        self.args = args;
        self
    }

    /// Whether this reference is parameterized.
    pub fn is_parameterized(&self) -> bool {
        !self.args.is_empty()
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if !self.args.is_empty() {
            write!(f, "<")?;
            for (i, arg) in self.args.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{arg}")?;
            }
            write!(f, ">")?;
        }
        for _ in 0..self.dims {
            write!(f, "[]")?;
        }
        Ok(())
    }
}
