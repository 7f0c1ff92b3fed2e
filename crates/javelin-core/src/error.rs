//! Unified error types for javelin.
//!
//! This module provides a consistent error hierarchy for all phases of
//! processing a source fragment: parsing (the external parser seam), type
//! checking, and class compilation.
//!
//! ## Error Hierarchy
//!
//! ```text
//! JavelinError (top-level wrapper)
//! ├── ParseError    - raised by the external parser collaborator
//! ├── CheckError    - resolution, version-gate, conversion, and internal
//! │                   consistency failures during type checking
//! └── CompileError  - class discovery/compilation failures
//! ```
//!
//! Resolution, version-gate, and conversion failures abort checking of the
//! current top-level statement or declaration only; the session remains
//! usable afterwards. Internal consistency failures indicate a stale
//! conversion table, not a user mistake.

use std::fmt;

use thiserror::Error;

use crate::span::Span;

// ============================================================================
// Parser seam
// ============================================================================

/// Error raised by the external parser collaborator.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    /// Malformed input, positioned by line/column within a named unit.
    #[error("syntax error in {file} at {line}:{column}: {message}")]
    Syntax {
        message: String,
        line: u32,
        column: u32,
        file: String,
    },
}

// ============================================================================
// Version-gated constructs
// ============================================================================

/// A construct accepted only at the modern language level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    /// `for (T x : values) ...`
    PerElementIteration,
    /// `List<T>` and friends.
    ParameterizedTypes,
    /// `void f(int... rest)`
    VariableArity,
    /// `import static pkg.Cls.member;` / `import static pkg.Cls.*;`
    StaticImports,
    /// Implicit boxing and unboxing conversions.
    Autoboxing,
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Feature::PerElementIteration => "per-element iteration",
            Feature::ParameterizedTypes => "parameterized types",
            Feature::VariableArity => "variable-arity parameters",
            Feature::StaticImports => "static member imports",
            Feature::Autoboxing => "automatic boxing and unboxing",
        };
        f.write_str(name)
    }
}

// ============================================================================
// Type checking
// ============================================================================

/// Errors raised while type-checking a fragment.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CheckError {
    /// No class of the searched name exists on any resolution path.
    #[error("class {name} not found")]
    ClassNotFound { name: String },

    /// No field of the searched name exists on the class or its ancestors.
    #[error("field {name} not found on {class} at {span}")]
    FieldNotFound {
        class: String,
        name: String,
        span: Span,
    },

    /// No applicable method of the searched name exists.
    #[error("method {name} not found on {class} at {span}")]
    MethodNotFound {
        class: String,
        name: String,
        span: Span,
    },

    /// No applicable constructor exists.
    #[error("no applicable constructor for {class} at {span}")]
    ConstructorNotFound { class: String, span: Span },

    /// An identifier with no binding in scope.
    #[error("variable {name} is not defined at {span}")]
    UndefinedVariable { name: String, span: Span },

    /// A construct the session's language level does not accept.
    #[error("{feature} requires a newer language version at {span}")]
    UnsupportedFeature { feature: Feature, span: Span },

    /// Unboxing was required of a value that is not one of the eight
    /// wrapper types.
    #[error("no such unboxing conversion from {ty} at {span}")]
    NoUnboxingConversion { ty: String, span: Span },

    /// The source type has no assignment conversion to the target.
    #[error("cannot assign {source_ty} to {target} at {span}")]
    IncompatibleAssignment {
        target: String,
        source_ty: String,
        span: Span,
    },

    /// No cast exists between the two types.
    #[error("cannot cast {from} to {to} at {span}")]
    InvalidCast {
        from: String,
        to: String,
        span: Span,
    },

    /// Per-element iteration over a value that is neither an array nor a
    /// collection.
    #[error("collection type required for iteration, found {ty} at {span}")]
    CollectionRequired { ty: String, span: Span },

    /// The declared element type cannot receive the collection's elements.
    #[error("collection type mismatch: element {element} is not assignable from {component} at {span}")]
    CollectionElement {
        element: String,
        component: String,
        span: Span,
    },

    /// An operand of an unexpected type.
    #[error("expected {expected} operand, found {found} at {span}")]
    OperandType {
        expected: &'static str,
        found: String,
        span: Span,
    },

    /// An internal table disagreed with the host library. Fatal: the table
    /// is stale, the user's code is not at fault.
    #[error("internal consistency failure: {detail}")]
    Internal { detail: String },
}

impl CheckError {
    /// The source position this error is attached to, if any.
    pub fn span(&self) -> Option<Span> {
        match self {
            CheckError::ClassNotFound { .. } | CheckError::Internal { .. } => None,
            CheckError::FieldNotFound { span, .. }
            | CheckError::MethodNotFound { span, .. }
            | CheckError::ConstructorNotFound { span, .. }
            | CheckError::UndefinedVariable { span, .. }
            | CheckError::UnsupportedFeature { span, .. }
            | CheckError::NoUnboxingConversion { span, .. }
            | CheckError::IncompatibleAssignment { span, .. }
            | CheckError::InvalidCast { span, .. }
            | CheckError::CollectionRequired { span, .. }
            | CheckError::CollectionElement { span, .. }
            | CheckError::OperandType { span, .. } => Some(*span),
        }
    }
}

// ============================================================================
// Compilation
// ============================================================================

/// Errors raised while discovering or compiling classes.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CompileError {
    /// The requested name was never produced as a compiled result. Classes
    /// compiled as a side effect of the same batch remain installed.
    #[error("class {name} not found")]
    ClassNotFound { name: String },

    /// A directly injected declaration could not be compiled, or collided
    /// with an already-defined class.
    #[error("undefined or already defined class {name} at {span}")]
    UndefinedOrAlreadyDefined { name: String, span: Span },

    /// Bytecode synthesis failed for one class.
    #[error("class emission failed for {name}: {detail}")]
    Emit { name: String, detail: String },

    /// The parser collaborator rejected a source unit.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Resolution failed while cross-referencing class descriptions.
    #[error(transparent)]
    Check(#[from] CheckError),
}

// ============================================================================
// Top-level wrapper
// ============================================================================

/// Any javelin error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum JavelinError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Check(#[from] CheckError),
    #[error(transparent)]
    Compile(#[from] CompileError),
}
