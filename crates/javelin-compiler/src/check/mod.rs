//! The level-gated type checker.
//!
//! One checking algorithm with two behaviors, selected once per session by
//! [`LanguageLevel`]: the classic level rejects per-element iteration,
//! parameterized types, variable-arity parameters, static member imports,
//! and automatic boxing/unboxing, each with an error naming the construct;
//! the modern level accepts them, synthesizing boxing constructor calls
//! and unboxing accessor calls from the fixed wrapper table.
//!
//! The checker resolves identifier and member types through the finder —
//! which can recursively trigger compilation — writes the static type into
//! every expression node, and rewrites children in place to insert the
//! conversion nodes it synthesizes, preserving source positions.

mod assign;
mod boxing;
mod expr;
mod members;
mod stmt;

use javelin_ast::TypeDecl;
use javelin_core::{CheckError, Feature, LanguageLevel, Span};

/// The type checker for one session.
#[derive(Debug, Clone, Copy)]
pub struct TypeChecker {
    level: LanguageLevel,
}

impl TypeChecker {
    /// A checker at the given language level.
    pub fn new(level: LanguageLevel) -> Self {
        Self { level }
    }

    /// The session's language level.
    pub fn level(&self) -> LanguageLevel {
        self.level
    }

    /// Reject `feature` unless the level accepts it.
    pub(crate) fn gate(&self, feature: Feature, span: Span) -> Result<(), CheckError> {
        if self.level.is_modern() {
            Ok(())
        } else {
            Err(CheckError::UnsupportedFeature { feature, span })
        }
    }

    /// Declaration-level feature gates: variable-arity parameters and
    /// parameterized type references are rejected at the classic level
    /// wherever they appear in a declaration's signatures.
    pub fn check_decl(&self, decl: &TypeDecl) -> Result<(), CheckError> {
        if self.level.is_modern() {
            return Ok(());
        }
        for field in &decl.fields {
            self.gate_type_ref(&field.ty)?;
        }
        for ctor in &decl.ctors {
            if ctor.varargs {
                return Err(CheckError::UnsupportedFeature {
                    feature: Feature::VariableArity,
                    span: ctor.span,
                });
            }
            for param in &ctor.params {
                self.gate_type_ref(&param.ty)?;
            }
        }
        for method in &decl.methods {
            if method.varargs {
                return Err(CheckError::UnsupportedFeature {
                    feature: Feature::VariableArity,
                    span: method.span,
                });
            }
            self.gate_type_ref(&method.ret)?;
            for param in &method.params {
                self.gate_type_ref(&param.ty)?;
            }
        }
        if let Some(superclass) = &decl.superclass {
            self.gate_type_ref(superclass)?;
        }
        for interface in &decl.interfaces {
            self.gate_type_ref(interface)?;
        }
        for nested in &decl.inner {
            self.check_decl(nested)?;
        }
        Ok(())
    }

    fn gate_type_ref(&self, type_ref: &javelin_ast::TypeRef) -> Result<(), CheckError> {
        if type_ref.is_parameterized() {
            return Err(CheckError::UnsupportedFeature {
                feature: Feature::ParameterizedTypes,
                span: type_ref.span,
            });
        }
        Ok(())
    }
}
