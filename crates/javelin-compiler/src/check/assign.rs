//! Assignment compatibility.
//!
//! Primitive sources follow the widening table, with the special case that
//! an int literal fits a narrower target when its value round-trips
//! through narrowing. Reference compatibility holds in either direction of
//! the subtype relation, matching the language's declared-type checking
//! (implicit narrowing-by-assignment), not value-level subtyping. Boxing
//! and unboxing conversions apply at the modern level and synthesize their
//! conversion nodes in place.

use javelin_ast::Expr;
use javelin_core::ops;
use javelin_core::{CheckError, Feature, Type, WrapperKind, ty::OBJECT_CLASS};

use crate::check::{TypeChecker, boxing};
use crate::env::CompileEnv;
use crate::finder::reaches;

impl TypeChecker {
    /// Type-level assignment compatibility, including boxing equivalences
    /// at the modern level. Used where no conversion node can be inserted
    /// (overload filtering, iteration element checks).
    pub fn assignable_types(
        &self,
        env: &mut CompileEnv<'_>,
        target: &Type,
        source: &Type,
    ) -> Result<bool, CheckError> {
        if self.assignable_no_boxing(env, target, source)? {
            return Ok(true);
        }
        if !self.level().is_modern() {
            return Ok(false);
        }
        match (target, source) {
            // unboxing, then primitive widening
            (Type::Primitive(t), _) => Ok(source
                .as_wrapper()
                .is_some_and(|w| ops::primitive_assignable(*t, w.spec().primitive))),
            // boxing, then reference widening
            (Type::Named(t), Type::Primitive(s)) => {
                let wrapper = WrapperKind::of_primitive(*s).class_name();
                Ok(wrapper == *t || reaches(env, &wrapper, t)?)
            }
            _ => Ok(false),
        }
    }

    fn assignable_no_boxing(
        &self,
        env: &mut CompileEnv<'_>,
        target: &Type,
        source: &Type,
    ) -> Result<bool, CheckError> {
        Ok(match (target, source) {
            (Type::Primitive(t), Type::Primitive(s)) => ops::primitive_assignable(*t, *s),
            (Type::Named(t), Type::Named(s)) => {
                // either direction of the subtype relation
                t == s || reaches(env, s, t)? || reaches(env, t, s)?
            }
            (Type::Named(_), Type::Null) | (Type::Array(_), Type::Null) => true,
            (Type::Named(t), Type::Array(_)) => t.binary() == OBJECT_CLASS,
            (Type::Array(t), Type::Array(s)) => match (t.as_primitive(), s.as_primitive()) {
                (Some(tp), Some(sp)) => tp == sp,
                (None, None) => self.assignable_no_boxing(env, t, s)?,
                _ => false,
            },
            _ => false,
        })
    }

    /// Check that `value` can initialize or be assigned to a `target` of
    /// the given type, inserting boxing/unboxing nodes where that is what
    /// makes the assignment valid.
    pub fn check_assignable(
        &self,
        env: &mut CompileEnv<'_>,
        target: &Type,
        value: &mut Expr,
    ) -> Result<(), CheckError> {
        let source = value.ty.clone().ok_or_else(|| CheckError::Internal {
            detail: "assignment source left unannotated".into(),
        })?;
        // an int literal reaches a narrower target when it round-trips
        if let (Type::Primitive(t), Some(v)) = (target, value.as_int_literal()) {
            if ops::int_fits(*t, v) {
                return Ok(());
            }
        }
        if self.assignable_no_boxing(env, target, &source)? {
            return Ok(());
        }
        match (target, &source) {
            (Type::Primitive(t), Type::Named(_)) => {
                if source.as_wrapper().is_some() {
                    self.gate(Feature::Autoboxing, value.span)?;
                    let unboxed = boxing::unbox(env, value)?;
                    if ops::primitive_assignable(*t, unboxed) {
                        return Ok(());
                    }
                }
            }
            (Type::Named(t), Type::Primitive(s)) => {
                let wrapper = WrapperKind::of_primitive(*s);
                let wrapper_class = wrapper.class_name();
                if wrapper_class == *t || reaches(env, &wrapper_class, t)? {
                    self.gate(Feature::Autoboxing, value.span)?;
                    boxing::box_expr(env, value, wrapper)?;
                    return Ok(());
                }
            }
            _ => {}
        }
        Err(CheckError::IncompatibleAssignment {
            target: target.to_string(),
            source_ty: source.to_string(),
            span: value.span,
        })
    }
}
