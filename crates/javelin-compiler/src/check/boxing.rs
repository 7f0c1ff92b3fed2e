//! Boxing and unboxing node synthesis.
//!
//! Conversions are driven by the fixed wrapper table: boxing replaces the
//! value with a constructor call on its wrapper class, unboxing replaces
//! the value with a call to the wrapper's no-argument accessor. Both
//! rewrites preserve the original node's source position.
//!
//! Before synthesizing, the wrapper class is checked against the host
//! image for the expected constructor or accessor; a miss is an internal
//! consistency failure — the table is stale, not the user's code.

use javelin_ast::{Expr, ExprKind, Lit, TypeRef};
use javelin_core::{CheckError, PrimitiveKind, Type, WrapperKind};

use crate::env::CompileEnv;

/// Rewrite `expr` into a call to its wrapper's unboxing accessor.
///
/// Fails with "no such unboxing conversion" when the expression's type is
/// not one of the eight wrapper types.
pub(crate) fn unbox(
    env: &mut CompileEnv<'_>,
    expr: &mut Expr,
) -> Result<PrimitiveKind, CheckError> {
    let ty = expr.ty.clone().ok_or_else(|| CheckError::Internal {
        detail: "unboxing an unannotated expression".into(),
    })?;
    let Some(wrapper) = ty.as_wrapper() else {
        return Err(CheckError::NoUnboxingConversion {
            ty: ty.to_string(),
            span: expr.span,
        });
    };
    let spec = wrapper.spec();
    let class = wrapper.class_name();
    let desc = env.host.find(&class).ok_or_else(|| CheckError::Internal {
        detail: format!("wrapper class {class} missing from the host image"),
    })?;
    if !desc
        .methods
        .iter()
        .any(|m| m.name == spec.accessor && m.params.is_empty())
    {
        return Err(CheckError::Internal {
            detail: format!("wrapper class {class} lacks accessor {}", spec.accessor),
        });
    }

    let span = expr.span;
    let receiver = std::mem::replace(expr, Expr::new(ExprKind::Literal(Lit::Null), span));
    *expr = Expr {
        kind: ExprKind::Call {
            target: Some(Box::new(receiver)),
            name: spec.accessor.to_string(),
            args: Vec::new(),
        },
        span,
        ty: Some(Type::Primitive(spec.primitive)),
    };
    Ok(spec.primitive)
}

/// Rewrite `expr` into a constructor call boxing it into `wrapper`.
pub(crate) fn box_expr(
    env: &mut CompileEnv<'_>,
    expr: &mut Expr,
    wrapper: WrapperKind,
) -> Result<(), CheckError> {
    let spec = wrapper.spec();
    let class = wrapper.class_name();
    let desc = env.host.find(&class).ok_or_else(|| CheckError::Internal {
        detail: format!("wrapper class {class} missing from the host image"),
    })?;
    if !desc
        .ctors
        .iter()
        .any(|params| params.len() == 1 && params[0] == Type::Primitive(spec.primitive))
    {
        return Err(CheckError::Internal {
            detail: format!(
                "wrapper class {class} lacks a {} constructor",
                spec.primitive.keyword()
            ),
        });
    }

    let span = expr.span;
    let value = std::mem::replace(expr, Expr::new(ExprKind::Literal(Lit::Null), span));
    *expr = Expr {
        kind: ExprKind::New {
            class: TypeRef::named(spec.class_name, span),
            args: vec![value],
        },
        span,
        ty: Some(Type::Named(class)),
    };
    Ok(())
}
