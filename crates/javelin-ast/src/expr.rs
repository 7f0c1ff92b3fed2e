//! Expression nodes.
//!
//! Every expression carries its span and a static-type slot the checker
//! fills in. The checker also rewrites children in place to insert the
//! conversion nodes it synthesizes (boxing constructor calls, unboxing
//! accessor calls), always preserving the replaced node's span.

use ordered_float::OrderedFloat;

use javelin_core::{Span, Type};

use crate::ops::{BinaryOp, UnaryOp};
use crate::type_ref::TypeRef;

/// A literal value.
#[derive(Debug, Clone, PartialEq)]
pub enum Lit {
    Null,
    Bool(bool),
    Char(char),
    Int(i32),
    Long(i64),
    Float(OrderedFloat<f32>),
    Double(OrderedFloat<f64>),
    Str(String),
}

/// An expression node.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
    /// Static type, written by the checker.
    pub ty: Option<Type>,
}

/// The expression kinds.
#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    Literal(Lit),
    /// A simple identifier: a variable or a statically imported member.
    Name(String),
    /// Member access on an expression.
    Field {
        target: Box<Expr>,
        name: String,
    },
    /// Method invocation; `target` is absent for unqualified calls.
    Call {
        target: Option<Box<Expr>>,
        name: String,
        args: Vec<Expr>,
    },
    /// Constructor invocation. Boxing conversions synthesize these.
    New {
        class: TypeRef,
        args: Vec<Expr>,
    },
    Cast {
        ty: TypeRef,
        value: Box<Expr>,
    },
    Assign {
        target: Box<Expr>,
        value: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Unary {
        op: UnaryOp,
        value: Box<Expr>,
    },
}

impl Expr {
    /// An expression with an empty type slot.
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Self {
            kind,
            span,
            ty: None,
        }
    }

    /// A literal expression.
    pub fn literal(lit: Lit, span: Span) -> Self {
        Self::new(ExprKind::Literal(lit), span)
    }

    /// A name expression.
    pub fn name(name: impl Into<String>, span: Span) -> Self {
        Self::new(ExprKind::Name(name.into()), span)
    }

    /// A binary operator expression.
    pub fn binary(op: BinaryOp, left: Expr, right: Expr) -> Self {
        let span = left.span.merge(right.span);
        Self::new(
            ExprKind::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            },
            span,
        )
    }

    /// The annotated static type, if the checker has run.
    pub fn static_type(&self) -> Option<&Type> {
        self.ty.as_ref()
    }

    /// Whether this is an int literal (used by the narrowing-assignment
    /// round-trip rule).
    pub fn as_int_literal(&self) -> Option<i32> {
        match &self.kind {
            ExprKind::Literal(Lit::Int(v)) => Some(*v),
            _ => None,
        }
    }
}
