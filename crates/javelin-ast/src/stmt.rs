//! Statement nodes.

use javelin_core::Span;

use crate::decl::Import;
use crate::expr::Expr;
use crate::type_ref::TypeRef;

/// A statement node.
#[derive(Debug, Clone, PartialEq)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

/// The statement kinds.
#[derive(Debug, Clone, PartialEq)]
pub enum StmtKind {
    Expr(Expr),
    /// Local variable declaration with optional initializer.
    VarDecl {
        ty: TypeRef,
        name: String,
        init: Option<Expr>,
    },
    If {
        cond: Expr,
        then_branch: Box<Stmt>,
        else_branch: Option<Box<Stmt>>,
    },
    While {
        cond: Expr,
        body: Box<Stmt>,
    },
    Block(Vec<Stmt>),
    Return(Option<Expr>),
    /// Per-element iteration: `for (T name : iterable) body`.
    ForEach {
        element_ty: TypeRef,
        name: String,
        iterable: Expr,
        body: Box<Stmt>,
    },
    /// An import entered interactively.
    Import(Import),
}

impl Stmt {
    pub fn new(kind: StmtKind, span: Span) -> Self {
        Self { kind, span }
    }
}
