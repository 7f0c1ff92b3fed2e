//! Compilation units, imports, and type declarations.

use javelin_core::{ClassModifiers, Span};

use crate::expr::Expr;
use crate::stmt::Stmt;
use crate::type_ref::TypeRef;

/// One parsed source unit: package clause, imports, type declarations.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CompilationUnit {
    /// Dotted package name; `None` for the default package.
    pub package: Option<String>,
    pub imports: Vec<Import>,
    pub types: Vec<TypeDecl>,
}

/// An import clause.
#[derive(Debug, Clone, PartialEq)]
pub enum Import {
    /// `import pkg.Cls;`
    Single(String),
    /// `import pkg.*;`
    OnDemand(String),
    /// `import static pkg.Cls.member;`
    StaticSingle { class: String, member: String },
    /// `import static pkg.Cls.*;`
    StaticOnDemand(String),
}

/// A class or interface declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDecl {
    /// Simple name; the registry keys the declaration by its qualified
    /// binary name.
    pub name: String,
    pub modifiers: ClassModifiers,
    pub superclass: Option<TypeRef>,
    pub interfaces: Vec<TypeRef>,
    pub fields: Vec<FieldDecl>,
    pub methods: Vec<MethodDecl>,
    pub ctors: Vec<CtorDecl>,
    /// Nested type declarations.
    pub inner: Vec<TypeDecl>,
    pub span: Span,
}

impl TypeDecl {
    /// A class declaration with no members.
    pub fn class(name: impl Into<String>, span: Span) -> Self {
        Self {
            name: name.into(),
            modifiers: ClassModifiers::PUBLIC,
            superclass: None,
            interfaces: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
            ctors: Vec::new(),
            inner: Vec::new(),
            span,
        }
    }

    /// An interface declaration with no members.
    pub fn interface(name: impl Into<String>, span: Span) -> Self {
        let mut decl = Self::class(name, span);
        decl.modifiers |= ClassModifiers::INTERFACE;
        decl
    }

    /// This declaration extending `superclass`.
    pub fn extending(mut self, superclass: TypeRef) -> Self {
        self.superclass = Some(superclass);
        self
    }

    /// This declaration implementing `interface`.
    pub fn implementing(mut self, interface: TypeRef) -> Self {
        self.interfaces.push(interface);
        self
    }

    /// Whether this declares an interface.
    pub fn is_interface(&self) -> bool {
        self.modifiers.is_interface()
    }
}

/// A field declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDecl {
    pub modifiers: ClassModifiers,
    pub ty: TypeRef,
    pub name: String,
    pub init: Option<Expr>,
    pub span: Span,
}

/// A method parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub ty: TypeRef,
    pub name: String,
    pub span: Span,
}

/// A method declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodDecl {
    pub modifiers: ClassModifiers,
    pub ret: TypeRef,
    pub name: String,
    pub params: Vec<Param>,
    /// Whether the last parameter is variable-arity.
    pub varargs: bool,
    pub body: Vec<Stmt>,
    pub span: Span,
}

/// A constructor declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct CtorDecl {
    pub modifiers: ClassModifiers,
    pub params: Vec<Param>,
    pub varargs: bool,
    pub body: Vec<Stmt>,
    pub span: Span,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builders_compose() {
        let span = Span::point(1, 1);
        let decl = TypeDecl::class("Sub", span)
            .extending(TypeRef::named("Base", span))
            .implementing(TypeRef::named("Marker", span));
        assert_eq!(decl.superclass.as_ref().map(|t| t.name.as_str()), Some("Base"));
        assert_eq!(decl.interfaces.len(), 1);
        assert!(!decl.is_interface());
        assert!(TypeDecl::interface("I", span).is_interface());
    }
}
