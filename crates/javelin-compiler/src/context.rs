//! The lexical context.
//!
//! Tracks the scope chain of typed variable bindings, the current package,
//! and the four import sets. The finder and the checker consume the
//! context; traversal mutates it by entering and leaving scopes, and
//! bindings declared in a scope are discarded on exit with any shadowed
//! binding restored.

use rustc_hash::FxHashMap;

use javelin_ast::{CompilationUnit, Import};
use javelin_core::{ClassName, Span, Type};

/// A typed variable binding.
#[derive(Debug, Clone, PartialEq)]
pub struct VarBinding {
    pub name: String,
    pub ty: Type,
    /// Scope depth where declared.
    pub depth: u32,
    pub span: Span,
}

/// Scope chain, current package, and imports for one session.
#[derive(Debug, Default)]
pub struct LexicalContext {
    /// Bindings by name across the current scope chain.
    variables: FxHashMap<String, VarBinding>,
    scope_depth: u32,
    /// Stack of shadowed bindings with the depth at which the shadowing
    /// occurred, restored on scope exit.
    shadowed: Vec<(u32, String, VarBinding)>,

    /// Current package; `None` for the default package.
    package: Option<String>,
    /// `import pkg.Cls;` — simple name to binary name.
    single_imports: FxHashMap<String, ClassName>,
    /// `import pkg.*;` — package names.
    on_demand: Vec<String>,
    /// `import static pkg.Cls.member;` — member name to class.
    static_single: FxHashMap<String, ClassName>,
    /// `import static pkg.Cls.*;` — classes whose static members are all
    /// visible.
    static_on_demand: Vec<ClassName>,
}

impl LexicalContext {
    pub fn new() -> Self {
        Self::default()
    }

    // ==========================================================================
    // Scope management
    // ==========================================================================

    /// Enter a new scope (block, branch body, loop body).
    pub fn push_scope(&mut self) {
        self.scope_depth += 1;
    }

    /// Exit the current scope, discarding its bindings and restoring any
    /// bindings it shadowed.
    pub fn pop_scope(&mut self) {
        self.variables.retain(|_, var| var.depth < self.scope_depth);
        while let Some((shadowing_depth, _, _)) = self.shadowed.last() {
            if *shadowing_depth == self.scope_depth {
                if let Some((_, name, var)) = self.shadowed.pop() {
                    self.variables.insert(name, var);
                }
            } else {
                break;
            }
        }
        self.scope_depth = self.scope_depth.saturating_sub(1);
    }

    /// Current scope depth (0 = top level).
    pub fn depth(&self) -> u32 {
        self.scope_depth
    }

    /// Pop scopes until the depth is back to `depth`. Used to recover the
    /// context after a failed statement.
    pub fn unwind_to(&mut self, depth: u32) {
        while self.scope_depth > depth {
            self.pop_scope();
        }
    }

    /// Declare a variable in the current scope, shadowing any outer
    /// binding of the same name.
    pub fn declare(&mut self, name: impl Into<String>, ty: Type, span: Span) {
        let name = name.into();
        let binding = VarBinding {
            name: name.clone(),
            ty,
            depth: self.scope_depth,
            span,
        };
        if let Some(old) = self.variables.insert(name.clone(), binding) {
            if old.depth < self.scope_depth {
                self.shadowed.push((self.scope_depth, name, old));
            }
        }
    }

    /// Look up a variable binding.
    pub fn lookup(&self, name: &str) -> Option<&VarBinding> {
        self.variables.get(name)
    }

    // ==========================================================================
    // Package and imports
    // ==========================================================================

    /// Set the current package.
    pub fn set_package(&mut self, package: Option<String>) {
        self.package = package;
    }

    /// The current package, if any.
    pub fn package(&self) -> Option<&str> {
        self.package.as_deref()
    }

    /// Qualify a simple type name with the current package.
    pub fn qualify(&self, simple: &str) -> ClassName {
        match &self.package {
            Some(pkg) => ClassName::in_package(pkg, simple),
            None => ClassName::simple(simple),
        }
    }

    /// Record one import clause.
    pub fn apply_import(&mut self, import: &Import) {
        match import {
            Import::Single(binary) => {
                let name = ClassName::from_binary(binary);
                self.single_imports.insert(name.simple_name().to_string(), name);
            }
            Import::OnDemand(package) => {
                if !self.on_demand.iter().any(|p| p == package) {
                    self.on_demand.push(package.clone());
                }
            }
            Import::StaticSingle { class, member } => {
                self.static_single
                    .insert(member.clone(), ClassName::from_binary(class));
            }
            Import::StaticOnDemand(class) => {
                let name = ClassName::from_binary(class);
                if !self.static_on_demand.contains(&name) {
                    self.static_on_demand.push(name);
                }
            }
        }
    }

    /// Record a unit's package and import bindings.
    pub fn record_unit(&mut self, unit: &CompilationUnit) {
        self.set_package(unit.package.clone());
        for import in &unit.imports {
            self.apply_import(import);
        }
    }

    /// The single-type import for `simple`, if any.
    pub fn single_import(&self, simple: &str) -> Option<&ClassName> {
        self.single_imports.get(simple)
    }

    /// On-demand import packages.
    pub fn on_demand_packages(&self) -> &[String] {
        &self.on_demand
    }

    /// The class a single static import binds `member` to, if any.
    pub fn static_single_class(&self, member: &str) -> Option<&ClassName> {
        self.static_single.get(member)
    }

    /// Classes whose static members are imported wholesale.
    pub fn static_on_demand_classes(&self) -> &[ClassName] {
        &self.static_on_demand
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use javelin_core::PrimitiveKind;

    fn int_ty() -> Type {
        Type::Primitive(PrimitiveKind::Int)
    }

    #[test]
    fn bindings_are_scoped() {
        let mut ctx = LexicalContext::new();
        ctx.declare("x", int_ty(), Span::point(1, 1));
        ctx.push_scope();
        ctx.declare("y", Type::string(), Span::point(2, 1));
        assert!(ctx.lookup("x").is_some());
        assert!(ctx.lookup("y").is_some());
        ctx.pop_scope();
        assert!(ctx.lookup("x").is_some());
        assert!(ctx.lookup("y").is_none());
    }

    #[test]
    fn shadowing_restores_on_exit() {
        let mut ctx = LexicalContext::new();
        ctx.declare("x", int_ty(), Span::point(1, 1));
        ctx.push_scope();
        ctx.declare("x", Type::string(), Span::point(2, 1));
        assert_eq!(ctx.lookup("x").map(|b| b.ty.clone()), Some(Type::string()));
        ctx.pop_scope();
        assert_eq!(ctx.lookup("x").map(|b| b.ty.clone()), Some(int_ty()));
    }

    #[test]
    fn unwind_discards_nested_scopes() {
        let mut ctx = LexicalContext::new();
        let base = ctx.depth();
        ctx.push_scope();
        ctx.push_scope();
        ctx.declare("tmp", int_ty(), Span::point(1, 1));
        ctx.unwind_to(base);
        assert_eq!(ctx.depth(), base);
        assert!(ctx.lookup("tmp").is_none());
    }

    #[test]
    fn qualification_follows_package() {
        let mut ctx = LexicalContext::new();
        assert_eq!(ctx.qualify("Foo").binary(), "Foo");
        ctx.set_package(Some("game.core".into()));
        assert_eq!(ctx.qualify("Foo").binary(), "game.core.Foo");
    }

    #[test]
    fn import_kinds_are_distinguished() {
        let mut ctx = LexicalContext::new();
        ctx.apply_import(&Import::Single("util.List".into()));
        ctx.apply_import(&Import::StaticSingle {
            class: "lang.Integer".into(),
            member: "MAX_VALUE".into(),
        });
        ctx.apply_import(&Import::StaticOnDemand("lang.Integer".into()));
        assert_eq!(
            ctx.single_import("List").map(ClassName::binary),
            Some("util.List".into())
        );
        assert_eq!(
            ctx.static_single_class("MAX_VALUE").map(ClassName::binary),
            Some("lang.Integer".into())
        );
        assert_eq!(ctx.static_on_demand_classes().len(), 1);
        assert!(ctx.single_import("Integer").is_none());
    }
}
