//! Member resolution: fields, methods, and constructors.
//!
//! Members resolve against both class representations: tree-backed
//! declarations (member type references resolved lazily, in the declaring
//! class's lexical position) and host-backed metadata. Field lookup walks
//! the superclass chain; method lookup walks the full
//! superclass/interface graph.

use std::collections::VecDeque;
use std::rc::Rc;

use rustc_hash::FxHashSet;

use javelin_ast::Expr;
use javelin_core::{CheckError, ClassName, Span, Type};
use javelin_registry::ClassSource;

use crate::check::TypeChecker;
use crate::env::CompileEnv;
use crate::finder::{ClassFinder, lookup_info, superclass_of};
use crate::resolve::resolve_type_ref;

/// A resolved method or constructor signature.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct MethodSig {
    pub params: Vec<Type>,
    pub ret: Type,
    pub varargs: bool,
}

impl TypeChecker {
    /// The type of field `name` on `class` or an ancestor, if any.
    pub(crate) fn field_type(
        &self,
        env: &mut CompileEnv<'_>,
        class: &ClassName,
        name: &str,
    ) -> Result<Option<Type>, CheckError> {
        let mut visited = FxHashSet::default();
        let mut current = Some(class.clone());
        while let Some(here) = current {
            if !visited.insert(here.clone()) {
                break;
            }
            let info = lookup_info(env, &here)?;
            match info.source() {
                ClassSource::Tree(decl) => {
                    let decl = Rc::clone(decl);
                    for field in &decl.fields {
                        if field.name == name {
                            let ty =
                                resolve_type_ref(env, self.level(), &field.ty, Some(&here))?;
                            return Ok(Some(ty));
                        }
                    }
                }
                ClassSource::Host(desc) => {
                    if let Some(field) = desc.fields.iter().find(|f| f.name == name) {
                        return Ok(Some(field.ty.clone()));
                    }
                }
            }
            current = superclass_of(env, &here)?;
        }
        Ok(None)
    }

    /// Resolve a qualified call against `class`, applying argument
    /// conversions for the matched signature.
    pub(crate) fn resolve_call(
        &self,
        env: &mut CompileEnv<'_>,
        class: &ClassName,
        name: &str,
        args: &mut [Expr],
        span: Span,
    ) -> Result<Type, CheckError> {
        let candidates = self.collect_methods(env, class, name)?;
        for sig in &candidates {
            if self.call_matches(env, sig, args)? {
                self.apply_arguments(env, sig, args)?;
                return Ok(sig.ret.clone());
            }
        }
        Err(CheckError::MethodNotFound {
            class: class.binary(),
            name: name.into(),
            span,
        })
    }

    /// Resolve an unqualified call through the static imports.
    pub(crate) fn resolve_unqualified_call(
        &self,
        env: &mut CompileEnv<'_>,
        name: &str,
        args: &mut [Expr],
        span: Span,
    ) -> Result<Type, CheckError> {
        if let Some(class) = env.ctx.static_single_class(name).cloned() {
            return self.resolve_call(env, &class, name, args, span);
        }
        for class in env.ctx.static_on_demand_classes().to_vec() {
            match self.resolve_call(env, &class, name, args, span) {
                Ok(ty) => return Ok(ty),
                Err(CheckError::MethodNotFound { .. }) => continue,
                Err(other) => return Err(other),
            }
        }
        Err(CheckError::MethodNotFound {
            class: "<static imports>".into(),
            name: name.into(),
            span,
        })
    }

    /// Resolve a constructor call against `class`, applying argument
    /// conversions. A class with no declared constructors has the implicit
    /// no-argument one.
    pub(crate) fn resolve_ctor(
        &self,
        env: &mut CompileEnv<'_>,
        class: &ClassName,
        args: &mut [Expr],
        span: Span,
    ) -> Result<(), CheckError> {
        let info = lookup_info(env, class)?;
        if info.is_interface() {
            return Err(CheckError::ConstructorNotFound {
                class: class.binary(),
                span,
            });
        }
        let result_ty = Type::Named(class.clone());
        let mut sigs = Vec::new();
        match info.source() {
            ClassSource::Tree(decl) => {
                let decl = Rc::clone(decl);
                for ctor in &decl.ctors {
                    let mut params = Vec::with_capacity(ctor.params.len());
                    for param in &ctor.params {
                        params.push(resolve_type_ref(env, self.level(), &param.ty, Some(class))?);
                    }
                    if ctor.varargs {
                        if let Some(last) = params.pop() {
                            params.push(last.array_of());
                        }
                    }
                    sigs.push(MethodSig {
                        params,
                        ret: result_ty.clone(),
                        varargs: ctor.varargs,
                    });
                }
            }
            ClassSource::Host(desc) => {
                for params in &desc.ctors {
                    sigs.push(MethodSig {
                        params: params.clone(),
                        ret: result_ty.clone(),
                        varargs: false,
                    });
                }
            }
        }
        if sigs.is_empty() {
            sigs.push(MethodSig {
                params: Vec::new(),
                ret: result_ty,
                varargs: false,
            });
        }
        for sig in &sigs {
            if self.call_matches(env, sig, args)? {
                self.apply_arguments(env, sig, args)?;
                return Ok(());
            }
        }
        Err(CheckError::ConstructorNotFound {
            class: class.binary(),
            span,
        })
    }

    /// Collect name-matching method signatures over the class's
    /// superclass/interface graph, nearest first.
    fn collect_methods(
        &self,
        env: &mut CompileEnv<'_>,
        class: &ClassName,
        name: &str,
    ) -> Result<Vec<MethodSig>, CheckError> {
        let mut out = Vec::new();
        let mut visited = FxHashSet::default();
        let mut frontier = VecDeque::from([class.clone()]);
        while let Some(here) = frontier.pop_front() {
            if !visited.insert(here.clone()) {
                continue;
            }
            let info = lookup_info(env, &here)?;
            let outer = here.outer();
            match info.source() {
                ClassSource::Tree(decl) => {
                    let decl = Rc::clone(decl);
                    for method in decl.methods.iter().filter(|m| m.name == name) {
                        let mut params = Vec::with_capacity(method.params.len());
                        for param in &method.params {
                            params.push(resolve_type_ref(
                                env,
                                self.level(),
                                &param.ty,
                                Some(&here),
                            )?);
                        }
                        // a variable-arity declaration writes the element
                        // type; the effective parameter is the array
                        if method.varargs {
                            if let Some(last) = params.pop() {
                                params.push(last.array_of());
                            }
                        }
                        let ret = resolve_type_ref(env, self.level(), &method.ret, Some(&here))?;
                        out.push(MethodSig {
                            params,
                            ret,
                            varargs: method.varargs,
                        });
                    }
                }
                ClassSource::Host(desc) => {
                    for method in desc.methods.iter().filter(|m| m.name == name) {
                        out.push(MethodSig {
                            params: method.params.clone(),
                            ret: method.ret.clone(),
                            varargs: method.varargs,
                        });
                    }
                }
            }
            if let Some(raw) = info.superclass_name().map(str::to_string) {
                let resolved = ClassFinder::new(env).resolve(&raw, outer.as_ref())?;
                frontier.push_back(resolved.into_name());
            }
            for raw in info.interface_names().to_vec() {
                let resolved = ClassFinder::new(env).resolve(&raw, outer.as_ref())?;
                frontier.push_back(resolved.into_name());
            }
        }
        Ok(out)
    }

    /// Whether the argument list fits the signature, fixed-arity or — at
    /// the modern level — through the variable-arity tail.
    fn call_matches(
        &self,
        env: &mut CompileEnv<'_>,
        sig: &MethodSig,
        args: &[Expr],
    ) -> Result<bool, CheckError> {
        let fixed_arity = !sig.varargs || !self.level().is_modern();
        if fixed_arity {
            if sig.params.len() != args.len() {
                return Ok(false);
            }
            for (param, arg) in sig.params.iter().zip(args) {
                if !self.arg_compatible(env, param, arg)? {
                    return Ok(false);
                }
            }
            return Ok(true);
        }

        let fixed = sig.params.len() - 1;
        if args.len() < fixed {
            return Ok(false);
        }
        for (param, arg) in sig.params[..fixed].iter().zip(args) {
            if !self.arg_compatible(env, param, arg)? {
                return Ok(false);
            }
        }
        let last_param = &sig.params[fixed];
        // an exact array argument passes straight through
        if args.len() == sig.params.len() && self.arg_compatible(env, last_param, &args[fixed])? {
            return Ok(true);
        }
        let Some(component) = last_param.component() else {
            return Ok(false);
        };
        for arg in &args[fixed..] {
            if !self.arg_compatible(env, component, arg)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn arg_compatible(
        &self,
        env: &mut CompileEnv<'_>,
        param: &Type,
        arg: &Expr,
    ) -> Result<bool, CheckError> {
        let arg_ty = arg.ty.clone().ok_or_else(|| CheckError::Internal {
            detail: "argument left unannotated".into(),
        })?;
        self.assignable_types(env, param, &arg_ty)
    }

    /// Insert argument conversions for the matched signature.
    fn apply_arguments(
        &self,
        env: &mut CompileEnv<'_>,
        sig: &MethodSig,
        args: &mut [Expr],
    ) -> Result<(), CheckError> {
        let fixed_arity = !sig.varargs || !self.level().is_modern();
        if fixed_arity {
            for (param, arg) in sig.params.iter().zip(args.iter_mut()) {
                self.check_assignable(env, param, arg)?;
            }
            return Ok(());
        }
        // a length-matched call whose last argument fits the array
        // parameter is positional; otherwise the tail spreads into the
        // component type
        if args.len() == sig.params.len() {
            let last = sig.params.len() - 1;
            if self.arg_compatible(env, &sig.params[last], &args[last])? {
                for (param, arg) in sig.params.iter().zip(args.iter_mut()) {
                    self.check_assignable(env, param, arg)?;
                }
                return Ok(());
            }
        }
        let fixed = sig.params.len() - 1;
        for (param, arg) in sig.params[..fixed].iter().zip(args.iter_mut()) {
            self.check_assignable(env, param, arg)?;
        }
        let component = sig.params[fixed].component().cloned().ok_or_else(|| {
            CheckError::Internal {
                detail: "variable-arity parameter is not an array".into(),
            }
        })?;
        for arg in args[fixed..].iter_mut() {
            self.check_assignable(env, &component, arg)?;
        }
        Ok(())
    }
}
