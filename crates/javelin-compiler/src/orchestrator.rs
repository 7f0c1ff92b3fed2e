//! The compiler orchestrator.
//!
//! Drives one compilation batch: discover the requested declaration
//! (pending tree, collaborator-mapped unit, or a parsed source file),
//! register descriptions in the pool, then drain every still-compilable
//! entry in dependency order — superclass and interfaces before the class
//! — emitting each through the [`ClassEmitter`] seam and defining the
//! result in the loader.
//!
//! Per requested name the lifecycle is UNKNOWN → DISCOVERED (registered,
//! compilable) → COMPILING → COMPILED, or ALREADY-EXISTS when a class of
//! that exact name is defined before emission: its flag is cleared and no
//! new bytecode is produced.
//!
//! There is no rollback: a failing batch leaves every class it already
//! defined installed in the loader.

use std::rc::Rc;

use rustc_hash::FxHashSet;

use javelin_ast::{CompilationUnit, TypeDecl};
use javelin_core::{ClassName, CompileError};
use javelin_registry::ClassInfo;

use crate::env::CompileEnv;
use crate::emit::ResolvedClass;
use crate::finder::ClassFinder;
use crate::loader::{PendingTree, TreeLookup};

/// Register a pending declaration, restoring the package and import
/// bindings of the unit that declared it. Shared with the finder, whose
/// candidate lookup reaches pending declarations the same way the
/// loader's compile fallback does.
pub(crate) fn register_pending(env: &mut CompileEnv<'_>, name: &ClassName, tree: PendingTree) {
    env.ctx.set_package(tree.package.clone());
    for import in &tree.imports {
        env.ctx.apply_import(import);
    }
    env.pool.add(ClassInfo::from_decl(name.clone(), tree.decl));
}

/// Discovery and dependency-order compilation over one environment.
pub struct TreeCompiler;

impl TreeCompiler {
    /// Compile `name` and every class it depends on. Fails with "class
    /// not found" when the requested name was never produced as a defined
    /// class, even though other classes compiled in the same batch remain
    /// installed.
    pub fn compile(env: &mut CompileEnv<'_>, name: &ClassName) -> Result<(), CompileError> {
        tracing::debug!(class = %name, "compile requested");
        Self::discover(env, name)?;
        Self::drain(env)?;
        if env.loader.is_defined(name) {
            Ok(())
        } else {
            Err(CompileError::ClassNotFound {
                name: name.binary(),
            })
        }
    }

    /// Register a freshly parsed declaration under the current package and
    /// drain. Failure — including a collision with an already-defined
    /// class — is reported against the declaration's source position.
    pub fn compile_tree(
        env: &mut CompileEnv<'_>,
        decl: TypeDecl,
    ) -> Result<ClassName, CompileError> {
        let span = decl.span;
        let name = env.ctx.qualify(&decl.name);
        if env.loader.is_defined(&name) {
            return Err(CompileError::UndefinedOrAlreadyDefined {
                name: name.binary(),
                span,
            });
        }
        env.pool
            .add(ClassInfo::from_decl(name.clone(), Rc::new(decl)));
        let drained = Self::drain(env);
        if drained.is_ok() && env.loader.is_defined(&name) {
            Ok(name)
        } else {
            Err(CompileError::UndefinedOrAlreadyDefined {
                name: name.binary(),
                span,
            })
        }
    }

    // ==========================================================================
    // Discovery
    // ==========================================================================

    fn discover(env: &mut CompileEnv<'_>, name: &ClassName) -> Result<(), CompileError> {
        if env.pool.contains(name) {
            return Ok(());
        }
        // a pending tree under the name itself?
        if let TreeLookup::Found(tree) = env.loader.lookup_pending(name) {
            register_pending(env, name, tree);
            return Ok(());
        }
        // or under the compilation unit a collaborator maps the name to?
        if let Some(unit_name) = env.sources.unit_of(name) {
            if let TreeLookup::Found(tree) = env.loader.lookup_pending(&unit_name) {
                register_pending(env, &unit_name, tree);
                return Ok(());
            }
        }
        // otherwise locate and parse a source unit
        let Some(source) = env.sources.find_source(name) else {
            return Ok(());
        };
        let Some(parser) = env.parser.as_deref_mut() else {
            return Ok(());
        };
        let unit = parser.parse_unit(&source.text, &source.file)?;
        tracing::debug!(unit = %source.unit_name, types = unit.types.len(), "parsed source unit");
        Self::register_unit(env, unit);
        Ok(())
    }

    /// Register every declaration of a parsed unit, keyed by its
    /// current-package-qualified name. Nested declarations register
    /// through the pool's recursive insertion.
    fn register_unit(env: &mut CompileEnv<'_>, unit: CompilationUnit) {
        env.ctx.record_unit(&unit);
        for decl in unit.types {
            let qualified = env.ctx.qualify(&decl.name);
            env.pool
                .add(ClassInfo::from_decl(qualified, Rc::new(decl)));
        }
    }

    // ==========================================================================
    // Drain
    // ==========================================================================

    /// Compile every still-compilable entry, in registration order.
    fn drain(env: &mut CompileEnv<'_>) -> Result<(), CompileError> {
        let mut in_progress = FxHashSet::default();
        while let Some(next) = env.pool.first_compilable().cloned() {
            if env.loader.is_defined(&next) {
                // matched to a pre-existing class: never redefined
                tracing::trace!(class = %next, "already exists, skipping");
                env.pool.clear_compilable(&next);
                continue;
            }
            if let Err(err) = Self::compile_class(env, &next, &mut in_progress) {
                // the entry stays registered but stops being retried by
                // later batches; re-declaring it starts fresh
                env.pool.clear_compilable(&next);
                return Err(err);
            }
        }
        Ok(())
    }

    /// Compile one class, its still-compilable superclass and interfaces
    /// first. Re-entry through a dependency cycle is a no-op; the class is
    /// completed by the frame already on the stack.
    fn compile_class(
        env: &mut CompileEnv<'_>,
        name: &ClassName,
        in_progress: &mut FxHashSet<ClassName>,
    ) -> Result<(), CompileError> {
        let (compilable, superclass_raw, interface_raws, decl) = {
            let Some(info) = env.pool.get(name) else {
                return Ok(());
            };
            (
                info.is_compilable(),
                info.superclass_name().map(str::to_string),
                info.interface_names().to_vec(),
                info.decl().cloned(),
            )
        };
        if !compilable {
            return Ok(());
        }
        if env.loader.is_defined(name) {
            env.pool.clear_compilable(name);
            return Ok(());
        }
        if !in_progress.insert(name.clone()) {
            return Ok(());
        }
        let from = name.outer();

        let mut superclass = None;
        if let Some(raw) = superclass_raw {
            let resolved = ClassFinder::new(env).resolve(&raw, from.as_ref())?;
            let super_name = resolved.into_name();
            Self::compile_class(env, &super_name, in_progress)?;
            superclass = Some(super_name);
        }
        let mut interfaces = Vec::with_capacity(interface_raws.len());
        for raw in interface_raws {
            let resolved = ClassFinder::new(env).resolve(&raw, from.as_ref())?;
            let interface = resolved.into_name();
            Self::compile_class(env, &interface, in_progress)?;
            interfaces.push(interface);
        }

        // host-backed descriptions are never compilable, so a missing
        // declaration here means the flag was stale
        let Some(decl) = decl else {
            env.pool.clear_compilable(name);
            return Ok(());
        };
        let resolved = ResolvedClass {
            name,
            superclass: superclass.as_ref(),
            interfaces: &interfaces,
            decl: &decl,
        };
        let bytes = env.emitter.emit(&resolved)?;
        env.loader.define_from_bytes(name.clone(), bytes);
        env.pool.clear_compilable(name);
        tracing::debug!(class = %name, "compiled");
        Ok(())
    }
}
