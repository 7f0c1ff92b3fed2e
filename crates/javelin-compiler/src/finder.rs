//! The class finder.
//!
//! Resolves a (possibly inner, possibly unqualified) name to a registered
//! class description using the lexical context, the registry, and the host
//! image:
//!
//! 1. a registered candidate name wins outright;
//! 2. otherwise the host image is consulted for each candidate, qualified
//!    by the current package and imports (a hit is registered);
//! 3. otherwise, given an origin class, the inner name `Origin$name` is
//!    constructed along the origin's enclosing-class chain and then along
//!    its superclass chain — two independent traversals composed here;
//! 4. exhausting all paths fails with "class not found".
//!
//! A resolution landing on a tree-backed, not-yet-compiled class is a
//! distinct success case, so callers can answer "does this exist at all"
//! without forcing compilation.

use rustc_hash::FxHashSet;

use javelin_core::{CheckError, ClassName};
use javelin_registry::ClassInfo;

use crate::env::CompileEnv;
use crate::loader::TreeLookup;
use crate::orchestrator::register_pending;

/// A successful resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The name denotes an already-compiled class (host-backed, or already
    /// defined in the loader).
    Compiled(ClassName),
    /// The name denotes a tree-backed class that has not been compiled.
    /// This is a success, not an error.
    TreeBacked(ClassName),
}

impl Resolution {
    /// The resolved binary name.
    pub fn name(&self) -> &ClassName {
        match self {
            Resolution::Compiled(name) | Resolution::TreeBacked(name) => name,
        }
    }

    /// The resolved binary name, by value.
    pub fn into_name(self) -> ClassName {
        match self {
            Resolution::Compiled(name) | Resolution::TreeBacked(name) => name,
        }
    }

    /// Whether the resolution landed on a not-yet-compiled tree.
    pub fn is_tree_backed(&self) -> bool {
        matches!(self, Resolution::TreeBacked(_))
    }
}

/// Name resolver over one compilation environment.
pub struct ClassFinder<'e, 'a> {
    env: &'e mut CompileEnv<'a>,
}

impl<'e, 'a> ClassFinder<'e, 'a> {
    pub fn new(env: &'e mut CompileEnv<'a>) -> Self {
        Self { env }
    }

    /// Resolve `name`, optionally from the lexical position of
    /// `from_class`.
    pub fn resolve(
        &mut self,
        name: &str,
        from_class: Option<&ClassName>,
    ) -> Result<Resolution, CheckError> {
        for candidate in self.candidates(name) {
            if let Some(resolution) = self.lookup(&candidate) {
                tracing::trace!(name, resolved = %resolution.name(), "resolve class");
                return Ok(resolution);
            }
        }
        if let Some(from) = from_class {
            if let Some(resolution) = self.lookup_enclosing_chain(from, name) {
                return Ok(resolution);
            }
            if let Some(resolution) = self.lookup_superclass_chain(from, name)? {
                return Ok(resolution);
            }
        }
        Err(CheckError::ClassNotFound { name: name.into() })
    }

    /// Candidate binary names for `name` under the current package and
    /// imports. Single-type imports take precedence, then the current
    /// package, then the name as written, then on-demand imports.
    fn candidates(&self, name: &str) -> Vec<ClassName> {
        if name.contains('.') {
            return vec![ClassName::from_binary(name)];
        }
        let mut candidates = Vec::new();
        if let Some(imported) = self.env.ctx.single_import(name) {
            candidates.push(imported.clone());
        }
        if self.env.ctx.package().is_some() {
            candidates.push(self.env.ctx.qualify(name));
        }
        candidates.push(ClassName::from_binary(name));
        for package in self.env.ctx.on_demand_packages() {
            candidates.push(ClassName::in_package(package, name));
        }
        candidates
    }

    /// One candidate against the registry, then the host image, then the
    /// loader's pending declarations. A host hit is registered in the pool
    /// as a non-compilable description; a pending hit is registered
    /// tree-backed. The pending lookup is a typed value — a tree-backed
    /// answer never escapes as "class not found" into the surrounding
    /// search.
    fn lookup(&mut self, candidate: &ClassName) -> Option<Resolution> {
        if let Some(info) = self.env.pool.get(candidate) {
            let tree_backed = info.is_tree_backed() && !self.env.loader.is_defined(candidate);
            return Some(if tree_backed {
                Resolution::TreeBacked(candidate.clone())
            } else {
                Resolution::Compiled(candidate.clone())
            });
        }
        if let Some(desc) = self.env.host.find(candidate) {
            self.env.pool.add(ClassInfo::from_host(desc));
            return Some(Resolution::Compiled(candidate.clone()));
        }
        if let TreeLookup::Found(tree) = self.env.loader.lookup_pending(candidate) {
            register_pending(self.env, candidate, tree);
            return Some(Resolution::TreeBacked(candidate.clone()));
        }
        None
    }

    /// Try `Enclosing$name` for the origin and each of its enclosing
    /// classes, innermost first.
    fn lookup_enclosing_chain(&mut self, from: &ClassName, name: &str) -> Option<Resolution> {
        if name.contains('.') {
            return None;
        }
        let mut current = Some(from.clone());
        while let Some(enclosing) = current {
            if let Some(resolution) = self.lookup(&enclosing.inner(name)) {
                return Some(resolution);
            }
            current = enclosing.outer();
        }
        None
    }

    /// Try `Ancestor$name` at each ancestor along the origin's superclass
    /// chain.
    fn lookup_superclass_chain(
        &mut self,
        from: &ClassName,
        name: &str,
    ) -> Result<Option<Resolution>, CheckError> {
        if name.contains('.') {
            return Ok(None);
        }
        let mut visited = FxHashSet::default();
        let mut current = superclass_of(self.env, from)?;
        while let Some(ancestor) = current {
            if !visited.insert(ancestor.clone()) {
                break;
            }
            if let Some(resolution) = ClassFinder::new(self.env).lookup(&ancestor.inner(name)) {
                return Ok(Some(resolution));
            }
            current = superclass_of(self.env, &ancestor)?;
        }
        Ok(None)
    }
}

/// Fetch the registered description for `name`, pulling it from the host
/// image if necessary. Fails with "class not found" when neither knows it.
pub(crate) fn lookup_info(
    env: &mut CompileEnv<'_>,
    name: &ClassName,
) -> Result<ClassInfo, CheckError> {
    if let Some(info) = env.pool.get(name) {
        return Ok(info.clone());
    }
    if let Some(desc) = env.host.find(name) {
        return Ok(env.pool.add(ClassInfo::from_host(desc)).clone());
    }
    Err(CheckError::ClassNotFound {
        name: name.binary(),
    })
}

/// The resolved superclass of `name`, if it declares one.
///
/// The declared name resolves in the scope of the declaring class's
/// enclosing chain only; resolving it never walks the declaring class's
/// own superclass chain.
pub(crate) fn superclass_of(
    env: &mut CompileEnv<'_>,
    name: &ClassName,
) -> Result<Option<ClassName>, CheckError> {
    let info = lookup_info(env, name)?;
    let Some(raw) = info.superclass_name().map(str::to_string) else {
        return Ok(None);
    };
    let outer = name.outer();
    let resolution = ClassFinder::new(env).resolve(&raw, outer.as_ref())?;
    Ok(Some(resolution.into_name()))
}

/// Whether `sub` reaches `target` through its superclass/interface graph
/// (reflexive).
pub(crate) fn reaches(
    env: &mut CompileEnv<'_>,
    sub: &ClassName,
    target: &ClassName,
) -> Result<bool, CheckError> {
    let mut visited = FxHashSet::default();
    let mut frontier = vec![sub.clone()];
    while let Some(current) = frontier.pop() {
        if current == *target {
            return Ok(true);
        }
        if !visited.insert(current.clone()) {
            continue;
        }
        let info = lookup_info(env, &current)?;
        let outer = current.outer();
        if let Some(raw) = info.superclass_name().map(str::to_string) {
            let resolution = ClassFinder::new(env).resolve(&raw, outer.as_ref())?;
            frontier.push(resolution.into_name());
        }
        for raw in info.interface_names().to_vec() {
            let resolution = ClassFinder::new(env).resolve(&raw, outer.as_ref())?;
            frontier.push(resolution.into_name());
        }
    }
    Ok(false)
}
