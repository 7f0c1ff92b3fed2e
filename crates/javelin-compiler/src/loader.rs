//! The class loader.
//!
//! Maps binary names to runtime classes, holds pending declarations for
//! classes that are not defined yet, and delegates to a replaceable
//! auxiliary loader. A name is in at most one of the two stores at a time;
//! defining a class removes its pending entry.
//!
//! The loader's full resolution order — defined class, then auxiliary
//! loader, then on-demand compilation — is composed by the session facade,
//! which owns both the loader and the compiler.

use std::collections::hash_map::Entry;
use std::rc::Rc;

use rustc_hash::FxHashMap;

use javelin_ast::{Import, TypeDecl};
use javelin_core::ClassName;

/// Code-provenance descriptor for classes defined by one loader.
///
/// Every class a loader defines shares this single nominal origin; there
/// are no per-class certificates. The default is `javelin:session`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeSource(String);

impl CodeSource {
    pub fn new(origin: impl Into<String>) -> Self {
        Self(origin.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for CodeSource {
    fn default() -> Self {
        Self("javelin:session".into())
    }
}

/// A class defined at runtime: its name, its emitted bytes, and the
/// loader's provenance descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeClass {
    pub name: ClassName,
    pub bytes: Vec<u8>,
    pub source: CodeSource,
}

/// A declaration registered before its class is defined, together with the
/// package/import bindings of the unit that declared it.
#[derive(Debug, Clone)]
pub struct PendingTree {
    pub decl: Rc<TypeDecl>,
    pub package: Option<String>,
    pub imports: Vec<Import>,
}

/// Result of a pending-tree lookup.
///
/// `Found` is an ordinary success value: the orchestrator's existence
/// check consumes it to answer "does this name exist as a tree" without
/// treating the answer as an error, and without letting a raw "not found"
/// escape into the surrounding reflective search.
#[derive(Debug, Clone)]
pub enum TreeLookup {
    Found(PendingTree),
    NotFound,
}

impl TreeLookup {
    /// Whether a pending tree was found.
    pub fn is_found(&self) -> bool {
        matches!(self, TreeLookup::Found(_))
    }
}

/// A replaceable secondary loader, consulted before falling back to
/// on-demand compilation.
pub trait AuxiliaryLoader {
    /// Produce the runtime class for `name`, if this loader knows it.
    fn load(&mut self, name: &ClassName) -> Option<RuntimeClass>;
}

/// Per-session store of defined classes and pending declarations.
#[derive(Default)]
pub struct ClassLoader {
    code_source: CodeSource,
    defined: FxHashMap<ClassName, RuntimeClass>,
    pending: FxHashMap<ClassName, PendingTree>,
    auxiliary: Option<Box<dyn AuxiliaryLoader>>,
}

impl ClassLoader {
    /// A loader defining classes under the given provenance descriptor.
    pub fn new(code_source: CodeSource) -> Self {
        Self {
            code_source,
            ..Self::default()
        }
    }

    /// The loader's provenance descriptor.
    pub fn code_source(&self) -> &CodeSource {
        &self.code_source
    }

    /// Install a runtime class from emitted bytes, removing any pending
    /// declaration of the same name.
    pub fn define_from_bytes(&mut self, name: ClassName, bytes: Vec<u8>) -> &RuntimeClass {
        self.pending.remove(&name);
        tracing::debug!(class = %name, size = bytes.len(), "define class");
        let class = RuntimeClass {
            name: name.clone(),
            bytes,
            source: self.code_source.clone(),
        };
        match self.defined.entry(name) {
            Entry::Occupied(mut slot) => {
                slot.insert(class);
                slot.into_mut()
            }
            Entry::Vacant(slot) => slot.insert(class),
        }
    }

    /// Whether a class of this exact name is defined.
    pub fn is_defined(&self, name: &ClassName) -> bool {
        self.defined.contains_key(name)
    }

    /// The defined class, if any.
    pub fn get(&self, name: &ClassName) -> Option<&RuntimeClass> {
        self.defined.get(name)
    }

    /// Register an undefined declaration. Refused (returning `false`) when
    /// a class of this name is already defined, keeping a name in at most
    /// one of the two stores.
    pub fn add_pending_tree(&mut self, name: ClassName, tree: PendingTree) -> bool {
        if self.defined.contains_key(&name) {
            return false;
        }
        self.pending.insert(name, tree);
        true
    }

    /// Look up a pending declaration. The result is a value, never an
    /// error.
    pub fn lookup_pending(&self, name: &ClassName) -> TreeLookup {
        match self.pending.get(name) {
            Some(tree) => TreeLookup::Found(tree.clone()),
            None => TreeLookup::NotFound,
        }
    }

    /// Whether a pending declaration exists for `name`.
    pub fn has_pending(&self, name: &ClassName) -> bool {
        self.pending.contains_key(name)
    }

    /// Replace the auxiliary loader. `None` removes it.
    pub fn set_auxiliary(&mut self, auxiliary: Option<Box<dyn AuxiliaryLoader>>) {
        self.auxiliary = auxiliary;
    }

    /// Consult the auxiliary loader and install its result. Returns
    /// whether the class is now defined.
    pub fn load_from_auxiliary(&mut self, name: &ClassName) -> bool {
        let Some(auxiliary) = self.auxiliary.as_mut() else {
            return false;
        };
        match auxiliary.load(name) {
            Some(class) => {
                self.pending.remove(name);
                self.defined.insert(name.clone(), class);
                true
            }
            None => false,
        }
    }

    /// Number of defined classes.
    pub fn defined_count(&self) -> usize {
        self.defined.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use javelin_core::Span;

    fn pending(name: &str) -> PendingTree {
        PendingTree {
            decl: Rc::new(TypeDecl::class(name, Span::point(1, 1))),
            package: None,
            imports: Vec::new(),
        }
    }

    #[test]
    fn defining_removes_the_pending_tree() {
        let mut loader = ClassLoader::new(CodeSource::default());
        let name = ClassName::simple("Foo");
        assert!(loader.add_pending_tree(name.clone(), pending("Foo")));
        assert!(loader.lookup_pending(&name).is_found());
        loader.define_from_bytes(name.clone(), vec![1, 2, 3]);
        assert!(!loader.lookup_pending(&name).is_found());
        assert!(loader.is_defined(&name));
    }

    #[test]
    fn pending_refused_once_defined() {
        let mut loader = ClassLoader::new(CodeSource::default());
        let name = ClassName::simple("Foo");
        loader.define_from_bytes(name.clone(), Vec::new());
        assert!(!loader.add_pending_tree(name.clone(), pending("Foo")));
        assert!(!loader.has_pending(&name));
    }

    #[test]
    fn defined_classes_carry_the_loader_provenance() {
        let mut loader = ClassLoader::new(CodeSource::new("test:origin"));
        let name = ClassName::simple("Foo");
        let class = loader.define_from_bytes(name, vec![0]);
        assert_eq!(class.source.as_str(), "test:origin");
    }

    #[test]
    fn auxiliary_is_consulted_and_replaceable() {
        struct Canned(ClassName);
        impl AuxiliaryLoader for Canned {
            fn load(&mut self, name: &ClassName) -> Option<RuntimeClass> {
                (name == &self.0).then(|| RuntimeClass {
                    name: name.clone(),
                    bytes: vec![7],
                    source: CodeSource::new("aux"),
                })
            }
        }

        let mut loader = ClassLoader::new(CodeSource::default());
        let name = ClassName::simple("Known");
        assert!(!loader.load_from_auxiliary(&name));
        loader.set_auxiliary(Some(Box::new(Canned(name.clone()))));
        assert!(loader.load_from_auxiliary(&name));
        assert!(loader.is_defined(&name));
        loader.set_auxiliary(None);
        assert!(!loader.load_from_auxiliary(&ClassName::simple("Other")));
    }
}
