//! Class descriptions.

use std::rc::Rc;

use javelin_ast::TypeDecl;
use javelin_core::ty::OBJECT_CLASS;
use javelin_core::{ClassModifiers, ClassName, HostClassDesc};

/// Where a class description comes from.
#[derive(Debug, Clone)]
pub enum ClassSource {
    /// A parsed declaration that has not been compiled yet. The `Rc` is
    /// shared with the loader's pending-tree store.
    Tree(Rc<TypeDecl>),
    /// Metadata for an already-compiled class from the reflective seam.
    Host(Rc<HostClassDesc>),
}

/// Description of one class or interface, compiled or not.
///
/// Supertype and interface references are kept as the names the source
/// wrote (tree-backed) or binary names (host-backed); they resolve lazily
/// through the class finder, so a description can be registered before its
/// ancestors are.
///
/// The compilable flag starts true for tree-backed descriptions and is
/// cleared permanently once the class is turned into a runtime class or
/// matched against one that already exists.
#[derive(Debug, Clone)]
pub struct ClassInfo {
    name: ClassName,
    source: ClassSource,
    superclass: Option<String>,
    interfaces: Vec<String>,
    modifiers: ClassModifiers,
    compilable: bool,
}

impl ClassInfo {
    /// Describe a parsed declaration registered under `name`. A class
    /// declared without a supertype descends from the root class;
    /// interfaces have no supertype.
    pub fn from_decl(name: ClassName, decl: Rc<TypeDecl>) -> Self {
        let superclass = match &decl.superclass {
            Some(t) => Some(t.name.clone()),
            None if decl.is_interface() => None,
            None => Some(OBJECT_CLASS.to_string()),
        };
        let interfaces = decl.interfaces.iter().map(|t| t.name.clone()).collect();
        let modifiers = decl.modifiers;
        Self {
            name,
            source: ClassSource::Tree(decl),
            superclass,
            interfaces,
            modifiers,
            compilable: true,
        }
    }

    /// Describe an already-compiled host class.
    pub fn from_host(desc: Rc<HostClassDesc>) -> Self {
        let superclass = desc.superclass.as_ref().map(|n| n.binary());
        let interfaces = desc.interfaces.iter().map(|n| n.binary()).collect();
        Self {
            name: desc.name.clone(),
            modifiers: desc.modifiers,
            superclass,
            interfaces,
            source: ClassSource::Host(desc),
            compilable: false,
        }
    }

    /// The binary name this description is registered under.
    pub fn name(&self) -> &ClassName {
        &self.name
    }

    /// The description's source.
    pub fn source(&self) -> &ClassSource {
        &self.source
    }

    /// The superclass name as declared, unresolved.
    pub fn superclass_name(&self) -> Option<&str> {
        self.superclass.as_deref()
    }

    /// Interface names as declared, unresolved.
    pub fn interface_names(&self) -> &[String] {
        &self.interfaces
    }

    pub fn modifiers(&self) -> ClassModifiers {
        self.modifiers
    }

    pub fn is_interface(&self) -> bool {
        self.modifiers.is_interface()
    }

    /// Whether this class still awaits compilation.
    pub fn is_compilable(&self) -> bool {
        self.compilable
    }

    /// Permanently clear the compilable flag.
    pub fn clear_compilable(&mut self) {
        self.compilable = false;
    }

    /// The backing declaration for a tree-backed description.
    pub fn decl(&self) -> Option<&Rc<TypeDecl>> {
        match &self.source {
            ClassSource::Tree(decl) => Some(decl),
            ClassSource::Host(_) => None,
        }
    }

    /// The backing metadata for a host-backed description.
    pub fn host_desc(&self) -> Option<&Rc<HostClassDesc>> {
        match &self.source {
            ClassSource::Host(desc) => Some(desc),
            ClassSource::Tree(_) => None,
        }
    }

    /// Whether this description is tree-backed (not yet compiled).
    pub fn is_tree_backed(&self) -> bool {
        matches!(self.source, ClassSource::Tree(_))
    }

    /// Descriptions for the directly nested classes of this one, keyed by
    /// their own qualified names.
    pub fn nested_infos(&self) -> Vec<ClassInfo> {
        match &self.source {
            ClassSource::Tree(decl) => decl
                .inner
                .iter()
                .map(|nested| {
                    ClassInfo::from_decl(self.name.inner(&nested.name), Rc::new(nested.clone()))
                })
                .collect(),
            ClassSource::Host(desc) => desc
                .inner
                .iter()
                .map(|nested| ClassInfo::from_host(Rc::clone(nested)))
                .collect(),
        }
    }
}
