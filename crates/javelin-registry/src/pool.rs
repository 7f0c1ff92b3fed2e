//! The per-session class pool.

use std::collections::hash_map::Entry;

use rustc_hash::FxHashMap;

use javelin_core::ClassName;

use crate::class_info::ClassInfo;

/// Per-session mapping from binary name to [`ClassInfo`].
///
/// Adding a description recursively registers its nested classes under
/// their own qualified names, but never overwrites a nested name that is
/// already present — first registration wins for inner classes, while the
/// explicitly added top-level name itself is last-write-wins.
///
/// Absence of a name means "not yet known", not an error; callers check
/// [`ClassPool::contains`] first.
#[derive(Debug, Default)]
pub struct ClassPool {
    entries: FxHashMap<ClassName, ClassInfo>,
    /// Registration order; drives [`ClassPool::first_compilable`].
    order: Vec<ClassName>,
}

impl ClassPool {
    /// An empty pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a description, recursively registering nested classes that
    /// are not already present. Returns the stored description.
    pub fn add(&mut self, info: ClassInfo) -> &ClassInfo {
        for nested in info.nested_infos() {
            self.add_nested(nested);
        }
        let name = info.name().clone();
        tracing::trace!(class = %name, compilable = info.is_compilable(), "register class");
        if !self.entries.contains_key(&name) {
            self.order.push(name.clone());
        }
        match self.entries.entry(name) {
            Entry::Occupied(mut slot) => {
                slot.insert(info);
                slot.into_mut()
            }
            Entry::Vacant(slot) => slot.insert(info),
        }
    }

    fn add_nested(&mut self, info: ClassInfo) {
        if self.entries.contains_key(info.name()) {
            return;
        }
        for nested in info.nested_infos() {
            self.add_nested(nested);
        }
        self.order.push(info.name().clone());
        self.entries.insert(info.name().clone(), info);
    }

    /// Whether a description is registered under `name`.
    pub fn contains(&self, name: &ClassName) -> bool {
        self.entries.contains_key(name)
    }

    /// Get a description by name.
    pub fn get(&self, name: &ClassName) -> Option<&ClassInfo> {
        self.entries.get(name)
    }

    /// Get a mutable description by name.
    pub fn get_mut(&mut self, name: &ClassName) -> Option<&mut ClassInfo> {
        self.entries.get_mut(name)
    }

    /// The first still-compilable entry in registration order, or `None`
    /// once every entry has been drained.
    pub fn first_compilable(&self) -> Option<&ClassName> {
        self.order
            .iter()
            .find(|name| self.entries.get(*name).is_some_and(ClassInfo::is_compilable))
    }

    /// Permanently clear the compilable flag of `name`, if registered.
    pub fn clear_compilable(&mut self, name: &ClassName) {
        if let Some(info) = self.entries.get_mut(name) {
            info.clear_compilable();
        }
    }

    /// Number of registered descriptions.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the pool is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registered descriptions in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &ClassInfo> {
        self.order.iter().filter_map(|name| self.entries.get(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    use javelin_ast::TypeDecl;
    use javelin_core::Span;

    fn tree_info(binary: &str) -> ClassInfo {
        let name = ClassName::from_binary(binary);
        let decl = TypeDecl::class(name.simple_name(), Span::point(1, 1));
        ClassInfo::from_decl(name, Rc::new(decl))
    }

    fn tree_info_with_inner(binary: &str, inner: &[&str]) -> ClassInfo {
        let name = ClassName::from_binary(binary);
        let mut decl = TypeDecl::class(name.simple_name(), Span::point(1, 1));
        for nested in inner {
            decl.inner.push(TypeDecl::class(*nested, Span::point(1, 1)));
        }
        ClassInfo::from_decl(name, Rc::new(decl))
    }

    #[test]
    fn add_registers_inner_classes() {
        let mut pool = ClassPool::new();
        pool.add(tree_info_with_inner("p.A", &["B"]));
        assert!(pool.contains(&ClassName::from_binary("p.A")));
        assert!(pool.contains(&ClassName::from_binary("p.A$B")));
    }

    #[test]
    fn inner_registration_is_idempotent() {
        let mut pool = ClassPool::new();
        pool.add(tree_info_with_inner("p.A", &["B"]));
        // mark the inner class, then re-add the outer: the inner entry
        // must not be reinserted
        pool.clear_compilable(&ClassName::from_binary("p.A$B"));
        pool.add(tree_info_with_inner("p.A", &["B"]));
        let inner = pool.get(&ClassName::from_binary("p.A$B")).unwrap();
        assert!(!inner.is_compilable(), "re-add reinserted an inner class");
        assert_eq!(pool.len(), 2);
    }

    #[test]
    fn top_level_readd_is_last_write_wins() {
        let mut pool = ClassPool::new();
        pool.add(tree_info("p.A"));
        pool.clear_compilable(&ClassName::from_binary("p.A"));
        pool.add(tree_info("p.A"));
        assert!(pool.get(&ClassName::from_binary("p.A")).unwrap().is_compilable());
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn first_compilable_follows_insertion_order() {
        let mut pool = ClassPool::new();
        pool.add(tree_info("p.A"));
        pool.add(tree_info("p.B"));
        assert_eq!(
            pool.first_compilable().map(ClassName::binary),
            Some("p.A".into())
        );
        pool.clear_compilable(&ClassName::from_binary("p.A"));
        assert_eq!(
            pool.first_compilable().map(ClassName::binary),
            Some("p.B".into())
        );
    }

    #[test]
    fn repeated_removal_drains_to_none() {
        let mut pool = ClassPool::new();
        pool.add(tree_info_with_inner("p.A", &["B", "C"]));
        pool.add(tree_info("p.D"));
        let mut drained = Vec::new();
        while let Some(name) = pool.first_compilable().cloned() {
            pool.clear_compilable(&name);
            drained.push(name.binary());
        }
        assert_eq!(drained.len(), 4);
        assert_eq!(pool.first_compilable(), None);
    }
}
