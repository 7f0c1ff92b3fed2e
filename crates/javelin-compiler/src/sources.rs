//! The source-location seam.
//!
//! A [`SourceFinder`] maps a class name to the compilation unit that
//! declares it and, when available, to the unit's source text.
//! [`PathSourceFinder`] is the file-system implementation, searching
//! configurable roots with configurable file suffixes.

use std::path::PathBuf;

use rustc_hash::FxHashMap;

use javelin_core::ClassName;

/// One located source unit.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceUnit {
    /// The unit's own name (usually the primary class it declares).
    pub unit_name: ClassName,
    /// The unit's source text.
    pub text: String,
    /// Display name of the originating file, for parse errors.
    pub file: String,
}

/// Locates compilation units for class names.
pub trait SourceFinder {
    /// The name of the compilation unit declaring `class`, when it differs
    /// from the class's own name.
    fn unit_of(&mut self, class: &ClassName) -> Option<ClassName>;

    /// Locate and read the source unit declaring `class`.
    fn find_source(&mut self, class: &ClassName) -> Option<SourceUnit>;
}

/// File-system source finder over a configurable search path.
///
/// A class `p.q.Foo` is searched as `<root>/p/q/Foo.<suffix>` under each
/// root for each suffix, in order. Inner names search their top-level
/// unit's file.
#[derive(Debug, Default)]
pub struct PathSourceFinder {
    roots: Vec<PathBuf>,
    suffixes: Vec<String>,
    /// Explicit class-to-unit associations, consulted before the path
    /// convention.
    unit_map: FxHashMap<ClassName, ClassName>,
}

impl PathSourceFinder {
    /// A finder with no roots; it never locates anything.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A finder over the given roots and file suffixes.
    pub fn new(roots: Vec<PathBuf>, suffixes: Vec<String>) -> Self {
        Self {
            roots,
            suffixes,
            unit_map: FxHashMap::default(),
        }
    }

    /// Associate a class with the compilation unit that declares it.
    pub fn map_unit(&mut self, class: ClassName, unit: ClassName) {
        self.unit_map.insert(class, unit);
    }

    fn candidate_path(&self, root: &PathBuf, class: &ClassName, suffix: &str) -> PathBuf {
        let mut path = root.clone();
        for seg in class.package() {
            path.push(seg);
        }
        path.push(format!("{}.{}", class.top_level().simple_name(), suffix));
        path
    }
}

impl SourceFinder for PathSourceFinder {
    fn unit_of(&mut self, class: &ClassName) -> Option<ClassName> {
        self.unit_map.get(class).cloned()
    }

    fn find_source(&mut self, class: &ClassName) -> Option<SourceUnit> {
        let unit_name = self
            .unit_map
            .get(class)
            .cloned()
            .unwrap_or_else(|| class.top_level());
        for root in &self.roots {
            for suffix in &self.suffixes {
                let path = self.candidate_path(root, &unit_name, suffix);
                if let Ok(text) = std::fs::read_to_string(&path) {
                    return Some(SourceUnit {
                        unit_name,
                        text,
                        file: path.display().to_string(),
                    });
                }
            }
        }
        None
    }
}
