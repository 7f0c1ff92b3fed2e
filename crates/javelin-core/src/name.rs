//! Binary class names.
//!
//! A [`ClassName`] identifies one class or interface by its binary name:
//! `.`-separated package segments followed by a `$`-separated nesting path,
//! e.g. `game.core.Board$Cell`. Binary names are the primary key of the
//! class registry and the class loader.

use std::fmt;

/// Binary name of a class or interface.
///
/// # Examples
///
/// ```
/// use javelin_core::ClassName;
///
/// let cell = ClassName::from_binary("game.Board$Cell");
/// assert_eq!(cell.simple_name(), "Cell");
/// assert_eq!(cell.package_string(), "game");
/// assert_eq!(cell.outer(), Some(ClassName::from_binary("game.Board")));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassName {
    /// Package segments; empty for the default package.
    package: Vec<String>,
    /// Nesting path, outermost type first. Never empty.
    path: Vec<String>,
}

impl ClassName {
    /// A top-level class in the default package.
    pub fn simple(name: impl Into<String>) -> Self {
        Self {
            package: Vec::new(),
            path: vec![name.into()],
        }
    }

    /// A top-level class inside `package` (dot-separated, may be empty).
    pub fn in_package(package: &str, name: impl Into<String>) -> Self {
        Self {
            package: split_dotted(package),
            path: vec![name.into()],
        }
    }

    /// Parse a binary name string (`pkg.sub.Outer$Inner`).
    ///
    /// The last dot-separated segment is the type; everything before it is
    /// the package. `$` splits the nesting path.
    pub fn from_binary(binary: &str) -> Self {
        let (package, tail) = match binary.rfind('.') {
            Some(idx) => (split_dotted(&binary[..idx]), &binary[idx + 1..]),
            None => (Vec::new(), binary),
        };
        let path: Vec<String> = tail.split('$').map(str::to_string).collect();
        Self { package, path }
    }

    /// The innermost simple name.
    pub fn simple_name(&self) -> &str {
        // path is never empty by construction
        self.path.last().map(String::as_str).unwrap_or_default()
    }

    /// Package segments.
    pub fn package(&self) -> &[String] {
        &self.package
    }

    /// The package as a dot-joined string, empty for the default package.
    pub fn package_string(&self) -> String {
        self.package.join(".")
    }

    /// Whether this is a nested type.
    pub fn is_inner(&self) -> bool {
        self.path.len() > 1
    }

    /// The name of the directly enclosing type, if any.
    pub fn outer(&self) -> Option<Self> {
        if self.path.len() > 1 {
            Some(Self {
                package: self.package.clone(),
                path: self.path[..self.path.len() - 1].to_vec(),
            })
        } else {
            None
        }
    }

    /// The outermost enclosing type (self for top-level types).
    pub fn top_level(&self) -> Self {
        Self {
            package: self.package.clone(),
            path: vec![self.path[0].clone()],
        }
    }

    /// Derive the name of a type nested directly inside this one.
    pub fn inner(&self, child: impl Into<String>) -> Self {
        let mut path = self.path.clone();
        path.push(child.into());
        Self {
            package: self.package.clone(),
            path,
        }
    }

    /// The binary name string.
    pub fn binary(&self) -> String {
        self.to_string()
    }
}

fn split_dotted(package: &str) -> Vec<String> {
    package
        .split('.')
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

impl fmt::Display for ClassName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for seg in &self.package {
            write!(f, "{seg}.")?;
        }
        write!(f, "{}", self.path.join("$"))
    }
}
