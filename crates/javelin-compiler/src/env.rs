//! The compilation environment.
//!
//! [`CompileEnv`] bundles mutable borrows of the session's state and its
//! collaborator seams so the finder, checker, and orchestrator can call
//! each other recursively without circular ownership. A session constructs
//! one per entry point and tears it down when the fragment completes.

use javelin_ast::CompilationUnit;
use javelin_core::{HostClasses, ParseError};
use javelin_registry::ClassPool;

use crate::context::LexicalContext;
use crate::emit::ClassEmitter;
use crate::loader::ClassLoader;
use crate::sources::SourceFinder;

/// The external parser collaborator: source text to compilation unit.
pub trait UnitParser {
    /// Parse one compilation unit. `file` names the unit for positioned
    /// parse errors.
    fn parse_unit(&mut self, text: &str, file: &str) -> Result<CompilationUnit, ParseError>;
}

/// Borrowed session state threaded through resolution, checking, and
/// compilation.
pub struct CompileEnv<'a> {
    pub pool: &'a mut ClassPool,
    pub loader: &'a mut ClassLoader,
    pub ctx: &'a mut LexicalContext,
    pub host: &'a (dyn HostClasses + 'static),
    /// Absent when the session has no parser collaborator; source
    /// discovery then never produces new classes.
    pub parser: Option<&'a mut (dyn UnitParser + 'static)>,
    pub sources: &'a mut (dyn SourceFinder + 'static),
    pub emitter: &'a mut (dyn ClassEmitter + 'static),
}
