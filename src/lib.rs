//! javelin — an embeddable interpreter core for a statically-typed,
//! class-based object language.
//!
//! A [`Session`] accepts source fragments one at a time: parse (external
//! collaborator), type-check against the session's class state, evaluate.
//! Classes declared during the session compile to loadable form on demand,
//! interleaved with classes already available through the host's
//! reflective lookup — a miniature incremental linker that cross-references
//! tree-backed and already-compiled classes and recovers cleanly from
//! partial failures.
//!
//! ```
//! use javelin::{LanguageLevel, Session};
//! use javelin_ast::TypeDecl;
//! use javelin_core::Span;
//!
//! let mut session = Session::new(LanguageLevel::Modern);
//! let decl = TypeDecl::class("Greeter", Span::point(1, 1));
//! let class = session.compile_tree(decl).unwrap();
//! assert_eq!(class.name.binary(), "Greeter");
//! ```

pub mod session;

pub use session::Session;

pub use javelin_compiler::{
    AuxiliaryLoader, ClassEmitter, ClassFinder, ClassLoader, CodeSource, CompileEnv,
    DescriptorEmitter, LexicalContext, PathSourceFinder, PendingTree, Resolution, ResolvedClass,
    RuntimeClass, SourceFinder, SourceUnit, TreeCompiler, TypeChecker, UnitParser,
};
pub use javelin_core::{
    CheckError, ClassName, CompileError, Feature, HostClasses, HostImage, JavelinError,
    LanguageLevel, ParseError, Span, Type, Value, ops,
};
pub use javelin_registry::{ClassInfo, ClassPool};
