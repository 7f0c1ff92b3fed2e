//! The interpreter session.
//!
//! A [`Session`] owns one class pool, one class loader, and one lexical
//! context, wires in the collaborator seams (host metadata, parser, source
//! finder, emitter), and fixes the language level for its lifetime.
//! Sessions are single-threaded; concurrent sessions each own independent
//! state.

use std::rc::Rc;

use javelin_ast::{Expr, Stmt, TypeDecl};
use javelin_compiler::{
    AuxiliaryLoader, ClassEmitter, ClassFinder, ClassLoader, CodeSource, CompileEnv,
    DescriptorEmitter, LexicalContext, PathSourceFinder, PendingTree, Resolution, RuntimeClass,
    SourceFinder, TreeCompiler, TypeChecker, UnitParser,
};
use javelin_core::{
    CheckError, ClassName, CompileError, HostClasses, HostImage, LanguageLevel, Type,
};
use javelin_registry::ClassPool;

/// One interactive interpreter session.
pub struct Session {
    pool: ClassPool,
    loader: ClassLoader,
    ctx: LexicalContext,
    host: Box<dyn HostClasses>,
    parser: Option<Box<dyn UnitParser>>,
    sources: Box<dyn SourceFinder>,
    emitter: Box<dyn ClassEmitter>,
    checker: TypeChecker,
}

impl Session {
    /// A session at the given language level, with the bootstrap host
    /// image, no parser, an empty source path, and the descriptor emitter.
    pub fn new(level: LanguageLevel) -> Self {
        Self {
            pool: ClassPool::new(),
            loader: ClassLoader::new(CodeSource::default()),
            ctx: LexicalContext::new(),
            host: Box::new(HostImage::bootstrap()),
            parser: None,
            sources: Box::new(PathSourceFinder::empty()),
            emitter: Box::new(DescriptorEmitter),
            checker: TypeChecker::new(level),
        }
    }

    /// Replace the host metadata source.
    pub fn with_host(mut self, host: impl HostClasses + 'static) -> Self {
        self.host = Box::new(host);
        self
    }

    /// Install the parser collaborator.
    pub fn with_parser(mut self, parser: impl UnitParser + 'static) -> Self {
        self.parser = Some(Box::new(parser));
        self
    }

    /// Replace the source finder.
    pub fn with_source_finder(mut self, sources: impl SourceFinder + 'static) -> Self {
        self.sources = Box::new(sources);
        self
    }

    /// Replace the class emitter.
    pub fn with_emitter(mut self, emitter: impl ClassEmitter + 'static) -> Self {
        self.emitter = Box::new(emitter);
        self
    }

    /// Use `code_source` as the loader's provenance descriptor. Only
    /// meaningful before any class is defined.
    pub fn with_code_source(mut self, code_source: CodeSource) -> Self {
        self.loader = ClassLoader::new(code_source);
        self
    }

    /// Replace the auxiliary loader at runtime. `None` removes it.
    pub fn set_auxiliary_loader(&mut self, auxiliary: Option<Box<dyn AuxiliaryLoader>>) {
        self.loader.set_auxiliary(auxiliary);
    }

    /// The session's language level.
    pub fn level(&self) -> LanguageLevel {
        self.checker.level()
    }

    /// The session's class pool.
    pub fn pool(&self) -> &ClassPool {
        &self.pool
    }

    /// The session's class loader.
    pub fn loader(&self) -> &ClassLoader {
        &self.loader
    }

    /// The session's lexical context.
    pub fn context(&self) -> &LexicalContext {
        &self.ctx
    }

    /// Mutable access to the lexical context (the front end enters
    /// variable bindings for evaluation results).
    pub fn context_mut(&mut self) -> &mut LexicalContext {
        &mut self.ctx
    }

    fn env(&mut self) -> CompileEnv<'_> {
        CompileEnv {
            pool: &mut self.pool,
            loader: &mut self.loader,
            ctx: &mut self.ctx,
            host: self.host.as_ref(),
            parser: self.parser.as_deref_mut(),
            sources: self.sources.as_mut(),
            emitter: self.emitter.as_mut(),
        }
    }

    // ==========================================================================
    // Compilation entry points
    // ==========================================================================

    /// Compile `name` and its dependencies, returning the defined class.
    pub fn compile(&mut self, name: &str) -> Result<&RuntimeClass, CompileError> {
        let class = ClassName::from_binary(name);
        {
            let mut env = self.env();
            TreeCompiler::compile(&mut env, &class)?;
        }
        self.loader.get(&class).ok_or(CompileError::ClassNotFound {
            name: class.binary(),
        })
    }

    /// Register a freshly parsed declaration and compile it, with its
    /// dependencies, in one batch.
    pub fn compile_tree(&mut self, decl: TypeDecl) -> Result<&RuntimeClass, CompileError> {
        self.checker.check_decl(&decl)?;
        let name = {
            let mut env = self.env();
            TreeCompiler::compile_tree(&mut env, decl)?
        };
        self.loader.get(&name).ok_or(CompileError::ClassNotFound {
            name: name.binary(),
        })
    }

    /// Register an undefined declaration for later on-demand compilation,
    /// under the current package and imports. Refused when the name is
    /// already defined.
    pub fn add_pending_tree(&mut self, decl: TypeDecl) -> bool {
        let name = self.ctx.qualify(&decl.name);
        let tree = PendingTree {
            decl: Rc::new(decl),
            package: self.ctx.package().map(str::to_string),
            imports: Vec::new(),
        };
        self.loader.add_pending_tree(name, tree)
    }

    /// The loader's resolution order: a defined class is returned as is;
    /// otherwise the auxiliary loader is tried; otherwise the name is
    /// compiled on demand and the result defined.
    pub fn load_class(&mut self, name: &str) -> Result<&RuntimeClass, CompileError> {
        let class = ClassName::from_binary(name);
        if !self.loader.is_defined(&class) && !self.loader.load_from_auxiliary(&class) {
            let mut env = self.env();
            TreeCompiler::compile(&mut env, &class)?;
        }
        self.loader.get(&class).ok_or(CompileError::ClassNotFound {
            name: class.binary(),
        })
    }

    // ==========================================================================
    // Checking entry points
    // ==========================================================================

    /// Type-check one statement against the session state. On failure the
    /// scope chain is unwound to its previous depth; the session stays
    /// usable for independent subsequent statements.
    pub fn check(&mut self, stmt: &mut Stmt) -> Result<(), CheckError> {
        let depth = self.ctx.depth();
        let checker = self.checker;
        let result = {
            let mut env = self.env();
            checker.check_stmt(&mut env, stmt)
        };
        if result.is_err() {
            self.ctx.unwind_to(depth);
        }
        result
    }

    /// Type-check one expression against the session state.
    pub fn check_expr(&mut self, expr: &mut Expr) -> Result<Type, CheckError> {
        let checker = self.checker;
        let mut env = self.env();
        checker.check_expr(&mut env, expr)
    }

    /// Resolve a class name from the session's lexical position,
    /// optionally from within `from` (enabling inner-name and
    /// superclass-chain lookup).
    pub fn resolve(&mut self, name: &str, from: Option<&str>) -> Result<Resolution, CheckError> {
        let from = from.map(ClassName::from_binary);
        let mut env = self.env();
        ClassFinder::new(&mut env).resolve(name, from.as_ref())
    }
}
