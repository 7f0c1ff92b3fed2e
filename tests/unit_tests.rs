//! Integration tests driving the full pipeline through a [`Session`]:
//! declaration, dependency-order compilation, name resolution, and the
//! level-gated checker.

use std::cell::Cell;
use std::rc::Rc;

use javelin::{
    AuxiliaryLoader, CheckError, ClassEmitter, CodeSource, CompileError, DescriptorEmitter,
    Feature, LanguageLevel, ParseError, ResolvedClass, RuntimeClass, Session, SourceFinder,
    SourceUnit, Type, UnitParser, Value, ops,
};
use javelin_ast::{
    BinaryOp, CompilationUnit, Expr, ExprKind, Import, Lit, MethodDecl, Param, Stmt, StmtKind,
    TypeDecl, TypeRef,
};
use javelin_core::{ClassModifiers, ClassName, PrimitiveKind, Span};

fn modern() -> Session {
    Session::new(LanguageLevel::Modern)
}

fn classic() -> Session {
    Session::new(LanguageLevel::Classic)
}

fn span() -> Span {
    Span::point(1, 1)
}

fn ty(name: &str) -> TypeRef {
    TypeRef::named(name, span())
}

fn int_lit(v: i32) -> Expr {
    Expr::literal(Lit::Int(v), span())
}

fn str_lit(s: &str) -> Expr {
    Expr::literal(Lit::Str(s.into()), span())
}

fn var_decl(declared: TypeRef, name: &str, init: Option<Expr>) -> Stmt {
    Stmt::new(
        StmtKind::VarDecl {
            ty: declared,
            name: name.into(),
            init,
        },
        span(),
    )
}

fn new_expr(class: &str) -> Expr {
    Expr::new(
        ExprKind::New {
            class: ty(class),
            args: Vec::new(),
        },
        span(),
    )
}

// =============================================================================
// Compilation
// =============================================================================

#[test]
fn compile_tree_defines_the_class() {
    let mut session = modern();
    let class = session
        .compile_tree(TypeDecl::class("Greeter", span()))
        .expect("compile_tree failed");
    assert_eq!(class.name.binary(), "Greeter");
    assert_eq!(class.source.as_str(), "javelin:session");
    assert!(!class.bytes.is_empty());
}

#[test]
fn dependencies_compile_before_the_class() {
    let mut session = modern();
    assert!(session.add_pending_tree(TypeDecl::class("Base", span())));
    session
        .compile_tree(TypeDecl::class("Sub", span()).extending(ty("Base")))
        .expect("compile_tree failed");
    assert!(session.loader().is_defined(&ClassName::simple("Base")));
    assert!(session.loader().is_defined(&ClassName::simple("Sub")));
}

#[test]
fn failed_batch_keeps_compiled_dependencies_installed() {
    let mut session = modern();
    session.add_pending_tree(TypeDecl::class("Base", span()));
    let bad = TypeDecl::class("Bad", span())
        .extending(ty("Base"))
        .implementing(ty("Missing"));
    let err = session.compile_tree(bad).unwrap_err();
    assert!(matches!(
        err,
        CompileError::UndefinedOrAlreadyDefined { .. }
    ));
    // no rollback of partial progress
    assert!(session.loader().is_defined(&ClassName::simple("Base")));
    assert!(!session.loader().is_defined(&ClassName::simple("Bad")));
    // the session stays usable for independent declarations
    session
        .compile_tree(TypeDecl::class("Fresh", span()))
        .expect("session unusable after a failed batch");
}

#[test]
fn unknown_class_fails_with_class_not_found() {
    let mut session = modern();
    let err = session.compile("Nope").unwrap_err();
    assert_eq!(err.to_string(), "class Nope not found");
}

struct CountingEmitter {
    count: Rc<Cell<usize>>,
    inner: DescriptorEmitter,
}

impl ClassEmitter for CountingEmitter {
    fn emit(&mut self, class: &ResolvedClass<'_>) -> Result<Vec<u8>, CompileError> {
        self.count.set(self.count.get() + 1);
        self.inner.emit(class)
    }
}

#[test]
fn a_class_is_never_recompiled() {
    let count = Rc::new(Cell::new(0));
    let mut session = Session::new(LanguageLevel::Modern).with_emitter(CountingEmitter {
        count: Rc::clone(&count),
        inner: DescriptorEmitter,
    });
    session
        .compile_tree(TypeDecl::class("Once", span()))
        .unwrap();
    assert_eq!(count.get(), 1);

    // a later reference short-circuits on the already-defined class
    assert!(!session.add_pending_tree(TypeDecl::class("Once", span())));
    session.load_class("Once").unwrap();
    session.compile("Once").unwrap();
    assert_eq!(count.get(), 1);
}

#[test]
fn redeclaring_a_defined_class_fails_at_the_declaration_position() {
    let mut session = modern();
    session
        .compile_tree(TypeDecl::class("Dup", span()))
        .unwrap();
    let err = session
        .compile_tree(TypeDecl::class("Dup", Span::new(3, 1, 5)))
        .unwrap_err();
    match err {
        CompileError::UndefinedOrAlreadyDefined { name, span } => {
            assert_eq!(name, "Dup");
            assert_eq!(span, Span::new(3, 1, 5));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn interface_cycles_terminate() {
    let mut session = modern();
    session.add_pending_tree(TypeDecl::interface("I1", span()).implementing(ty("I2")));
    session.add_pending_tree(TypeDecl::interface("I2", span()).implementing(ty("I1")));
    session.compile("I1").expect("cyclic batch failed");
    assert!(session.loader().is_defined(&ClassName::simple("I1")));
    assert!(session.loader().is_defined(&ClassName::simple("I2")));
}

#[test]
fn packages_qualify_declared_classes() {
    let mut session = modern();
    session.context_mut().set_package(Some("game.core".into()));
    let class = session
        .compile_tree(TypeDecl::class("Board", span()))
        .unwrap();
    assert_eq!(class.name.binary(), "game.core.Board");
}

// =============================================================================
// Discovery through collaborators
// =============================================================================

struct CannedSources {
    class: ClassName,
}

impl SourceFinder for CannedSources {
    fn unit_of(&mut self, _class: &ClassName) -> Option<ClassName> {
        None
    }

    fn find_source(&mut self, class: &ClassName) -> Option<SourceUnit> {
        (class == &self.class).then(|| SourceUnit {
            unit_name: class.clone(),
            text: format!("class {} {{}}", class.simple_name()),
            file: format!("{}.jv", class.simple_name()),
        })
    }
}

struct CannedParser;

impl UnitParser for CannedParser {
    fn parse_unit(&mut self, text: &str, _file: &str) -> Result<CompilationUnit, ParseError> {
        // "class Name {}"
        let name = text
            .split_whitespace()
            .nth(1)
            .unwrap_or_default()
            .to_string();
        Ok(CompilationUnit {
            package: None,
            imports: Vec::new(),
            types: vec![TypeDecl::class(name, span())],
        })
    }
}

#[test]
fn discovery_parses_located_source_units() {
    let mut session = Session::new(LanguageLevel::Modern)
        .with_parser(CannedParser)
        .with_source_finder(CannedSources {
            class: ClassName::simple("Filed"),
        });
    let class = session.compile("Filed").expect("discovery failed");
    assert_eq!(class.name.binary(), "Filed");
}

struct NamedAux {
    known: ClassName,
}

impl AuxiliaryLoader for NamedAux {
    fn load(&mut self, name: &ClassName) -> Option<RuntimeClass> {
        (name == &self.known).then(|| RuntimeClass {
            name: name.clone(),
            bytes: vec![0xAA],
            source: CodeSource::new("aux:test"),
        })
    }
}

#[test]
fn auxiliary_loader_is_tried_before_compilation() {
    let mut session = modern();
    session.add_pending_tree(TypeDecl::class("Ext", span()));
    session.set_auxiliary_loader(Some(Box::new(NamedAux {
        known: ClassName::simple("Ext"),
    })));
    let class = session.load_class("Ext").unwrap();
    assert_eq!(class.source.as_str(), "aux:test");
}

// =============================================================================
// Name resolution
// =============================================================================

#[test]
fn inner_names_resolve_through_the_enclosing_class() {
    let mut session = modern();
    let mut outer = TypeDecl::class("A", span());
    outer.inner.push(TypeDecl::class("B", span()));
    session.compile_tree(outer).unwrap();

    let resolution = session.resolve("B", Some("A")).unwrap();
    assert_eq!(resolution.name().binary(), "A$B");

    let err = session.resolve("Zzz", Some("A")).unwrap_err();
    assert!(matches!(err, CheckError::ClassNotFound { .. }));
}

#[test]
fn inner_names_resolve_along_the_superclass_chain() {
    let mut session = modern();
    let mut base = TypeDecl::class("Base", span());
    base.inner.push(TypeDecl::class("In", span()));
    session.compile_tree(base).unwrap();
    session
        .compile_tree(TypeDecl::class("Sub", span()).extending(ty("Base")))
        .unwrap();

    let resolution = session.resolve("In", Some("Sub")).unwrap();
    assert_eq!(resolution.name().binary(), "Base$In");
}

#[test]
fn tree_backed_resolution_is_a_success_without_compiling() {
    let mut session = modern();
    session.add_pending_tree(TypeDecl::class("Later", span()));
    let resolution = session.resolve("Later", None).unwrap();
    assert!(resolution.is_tree_backed());
    assert!(!session.loader().is_defined(&ClassName::simple("Later")));
}

#[test]
fn on_demand_imports_reach_host_classes() {
    let mut session = modern();
    let mut import = Stmt::new(StmtKind::Import(Import::OnDemand("lang".into())), span());
    session.check(&mut import).unwrap();
    let resolution = session.resolve("Integer", None).unwrap();
    assert_eq!(resolution.name().binary(), "lang.Integer");
    assert!(!resolution.is_tree_backed());
}

// =============================================================================
// Version gates
// =============================================================================

fn foreach_over(name: &str, element: TypeRef) -> Stmt {
    Stmt::new(
        StmtKind::ForEach {
            element_ty: element,
            name: "it".into(),
            iterable: Expr::name(name, span()),
            body: Box::new(Stmt::new(StmtKind::Block(Vec::new()), span())),
        },
        span(),
    )
}

#[test]
fn classic_level_always_rejects_per_element_iteration() {
    let mut session = classic();
    let err = session
        .check(&mut foreach_over("xs", ty("int")))
        .unwrap_err();
    match &err {
        CheckError::UnsupportedFeature { feature, .. } => {
            assert_eq!(*feature, Feature::PerElementIteration);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(err.to_string().contains("newer language version"));
}

#[test]
fn modern_level_iterates_arrays_by_component_assignability() {
    let mut session = modern();
    session
        .check(&mut var_decl(
            ty("int").array(),
            "xs",
            Some(Expr::literal(Lit::Null, span())),
        ))
        .unwrap();
    session
        .check(&mut foreach_over("xs", ty("int")))
        .expect("int element over int[] failed");
    session
        .check(&mut foreach_over("xs", ty("long")))
        .expect("widened element over int[] failed");
    let err = session
        .check(&mut foreach_over("xs", ty("boolean")))
        .unwrap_err();
    assert!(matches!(err, CheckError::CollectionElement { .. }));
    assert!(err.to_string().contains("collection type"));
}

#[test]
fn modern_level_iterates_collections_and_rejects_the_rest() {
    let mut session = modern();
    session
        .check(&mut var_decl(
            ty("util.List"),
            "list",
            Some(new_expr("util.List")),
        ))
        .unwrap();
    session
        .check(&mut foreach_over("list", ty("lang.Object")))
        .expect("collection iteration failed");

    session
        .check(&mut var_decl(ty("lang.String"), "s", Some(str_lit("x"))))
        .unwrap();
    let err = session
        .check(&mut foreach_over("s", ty("lang.Object")))
        .unwrap_err();
    assert!(matches!(err, CheckError::CollectionRequired { .. }));
}

#[test]
fn parameterized_types_are_level_gated() {
    let list_of_string = ty("util.List").with_args(vec![ty("lang.String")]);
    let err = classic()
        .check(&mut var_decl(list_of_string.clone(), "l", None))
        .unwrap_err();
    assert!(matches!(
        err,
        CheckError::UnsupportedFeature {
            feature: Feature::ParameterizedTypes,
            ..
        }
    ));
    // the modern level resolves the arguments, then erases them
    modern()
        .check(&mut var_decl(list_of_string, "l", None))
        .expect("parameterized declaration failed");
}

#[test]
fn static_imports_are_level_gated_and_distinguished() {
    let single = Import::StaticSingle {
        class: "lang.Integer".into(),
        member: "MAX_VALUE".into(),
    };
    let err = classic()
        .check(&mut Stmt::new(StmtKind::Import(single.clone()), span()))
        .unwrap_err();
    assert!(matches!(
        err,
        CheckError::UnsupportedFeature {
            feature: Feature::StaticImports,
            ..
        }
    ));

    let mut session = modern();
    session
        .check(&mut Stmt::new(StmtKind::Import(single), span()))
        .unwrap();
    let found = session.check_expr(&mut Expr::name("MAX_VALUE", span())).unwrap();
    assert_eq!(found, Type::Primitive(PrimitiveKind::Int));
    // only the imported member is visible through the single import
    assert!(session.check_expr(&mut Expr::name("MIN_VALUE", span())).is_err());

    let mut on_demand = modern();
    on_demand
        .check(&mut Stmt::new(
            StmtKind::Import(Import::StaticOnDemand("lang.Integer".into())),
            span(),
        ))
        .unwrap();
    let found = on_demand
        .check_expr(&mut Expr::name("MIN_VALUE", span()))
        .unwrap();
    assert_eq!(found, Type::Primitive(PrimitiveKind::Int));
}

#[test]
fn varargs_declarations_are_level_gated() {
    let mut decl = TypeDecl::class("Util", span());
    decl.methods.push(MethodDecl {
        modifiers: ClassModifiers::PUBLIC | ClassModifiers::STATIC,
        ret: ty("int"),
        name: "sum".into(),
        params: vec![Param {
            ty: ty("int"),
            name: "xs".into(),
            span: span(),
        }],
        varargs: true,
        body: Vec::new(),
        span: span(),
    });

    let err = classic().compile_tree(decl.clone()).unwrap_err();
    assert!(matches!(
        err,
        CompileError::Check(CheckError::UnsupportedFeature {
            feature: Feature::VariableArity,
            ..
        })
    ));

    let mut session = modern();
    session.compile_tree(decl).unwrap();
    let mut call = Expr::new(
        ExprKind::Call {
            target: Some(Box::new(Expr::name("Util", span()))),
            name: "sum".into(),
            args: vec![int_lit(1), int_lit(2), int_lit(3)],
        },
        span(),
    );
    let ret = session.check_expr(&mut call).unwrap();
    assert_eq!(ret, Type::Primitive(PrimitiveKind::Int));
}

// =============================================================================
// Boxing and unboxing
// =============================================================================

#[test]
fn boxing_synthesizes_a_constructor_call_preserving_the_span() {
    let mut session = modern();
    let at = Span::new(7, 3, 1);
    let mut stmt = var_decl(
        ty("lang.Integer"),
        "i",
        Some(Expr::literal(Lit::Int(5), at)),
    );
    session.check(&mut stmt).unwrap();
    let StmtKind::VarDecl {
        init: Some(init), ..
    } = &stmt.kind
    else {
        panic!("not a var decl");
    };
    match &init.kind {
        ExprKind::New { class, args } => {
            assert_eq!(class.name, "lang.Integer");
            assert_eq!(args.len(), 1);
            assert_eq!(args[0].kind, ExprKind::Literal(Lit::Int(5)));
        }
        other => panic!("expected a boxing constructor call, got {other:?}"),
    }
    assert_eq!(init.span, at);
}

#[test]
fn unboxing_synthesizes_an_accessor_call_preserving_the_span() {
    let mut session = modern();
    session
        .check(&mut var_decl(ty("lang.Integer"), "i", Some(int_lit(5))))
        .unwrap();
    let at = Span::new(9, 1, 1);
    let mut stmt = var_decl(ty("int"), "j", Some(Expr::name("i", at)));
    session.check(&mut stmt).unwrap();
    let StmtKind::VarDecl {
        init: Some(init), ..
    } = &stmt.kind
    else {
        panic!("not a var decl");
    };
    match &init.kind {
        ExprKind::Call { target, name, args } => {
            assert_eq!(name, "intValue");
            assert!(args.is_empty());
            assert_eq!(
                target.as_deref().map(|t| &t.kind),
                Some(&ExprKind::Name("i".into()))
            );
        }
        other => panic!("expected an unboxing accessor call, got {other:?}"),
    }
    assert_eq!(init.span, at);
    assert_eq!(init.ty, Some(Type::Primitive(PrimitiveKind::Int)));
}

#[test]
fn classic_level_rejects_boxing_conversions() {
    let err = classic()
        .check(&mut var_decl(ty("lang.Integer"), "i", Some(int_lit(5))))
        .unwrap_err();
    assert!(matches!(
        err,
        CheckError::UnsupportedFeature {
            feature: Feature::Autoboxing,
            ..
        }
    ));
}

#[test]
fn unboxing_a_non_wrapper_fails() {
    let mut session = modern();
    session
        .check(&mut var_decl(ty("lang.String"), "s", Some(str_lit("x"))))
        .unwrap();
    let mut cmp = Expr::binary(BinaryOp::Eq, int_lit(1), Expr::name("s", span()));
    let err = session.check_expr(&mut cmp).unwrap_err();
    assert!(matches!(err, CheckError::NoUnboxingConversion { .. }));
    assert!(err.to_string().contains("no such unboxing conversion"));
}

// =============================================================================
// Assignment compatibility
// =============================================================================

#[test]
fn int_literals_narrow_only_when_they_round_trip() {
    let mut session = modern();
    session
        .check(&mut var_decl(ty("byte"), "b", Some(int_lit(127))))
        .expect("round-tripping literal rejected");
    let err = session
        .check(&mut var_decl(ty("byte"), "b2", Some(int_lit(128))))
        .unwrap_err();
    assert!(matches!(err, CheckError::IncompatibleAssignment { .. }));
}

#[test]
fn boxed_int_values_narrow_only_when_they_round_trip() {
    assert!(ops::value_assignable(PrimitiveKind::Byte, &Value::Int(127)));
    assert!(!ops::value_assignable(PrimitiveKind::Byte, &Value::Int(128)));
    assert!(ops::value_assignable(PrimitiveKind::Char, &Value::Int(0xFFFF)));
    assert!(!ops::value_assignable(PrimitiveKind::Char, &Value::Int(-1)));
}

#[test]
fn reference_assignment_holds_in_either_direction() {
    let mut session = modern();
    session
        .compile_tree(TypeDecl::class("Base", span()))
        .unwrap();
    session
        .compile_tree(TypeDecl::class("Sub", span()).extending(ty("Base")))
        .unwrap();

    session
        .check(&mut var_decl(ty("Base"), "b", Some(new_expr("Sub"))))
        .expect("widening reference assignment failed");
    session
        .check(&mut var_decl(ty("Sub"), "s2", Some(Expr::name("b", span()))))
        .expect("narrowing-by-assignment failed");
    let err = session
        .check(&mut var_decl(
            ty("util.List"),
            "l",
            Some(Expr::name("b", span())),
        ))
        .unwrap_err();
    assert!(matches!(err, CheckError::IncompatibleAssignment { .. }));
}

// =============================================================================
// Expressions against the host image
// =============================================================================

#[test]
fn string_addition_is_concatenation() {
    let mut expr = Expr::binary(BinaryOp::Add, int_lit(5), str_lit("x"));
    let ty = modern().check_expr(&mut expr).unwrap();
    assert!(ty.is_textual());
}

#[test]
fn host_methods_resolve_through_the_hierarchy() {
    let mut session = modern();
    let mut call = Expr::new(
        ExprKind::Call {
            target: Some(Box::new(str_lit("abc"))),
            name: "length".into(),
            args: Vec::new(),
        },
        span(),
    );
    assert_eq!(
        session.check_expr(&mut call).unwrap(),
        Type::Primitive(PrimitiveKind::Int)
    );

    // compareTo comes from the Comparable interface
    let mut cmp = Expr::new(
        ExprKind::Call {
            target: Some(Box::new(str_lit("abc"))),
            name: "compareTo".into(),
            args: vec![str_lit("abd")],
        },
        span(),
    );
    assert_eq!(
        session.check_expr(&mut cmp).unwrap(),
        Type::Primitive(PrimitiveKind::Int)
    );
}

#[test]
fn array_length_is_an_int() {
    let mut session = modern();
    session
        .check(&mut var_decl(
            ty("int").array(),
            "xs",
            Some(Expr::literal(Lit::Null, span())),
        ))
        .unwrap();
    let mut len = Expr::new(
        ExprKind::Field {
            target: Box::new(Expr::name("xs", span())),
            name: "length".into(),
        },
        span(),
    );
    assert_eq!(
        session.check_expr(&mut len).unwrap(),
        Type::Primitive(PrimitiveKind::Int)
    );
}

// =============================================================================
// Session recovery
// =============================================================================

#[test]
fn the_session_stays_usable_after_a_failed_statement() {
    let mut session = modern();
    assert!(session.check(&mut var_decl(ty("NoSuch"), "x", None)).is_err());
    session
        .check(&mut var_decl(ty("int"), "y", Some(int_lit(1))))
        .expect("session unusable after failure");
    let mut sum = Expr::binary(BinaryOp::Add, Expr::name("y", span()), int_lit(1));
    assert_eq!(
        session.check_expr(&mut sum).unwrap(),
        Type::Primitive(PrimitiveKind::Int)
    );
}

// =============================================================================
// Evaluation semantics
// =============================================================================

#[test]
fn operator_semantics_match_the_declared_result_type() {
    assert_eq!(
        ops::add(
            &Type::Primitive(PrimitiveKind::Int),
            &Value::Char('a'),
            &Value::Int(1)
        ),
        Ok(Value::Int(98))
    );
    assert_eq!(
        ops::add(&Type::string(), &Value::Int(5), &Value::Str("x".into())),
        Ok(Value::Str("5x".into()))
    );
    assert_eq!(
        ops::unsigned_shift_right(PrimitiveKind::Int, &Value::Int(-1), &Value::Int(1)),
        Ok(Value::Int(2147483647))
    );
}
