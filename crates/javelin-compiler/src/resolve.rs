//! Type-reference resolution.
//!
//! Maps source-level [`TypeRef`]s to semantic [`Type`]s. Primitive
//! keywords resolve directly; class names go through the finder (which may
//! register host classes or land on tree-backed descriptions). Type
//! arguments are gated by the language level, resolved for
//! well-formedness, and erased to the raw named type.

use javelin_ast::TypeRef;
use javelin_core::{CheckError, ClassName, Feature, LanguageLevel, PrimitiveKind, Type};

use crate::env::CompileEnv;
use crate::finder::ClassFinder;

/// Resolve one type reference under `level`, optionally from the lexical
/// position of `from_class`.
pub fn resolve_type_ref(
    env: &mut CompileEnv<'_>,
    level: LanguageLevel,
    type_ref: &TypeRef,
    from_class: Option<&ClassName>,
) -> Result<Type, CheckError> {
    if type_ref.is_parameterized() && !level.is_modern() {
        return Err(CheckError::UnsupportedFeature {
            feature: Feature::ParameterizedTypes,
            span: type_ref.span,
        });
    }
    // arguments must resolve, then erase
    for arg in &type_ref.args {
        resolve_type_ref(env, level, arg, from_class)?;
    }

    let base = match PrimitiveKind::from_keyword(&type_ref.name) {
        Some(kind) => Type::Primitive(kind),
        None if type_ref.name == "void" => Type::Void,
        None => {
            let resolution = ClassFinder::new(env).resolve(&type_ref.name, from_class)?;
            Type::Named(resolution.into_name())
        }
    };
    Ok((0..type_ref.dims).fold(base, |ty, _| ty.array_of()))
}
