//! Statement checking.

use javelin_ast::{Import, Stmt, StmtKind};
use javelin_core::{CheckError, ClassName, Feature, PrimitiveKind, Span, Type, WrapperKind};

use crate::check::{TypeChecker, boxing};
use crate::env::CompileEnv;
use crate::finder::reaches;
use crate::resolve::resolve_type_ref;

fn collection_class() -> ClassName {
    ClassName::from_binary("util.Collection")
}

impl TypeChecker {
    /// Check one statement against the session state, declaring variables
    /// into the lexical context as it goes.
    pub fn check_stmt(
        &self,
        env: &mut CompileEnv<'_>,
        stmt: &mut Stmt,
    ) -> Result<(), CheckError> {
        let span = stmt.span;
        match &mut stmt.kind {
            StmtKind::Expr(expr) => {
                self.check_expr(env, expr)?;
                Ok(())
            }
            StmtKind::VarDecl { ty, name, init } => {
                let declared = resolve_type_ref(env, self.level(), ty, None)?;
                if let Some(init) = init {
                    self.check_expr(env, init)?;
                    self.check_assignable(env, &declared, init)?;
                }
                env.ctx.declare(name.clone(), declared, span);
                Ok(())
            }
            StmtKind::If {
                cond,
                then_branch,
                else_branch,
            } => {
                self.check_condition(env, cond)?;
                env.ctx.push_scope();
                let then_result = self.check_stmt(env, then_branch);
                env.ctx.pop_scope();
                then_result?;
                if let Some(else_branch) = else_branch {
                    env.ctx.push_scope();
                    let else_result = self.check_stmt(env, else_branch);
                    env.ctx.pop_scope();
                    else_result?;
                }
                Ok(())
            }
            StmtKind::While { cond, body } => {
                self.check_condition(env, cond)?;
                env.ctx.push_scope();
                let result = self.check_stmt(env, body);
                env.ctx.pop_scope();
                result
            }
            StmtKind::Block(stmts) => {
                env.ctx.push_scope();
                let mut result = Ok(());
                for stmt in stmts {
                    result = self.check_stmt(env, stmt);
                    if result.is_err() {
                        break;
                    }
                }
                env.ctx.pop_scope();
                result
            }
            StmtKind::Return(value) => {
                if let Some(value) = value {
                    self.check_expr(env, value)?;
                }
                Ok(())
            }
            StmtKind::ForEach {
                element_ty,
                name,
                iterable,
                body,
            } => {
                self.gate(Feature::PerElementIteration, span)?;
                let element = resolve_type_ref(env, self.level(), element_ty, None)?;
                let iterated = self.check_expr(env, iterable)?;
                match &iterated {
                    Type::Array(component) => {
                        // the declared element type must accept the array's
                        // component type
                        if !self.assignable_types(env, &element, component)? {
                            return Err(CheckError::CollectionElement {
                                element: element.to_string(),
                                component: component.to_string(),
                                span: iterable.span,
                            });
                        }
                    }
                    Type::Named(class) => {
                        // element-level compatibility is deferred to
                        // evaluation for general collections
                        let class = class.clone();
                        if !reaches(env, &class, &collection_class())? {
                            return Err(CheckError::CollectionRequired {
                                ty: iterated.to_string(),
                                span: iterable.span,
                            });
                        }
                    }
                    other => {
                        return Err(CheckError::CollectionRequired {
                            ty: other.to_string(),
                            span: iterable.span,
                        });
                    }
                }
                env.ctx.push_scope();
                env.ctx.declare(name.clone(), element, span);
                let result = self.check_stmt(env, body);
                env.ctx.pop_scope();
                result
            }
            StmtKind::Import(import) => self.check_import(env, import, span),
        }
    }

    /// Gate and record an interactively entered import.
    pub fn check_import(
        &self,
        env: &mut CompileEnv<'_>,
        import: &Import,
        span: Span,
    ) -> Result<(), CheckError> {
        if matches!(
            import,
            Import::StaticSingle { .. } | Import::StaticOnDemand(_)
        ) {
            self.gate(Feature::StaticImports, span)?;
        }
        env.ctx.apply_import(import);
        Ok(())
    }

    /// A condition must be boolean; a boxed boolean unboxes at the modern
    /// level.
    pub(crate) fn check_condition(
        &self,
        env: &mut CompileEnv<'_>,
        expr: &mut javelin_ast::Expr,
    ) -> Result<(), CheckError> {
        let ty = self.check_expr(env, expr)?;
        match &ty {
            Type::Primitive(PrimitiveKind::Bool) => Ok(()),
            _ if ty.as_wrapper() == Some(WrapperKind::Boolean) => {
                self.gate(Feature::Autoboxing, expr.span)?;
                boxing::unbox(env, expr)?;
                Ok(())
            }
            other => Err(CheckError::OperandType {
                expected: "boolean",
                found: other.to_string(),
                span: expr.span,
            }),
        }
    }
}
