//! Expression checking.
//!
//! Each arm computes the node's static type, writes it into the node, and
//! rewrites operand children in place where an implicit conversion is
//! required.

use javelin_ast::{BinaryOp, Expr, ExprKind, Lit, UnaryOp};
use javelin_core::{CheckError, ClassName, PrimitiveKind, Type};

use crate::check::{TypeChecker, boxing};
use crate::env::CompileEnv;
use crate::finder::{ClassFinder, reaches};
use crate::resolve::resolve_type_ref;

fn literal_type(lit: &Lit) -> Type {
    match lit {
        Lit::Null => Type::Null,
        Lit::Bool(_) => Type::Primitive(PrimitiveKind::Bool),
        Lit::Char(_) => Type::Primitive(PrimitiveKind::Char),
        Lit::Int(_) => Type::Primitive(PrimitiveKind::Int),
        Lit::Long(_) => Type::Primitive(PrimitiveKind::Long),
        Lit::Float(_) => Type::Primitive(PrimitiveKind::Float),
        Lit::Double(_) => Type::Primitive(PrimitiveKind::Double),
        Lit::Str(_) => Type::string(),
    }
}

impl TypeChecker {
    /// Check one expression, writing its static type into the node.
    pub fn check_expr(
        &self,
        env: &mut CompileEnv<'_>,
        expr: &mut Expr,
    ) -> Result<Type, CheckError> {
        let span = expr.span;
        let ty = match &mut expr.kind {
            ExprKind::Literal(lit) => literal_type(lit),

            ExprKind::Name(name) => {
                if let Some(binding) = env.ctx.lookup(name) {
                    binding.ty.clone()
                } else if let Some(class) = env.ctx.static_single_class(name).cloned() {
                    let name = name.clone();
                    self.field_type(env, &class, &name)?
                        .ok_or_else(|| CheckError::FieldNotFound {
                            class: class.binary(),
                            name,
                            span,
                        })?
                } else {
                    let name = name.clone();
                    let mut found = None;
                    for class in env.ctx.static_on_demand_classes().to_vec() {
                        if let Some(ty) = self.field_type(env, &class, &name)? {
                            found = Some(ty);
                            break;
                        }
                    }
                    found.ok_or(CheckError::UndefinedVariable { name, span })?
                }
            }

            ExprKind::Field { target, name } => {
                let name = name.clone();
                // a non-variable name target is a class reference
                if let Some(class) = self.class_reference(env, target)? {
                    target.ty = Some(Type::Named(class.clone()));
                    self.field_type(env, &class, &name)?
                        .ok_or_else(|| CheckError::FieldNotFound {
                            class: class.binary(),
                            name,
                            span,
                        })?
                } else {
                    let target_ty = self.check_expr(env, target)?;
                    match &target_ty {
                        Type::Array(_) if name == "length" => {
                            Type::Primitive(PrimitiveKind::Int)
                        }
                        Type::Named(class) => {
                            let class = class.clone();
                            self.field_type(env, &class, &name)?.ok_or_else(|| {
                                CheckError::FieldNotFound {
                                    class: class.binary(),
                                    name,
                                    span,
                                }
                            })?
                        }
                        other => {
                            return Err(CheckError::OperandType {
                                expected: "object",
                                found: other.to_string(),
                                span,
                            });
                        }
                    }
                }
            }

            ExprKind::Call { target, name, args } => {
                let name = name.clone();
                let receiver = match target {
                    Some(target) => {
                        if let Some(class) = self.class_reference(env, target)? {
                            target.ty = Some(Type::Named(class.clone()));
                            Some(class)
                        } else {
                            let target_ty = self.check_expr(env, target)?;
                            match target_ty {
                                Type::Named(class) => Some(class),
                                other => {
                                    return Err(CheckError::OperandType {
                                        expected: "object",
                                        found: other.to_string(),
                                        span,
                                    });
                                }
                            }
                        }
                    }
                    None => None,
                };
                for arg in args.iter_mut() {
                    self.check_expr(env, arg)?;
                }
                match receiver {
                    Some(class) => self.resolve_call(env, &class, &name, args, span)?,
                    None => self.resolve_unqualified_call(env, &name, args, span)?,
                }
            }

            ExprKind::New { class, args } => {
                let ty = resolve_type_ref(env, self.level(), class, None)?;
                let Type::Named(class_name) = &ty else {
                    return Err(CheckError::OperandType {
                        expected: "class type",
                        found: ty.to_string(),
                        span,
                    });
                };
                let class_name = class_name.clone();
                for arg in args.iter_mut() {
                    self.check_expr(env, arg)?;
                }
                self.resolve_ctor(env, &class_name, args, span)?;
                ty
            }

            ExprKind::Cast { ty, value } => {
                let target = resolve_type_ref(env, self.level(), ty, None)?;
                self.check_expr(env, value)?;
                let source = value
                    .ty
                    .clone()
                    .ok_or_else(|| CheckError::Internal {
                        detail: "cast operand left unannotated".into(),
                    })?;
                if !self.castable(env, &target, &source)? {
                    return Err(CheckError::InvalidCast {
                        from: source.to_string(),
                        to: target.to_string(),
                        span,
                    });
                }
                target
            }

            ExprKind::Assign { target, value } => {
                if !matches!(target.kind, ExprKind::Name(_) | ExprKind::Field { .. }) {
                    return Err(CheckError::OperandType {
                        expected: "assignable target",
                        found: "expression".into(),
                        span,
                    });
                }
                let target_ty = self.check_expr(env, target)?;
                self.check_expr(env, value)?;
                self.check_assignable(env, &target_ty, value)?;
                target_ty
            }

            ExprKind::Binary { op, left, right } => {
                let op = *op;
                let left_ty = self.check_expr(env, left)?;
                let right_ty = self.check_expr(env, right)?;
                self.binary_type(env, op, left, right, &left_ty, &right_ty)?
            }

            ExprKind::Unary { op, value } => {
                let op = *op;
                self.check_expr(env, value)?;
                match op {
                    UnaryOp::Plus | UnaryOp::Minus => {
                        let kind = self.numeric_operand(env, value)?;
                        Type::Primitive(kind.promote_unary())
                    }
                    UnaryOp::Not => {
                        self.boolean_operand(env, value)?;
                        Type::Primitive(PrimitiveKind::Bool)
                    }
                    UnaryOp::Complement => {
                        let kind = self.integral_operand(env, value)?;
                        Type::Primitive(kind.promote_unary())
                    }
                }
            }
        };
        expr.ty = Some(ty.clone());
        Ok(ty)
    }

    /// The result type of a binary operator, with operand conversions
    /// inserted.
    fn binary_type(
        &self,
        env: &mut CompileEnv<'_>,
        op: BinaryOp,
        left: &mut Expr,
        right: &mut Expr,
        left_ty: &Type,
        right_ty: &Type,
    ) -> Result<Type, CheckError> {
        match op {
            BinaryOp::Add => {
                // addition with a textual side is concatenation, whatever
                // the other operand is
                if left_ty.is_textual() || right_ty.is_textual() {
                    Ok(Type::string())
                } else {
                    let kind = self.numeric_pair(env, left, right)?;
                    Ok(Type::Primitive(kind))
                }
            }
            BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div | BinaryOp::Rem => {
                let kind = self.numeric_pair(env, left, right)?;
                Ok(Type::Primitive(kind))
            }
            BinaryOp::ShiftLeft | BinaryOp::ShiftRight | BinaryOp::UnsignedShiftRight => {
                // the left operand picks int or long; the amount is an
                // ordinary integral operand read at int width
                let kind = self.integral_operand(env, left)?;
                self.integral_operand(env, right)?;
                Ok(Type::Primitive(kind.promote_unary()))
            }
            BinaryOp::Less | BinaryOp::LessEq | BinaryOp::Greater | BinaryOp::GreaterEq => {
                self.numeric_operand(env, left)?;
                self.numeric_operand(env, right)?;
                Ok(Type::Primitive(PrimitiveKind::Bool))
            }
            BinaryOp::Eq | BinaryOp::NotEq => {
                self.equality_operands(env, left, right, left_ty, right_ty)?;
                Ok(Type::Primitive(PrimitiveKind::Bool))
            }
            BinaryOp::BitAnd | BinaryOp::BitOr | BinaryOp::BitXor => {
                if self.is_boolean_like(left_ty) && self.is_boolean_like(right_ty) {
                    self.boolean_operand(env, left)?;
                    self.boolean_operand(env, right)?;
                    Ok(Type::Primitive(PrimitiveKind::Bool))
                } else {
                    let left_kind = self.integral_operand(env, left)?;
                    let right_kind = self.integral_operand(env, right)?;
                    Ok(Type::Primitive(left_kind.promote_binary(right_kind)))
                }
            }
            BinaryOp::And | BinaryOp::Or => {
                self.boolean_operand(env, left)?;
                self.boolean_operand(env, right)?;
                Ok(Type::Primitive(PrimitiveKind::Bool))
            }
        }
    }

    fn equality_operands(
        &self,
        env: &mut CompileEnv<'_>,
        left: &mut Expr,
        right: &mut Expr,
        left_ty: &Type,
        right_ty: &Type,
    ) -> Result<(), CheckError> {
        match (left_ty, right_ty) {
            (Type::Primitive(l), Type::Primitive(r)) => {
                let both_bool =
                    *l == PrimitiveKind::Bool && *r == PrimitiveKind::Bool;
                let both_numeric = l.is_numeric() && r.is_numeric();
                if both_bool || both_numeric {
                    Ok(())
                } else {
                    Err(CheckError::OperandType {
                        expected: "matching",
                        found: format!("{left_ty} and {right_ty}"),
                        span: left.span.merge(right.span),
                    })
                }
            }
            (l, r) if l.is_reference() && r.is_reference() => Ok(()),
            // a primitive against a reference needs the reference side
            // unboxed
            (Type::Primitive(kind), _) => {
                self.gate(javelin_core::Feature::Autoboxing, right.span)?;
                let unboxed = boxing::unbox(env, right)?;
                self.equality_kinds(*kind, unboxed, left, right)
            }
            (_, Type::Primitive(kind)) => {
                self.gate(javelin_core::Feature::Autoboxing, left.span)?;
                let unboxed = boxing::unbox(env, left)?;
                self.equality_kinds(unboxed, *kind, left, right)
            }
            _ => Err(CheckError::OperandType {
                expected: "matching",
                found: format!("{left_ty} and {right_ty}"),
                span: left.span.merge(right.span),
            }),
        }
    }

    fn equality_kinds(
        &self,
        left_kind: PrimitiveKind,
        right_kind: PrimitiveKind,
        left: &Expr,
        right: &Expr,
    ) -> Result<(), CheckError> {
        let both_bool =
            left_kind == PrimitiveKind::Bool && right_kind == PrimitiveKind::Bool;
        let both_numeric = left_kind.is_numeric() && right_kind.is_numeric();
        if both_bool || both_numeric {
            Ok(())
        } else {
            Err(CheckError::OperandType {
                expected: "matching",
                found: format!("{} and {}", left_kind.keyword(), right_kind.keyword()),
                span: left.span.merge(right.span),
            })
        }
    }

    /// Resolve a name target that denotes a class rather than a variable.
    fn class_reference(
        &self,
        env: &mut CompileEnv<'_>,
        target: &Expr,
    ) -> Result<Option<ClassName>, CheckError> {
        let ExprKind::Name(name) = &target.kind else {
            return Ok(None);
        };
        if env.ctx.lookup(name).is_some() {
            return Ok(None);
        }
        match ClassFinder::new(env).resolve(name, None) {
            Ok(resolution) => Ok(Some(resolution.into_name())),
            Err(CheckError::ClassNotFound { .. }) => Ok(None),
            Err(other) => Err(other),
        }
    }

    fn castable(
        &self,
        env: &mut CompileEnv<'_>,
        target: &Type,
        source: &Type,
    ) -> Result<bool, CheckError> {
        Ok(match (target, source) {
            (Type::Primitive(t), Type::Primitive(s)) => {
                (t.is_numeric() && s.is_numeric())
                    || (*t == PrimitiveKind::Bool && *s == PrimitiveKind::Bool)
            }
            (Type::Named(t), Type::Named(s)) => {
                t == s || reaches(env, s, t)? || reaches(env, t, s)?
            }
            (Type::Named(_), Type::Null) | (Type::Array(_), Type::Null) => true,
            (Type::Array(t), Type::Array(s)) => self.castable(env, t, s)?,
            (Type::Named(t), Type::Array(_)) | (Type::Array(_), Type::Named(t)) => {
                t.binary() == javelin_core::ty::OBJECT_CLASS
            }
            _ => false,
        })
    }

    fn is_boolean_like(&self, ty: &Type) -> bool {
        matches!(ty, Type::Primitive(PrimitiveKind::Bool))
            || ty.as_wrapper() == Some(javelin_core::WrapperKind::Boolean)
    }

    /// Read an operand as a numeric primitive, unboxing a numeric wrapper
    /// at the modern level.
    pub(crate) fn numeric_operand(
        &self,
        env: &mut CompileEnv<'_>,
        expr: &mut Expr,
    ) -> Result<PrimitiveKind, CheckError> {
        let ty = annotated(expr)?;
        match ty {
            Type::Primitive(kind) if kind.is_numeric() => Ok(kind),
            Type::Named(_) if ty_is_wrapper(expr) => {
                self.gate(javelin_core::Feature::Autoboxing, expr.span)?;
                let kind = boxing::unbox(env, expr)?;
                if kind.is_numeric() {
                    Ok(kind)
                } else {
                    Err(CheckError::OperandType {
                        expected: "numeric",
                        found: kind.keyword().into(),
                        span: expr.span,
                    })
                }
            }
            other => Err(CheckError::OperandType {
                expected: "numeric",
                found: other.to_string(),
                span: expr.span,
            }),
        }
    }

    /// Read an operand as an integral primitive.
    pub(crate) fn integral_operand(
        &self,
        env: &mut CompileEnv<'_>,
        expr: &mut Expr,
    ) -> Result<PrimitiveKind, CheckError> {
        let kind = self.numeric_operand(env, expr)?;
        if kind.is_integral() {
            Ok(kind)
        } else {
            Err(CheckError::OperandType {
                expected: "integral",
                found: kind.keyword().into(),
                span: expr.span,
            })
        }
    }

    /// Read an operand as a boolean, unboxing a boxed boolean at the
    /// modern level.
    pub(crate) fn boolean_operand(
        &self,
        env: &mut CompileEnv<'_>,
        expr: &mut Expr,
    ) -> Result<(), CheckError> {
        let ty = annotated(expr)?;
        match &ty {
            Type::Primitive(PrimitiveKind::Bool) => Ok(()),
            _ if ty.as_wrapper() == Some(javelin_core::WrapperKind::Boolean) => {
                self.gate(javelin_core::Feature::Autoboxing, expr.span)?;
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

    fn numeric_pair(
        &self,
        env: &mut CompileEnv<'_>,
        left: &mut Expr,
        right: &mut Expr,
    ) -> Result<PrimitiveKind, CheckError> {
        let left_kind = self.numeric_operand(env, left)?;
        let right_kind = self.numeric_operand(env, right)?;
        Ok(left_kind.promote_binary(right_kind))
    }
}

fn annotated(expr: &Expr) -> Result<Type, CheckError> {
    expr.ty.clone().ok_or_else(|| CheckError::Internal {
        detail: "operand left unannotated".into(),
    })
}

fn ty_is_wrapper(expr: &Expr) -> bool {
    expr.ty
        .as_ref()
        .is_some_and(|ty| ty.as_wrapper().is_some())
}
