//! Evaluation semantics for primitive operators.
//!
//! Stateless, pure functions implementing the arithmetic, relational,
//! equality, bitwise, and shift rules of the language, plus the primitive
//! assignment-compatibility tables. Every function is parameterized by the
//! statically determined result type the checker wrote into the operator
//! node; the functions never re-derive it from the operand values.
//!
//! Rules:
//! - A char operand always reads as its code point before arithmetic.
//! - The result representation of a numeric operator is the narrowest of
//!   double > float > long > int no narrower than the operands, default int
//!   (see [`PrimitiveKind::promote_binary`]).
//! - Addition with a textual result type concatenates, whatever the operand
//!   runtime types are.
//! - Relational and equality comparison on non-boolean operands happens at
//!   double width.
//! - Shift amounts are always read at int width, then masked to the result
//!   width, regardless of the left operand.
//! - Integral arithmetic wraps; integral division and remainder by zero are
//!   reported, floating-point division follows IEEE.

use thiserror::Error;

use crate::primitive::PrimitiveKind;
use crate::ty::Type;
use crate::value::Value;

/// Failure of a semantics function.
///
/// These indicate a disagreement between the checker's annotations and the
/// values that arrived at evaluation, or an arithmetic fault.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NumericError {
    /// An operand had no numeric interpretation.
    #[error("operand `{0}` has no numeric interpretation")]
    NotNumeric(String),

    /// An operand was not a boolean.
    #[error("operand `{0}` is not a boolean")]
    NotBoolean(String),

    /// The declared result type cannot carry the operator's result.
    #[error("result type {0} is not valid for operator `{1}`")]
    BadResultType(&'static str, &'static str),

    /// Integral division or remainder by zero.
    #[error("division by zero")]
    DivisionByZero,
}

fn int_of(value: &Value) -> Result<i32, NumericError> {
    value
        .to_i32()
        .ok_or_else(|| NumericError::NotNumeric(value.to_string()))
}

fn long_of(value: &Value) -> Result<i64, NumericError> {
    value
        .to_i64()
        .ok_or_else(|| NumericError::NotNumeric(value.to_string()))
}

fn f32_of(value: &Value) -> Result<f32, NumericError> {
    value
        .to_f32()
        .ok_or_else(|| NumericError::NotNumeric(value.to_string()))
}

fn f64_of(value: &Value) -> Result<f64, NumericError> {
    value
        .to_f64()
        .ok_or_else(|| NumericError::NotNumeric(value.to_string()))
}

fn bool_of(value: &Value) -> Result<bool, NumericError> {
    value
        .to_bool()
        .ok_or_else(|| NumericError::NotBoolean(value.to_string()))
}

fn arith(
    kind: PrimitiveKind,
    symbol: &'static str,
    left: &Value,
    right: &Value,
    on_int: fn(i32, i32) -> i32,
    on_long: fn(i64, i64) -> i64,
    on_f32: fn(f32, f32) -> f32,
    on_f64: fn(f64, f64) -> f64,
) -> Result<Value, NumericError> {
    match kind {
        PrimitiveKind::Int => Ok(Value::Int(on_int(int_of(left)?, int_of(right)?))),
        PrimitiveKind::Long => Ok(Value::Long(on_long(long_of(left)?, long_of(right)?))),
        PrimitiveKind::Float => Ok(Value::Float(on_f32(f32_of(left)?, f32_of(right)?))),
        PrimitiveKind::Double => Ok(Value::Double(on_f64(f64_of(left)?, f64_of(right)?))),
        other => Err(NumericError::BadResultType(other.keyword(), symbol)),
    }
}

// ============================================================================
// Arithmetic
// ============================================================================

/// Addition, overloaded on the declared result type.
///
/// A textual result type concatenates the operands' textual renderings; any
/// other result type performs numeric addition under the promotion ladder.
pub fn add(result: &Type, left: &Value, right: &Value) -> Result<Value, NumericError> {
    if result.is_textual() {
        return Ok(Value::Str(format!("{left}{right}")));
    }
    let kind = result
        .as_primitive()
        .ok_or(NumericError::BadResultType("reference", "+"))?;
    arith(
        kind,
        "+",
        left,
        right,
        i32::wrapping_add,
        i64::wrapping_add,
        |a, b| a + b,
        |a, b| a + b,
    )
}

/// Subtraction under the promotion ladder.
pub fn sub(result: PrimitiveKind, left: &Value, right: &Value) -> Result<Value, NumericError> {
    arith(
        result,
        "-",
        left,
        right,
        i32::wrapping_sub,
        i64::wrapping_sub,
        |a, b| a - b,
        |a, b| a - b,
    )
}

/// Multiplication under the promotion ladder.
pub fn mul(result: PrimitiveKind, left: &Value, right: &Value) -> Result<Value, NumericError> {
    arith(
        result,
        "*",
        left,
        right,
        i32::wrapping_mul,
        i64::wrapping_mul,
        |a, b| a * b,
        |a, b| a * b,
    )
}

/// Division. Integral division by zero is an error; floating-point
/// division follows IEEE.
pub fn div(result: PrimitiveKind, left: &Value, right: &Value) -> Result<Value, NumericError> {
    match result {
        PrimitiveKind::Int => {
            let divisor = int_of(right)?;
            if divisor == 0 {
                return Err(NumericError::DivisionByZero);
            }
            Ok(Value::Int(int_of(left)?.wrapping_div(divisor)))
        }
        PrimitiveKind::Long => {
            let divisor = long_of(right)?;
            if divisor == 0 {
                return Err(NumericError::DivisionByZero);
            }
            Ok(Value::Long(long_of(left)?.wrapping_div(divisor)))
        }
        PrimitiveKind::Float => Ok(Value::Float(f32_of(left)? / f32_of(right)?)),
        PrimitiveKind::Double => Ok(Value::Double(f64_of(left)? / f64_of(right)?)),
        other => Err(NumericError::BadResultType(other.keyword(), "/")),
    }
}

/// Remainder. Integral remainder by zero is an error.
pub fn rem(result: PrimitiveKind, left: &Value, right: &Value) -> Result<Value, NumericError> {
    match result {
        PrimitiveKind::Int => {
            let divisor = int_of(right)?;
            if divisor == 0 {
                return Err(NumericError::DivisionByZero);
            }
            Ok(Value::Int(int_of(left)?.wrapping_rem(divisor)))
        }
        PrimitiveKind::Long => {
            let divisor = long_of(right)?;
            if divisor == 0 {
                return Err(NumericError::DivisionByZero);
            }
            Ok(Value::Long(long_of(left)?.wrapping_rem(divisor)))
        }
        PrimitiveKind::Float => Ok(Value::Float(f32_of(left)? % f32_of(right)?)),
        PrimitiveKind::Double => Ok(Value::Double(f64_of(left)? % f64_of(right)?)),
        other => Err(NumericError::BadResultType(other.keyword(), "%")),
    }
}

/// Unary minus.
pub fn minus(result: PrimitiveKind, value: &Value) -> Result<Value, NumericError> {
    match result {
        PrimitiveKind::Int => Ok(Value::Int(int_of(value)?.wrapping_neg())),
        PrimitiveKind::Long => Ok(Value::Long(long_of(value)?.wrapping_neg())),
        PrimitiveKind::Float => Ok(Value::Float(-f32_of(value)?)),
        PrimitiveKind::Double => Ok(Value::Double(-f64_of(value)?)),
        other => Err(NumericError::BadResultType(other.keyword(), "-")),
    }
}

/// Unary plus: the operand read at the promoted width.
pub fn plus(result: PrimitiveKind, value: &Value) -> Result<Value, NumericError> {
    match result {
        PrimitiveKind::Int => Ok(Value::Int(int_of(value)?)),
        PrimitiveKind::Long => Ok(Value::Long(long_of(value)?)),
        PrimitiveKind::Float => Ok(Value::Float(f32_of(value)?)),
        PrimitiveKind::Double => Ok(Value::Double(f64_of(value)?)),
        other => Err(NumericError::BadResultType(other.keyword(), "+")),
    }
}

/// Bitwise complement on int or long.
pub fn complement(result: PrimitiveKind, value: &Value) -> Result<Value, NumericError> {
    match result {
        PrimitiveKind::Int => Ok(Value::Int(!int_of(value)?)),
        PrimitiveKind::Long => Ok(Value::Long(!long_of(value)?)),
        other => Err(NumericError::BadResultType(other.keyword(), "~")),
    }
}

/// Logical negation.
pub fn not(value: &Value) -> Result<Value, NumericError> {
    Ok(Value::Bool(!bool_of(value)?))
}

// ============================================================================
// Equality and relational
// ============================================================================

/// Equality: booleans compare directly, everything else at double width
/// with chars read as code points.
pub fn equals(left: &Value, right: &Value) -> Result<Value, NumericError> {
    match (left, right) {
        (Value::Bool(a), Value::Bool(b)) => Ok(Value::Bool(a == b)),
        _ => Ok(Value::Bool(f64_of(left)? == f64_of(right)?)),
    }
}

/// Inequality; see [`equals`].
pub fn not_equals(left: &Value, right: &Value) -> Result<Value, NumericError> {
    match (left, right) {
        (Value::Bool(a), Value::Bool(b)) => Ok(Value::Bool(a != b)),
        _ => Ok(Value::Bool(f64_of(left)? != f64_of(right)?)),
    }
}

fn compare(
    left: &Value,
    right: &Value,
    test: fn(f64, f64) -> bool,
) -> Result<Value, NumericError> {
    Ok(Value::Bool(test(f64_of(left)?, f64_of(right)?)))
}

/// `<` at double width.
pub fn less_than(left: &Value, right: &Value) -> Result<Value, NumericError> {
    compare(left, right, |a, b| a < b)
}

/// `<=` at double width.
pub fn less_or_equal(left: &Value, right: &Value) -> Result<Value, NumericError> {
    compare(left, right, |a, b| a <= b)
}

/// `>` at double width.
pub fn greater_than(left: &Value, right: &Value) -> Result<Value, NumericError> {
    compare(left, right, |a, b| a > b)
}

/// `>=` at double width.
pub fn greater_or_equal(left: &Value, right: &Value) -> Result<Value, NumericError> {
    compare(left, right, |a, b| a >= b)
}

// ============================================================================
// Bitwise
// ============================================================================

fn bitwise(
    result: PrimitiveKind,
    symbol: &'static str,
    left: &Value,
    right: &Value,
    on_bool: fn(bool, bool) -> bool,
    on_int: fn(i32, i32) -> i32,
    on_long: fn(i64, i64) -> i64,
) -> Result<Value, NumericError> {
    match result {
        PrimitiveKind::Bool => Ok(Value::Bool(on_bool(bool_of(left)?, bool_of(right)?))),
        PrimitiveKind::Int => Ok(Value::Int(on_int(int_of(left)?, int_of(right)?))),
        PrimitiveKind::Long => Ok(Value::Long(on_long(long_of(left)?, long_of(right)?))),
        other => Err(NumericError::BadResultType(other.keyword(), symbol)),
    }
}

/// `&`: logical on booleans, bitwise on int/long.
pub fn bit_and(result: PrimitiveKind, left: &Value, right: &Value) -> Result<Value, NumericError> {
    bitwise(result, "&", left, right, |a, b| a & b, |a, b| a & b, |a, b| a & b)
}

/// `|`: logical on booleans, bitwise on int/long.
pub fn bit_or(result: PrimitiveKind, left: &Value, right: &Value) -> Result<Value, NumericError> {
    bitwise(result, "|", left, right, |a, b| a | b, |a, b| a | b, |a, b| a | b)
}

/// `^`: logical on booleans, bitwise on int/long.
pub fn bit_xor(result: PrimitiveKind, left: &Value, right: &Value) -> Result<Value, NumericError> {
    bitwise(result, "^", left, right, |a, b| a ^ b, |a, b| a ^ b, |a, b| a ^ b)
}

// ============================================================================
// Shifts
// ============================================================================

/// `<<`: the amount is read at int width and masked to the result width.
pub fn shift_left(result: PrimitiveKind, left: &Value, right: &Value) -> Result<Value, NumericError> {
    let amount = int_of(right)? as u32;
    match result {
        PrimitiveKind::Int => Ok(Value::Int(int_of(left)?.wrapping_shl(amount))),
        PrimitiveKind::Long => Ok(Value::Long(long_of(left)?.wrapping_shl(amount))),
        other => Err(NumericError::BadResultType(other.keyword(), "<<")),
    }
}

/// `>>` (arithmetic): the amount is read at int width and masked to the
/// result width.
pub fn shift_right(result: PrimitiveKind, left: &Value, right: &Value) -> Result<Value, NumericError> {
    let amount = int_of(right)? as u32;
    match result {
        PrimitiveKind::Int => Ok(Value::Int(int_of(left)?.wrapping_shr(amount))),
        PrimitiveKind::Long => Ok(Value::Long(long_of(left)?.wrapping_shr(amount))),
        other => Err(NumericError::BadResultType(other.keyword(), ">>")),
    }
}

/// `>>>` (logical): zero-filling shift on the unsigned reinterpretation.
pub fn unsigned_shift_right(
    result: PrimitiveKind,
    left: &Value,
    right: &Value,
) -> Result<Value, NumericError> {
    let amount = int_of(right)? as u32;
    match result {
        PrimitiveKind::Int => Ok(Value::Int(
            (int_of(left)? as u32).wrapping_shr(amount) as i32,
        )),
        PrimitiveKind::Long => Ok(Value::Long(
            (long_of(left)? as u64).wrapping_shr(amount) as i64,
        )),
        other => Err(NumericError::BadResultType(other.keyword(), ">>>")),
    }
}

// ============================================================================
// Assignment compatibility
// ============================================================================

/// Whether `source` is assignable to `target` by identity or widening.
pub fn primitive_assignable(target: PrimitiveKind, source: PrimitiveKind) -> bool {
    target == source || source.widens_to(target)
}

/// Whether the int value `v` survives a round trip through narrowing to
/// `target`. Wider-than-int targets always accept an int.
pub fn int_fits(target: PrimitiveKind, v: i32) -> bool {
    match target {
        PrimitiveKind::Bool => false,
        PrimitiveKind::Byte => i8::try_from(v).is_ok(),
        PrimitiveKind::Short => i16::try_from(v).is_ok(),
        PrimitiveKind::Char => u16::try_from(v).is_ok(),
        PrimitiveKind::Int
        | PrimitiveKind::Long
        | PrimitiveKind::Float
        | PrimitiveKind::Double => true,
    }
}

/// Whether `value` is a valid assignment source for a `target` primitive:
/// identity, widening, or — for int-width values only — a round trip
/// through narrowing that preserves the value.
pub fn value_assignable(target: PrimitiveKind, value: &Value) -> bool {
    let Some(kind) = value.primitive_kind() else {
        return false;
    };
    if primitive_assignable(target, kind) {
        return true;
    }
    if kind == PrimitiveKind::Int {
        if let Some(v) = value.to_i32() {
            return int_fits(target, v);
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitive::PrimitiveKind::*;

    // =========================================================================
    // Arithmetic
    // =========================================================================

    #[test]
    fn add_widens_char_to_code_point() {
        let result = add(&Type::Primitive(Int), &Value::Char('a'), &Value::Int(1));
        assert_eq!(result, Ok(Value::Int(98)));
    }

    #[test]
    fn add_concatenates_on_textual_result() {
        let result = add(&Type::string(), &Value::Int(5), &Value::Str("x".into()));
        assert_eq!(result, Ok(Value::Str("5x".into())));
    }

    #[test]
    fn add_concatenates_regardless_of_operand_types() {
        let result = add(&Type::string(), &Value::Null, &Value::Double(1.5));
        assert_eq!(result, Ok(Value::Str("null1.5".into())));
    }

    #[test]
    fn int_arithmetic_wraps() {
        let result = add(&Type::Primitive(Int), &Value::Int(i32::MAX), &Value::Int(1));
        assert_eq!(result, Ok(Value::Int(i32::MIN)));
        assert_eq!(
            mul(Int, &Value::Int(i32::MIN), &Value::Int(-1)),
            Ok(Value::Int(i32::MIN))
        );
    }

    #[test]
    fn long_result_reads_operands_at_long_width() {
        let result = sub(Long, &Value::Int(1), &Value::Long(2));
        assert_eq!(result, Ok(Value::Long(-1)));
    }

    #[test]
    fn integral_division_by_zero_is_reported() {
        assert_eq!(
            div(Int, &Value::Int(1), &Value::Int(0)),
            Err(NumericError::DivisionByZero)
        );
        assert_eq!(
            rem(Long, &Value::Long(1), &Value::Long(0)),
            Err(NumericError::DivisionByZero)
        );
    }

    #[test]
    fn float_division_by_zero_is_infinite() {
        let result = div(Double, &Value::Double(1.0), &Value::Double(0.0));
        assert_eq!(result, Ok(Value::Double(f64::INFINITY)));
    }

    #[test]
    fn narrow_result_type_is_rejected() {
        assert_eq!(
            add(&Type::Primitive(Short), &Value::Int(1), &Value::Int(2)),
            Err(NumericError::BadResultType("short", "+"))
        );
    }

    #[test]
    fn non_numeric_operand_is_reported() {
        let result = add(&Type::Primitive(Int), &Value::Str("x".into()), &Value::Int(1));
        assert_eq!(result, Err(NumericError::NotNumeric("x".into())));
    }

    #[test]
    fn unary_minus_and_complement() {
        assert_eq!(minus(Int, &Value::Char('a')), Ok(Value::Int(-97)));
        assert_eq!(minus(Double, &Value::Double(1.5)), Ok(Value::Double(-1.5)));
        assert_eq!(complement(Int, &Value::Int(0)), Ok(Value::Int(-1)));
        assert_eq!(
            complement(Double, &Value::Double(0.0)),
            Err(NumericError::BadResultType("double", "~"))
        );
        assert_eq!(not(&Value::Bool(true)), Ok(Value::Bool(false)));
    }

    // =========================================================================
    // Equality and relational
    // =========================================================================

    #[test]
    fn booleans_compare_directly() {
        assert_eq!(
            equals(&Value::Bool(true), &Value::Bool(true)),
            Ok(Value::Bool(true))
        );
        assert_eq!(
            not_equals(&Value::Bool(true), &Value::Bool(false)),
            Ok(Value::Bool(true))
        );
    }

    #[test]
    fn numeric_equality_happens_at_double_width() {
        assert_eq!(equals(&Value::Int(1), &Value::Double(1.0)), Ok(Value::Bool(true)));
        assert_eq!(equals(&Value::Char('a'), &Value::Int(97)), Ok(Value::Bool(true)));
    }

    #[test]
    fn relational_widens_chars() {
        assert_eq!(less_than(&Value::Char('a'), &Value::Char('b')), Ok(Value::Bool(true)));
        assert_eq!(
            greater_or_equal(&Value::Long(2), &Value::Int(2)),
            Ok(Value::Bool(true))
        );
    }

    #[test]
    fn relational_rejects_booleans() {
        assert!(less_than(&Value::Bool(true), &Value::Int(1)).is_err());
    }

    // =========================================================================
    // Bitwise and shifts
    // =========================================================================

    #[test]
    fn boolean_operands_use_logical_ops() {
        assert_eq!(
            bit_and(Bool, &Value::Bool(true), &Value::Bool(false)),
            Ok(Value::Bool(false))
        );
        assert_eq!(
            bit_xor(Bool, &Value::Bool(true), &Value::Bool(false)),
            Ok(Value::Bool(true))
        );
    }

    #[test]
    fn bitwise_on_int_and_long() {
        assert_eq!(bit_or(Int, &Value::Int(5), &Value::Int(2)), Ok(Value::Int(7)));
        assert_eq!(
            bit_and(Long, &Value::Long(0xF0), &Value::Long(0x3C)),
            Ok(Value::Long(0x30))
        );
    }

    #[test]
    fn unsigned_shift_right_zero_fills() {
        let result = unsigned_shift_right(Int, &Value::Int(-1), &Value::Int(1));
        assert_eq!(result, Ok(Value::Int(2147483647)));
        let result = unsigned_shift_right(Long, &Value::Long(-1), &Value::Int(1));
        assert_eq!(result, Ok(Value::Long(i64::MAX)));
    }

    #[test]
    fn shift_amounts_are_masked_to_result_width() {
        assert_eq!(shift_left(Int, &Value::Int(1), &Value::Int(33)), Ok(Value::Int(2)));
        assert_eq!(
            shift_left(Long, &Value::Long(1), &Value::Int(65)),
            Ok(Value::Long(2))
        );
        assert_eq!(shift_right(Int, &Value::Int(-4), &Value::Int(1)), Ok(Value::Int(-2)));
    }

    #[test]
    fn shift_amount_is_always_int() {
        // a long amount reads at int width
        let result = shift_left(Int, &Value::Int(1), &Value::Long(1));
        assert_eq!(result, Ok(Value::Int(2)));
    }

    // =========================================================================
    // Assignment compatibility
    // =========================================================================

    #[test]
    fn widening_assignments() {
        assert!(primitive_assignable(Int, Char));
        assert!(primitive_assignable(Double, Float));
        assert!(primitive_assignable(Long, Long));
        assert!(!primitive_assignable(Int, Long));
        assert!(!primitive_assignable(Short, Char));
    }

    #[test]
    fn int_value_round_trips_into_narrow_targets() {
        assert!(value_assignable(Byte, &Value::Int(127)));
        assert!(!value_assignable(Byte, &Value::Int(128)));
        assert!(value_assignable(Char, &Value::Int(65535)));
        assert!(!value_assignable(Char, &Value::Int(-1)));
        assert!(value_assignable(Short, &Value::Int(-32768)));
        assert!(!value_assignable(Short, &Value::Int(32768)));
    }

    #[test]
    fn only_int_values_use_the_round_trip_rule() {
        // a long value never narrows by assignment, even when it would fit
        assert!(!value_assignable(Byte, &Value::Long(1)));
        assert!(value_assignable(Long, &Value::Int(5)));
        assert!(!value_assignable(Byte, &Value::Str("1".into())));
    }
}
