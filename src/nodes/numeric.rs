//! Numeric helpers shared by arithmetic nodes.

use serde_json::{Number, Value};

use crate::error::ProcessError;

/// Reads `value` as a number, failing with a message naming `what`.
pub(crate) fn as_number<'a>(value: &'a Value, what: &str) -> Result<&'a Number, ProcessError> {
  match value {
    Value::Number(n) => Ok(n),
    other => Err(ProcessError::new(format!(
      "{} must be a number, got {}",
      what, other
    ))),
  }
}

/// Applies an integer op when both operands are integers and it does not overflow,
/// the float op otherwise.
pub(crate) fn combine(
  a: &Number,
  b: &Number,
  int_op: fn(i64, i64) -> Option<i64>,
  float_op: fn(f64, f64) -> f64,
) -> Result<Value, ProcessError> {
  if let (Some(x), Some(y)) = (a.as_i64(), b.as_i64())
    && let Some(r) = int_op(x, y)
  {
    return Ok(Value::from(r));
  }
  let (x, y) = match (a.as_f64(), b.as_f64()) {
    (Some(x), Some(y)) => (x, y),
    _ => return Err(ProcessError::new("operand is not representable as f64")),
  };
  Number::from_f64(float_op(x, y))
    .map(Value::Number)
    .ok_or_else(|| ProcessError::new("result is not a finite number"))
}
