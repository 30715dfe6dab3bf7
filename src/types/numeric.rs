// ABOUTME: Numeric handler — (Int,Int), (Int,Float), (Float,Float)

use super::Handler;
use crate::error::EvalError;
use crate::value::{OperandType, Value};
use std::cmp::Ordering;

pub struct NumericHandler;

const CLAIMS: &[(OperandType, OperandType)] = &[
    (OperandType::Int, OperandType::Int),
    (OperandType::Int, OperandType::Float),
    (OperandType::Float, OperandType::Float),
];

fn as_f64(v: &Value) -> f64 {
    v.as_f64().expect("caller guarantees numeric operand")
}

fn both_int<'a>(l: &'a Value, r: &'a Value) -> Option<(i64, i64)> {
    match (l, r) {
        (Value::Int(a), Value::Int(b)) => Some((*a, *b)),
        _ => None,
    }
}

impl Handler for NumericHandler {
    fn claims(&self) -> &'static [(OperandType, OperandType)] {
        CLAIMS
    }

    fn commutative(&self) -> bool {
        true
    }

    fn priority(&self) -> i32 {
        100
    }

    fn add(&self, l: &Value, r: &Value) -> Result<Value, EvalError> {
        if let Some((a, b)) = both_int(l, r) {
            return Ok(match a.checked_add(b) {
                Some(result) => Value::Int(result),
                None => Value::Float(a as f64 + b as f64),
            });
        }
        Ok(Value::Float(as_f64(l) + as_f64(r)))
    }

    fn subtract(&self, l: &Value, r: &Value) -> Result<Value, EvalError> {
        if let Some((a, b)) = both_int(l, r) {
            return Ok(match a.checked_sub(b) {
                Some(result) => Value::Int(result),
                None => Value::Float(a as f64 - b as f64),
            });
        }
        Ok(Value::Float(as_f64(l) - as_f64(r)))
    }

    fn multiply(&self, l: &Value, r: &Value) -> Result<Value, EvalError> {
        if let Some((a, b)) = both_int(l, r) {
            return Ok(match a.checked_mul(b) {
                Some(result) => Value::Int(result),
                None => Value::Float(a as f64 * b as f64),
            });
        }
        Ok(Value::Float(as_f64(l) * as_f64(r)))
    }

    fn divide(&self, l: &Value, r: &Value) -> Result<Value, EvalError> {
        let rv = as_f64(r);
        if rv == 0.0 {
            return Err(EvalError::numeric("/", "division by zero"));
        }
        Ok(Value::Float(as_f64(l) / rv))
    }

    fn modulo(&self, l: &Value, r: &Value) -> Result<Value, EvalError> {
        // Modulo is integer-only; float operands are truncated to Int.
        let a = as_f64(l).trunc() as i64;
        let b = as_f64(r).trunc() as i64;
        if b == 0 {
            return Err(EvalError::numeric("%", "modulo by zero"));
        }
        Ok(Value::Int(a % b))
    }

    fn equal(&self, l: &Value, r: &Value) -> Result<Value, EvalError> {
        Ok(Value::Bool(as_f64(l) == as_f64(r)))
    }

    fn compare(&self, l: &Value, r: &Value) -> Result<Ordering, EvalError> {
        as_f64(l)
            .partial_cmp(&as_f64(r))
            .ok_or_else(|| EvalError::numeric("compare", "NaN operand"))
    }
}

inventory::submit! { super::HandlerEntry(|| Box::new(NumericHandler)) }
