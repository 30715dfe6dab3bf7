// ABOUTME: String handler — (String,String) concat/compare, (String,Int) repetition

use super::Handler;
use crate::error::EvalError;
use crate::value::{OperandType, Value};
use std::cmp::Ordering;

pub struct StringHandler;

const CLAIMS: &[(OperandType, OperandType)] = &[
    (OperandType::String, OperandType::String),
    (OperandType::String, OperandType::Int),
];

const REPEAT_CAP: i64 = 10_000;

fn repeat(s: &str, count: i64, op: &str) -> Result<Value, EvalError> {
    if count < 0 {
        return Err(EvalError::numeric(op, "negative repetition count"));
    }
    if count > REPEAT_CAP {
        return Err(EvalError::numeric(
            op,
            format!("repetition count {} exceeds cap of {}", count, REPEAT_CAP),
        ));
    }
    Ok(Value::String(s.repeat(count as usize)))
}

impl Handler for StringHandler {
    fn claims(&self) -> &'static [(OperandType, OperandType)] {
        CLAIMS
    }

    fn commutative(&self) -> bool {
        // String * Int and Int * String are both repetition; concatenation
        // (String + String) is not commutative and never claims (Int, String).
        true
    }

    fn priority(&self) -> i32 {
        90
    }

    fn add(&self, l: &Value, r: &Value) -> Result<Value, EvalError> {
        match (l, r) {
            (Value::String(a), Value::String(b)) => Ok(Value::String(format!("{}{}", a, b))),
            _ => Err(EvalError::type_mismatch("+", "string and string", "mixed operands", 1)),
        }
    }

    fn multiply(&self, l: &Value, r: &Value) -> Result<Value, EvalError> {
        match (l, r) {
            (Value::String(s), Value::Int(n)) => repeat(s, *n, "*"),
            (Value::Int(n), Value::String(s)) => repeat(s, *n, "*"),
            _ => Err(EvalError::type_mismatch("*", "string and int", "mixed operands", 1)),
        }
    }

    fn equal(&self, l: &Value, r: &Value) -> Result<Value, EvalError> {
        match (l, r) {
            (Value::String(a), Value::String(b)) => Ok(Value::Bool(a == b)),
            _ => Ok(Value::Bool(false)),
        }
    }

    fn compare(&self, l: &Value, r: &Value) -> Result<Ordering, EvalError> {
        match (l, r) {
            (Value::String(a), Value::String(b)) => Ok(a.cmp(b)),
            _ => Err(EvalError::type_mismatch("compare", "string and string", "mixed operands", 1)),
        }
    }
}

inventory::submit! { super::HandlerEntry(|| Box::new(StringHandler)) }
