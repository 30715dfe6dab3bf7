// ABOUTME: Boolean handler — (Bool, *): Add is OR, Multiply is AND, false < true

use super::Handler;
use crate::error::EvalError;
use crate::value::{truthy, OperandType, Value};
use std::cmp::Ordering;

pub struct BooleanHandler;

const CLAIMS: &[(OperandType, OperandType)] = &[(OperandType::Bool, OperandType::Bool)];

impl Handler for BooleanHandler {
    fn claims(&self) -> &'static [(OperandType, OperandType)] {
        CLAIMS
    }

    fn commutative(&self) -> bool {
        true
    }

    fn priority(&self) -> i32 {
        80
    }

    fn add(&self, l: &Value, r: &Value) -> Result<Value, EvalError> {
        Ok(Value::Bool(truthy(l) || truthy(r)))
    }

    fn multiply(&self, l: &Value, r: &Value) -> Result<Value, EvalError> {
        Ok(Value::Bool(truthy(l) && truthy(r)))
    }

    fn equal(&self, l: &Value, r: &Value) -> Result<Value, EvalError> {
        match (l, r) {
            (Value::Bool(a), Value::Bool(b)) => Ok(Value::Bool(a == b)),
            _ => Ok(Value::Bool(false)),
        }
    }

    fn compare(&self, l: &Value, r: &Value) -> Result<Ordering, EvalError> {
        match (l, r) {
            (Value::Bool(a), Value::Bool(b)) => Ok(a.cmp(b)),
            _ => Err(EvalError::type_mismatch("compare", "bool and bool", "mixed operands", 1)),
        }
    }
}

inventory::submit! { super::HandlerEntry(|| Box::new(BooleanHandler)) }
