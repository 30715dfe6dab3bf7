// ABOUTME: Mixed-type fallback handler — null-safe arithmetic, cross-type numeric equality,
// ABOUTME: lexicographic fallback ordering over canonical string forms

use super::Handler;
use crate::error::EvalError;
use crate::value::{OperandType, Value};
use std::cmp::Ordering;

pub struct MixedHandler;

const CLAIMS: &[(OperandType, OperandType)] = &[(OperandType::Unknown, OperandType::Unknown)];

impl Handler for MixedHandler {
    fn claims(&self) -> &'static [(OperandType, OperandType)] {
        // Never actually matched by name — `TypeRegistry::find` reaches this
        // handler only through the `priority() == i32::MIN` fallback path.
        CLAIMS
    }

    fn priority(&self) -> i32 {
        i32::MIN
    }

    fn add(&self, l: &Value, r: &Value) -> Result<Value, EvalError> {
        match (l, r) {
            (Value::Null, _) => Ok(r.clone()),
            (_, Value::Null) => Ok(l.clone()),
            (Value::Null, Value::Null) => Ok(Value::Null),
            _ => {
                if let (Some(a), Some(b)) = (l.as_f64(), r.as_f64()) {
                    Ok(Value::Float(a + b))
                } else {
                    Err(EvalError::type_mismatch(
                        "+",
                        "a supported operand pair",
                        &format!("{} and {}", l.type_name(), r.type_name()),
                        1,
                    ))
                }
            }
        }
    }

    fn subtract(&self, l: &Value, r: &Value) -> Result<Value, EvalError> {
        match (l, r) {
            (Value::Null, _) => match r.as_f64() {
                Some(b) => Ok(Value::Float(-b)),
                None => Err(EvalError::type_mismatch("-", "numeric", r.type_name().as_str(), 1)),
            },
            (_, Value::Null) => Ok(l.clone()),
            _ => {
                if let (Some(a), Some(b)) = (l.as_f64(), r.as_f64()) {
                    Ok(Value::Float(a - b))
                } else {
                    Err(EvalError::type_mismatch(
                        "-",
                        "a supported operand pair",
                        &format!("{} and {}", l.type_name(), r.type_name()),
                        1,
                    ))
                }
            }
        }
    }

    fn multiply(&self, l: &Value, r: &Value) -> Result<Value, EvalError> {
        match (l, r) {
            (Value::Null, _) | (_, Value::Null) => Ok(Value::Null),
            _ => {
                if let (Some(a), Some(b)) = (l.as_f64(), r.as_f64()) {
                    Ok(Value::Float(a * b))
                } else {
                    Err(EvalError::type_mismatch(
                        "*",
                        "a supported operand pair",
                        &format!("{} and {}", l.type_name(), r.type_name()),
                        1,
                    ))
                }
            }
        }
    }

    fn divide(&self, l: &Value, r: &Value) -> Result<Value, EvalError> {
        match (l, r) {
            (_, Value::Null) => Err(EvalError::numeric("/", "division by null")),
            (Value::Null, _) => Ok(Value::Null),
            _ => {
                if let (Some(a), Some(b)) = (l.as_f64(), r.as_f64()) {
                    if b == 0.0 {
                        return Err(EvalError::numeric("/", "division by zero"));
                    }
                    Ok(Value::Float(a / b))
                } else {
                    Err(EvalError::type_mismatch(
                        "/",
                        "a supported operand pair",
                        &format!("{} and {}", l.type_name(), r.type_name()),
                        1,
                    ))
                }
            }
        }
    }

    fn modulo(&self, l: &Value, r: &Value) -> Result<Value, EvalError> {
        if let (Some(a), Some(b)) = (l.as_f64(), r.as_f64()) {
            let b = b.trunc() as i64;
            if b == 0 {
                return Err(EvalError::numeric("%", "modulo by zero"));
            }
            Ok(Value::Int(a.trunc() as i64 % b))
        } else {
            Err(EvalError::type_mismatch(
                "%",
                "a supported operand pair",
                &format!("{} and {}", l.type_name(), r.type_name()),
                1,
            ))
        }
    }

    fn equal(&self, l: &Value, r: &Value) -> Result<Value, EvalError> {
        if let (Some(a), Some(b)) = (l.as_f64(), r.as_f64()) {
            return Ok(Value::Bool(a == b));
        }
        Ok(Value::Bool(l == r))
    }

    fn compare(&self, l: &Value, r: &Value) -> Result<Ordering, EvalError> {
        if let (Some(a), Some(b)) = (l.as_f64(), r.as_f64()) {
            return a
                .partial_cmp(&b)
                .ok_or_else(|| EvalError::numeric("compare", "NaN operand"));
        }
        match (canonical_string(l), canonical_string(r)) {
            (Some(a), Some(b)) => Ok(a.cmp(&b)),
            _ => Err(EvalError::type_mismatch(
                "compare",
                "a stringifiable operand pair",
                &format!("{} and {}", l.type_name(), r.type_name()),
                1,
            )),
        }
    }
}

/// The canonical string form used for the fallback lexicographic ordering.
/// Only scalars are stringifiable this way; maps/lists return `None` so
/// `compare` can surface `not-supported` for them.
fn canonical_string(v: &Value) -> Option<String> {
    match v {
        Value::Map(_) | Value::List(_) => None,
        other => Some(other.to_string()),
    }
}

inventory::submit! { super::HandlerEntry(|| Box::new(MixedHandler)) }
