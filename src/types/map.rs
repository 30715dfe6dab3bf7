// ABOUTME: Map handler — (Map, Map): shallow merge on Add, deep equality, no ordering

use super::Handler;
use crate::error::EvalError;
use crate::value::{OperandType, Value};

pub struct MapHandler;

const CLAIMS: &[(OperandType, OperandType)] = &[(OperandType::Map, OperandType::Map)];

impl Handler for MapHandler {
    fn claims(&self) -> &'static [(OperandType, OperandType)] {
        CLAIMS
    }

    fn priority(&self) -> i32 {
        70
    }

    fn add(&self, l: &Value, r: &Value) -> Result<Value, EvalError> {
        match (l, r) {
            (Value::Map(a), Value::Map(b)) => {
                let mut merged = a.clone();
                for (k, v) in b {
                    merged.insert(k.clone(), v.clone());
                }
                Ok(Value::Map(merged))
            }
            _ => Err(EvalError::type_mismatch("+", "map and map", "mixed operands", 1)),
        }
    }

    fn equal(&self, l: &Value, r: &Value) -> Result<Value, EvalError> {
        // `Value`'s `PartialEq` for `Map` is already order-independent deep equality.
        Ok(Value::Bool(l == r))
    }
}

inventory::submit! { super::HandlerEntry(|| Box::new(MapHandler)) }
