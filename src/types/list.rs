// ABOUTME: List handler — (List,List) concat, (List,Int) repetition bounded to 10,000 elements

use super::Handler;
use crate::error::EvalError;
use crate::value::{OperandType, Value};

pub struct ListHandler;

const CLAIMS: &[(OperandType, OperandType)] = &[
    (OperandType::List, OperandType::List),
    (OperandType::List, OperandType::Int),
];

const ELEMENT_CAP: usize = 10_000;

impl Handler for ListHandler {
    fn claims(&self) -> &'static [(OperandType, OperandType)] {
        CLAIMS
    }

    fn commutative(&self) -> bool {
        true
    }

    fn priority(&self) -> i32 {
        60
    }

    fn add(&self, l: &Value, r: &Value) -> Result<Value, EvalError> {
        match (l, r) {
            (Value::List(a), Value::List(b)) => {
                let mut out = a.clone();
                out.extend(b.iter().cloned());
                Ok(Value::List(out))
            }
            _ => Err(EvalError::type_mismatch("+", "list and list", "mixed operands", 1)),
        }
    }

    fn multiply(&self, l: &Value, r: &Value) -> Result<Value, EvalError> {
        let (items, count) = match (l, r) {
            (Value::List(items), Value::Int(n)) => (items, *n),
            (Value::Int(n), Value::List(items)) => (items, *n),
            _ => return Err(EvalError::type_mismatch("*", "list and int", "mixed operands", 1)),
        };
        if count < 0 {
            return Err(EvalError::numeric("*", "negative repetition count"));
        }
        let total = items.len().saturating_mul(count as usize);
        if total > ELEMENT_CAP {
            return Err(EvalError::numeric(
                "*",
                format!("repetition would produce {} elements, exceeding cap of {}", total, ELEMENT_CAP),
            ));
        }
        let mut out = Vec::with_capacity(total);
        for _ in 0..count {
            out.extend(items.iter().cloned());
        }
        Ok(Value::List(out))
    }

    fn equal(&self, l: &Value, r: &Value) -> Result<Value, EvalError> {
        match (l, r) {
            (Value::List(a), Value::List(b)) => Ok(Value::Bool(a == b)),
            _ => Ok(Value::Bool(false)),
        }
    }
}

inventory::submit! { super::HandlerEntry(|| Box::new(ListHandler)) }

#[cfg(test)]
mod tests {
    use super::*;

    fn list(items: &[i64]) -> Value {
        Value::List(items.iter().map(|i| Value::Int(*i)).collect())
    }

    #[test]
    fn test_concat() {
        let result = ListHandler.add(&list(&[1, 2]), &list(&[3, 4])).unwrap();
        assert_eq!(result, list(&[1, 2, 3, 4]));
    }

    #[test]
    fn test_repeat() {
        let result = ListHandler.multiply(&list(&[1, 2]), &Value::Int(3)).unwrap();
        assert_eq!(result, list(&[1, 2, 1, 2, 1, 2]));
    }

    #[test]
    fn test_repeat_over_cap_errors() {
        let big = Value::List(vec![Value::Int(0); 100]);
        assert!(ListHandler.multiply(&big, &Value::Int(200)).is_err());
    }

    #[test]
    fn test_ordered_equality() {
        assert_ne!(list(&[1, 2]), list(&[2, 1]));
        assert_eq!(
            ListHandler.equal(&list(&[1, 2]), &list(&[2, 1])).unwrap(),
            Value::Bool(false)
        );
    }
}
