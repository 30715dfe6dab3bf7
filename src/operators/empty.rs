// ABOUTME: empty — returns an empty value of a named type, or tests whether the arg is empty

use crate::error::EvalError;
use crate::evaluator::Evaluator;
use crate::expr::Expression;
use crate::operators::{resolve_arg, Response};
use crate::value::Value;
use graft_macros::operator;

/// Whether `v` counts as empty: null, `""`, `[]`, `{}`, `0`, or `false`.
fn is_empty_value(v: &Value) -> bool {
    match v {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::List(items) => items.is_empty(),
        Value::Map(m) => m.is_empty(),
        Value::Int(n) => *n == 0,
        Value::Float(f) => *f == 0.0,
        Value::Bool(b) => !*b,
    }
}

/// If the argument is a string naming a type (`hash`/`map`, `array`/`list`,
/// `string`), returns an empty value of that type; otherwise returns whether
/// the argument's value is empty.
#[operator(name = "empty", phase = "Eval")]
pub fn empty(ev: &mut Evaluator, args: &[Expression]) -> Result<Response, EvalError> {
    if args.len() != 1 {
        return Err(EvalError::arity_error("empty", "1", args.len()));
    }
    let v = resolve_arg(ev, &args[0])?;
    if let Value::String(ref s) = v {
        match s.as_str() {
            "hash" | "map" => return Ok(Response::replace(Value::Map(Default::default()))),
            "array" | "list" => return Ok(Response::replace(Value::List(Vec::new()))),
            "string" => return Ok(Response::replace(Value::String(String::new()))),
            _ => {}
        }
    }
    Ok(Response::replace(Value::Bool(is_empty_value(&v))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::BackendRegistry;
    use crate::operators::OperatorRegistry;
    use crate::types::TypeRegistry;
    use std::sync::Arc;

    fn evaluator() -> Evaluator {
        Evaluator::new(
            Value::Null,
            Arc::new(OperatorRegistry::new()),
            Arc::new(TypeRegistry::new()),
            Arc::new(BackendRegistry::new()),
        )
    }

    #[test]
    fn test_empty_type_name_returns_empty_value() {
        let mut ev = evaluator();
        let args = vec![Expression::Literal(Value::String("map".into()))];
        assert_eq!(empty(&mut ev, &args).unwrap().value, Value::Map(Default::default()));
    }

    #[test]
    fn test_empty_checks_emptiness() {
        let mut ev = evaluator();
        assert_eq!(
            empty(&mut ev, &[Expression::Literal(Value::List(vec![]))]).unwrap().value,
            Value::Bool(true)
        );
        assert_eq!(
            empty(&mut ev, &[Expression::Literal(Value::Int(0))]).unwrap().value,
            Value::Bool(true)
        );
        assert_eq!(
            empty(&mut ev, &[Expression::Literal(Value::String("hi".into()))]).unwrap().value,
            Value::Bool(false)
        );
    }
}
