// ABOUTME: keys — returns the sorted list of a map argument's keys

use crate::error::EvalError;
use crate::evaluator::Evaluator;
use crate::expr::Expression;
use crate::operators::{resolve_arg, Response};
use crate::value::Value;
use graft_macros::operator;

#[operator(name = "keys", phase = "Eval")]
pub fn keys(ev: &mut Evaluator, args: &[Expression]) -> Result<Response, EvalError> {
    if args.len() != 1 {
        return Err(EvalError::arity_error("keys", "1", args.len()));
    }
    let v = resolve_arg(ev, &args[0])?;
    let map = match v {
        Value::Map(m) => m,
        other => return Err(EvalError::type_mismatch("keys", "a map", other.type_name().as_str(), 0)),
    };
    let mut out: Vec<String> = map.keys().map(|k| k.to_string()).collect();
    out.sort();
    Ok(Response::replace(Value::List(out.into_iter().map(Value::String).collect())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::BackendRegistry;
    use crate::operators::OperatorRegistry;
    use crate::types::TypeRegistry;
    use indexmap::IndexMap;
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
    fn test_keys_sorted() {
        let mut ev = evaluator();
        let mut m = IndexMap::new();
        m.insert(Value::String("z".into()), Value::Int(1));
        m.insert(Value::String("a".into()), Value::Int(2));
        let args = vec![Expression::Literal(Value::Map(m))];
        let result = keys(&mut ev, &args).unwrap().value;
        assert_eq!(result, Value::List(vec![Value::String("a".into()), Value::String("z".into())]));
    }

    #[test]
    fn test_keys_requires_map() {
        let mut ev = evaluator();
        let args = vec![Expression::Literal(Value::Int(5))];
        assert!(keys(&mut ev, &args).is_err());
    }
}
