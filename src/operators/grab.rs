// ABOUTME: grab — dereferences its arguments, flattening top-level lists when there is more than one

use crate::cursor::Cursor;
use crate::error::EvalError;
use crate::evaluator::Evaluator;
use crate::expr::Expression;
use crate::operators::{resolve_arg, Response};
use crate::value::Value;
use graft_macros::operator;

/// A quoted string argument doubles as a cursor: if it parses and resolves
/// against the document, the dereferenced value is used in its place. Any
/// other argument shape goes through the ordinary resolution protocol.
fn resolve_grab_arg(ev: &mut Evaluator, arg: &Expression) -> Result<Value, EvalError> {
    if let Expression::Literal(Value::String(s)) = arg {
        if let Ok(cursor) = Cursor::parse(s) {
            if let Ok(v) = ev.resolve_cursor(&cursor) {
                return Ok(v);
            }
        }
        return Ok(Value::String(s.clone()));
    }
    resolve_arg(ev, arg)
}

/// Dereference each argument. With one argument, return its value as-is;
/// with several, flatten any top-level lists into a single result list.
#[operator(name = "grab", phase = "Eval")]
pub fn grab(ev: &mut Evaluator, args: &[Expression]) -> Result<Response, EvalError> {
    if args.is_empty() {
        return Err(EvalError::arity_error("grab", "at least 1", 0));
    }
    if args.len() == 1 {
        return resolve_grab_arg(ev, &args[0]).map(Response::replace);
    }
    let mut out = Vec::new();
    for arg in args {
        match resolve_grab_arg(ev, arg)? {
            Value::List(items) => out.extend(items),
            other => out.push(other),
        }
    }
    Ok(Response::replace(Value::List(out)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::BackendRegistry;
    use crate::operators::OperatorRegistry;
    use crate::types::TypeRegistry;
    use indexmap::IndexMap;
    use std::sync::Arc;

    fn doc() -> Value {
        let mut m = IndexMap::new();
        m.insert(Value::String("a".into()), Value::List(vec![Value::Int(1), Value::Int(2)]));
        m.insert(Value::String("b".into()), Value::List(vec![Value::Int(3), Value::Int(4)]));
        m.insert(Value::String("c".into()), Value::Int(5));
        Value::Map(m)
    }

    fn evaluator() -> Evaluator {
        Evaluator::new(
            doc(),
            Arc::new(OperatorRegistry::new()),
            Arc::new(TypeRegistry::new()),
            Arc::new(BackendRegistry::new()),
        )
    }

    #[test]
    fn test_single_arg_returns_value_unwrapped() {
        let mut ev = evaluator();
        let args = vec![Expression::Reference(Cursor::parse("c").unwrap())];
        assert_eq!(grab(&mut ev, &args).unwrap().value, Value::Int(5));
    }

    #[test]
    fn test_multiple_args_flatten_lists() {
        let mut ev = evaluator();
        let args = vec![
            Expression::Reference(Cursor::parse("a").unwrap()),
            Expression::Reference(Cursor::parse("b").unwrap()),
            Expression::Reference(Cursor::parse("c").unwrap()),
        ];
        let result = grab(&mut ev, &args).unwrap().value;
        assert_eq!(
            result,
            Value::List(vec![Value::Int(1), Value::Int(2), Value::Int(3), Value::Int(4), Value::Int(5)])
        );
    }

    #[test]
    fn test_literal_string_cursor_is_dereferenced() {
        let mut ev = evaluator();
        let args = vec![Expression::Literal(Value::String("c".into()))];
        assert_eq!(grab(&mut ev, &args).unwrap().value, Value::Int(5));
    }
}
