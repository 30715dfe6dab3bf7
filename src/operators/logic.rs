// ABOUTME: `&&` — short-circuiting logical AND (`||` never becomes an operator call; it stays LogicalOr)

use crate::error::EvalError;
use crate::evaluator::Evaluator;
use crate::expr::Expression;
use crate::operators::{resolve_arg, Response};
use crate::value::{truthy, Value};
use graft_macros::operator;

/// Short-circuits on a falsy left operand, returning `false` without
/// resolving the right side; otherwise resolves and returns the right side.
#[operator(name = "&&", phase = "Eval")]
pub fn and(ev: &mut Evaluator, args: &[Expression]) -> Result<Response, EvalError> {
    if args.len() != 2 {
        return Err(EvalError::arity_error("&&", "2", args.len()));
    }
    let left = resolve_arg(ev, &args[0])?;
    if !truthy(&left) {
        return Ok(Response::replace(Value::Bool(false)));
    }
    resolve_arg(ev, &args[1]).map(Response::replace)
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
    fn test_and_short_circuits_on_false() {
        let mut ev = evaluator();
        let args = vec![
            Expression::Literal(Value::Bool(false)),
            Expression::Reference(crate::cursor::Cursor::parse("nonexistent").unwrap()),
        ];
        assert_eq!(and(&mut ev, &args).unwrap().value, Value::Bool(false));
    }

    #[test]
    fn test_and_returns_right_when_left_truthy() {
        let mut ev = evaluator();
        let args = vec![Expression::Literal(Value::Bool(true)), Expression::Literal(Value::Int(5))];
        assert_eq!(and(&mut ev, &args).unwrap().value, Value::Int(5));
    }
}
