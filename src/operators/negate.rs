// ABOUTME: negate/! — logical NOT of the argument's truthiness

use crate::error::EvalError;
use crate::evaluator::Evaluator;
use crate::expr::Expression;
use crate::operators::{resolve_arg, Response};
use crate::value::{truthy, Value};
use graft_macros::operator;

fn negate_value(ev: &mut Evaluator, args: &[Expression], name: &str) -> Result<Response, EvalError> {
    if args.len() != 1 {
        return Err(EvalError::arity_error(name, "1", args.len()));
    }
    let v = resolve_arg(ev, &args[0])?;
    Ok(Response::replace(Value::Bool(!truthy(&v))))
}

/// Logical NOT of the argument's truthiness.
#[operator(name = "!", phase = "Eval")]
pub fn bang(ev: &mut Evaluator, args: &[Expression]) -> Result<Response, EvalError> {
    negate_value(ev, args, "!")
}

/// Logical NOT of the argument's truthiness (named form of `!`).
#[operator(name = "negate", phase = "Eval")]
pub fn negate(ev: &mut Evaluator, args: &[Expression]) -> Result<Response, EvalError> {
    negate_value(ev, args, "negate")
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
    fn test_bang_negates_truthiness() {
        let mut ev = evaluator();
        let args = vec![Expression::Literal(Value::Int(0))];
        assert_eq!(bang(&mut ev, &args).unwrap().value, Value::Bool(true));
    }

    #[test]
    fn test_negate_is_same_as_bang() {
        let mut ev = evaluator();
        let args = vec![Expression::Literal(Value::Bool(true))];
        assert_eq!(negate(&mut ev, &args).unwrap().value, Value::Bool(false));
    }
}
