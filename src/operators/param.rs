// ABOUTME: param — a required input placeholder that always fails, carrying its message

use crate::error::EvalError;
use crate::evaluator::Evaluator;
use crate::expr::Expression;
use crate::operators::{resolve_arg, Response};
use graft_macros::operator;

/// Always raises `EvalError::Param` carrying the resolved message; marks a
/// required input whose real value must be supplied by an overlay before the
/// Param phase runs.
#[operator(name = "param", phase = "Param")]
pub fn param(ev: &mut Evaluator, args: &[Expression]) -> Result<Response, EvalError> {
    if args.len() != 1 {
        return Err(EvalError::arity_error("param", "1", args.len()));
    }
    let message = resolve_arg(ev, &args[0])?;
    Err(EvalError::Param(message.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::BackendRegistry;
    use crate::operators::OperatorRegistry;
    use crate::types::TypeRegistry;
    use crate::value::Value;
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
    fn test_param_always_errors_with_message() {
        let mut ev = evaluator();
        let args = vec![Expression::Literal(Value::String("hostname is required".into()))];
        let err = param(&mut ev, &args).unwrap_err();
        match err {
            EvalError::Param(msg) => assert_eq!(msg, "hostname is required"),
            other => panic!("expected Param error, got {:?}", other),
        }
    }

    #[test]
    fn test_param_requires_exactly_one_arg() {
        let mut ev = evaluator();
        assert!(param(&mut ev, &[]).is_err());
    }
}
