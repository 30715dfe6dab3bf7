// ABOUTME: null — with no args returns null itself; with one, tests whether the arg is null

use crate::error::EvalError;
use crate::evaluator::Evaluator;
use crate::expr::Expression;
use crate::operators::{resolve_arg, Response};
use crate::value::Value;
use graft_macros::operator;

#[operator(name = "null", phase = "Eval")]
pub fn null(ev: &mut Evaluator, args: &[Expression]) -> Result<Response, EvalError> {
    match args.len() {
        0 => Ok(Response::replace(Value::Null)),
        1 => {
            let v = resolve_arg(ev, &args[0])?;
            Ok(Response::replace(Value::Bool(v == Value::Null)))
        }
        n => Err(EvalError::arity_error("null", "0 or 1", n)),
    }
}
