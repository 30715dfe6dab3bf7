// ABOUTME: `?:` — evaluates the condition, then only the taken branch

use crate::error::EvalError;
use crate::evaluator::Evaluator;
use crate::expr::Expression;
use crate::operators::{resolve_arg, Response};
use crate::value::truthy;
use graft_macros::operator;

/// Evaluate the condition; resolve and return only the taken branch.
#[operator(name = "?:", phase = "Eval")]
pub fn ternary(ev: &mut Evaluator, args: &[Expression]) -> Result<Response, EvalError> {
    if args.len() != 3 {
        return Err(EvalError::arity_error("?:", "3", args.len()));
    }
    let cond = resolve_arg(ev, &args[0])?;
    let branch = if truthy(&cond) { &args[1] } else { &args[2] };
    resolve_arg(ev, branch).map(Response::replace)
}
