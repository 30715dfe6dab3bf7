// ABOUTME: inject — merges a resolved map into the parent mapping, replacing the call site itself

use crate::error::EvalError;
use crate::evaluator::Evaluator;
use crate::expr::Expression;
use crate::operators::{resolve_arg, Response};
use crate::value::Value;
use graft_macros::operator;

/// The argument must resolve to a map; the response asks the evaluator to
/// merge that map's entries into the site's parent mapping and drop the site.
#[operator(name = "inject", phase = "Eval")]
pub fn inject(ev: &mut Evaluator, args: &[Expression]) -> Result<Response, EvalError> {
    if args.len() != 1 {
        return Err(EvalError::arity_error("inject", "1", args.len()));
    }
    let v = resolve_arg(ev, &args[0])?;
    match v {
        Value::Map(_) => Ok(Response::inject(v)),
        other => Err(EvalError::type_mismatch("inject", "a map", other.type_name().as_str(), 0)),
    }
}
