// ABOUTME: concat — stringify every argument and join with no separator

use crate::error::EvalError;
use crate::evaluator::Evaluator;
use crate::expr::Expression;
use crate::operators::{resolve_arg, Response};
use crate::value::Value;
use graft_macros::operator;

/// A list argument joins its own elements with no separator before being
/// concatenated into the overall result; a map argument is an error.
fn stringify_arg(v: &Value) -> Result<String, EvalError> {
    match v {
        Value::Map(_) => Err(EvalError::type_mismatch("concat", "a scalar or list", "map", 0)),
        Value::List(items) => {
            let mut out = String::new();
            for item in items {
                out.push_str(&stringify_arg(item)?);
            }
            Ok(out)
        }
        other => Ok(other.to_string()),
    }
}

/// Stringify every argument and concatenate with no separator.
#[operator(name = "concat", phase = "Eval")]
pub fn concat(ev: &mut Evaluator, args: &[Expression]) -> Result<Response, EvalError> {
    if args.len() < 2 {
        return Err(EvalError::arity_error("concat", "at least 2", args.len()));
    }
    let mut out = String::new();
    for arg in args {
        let v = resolve_arg(ev, arg)?;
        out.push_str(&stringify_arg(&v)?);
    }
    Ok(Response::replace(Value::String(out)))
}
