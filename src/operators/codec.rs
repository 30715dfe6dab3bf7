// ABOUTME: base64 / base64-decode — standard base64 encoding and decoding of string values

use crate::error::EvalError;
use crate::evaluator::Evaluator;
use crate::expr::Expression;
use crate::operators::{resolve_arg, Response};
use crate::value::Value;
use base64::{engine::general_purpose::STANDARD, Engine};
use graft_macros::operator;

/// Stringifies the argument (any scalar is fine) and encodes it as standard
/// base64.
#[operator(name = "base64", phase = "Eval")]
pub fn base64_encode(ev: &mut Evaluator, args: &[Expression]) -> Result<Response, EvalError> {
    if args.len() != 1 {
        return Err(EvalError::arity_error("base64", "1", args.len()));
    }
    let v = resolve_arg(ev, &args[0])?;
    let s = match v {
        Value::Map(_) | Value::List(_) => {
            return Err(EvalError::type_mismatch("base64", "a scalar", v.type_name().as_str(), 0))
        }
        other => other.to_string(),
    };
    Ok(Response::replace(Value::String(STANDARD.encode(s.as_bytes()))))
}

/// The argument must be a string; decodes it from standard base64 into UTF-8.
#[operator(name = "base64-decode", phase = "Eval")]
pub fn base64_decode(ev: &mut Evaluator, args: &[Expression]) -> Result<Response, EvalError> {
    if args.len() != 1 {
        return Err(EvalError::arity_error("base64-decode", "1", args.len()));
    }
    let v = resolve_arg(ev, &args[0])?;
    let s = v
        .as_str()
        .ok_or_else(|| EvalError::type_mismatch("base64-decode", "a string", v.type_name().as_str(), 0))?;
    let bytes = STANDARD
        .decode(s)
        .map_err(|e| EvalError::runtime("base64-decode", format!("invalid base64: {}", e)))?;
    let decoded = String::from_utf8(bytes)
        .map_err(|e| EvalError::runtime("base64-decode", format!("decoded bytes are not valid utf-8: {}", e)))?;
    Ok(Response::replace(Value::String(decoded)))
}
