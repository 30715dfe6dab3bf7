// ABOUTME: join — flattens list/map/scalar arguments into parts, then joins them with a separator

use crate::error::EvalError;
use crate::evaluator::Evaluator;
use crate::expr::Expression;
use crate::operators::{resolve_arg, Response};
use crate::value::Value;
use graft_macros::operator;

/// Collect the parts one `join` argument contributes. List elements are
/// flattened as individual parts (a nested list or map inside a list is an
/// error); a map contributes one `key:value` part per entry, sorted by key;
/// any other value contributes its stringified form as a single part.
fn collect_parts(v: &Value, parts: &mut Vec<String>) -> Result<(), EvalError> {
    match v {
        Value::List(items) => {
            for item in items {
                match item {
                    Value::List(_) | Value::Map(_) => {
                        return Err(EvalError::type_mismatch(
                            "join",
                            "a scalar list element",
                            item.type_name().as_str(),
                            0,
                        ))
                    }
                    scalar => parts.push(scalar.to_string()),
                }
            }
            Ok(())
        }
        Value::Map(m) => {
            let mut entries: Vec<(String, String)> =
                m.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            parts.extend(entries.into_iter().map(|(k, v)| format!("{}:{}", k, v)));
            Ok(())
        }
        scalar => {
            parts.push(scalar.to_string());
            Ok(())
        }
    }
}

/// Join the remaining arguments' flattened parts with the literal separator
/// given as the first argument.
#[operator(name = "join", phase = "Eval")]
pub fn join(ev: &mut Evaluator, args: &[Expression]) -> Result<Response, EvalError> {
    if args.len() < 2 {
        return Err(EvalError::arity_error("join", "at least 2", args.len()));
    }
    let sep_value = resolve_arg(ev, &args[0])?;
    let sep = sep_value
        .as_str()
        .ok_or_else(|| EvalError::type_mismatch("join", "a string separator", sep_value.type_name().as_str(), 0))?
        .to_string();

    let mut parts = Vec::new();
    for arg in &args[1..] {
        let v = resolve_arg(ev, arg)?;
        collect_parts(&v, &mut parts)?;
    }
    Ok(Response::replace(Value::String(parts.join(&sep))))
}
