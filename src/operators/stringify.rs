// ABOUTME: stringify — renders any value as a leaf string: literal `null`, scalar form, or trimmed YAML

use crate::error::EvalError;
use crate::evaluator::Evaluator;
use crate::expr::Expression;
use crate::operators::{resolve_arg, Response};
use crate::value::Value;
use graft_macros::operator;

/// Null becomes the literal string `null`; a scalar becomes its own string
/// form; a map or list is rendered as YAML with the trailing newline trimmed.
#[operator(name = "stringify", phase = "Eval")]
pub fn stringify(ev: &mut Evaluator, args: &[Expression]) -> Result<Response, EvalError> {
    if args.len() != 1 {
        return Err(EvalError::arity_error("stringify", "1", args.len()));
    }
    let v = resolve_arg(ev, &args[0])?;
    let s = match v {
        Value::Null => "null".to_string(),
        Value::Map(_) | Value::List(_) => {
            let yaml_value: serde_yaml::Value = v.into();
            let rendered = serde_yaml::to_string(&yaml_value)
                .map_err(|e| EvalError::runtime("stringify", format!("failed to render yaml: {}", e)))?;
            rendered.trim_end_matches('\n').to_string()
        }
        other => other.to_string(),
    };
    Ok(Response::replace(Value::String(s)))
}
