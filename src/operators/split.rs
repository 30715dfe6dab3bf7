// ABOUTME: split — breaks a string into a list on a literal, character, or regex separator

use crate::error::EvalError;
use crate::evaluator::Evaluator;
use crate::expr::Expression;
use crate::operators::{resolve_arg, Response};
use crate::value::Value;
use graft_macros::operator;
use regex::Regex;

/// Split `s` on `sep`. An empty separator splits into individual characters.
/// A separator beginning with `/` is treated as a regex pattern (the rest of
/// the string after the leading slash), matched with `regex::Regex`.
fn split_string(s: &str, sep: &str) -> Result<Vec<Value>, EvalError> {
    if sep.is_empty() {
        return Ok(s.chars().map(|c| Value::String(c.to_string())).collect());
    }
    if let Some(pattern) = sep.strip_prefix('/') {
        let re = Regex::new(pattern)
            .map_err(|e| EvalError::runtime("split", format!("invalid regex `{}`: {}", pattern, e)))?;
        return Ok(re.split(s).map(|part| Value::String(part.to_string())).collect());
    }
    Ok(s.split(sep).map(|part| Value::String(part.to_string())).collect())
}

/// Split the second argument's string value on the first argument's literal
/// separator, producing a list of strings.
#[operator(name = "split", phase = "Eval")]
pub fn split(ev: &mut Evaluator, args: &[Expression]) -> Result<Response, EvalError> {
    if args.len() != 2 {
        return Err(EvalError::arity_error("split", "2", args.len()));
    }
    let sep_value = resolve_arg(ev, &args[0])?;
    let sep = sep_value
        .as_str()
        .ok_or_else(|| EvalError::type_mismatch("split", "a string separator", sep_value.type_name().as_str(), 0))?;

    let target = resolve_arg(ev, &args[1])?;
    let s = target
        .as_str()
        .ok_or_else(|| EvalError::type_mismatch("split", "a string", target.type_name().as_str(), 1))?;

    split_string(s, sep).map(|parts| Response::replace(Value::List(parts)))
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
    fn test_split_on_literal_separator() {
        let mut ev = evaluator();
        let args = vec![Expression::Literal(Value::String(",".into())), Expression::Literal(Value::String("a,b,c".into()))];
        let result = split(&mut ev, &args).unwrap().value;
        assert_eq!(
            result,
            Value::List(vec![Value::String("a".into()), Value::String("b".into()), Value::String("c".into())])
        );
    }

    #[test]
    fn test_split_empty_separator_splits_into_characters() {
        let mut ev = evaluator();
        let args = vec![Expression::Literal(Value::String("".into())), Expression::Literal(Value::String("ab".into()))];
        let result = split(&mut ev, &args).unwrap().value;
        assert_eq!(result, Value::List(vec![Value::String("a".into()), Value::String("b".into())]));
    }

    #[test]
    fn test_split_regex_separator() {
        let mut ev = evaluator();
        let args = vec![
            Expression::Literal(Value::String("/[,;]".to_string())),
            Expression::Literal(Value::String("a,b;c".into())),
        ];
        let result = split(&mut ev, &args).unwrap().value;
        assert_eq!(
            result,
            Value::List(vec![Value::String("a".into()), Value::String("b".into()), Value::String("c".into())])
        );
    }

    #[test]
    fn test_join_split_roundtrip_when_no_nested_separator() {
        let mut ev = evaluator();
        let args = vec![Expression::Literal(Value::String(",".into())), Expression::Literal(Value::String("a,b,c".into()))];
        let parts = split(&mut ev, &args).unwrap().value;
        if let Value::List(items) = parts {
            let joined = items.iter().map(|v| v.to_string()).collect::<Vec<_>>().join(",");
            assert_eq!(joined, "a,b,c");
        } else {
            panic!("expected list");
        }
    }
}
