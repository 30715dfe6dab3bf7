// ABOUTME: sort — marks the enclosing list for sorting after the Eval phase, with an optional key

use crate::cursor::{Cursor, Segment};
use crate::error::EvalError;
use crate::evaluator::Evaluator;
use crate::expr::Expression;
use crate::operators::{resolve_arg, Response};
use graft_macros::operator;

/// A call site named `__sort_<name>` targets the sibling key `<name>` rather
/// than its own position: this is the `__sort_`-prefix convention a document
/// uses to attach a sort directive to a list without planting `(( sort ))`
/// inside the list itself. Any other call site targets its own path.
fn sort_target(site_path: &Cursor) -> Cursor {
    match site_path.last() {
        Some(Segment::Key(k)) => match k.strip_prefix("__sort_") {
            Some(sibling) => {
                let parent = site_path.parent().unwrap_or_else(Cursor::root);
                parent.join(Segment::Key(sibling.to_string()))
            }
            None => site_path.clone(),
        },
        _ => site_path.clone(),
    }
}

/// Registers the enclosing path on the sort list, optionally naming the map
/// key used to compare list-of-maps elements; `apply_sorts` runs after the
/// Eval phase. The current value at this call site's own position is
/// returned unchanged.
#[operator(name = "sort", phase = "Merge")]
pub fn sort(ev: &mut Evaluator, args: &[Expression]) -> Result<Response, EvalError> {
    if args.len() > 1 {
        return Err(EvalError::arity_error("sort", "0 or 1", args.len()));
    }
    let key = if let Some(arg) = args.first() {
        let v = resolve_arg(ev, arg)?;
        let s = v
            .as_str()
            .ok_or_else(|| EvalError::type_mismatch("sort", "a string key", v.type_name().as_str(), 0))?;
        Some(s.to_string())
    } else {
        None
    };
    let site_path = ev.current_site_path();
    let current = ev.resolve_cursor(&site_path).unwrap_or(crate::value::Value::Null);
    ev.add_sort(sort_target(&site_path), key);
    Ok(Response::replace(current))
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
        let mut ev = Evaluator::new(
            Value::List(vec![Value::Int(3), Value::Int(1)]),
            Arc::new(OperatorRegistry::new()),
            Arc::new(TypeRegistry::new()),
            Arc::new(BackendRegistry::new()),
        );
        ev.set_current_site_path_for_test(Cursor::root());
        ev
    }

    #[test]
    fn test_sort_with_no_args_records_no_key() {
        let mut ev = evaluator();
        let result = sort(&mut ev, &[]).unwrap();
        assert_eq!(result.value, Value::List(vec![Value::Int(3), Value::Int(1)]));
    }

    #[test]
    fn test_sort_with_key_arg() {
        let mut ev = evaluator();
        let args = vec![Expression::Literal(Value::String("name".into()))];
        assert!(sort(&mut ev, &args).is_ok());
    }

    #[test]
    fn test_sort_target_follows_prefix_convention() {
        let site = Cursor::parse("__sort_names").unwrap();
        assert_eq!(sort_target(&site).to_string(), "names");
    }

    #[test]
    fn test_sort_target_defaults_to_own_path() {
        let site = Cursor::parse("names").unwrap();
        assert_eq!(sort_target(&site).to_string(), "names");
    }

    #[test]
    fn test_sort_rejects_extra_args() {
        let mut ev = evaluator();
        let args = vec![
            Expression::Literal(Value::String("name".into())),
            Expression::Literal(Value::String("extra".into())),
        ];
        assert!(sort(&mut ev, &args).is_err());
    }
}
