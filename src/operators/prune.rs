// ABOUTME: prune — marks the enclosing path for removal from the final output

use crate::error::EvalError;
use crate::evaluator::Evaluator;
use crate::expr::Expression;
use crate::operators::Response;
use graft_macros::operator;

/// Registers the call site's own path on the prune list and leaves the
/// current value in place; `apply_prunes` removes it after the Eval phase.
#[operator(name = "prune", phase = "Eval")]
pub fn prune(ev: &mut Evaluator, args: &[Expression]) -> Result<Response, EvalError> {
    if !args.is_empty() {
        return Err(EvalError::arity_error("prune", "0", args.len()));
    }
    let path = ev.current_site_path();
    let current = ev.resolve_cursor(&path).unwrap_or(crate::value::Value::Null);
    ev.add_prune(path);
    Ok(Response::replace(current))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::BackendRegistry;
    use crate::cursor::Cursor;
    use crate::operators::OperatorRegistry;
    use crate::types::TypeRegistry;
    use crate::value::Value;
    use indexmap::IndexMap;
    use std::sync::Arc;

    #[test]
    fn test_prune_registers_current_path() {
        let mut m = IndexMap::new();
        m.insert(Value::String("doomed".into()), Value::String("x".into()));
        let doc = Value::Map(m);
        let mut ev = Evaluator::new(
            doc,
            Arc::new(OperatorRegistry::new()),
            Arc::new(TypeRegistry::new()),
            Arc::new(BackendRegistry::new()),
        );
        ev.set_current_site_path_for_test(Cursor::parse("doomed").unwrap());
        let result = prune(&mut ev, &[]).unwrap();
        assert_eq!(result.value, Value::String("x".into()));
    }
}
