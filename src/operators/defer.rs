// ABOUTME: defer — reconstructs its arguments' source form as a quoted `(( ... ))` string, reporting no dependencies

use crate::error::EvalError;
use crate::evaluator::Evaluator;
use crate::expr::Expression;
use crate::operators::{Operator, OperatorEntry, Phase, Response};
use crate::value::Value;

/// Joins each argument's reconstructed source form with a space and wraps the
/// result in the `(( ... ))` delimiter, the same shape the parser accepts for
/// a call-with-spaces form — so the emitted string re-parses into an
/// equivalent tree, per the parsing round-trip this operator exists to serve.
fn defer_invoke(_ev: &mut Evaluator, args: &[Expression]) -> Result<Response, EvalError> {
    if args.is_empty() {
        return Err(EvalError::arity_error("defer", "at least 1", 0));
    }
    let parts: Vec<String> = args.iter().map(Expression::to_source).collect();
    let source = format!("(( {} ))", parts.join(" "));
    Ok(Response::replace(Value::String(source)))
}

/// Hand-written rather than `#[operator]`-generated: every other built-in is
/// happy with the macro's default `dependencies()` (the cursors reachable
/// from its own args), but `defer` must report none at all — its whole point
/// is to produce unevaluated source text, and scheduling it as if it read its
/// arguments' targets would defeat that.
struct DeferOperator;

impl Operator for DeferOperator {
    fn name(&self) -> &'static str {
        "defer"
    }

    fn phase(&self) -> Phase {
        Phase::Eval
    }

    fn summary(&self) -> &'static str {
        "Reconstructs its arguments' source form as a quoted (( ... )) string."
    }

    fn dependencies(&self, _args: &[Expression]) -> Vec<crate::cursor::Cursor> {
        Vec::new()
    }

    fn invoke(&self, ev: &mut Evaluator, args: &[Expression]) -> Result<Response, EvalError> {
        defer_invoke(ev, args)
    }
}

inventory::submit! {
    OperatorEntry(|| Box::new(DeferOperator))
}
