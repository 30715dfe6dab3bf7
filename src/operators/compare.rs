// ABOUTME: The six comparison operators, dispatched through the type registry

use crate::error::EvalError;
use crate::evaluator::Evaluator;
use crate::expr::Expression;
use crate::operators::{resolve_arg, Response};
use crate::types::BinOp;
use graft_macros::operator;

fn compare(ev: &mut Evaluator, args: &[Expression], name: &str, op: BinOp) -> Result<Response, EvalError> {
    if args.len() != 2 {
        return Err(EvalError::arity_error(name, "2", args.len()));
    }
    let l = resolve_arg(ev, &args[0])?;
    let r = resolve_arg(ev, &args[1])?;
    ev.types().dispatch(op, &l, &r).map(Response::replace)
}

/// Structural/deep equality, dispatched by operand type.
#[operator(name = "==", phase = "Eval")]
pub fn equal(ev: &mut Evaluator, args: &[Expression]) -> Result<Response, EvalError> {
    compare(ev, args, "==", BinOp::Equal)
}

/// Negation of `==`.
#[operator(name = "!=", phase = "Eval")]
pub fn not_equal(ev: &mut Evaluator, args: &[Expression]) -> Result<Response, EvalError> {
    compare(ev, args, "!=", BinOp::NotEqual)
}

#[operator(name = "<", phase = "Eval")]
pub fn less(ev: &mut Evaluator, args: &[Expression]) -> Result<Response, EvalError> {
    compare(ev, args, "<", BinOp::Less)
}

#[operator(name = ">", phase = "Eval")]
pub fn greater(ev: &mut Evaluator, args: &[Expression]) -> Result<Response, EvalError> {
    compare(ev, args, ">", BinOp::Greater)
}

#[operator(name = "<=", phase = "Eval")]
pub fn less_or_equal(ev: &mut Evaluator, args: &[Expression]) -> Result<Response, EvalError> {
    compare(ev, args, "<=", BinOp::LessOrEqual)
}

#[operator(name = ">=", phase = "Eval")]
pub fn greater_or_equal(ev: &mut Evaluator, args: &[Expression]) -> Result<Response, EvalError> {
    compare(ev, args, ">=", BinOp::GreaterOrEqual)
}
