// ABOUTME: The five arithmetic operators, each a thin dispatch through the type registry

use crate::error::EvalError;
use crate::evaluator::Evaluator;
use crate::expr::Expression;
use crate::operators::{resolve_arg, Response};
use crate::types::BinOp;
use graft_macros::operator;

fn binop(ev: &mut Evaluator, args: &[Expression], name: &str, op: BinOp) -> Result<Response, EvalError> {
    if args.len() != 2 {
        return Err(EvalError::arity_error(name, "2", args.len()));
    }
    let l = resolve_arg(ev, &args[0])?;
    let r = resolve_arg(ev, &args[1])?;
    ev.types().dispatch(op, &l, &r).map(Response::replace)
}

/// Add, concatenate, or merge, dispatched by operand type.
#[operator(name = "+", phase = "Eval")]
pub fn add(ev: &mut Evaluator, args: &[Expression]) -> Result<Response, EvalError> {
    binop(ev, args, "+", BinOp::Add)
}

/// Subtract, dispatched by operand type.
#[operator(name = "-", phase = "Eval")]
pub fn subtract(ev: &mut Evaluator, args: &[Expression]) -> Result<Response, EvalError> {
    binop(ev, args, "-", BinOp::Subtract)
}

/// Multiply or repeat, dispatched by operand type.
#[operator(name = "*", phase = "Eval")]
pub fn multiply(ev: &mut Evaluator, args: &[Expression]) -> Result<Response, EvalError> {
    binop(ev, args, "*", BinOp::Multiply)
}

/// Divide; always yields a Float.
#[operator(name = "/", phase = "Eval")]
pub fn divide(ev: &mut Evaluator, args: &[Expression]) -> Result<Response, EvalError> {
    binop(ev, args, "/", BinOp::Divide)
}

/// Modulo; integer-only, float operands truncate.
#[operator(name = "%", phase = "Eval")]
pub fn modulo(ev: &mut Evaluator, args: &[Expression]) -> Result<Response, EvalError> {
    binop(ev, args, "%", BinOp::Modulo)
}
