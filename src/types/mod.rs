// ABOUTME: Type registry — per-operand-type-pair dispatch for binary operations

use crate::error::EvalError;
use crate::value::{OperandType, Value};
use std::cmp::Ordering;

pub mod boolean;
pub mod list;
pub mod map;
pub mod mixed;
pub mod numeric;
pub mod string;

/// The ten binary operations a handler may support. Any operation a handler
/// doesn't implement returns a `TypeMismatch`-flavored "not supported" error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    Equal,
    NotEqual,
    Less,
    Greater,
    LessOrEqual,
    GreaterOrEqual,
}

impl BinOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Subtract => "-",
            BinOp::Multiply => "*",
            BinOp::Divide => "/",
            BinOp::Modulo => "%",
            BinOp::Equal => "==",
            BinOp::NotEqual => "!=",
            BinOp::Less => "<",
            BinOp::Greater => ">",
            BinOp::LessOrEqual => "<=",
            BinOp::GreaterOrEqual => ">=",
        }
    }
}

/// A claimed, ordered pair of operand types a handler knows how to combine.
/// Claiming `(A, B)` as commutative also claims `(B, A)` — see
/// `Handler::commutative`.
pub type TypePair = (OperandType, OperandType);

/// Per-type-pair implementer of the ten binary operations. Registered in the
/// `TypeRegistry` with a priority; higher priorities are consulted first.
pub trait Handler: Send + Sync {
    fn claims(&self) -> &'static [TypePair];

    /// Whether claiming `(A, B)` implies also claiming `(B, A)`.
    fn commutative(&self) -> bool {
        false
    }

    fn priority(&self) -> i32;

    fn add(&self, l: &Value, r: &Value) -> Result<Value, EvalError> {
        Err(not_supported("+", l, r))
    }
    fn subtract(&self, l: &Value, r: &Value) -> Result<Value, EvalError> {
        Err(not_supported("-", l, r))
    }
    fn multiply(&self, l: &Value, r: &Value) -> Result<Value, EvalError> {
        Err(not_supported("*", l, r))
    }
    fn divide(&self, l: &Value, r: &Value) -> Result<Value, EvalError> {
        Err(not_supported("/", l, r))
    }
    fn modulo(&self, l: &Value, r: &Value) -> Result<Value, EvalError> {
        Err(not_supported("%", l, r))
    }
    fn equal(&self, l: &Value, r: &Value) -> Result<Value, EvalError> {
        Err(not_supported("==", l, r))
    }
    fn not_equal(&self, l: &Value, r: &Value) -> Result<Value, EvalError> {
        self.equal(l, r).map(|v| Value::Bool(!crate::value::truthy(&v)))
    }
    fn compare(&self, l: &Value, r: &Value) -> Result<Ordering, EvalError> {
        Err(not_supported("<=>", l, r))
    }
}

fn not_supported(op: &str, l: &Value, r: &Value) -> EvalError {
    EvalError::type_mismatch(
        op,
        "a supported operand pair",
        &format!("{} and {}", l.type_name(), r.type_name()),
        0,
    )
}

/// A registered handler, wrapped so it can be collected via `inventory`
/// without requiring `dyn Handler` to itself be `'static`-constructible as a
/// bare value — each entry is a factory function producing a fresh boxed
/// handler, mirroring the operator registry's `OperatorEntry` shape.
pub struct HandlerEntry(pub fn() -> Box<dyn Handler>);

inventory::collect!(HandlerEntry);

/// Dispatches a `BinOp` to the highest-priority handler claiming the operand
/// pair, falling back to the mixed-type handler (lowest priority) if none
/// claims it.
pub struct TypeRegistry {
    handlers: Vec<Box<dyn Handler>>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        let mut handlers: Vec<Box<dyn Handler>> =
            inventory::iter::<HandlerEntry>().map(|e| (e.0)()).collect();
        handlers.sort_by(|a, b| b.priority().cmp(&a.priority()));
        TypeRegistry { handlers }
    }

    fn find(&self, l: OperandType, r: OperandType) -> &dyn Handler {
        for h in &self.handlers {
            for &(a, b) in h.claims() {
                if (a, b) == (l, r) || (h.commutative() && (b, a) == (l, r)) {
                    return h.as_ref();
                }
            }
        }
        self.mixed()
    }

    fn mixed(&self) -> &dyn Handler {
        self.handlers
            .iter()
            .find(|h| h.priority() == i32::MIN)
            .expect("mixed fallback handler must be registered")
            .as_ref()
    }

    /// Direct access to the dispatched handler's ordering, used by the `sort`
    /// post-action (which needs a real `Ordering` to hand to a slice sort,
    /// not the `Bool` that `dispatch`'s comparison `BinOp`s return).
    pub fn compare(&self, l: &Value, r: &Value) -> Result<Ordering, EvalError> {
        self.find(l.type_of(), r.type_of()).compare(l, r)
    }

    pub fn dispatch(&self, op: BinOp, l: &Value, r: &Value) -> Result<Value, EvalError> {
        let handler = self.find(l.type_of(), r.type_of());
        match op {
            BinOp::Add => handler.add(l, r),
            BinOp::Subtract => handler.subtract(l, r),
            BinOp::Multiply => handler.multiply(l, r),
            BinOp::Divide => handler.divide(l, r),
            BinOp::Modulo => handler.modulo(l, r),
            BinOp::Equal => handler.equal(l, r),
            BinOp::NotEqual => handler.not_equal(l, r),
            BinOp::Less => handler.compare(l, r).map(|o| Value::Bool(o == Ordering::Less)),
            BinOp::Greater => handler.compare(l, r).map(|o| Value::Bool(o == Ordering::Greater)),
            BinOp::LessOrEqual => handler
                .compare(l, r)
                .map(|o| Value::Bool(o != Ordering::Greater)),
            BinOp::GreaterOrEqual => handler
                .compare(l, r)
                .map(|o| Value::Bool(o != Ordering::Less)),
        }
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}
