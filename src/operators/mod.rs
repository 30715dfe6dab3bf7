// ABOUTME: Operator registry and the argument-resolution protocol every operator shares

use crate::cursor::Cursor;
use crate::error::EvalError;
use crate::evaluator::Evaluator;
use crate::expr::Expression;
use crate::value::Value;
use std::collections::HashMap;

pub mod arith;
pub mod codec;
pub mod compare;
pub mod concat;
pub mod defer;
pub mod empty;
pub mod grab;
pub mod inject;
pub mod io;
pub mod join;
pub mod keys;
pub mod logic;
pub mod negate;
pub mod null;
pub mod param;
pub mod prune;
pub mod secrets;
pub mod sort;
pub mod split;
pub mod stringify;
pub mod ternary;

/// One of the three ordered evaluation passes. A full run executes phases in
/// this order; within a phase, call sites execute in dependency order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Phase {
    Merge,
    Param,
    Eval,
}

impl Phase {
    pub fn all() -> [Phase; 3] {
        [Phase::Merge, Phase::Param, Phase::Eval]
    }
}

/// How a `Response`'s value is applied back into the document tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Overwrite the leaf at the call site with `value`.
    Replace,
    /// `value` must be a `Map`; its entries are merged into the parent
    /// mapping that contains the call site, and the call site itself is
    /// removed.
    Inject,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub action: Action,
    pub value: Value,
}

impl Response {
    pub fn replace(value: Value) -> Self {
        Response { action: Action::Replace, value }
    }

    pub fn inject(value: Value) -> Self {
        Response { action: Action::Inject, value }
    }
}

/// A single responsibility holder: a phase tag and an `invoke`. Setup and
/// dependency reporting both have useful defaults — an operator's
/// dependencies are, by default, exactly the cursors reachable from its own
/// argument expressions (spec.md §3's "operators ... report transitive
/// dependencies"); only an operator with extra hidden reads would need to
/// override it, and none of the built-ins do.
pub trait Operator: Send + Sync {
    fn name(&self) -> &'static str;

    fn phase(&self) -> Phase;

    /// One-line contract summary, extracted from the operator function's
    /// rustdoc by the `#[operator]` macro.
    fn summary(&self) -> &'static str {
        ""
    }

    fn setup(&self, _args: &[Expression]) {}

    fn dependencies(&self, args: &[Expression]) -> Vec<Cursor> {
        args.iter().flat_map(Expression::dependencies).collect()
    }

    fn invoke(&self, ev: &mut Evaluator, args: &[Expression]) -> Result<Response, EvalError>;
}

/// A registered operator, collected via `inventory` so the registry is
/// populated with a pure addition (a new `#[operator]` fn) and no central
/// "register all" call list.
pub struct OperatorEntry(pub fn() -> Box<dyn Operator>);

inventory::collect!(OperatorEntry);

/// Write-at-init, read-only-after map from operator name to implementation.
pub struct OperatorRegistry {
    operators: HashMap<&'static str, Box<dyn Operator>>,
}

impl OperatorRegistry {
    pub fn new() -> Self {
        let mut operators = HashMap::new();
        for entry in inventory::iter::<OperatorEntry> {
            let op = (entry.0)();
            operators.insert(op.name(), op);
        }
        OperatorRegistry { operators }
    }

    /// `None` for an unregistered name — callers turn that into
    /// `EvalError::UnknownOperator` themselves rather than dispatching
    /// through a sentinel `Operator`, so looking up a bad name never
    /// allocates (let alone leaks) on the hot path.
    pub fn get(&self, name: &str) -> Option<&dyn Operator> {
        self.operators.get(name).map(|op| op.as_ref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.operators.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.operators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operators.is_empty()
    }
}

impl Default for OperatorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// The five-way match every operator's arguments resolve through, per
/// spec.md §4.5. This is the mechanism that lets every operator accept
/// arbitrarily nested sub-expressions uniformly.
pub fn resolve_arg(ev: &mut Evaluator, expr: &Expression) -> Result<Value, EvalError> {
    match expr {
        Expression::Literal(v) => Ok(v.clone()),
        Expression::Reference(c) => {
            let expanded = c.expand_env();
            ev.resolve_cursor(&expanded)
        }
        Expression::EnvVar(name) => resolve_env_var(name),
        Expression::OperatorCall { name, target, args } => {
            // Clone the `Arc` so `op` doesn't hold a borrow of `ev` across the
            // `&mut ev` reborrow `invoke` needs — the registry is read-only
            // after construction, so this is just sidestepping the borrow
            // checker, not a real copy of any operator state.
            let registry = ev.operators_arc();
            let op = registry.get(name);
            ev.push_target(target.clone());
            let result = match op {
                Some(op) => op.invoke(ev, args),
                None => Err(EvalError::UnknownOperator(name.clone())),
            };
            ev.pop_target();
            result.map(|r| r.value)
        }
        Expression::LogicalOr(l, r) => match resolve_arg(ev, l) {
            Ok(v) => Ok(v),
            Err(e) if e.is_fallback_eligible() => resolve_arg(ev, r),
            Err(e) => Err(e),
        },
    }
}

/// `EnvVar` resolution: read the process environment, auto-parsing values
/// that look like YAML scalars (`{`, `[`, `-`, `true`/`false`/`null` prefix)
/// rather than always returning a bare string.
fn resolve_env_var(name: &str) -> Result<Value, EvalError> {
    match std::env::var(name) {
        Ok(raw) => Ok(parse_env_scalar(&raw)),
        Err(_) => Err(EvalError::NotFound(format!("${}", name))),
    }
}

fn parse_env_scalar(raw: &str) -> Value {
    let trimmed = raw.trim();
    let looks_structured = trimmed.starts_with('{')
        || trimmed.starts_with('[')
        || trimmed.starts_with('-')
        || trimmed.eq_ignore_ascii_case("true")
        || trimmed.eq_ignore_ascii_case("false")
        || trimmed.eq_ignore_ascii_case("null");
    if looks_structured {
        if let Ok(v) = serde_yaml::from_str::<serde_yaml::Value>(trimmed) {
            if let Ok(value) = Value::try_from(v) {
                return value;
            }
        }
    }
    Value::String(raw.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_is_populated() {
        let reg = OperatorRegistry::new();
        assert!(reg.contains("grab"));
        assert!(reg.contains("concat"));
        assert!(reg.contains("+"));
        assert!(!reg.contains("no-such-operator"));
    }

    #[test]
    fn test_unknown_operator_errors() {
        let reg = OperatorRegistry::new();
        assert!(reg.get("bogus").is_none());
    }

    #[test]
    fn test_parse_env_scalar_bool() {
        assert_eq!(parse_env_scalar("true"), Value::Bool(true));
    }

    #[test]
    fn test_parse_env_scalar_plain_string() {
        assert_eq!(parse_env_scalar("hello"), Value::String("hello".to_string()));
    }

    #[test]
    fn test_parse_env_scalar_list() {
        assert_eq!(
            parse_env_scalar("[1, 2]"),
            Value::List(vec![Value::Int(1), Value::Int(2)])
        );
    }
}
