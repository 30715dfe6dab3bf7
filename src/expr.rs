// ABOUTME: The parsed expression tree consumed by the evaluator

use crate::cursor::Cursor;
use crate::value::Value;

/// A parsed `(( ... ))` fragment. Immutable once built; the evaluator never
/// mutates a tree, only the document leaves a tree's evaluation writes back to.
#[derive(Debug, Clone)]
pub enum Expression {
    Literal(Value),
    Reference(Cursor),
    EnvVar(String),
    /// `name@target(args...)` or `name arg1 arg2 ...`. `target` is the
    /// optional `@name` suffix selecting a backend configuration.
    OperatorCall {
        name: String,
        target: Option<String>,
        args: Vec<Expression>,
    },
    /// Preserved as a distinct shape (rather than reduced to an `OperatorCall`
    /// for `||`) so operators like the secret-lookup family can consume the
    /// un-reduced form and try the right side as a default only after the
    /// left side fails.
    LogicalOr(Box<Expression>, Box<Expression>),
}

impl Expression {
    pub fn operator_call(name: impl Into<String>, args: Vec<Expression>) -> Expression {
        Expression::OperatorCall {
            name: name.into(),
            target: None,
            args,
        }
    }

    /// Every cursor this expression (or a nested sub-expression) would read
    /// if evaluated, collected recursively across operator-call arguments and
    /// both branches of a `LogicalOr`.
    pub fn dependencies(&self) -> Vec<Cursor> {
        match self {
            Expression::Literal(_) => vec![],
            Expression::Reference(c) => vec![c.clone()],
            Expression::EnvVar(_) => vec![],
            Expression::OperatorCall { args, .. } => {
                args.iter().flat_map(Expression::dependencies).collect()
            }
            Expression::LogicalOr(l, r) => {
                let mut deps = l.dependencies();
                deps.extend(r.dependencies());
                deps
            }
        }
    }

    /// Reconstruct source form with proper quoting, the inverse of parsing.
    /// Used by the `defer` operator; every expression `defer` emits must
    /// re-parse into an equivalent tree.
    pub fn to_source(&self) -> String {
        match self {
            Expression::Literal(v) => literal_source(v),
            Expression::Reference(c) => c.to_string(),
            Expression::EnvVar(name) => format!("${}", name),
            Expression::OperatorCall { name, target, args } if target.is_none() => {
                if name == "?:" && args.len() == 3 {
                    return format!(
                        "({} ? {} : {})",
                        args[0].to_source(),
                        args[1].to_source(),
                        args[2].to_source()
                    );
                }
                if name == "!" && args.len() == 1 {
                    return format!("!{}", args[0].to_source());
                }
                if let Some(symbol) = INFIX_BINARY_OPERATORS.iter().find(|op| *op == name) {
                    if args.len() == 2 {
                        return format!("({} {} {})", args[0].to_source(), symbol, args[1].to_source());
                    }
                }
                call_source(name, target, args)
            }
            Expression::OperatorCall { name, target, args } => call_source(name, target, args),
            Expression::LogicalOr(l, r) => format!("({} || {})", l.to_source(), r.to_source()),
        }
    }
}

/// Operator names the parser only ever produces from punctuation tokens
/// (`+`, `==`, `&&`, ...), never from an `IDENT` call head — `parse_primary_strict`'s
/// `name(args)` call form requires `Token::Ident`, so reconstructing one of
/// these as `name(args)` would lex back as the bare punctuation token `name`
/// followed by a parenthesized group, not a call, and fail to parse. They
/// must be emitted in their original infix surface form instead.
const INFIX_BINARY_OPERATORS: &[&str] =
    &["&&", "==", "!=", "<", "<=", ">", ">=", "+", "-", "*", "/", "%"];

fn call_source(name: &str, target: &Option<String>, args: &[Expression]) -> String {
    let head = match target {
        Some(t) => format!("{}@{}", name, t),
        None => name.to_string(),
    };
    let parts: Vec<String> = args.iter().map(Expression::to_source).collect();
    format!("{}({})", head, parts.join(", "))
}

fn literal_source(v: &Value) -> String {
    match v {
        Value::Null => "nil".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Int(i) => i.to_string(),
        Value::Float(f) => f.to_string(),
        Value::String(s) => format!("\"{}\"", escape_string(s)),
        // Lists/maps have no literal syntax in the grammar; best-effort textual form.
        Value::List(_) | Value::Map(_) => v.to_string(),
    }
}

pub fn escape_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out
}
