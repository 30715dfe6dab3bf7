// ABOUTME: Error types for parsing and evaluation failures in the expression engine

use thiserror::Error;

/// A fatal error raised by the lexer or parser. Carries enough context to point
/// a caller at the offending fragment.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("syntax error at position {position} in `{fragment}`: {message}")]
pub struct SyntaxError {
    pub message: String,
    pub position: usize,
    pub fragment: String,
}

impl SyntaxError {
    pub fn new(message: impl Into<String>, position: usize, fragment: impl Into<String>) -> Self {
        SyntaxError {
            message: message.into(),
            position,
            fragment: fragment.into(),
        }
    }
}

/// Errors raised while evaluating a parsed expression against a document tree.
///
/// Variants map onto the taxonomy in the error-handling design: resolution
/// errors are the only ones `||` (as `LogicalOr`) ever catches, and only when it
/// is the immediate enclosing form.
#[derive(Error, Debug, Clone)]
pub enum EvalError {
    /// A `Reference` cursor did not resolve against the document tree.
    #[error("not found: {0}")]
    NotFound(String),

    /// Wrong operand type for an operator or handler operation.
    #[error("{function}: expected {expected}, got {actual} at argument {position}")]
    TypeMismatch {
        function: String,
        expected: String,
        actual: String,
        position: usize,
    },

    /// Wrong number of arguments.
    #[error("{function}: expected {expected} argument(s), got {actual}")]
    ArityError {
        function: String,
        expected: String,
        actual: usize,
    },

    /// Division/modulo by zero, repetition limits, NaN/infinite promotion results.
    #[error("{function}: {message}")]
    Numeric { function: String, message: String },

    /// A remote backend (vault/awsparam/awssecret/nats) failed.
    #[error("{backend}@{target}: {message}")]
    Backend {
        backend: String,
        target: String,
        message: String,
        missing_key: bool,
    },

    /// Any other local failure raised by an operator's own logic (unsupported
    /// combination, malformed argument shape, etc.) that isn't better expressed
    /// by one of the other variants.
    #[error("{function}: {message}")]
    Runtime { function: String, message: String },

    /// A `param` call site was reached; it always fails, carrying its message.
    #[error("{0}")]
    Param(String),

    /// Looking up an operator name the registry doesn't know about.
    #[error("unknown operator: {0}")]
    UnknownOperator(String),

    /// A strongly-connected component of size > 1 in the dependency graph.
    #[error("dependency cycle involving: {0:?}")]
    Cycle(Vec<String>),
}

impl EvalError {
    pub fn type_mismatch(function: &str, expected: &str, actual: &str, position: usize) -> Self {
        EvalError::TypeMismatch {
            function: function.to_string(),
            expected: expected.to_string(),
            actual: actual.to_string(),
            position,
        }
    }

    pub fn arity_error(function: &str, expected: impl Into<String>, actual: usize) -> Self {
        EvalError::ArityError {
            function: function.to_string(),
            expected: expected.into(),
            actual,
        }
    }

    pub fn numeric(function: &str, message: impl Into<String>) -> Self {
        EvalError::Numeric {
            function: function.to_string(),
            message: message.into(),
        }
    }

    pub fn runtime(function: &str, message: impl Into<String>) -> Self {
        EvalError::Runtime {
            function: function.to_string(),
            message: message.into(),
        }
    }

    pub fn backend(backend: &str, target: &str, message: impl Into<String>, missing_key: bool) -> Self {
        EvalError::Backend {
            backend: backend.to_string(),
            target: target.to_string(),
            message: message.into(),
            missing_key,
        }
    }

    /// Whether this error is the kind `LogicalOr` is allowed to catch: a
    /// missing reference, or a backend failure specifically of the
    /// missing-key kind. Argument/Numeric/Cycle errors are never caught.
    pub fn is_fallback_eligible(&self) -> bool {
        match self {
            EvalError::NotFound(_) => true,
            EvalError::Backend { missing_key, .. } => *missing_key,
            _ => false,
        }
    }
}

/// Errors raised by a `Backend` implementation, independent of the evaluator.
#[derive(Error, Debug, Clone)]
#[error("{message}")]
pub struct BackendError {
    pub message: String,
    pub missing_key: bool,
}

impl BackendError {
    pub fn missing_key(message: impl Into<String>) -> Self {
        BackendError {
            message: message.into(),
            missing_key: true,
        }
    }

    pub fn other(message: impl Into<String>) -> Self {
        BackendError {
            message: message.into(),
            missing_key: false,
        }
    }
}

/// All errors accumulated while running one phase of the evaluator. A phase
/// doesn't stop at the first failing call site; it collects every failure.
#[derive(Error, Debug, Clone, Default)]
#[error("{} error(s) during evaluation", .0.len())]
pub struct PhaseErrors(pub Vec<(String, EvalError)>);

impl PhaseErrors {
    pub fn new() -> Self {
        PhaseErrors(Vec::new())
    }

    pub fn push(&mut self, site: String, err: EvalError) {
        self.0.push((site, err));
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
