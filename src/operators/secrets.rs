// ABOUTME: vault / awsparam / awssecret / nats / vault-try — remote lookups through the Backend trait

use crate::backend::{skip_backends, Backend, REDACTED};
use crate::error::EvalError;
use crate::evaluator::Evaluator;
use crate::expr::Expression;
use crate::operators::{resolve_arg, Response};
use crate::value::Value;
use graft_macros::operator;
use std::sync::{Arc, OnceLock};

/// The single-threaded runtime bridging `Operator::invoke`'s synchronous
/// contract to `Backend::lookup`'s `async fn`. Built lazily, once per
/// process, with only the `"rt"` Cargo feature (no timers are needed: the
/// backend itself owns whatever connection timeouts it wants).
fn bridge_runtime() -> &'static tokio::runtime::Runtime {
    static RUNTIME: OnceLock<tokio::runtime::Runtime> = OnceLock::new();
    RUNTIME.get_or_init(|| {
        tokio::runtime::Builder::new_current_thread()
            .build()
            .expect("failed to start the sync/async bridge runtime for secret operators")
    })
}

/// Candidate paths look like `some/path` or `some/path:key`; a bare word with
/// neither a slash nor a colon reads as a literal default rather than a path.
/// This is the last-argument-looks-like-path heuristic: good enough for the
/// common case, but a non-literal or oddly-shaped last argument can fool it.
fn looks_like_path(s: &str) -> bool {
    s.contains('/') || s.contains(':')
}

fn resolve_string_args(ev: &mut Evaluator, name: &str, args: &[Expression]) -> Result<Vec<String>, EvalError> {
    args.iter()
        .enumerate()
        .map(|(i, a)| {
            let v = resolve_arg(ev, a)?;
            v.as_str()
                .map(str::to_string)
                .ok_or_else(|| EvalError::type_mismatch(name, "a string", v.type_name().as_str(), i))
        })
        .collect()
}

/// Splits a resolved argument list into secret-path candidates and an
/// optional trailing default, per the last-argument heuristic above.
fn split_has_default(mut resolved: Vec<String>) -> (Vec<String>, Option<String>) {
    if resolved.len() > 1 && !looks_like_path(resolved.last().unwrap()) {
        let default = resolved.pop();
        (resolved, default)
    } else {
        (resolved, None)
    }
}

/// One candidate, split on its optional `path:key` form; semicolons inside a
/// single candidate expand into further sub-candidates tried in order.
fn expand_candidates(candidates: &[String]) -> Vec<String> {
    candidates.iter().flat_map(|c| c.split(';').map(str::to_string)).collect()
}

fn split_path_key(candidate: &str) -> (String, Option<String>) {
    match candidate.split_once(':') {
        Some((path, key)) => (path.to_string(), Some(key.to_string())),
        None => (candidate.to_string(), None),
    }
}

fn project_key(value: Value, key: Option<&str>) -> Value {
    match (value, key) {
        (Value::Map(m), Some(k)) => m.get(&Value::String(k.to_string())).cloned().unwrap_or(Value::Null),
        (other, _) => other,
    }
}

/// Looks up one backend path, honoring the skip flag and the backend's own
/// cache before falling through to a live `Backend::lookup`.
fn lookup_one(
    ev: &Evaluator,
    backend_name: &str,
    backend: &Arc<dyn Backend>,
    kind: &str,
    candidate: &str,
) -> Result<Value, EvalError> {
    let (path, key) = split_path_key(candidate);
    let target = ev.current_target().unwrap_or("default").to_string();

    if skip_backends() {
        return Ok(project_key(Value::String(REDACTED.to_string()), key.as_deref()));
    }
    if let Some(cached) = backend.get_cache(&target, kind, &path) {
        return Ok(project_key(cached, key.as_deref()));
    }

    let backend = Arc::clone(backend);
    let target_for_lookup = target.clone();
    let kind_owned = kind.to_string();
    let path_owned = path.clone();
    let result = bridge_runtime().block_on(async move { backend.lookup(&target_for_lookup, &kind_owned, &path_owned).await });

    match result {
        Ok(value) => {
            backend.set_cache(&target, kind, &path, value.clone());
            Ok(project_key(value, key.as_deref()))
        }
        Err(e) => Err(EvalError::backend(backend_name, &target, e.message, e.missing_key)),
    }
}

/// Tries each expanded candidate in order; the first successful lookup wins.
/// If every candidate fails, a literal default (when present) is returned,
/// otherwise the last candidate's error propagates.
fn try_candidates(
    ev: &Evaluator,
    backend_name: &str,
    kind: &str,
    candidates: &[String],
    default: Option<String>,
) -> Result<Response, EvalError> {
    let backend = ev
        .backends()
        .get(backend_name)
        .ok_or_else(|| EvalError::backend(backend_name, "<none>", "no backend configured for this name", false))?;

    let expanded = expand_candidates(candidates);
    let mut last_err = None;
    for candidate in &expanded {
        match lookup_one(ev, backend_name, &backend, kind, candidate) {
            Ok(v) => return Ok(Response::replace(v)),
            Err(e) => last_err = Some(e),
        }
    }
    match default {
        Some(d) => Ok(Response::replace(Value::String(d))),
        None => Err(last_err.unwrap_or_else(|| EvalError::backend(backend_name, "<none>", "no candidates given", false))),
    }
}

fn secret_op(ev: &mut Evaluator, args: &[Expression], name: &'static str, backend_name: &'static str, kind: &'static str) -> Result<Response, EvalError> {
    if args.is_empty() {
        return Err(EvalError::arity_error(name, "at least 1", 0));
    }
    let resolved = resolve_string_args(ev, name, args)?;
    let (candidates, default) = split_has_default(resolved);
    try_candidates(ev, backend_name, kind, &candidates, default)
}

/// Vault secret lookup. Supports `@target`, a semicolon-separated multi-path
/// form, a multi-argument try-form, and (structurally, via `||`) a fallback
/// literal.
#[operator(name = "vault", phase = "Eval")]
pub fn vault(ev: &mut Evaluator, args: &[Expression]) -> Result<Response, EvalError> {
    secret_op(ev, args, "vault", "vault", "secret")
}

/// AWS Systems Manager parameter store lookup.
#[operator(name = "awsparam", phase = "Eval")]
pub fn awsparam(ev: &mut Evaluator, args: &[Expression]) -> Result<Response, EvalError> {
    secret_op(ev, args, "awsparam", "awsparam", "param")
}

/// AWS Secrets Manager lookup.
#[operator(name = "awssecret", phase = "Eval")]
pub fn awssecret(ev: &mut Evaluator, args: &[Expression]) -> Result<Response, EvalError> {
    secret_op(ev, args, "awssecret", "awssecret", "secret")
}

/// NATS key-value store lookup.
#[operator(name = "nats", phase = "Eval")]
pub fn nats(ev: &mut Evaluator, args: &[Expression]) -> Result<Response, EvalError> {
    secret_op(ev, args, "nats", "nats", "kv")
}

/// Each of the first N-1 arguments is a candidate Vault path tried in order;
/// the last argument is always the default, never a heuristic guess.
#[operator(name = "vault-try", phase = "Eval")]
pub fn vault_try(ev: &mut Evaluator, args: &[Expression]) -> Result<Response, EvalError> {
    if args.len() < 2 {
        return Err(EvalError::arity_error("vault-try", "at least 2", args.len()));
    }
    let resolved = resolve_string_args(ev, "vault-try", args)?;
    let (candidates, default) = resolved.split_at(resolved.len() - 1);
    try_candidates(ev, "vault", "secret", candidates, default.first().cloned())
}
