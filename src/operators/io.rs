// ABOUTME: file / load — read file contents as a string, or parse them as a YAML document

use crate::error::EvalError;
use crate::evaluator::Evaluator;
use crate::expr::Expression;
use crate::operators::{resolve_arg, Response};
use crate::value::Value;
use graft_macros::operator;
use std::path::{Path, PathBuf};

fn resolve_path(raw: &str) -> PathBuf {
    let path = Path::new(raw);
    if path.is_absolute() {
        return path.to_path_buf();
    }
    if let Ok(base) = std::env::var("GRAFT_FILE_BASE_PATH") {
        return Path::new(&base).join(path);
    }
    path.to_path_buf()
}

fn read_file(function: &str, raw: &str) -> Result<String, EvalError> {
    let path = resolve_path(raw);
    std::fs::read_to_string(&path)
        .map_err(|e| EvalError::runtime(function, format!("failed to read `{}`: {}", path.display(), e)))
}

/// Fetches `url` over HTTP(S) and returns the response body as a string,
/// the same way the teacher's `sandbox.rs` drives `ureq::get(url).call()`.
fn fetch_http(function: &str, url: &str) -> Result<String, EvalError> {
    ureq::get(url)
        .call()
        .map_err(|e| EvalError::runtime(function, format!("http request to `{}` failed: {}", url, e)))?
        .into_string()
        .map_err(|e| EvalError::runtime(function, format!("failed to read response body from `{}`: {}", url, e)))
}

/// Loads file contents as a string. With two arguments, the first is a base
/// path joined with the second before resolution. Relative paths fall back to
/// the `GRAFT_FILE_BASE_PATH` process environment variable when it is set.
#[operator(name = "file", phase = "Eval")]
pub fn file(ev: &mut Evaluator, args: &[Expression]) -> Result<Response, EvalError> {
    if args.is_empty() || args.len() > 2 {
        return Err(EvalError::arity_error("file", "1 or 2", args.len()));
    }
    let target = if args.len() == 2 {
        let base = resolve_arg(ev, &args[0])?;
        let base_str = base
            .as_str()
            .ok_or_else(|| EvalError::type_mismatch("file", "a string base path", base.type_name().as_str(), 0))?;
        let rest = resolve_arg(ev, &args[1])?;
        let rest_str = rest
            .as_str()
            .ok_or_else(|| EvalError::type_mismatch("file", "a string path", rest.type_name().as_str(), 1))?;
        Path::new(base_str).join(rest_str).to_string_lossy().into_owned()
    } else {
        let v = resolve_arg(ev, &args[0])?;
        v.as_str()
            .ok_or_else(|| EvalError::type_mismatch("file", "a string path", v.type_name().as_str(), 0))?
            .to_string()
    };
    read_file("file", &target).map(|contents| Response::replace(Value::String(contents)))
}

/// Like `file`, but parses the contents as YAML. Accepts local paths and
/// `http(s)://` URLs, fetched the way `file`/`sandbox.rs` drive their I/O.
/// The parsed root must be a map or a list.
#[operator(name = "load", phase = "Eval")]
pub fn load(ev: &mut Evaluator, args: &[Expression]) -> Result<Response, EvalError> {
    if args.len() != 1 {
        return Err(EvalError::arity_error("load", "1", args.len()));
    }
    let v = resolve_arg(ev, &args[0])?;
    let target = v
        .as_str()
        .ok_or_else(|| EvalError::type_mismatch("load", "a string path", v.type_name().as_str(), 0))?;

    let contents = if target.starts_with("http://") || target.starts_with("https://") {
        fetch_http("load", target)?
    } else {
        read_file("load", target)?
    };
    let yaml_value: serde_yaml::Value = serde_yaml::from_str(&contents)
        .map_err(|e| EvalError::runtime("load", format!("invalid yaml in `{}`: {}", target, e)))?;
    let parsed: Value = yaml_value
        .try_into()
        .map_err(|e| EvalError::runtime("load", format!("unsupported yaml in `{}`: {}", target, e)))?;
    match parsed {
        Value::Map(_) | Value::List(_) => Ok(Response::replace(parsed)),
        other => Err(EvalError::type_mismatch("load", "a map or list document root", other.type_name().as_str(), 0)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::BackendRegistry;
    use crate::operators::OperatorRegistry;
    use crate::types::TypeRegistry;
    use std::io::Write;
    use std::sync::Arc;

    fn evaluator() -> Evaluator {
        Evaluator::new(
            Value::Null,
            Arc::new(OperatorRegistry::new()),
            Arc::new(TypeRegistry::new()),
            Arc::new(BackendRegistry::new()),
        )
    }

    #[test]
    fn test_file_reads_contents() {
        let mut tmp = std::env::temp_dir();
        tmp.push(format!("graft-expr-io-test-{}.txt", std::process::id()));
        let mut f = std::fs::File::create(&tmp).unwrap();
        writeln!(f, "hello world").unwrap();

        let mut ev = evaluator();
        let args = vec![Expression::Literal(Value::String(tmp.to_string_lossy().into_owned()))];
        let result = file(&mut ev, &args).unwrap().value;
        assert_eq!(result, Value::String("hello world\n".into()));

        std::fs::remove_file(&tmp).ok();
    }

    #[test]
    fn test_file_missing_errors() {
        let mut ev = evaluator();
        let args = vec![Expression::Literal(Value::String("/nonexistent/path/graft-expr".into()))];
        assert!(file(&mut ev, &args).is_err());
    }

    #[test]
    fn test_load_parses_yaml_map() {
        let mut tmp = std::env::temp_dir();
        tmp.push(format!("graft-expr-io-test-{}.yml", std::process::id()));
        let mut f = std::fs::File::create(&tmp).unwrap();
        writeln!(f, "a: 1\nb: 2").unwrap();

        let mut ev = evaluator();
        let args = vec![Expression::Literal(Value::String(tmp.to_string_lossy().into_owned()))];
        let result = load(&mut ev, &args).unwrap().value;
        assert!(matches!(result, Value::Map(_)));

        std::fs::remove_file(&tmp).ok();
    }

    #[test]
    fn test_load_http_url_surfaces_request_failure() {
        // Port 1 (tcpmux) has nothing listening in any test environment, so
        // this deterministically exercises the fetch-and-fail path without
        // depending on outbound network access being available at all.
        let mut ev = evaluator();
        let args = vec![Expression::Literal(Value::String("http://127.0.0.1:1/config.yml".into()))];
        assert!(load(&mut ev, &args).is_err());
    }

    #[test]
    fn test_load_rejects_scalar_root() {
        let mut tmp = std::env::temp_dir();
        tmp.push(format!("graft-expr-io-test-scalar-{}.yml", std::process::id()));
        let mut f = std::fs::File::create(&tmp).unwrap();
        writeln!(f, "just a string").unwrap();

        let mut ev = evaluator();
        let args = vec![Expression::Literal(Value::String(tmp.to_string_lossy().into_owned()))];
        assert!(load(&mut ev, &args).is_err());

        std::fs::remove_file(&tmp).ok();
    }
}
