// ABOUTME: Leaf scan — walks the document tree and registers (( ... )) call sites

use super::{CallSite, CallSiteStatus};
use crate::cursor::{Cursor, Segment};
use crate::expr::Expression;
use crate::operators::Phase;
use crate::parser::parse;
use crate::value::Value;

/// Scan every leaf of `root` in document order, registering a `CallSite` for
/// each string whose trimmed content matches `^\(\(.*\)\)$`. A leaf that
/// doesn't match is left untouched — it is not a call site.
pub fn collect_call_sites(root: &Value) -> Vec<CallSite> {
    let mut sites = Vec::new();
    walk(root, &Cursor::root(), &mut sites);
    sites
}

fn walk(value: &Value, path: &Cursor, sites: &mut Vec<CallSite>) {
    match value {
        Value::String(s) => {
            if let Some(fragment) = call_site_fragment(s) {
                if let Ok(expr) = parse(fragment) {
                    let phase = phase_of(&expr);
                    sites.push(CallSite {
                        path: path.clone(),
                        expr,
                        phase,
                        status: CallSiteStatus::Ready,
                    });
                }
            }
        }
        Value::List(items) => {
            for (i, item) in items.iter().enumerate() {
                walk(item, &path.join(Segment::Index(i)), sites);
            }
        }
        Value::Map(map) => {
            for (k, v) in map {
                if let Some(key) = k.as_str() {
                    walk(v, &path.join(Segment::Key(key.to_string())), sites);
                }
            }
        }
        _ => {}
    }
}

/// `((` ... `))` with any amount of free whitespace inside, trimmed first.
/// Returns the interior (without the delimiters) ready for the parser.
fn call_site_fragment(s: &str) -> Option<&str> {
    let trimmed = s.trim();
    let inner = trimmed.strip_prefix("((")?.strip_suffix("))")?;
    Some(inner)
}

/// An `OperatorCall` at the root of the expression runs in whatever phase
/// its operator declares (the synthesized calls the parser produces for
/// infix forms, `+`, `&&`, `?:`, etc. all declare `Eval`, matching spec.md's
/// built-in operator table). Any other root shape — a bare reference, an
/// env var, a literal, or an un-reduced `LogicalOr` — has no operator to
/// consult, so it always runs in `Eval`.
fn phase_of(expr: &Expression) -> Phase {
    match expr {
        Expression::OperatorCall { name, .. } => phase_by_name(name),
        _ => Phase::Eval,
    }
}

/// Phases for the handful of operators collection needs to know about before
/// a full `OperatorRegistry` is available (phases are intrinsic to the
/// operator name, not state, so this mirrors the registry's own
/// `Operator::phase` without requiring one be constructed just to scan
/// leaves). Defaults to `Eval`, which matches every built-in operator except
/// `sort` (Merge) and `param` (Param).
fn phase_by_name(name: &str) -> Phase {
    match name {
        "sort" => Phase::Merge,
        "param" => Phase::Param,
        _ => Phase::Eval,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;

    #[test]
    fn test_collects_leaf_matching_delimiter() {
        let mut m = IndexMap::new();
        m.insert(Value::String("a".into()), Value::String("(( 1 + 1 ))".into()));
        let sites = collect_call_sites(&Value::Map(m));
        assert_eq!(sites.len(), 1);
        assert_eq!(sites[0].path.to_string(), "a");
    }

    #[test]
    fn test_ignores_non_matching_leaf() {
        let mut m = IndexMap::new();
        m.insert(Value::String("a".into()), Value::String("plain string".into()));
        let sites = collect_call_sites(&Value::Map(m));
        assert!(sites.is_empty());
    }

    #[test]
    fn test_walks_nested_lists_and_maps() {
        let mut inner = IndexMap::new();
        inner.insert(Value::String("x".into()), Value::String("(( grab y ))".into()));
        let root = Value::List(vec![Value::Map(inner)]);
        let sites = collect_call_sites(&root);
        assert_eq!(sites.len(), 1);
        assert_eq!(sites[0].path.to_string(), "0.x");
    }

    #[test]
    fn test_sort_declared_merge_phase() {
        let mut m = IndexMap::new();
        m.insert(Value::String("__sort_names".into()), Value::String("(( sort ))".into()));
        let sites = collect_call_sites(&Value::Map(m));
        assert_eq!(sites[0].phase, Phase::Merge);
    }
}
