// ABOUTME: Applies a Response to the tree and runs the prune/sort post-actions

use super::CallSiteStatus;
use crate::cursor::{Cursor, Segment};
use crate::operators::{Action, Response};
use crate::types::TypeRegistry;
use crate::value::Value;
use std::cmp::Ordering;

/// Write a call site's `Response` back into the tree: `Replace` overwrites
/// the leaf; `Inject` merges the (must-be-map) value into the enclosing
/// mapping and removes the call site's own key.
pub fn apply_response(root: &mut Value, path: &Cursor, response: Response) -> CallSiteStatus {
    match response.action {
        Action::Replace => {
            if let Ok(slot) = path.resolve_mut(root) {
                *slot = response.value;
            }
            CallSiteStatus::Replaced
        }
        Action::Inject => {
            if let Value::Map(injected) = response.value {
                match path.parent() {
                    Some(parent_path) => {
                        if let Ok(Value::Map(parent_map)) = parent_path.resolve_mut(root) {
                            if let Some(Segment::Key(k)) = path.last() {
                                parent_map.shift_remove(&Value::String(k.clone()));
                            }
                            for (k, v) in injected {
                                parent_map.insert(k, v);
                            }
                        }
                    }
                    None => {
                        if let Value::Map(root_map) = root {
                            for (k, v) in injected {
                                root_map.insert(k, v);
                            }
                        }
                    }
                }
            }
            CallSiteStatus::Injected
        }
    }
}

/// Remove every pruned path from the tree. Paths are processed deepest- and
/// highest-index-first so that removing one element never shifts the index
/// a still-pending removal was computed against.
pub fn apply_prunes(root: &mut Value, prune_list: &mut Vec<Cursor>) {
    prune_list.sort_by(|a, b| compare_paths(b, a));
    for path in prune_list.drain(..) {
        remove_path(root, &path);
    }
}

fn remove_path(root: &mut Value, path: &Cursor) {
    let Some(parent_path) = path.parent() else {
        return; // pruning the document root itself is a no-op
    };
    let Ok(parent) = parent_path.resolve_mut(root) else {
        return;
    };
    match (parent, path.last()) {
        (Value::Map(m), Some(Segment::Key(k))) => {
            m.shift_remove(&Value::String(k.clone()));
        }
        (Value::List(items), Some(Segment::Index(i))) => {
            if *i < items.len() {
                items.remove(*i);
            }
        }
        (Value::List(items), Some(Segment::Key(name))) => {
            if let Some(pos) = items.iter().position(|item| {
                item.as_map()
                    .and_then(|m| m.get(&Value::String("name".to_string())))
                    .and_then(|v| v.as_str())
                    == Some(name.as_str())
            }) {
                items.remove(pos);
            }
        }
        _ => {}
    }
}

fn compare_segment(a: &Segment, b: &Segment) -> Ordering {
    match (a, b) {
        (Segment::Index(x), Segment::Index(y)) => x.cmp(y),
        (Segment::Key(x), Segment::Key(y)) => x.cmp(y),
        (Segment::Key(_), Segment::Index(_)) => Ordering::Less,
        (Segment::Index(_), Segment::Key(_)) => Ordering::Greater,
    }
}

fn compare_paths(a: &Cursor, b: &Cursor) -> Ordering {
    for (x, y) in a.segments.iter().zip(b.segments.iter()) {
        let o = compare_segment(x, y);
        if o != Ordering::Equal {
            return o;
        }
    }
    a.segments.len().cmp(&b.segments.len())
}

/// Sort every collected list path. List-of-maps sorts by `key` (defaulting
/// to `"name"`); a plain scalar list sorts by its own elements.
pub fn apply_sorts(root: &mut Value, sort_list: &[(Cursor, Option<String>)], types: &TypeRegistry) {
    for (path, key) in sort_list {
        if let Ok(Value::List(items)) = path.resolve_mut(root) {
            sort_in_place(items, key.as_deref(), types);
        }
    }
}

fn sort_in_place(items: &mut [Value], key: Option<&str>, types: &TypeRegistry) {
    let key_name = key.unwrap_or("name");
    items.sort_by(|a, b| {
        let (ka, kb) = match (a, b) {
            (Value::Map(ma), Value::Map(mb)) => (
                ma.get(&Value::String(key_name.to_string())).cloned().unwrap_or(Value::Null),
                mb.get(&Value::String(key_name.to_string())).cloned().unwrap_or(Value::Null),
            ),
            _ => (a.clone(), b.clone()),
        };
        types.compare(&ka, &kb).unwrap_or(Ordering::Equal)
    });
}
