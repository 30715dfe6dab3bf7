// ABOUTME: Reference paths (cursors) through the document tree

use crate::error::{EvalError, SyntaxError};
use crate::value::Value;
use std::fmt;

/// One step of a `Cursor`: a mapping key or a list index.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    Key(String),
    Index(usize),
}

/// An ordered path through the document tree, segment by segment. Resolves
/// against a root `Value` by walking each segment in turn; a missing segment
/// fails locally at the call site that asked for it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Cursor {
    pub segments: Vec<Segment>,
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, seg) in self.segments.iter().enumerate() {
            if i > 0 {
                write!(f, ".")?;
            }
            match seg {
                Segment::Key(k) => write!(f, "{}", k)?,
                Segment::Index(n) => write!(f, "{}", n)?,
            }
        }
        Ok(())
    }
}

impl Cursor {
    pub fn new(segments: Vec<Segment>) -> Self {
        Cursor { segments }
    }

    pub fn root() -> Self {
        Cursor { segments: vec![] }
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Is `self` a prefix of (or equal to) `other`? Used to build dependency
    /// edges: a call site at path P depends on a call site at path Q whenever
    /// Q is a prefix of a cursor P reads.
    pub fn is_prefix_of(&self, other: &Cursor) -> bool {
        if self.segments.len() > other.segments.len() {
            return false;
        }
        self.segments
            .iter()
            .zip(other.segments.iter())
            .all(|(a, b)| a == b)
    }

    pub fn parent(&self) -> Option<Cursor> {
        if self.segments.is_empty() {
            return None;
        }
        Some(Cursor {
            segments: self.segments[..self.segments.len() - 1].to_vec(),
        })
    }

    pub fn join(&self, seg: Segment) -> Cursor {
        let mut segments = self.segments.clone();
        segments.push(seg);
        Cursor { segments }
    }

    pub fn last(&self) -> Option<&Segment> {
        self.segments.last()
    }

    /// Parse a dot-separated reference path. A segment is either an identifier
    /// (`[A-Za-z_][A-Za-z0-9_.-]*` with no embedded dot) or a non-negative
    /// decimal index; a leading `$` segment means "document root" and is
    /// dropped (it carries no path information of its own).
    pub fn parse(input: &str) -> Result<Cursor, SyntaxError> {
        let mut segments = Vec::new();
        for (i, part) in input.split('.').enumerate() {
            if part.is_empty() {
                return Err(SyntaxError::new(
                    "empty path segment",
                    i,
                    input.to_string(),
                ));
            }
            if part == "$" {
                continue;
            }
            if let Ok(idx) = part.parse::<usize>() {
                segments.push(Segment::Index(idx));
            } else {
                segments.push(Segment::Key(part.to_string()));
            }
        }
        Ok(Cursor { segments })
    }

    /// Replace any `$NAME`-shaped key segment with the value of the `NAME`
    /// process environment variable, per the argument-resolution contract's
    /// "expand env vars in c" step. A missing variable leaves the segment
    /// text as-is (resolution will then fail as an ordinary not-found).
    pub fn expand_env(&self) -> Cursor {
        let segments = self
            .segments
            .iter()
            .map(|seg| match seg {
                Segment::Key(k) if k.starts_with('$') => {
                    let name = &k[1..];
                    match std::env::var(name) {
                        Ok(v) => Segment::Key(v),
                        Err(_) => seg.clone(),
                    }
                }
                other => other.clone(),
            })
            .collect();
        Cursor { segments }
    }

    pub fn resolve<'a>(&self, root: &'a Value) -> Result<&'a Value, EvalError> {
        let mut current = root;
        for seg in &self.segments {
            current = resolve_segment(current, seg, self)?;
        }
        Ok(current)
    }

    /// Like `resolve`, but returns a mutable reference so the evaluator can
    /// overwrite the leaf in place when applying a `Replace` response.
    pub fn resolve_mut<'a>(&self, root: &'a mut Value) -> Result<&'a mut Value, EvalError> {
        let mut current = root;
        for seg in &self.segments {
            current = resolve_segment_mut(current, seg, self)?;
        }
        Ok(current)
    }
}

fn resolve_segment<'a>(value: &'a Value, seg: &Segment, full: &Cursor) -> Result<&'a Value, EvalError> {
    match (value, seg) {
        (Value::Map(m), Segment::Key(k)) => m
            .get(&Value::String(k.clone()))
            .ok_or_else(|| EvalError::NotFound(full.to_string())),
        (Value::List(items), Segment::Index(i)) => items
            .get(*i)
            .ok_or_else(|| EvalError::NotFound(full.to_string())),
        (Value::List(items), Segment::Key(name)) => items
            .iter()
            .find(|item| {
                item.as_map()
                    .and_then(|m| m.get(&Value::String("name".to_string())))
                    .and_then(|v| v.as_str())
                    == Some(name.as_str())
            })
            .ok_or_else(|| EvalError::NotFound(full.to_string())),
        _ => Err(EvalError::NotFound(full.to_string())),
    }
}

fn resolve_segment_mut<'a>(
    value: &'a mut Value,
    seg: &Segment,
    full: &Cursor,
) -> Result<&'a mut Value, EvalError> {
    match (value, seg) {
        (Value::Map(m), Segment::Key(k)) => m
            .get_mut(&Value::String(k.clone()))
            .ok_or_else(|| EvalError::NotFound(full.to_string())),
        (Value::List(items), Segment::Index(i)) => items
            .get_mut(*i)
            .ok_or_else(|| EvalError::NotFound(full.to_string())),
        (Value::List(items), Segment::Key(name)) => items
            .iter_mut()
            .find(|item| {
                item.as_map()
                    .and_then(|m| m.get(&Value::String("name".to_string())))
                    .and_then(|v| v.as_str())
                    == Some(name.as_str())
            })
            .ok_or_else(|| EvalError::NotFound(full.to_string())),
        _ => Err(EvalError::NotFound(full.to_string())),
    }
}
