// ABOUTME: The dynamic value universe the evaluator reads, writes, and dispatches on

use indexmap::IndexMap;
use std::fmt;
use std::hash::{Hash, Hasher};

/// A value living in the document tree: the union of everything a YAML leaf
/// (or an operator's computed result) can be.
///
/// `Map` preserves insertion order (it is an `IndexMap`, not a `HashMap`) because
/// the source document's key order is part of what a reader expects back out.
#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Int(i64),
    Float(f64),
    String(String),
    Bool(bool),
    List(Vec<Value>),
    Map(IndexMap<Value, Value>),
}

/// The closed set of tags used purely for handler dispatch. Never stored
/// alongside a value; always derived from one with `Value::type_of`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperandType {
    Null,
    Int,
    Float,
    String,
    Bool,
    Map,
    List,
    Unknown,
}

impl Value {
    pub fn type_of(&self) -> OperandType {
        match self {
            Value::Null => OperandType::Null,
            Value::Int(_) => OperandType::Int,
            Value::Float(_) => OperandType::Float,
            Value::String(_) => OperandType::String,
            Value::Bool(_) => OperandType::Bool,
            Value::List(_) => OperandType::List,
            Value::Map(_) => OperandType::Map,
        }
    }

    pub fn type_name(&self) -> String {
        match self.type_of() {
            OperandType::Null => "null",
            OperandType::Int => "int",
            OperandType::Float => "float",
            OperandType::String => "string",
            OperandType::Bool => "bool",
            OperandType::Map => "map",
            OperandType::List => "list",
            OperandType::Unknown => "unknown",
        }
        .to_string()
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&IndexMap<Value, Value>> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(l) => Some(l),
            _ => None,
        }
    }

    /// The numeric value as an `f64`, if this is `Int` or `Float`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }
}

/// Truthiness per the spec: everything is truthy except null, `false`, numeric
/// zero, the empty string, the empty list, and the empty map. `&&`, `!`, `?:`,
/// and `empty` all route through this single function so they agree.
pub fn truthy(v: &Value) -> bool {
    match v {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Int(i) => *i != 0,
        Value::Float(f) => *f != 0.0,
        Value::String(s) => !s.is_empty(),
        Value::List(l) => !l.is_empty(),
        Value::Map(m) => !m.is_empty(),
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(n) => {
                if n.fract() == 0.0 && n.is_finite() && n.abs() < 1e18 {
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{}", n)
                }
            }
            Value::Bool(b) => write!(f, "{}", b),
            Value::String(s) => write!(f, "{}", s),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            Value::Map(map) => {
                write!(f, "{{")?;
                for (i, (key, value)) in map.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", key, value)?;
                }
                write!(f, "}}")
            }
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a.to_bits() == b.to_bits(),
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => {
                a.len() == b.len() && a.iter().all(|(k, v)| b.get(k) == Some(v))
            }
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Value::Null => 0u8.hash(state),
            Value::Int(i) => {
                1u8.hash(state);
                i.hash(state);
            }
            Value::Float(n) => {
                2u8.hash(state);
                n.to_bits().hash(state);
            }
            Value::String(s) => {
                3u8.hash(state);
                s.hash(state);
            }
            Value::Bool(b) => {
                4u8.hash(state);
                b.hash(state);
            }
            Value::List(items) => {
                5u8.hash(state);
                items.hash(state);
            }
            Value::Map(map) => {
                6u8.hash(state);
                // Order-independent so structurally-equal maps with different
                // insertion order still hash equal.
                let mut acc: u64 = 0;
                for (k, v) in map.iter() {
                    let mut h = std::collections::hash_map::DefaultHasher::new();
                    k.hash(&mut h);
                    v.hash(&mut h);
                    acc ^= h.finish();
                }
                acc.hash(state);
            }
        }
    }
}

/// Bridge to the document tree's on-disk shape. `load`, `stringify`, and the
/// env-var auto-parse in `operators::resolve_arg` all need to cross between
/// `serde_yaml::Value` (what a YAML parser hands back) and our own `Value`
/// (what the evaluator actually dispatches on).
impl TryFrom<serde_yaml::Value> for Value {
    type Error = String;

    fn try_from(v: serde_yaml::Value) -> Result<Self, String> {
        match v {
            serde_yaml::Value::Null => Ok(Value::Null),
            serde_yaml::Value::Bool(b) => Ok(Value::Bool(b)),
            serde_yaml::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(Value::Int(i))
                } else if let Some(f) = n.as_f64() {
                    Ok(Value::Float(f))
                } else {
                    Err(format!("unrepresentable YAML number: {:?}", n))
                }
            }
            serde_yaml::Value::String(s) => Ok(Value::String(s)),
            serde_yaml::Value::Sequence(items) => {
                let items = items
                    .into_iter()
                    .map(Value::try_from)
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Value::List(items))
            }
            serde_yaml::Value::Mapping(m) => {
                let mut out = IndexMap::with_capacity(m.len());
                for (k, v) in m {
                    out.insert(Value::try_from(k)?, Value::try_from(v)?);
                }
                Ok(Value::Map(out))
            }
            serde_yaml::Value::Tagged(tagged) => Value::try_from(tagged.value),
        }
    }
}

impl From<Value> for serde_yaml::Value {
    fn from(v: Value) -> Self {
        match v {
            Value::Null => serde_yaml::Value::Null,
            Value::Bool(b) => serde_yaml::Value::Bool(b),
            Value::Int(i) => serde_yaml::Value::Number(i.into()),
            Value::Float(f) => serde_yaml::Value::Number(f.into()),
            Value::String(s) => serde_yaml::Value::String(s),
            Value::List(items) => {
                serde_yaml::Value::Sequence(items.into_iter().map(Into::into).collect())
            }
            Value::Map(m) => {
                let mut out = serde_yaml::Mapping::with_capacity(m.len());
                for (k, v) in m {
                    out.insert(k.into(), v.into());
                }
                serde_yaml::Value::Mapping(out)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truthy() {
        assert!(!truthy(&Value::Null));
        assert!(!truthy(&Value::Bool(false)));
        assert!(truthy(&Value::Bool(true)));
        assert!(!truthy(&Value::Int(0)));
        assert!(truthy(&Value::Int(1)));
        assert!(!truthy(&Value::Float(0.0)));
        assert!(truthy(&Value::Float(0.1)));
        assert!(!truthy(&Value::String(String::new())));
        assert!(truthy(&Value::String("x".to_string())));
        assert!(!truthy(&Value::List(vec![])));
        assert!(truthy(&Value::List(vec![Value::Null])));
        assert!(!truthy(&Value::Map(IndexMap::new())));
    }

    #[test]
    fn test_display_number() {
        assert_eq!(format!("{}", Value::Int(42)), "42");
        assert_eq!(format!("{}", Value::Float(42.0)), "42");
        assert_eq!(format!("{}", Value::Float(2.5)), "2.5");
    }

    #[test]
    fn test_map_equality_is_order_independent() {
        let mut a = IndexMap::new();
        a.insert(Value::String("x".into()), Value::Int(1));
        a.insert(Value::String("y".into()), Value::Int(2));

        let mut b = IndexMap::new();
        b.insert(Value::String("y".into()), Value::Int(2));
        b.insert(Value::String("x".into()), Value::Int(1));

        assert_eq!(Value::Map(a), Value::Map(b));
    }

    #[test]
    fn test_int_and_float_are_structurally_distinct() {
        assert_ne!(Value::Int(1), Value::Float(1.0));
    }

    #[test]
    fn test_yaml_round_trip_scalars() {
        let doc = serde_yaml::from_str::<serde_yaml::Value>("42").unwrap();
        assert_eq!(Value::try_from(doc).unwrap(), Value::Int(42));

        let doc = serde_yaml::from_str::<serde_yaml::Value>("true").unwrap();
        assert_eq!(Value::try_from(doc).unwrap(), Value::Bool(true));
    }

    #[test]
    fn test_yaml_round_trip_nested() {
        let doc = serde_yaml::from_str::<serde_yaml::Value>("a:\n  - 1\n  - 2\nb: x\n").unwrap();
        let v = Value::try_from(doc).unwrap();
        let mut expected = IndexMap::new();
        expected.insert(
            Value::String("a".into()),
            Value::List(vec![Value::Int(1), Value::Int(2)]),
        );
        expected.insert(Value::String("b".into()), Value::String("x".into()));
        assert_eq!(v, Value::Map(expected));
    }

    #[test]
    fn test_value_to_yaml_back_to_value() {
        let v = Value::List(vec![Value::Int(1), Value::String("x".into())]);
        let yaml: serde_yaml::Value = v.clone().into();
        assert_eq!(Value::try_from(yaml).unwrap(), v);
    }
}
