// ABOUTME: Black-box runs of the six numbered scenarios from spec.md's §8 "end-to-end scenarios"

use graft_expr::{BackendRegistry, Cursor, Evaluator, OperatorRegistry, TypeRegistry, Value};
use std::sync::Arc;

fn run_yaml(src: &str) -> Value {
    let yaml: serde_yaml::Value = serde_yaml::from_str(src).expect("valid yaml fixture");
    let root = Value::try_from(yaml).expect("yaml convertible to Value");
    let mut ev = Evaluator::new(
        root,
        Arc::new(OperatorRegistry::new()),
        Arc::new(TypeRegistry::new()),
        Arc::new(BackendRegistry::new()),
    );
    match ev.run() {
        Ok(v) => v,
        Err(errs) => panic!("evaluation failed: {:?}", errs.0),
    }
}

fn at<'a>(doc: &'a Value, path: &str) -> &'a Value {
    Cursor::parse(path).unwrap().resolve(doc).unwrap()
}

#[test]
fn scenario_1_arithmetic_precedence_and_ternary() {
    let doc = run_yaml(
        r#"
        a: "(( 2 + 3 * 4 ))"
        b: "(( (2+3)*4 ))"
        c: "(( 1 + 1 == 2 ? 10*2 : 5 ))"
        "#,
    );
    // This crate keeps integer arithmetic as Int when it doesn't overflow
    // rather than promoting every numeric result to Float (see DESIGN.md);
    // the magnitudes match spec.md's literal 14.0/20.0/20.0 either way.
    assert_eq!(at(&doc, "a"), &Value::Int(14));
    assert_eq!(at(&doc, "b"), &Value::Int(20));
    assert_eq!(at(&doc, "c"), &Value::Int(20));
}

#[test]
fn scenario_2_fallback_vs_logical_or() {
    let doc = run_yaml(
        r#"
        debug: false
        name: "test"
        empty: ""
        enabled: true
        r1: "(( debug || name == \"test\" ))"
        r2: "(( (enabled && !debug) || empty ))"
        "#,
    );
    // `||` is fallback, not boolean-or: `debug` resolves to `false` without
    // erroring, so that value is returned as-is rather than being combined
    // with the right-hand comparison.
    assert_eq!(at(&doc, "r1"), &Value::Bool(false));
    assert_eq!(at(&doc, "r2"), &Value::Bool(true));
}

#[test]
fn scenario_3_grab_and_flattening() {
    let doc = run_yaml(
        r#"
        a: [1, 2]
        b: [3, 4]
        c: 5
        d: "(( grab a b c ))"
        "#,
    );
    assert_eq!(
        at(&doc, "d"),
        &Value::List(vec![
            Value::Int(1),
            Value::Int(2),
            Value::Int(3),
            Value::Int(4),
            Value::Int(5),
        ])
    );
}

#[test]
fn scenario_4_empty_on_type_names() {
    let doc = run_yaml(
        r#"
        t: "hash"
        x: "(( empty t ))"
        y: "(( empty \"array\" ))"
        "#,
    );
    assert_eq!(at(&doc, "x").as_map().unwrap().len(), 0);
    assert_eq!(at(&doc, "y"), &Value::List(vec![]));
}

#[test]
fn scenario_5_nested_operator_inside_concat_inside_base64() {
    let doc = run_yaml(
        r#"
        d: "alice,bob"
        e: "(( base64 (concat \"users=\" d) ))"
        "#,
    );
    assert_eq!(at(&doc, "e"), &Value::String("dXNlcnM9YWxpY2UsYm9i".to_string()));
}

#[test]
fn scenario_6_prune_and_sort_as_post_actions() {
    let doc = run_yaml(
        r#"
        hidden: "(( prune ))"
        names:
          - name: b
          - name: a
        __sort_names: "(( sort ))"
        "#,
    );
    let m = doc.as_map().expect("root stays a map");
    assert_eq!(m.get(&Value::String("hidden".into())), None);
    assert_eq!(m.get(&Value::String("__sort_names".into())), None);
    assert_eq!(
        at(&doc, "names"),
        &Value::List(vec![
            Value::Map(IndexMapOf(vec![("name", Value::String("a".into()))])),
            Value::Map(IndexMapOf(vec![("name", Value::String("b".into()))])),
        ])
    );
}

/// Small literal-construction helper so the sorted-list assertion above
/// reads as data rather than a chain of `IndexMap::insert` calls.
#[allow(non_snake_case)]
fn IndexMapOf(pairs: Vec<(&str, Value)>) -> indexmap::IndexMap<Value, Value> {
    pairs.into_iter().map(|(k, v)| (Value::String(k.to_string()), v)).collect()
}

#[test]
fn dependency_ordering_across_call_sites() {
    let doc = run_yaml(
        r#"
        base: "(( 10 ))"
        derived: "(( base + 5 ))"
        "#,
    );
    assert_eq!(at(&doc, "derived"), &Value::Int(15));
}

#[test]
fn cycle_is_reported_and_fails_the_phase() {
    let yaml: serde_yaml::Value = serde_yaml::from_str(
        r#"
        a: "(( b ))"
        b: "(( a ))"
        "#,
    )
    .unwrap();
    let root = Value::try_from(yaml).unwrap();
    let mut ev = Evaluator::new(
        root,
        Arc::new(OperatorRegistry::new()),
        Arc::new(TypeRegistry::new()),
        Arc::new(BackendRegistry::new()),
    );
    let err = ev.run().unwrap_err();
    assert!(!err.0.is_empty());
}

#[test]
fn inject_merges_sibling_keys_and_removes_its_own_site() {
    let doc = run_yaml(
        r#"
        extra: "(( inject (grab source) ))"
        source:
          a: 1
          b: 2
        "#,
    );
    let m = doc.as_map().unwrap();
    assert_eq!(m.get(&Value::String("extra".into())), None);
    assert_eq!(at(&doc, "a"), &Value::Int(1));
    assert_eq!(at(&doc, "b"), &Value::Int(2));
}

#[test]
fn string_repetition_bound_surfaces_as_a_range_error() {
    let yaml: serde_yaml::Value = serde_yaml::from_str(r#"x: "(( \"ab\" * 10001 ))""#).unwrap();
    let root = Value::try_from(yaml).unwrap();
    let mut ev = Evaluator::new(
        root,
        Arc::new(OperatorRegistry::new()),
        Arc::new(TypeRegistry::new()),
        Arc::new(BackendRegistry::new()),
    );
    assert!(ev.run().is_err());
}

#[test]
fn division_by_zero_is_a_local_numeric_error() {
    let yaml: serde_yaml::Value = serde_yaml::from_str("x: \"(( 1 / 0 ))\"").unwrap();
    let root = Value::try_from(yaml).unwrap();
    let mut ev = Evaluator::new(
        root,
        Arc::new(OperatorRegistry::new()),
        Arc::new(TypeRegistry::new()),
        Arc::new(BackendRegistry::new()),
    );
    assert!(ev.run().is_err());
}

#[test]
fn integer_overflow_on_add_promotes_to_float() {
    let yaml: serde_yaml::Value =
        serde_yaml::from_str(&format!("x: \"(( {} + {} ))\"", i64::MAX, 1)).unwrap();
    let root = Value::try_from(yaml).unwrap();
    let mut ev = Evaluator::new(
        root,
        Arc::new(OperatorRegistry::new()),
        Arc::new(TypeRegistry::new()),
        Arc::new(BackendRegistry::new()),
    );
    let result = ev.run().unwrap();
    match at(&result, "x") {
        Value::Float(f) => assert!((*f - (i64::MAX as f64 + 1.0)).abs() < 1.0),
        other => panic!("expected overflow to promote to Float, got {:?}", other),
    }
}

#[test]
fn split_then_join_round_trips_when_no_element_contains_the_separator() {
    let doc = run_yaml(
        r#"
        s: "a,b,c"
        parts: "(( split \",\" s ))"
        rejoined: "(( join \",\" parts ))"
        "#,
    );
    assert_eq!(at(&doc, "rejoined"), &Value::String("a,b,c".to_string()));
}
