use relaxed_json::{json, parse_with, ParseOptions, Value};
use std::cell::RefCell;

fn odd(v: &Value) -> bool {
    matches!(v, Value::Num(n) if (*n as i64) % 2 != 0)
}

#[test]
fn test_deletion_semantics() {
    // the reference yields {"bar":2} for a reviver dropping odd numbers
    let drop_odd = |_k: &str, v: Value| if odd(&v) { None } else { Some(v) };
    let parsed = parse_with(
        r#"{"foo":1,"bar":2,"quux":3}"#,
        ParseOptions::RELAXED.reviver(&drop_odd),
    )
    .unwrap();
    assert_eq!(parsed.value.unwrap(), json!({"bar": 2}));
}

#[test]
fn test_array_deletion_closes_ranks() {
    let drop_odd = |_k: &str, v: Value| if odd(&v) { None } else { Some(v) };
    let parsed = parse_with("[1, 2, 3, 4]", ParseOptions::RELAXED.reviver(&drop_odd)).unwrap();
    assert_eq!(parsed.value.unwrap(), json!([2, 4]));
}

#[test]
fn test_deletion_keys_are_original_indices() {
    // the reviver sees pre-deletion positions; compaction happens after
    let log = RefCell::new(Vec::new());
    let drop_first = |k: &str, v: Value| {
        log.borrow_mut().push(k.to_string());
        if k == "0" {
            None
        } else {
            Some(v)
        }
    };
    let parsed = parse_with("[10, 11, 12]", ParseOptions::RELAXED.reviver(&drop_first)).unwrap();
    assert_eq!(parsed.value.unwrap(), json!([11, 12]));
    assert_eq!(log.into_inner(), vec!["0", "1", "2", ""]);
}

#[test]
fn test_call_sequence() {
    // children before parents, array indices ascending and stringified,
    // object members in insertion order, the root last under ""
    let log = RefCell::new(Vec::new());
    let spy = |k: &str, v: Value| {
        log.borrow_mut().push((k.to_string(), v.clone()));
        Some(v)
    };
    let parsed = parse_with(
        r#"{"a": [1, 2], "b": {"c": 3}}"#,
        ParseOptions::RELAXED.reviver(&spy),
    )
    .unwrap();
    let want_root = json!({"a": [1, 2], "b": {"c": 3}});
    assert_eq!(parsed.value.unwrap(), want_root);
    assert_eq!(
        log.into_inner(),
        vec![
            ("0".to_string(), json!(1)),
            ("1".to_string(), json!(2)),
            ("a".to_string(), json!([1, 2])),
            ("c".to_string(), json!(3)),
            ("b".to_string(), json!({"c": 3})),
            ("".to_string(), want_root),
        ]
    );
}

#[test]
fn test_replacement() {
    let stringify_nums = |_k: &str, v: Value| match v {
        Value::Num(n) => Some(Value::Str(n.to_string())),
        other => Some(other),
    };
    let parsed = parse_with(
        "[1, {\"two\": 2}]",
        ParseOptions::RELAXED.reviver(&stringify_nums),
    )
    .unwrap();
    assert_eq!(parsed.value.unwrap(), json!(["1", {"two": "2"}]));
}

#[test]
fn test_parent_sees_revived_children() {
    // by the time a container is revived its children are already replaced
    let fold = |k: &str, v: Value| {
        if k.is_empty() {
            return Some(v);
        }
        match v {
            Value::Array(items) => {
                let total: f64 = items.iter().filter_map(Value::as_f64).sum();
                Some(Value::Num(total))
            }
            Value::Num(n) => Some(Value::Num(n + 1.0)),
            other => Some(other),
        }
    };
    let parsed = parse_with("[[1, 2], [3]]", ParseOptions::RELAXED.reviver(&fold)).unwrap();
    // inner arrays fold over incremented leaves, the root stays an array
    assert_eq!(parsed.value.unwrap(), json!([5, 4]));
}

#[test]
fn test_root_key_and_deletion() {
    let log = RefCell::new(Vec::new());
    let drop_root = |k: &str, _v: Value| {
        log.borrow_mut().push(k.to_string());
        None
    };
    let parsed = parse_with("5", ParseOptions::RELAXED.reviver(&drop_root)).unwrap();
    assert_eq!(parsed.value, None);
    assert_eq!(log.into_inner(), vec!["".to_string()]);

    let replace_root = |k: &str, v: Value| {
        if k.is_empty() {
            Some(json!("done"))
        } else {
            Some(v)
        }
    };
    let parsed = parse_with("[1, 2]", ParseOptions::RELAXED.reviver(&replace_root)).unwrap();
    assert_eq!(parsed.value.unwrap(), json!("done"));
}

#[test]
fn test_no_reviver_is_identity() {
    let parsed = parse_with("[1, {\"a\": null}]", ParseOptions::RELAXED).unwrap();
    assert_eq!(parsed.value.unwrap(), json!([1, {"a": null}]));
}
