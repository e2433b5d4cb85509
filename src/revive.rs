use crate::value::{Map, Value};

/// Post-parse transform callback: receives the member key (or the
/// stringified array index, or `""` for the root) and the already-revived
/// value. Returning `None` deletes the member from its container, the way
/// the reference primitive treats a reviver returning `undefined`. Array
/// indices handed to the callback are always the original positions; the
/// surviving elements are compacted only after the whole array has been
/// walked.
pub type Reviver<'r> = &'r dyn Fn(&str, Value) -> Option<Value>;

/// Bottom-up walk matching the reference algorithm: children are revived
/// before their container (array indices ascending, object members in
/// insertion order), and the root is revived last under the key `""`.
pub(crate) fn revive(root: Value, reviver: Reviver<'_>) -> Option<Value> {
    walk("", root, reviver)
}

fn walk(key: &str, value: Value, reviver: Reviver<'_>) -> Option<Value> {
    let value = match value {
        Value::Array(items) => {
            let mut kept = Vec::with_capacity(items.len());
            for (i, item) in items.into_iter().enumerate() {
                // deleted elements leave no hole; the rest close ranks
                if let Some(v) = walk(&i.to_string(), item, reviver) {
                    kept.push(v);
                }
            }
            Value::Array(kept)
        }
        Value::Object(members) => {
            let mut kept = Map::with_capacity(members.len());
            for (k, item) in members {
                if let Some(v) = walk(&k, item, reviver) {
                    kept.insert(k, v);
                }
            }
            Value::Object(kept)
        }
        leaf => leaf,
    };
    reviver(key, value)
}
