//! Final cleanup pass over a built record.

use serde_json::Value;

/// Recursively drop object entries that carry nothing: `null`, `""`, or an
/// object that is empty once its own children were pruned.
///
/// Arrays are left as they are; their elements were built deliberately.
pub fn prune_empty(value: &mut Value) {
    if let Value::Object(map) = value {
        for child in map.values_mut() {
            prune_empty(child);
        }
        map.retain(|_, child| !is_blank(child));
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}
