use serde_json::Value;

/// Resolve a dot-delimited path against a JSON value.
///
/// Each segment descends into an object member of that name (or an array
/// element by index). When a segment has no match, the rest of the path,
/// dots included, is tried as one literal key on the current object. This
/// covers provider keys that contain dots themselves:
///
/// ```
/// use serde_json::json;
/// use finboard_core::fields::resolve;
///
/// let quote = json!({"Global Quote": {"05. price": "100.1"}});
/// assert_eq!(resolve(&quote, "Global Quote.05. price"), Some(&json!("100.1")));
/// ```
///
/// Returns `None` for an empty path, a null root, a null met before the
/// last segment, or any path that does not match.
pub fn resolve<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    if path.is_empty() || root.is_null() {
        return None;
    }

    let mut current = root;
    let mut offset = 0;
    for segment in path.split('.') {
        if current.is_null() {
            return None;
        }
        match child(current, segment) {
            Some(next) => current = next,
            None => return child(current, &path[offset..]),
        }
        offset += segment.len() + 1;
    }

    Some(current)
}

fn child<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
    match value {
        Value::Object(map) => map.get(key),
        Value::Array(items) => key.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    }
}
