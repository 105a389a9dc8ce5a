use serde::Serialize;
use serde_json::Value;

use super::field_presenter::display_string;

/// Leaf previews are cut to this many characters.
pub const PREVIEW_CHARS: usize = 20;

/// One entry in the field tree of a sample response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldNode {
    /// Member name at this level.
    pub key: String,
    /// Full dot-joined path from the root.
    pub path: String,
    pub depth: usize,
    pub kind: FieldNodeKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "type")]
pub enum FieldNodeKind {
    /// A nested object, shown as a group header.
    Group { children: Vec<FieldNode> },
    /// A selectable field. Arrays are leaves too.
    Leaf { preview: String },
}

impl FieldNode {
    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, FieldNodeKind::Leaf { .. })
    }
}

/// Build the field tree of a sample response.
///
/// Objects become groups and are walked recursively. Everything else,
/// arrays included, is a selectable leaf with a short preview. A root
/// array is walked by index; a scalar root has no fields.
pub fn explore(value: &Value) -> Vec<FieldNode> {
    walk(value, "", 0)
}

fn walk(value: &Value, prefix: &str, depth: usize) -> Vec<FieldNode> {
    let entries: Vec<(String, &Value)> = match value {
        Value::Object(map) => map.iter().map(|(k, v)| (k.clone(), v)).collect(),
        Value::Array(items) if depth == 0 => items
            .iter()
            .enumerate()
            .map(|(i, v)| (i.to_string(), v))
            .collect(),
        _ => return Vec::new(),
    };

    entries
        .into_iter()
        .map(|(key, child)| {
            let path = if prefix.is_empty() {
                key.clone()
            } else {
                format!("{}.{}", prefix, key)
            };
            let kind = match child {
                Value::Object(_) => FieldNodeKind::Group {
                    children: walk(child, &path, depth + 1),
                },
                leaf => FieldNodeKind::Leaf {
                    preview: preview(leaf),
                },
            };
            FieldNode {
                key,
                path,
                depth,
                kind,
            }
        })
        .collect()
}

fn preview(value: &Value) -> String {
    display_string(value).chars().take(PREVIEW_CHARS).collect()
}

/// Flatten a field tree into its selectable leaves, in display order.
pub fn leaves(nodes: &[FieldNode]) -> Vec<&FieldNode> {
    let mut out = Vec::new();
    collect_leaves(nodes, &mut out);
    out
}

fn collect_leaves<'a>(nodes: &'a [FieldNode], out: &mut Vec<&'a FieldNode>) {
    for node in nodes {
        match &node.kind {
            FieldNodeKind::Group { children } => collect_leaves(children, out),
            FieldNodeKind::Leaf { .. } => out.push(node),
        }
    }
}

/// Add `path` to the selection, or remove it if already present.
/// Returns whether the path is selected afterwards.
pub fn toggle_field(selected: &mut Vec<String>, path: &str) -> bool {
    if let Some(index) = selected.iter().position(|p| p == path) {
        selected.remove(index);
        false
    } else {
        selected.push(path.to_string());
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::resolve;
    use serde_json::json;

    #[test]
    fn test_flat_quote() {
        let quote = json!({"c": 150.25, "d": 1.5, "dp": 1.01});
        let tree = explore(&quote);
        let paths: Vec<&str> = leaves(&tree).iter().map(|n| n.path.as_str()).collect();
        assert_eq!(paths.len(), 3);
        assert!(paths.contains(&"c") && paths.contains(&"d") && paths.contains(&"dp"));
        assert!(tree.iter().all(|n| n.depth == 0 && n.is_leaf()));
    }

    #[test]
    fn test_nested_groups_and_paths() {
        let quote = json!({"Global Quote": {"01. symbol": "IBM", "05. price": "100.1"}});
        let tree = explore(&quote);
        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].key, "Global Quote");
        assert!(!tree[0].is_leaf());

        let found = leaves(&tree);
        assert_eq!(found.len(), 2);
        for leaf in found {
            assert_eq!(leaf.depth, 1);
            assert!(leaf.path.starts_with("Global Quote."));
            assert!(resolve(&quote, &leaf.path).is_some());
        }
    }

    #[test]
    fn test_arrays_are_leaves() {
        let value = json!({"history": [1, 2, 3], "meta": {"tags": ["x", "y"]}});
        let tree = explore(&value);
        let found = leaves(&tree);
        let history = found.iter().find(|n| n.path == "history").unwrap();
        assert_eq!(
            history.kind,
            FieldNodeKind::Leaf {
                preview: "1,2,3".to_string()
            }
        );
        assert!(found.iter().any(|n| n.path == "meta.tags"));
    }

    #[test]
    fn test_previews_are_truncated() {
        let value = json!({"name": "A very long company name indeed", "n": null, "ok": true});
        let tree = explore(&value);
        let preview_of = |path: &str| match &tree.iter().find(|n| n.path == path).unwrap().kind {
            FieldNodeKind::Leaf { preview } => preview.clone(),
            FieldNodeKind::Group { .. } => panic!("expected leaf"),
        };
        assert_eq!(preview_of("name"), "A very long company ");
        assert_eq!(preview_of("name").chars().count(), PREVIEW_CHARS);
        assert_eq!(preview_of("n"), "null");
        assert_eq!(preview_of("ok"), "true");
    }

    #[test]
    fn test_scalar_and_array_roots() {
        assert!(explore(&json!(42)).is_empty());
        assert!(explore(&Value::Null).is_empty());

        let tree = explore(&json!([{"c": 1}, 2]));
        let paths: Vec<&str> = leaves(&tree).iter().map(|n| n.path.as_str()).collect();
        assert_eq!(paths, vec!["0.c", "1"]);
    }

    #[test]
    fn test_toggle_field() {
        let mut selected = vec!["c".to_string()];
        assert!(toggle_field(&mut selected, "dp"));
        assert_eq!(selected, vec!["c", "dp"]);
        assert!(!toggle_field(&mut selected, "c"));
        assert_eq!(selected, vec!["dp"]);
    }
}
