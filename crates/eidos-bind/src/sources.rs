//! Per-source raw-pair extraction.
//!
//! Each wire source has its own extraction shape — matched route segments,
//! query-string pairs, headers, form and multipart fields — but they all
//! funnel into the same value tree, and from there through the shared
//! coerce-and-transfer pipeline.

use crate::tree::ValueNode;

/// Builds a tree from matched route segments. Path keys are flat names and
/// are not split into segments; a repeated key keeps the last value.
#[must_use]
pub fn path_tree<I, K, V>(params: I) -> ValueNode
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut root = ValueNode::root();
    for (key, value) in params {
        root.set_field(key.as_ref(), value.as_ref());
    }
    root
}

/// Builds a tree from ordered query-string pairs. Keys may use the
/// `.`/`[index]`/`[name]` path syntax.
#[must_use]
pub fn query_tree<I, K, V>(pairs: I) -> ValueNode
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    ValueNode::from_pairs(pairs)
}

/// Builds a tree from header pairs. Header names are flat keys; only the
/// first value per name contributes.
#[must_use]
pub fn header_tree<I, K, V>(headers: I) -> ValueNode
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut root = ValueNode::root();
    for (name, value) in headers {
        if let Some(node) = root.descend(name.as_ref()) {
            if node.is_unset() {
                node.set(value.as_ref());
            }
        }
    }
    root
}

/// Builds a tree from form fields. Same key grammar as the query string.
#[must_use]
pub fn form_tree<I, K, V>(pairs: I) -> ValueNode
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    ValueNode::from_pairs(pairs)
}

/// Builds a tree from multipart form data: text fields use the path-key
/// grammar, and each file entry contributes a `<key>::<count>` scalar at
/// its key's path.
#[must_use]
pub fn multipart_tree<I, K, V, F, N>(fields: I, files: F) -> ValueNode
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
    F: IntoIterator<Item = (N, usize)>,
    N: AsRef<str>,
{
    let mut root = ValueNode::root();
    for (key, value) in fields {
        root.assign_split(key.as_ref(), value.as_ref());
    }
    for (key, count) in files {
        let key = key.as_ref();
        root.assign_split(key, &format!("{key}::{count}"));
    }
    root
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_path_tree_keys_not_split() {
        let tree = path_tree([("user.id", "7")]);
        assert_eq!(tree.to_value(), json!({"user.id": "7"}));
    }

    #[test]
    fn test_query_tree_keys_split() {
        let tree = query_tree([("user.id", "7")]);
        assert_eq!(tree.to_value(), json!({"user": {"id": "7"}}));
    }

    #[test]
    fn test_header_tree_first_value_wins() {
        let tree = header_tree([("Accept", "json"), ("Accept", "xml")]);
        assert_eq!(tree.to_value(), json!({"Accept": "json"}));
    }

    #[test]
    fn test_multipart_tree_mixes_fields_and_files() {
        let tree = multipart_tree(
            [("title", "report")],
            [("attachments", 2_usize)],
        );
        assert_eq!(
            tree.to_value(),
            json!({"title": "report", "attachments": "attachments::2"})
        );
    }
}
