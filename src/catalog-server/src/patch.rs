//! JSON Patch (RFC 6902) applied to JSON documents.
//!
//! Object member lookup is exact first and then case-insensitive, so
//! `/Name` and `/name` address the same member.

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// A single patch operation.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum PatchOperation {
    Add { path: String, value: Value },
    Remove { path: String },
    Replace { path: String, value: Value },
    Move { from: String, path: String },
    Copy { from: String, path: String },
    Test { path: String, value: Value },
}

/// Patch application error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatchError {
    #[error("invalid JSON pointer '{0}'")]
    InvalidPointer(String),

    #[error("the target location '{0}' was not found")]
    PathNotFound(String),

    #[error("the current value at '{0}' is not equal to the test value")]
    TestFailed(String),

    #[error("cannot move '{from}' into its own child '{path}'")]
    MoveIntoChild { from: String, path: String },
}

/// Apply operations in order. On error the document may be partially
/// patched; callers apply to a scratch copy.
pub fn apply(doc: &mut Value, operations: &[PatchOperation]) -> Result<(), PatchError> {
    for operation in operations {
        apply_one(doc, operation)?;
    }
    Ok(())
}

fn apply_one(doc: &mut Value, operation: &PatchOperation) -> Result<(), PatchError> {
    match operation {
        PatchOperation::Add { path, value } => add(doc, path, value.clone()),
        PatchOperation::Remove { path } => remove(doc, path).map(drop),
        PatchOperation::Replace { path, value } => {
            let target = resolve_mut(doc, &split_pointer(path)?)
                .ok_or_else(|| PatchError::PathNotFound(path.clone()))?;
            *target = value.clone();
            Ok(())
        }
        PatchOperation::Move { from, path } => {
            if path.starts_with(&format!("{from}/")) {
                return Err(PatchError::MoveIntoChild {
                    from: from.clone(),
                    path: path.clone(),
                });
            }
            let value = remove(doc, from)?;
            add(doc, path, value)
        }
        PatchOperation::Copy { from, path } => {
            let value = resolve_mut(doc, &split_pointer(from)?)
                .ok_or_else(|| PatchError::PathNotFound(from.clone()))?
                .clone();
            add(doc, path, value)
        }
        PatchOperation::Test { path, value } => {
            let current = resolve_mut(doc, &split_pointer(path)?)
                .ok_or_else(|| PatchError::PathNotFound(path.clone()))?;
            if current == value {
                Ok(())
            } else {
                Err(PatchError::TestFailed(path.clone()))
            }
        }
    }
}

fn add(doc: &mut Value, path: &str, value: Value) -> Result<(), PatchError> {
    let tokens = split_pointer(path)?;
    let Some((last, parent_tokens)) = tokens.split_last() else {
        *doc = value;
        return Ok(());
    };

    let parent = resolve_mut(doc, parent_tokens)
        .ok_or_else(|| PatchError::PathNotFound(path.to_string()))?;
    match parent {
        Value::Object(members) => {
            let key = matching_key(members, last).unwrap_or_else(|| last.clone());
            members.insert(key, value);
            Ok(())
        }
        Value::Array(items) => {
            let index = if last == "-" {
                items.len()
            } else {
                array_index(last)
                    .filter(|i| *i <= items.len())
                    .ok_or_else(|| PatchError::PathNotFound(path.to_string()))?
            };
            items.insert(index, value);
            Ok(())
        }
        _ => Err(PatchError::PathNotFound(path.to_string())),
    }
}

fn remove(doc: &mut Value, path: &str) -> Result<Value, PatchError> {
    let tokens = split_pointer(path)?;
    let (last, parent_tokens) = tokens
        .split_last()
        .ok_or_else(|| PatchError::InvalidPointer(path.to_string()))?;

    let not_found = || PatchError::PathNotFound(path.to_string());
    match resolve_mut(doc, parent_tokens).ok_or_else(not_found)? {
        Value::Object(members) => {
            let key = matching_key(members, last).ok_or_else(not_found)?;
            members.shift_remove(&key).ok_or_else(not_found)
        }
        Value::Array(items) => {
            let index = array_index(last)
                .filter(|i| *i < items.len())
                .ok_or_else(not_found)?;
            Ok(items.remove(index))
        }
        _ => Err(not_found()),
    }
}

fn resolve_mut<'a>(doc: &'a mut Value, tokens: &[String]) -> Option<&'a mut Value> {
    tokens.iter().try_fold(doc, |node, token| match node {
        Value::Object(members) => {
            let key = matching_key(members, token)?;
            members.get_mut(&key)
        }
        Value::Array(items) => items.get_mut(array_index(token)?),
        _ => None,
    })
}

fn matching_key(members: &serde_json::Map<String, Value>, token: &str) -> Option<String> {
    if members.contains_key(token) {
        return Some(token.to_string());
    }
    members
        .keys()
        .find(|key| key.eq_ignore_ascii_case(token))
        .cloned()
}

/// Array indices are plain decimal without leading zeros.
fn array_index(token: &str) -> Option<usize> {
    if token.len() > 1 && token.starts_with('0') {
        return None;
    }
    token.parse().ok()
}

/// `/a~1b/c~0d` -> `["a/b", "c~d"]`; the empty pointer is the whole document.
fn split_pointer(pointer: &str) -> Result<Vec<String>, PatchError> {
    if pointer.is_empty() {
        return Ok(Vec::new());
    }
    let rest = pointer
        .strip_prefix('/')
        .ok_or_else(|| PatchError::InvalidPointer(pointer.to_string()))?;
    Ok(rest
        .split('/')
        .map(|token| token.replace("~1", "/").replace("~0", "~"))
        .collect())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn ops(value: Value) -> Vec<PatchOperation> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_replace_is_case_insensitive() {
        let mut doc = json!({"name": "Pen", "price": 1.5});
        apply(
            &mut doc,
            &ops(json!([{"op": "replace", "path": "/Name", "value": "Pencil"}])),
        )
        .unwrap();
        assert_eq!(doc, json!({"name": "Pencil", "price": 1.5}));
    }

    #[test]
    fn test_add_remove_and_test() {
        let mut doc = json!({"name": "Pen", "tags": ["a"]});
        apply(
            &mut doc,
            &ops(json!([
                {"op": "add", "path": "/tags/-", "value": "b"},
                {"op": "add", "path": "/tags/0", "value": "z"},
                {"op": "remove", "path": "/name"},
                {"op": "test", "path": "/tags/1", "value": "a"},
            ])),
        )
        .unwrap();
        assert_eq!(doc, json!({"tags": ["z", "a", "b"]}));
    }

    #[test]
    fn test_move_and_copy() {
        let mut doc = json!({"name": "Pen", "price": 2});
        apply(
            &mut doc,
            &ops(json!([
                {"op": "copy", "from": "/name", "path": "/alias"},
                {"op": "move", "from": "/price", "path": "/cost"},
            ])),
        )
        .unwrap();
        assert_eq!(doc, json!({"name": "Pen", "alias": "Pen", "cost": 2}));
    }

    #[test]
    fn test_failures() {
        let mut doc = json!({"name": "Pen"});
        assert_eq!(
            apply(
                &mut doc,
                &ops(json!([{"op": "replace", "path": "/missing", "value": 1}]))
            ),
            Err(PatchError::PathNotFound("/missing".into()))
        );
        assert_eq!(
            apply(
                &mut doc,
                &ops(json!([{"op": "test", "path": "/name", "value": "Ink"}]))
            ),
            Err(PatchError::TestFailed("/name".into()))
        );
        assert_eq!(
            apply(
                &mut doc,
                &ops(json!([{"op": "remove", "path": "name"}]))
            ),
            Err(PatchError::InvalidPointer("name".into()))
        );
    }

    #[test]
    fn test_pointer_escapes() {
        assert_eq!(
            split_pointer("/a~1b/c~0d").unwrap(),
            vec!["a/b".to_string(), "c~d".to_string()]
        );
        assert!(split_pointer("").unwrap().is_empty());
    }

    #[test]
    fn test_unknown_op_is_rejected() {
        let result: Result<Vec<PatchOperation>, _> =
            serde_json::from_value(json!([{"op": "merge", "path": "/name"}]));
        assert!(result.is_err());
    }
}
