//! Patch operations and their JSON representation.

use accord_types::Document;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{PatchError, PatchResult};
use crate::pointer::Pointer;

/// A single RFC 6902 operation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PatchOperation {
    Add { path: Pointer, value: Document },
    Remove { path: Pointer },
    Replace { path: Pointer, value: Document },
    Move { from: Pointer, path: Pointer },
    Copy { from: Pointer, path: Pointer },
    Test { path: Pointer, value: Document },
}

impl PatchOperation {
    /// The `op` member name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Add { .. } => "add",
            Self::Remove { .. } => "remove",
            Self::Replace { .. } => "replace",
            Self::Move { .. } => "move",
            Self::Copy { .. } => "copy",
            Self::Test { .. } => "test",
        }
    }

    /// The target location.
    pub fn path(&self) -> &Pointer {
        match self {
            Self::Add { path, .. }
            | Self::Remove { path }
            | Self::Replace { path, .. }
            | Self::Move { path, .. }
            | Self::Copy { path, .. }
            | Self::Test { path, .. } => path,
        }
    }

    pub fn is_add(&self) -> bool {
        matches!(self, Self::Add { .. })
    }

    /// Parse the operation at `index` of a patch document.
    pub fn from_json(index: usize, raw: &Value) -> PatchResult<Self> {
        let Value::Object(members) = raw else {
            return Err(PatchError::malformed(index, "operation must be a JSON object"));
        };

        let op = match members.get("op") {
            Some(Value::String(op)) => op.as_str(),
            Some(_) => return Err(PatchError::malformed(index, "'op' must be a string")),
            None => return Err(PatchError::malformed(index, "missing required member 'op'")),
        };
        let path = pointer_member(index, members, "path")?;

        let operation = match op {
            "add" => Self::Add {
                path,
                value: value_member(index, members)?,
            },
            "remove" => Self::Remove { path },
            "replace" => Self::Replace {
                path,
                value: value_member(index, members)?,
            },
            "move" => Self::Move {
                from: pointer_member(index, members, "from")?,
                path,
            },
            "copy" => Self::Copy {
                from: pointer_member(index, members, "from")?,
                path,
            },
            "test" => Self::Test {
                path,
                value: value_member(index, members)?,
            },
            other => {
                return Err(PatchError::malformed(
                    index,
                    format!("unknown operation '{other}'"),
                ))
            }
        };
        Ok(operation)
    }

    /// The operation as a JSON object.
    pub fn to_json(&self) -> Value {
        let mut members = Map::new();
        members.insert("op".into(), Value::String(self.name().into()));
        members.insert("path".into(), Value::String(self.path().to_string()));
        match self {
            Self::Add { value, .. } | Self::Replace { value, .. } | Self::Test { value, .. } => {
                members.insert("value".into(), value.clone().into());
            }
            Self::Move { from, .. } | Self::Copy { from, .. } => {
                members.insert("from".into(), Value::String(from.to_string()));
            }
            Self::Remove { .. } => {}
        }
        Value::Object(members)
    }
}

fn pointer_member(index: usize, members: &Map<String, Value>, name: &str) -> PatchResult<Pointer> {
    match members.get(name) {
        Some(Value::String(text)) => {
            Pointer::parse(text).map_err(|e| PatchError::malformed(index, format!("'{name}': {e}")))
        }
        Some(_) => Err(PatchError::malformed(index, format!("'{name}' must be a string"))),
        None => Err(PatchError::malformed(
            index,
            format!("missing required member '{name}'"),
        )),
    }
}

fn value_member(index: usize, members: &Map<String, Value>) -> PatchResult<Document> {
    members
        .get("value")
        .cloned()
        .map(Document::from)
        .ok_or_else(|| PatchError::malformed(index, "missing required member 'value'"))
}

/// An ordered list of operations, applied first to last.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Value", into = "Value")]
pub struct Patch {
    operations: Vec<PatchOperation>,
}

impl Patch {
    pub fn new(operations: Vec<PatchOperation>) -> Self {
        Self { operations }
    }

    /// Parse a patch document: a JSON array of operation objects.
    ///
    /// The first malformed operation aborts parsing.
    pub fn from_json(raw: &Value) -> PatchResult<Self> {
        let Value::Array(items) = raw else {
            return Err(PatchError::malformed(0, "patch must be a JSON array"));
        };
        let operations = items
            .iter()
            .enumerate()
            .map(|(index, item)| PatchOperation::from_json(index, item))
            .collect::<PatchResult<Vec<_>>>()?;
        Ok(Self { operations })
    }

    pub fn to_json(&self) -> Value {
        Value::Array(self.operations.iter().map(PatchOperation::to_json).collect())
    }

    pub fn operations(&self) -> &[PatchOperation] {
        &self.operations
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PatchOperation> {
        self.operations.iter()
    }
}

impl TryFrom<Value> for Patch {
    type Error = PatchError;

    fn try_from(raw: Value) -> Result<Self, Self::Error> {
        Self::from_json(&raw)
    }
}

impl From<Patch> for Value {
    fn from(patch: Patch) -> Self {
        patch.to_json()
    }
}

impl FromIterator<PatchOperation> for Patch {
    fn from_iter<I: IntoIterator<Item = PatchOperation>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Patch {
    type Item = &'a PatchOperation;
    type IntoIter = std::slice::Iter<'a, PatchOperation>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn malformed_reason(raw: Value) -> String {
        match Patch::from_json(&raw) {
            Err(PatchError::MalformedPatch { reason, .. }) => reason,
            other => panic!("expected MalformedPatch, got {other:?}"),
        }
    }

    #[test]
    fn parses_every_kind() {
        let patch = Patch::from_json(&json!([
            {"op": "add", "path": "/a", "value": 1},
            {"op": "remove", "path": "/b"},
            {"op": "replace", "path": "/c", "value": [1]},
            {"op": "move", "from": "/d", "path": "/e"},
            {"op": "copy", "from": "/f", "path": "/g"},
            {"op": "test", "path": "/h", "value": null}
        ]))
        .unwrap();

        let names: Vec<&str> = patch.iter().map(PatchOperation::name).collect();
        assert_eq!(names, ["add", "remove", "replace", "move", "copy", "test"]);
        assert_eq!(patch.operations()[3].path().to_string(), "/e");
        assert!(patch.operations()[0].is_add());
    }

    #[test]
    fn missing_op_or_path_is_malformed() {
        assert_eq!(malformed_reason(json!([{}])), "missing required member 'op'");
        assert_eq!(
            malformed_reason(json!([{"op": "remove"}])),
            "missing required member 'path'"
        );
        assert_eq!(
            malformed_reason(json!([{"op": "add", "path": "/x"}])),
            "missing required member 'value'"
        );
        assert_eq!(
            malformed_reason(json!([{"op": "move", "path": "/x"}])),
            "missing required member 'from'"
        );
    }

    #[test]
    fn wrong_member_types_are_malformed() {
        assert_eq!(malformed_reason(json!([{"op": 1, "path": "/x"}])), "'op' must be a string");
        assert_eq!(
            malformed_reason(json!([{"op": "remove", "path": 3}])),
            "'path' must be a string"
        );
        assert_eq!(
            malformed_reason(json!([{"op": "frobnicate", "path": "/x"}])),
            "unknown operation 'frobnicate'"
        );
        assert_eq!(malformed_reason(json!(["add"])), "operation must be a JSON object");
        assert_eq!(malformed_reason(json!({"op": "add"})), "patch must be a JSON array");
    }

    #[test]
    fn relative_path_is_malformed() {
        let err = Patch::from_json(&json!([{"op": "remove", "path": "/ok"}, {"op": "remove", "path": "bad"}]))
            .unwrap_err();
        assert!(matches!(err, PatchError::MalformedPatch { index: 1, .. }));
    }

    #[test]
    fn json_roundtrip() {
        let raw = json!([
            {"op": "add", "path": "/a~1b", "value": {"k": 1}},
            {"op": "copy", "from": "/a~1b", "path": "/c"},
            {"op": "remove", "path": "/c"}
        ]);
        let patch = Patch::from_json(&raw).unwrap();
        assert_eq!(patch.to_json(), raw);
    }

    #[test]
    fn serde_uses_the_same_rules() {
        let patch: Patch = serde_json::from_str(r#"[{"op": "remove", "path": "/a"}]"#).unwrap();
        assert_eq!(patch.len(), 1);
        assert!(serde_json::from_str::<Patch>(r#"[{"path": "/a"}]"#).is_err());
    }
}
