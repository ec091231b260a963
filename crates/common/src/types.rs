use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One record flowing into or out of a node execution.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub json: Value,
}

impl Item {
    pub fn new(json: Value) -> Self {
        Self { json }
    }

    /// Output record shape used when a per-item failure is captured.
    pub fn error(message: impl Into<String>) -> Self {
        let mut obj = Map::new();
        obj.insert("error".into(), Value::String(message.into()));
        Self {
            json: Value::Object(obj),
        }
    }

    /// Look up a top-level field when the payload is a JSON object.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.json.as_object().and_then(|obj| obj.get(name))
    }
}

impl From<Value> for Item {
    fn from(json: Value) -> Self {
        Self::new(json)
    }
}

/// Output streams produced by a node; one inner list per output connector.
pub type NodeOutput = Vec<Vec<Item>>;
