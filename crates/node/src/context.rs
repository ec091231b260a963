use std::collections::HashMap;

use {
    sendtick_common::{Error, Item, NodeOutput, Result},
    serde_json::Value,
};

/// What a workflow host exposes to a node while it runs.
pub trait ExecuteContext: Send + Sync {
    /// Items arriving on the node's single input.
    fn input_data(&self) -> Vec<Item>;

    /// Parameter value resolved for one item, or `None` when the host has
    /// nothing for it.
    fn node_parameter(&self, name: &str, item_index: usize) -> Option<Value>;

    /// Whether per-item failures become `{error}` items instead of aborting.
    fn continue_on_fail(&self) -> bool;

    fn node_name(&self) -> &str;

    fn prepare_output_data(&self, items: Vec<Item>) -> NodeOutput {
        vec![items]
    }
}

/// In-memory context. An item's own top-level fields act as its
/// parameters; anything missing falls back to the batch parameters.
#[derive(Debug, Clone)]
pub struct StaticContext {
    name: String,
    items: Vec<Item>,
    parameters: HashMap<String, Value>,
    continue_on_fail: bool,
}

impl StaticContext {
    pub fn new(items: Vec<Item>) -> Self {
        Self {
            name: "Sendtick".into(),
            items,
            parameters: HashMap::new(),
            continue_on_fail: false,
        }
    }

    /// A batch of one empty item, for running a single call from batch
    /// parameters alone.
    pub fn single() -> Self {
        Self::new(vec![Item::new(Value::Object(Default::default()))])
    }

    /// Parse a JSON array of item payloads.
    pub fn from_json(raw: &str) -> Result<Self> {
        match serde_json::from_str::<Value>(raw)? {
            Value::Array(values) => Ok(Self::new(values.into_iter().map(Item::new).collect())),
            other => Err(Error::message(format!(
                "expected a JSON array of items, got {}",
                kind_of(&other)
            ))),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_parameter(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.parameters.insert(name.into(), value.into());
        self
    }

    pub fn with_continue_on_fail(mut self, enabled: bool) -> Self {
        self.continue_on_fail = enabled;
        self
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl ExecuteContext for StaticContext {
    fn input_data(&self) -> Vec<Item> {
        self.items.clone()
    }

    fn node_parameter(&self, name: &str, item_index: usize) -> Option<Value> {
        self.items
            .get(item_index)
            .and_then(|item| item.field(name))
            .or_else(|| self.parameters.get(name))
            .cloned()
    }

    fn continue_on_fail(&self) -> bool {
        self.continue_on_fail
    }

    fn node_name(&self) -> &str {
        &self.name
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {super::*, serde_json::json};

    #[test]
    fn item_fields_override_batch_parameters() {
        let ctx = StaticContext::new(vec![
            Item::new(json!({ "contactId": "1" })),
            Item::new(json!({})),
        ])
        .with_parameter("contactId", "fallback")
        .with_parameter("resource", "contact");

        assert_eq!(ctx.node_parameter("contactId", 0), Some(json!("1")));
        assert_eq!(ctx.node_parameter("contactId", 1), Some(json!("fallback")));
        assert_eq!(ctx.node_parameter("resource", 0), Some(json!("contact")));
        assert_eq!(ctx.node_parameter("missing", 0), None);
    }

    #[test]
    fn from_json_requires_array() {
        let ctx = StaticContext::from_json(r#"[{"a":1},{"b":2}]"#).unwrap();
        assert_eq!(ctx.len(), 2);

        let err = StaticContext::from_json(r#"{"a":1}"#).unwrap_err();
        assert_eq!(err.to_string(), "expected a JSON array of items, got an object");

        assert!(matches!(
            StaticContext::from_json("not json"),
            Err(Error::Json(_))
        ));
    }

    #[test]
    fn defaults_to_single_output() {
        let ctx = StaticContext::single();
        assert_eq!(ctx.len(), 1);
        assert!(!ctx.continue_on_fail());
        let out = ctx.prepare_output_data(vec![Item::error("x")]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0][0].json, json!({ "error": "x" }));
    }
}
