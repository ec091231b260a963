use {
    async_trait::async_trait,
    sendtick::{SendtickApi, schema},
    sendtick_common::{Item, NodeOutput},
    serde_json::Value,
    tracing::{debug, info, warn},
};

use crate::{context::ExecuteContext, error::NodeError, params::extract_call};

/// Type name the Sendtick node registers under.
pub const NODE_NAME: &str = "sendtick";

/// A node type a workflow host can instantiate and run.
#[async_trait]
pub trait NodeType: Send + Sync {
    fn name(&self) -> &str;

    /// Host-facing description: display metadata and the parameter form.
    fn description(&self) -> Value;

    async fn execute(&self, ctx: &dyn ExecuteContext) -> Result<NodeOutput, NodeError>;
}

/// Runs one Sendtick API call per input item.
#[derive(Clone)]
pub struct SendtickNode {
    api: SendtickApi,
}

impl SendtickNode {
    pub fn new(api: SendtickApi) -> Self {
        Self { api }
    }

    pub fn api(&self) -> &SendtickApi {
        &self.api
    }

    async fn run_item(&self, ctx: &dyn ExecuteContext, item_index: usize) -> sendtick::Result<Value> {
        let call = extract_call(ctx, item_index)?;
        debug!(
            item = item_index,
            resource = %call.resource(),
            operation = %call.operation(),
            "executing item"
        );
        self.api.call(&call).await
    }
}

#[async_trait]
impl NodeType for SendtickNode {
    fn name(&self) -> &str {
        NODE_NAME
    }

    fn description(&self) -> Value {
        schema::describe(self.api.capabilities())
    }

    async fn execute(&self, ctx: &dyn ExecuteContext) -> Result<NodeOutput, NodeError> {
        let total = ctx.input_data().len();
        let continue_on_fail = ctx.continue_on_fail();
        let mut output = Vec::with_capacity(total);
        let mut failed = 0usize;

        // Items run one after another; output order is input order.
        for item_index in 0..total {
            match self.run_item(ctx, item_index).await {
                Ok(json) => output.push(Item::new(json)),
                Err(err) if continue_on_fail => {
                    warn!(
                        node = ctx.node_name(),
                        item = item_index,
                        error = %err,
                        "item failed, continuing"
                    );
                    failed += 1;
                    output.push(Item::error(err.to_string()));
                },
                Err(err) => return Err(NodeError::new(ctx.node_name(), item_index, err)),
            }
        }

        info!(node = ctx.node_name(), items = total, failed, "sendtick node finished");
        Ok(ctx.prepare_output_data(output))
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::context::StaticContext,
        sendtick::{ApiClient, Capabilities, RequestSpec},
        serde_json::json,
        std::sync::{Arc, Mutex},
    };

    /// Answers every request with its own path; fails paths ending in `/boom`.
    #[derive(Default)]
    struct EchoClient {
        seen: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl ApiClient for EchoClient {
        async fn request(&self, spec: &RequestSpec) -> sendtick::Result<Value> {
            self.seen.lock().unwrap().push(spec.path.clone());
            if spec.path.ends_with("/boom") {
                return Err(sendtick::Error::Upstream {
                    status: 500,
                    body: "kaput".into(),
                });
            }
            Ok(json!({ "path": spec.path }))
        }
    }

    fn node() -> (SendtickNode, Arc<EchoClient>) {
        let client = Arc::new(EchoClient::default());
        (SendtickNode::new(SendtickApi::new(client.clone())), client)
    }

    fn contacts(ids: &[&str]) -> StaticContext {
        StaticContext::new(
            ids.iter()
                .map(|id| Item::new(json!({ "contactId": id })))
                .collect(),
        )
        .with_parameter("resource", "contact")
        .with_parameter("operation", "get")
    }

    #[tokio::test]
    async fn one_output_per_item_in_order() {
        let (node, client) = node();
        let out = node.execute(&contacts(&["1", "2", "3"])).await.unwrap();
        assert_eq!(out.len(), 1);
        let paths: Vec<_> = out[0].iter().map(|i| i.json["path"].clone()).collect();
        assert_eq!(paths, vec![
            json!("/contacts/1"),
            json!("/contacts/2"),
            json!("/contacts/3")
        ]);
        assert_eq!(client.seen.lock().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn continue_on_fail_captures_error_items() {
        let (node, client) = node();
        let ctx = contacts(&["1", "boom", "3"]).with_continue_on_fail(true);
        let out = node.execute(&ctx).await.unwrap();

        assert_eq!(out[0].len(), 3);
        assert_eq!(out[0][0].json, json!({ "path": "/contacts/1" }));
        assert_eq!(out[0][1].json, json!({
            "error": "Sendtick API request failed (500): kaput"
        }));
        assert_eq!(out[0][2].json, json!({ "path": "/contacts/3" }));
        assert_eq!(client.seen.lock().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn validation_errors_are_captured_too() {
        let (node, client) = node();
        let ctx = contacts(&["1", "", "3"]).with_continue_on_fail(true);
        let out = node.execute(&ctx).await.unwrap();
        assert_eq!(out[0][1].json, json!({
            "error": "`contactId` is required for contact/get"
        }));
        // The invalid item never reached the client.
        assert_eq!(client.seen.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn first_failure_aborts_without_continue_on_fail() {
        let (node, client) = node();
        let ctx = contacts(&["1", "boom", "3"]).with_name("WhatsApp");
        let err = node.execute(&ctx).await.unwrap_err();

        assert_eq!(err.node, "WhatsApp");
        assert_eq!(err.item_index, 1);
        assert!(!err.is_validation());
        assert_eq!(*client.seen.lock().unwrap(), vec![
            "/contacts/1".to_string(),
            "/contacts/boom".to_string()
        ]);
    }

    #[tokio::test]
    async fn empty_input_produces_empty_output() {
        let (node, client) = node();
        let out = node.execute(&contacts(&[])).await.unwrap();
        assert_eq!(out, vec![Vec::<Item>::new()]);
        assert!(client.seen.lock().unwrap().is_empty());
    }

    #[test]
    fn description_follows_capabilities() {
        let (node, _) = node();
        let desc = node.description();
        assert_eq!(desc["name"], NODE_NAME);

        let limited = SendtickNode::new(
            node.api()
                .clone()
                .with_capabilities(Capabilities { media: false }),
        );
        let options = limited.description()["properties"][0]["options"].clone();
        let values: Vec<_> = options
            .as_array()
            .unwrap()
            .iter()
            .map(|o| o["value"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(values, ["message", "contact", "session"]);
    }
}
