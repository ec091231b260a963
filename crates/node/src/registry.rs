use {super::node::NodeType, serde_json::Value, std::collections::HashMap};

/// Registry of node types available to a host.
pub struct NodeRegistry {
    nodes: HashMap<String, Box<dyn NodeType>>,
}

impl Default for NodeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeRegistry {
    pub fn new() -> Self {
        Self {
            nodes: HashMap::new(),
        }
    }

    /// Register a node type, replacing any previous one with the same name.
    pub fn register(&mut self, node: Box<dyn NodeType>) {
        self.nodes.insert(node.name().to_string(), node);
    }

    pub fn get(&self, name: &str) -> Option<&dyn NodeType> {
        self.nodes.get(name).map(|n| n.as_ref())
    }

    /// Registered names, sorted.
    pub fn list(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.nodes.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }

    /// Descriptions of every registered node, in name order.
    pub fn describe_all(&self) -> Vec<Value> {
        self.list()
            .into_iter()
            .filter_map(|name| self.get(name))
            .map(|node| node.description())
            .collect()
    }
}
