/// Failure of a node run that was not captured as an output item.
#[derive(Debug, thiserror::Error)]
#[error("{node} failed on item {item_index}: {source}")]
pub struct NodeError {
    pub node: String,
    pub item_index: usize,
    #[source]
    pub source: sendtick::Error,
}

impl NodeError {
    #[must_use]
    pub fn new(node: impl Into<String>, item_index: usize, source: sendtick::Error) -> Self {
        Self {
            node: node.into(),
            item_index,
            source,
        }
    }

    pub fn is_validation(&self) -> bool {
        self.source.is_validation()
    }
}
