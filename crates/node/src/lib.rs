//! Adapter between a workflow host and the Sendtick connector.
//!
//! The host hands a node an [`ExecuteContext`] (input items plus per-item
//! parameters); [`SendtickNode`] turns each item into one API call and
//! returns the responses in input order.

pub mod context;
pub mod error;
pub mod node;
pub mod params;
pub mod registry;

pub use {
    context::{ExecuteContext, StaticContext},
    error::NodeError,
    node::{NODE_NAME, NodeType, SendtickNode},
    params::extract_call,
    registry::NodeRegistry,
};
