//! Shared types and error definitions used across the sendtick crates.

pub mod error;
pub mod types;

pub use {
    error::{Error, FromMessage, Result},
    types::{Item, NodeOutput},
};
