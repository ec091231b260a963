//! Sendtick connector for WhatsApp messaging.
//!
//! Maps a (resource, operation) pair plus field values onto exactly one call
//! against the Sendtick REST API. Request building is pure (see
//! [`operations`]); execution goes through the injected [`ApiClient`].

pub mod api;
pub mod client;
pub mod error;
#[cfg(feature = "metrics")]
pub mod metrics;
pub mod operations;
pub mod recipient;
pub mod request;
pub mod resource;
pub mod schema;

pub use {
    api::SendtickApi,
    client::{ApiClient, HttpApiClient},
    error::{Error, Result},
    operations::{Call, ContactUpdate, ListOptions, NewContact, SendMessage},
    recipient::{WHATSAPP_JID_SUFFIX, normalize_recipient},
    request::RequestSpec,
    resource::{Capabilities, Operation, Resource},
};
