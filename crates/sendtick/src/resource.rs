use serde::{Deserialize, Serialize};

use sendtick_config::ConnectorConfig;

/// API object family targeted by an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Resource {
    Message,
    Contact,
    Media,
    Session,
}

impl Resource {
    pub const ALL: [Resource; 4] = [
        Resource::Message,
        Resource::Contact,
        Resource::Media,
        Resource::Session,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Message => "message",
            Self::Contact => "contact",
            Self::Media => "media",
            Self::Session => "session",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.as_str() == value)
    }

    /// Operations accepted for this resource, in display order.
    pub fn operations(self) -> &'static [Operation] {
        use Operation::*;
        match self {
            Self::Message => &[Send],
            Self::Contact => &[Create, Delete, Get, GetAll, Update],
            Self::Media => &[Upload, Get, GetAll],
            Self::Session => &[Get, GetAll],
        }
    }

    pub fn supports(self, operation: Operation) -> bool {
        self.operations().contains(&operation)
    }
}

impl std::fmt::Display for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Action requested on a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Operation {
    Send,
    Create,
    Get,
    GetAll,
    Update,
    Delete,
    Upload,
}

impl Operation {
    pub const ALL: [Operation; 7] = [
        Operation::Send,
        Operation::Create,
        Operation::Get,
        Operation::GetAll,
        Operation::Update,
        Operation::Delete,
        Operation::Upload,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Send => "send",
            Self::Create => "create",
            Self::Get => "get",
            Self::GetAll => "getAll",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Upload => "upload",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|o| o.as_str() == value)
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Optional parts of the connector that can be switched off per deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub media: bool,
}

impl Default for Capabilities {
    fn default() -> Self {
        Self { media: true }
    }
}

impl Capabilities {
    pub fn allows(&self, resource: Resource) -> bool {
        match resource {
            Resource::Media => self.media,
            Resource::Message | Resource::Contact | Resource::Session => true,
        }
    }

    /// Resources exposed under these capabilities, in display order.
    pub fn resources(&self) -> impl Iterator<Item = Resource> + '_ {
        Resource::ALL.into_iter().filter(|r| self.allows(*r))
    }
}

impl From<&ConnectorConfig> for Capabilities {
    fn from(config: &ConnectorConfig) -> Self {
        Self {
            media: config.media_enabled,
        }
    }
}
