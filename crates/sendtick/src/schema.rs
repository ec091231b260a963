//! Declarative parameter table: which fields each (resource, operation)
//! accepts, their types, defaults, and visibility conditions.
//!
//! The same table renders the host-facing node description and drives
//! parameter extraction, so form and validator cannot drift apart.

use serde_json::{Map, Value, json};

use crate::{
    operations::{DEFAULT_LIMIT, MIN_LIMIT},
    resource::{Capabilities, Operation, Resource},
};

/// Value type of a field as rendered by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    String,
    Number,
    Boolean,
}

impl FieldKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
        }
    }
}

/// Default applied when the host supplies no value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldDefault {
    Str(&'static str),
    Number(u64),
    Bool(bool),
}

impl FieldDefault {
    pub fn to_value(self) -> Value {
        match self {
            Self::Str(s) => Value::String(s.into()),
            Self::Number(n) => Value::from(n),
            Self::Bool(b) => Value::Bool(b),
        }
    }
}

/// One user-facing parameter.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub display_name: &'static str,
    pub kind: FieldKind,
    pub default: FieldDefault,
    pub required: bool,
    pub description: &'static str,
    pub placeholder: Option<&'static str>,
    pub min_value: Option<u64>,
    pub resource: Resource,
    pub operations: &'static [Operation],
    /// Shown only while `returnAll` equals this value.
    pub return_all: Option<bool>,
}

impl FieldSpec {
    const fn new(
        name: &'static str,
        display_name: &'static str,
        kind: FieldKind,
        default: FieldDefault,
        resource: Resource,
        operations: &'static [Operation],
    ) -> Self {
        Self {
            name,
            display_name,
            kind,
            default,
            required: false,
            description: "",
            placeholder: None,
            min_value: None,
            resource,
            operations,
            return_all: None,
        }
    }

    const fn string(
        name: &'static str,
        display_name: &'static str,
        resource: Resource,
        operations: &'static [Operation],
    ) -> Self {
        Self::new(
            name,
            display_name,
            FieldKind::String,
            FieldDefault::Str(""),
            resource,
            operations,
        )
    }

    const fn return_all_toggle(resource: Resource) -> Self {
        Self::new(
            "returnAll",
            "Return All",
            FieldKind::Boolean,
            FieldDefault::Bool(false),
            resource,
            &[Operation::GetAll],
        )
        .describe("Whether to return all results or only up to a given limit")
    }

    const fn limit(resource: Resource) -> Self {
        let mut spec = Self::new(
            "limit",
            "Limit",
            FieldKind::Number,
            FieldDefault::Number(DEFAULT_LIMIT),
            resource,
            &[Operation::GetAll],
        )
        .describe("Max number of results to return");
        spec.min_value = Some(MIN_LIMIT);
        spec.return_all = Some(false);
        spec
    }

    const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    const fn describe(mut self, description: &'static str) -> Self {
        self.description = description;
        self
    }

    const fn placeholder(mut self, placeholder: &'static str) -> Self {
        self.placeholder = Some(placeholder);
        self
    }

    pub fn applies_to(&self, resource: Resource, operation: Operation) -> bool {
        self.resource == resource && self.operations.contains(&operation)
    }

    fn to_property(self) -> Value {
        let mut show = Map::new();
        show.insert("resource".into(), json!([self.resource.as_str()]));
        show.insert(
            "operation".into(),
            Value::Array(
                self.operations
                    .iter()
                    .map(|op| Value::String(op.as_str().into()))
                    .collect(),
            ),
        );
        if let Some(return_all) = self.return_all {
            show.insert("returnAll".into(), json!([return_all]));
        }

        let mut prop = json!({
            "displayName": self.display_name,
            "name": self.name,
            "type": self.kind.as_str(),
            "default": self.default.to_value(),
            "displayOptions": { "show": show },
        });
        if let Some(obj) = prop.as_object_mut() {
            if self.required {
                obj.insert("required".into(), Value::Bool(true));
            }
            if !self.description.is_empty() {
                obj.insert("description".into(), self.description.into());
            }
            if let Some(placeholder) = self.placeholder {
                obj.insert("placeholder".into(), placeholder.into());
            }
            if let Some(min) = self.min_value {
                obj.insert("typeOptions".into(), json!({ "minValue": min }));
            }
        }
        prop
    }
}

/// An entry in a resource's operation dropdown.
#[derive(Debug, Clone, Copy)]
pub struct OperationOption {
    pub operation: Operation,
    pub name: &'static str,
    pub description: &'static str,
    pub action: &'static str,
}

/// A resource together with its operation dropdown.
#[derive(Debug, Clone, Copy)]
pub struct ResourceSpec {
    pub resource: Resource,
    pub name: &'static str,
    pub default_operation: Operation,
    pub operations: &'static [OperationOption],
}

const fn op(
    operation: Operation,
    name: &'static str,
    description: &'static str,
    action: &'static str,
) -> OperationOption {
    OperationOption {
        operation,
        name,
        description,
        action,
    }
}

pub const DEFAULT_RESOURCE: Resource = Resource::Message;

pub static RESOURCES: &[ResourceSpec] = &[
    ResourceSpec {
        resource: Resource::Message,
        name: "Message",
        default_operation: Operation::Send,
        operations: &[op(
            Operation::Send,
            "Send Message",
            "Send a WhatsApp message",
            "Send a WhatsApp message",
        )],
    },
    ResourceSpec {
        resource: Resource::Contact,
        name: "Contact",
        default_operation: Operation::GetAll,
        operations: &[
            op(Operation::Create, "Create", "Create a contact", "Create a contact"),
            op(Operation::Delete, "Delete", "Delete a contact", "Delete a contact"),
            op(Operation::Get, "Get", "Get a single contact", "Get a contact"),
            op(Operation::GetAll, "Get Many", "Get many contacts", "Get many contacts"),
            op(Operation::Update, "Update", "Update a contact", "Update a contact"),
        ],
    },
    ResourceSpec {
        resource: Resource::Media,
        name: "Media",
        default_operation: Operation::Upload,
        operations: &[
            op(Operation::Upload, "Upload", "Upload media via a public URL", "Upload media"),
            op(Operation::Get, "Get", "Get media metadata", "Get media"),
            op(Operation::GetAll, "Get Many", "List media items", "Get many media"),
        ],
    },
    ResourceSpec {
        resource: Resource::Session,
        name: "Session",
        default_operation: Operation::GetAll,
        operations: &[
            op(Operation::Get, "Get", "Get details for a session", "Get a session"),
            op(Operation::GetAll, "Get Many", "Get many sessions", "Get many sessions"),
        ],
    },
];

pub static FIELDS: &[FieldSpec] = &[
    // message:send
    FieldSpec::string("to", "To", Resource::Message, &[Operation::Send])
        .required()
        .describe("Recipient phone number with country code, or a full WhatsApp JID"),
    FieldSpec::string("sessionId", "Session ID", Resource::Message, &[Operation::Send])
        .required()
        .describe("Select the WhatsApp session to send from (sessionId)"),
    FieldSpec::string("message", "Message", Resource::Message, &[Operation::Send])
        .describe("The message text to send; required unless Media URL is set"),
    FieldSpec::string("mediaUrl", "Media URL", Resource::Message, &[Operation::Send])
        .describe("Optional public URL to media to send instead of a text message"),
    FieldSpec::string("fileName", "File Name", Resource::Message, &[Operation::Send])
        .describe("Optional filename for document messages"),
    // contact
    FieldSpec::string("phone", "Phone", Resource::Contact, &[Operation::Create])
        .required()
        .describe("Phone number with country code (E.164 preferred)"),
    FieldSpec::string("name", "Name", Resource::Contact, &[Operation::Create])
        .describe("Contact display name"),
    FieldSpec::string("email", "Email", Resource::Contact, &[Operation::Create])
        .describe("Optional contact email")
        .placeholder("name@email.com"),
    FieldSpec::string("contactId", "Contact ID", Resource::Contact, &[
        Operation::Get,
        Operation::Update,
        Operation::Delete,
    ])
    .required()
    .describe("ID of the contact"),
    FieldSpec::return_all_toggle(Resource::Contact),
    FieldSpec::limit(Resource::Contact),
    FieldSpec::string("name", "Name", Resource::Contact, &[Operation::Update])
        .describe("New display name"),
    FieldSpec::string("email", "Email", Resource::Contact, &[Operation::Update])
        .describe("New email")
        .placeholder("name@email.com"),
    // media
    FieldSpec::string("fileUrl", "File URL", Resource::Media, &[Operation::Upload])
        .required()
        .describe("Public URL to the file to upload (server will fetch it)"),
    FieldSpec::string("mediaId", "Media ID", Resource::Media, &[Operation::Get]).required(),
    FieldSpec::return_all_toggle(Resource::Media),
    FieldSpec::limit(Resource::Media),
    // session
    FieldSpec::string("sessionId", "Session ID", Resource::Session, &[Operation::Get]).required(),
    FieldSpec::return_all_toggle(Resource::Session),
    FieldSpec::limit(Resource::Session),
];

/// Fields accepted by one (resource, operation) pair, in display order.
pub fn fields_for(
    resource: Resource,
    operation: Operation,
) -> impl Iterator<Item = &'static FieldSpec> {
    FIELDS
        .iter()
        .filter(move |f| f.applies_to(resource, operation))
}

/// Look up a single field of a (resource, operation) pair.
pub fn field(resource: Resource, operation: Operation, name: &str) -> Option<&'static FieldSpec> {
    fields_for(resource, operation).find(|f| f.name == name)
}

pub fn resource_spec(resource: Resource) -> Option<&'static ResourceSpec> {
    RESOURCES.iter().find(|r| r.resource == resource)
}

/// Operation selected when the host does not supply one.
pub fn default_operation(resource: Resource) -> Operation {
    resource_spec(resource).map_or(Operation::Get, |r| r.default_operation)
}

/// Render the full node description consumed by the host's form renderer.
pub fn describe(capabilities: &Capabilities) -> Value {
    let resources: Vec<&ResourceSpec> = RESOURCES
        .iter()
        .filter(|r| capabilities.allows(r.resource))
        .collect();

    let mut properties = vec![json!({
        "displayName": "Resource",
        "name": "resource",
        "type": "options",
        "noDataExpression": true,
        "options": resources
            .iter()
            .map(|r| json!({ "name": r.name, "value": r.resource.as_str() }))
            .collect::<Vec<_>>(),
        "default": DEFAULT_RESOURCE.as_str(),
    })];

    for spec in &resources {
        properties.push(json!({
            "displayName": "Operation",
            "name": "operation",
            "type": "options",
            "noDataExpression": true,
            "displayOptions": { "show": { "resource": [spec.resource.as_str()] } },
            "options": spec
                .operations
                .iter()
                .map(|o| json!({
                    "name": o.name,
                    "value": o.operation.as_str(),
                    "description": o.description,
                    "action": o.action,
                }))
                .collect::<Vec<_>>(),
            "default": spec.default_operation.as_str(),
        }));
    }

    properties.extend(
        FIELDS
            .iter()
            .filter(|f| capabilities.allows(f.resource))
            .map(|f| f.to_property()),
    );

    json!({
        "displayName": "Sendtick",
        "name": "sendtick",
        "icon": "file:sendtick.svg",
        "group": ["transform"],
        "version": 1,
        "subtitle": "={{$parameter[\"operation\"] + \": \" + $parameter[\"resource\"]}}",
        "description": "Interact with Sendtick API for WhatsApp messaging",
        "defaults": { "name": "Sendtick" },
        "inputs": ["main"],
        "outputs": ["main"],
        "usableAsTool": true,
        "credentials": [{ "name": "sendtickApi", "required": true }],
        "properties": properties,
    })
}
