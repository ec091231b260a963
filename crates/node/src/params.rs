//! Turns host parameters for one item into a typed [`Call`].
//!
//! Only fields the schema declares for the selected (resource, operation)
//! are read; anything the host leaves empty takes the schema default.

use {
    sendtick::{
        Call, ContactUpdate, Error, ListOptions, NewContact, Operation, Resource, Result,
        SendMessage,
        schema::{self, DEFAULT_RESOURCE, FieldKind},
    },
    serde_json::Value,
};

use crate::context::ExecuteContext;

/// Resolve the call described by item `item_index`'s parameters.
pub fn extract_call(ctx: &dyn ExecuteContext, item_index: usize) -> Result<Call> {
    let params = Params::resolve(ctx, item_index)?;
    let (resource, operation) = (params.resource, params.operation);

    let call = match (resource, operation) {
        (Resource::Message, Operation::Send) => Call::SendMessage(SendMessage {
            session_id: params.string("sessionId")?,
            to: params.string("to")?,
            message: params.string("message")?,
            media_url: params.string("mediaUrl")?,
            file_name: params.string("fileName")?,
        }),
        (Resource::Contact, Operation::Create) => Call::CreateContact(NewContact {
            phone: params.string("phone")?,
            name: params.string("name")?,
            email: params.string("email")?,
        }),
        (Resource::Contact, Operation::Get) => Call::GetContact {
            contact_id: params.string("contactId")?,
        },
        (Resource::Contact, Operation::GetAll) => Call::ListContacts(params.list_options()?),
        (Resource::Contact, Operation::Update) => Call::UpdateContact {
            contact_id: params.string("contactId")?,
            update: ContactUpdate {
                name: params.string("name")?,
                email: params.string("email")?,
            },
        },
        (Resource::Contact, Operation::Delete) => Call::DeleteContact {
            contact_id: params.string("contactId")?,
        },
        (Resource::Media, Operation::Upload) => Call::UploadMedia {
            file_url: params.string("fileUrl")?,
        },
        (Resource::Media, Operation::Get) => Call::GetMedia {
            media_id: params.string("mediaId")?,
        },
        (Resource::Media, Operation::GetAll) => Call::ListMedia(params.list_options()?),
        (Resource::Session, Operation::Get) => Call::GetSession {
            session_id: params.string("sessionId")?,
        },
        (Resource::Session, Operation::GetAll) => Call::ListSessions(params.list_options()?),
        _ => return Err(Error::unsupported(resource, operation)),
    };
    Ok(call)
}

struct Params<'a> {
    ctx: &'a dyn ExecuteContext,
    item_index: usize,
    resource: Resource,
    operation: Operation,
}

impl<'a> Params<'a> {
    fn resolve(ctx: &'a dyn ExecuteContext, item_index: usize) -> Result<Self> {
        let resource_name = selector(ctx, "resource", item_index)?;
        let operation_name = selector(ctx, "operation", item_index)?;

        let resource = match resource_name.as_deref() {
            None => DEFAULT_RESOURCE,
            Some(name) => Resource::parse(name).ok_or_else(|| {
                Error::unsupported(name, operation_name.as_deref().unwrap_or_default())
            })?,
        };
        let operation = match operation_name.as_deref() {
            None => schema::default_operation(resource),
            Some(name) => Operation::parse(name)
                .filter(|op| resource.supports(*op))
                .ok_or_else(|| Error::unsupported(resource, name))?,
        };

        Ok(Self {
            ctx,
            item_index,
            resource,
            operation,
        })
    }

    /// Value supplied by the host, or the schema default.
    fn value(&self, name: &str, expected: FieldKind) -> Result<Value> {
        let field = schema::field(self.resource, self.operation, name).ok_or_else(|| {
            Error::validation(format!(
                "`{name}` is not a parameter of {}/{}",
                self.resource, self.operation
            ))
        })?;
        debug_assert_eq!(field.kind, expected);
        Ok(self
            .ctx
            .node_parameter(name, self.item_index)
            .filter(|v| !v.is_null())
            .unwrap_or_else(|| field.default.to_value()))
    }

    fn string(&self, name: &str) -> Result<String> {
        match self.value(name, FieldKind::String)? {
            Value::String(s) => Ok(s),
            Value::Number(n) => Ok(n.to_string()),
            Value::Bool(b) => Ok(b.to_string()),
            _ => Err(Error::validation(format!("`{name}` must be a string"))),
        }
    }

    fn number(&self, name: &str) -> Result<u64> {
        let value = self.value(name, FieldKind::Number)?;
        let parsed = match &value {
            Value::Number(n) => n.as_u64().or_else(|| whole_number(n.as_f64()?)),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        };
        parsed.ok_or_else(|| {
            Error::validation(format!("`{name}` must be a non-negative integer, got {value}"))
        })
    }

    fn boolean(&self, name: &str) -> Result<bool> {
        match self.value(name, FieldKind::Boolean)? {
            Value::Bool(b) => Ok(b),
            Value::String(s) if s == "true" => Ok(true),
            Value::String(s) if s == "false" => Ok(false),
            other => Err(Error::validation(format!(
                "`{name}` must be a boolean, got {other}"
            ))),
        }
    }

    fn list_options(&self) -> Result<ListOptions> {
        if self.boolean("returnAll")? {
            return Ok(ListOptions::all());
        }
        Ok(ListOptions::limit(self.number("limit")?))
    }
}

/// Hosts may serialize integers as floats (`10.0`).
fn whole_number(value: f64) -> Option<u64> {
    (value.fract() == 0.0 && (0.0..=u64::MAX as f64).contains(&value)).then_some(value as u64)
}

/// Read `resource` / `operation`; absent or empty means "use the default".
fn selector(ctx: &dyn ExecuteContext, name: &str, item_index: usize) -> Result<Option<String>> {
    match ctx.node_parameter(name, item_index) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.is_empty() => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(other) => Err(Error::validation(format!(
            "`{name}` must be a string, got {other}"
        ))),
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::context::StaticContext,
        rstest::rstest,
        sendtick::operations::DEFAULT_LIMIT,
        sendtick_common::Item,
        serde_json::json,
    };

    fn call_for(params: Value) -> Result<Call> {
        let ctx = StaticContext::new(vec![Item::new(params)]);
        extract_call(&ctx, 0)
    }

    #[test]
    fn defaults_to_message_send() {
        let call = call_for(json!({ "sessionId": "s1", "to": "60123", "message": "hi" })).unwrap();
        assert_eq!(
            call,
            Call::SendMessage(SendMessage {
                session_id: "s1".into(),
                to: "60123".into(),
                message: "hi".into(),
                ..Default::default()
            })
        );
    }

    #[test]
    fn operation_defaults_per_resource() {
        let call = call_for(json!({ "resource": "contact" })).unwrap();
        assert_eq!(call, Call::ListContacts(ListOptions::limit(DEFAULT_LIMIT)));

        let call = call_for(json!({ "resource": "media", "fileUrl": "https://x.test/a" })).unwrap();
        assert_eq!(call.operation(), Operation::Upload);
    }

    #[rstest]
    #[case(json!({ "resource": "contact", "operation": "getAll", "returnAll": true }), ListOptions::all())]
    #[case(json!({ "resource": "contact", "operation": "getAll", "limit": 10 }), ListOptions::limit(10))]
    #[case(json!({ "resource": "contact", "operation": "getAll", "limit": "25" }), ListOptions::limit(25))]
    #[case(json!({ "resource": "contact", "operation": "getAll", "returnAll": "false", "limit": 5 }), ListOptions::limit(5))]
    #[case(json!({ "resource": "contact", "operation": "getAll", "limit": 10.0 }), ListOptions::limit(10))]
    // limit is not consulted once returnAll is set
    #[case(json!({ "resource": "contact", "operation": "getAll", "returnAll": true, "limit": "junk" }), ListOptions::all())]
    fn list_paging(#[case] params: Value, #[case] expected: ListOptions) {
        assert_eq!(call_for(params).unwrap(), Call::ListContacts(expected));
    }

    #[test]
    fn numbers_and_booleans_become_strings() {
        let call = call_for(json!({
            "resource": "contact",
            "operation": "get",
            "contactId": 42,
        }))
        .unwrap();
        assert_eq!(call, Call::GetContact {
            contact_id: "42".into()
        });
    }

    #[rstest]
    #[case(json!({ "resource": "contact", "operation": "getAll", "limit": -1 }), "`limit` must be a non-negative integer, got -1")]
    #[case(json!({ "resource": "contact", "operation": "getAll", "limit": 2.5 }), "`limit` must be a non-negative integer, got 2.5")]
    #[case(json!({ "resource": "contact", "operation": "getAll", "limit": -3.0 }), "`limit` must be a non-negative integer, got -3.0")]
    #[case(json!({ "resource": "contact", "operation": "getAll", "limit": "ten" }), "`limit` must be a non-negative integer, got \"ten\"")]
    #[case(json!({ "resource": "contact", "operation": "getAll", "returnAll": "yes" }), "`returnAll` must be a boolean, got \"yes\"")]
    #[case(json!({ "resource": "contact", "operation": "get", "contactId": ["1"] }), "`contactId` must be a string")]
    #[case(json!({ "resource": 3 }), "`resource` must be a string, got 3")]
    fn type_mismatches_are_validation_errors(#[case] params: Value, #[case] message: &str) {
        let err = call_for(params).unwrap_err();
        assert!(err.is_validation());
        assert_eq!(err.to_string(), message);
    }

    #[rstest]
    #[case(json!({ "resource": "webhook" }), "Unsupported resource/operation: webhook/")]
    #[case(json!({ "resource": "webhook", "operation": "get" }), "Unsupported resource/operation: webhook/get")]
    #[case(json!({ "resource": "message", "operation": "getAll" }), "Unsupported resource/operation: message/getAll")]
    #[case(json!({ "resource": "session", "operation": "delete" }), "Unsupported resource/operation: session/delete")]
    #[case(json!({ "resource": "contact", "operation": "archive" }), "Unsupported resource/operation: contact/archive")]
    fn unknown_pairs_are_unsupported(#[case] params: Value, #[case] message: &str) {
        let err = call_for(params).unwrap_err();
        assert!(matches!(err, Error::Unsupported { .. }));
        assert_eq!(err.to_string(), message);
    }

    #[test]
    fn fields_of_other_operations_are_ignored() {
        // `message` belongs to message/send, not contact/delete.
        let call = call_for(json!({
            "resource": "contact",
            "operation": "delete",
            "contactId": "7",
            "message": { "not": "a string" },
        }))
        .unwrap();
        assert_eq!(call, Call::DeleteContact {
            contact_id: "7".into()
        });
    }

    #[test]
    fn null_parameters_take_defaults() {
        let call = call_for(json!({
            "resource": "session",
            "operation": null,
            "returnAll": null,
            "limit": null,
        }))
        .unwrap();
        assert_eq!(call, Call::ListSessions(ListOptions::limit(DEFAULT_LIMIT)));
    }

    #[test]
    fn extracts_every_declared_field() {
        for resource in Resource::ALL {
            for &operation in resource.operations() {
                let params: serde_json::Map<String, Value> = schema::fields_for(resource, operation)
                    .map(|f| {
                        let value = match f.kind {
                            FieldKind::String => json!("x"),
                            FieldKind::Number => json!(3),
                            FieldKind::Boolean => json!(false),
                        };
                        (f.name.to_string(), value)
                    })
                    .chain([
                        ("resource".to_string(), json!(resource.as_str())),
                        ("operation".to_string(), json!(operation.as_str())),
                    ])
                    .collect();
                let call = call_for(Value::Object(params)).unwrap();
                assert_eq!(call.resource(), resource);
                assert_eq!(call.operation(), operation);
            }
        }
    }
}
