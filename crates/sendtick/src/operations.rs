//! Pure request builders, one per (resource, operation).
//!
//! Every builder validates its input and returns the [`RequestSpec`] to send;
//! nothing here touches the network. Empty strings are treated as absent.

use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    recipient::normalize_recipient,
    request::{JsonBody, RequestSpec, item_path},
    resource::{Operation, Resource},
};

/// Page size used by list operations when none is given.
pub const DEFAULT_LIMIT: u64 = 50;
/// Smallest accepted page size.
pub const MIN_LIMIT: u64 = 1;

/// Input for `message/send`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SendMessage {
    pub session_id: String,
    /// Phone number or JID; normalized before sending.
    pub to: String,
    pub message: String,
    pub media_url: String,
    pub file_name: String,
}

/// Input for `contact/create`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewContact {
    pub phone: String,
    pub name: String,
    pub email: String,
}

/// Input for `contact/update`; only non-empty fields are changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactUpdate {
    pub name: String,
    pub email: String,
}

/// Paging for list operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListOptions {
    /// Fetch everything the API returns; `limit` is ignored.
    pub return_all: bool,
    pub limit: u64,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            return_all: false,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl ListOptions {
    pub fn all() -> Self {
        Self {
            return_all: true,
            ..Self::default()
        }
    }

    pub fn limit(limit: u64) -> Self {
        Self {
            return_all: false,
            limit,
        }
    }
}

fn required<'a>(
    value: &'a str,
    field: &str,
    resource: Resource,
    operation: Operation,
) -> Result<&'a str> {
    if value.is_empty() {
        return Err(Error::validation(format!(
            "`{field}` is required for {resource}/{operation}"
        )));
    }
    Ok(value)
}

fn list(collection: &str, options: ListOptions) -> Result<RequestSpec> {
    let spec = RequestSpec::get(collection);
    if options.return_all {
        return Ok(spec);
    }
    if options.limit < MIN_LIMIT {
        return Err(Error::validation(format!(
            "`limit` must be at least {MIN_LIMIT}"
        )));
    }
    Ok(spec.with_query("limit", options.limit))
}

// ── message ─────────────────────────────────────────────────────────────────

pub fn send_message(input: &SendMessage) -> Result<RequestSpec> {
    if input.session_id.is_empty() {
        return Err(Error::validation(
            "sessionId is required for sending messages",
        ));
    }
    let to = normalize_recipient(&input.to)?;
    if input.message.is_empty() && input.media_url.is_empty() {
        return Err(Error::validation(
            "Either `message` or `mediaUrl` must be provided",
        ));
    }

    let body = JsonBody::new()
        .field("sessionId", &input.session_id)
        .field("to", &to)
        .optional("message", &input.message)
        .optional("mediaUrl", &input.media_url)
        .optional("fileName", &input.file_name);
    Ok(RequestSpec::post("/messages", body))
}

// ── contact ─────────────────────────────────────────────────────────────────

pub fn create_contact(input: &NewContact) -> Result<RequestSpec> {
    let phone = required(&input.phone, "phone", Resource::Contact, Operation::Create)?;
    let body = JsonBody::new()
        .field("phone", phone)
        .optional("name", &input.name)
        .optional("email", &input.email);
    Ok(RequestSpec::post("/contacts", body))
}

pub fn get_contact(contact_id: &str) -> Result<RequestSpec> {
    let id = required(contact_id, "contactId", Resource::Contact, Operation::Get)?;
    Ok(RequestSpec::get(item_path("/contacts", id)))
}

pub fn list_contacts(options: ListOptions) -> Result<RequestSpec> {
    list("/contacts", options)
}

pub fn update_contact(contact_id: &str, update: &ContactUpdate) -> Result<RequestSpec> {
    let id = required(contact_id, "contactId", Resource::Contact, Operation::Update)?;
    let body = JsonBody::new()
        .optional("name", &update.name)
        .optional("email", &update.email);
    Ok(RequestSpec::put(item_path("/contacts", id), body))
}

pub fn delete_contact(contact_id: &str) -> Result<RequestSpec> {
    let id = required(contact_id, "contactId", Resource::Contact, Operation::Delete)?;
    Ok(RequestSpec::delete(item_path("/contacts", id)))
}

// ── media ───────────────────────────────────────────────────────────────────

pub fn upload_media(file_url: &str) -> Result<RequestSpec> {
    let url = required(file_url, "fileUrl", Resource::Media, Operation::Upload)?;
    Ok(RequestSpec::post("/media", JsonBody::new().field("url", url)))
}

pub fn get_media(media_id: &str) -> Result<RequestSpec> {
    let id = required(media_id, "mediaId", Resource::Media, Operation::Get)?;
    Ok(RequestSpec::get(item_path("/media", id)))
}

pub fn list_media(options: ListOptions) -> Result<RequestSpec> {
    list("/media", options)
}

// ── session ─────────────────────────────────────────────────────────────────

pub fn get_session(session_id: &str) -> Result<RequestSpec> {
    let id = required(session_id, "sessionId", Resource::Session, Operation::Get)?;
    Ok(RequestSpec::get(item_path("/sessions", id)))
}

pub fn list_sessions(options: ListOptions) -> Result<RequestSpec> {
    list("/sessions", options)
}

// ── Call ────────────────────────────────────────────────────────────────────

/// A validated-by-shape request for one (resource, operation) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    SendMessage(SendMessage),
    CreateContact(NewContact),
    GetContact { contact_id: String },
    ListContacts(ListOptions),
    UpdateContact {
        contact_id: String,
        update: ContactUpdate,
    },
    DeleteContact { contact_id: String },
    UploadMedia { file_url: String },
    GetMedia { media_id: String },
    ListMedia(ListOptions),
    GetSession { session_id: String },
    ListSessions(ListOptions),
}

impl Call {
    pub fn resource(&self) -> Resource {
        match self {
            Self::SendMessage(_) => Resource::Message,
            Self::CreateContact(_)
            | Self::GetContact { .. }
            | Self::ListContacts(_)
            | Self::UpdateContact { .. }
            | Self::DeleteContact { .. } => Resource::Contact,
            Self::UploadMedia { .. } | Self::GetMedia { .. } | Self::ListMedia(_) => {
                Resource::Media
            },
            Self::GetSession { .. } | Self::ListSessions(_) => Resource::Session,
        }
    }

    pub fn operation(&self) -> Operation {
        match self {
            Self::SendMessage(_) => Operation::Send,
            Self::CreateContact(_) => Operation::Create,
            Self::GetContact { .. } | Self::GetMedia { .. } | Self::GetSession { .. } => {
                Operation::Get
            },
            Self::ListContacts(_) | Self::ListMedia(_) | Self::ListSessions(_) => {
                Operation::GetAll
            },
            Self::UpdateContact { .. } => Operation::Update,
            Self::DeleteContact { .. } => Operation::Delete,
            Self::UploadMedia { .. } => Operation::Upload,
        }
    }

    /// Build the outbound request, validating the input on the way.
    pub fn to_request(&self) -> Result<RequestSpec> {
        match self {
            Self::SendMessage(input) => send_message(input),
            Self::CreateContact(input) => create_contact(input),
            Self::GetContact { contact_id } => get_contact(contact_id),
            Self::ListContacts(options) => list_contacts(*options),
            Self::UpdateContact { contact_id, update } => update_contact(contact_id, update),
            Self::DeleteContact { contact_id } => delete_contact(contact_id),
            Self::UploadMedia { file_url } => upload_media(file_url),
            Self::GetMedia { media_id } => get_media(media_id),
            Self::ListMedia(options) => list_media(*options),
            Self::GetSession { session_id } => get_session(session_id),
            Self::ListSessions(options) => list_sessions(*options),
        }
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {super::*, reqwest::Method, serde_json::json};

    fn valid_send() -> SendMessage {
        SendMessage {
            session_id: "sess_1".into(),
            to: "+60123456789".into(),
            message: "hello".into(),
            ..Default::default()
        }
    }

    #[test]
    fn send_builds_post_with_normalized_recipient() {
        let spec = send_message(&valid_send()).unwrap();
        assert_eq!(spec.method, Method::POST);
        assert_eq!(spec.path, "/messages");
        assert_eq!(
            spec.body,
            Some(json!({
                "sessionId": "sess_1",
                "to": "60123456789@s.whatsapp.net",
                "message": "hello",
            }))
        );
        assert!(spec.query.is_empty());
    }

    #[test]
    fn send_with_media_only() {
        let input = SendMessage {
            message: String::new(),
            media_url: "https://cdn.example.com/a.pdf".into(),
            file_name: "a.pdf".into(),
            ..valid_send()
        };
        let body = send_message(&input).unwrap().body.unwrap();
        assert_eq!(body["mediaUrl"], "https://cdn.example.com/a.pdf");
        assert_eq!(body["fileName"], "a.pdf");
        assert!(body.get("message").is_none());
    }

    #[test]
    fn send_requires_message_or_media() {
        let input = SendMessage {
            message: String::new(),
            ..valid_send()
        };
        let err = send_message(&input).unwrap_err();
        assert!(err.is_validation());
        assert_eq!(
            err.to_string(),
            "Either `message` or `mediaUrl` must be provided"
        );
    }

    #[test]
    fn send_requires_session_id_first() {
        let input = SendMessage {
            session_id: String::new(),
            to: "not a number".into(),
            ..valid_send()
        };
        let err = send_message(&input).unwrap_err();
        assert_eq!(err.to_string(), "sessionId is required for sending messages");
    }

    #[test]
    fn send_rejects_bad_recipient() {
        let input = SendMessage {
            to: "abc".into(),
            ..valid_send()
        };
        assert!(send_message(&input).unwrap_err().is_validation());
    }

    #[test]
    fn list_limit_and_return_all() {
        let spec = list_contacts(ListOptions::limit(10)).unwrap();
        assert_eq!(spec.query, vec![("limit".to_string(), "10".to_string())]);

        let spec = list_contacts(ListOptions::all()).unwrap();
        assert!(spec.query.is_empty());
        assert_eq!(spec.query_param("limit"), None);

        let spec = list_sessions(ListOptions::default()).unwrap();
        assert_eq!(spec.query_param("limit"), Some("50"));
    }

    #[test]
    fn list_rejects_zero_limit_unless_return_all() {
        assert!(list_media(ListOptions::limit(0)).unwrap_err().is_validation());
        let spec = list_media(ListOptions {
            return_all: true,
            limit: 0,
        })
        .unwrap();
        assert_eq!(spec.path, "/media");
    }

    #[test]
    fn contact_paths_and_methods() {
        let get = get_contact("42").unwrap();
        assert_eq!((get.method, get.path.as_str()), (Method::GET, "/contacts/42"));

        let del = delete_contact("42").unwrap();
        assert_eq!((del.method, del.path.as_str()), (Method::DELETE, "/contacts/42"));
        assert!(del.body.is_none());

        let put = update_contact("42", &ContactUpdate {
            name: "Aisha".into(),
            email: String::new(),
        })
        .unwrap();
        assert_eq!(put.method, Method::PUT);
        assert_eq!(put.body, Some(json!({ "name": "Aisha" })));
    }

    #[test]
    fn update_with_nothing_sends_empty_object() {
        let put = update_contact("42", &ContactUpdate::default()).unwrap();
        assert_eq!(put.body, Some(json!({})));
    }

    #[test]
    fn create_contact_requires_phone() {
        let err = create_contact(&NewContact::default()).unwrap_err();
        assert_eq!(err.to_string(), "`phone` is required for contact/create");

        let spec = create_contact(&NewContact {
            phone: "+60123456789".into(),
            name: "Aisha".into(),
            email: String::new(),
        })
        .unwrap();
        assert_eq!(spec.body, Some(json!({ "phone": "+60123456789", "name": "Aisha" })));
    }

    #[test]
    fn identifiers_are_required() {
        assert_eq!(
            get_contact("").unwrap_err().to_string(),
            "`contactId` is required for contact/get"
        );
        assert_eq!(
            get_media("").unwrap_err().to_string(),
            "`mediaId` is required for media/get"
        );
        assert_eq!(
            get_session("").unwrap_err().to_string(),
            "`sessionId` is required for session/get"
        );
        assert_eq!(
            upload_media("").unwrap_err().to_string(),
            "`fileUrl` is required for media/upload"
        );
    }

    #[test]
    fn media_upload_wraps_url() {
        let spec = upload_media("https://cdn.example.com/cat.png").unwrap();
        assert_eq!(spec.method, Method::POST);
        assert_eq!(spec.body, Some(json!({ "url": "https://cdn.example.com/cat.png" })));
    }

    #[test]
    fn call_reports_its_pair() {
        let call = Call::UpdateContact {
            contact_id: "7".into(),
            update: ContactUpdate::default(),
        };
        assert_eq!(call.resource(), Resource::Contact);
        assert_eq!(call.operation(), Operation::Update);
        assert_eq!(call.to_request().unwrap().path, "/contacts/7");

        let call = Call::ListSessions(ListOptions::all());
        assert_eq!((call.resource(), call.operation()), (Resource::Session, Operation::GetAll));
    }
}
