use {
    reqwest::Method,
    serde::Serialize,
    serde_json::{Map, Value},
};

/// A fully-determined outbound call: method, path below the API root,
/// optional JSON body, and query pairs (empty when unused).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequestSpec {
    #[serde(serialize_with = "serialize_method")]
    pub method: Method,
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub query: Vec<(String, String)>,
}

fn serialize_method<S: serde::Serializer>(method: &Method, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(method.as_str())
}

impl RequestSpec {
    fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            query: Vec::new(),
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn post(path: impl Into<String>, body: JsonBody) -> Self {
        Self::new(Method::POST, path).with_body(body)
    }

    pub fn put(path: impl Into<String>, body: JsonBody) -> Self {
        Self::new(Method::PUT, path).with_body(body)
    }

    fn with_body(mut self, body: JsonBody) -> Self {
        self.body = Some(Value::Object(body.0));
        self
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    /// Look up a query parameter by name.
    pub fn query_param(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// JSON object body that drops empty optional fields instead of sending
/// them as `null` or `""`.
#[derive(Debug, Default)]
pub struct JsonBody(Map<String, Value>);

impl JsonBody {
    pub fn new() -> Self {
        Self::default()
    }

    /// Always written, even when empty.
    pub fn field(mut self, key: &str, value: &str) -> Self {
        self.0.insert(key.into(), Value::String(value.into()));
        self
    }

    /// Written only when `value` is non-empty.
    pub fn optional(self, key: &str, value: &str) -> Self {
        if value.is_empty() {
            self
        } else {
            self.field(key, value)
        }
    }
}

/// Join a collection path and an identifier, percent-encoding the identifier.
pub(crate) fn item_path(collection: &str, id: &str) -> String {
    format!("{collection}/{}", urlencoding::encode(id))
}
