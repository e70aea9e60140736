//! Request/response types and the collaborators a form submits through.
//!
//! The crate ships no HTTP stack. Callers implement [`HttpClient`] over
//! whatever client they use; [`FormDataBuilder`] and [`parse_errors`] cover
//! the multipart encoding and the server error convention.

use crate::enums::Method;
use crate::error::TransportError;
use crate::options::StatusRange;
use crate::rules::to_js_string;
use crate::types::{ErrorMap, FieldMap, FileUpload};
use async_trait::async_trait;
use indexmap::IndexMap;
use serde_json::{Map, Value};
use std::sync::LazyLock;

/// Header set on requests whose body is multipart.
pub const CONTENT_TYPE_HEADER: &str = "Content-Type";
pub const MULTIPART_CONTENT_TYPE: &str = "multipart/form-data";

static ERRORS_PATH: LazyLock<serde_json_path::JsonPath> =
    LazyLock::new(|| serde_json_path::JsonPath::parse("$.errors").unwrap());

// ─── Collaborators ──────────────────────────────────────────────────────────

/// Sends one request per submission.
///
/// Implementations own timeouts and cancellation; transport-specific
/// settings arrive in [`Request::config`].
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Returns `Ok` for every response received, whatever its status.
    /// `Err` is reserved for requests that produced no response.
    async fn request(&self, request: Request) -> Result<Response, TransportError>;
}

/// Encodes field values and attached files as a multipart body.
pub trait PayloadBuilder: Send + Sync {
    fn build(&self, fields: &FieldMap, files: &IndexMap<String, FileUpload>) -> MultipartPayload;
}

/// Flattens fields the way browser `FormData` submissions are usually built:
///
/// - arrays become one `key[]` part per item
/// - null values are skipped
/// - fields with an attached file become file parts
/// - everything else becomes a text part
#[derive(Clone, Copy, Debug, Default)]
pub struct FormDataBuilder;

impl PayloadBuilder for FormDataBuilder {
    fn build(&self, fields: &FieldMap, files: &IndexMap<String, FileUpload>) -> MultipartPayload {
        let mut payload = MultipartPayload::default();
        for (key, value) in fields {
            if let Some(file) = files.get(key) {
                payload.push(key, PartBody::File(file.clone()));
                continue;
            }
            match value {
                Value::Null => {}
                Value::Array(items) => {
                    let name = format!("{key}[]");
                    for item in items {
                        payload.push(&name, PartBody::Text(to_js_string(item)));
                    }
                }
                other => payload.push(key, PartBody::Text(to_js_string(other))),
            }
        }
        payload
    }
}

// ─── Requests ───────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Request {
    pub method: Method,
    pub url: String,
    pub payload: Payload,
    pub headers: IndexMap<String, String>,
    /// Transport settings from [`crate::FormOptions::request_config`].
    pub config: Map<String, Value>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Payload {
    /// The form's field values as a JSON object.
    Json(Value),
    /// Used when at least one file is attached.
    Multipart(MultipartPayload),
}

impl Payload {
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Payload::Json(value) => Some(value),
            Payload::Multipart(_) => None,
        }
    }

    pub fn as_multipart(&self) -> Option<&MultipartPayload> {
        match self {
            Payload::Multipart(multipart) => Some(multipart),
            Payload::Json(_) => None,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct MultipartPayload {
    pub parts: Vec<Part>,
}

impl MultipartPayload {
    pub fn push(&mut self, name: impl Into<String>, body: PartBody) {
        self.parts.push(Part {
            name: name.into(),
            body,
        });
    }

    /// All parts with the given name, in order.
    pub fn get_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a PartBody> + 'a {
        self.parts
            .iter()
            .filter(move |part| part.name == name)
            .map(|part| &part.body)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Part {
    pub name: String,
    pub body: PartBody,
}

#[derive(Clone, Debug, PartialEq)]
pub enum PartBody {
    Text(String),
    File(FileUpload),
}

// ─── Responses ──────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Response {
    pub status: u16,
    /// Decoded response body; `Value::Null` when there was none.
    pub data: Value,
}

impl Response {
    pub fn new(status: u16, data: Value) -> Self {
        Response { status, data }
    }

    pub fn is_success(&self, range: &StatusRange) -> bool {
        range.contains(self.status)
    }
}

/// Extract per-field messages from a failed response body.
///
/// Expects `{"errors": {"field": ["message", ...]}}`; a single string is
/// accepted in place of the array. Entries of any other shape are dropped,
/// and a body without an `errors` object yields an empty map.
pub fn parse_errors(response: &Response) -> ErrorMap {
    let nodes = ERRORS_PATH.query(&response.data);
    let Some(Value::Object(entries)) = nodes.first() else {
        return ErrorMap::new();
    };

    entries
        .iter()
        .filter_map(|(field, messages)| {
            let messages = match messages {
                Value::String(message) => vec![message.clone()],
                Value::Array(items) => items
                    .iter()
                    .map(|item| item.as_str().map(str::to_string))
                    .collect::<Option<Vec<_>>>()?,
                _ => return None,
            };
            Some((field.clone(), messages))
        })
        .collect()
}
