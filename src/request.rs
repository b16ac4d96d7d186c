//! Turning form state into a request descriptor.
//!
//! `prepare_request` resolves the operation's URL template, query string,
//! headers and body into a [`PreparedRequest`] ready to hand to an HTTP
//! client. Nothing here fails: unknown body types and unmatched path
//! placeholders degrade silently, matching what the console shows the
//! user (the raw template) rather than aborting the attempt.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::BTreeMap;
use url::form_urlencoded;

use crate::form::FormState;
use crate::params::{Parameter, ParameterLocation, SecurityRequirement};

/// Characters to escape in a substituted path value.
///
/// Everything non-alphanumeric except the unreserved marks, i.e. the same
/// set `encodeURIComponent` leaves alone, so path values encode the way
/// browser consoles encode them (space -> %20, slash -> %2F).
const PATH_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Body content types the console serializes specially.
///
/// Any other declared MIME type (including
/// `application/x-www-form-urlencoded`, which the console does not yet
/// handle) maps to no body at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BodyType {
    #[serde(rename = "application/json")]
    Json,
    #[serde(rename = "multipart/form-data")]
    Multipart,
}

impl BodyType {
    /// The MIME string for this body type.
    pub fn as_mime(&self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::Multipart => "multipart/form-data",
        }
    }

    /// Parse a declared MIME string. Unrecognized types are `None`.
    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime {
            "application/json" => Some(Self::Json),
            "multipart/form-data" => Some(Self::Multipart),
            _ => None,
        }
    }
}

/// The body payload selected for a request.
///
/// The inner options are the user's (possibly absent) input: a declared
/// JSON body with nothing typed into it is `Json(None)`, which is not the
/// same as `Empty` (no body declared at all).
#[derive(Debug, Clone, PartialEq, Default)]
pub enum PreparedBody {
    /// Raw JSON text, sent as-is without well-formedness checks.
    Json(Option<String>),
    /// Multipart parts (name, value) in submission order.
    Multipart(Option<Vec<(String, String)>>),
    /// No body.
    #[default]
    Empty,
}

impl PreparedBody {
    /// True when no body will be sent.
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

/// A fully resolved request: final URL, header map, body payload.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedRequest {
    pub url: String,
    pub headers: BTreeMap<String, String>,
    pub body: PreparedBody,
}

/// Select the body representation for the declared content type.
///
/// Three-way dispatch: JSON and multipart each wrap the corresponding form
/// input; anything else carries no body.
pub fn prepare_body(body_type: Option<BodyType>, state: &FormState) -> PreparedBody {
    match body_type {
        Some(BodyType::Json) => PreparedBody::Json(state.body_json.clone()),
        Some(BodyType::Multipart) => PreparedBody::Multipart(state.body_form_data.clone()),
        None => PreparedBody::Empty,
    }
}

/// Copy the operation's header parameters, appending a synthetic
/// `Authorization` descriptor when any security requirement is OAuth2.
///
/// The caller's list is never mutated; original order is preserved and the
/// synthetic entry, when present, comes last.
pub fn prepare_headers(
    headers: Option<&[Parameter]>,
    security: Option<&[SecurityRequirement]>,
) -> Vec<Parameter> {
    let mut prepared: Vec<Parameter> = headers.map(<[Parameter]>::to_vec).unwrap_or_default();

    let has_oauth2 = security.is_some_and(|reqs| reqs.iter().any(|req| req.kind.is_oauth2()));
    if has_oauth2 {
        prepared.push(Parameter {
            name: "Authorization".to_string(),
            schema: json!({"type": "string"}),
            location: ParameterLocation::Header,
            required: true,
            description: String::new(),
            example: json!("Bearer <token>"),
        });
    }

    prepared
}

/// Resolve a URL template and form state into a [`PreparedRequest`].
///
/// Path values replace the first occurrence of their literal `{key}` token,
/// percent-encoded; keys without a matching token leave the URL untouched.
/// Query pairs are appended in map order. When the body is JSON, the header
/// map gains (or overrides) `Content-Type: application/json`.
pub fn prepare_request(
    url_template: &str,
    state: &FormState,
    body_type: Option<BodyType>,
) -> PreparedRequest {
    let mut url = url_template.to_string();
    for (key, value) in &state.path {
        let token = format!("{{{key}}}");
        match url.find(&token) {
            Some(at) => {
                let encoded = utf8_percent_encode(value, PATH_VALUE).to_string();
                url.replace_range(at..at + token.len(), &encoded);
            }
            None => {
                tracing::warn!(key = %key, template = %url_template, "no placeholder for path parameter");
            }
        }
    }

    let mut query = form_urlencoded::Serializer::new(String::new());
    for (key, value) in &state.search {
        query.append_pair(key, value);
    }
    let query = query.finish();
    if !query.is_empty() {
        url.push('?');
        url.push_str(&query);
    }

    let mut headers = state.headers.clone();
    if body_type == Some(BodyType::Json) {
        headers.insert("Content-Type".to_string(), BodyType::Json.as_mime().to_string());
    }

    tracing::debug!(url = %url, "resolved request target");

    PreparedRequest {
        url,
        headers,
        body: prepare_body(body_type, state),
    }
}
