//! Runtime building blocks for an OpenAPI "try it" console.
//!
//! A host application renders one input field per operation parameter and
//! registers a [`FieldRef`] handle for each; this crate does the rest of
//! the submission plumbing:
//!
//! - [`merge`] folds per-parameter example values into the initial form
//!   mapping ([`default_values`]),
//! - [`prepare_headers`] augments declared header parameters with the
//!   synthetic `Authorization` entry OAuth2-secured operations need,
//! - [`collect_errors`] / [`collect_values`] read validation results and
//!   current values out of the mounted fields,
//! - [`prepare_request`] resolves the URL template, query string, headers
//!   and body into a [`PreparedRequest`],
//! - [`RequestExecutor`] turns that into an actual HTTP call.
//!
//! The collection and preparation helpers are synchronous and infallible:
//! validation failures are values, unmounted fields are skipped, and
//! malformed templates or unknown body types pass through silently.

mod client;
mod config;
mod error;
mod form;
mod params;
mod request;
mod types;

pub use client::RequestExecutor;
pub use config::SandboxConfig;
pub use error::{SandboxError, SandboxResult};
pub use form::{FieldRef, FormField, FormState, collect_errors, collect_values, merge};
pub use params::{Parameter, ParameterLocation, SecurityRequirement, default_values};
pub use request::{
    BodyType, PreparedBody, PreparedRequest, prepare_body, prepare_headers, prepare_request,
};
pub use types::{FieldId, SecuritySchemeKind};

use serde_json::Value;
use std::collections::BTreeMap;

/// Validate and read the whole field registry in one step.
///
/// Returns the collected values when every mounted field validates, or
/// [`SandboxError::Validation`] carrying the per-field messages otherwise.
/// This is the submit-button path; hosts that want to show errors inline
/// without failing use [`collect_errors`] and [`collect_values`] directly.
pub fn read_form(
    fields: &BTreeMap<FieldId, FieldRef>,
) -> SandboxResult<BTreeMap<FieldId, Value>> {
    match collect_errors(fields) {
        Some(errors) => Err(SandboxError::Validation(errors)),
        None => Ok(collect_values(fields)),
    }
}
