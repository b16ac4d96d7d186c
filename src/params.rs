//! Operation parameter descriptors as declared by the API description.
//!
//! The console renders one field per parameter; this module carries the
//! descriptors opaquely (schemas and examples stay `serde_json::Value`)
//! and seeds initial form values from declared examples.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::form::merge;
use crate::types::SecuritySchemeKind;

/// Where a parameter is carried on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
    Path,
    Query,
    Header,
    Cookie,
}

/// A single operation parameter.
///
/// Everything except `name` and `location` is carried verbatim for the
/// field renderer; the runtime never interprets `schema` or `example`
/// beyond seeding defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub schema: Value,
    #[serde(rename = "in")]
    pub location: ParameterLocation,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub example: Value,
}

impl Parameter {
    /// The parameter's example rendered as field text, if it has one.
    ///
    /// Strings are taken verbatim; other scalars use their JSON rendering.
    /// Structured examples are not flattened into a single input.
    pub fn example_text(&self) -> Option<String> {
        match &self.example {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            Value::Bool(b) => Some(b.to_string()),
            Value::Number(n) => Some(n.to_string()),
            Value::Array(_) | Value::Object(_) => None,
        }
    }
}

/// A declared security requirement for an operation.
///
/// Only the `type` discriminator is consumed; every other property is
/// preserved opaquely so requirements round-trip without loss.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecurityRequirement {
    #[serde(rename = "type")]
    pub kind: SecuritySchemeKind,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl SecuritySchemeKind {
    /// Whether this scheme triggers the synthetic Authorization header.
    pub fn is_oauth2(&self) -> bool {
        self.as_str() == "oauth2"
    }
}

impl SecurityRequirement {
    /// Create a requirement with no extra properties.
    pub fn new(kind: impl Into<SecuritySchemeKind>) -> Self {
        Self {
            kind: kind.into(),
            extra: serde_json::Map::new(),
        }
    }
}

/// Fold parameter examples into the initial name→text mapping the console
/// seeds its inputs from. Parameters without a usable example contribute
/// nothing; on a name collision the later parameter wins.
pub fn default_values(params: &[Parameter]) -> BTreeMap<String, String> {
    merge(params, |param| {
        param
            .example_text()
            .map(|text| BTreeMap::from([(param.name.clone(), text)]))
    })
}
