//! Form field handles and the state the console accumulates from them.
//!
//! The UI tree owns the actual input controls; this module only reads
//! through shared handles. A handle may be unmounted at call time (the
//! control is not currently rendered), in which case it is skipped rather
//! than treated as a failure.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use crate::types::FieldId;

/// Operations a mounted form field exposes to the runtime.
///
/// Implemented by the host's input controls. The runtime never mutates a
/// field through this trait; the two operations are reads of the control's
/// current state.
pub trait FormField: Send + Sync {
    /// Check the current input, returning a message when it is invalid.
    fn validate(&self) -> Option<String>;

    /// Read the current input value.
    fn value(&self) -> Value;
}

/// A nullable, shareable reference to a form field.
///
/// The owning UI mounts a field into the slot when the control renders and
/// unmounts it when the control goes away. Readers observe whichever state
/// the slot is in at call time; there is no ownership transfer through the
/// handle.
#[derive(Clone, Default)]
pub struct FieldRef {
    slot: Arc<RwLock<Option<Arc<dyn FormField>>>>,
}

impl FieldRef {
    /// A handle with nothing mounted.
    pub fn unmounted() -> Self {
        Self::default()
    }

    /// A handle with `field` already mounted.
    pub fn mounted(field: Arc<dyn FormField>) -> Self {
        let handle = Self::default();
        handle.mount(field);
        handle
    }

    /// Mount a field into the slot, replacing any previous occupant.
    pub fn mount(&self, field: Arc<dyn FormField>) {
        *self.slot.write().unwrap_or_else(PoisonError::into_inner) = Some(field);
    }

    /// Clear the slot.
    pub fn unmount(&self) {
        *self.slot.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// The currently mounted field, if any.
    pub fn current(&self) -> Option<Arc<dyn FormField>> {
        self.slot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Whether a field is mounted right now.
    pub fn is_mounted(&self) -> bool {
        self.slot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}

impl fmt::Debug for FieldRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldRef")
            .field("mounted", &self.is_mounted())
            .finish()
    }
}

/// Everything the user has entered into the console for one operation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormState {
    /// Path parameter values, keyed by placeholder name.
    #[serde(default)]
    pub path: BTreeMap<String, String>,

    /// Query parameter values.
    #[serde(default)]
    pub search: BTreeMap<String, String>,

    /// Header values.
    #[serde(default)]
    pub headers: BTreeMap<String, String>,

    /// Raw JSON body text, when the operation takes a JSON body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_json: Option<String>,

    /// Multipart parts (name, value) in submission order, when the
    /// operation takes a form-data body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_form_data: Option<Vec<(String, String)>>,
}

impl FormState {
    /// True when no values have been entered at all.
    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
            && self.search.is_empty()
            && self.headers.is_empty()
            && self.body_json.is_none()
            && self.body_form_data.is_none()
    }
}

/// Fold an ordered sequence of items into one mapping.
///
/// `extract` maps each item to an optional partial mapping; partials are
/// overlaid in sequence order, so later items overwrite earlier ones on
/// key collision. Items extracting to `None` contribute nothing.
pub fn merge<T, K, V, F>(items: impl IntoIterator<Item = T>, mut extract: F) -> BTreeMap<K, V>
where
    K: Ord,
    F: FnMut(T) -> Option<BTreeMap<K, V>>,
{
    items
        .into_iter()
        .fold(BTreeMap::new(), |mut acc, item| {
            if let Some(partial) = extract(item) {
                acc.extend(partial);
            }
            acc
        })
}

/// Run validation on every mounted field and gather the failures.
///
/// Unmounted handles are skipped. Returns `None` when nothing failed —
/// deliberately distinct from an empty map, so callers decide "can I
/// submit?" with a single presence check.
pub fn collect_errors(fields: &BTreeMap<FieldId, FieldRef>) -> Option<BTreeMap<FieldId, String>> {
    let mut errors = BTreeMap::new();

    for (id, handle) in fields {
        let Some(field) = handle.current() else {
            continue;
        };

        if let Some(error) = field.validate() {
            if !error.is_empty() {
                errors.insert(id.clone(), error);
            }
        }
    }

    if errors.is_empty() { None } else { Some(errors) }
}

/// Read the current value of every mounted field.
///
/// Unmounted handles are skipped; everything else is recorded verbatim,
/// including null and empty values. Always returns a map, never a sentinel.
pub fn collect_values(fields: &BTreeMap<FieldId, FieldRef>) -> BTreeMap<FieldId, Value> {
    let mut values = BTreeMap::new();

    for (id, handle) in fields {
        if let Some(field) = handle.current() {
            values.insert(id.clone(), field.value());
        }
    }

    values
}
