//! NewType wrappers for strong typing across the sandbox runtime.
//!
//! These prevent accidental mixing of semantically different strings
//! (e.g. passing a header name where a field identifier is expected).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Macro to generate a NewType wrapper with standard trait implementations.
macro_rules! newtype_string {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new instance.
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// Get the inner value as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume and return the inner String.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::borrow::Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }
    };
}

newtype_string!(
    /// Identifier of a form field within the console.
    ///
    /// This is the key the surrounding UI uses when registering a field
    /// handle, and the key under which collected values and validation
    /// errors are reported back. Typically the parameter name the field
    /// edits, but the runtime treats it as opaque.
    FieldId
);

newtype_string!(
    /// Security scheme discriminator from an operation's security list
    /// (e.g. "oauth2", "apiKey", "http").
    ///
    /// Carried as an open string rather than a closed enum: operations may
    /// declare scheme types this crate has no special handling for, and
    /// those must survive a deserialize/serialize round trip untouched.
    SecuritySchemeKind
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_id_creation() {
        let id = FieldId::new("petId");
        assert_eq!(id.as_str(), "petId");
        assert_eq!(id.to_string(), "petId");
    }

    #[test]
    fn test_field_id_from_string() {
        let id: FieldId = "petId".into();
        assert_eq!(id.as_str(), "petId");

        let id: FieldId = String::from("userId").into();
        assert_eq!(id.as_str(), "userId");
    }

    #[test]
    fn test_field_id_into_inner() {
        let id = FieldId::new("petId");
        let inner: String = id.into_inner();
        assert_eq!(inner, "petId");
    }

    #[test]
    fn test_field_id_serde_transparent() {
        let id = FieldId::new("petId");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"petId\"");

        let parsed: FieldId = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn test_field_id_ordering_for_map_keys() {
        use std::collections::BTreeMap;

        let mut map = BTreeMap::new();
        map.insert(FieldId::new("b"), 2);
        map.insert(FieldId::new("a"), 1);

        let keys: Vec<&str> = map.keys().map(FieldId::as_str).collect();
        assert_eq!(keys, vec!["a", "b"]);
    }

    #[test]
    fn test_security_scheme_kind_roundtrip() {
        let kind = SecuritySchemeKind::new("mutualTLS");
        let json = serde_json::to_string(&kind).unwrap();
        assert_eq!(json, "\"mutualTLS\"");

        let parsed: SecuritySchemeKind = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, kind);
    }

    #[test]
    fn test_borrow_allows_str_lookup() {
        use std::collections::BTreeMap;

        let mut map = BTreeMap::new();
        map.insert(FieldId::new("petId"), 42);
        assert_eq!(map.get("petId"), Some(&42));
    }
}
