//! NewType wrappers for model identifiers.
//!
//! Boundaries, elements, and flows live in separate identifier namespaces;
//! wrapping them prevents passing one where another is expected.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! identifier {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new identifier from any string-like type.
            pub fn new(s: impl Into<String>) -> Self {
                Self(s.into())
            }

            /// Get the underlying string reference.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume self and return the inner String.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
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
    };
}

identifier! {
    /// Identifier of a trust boundary.
    BoundaryId
}

identifier! {
    /// Identifier of a model element (actor, process, datastore, external entity).
    ElementId
}

identifier! {
    /// Identifier of a directed dataflow between two elements.
    FlowId
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_roundtrip() {
        let id = ElementId::new("api_server");
        assert_eq!(id.as_str(), "api_server");
        assert_eq!(id.to_string(), "api_server");
        assert_eq!(id.into_inner(), "api_server");
    }

    #[test]
    fn test_identifier_from_str_and_string() {
        assert_eq!(BoundaryId::from("dmz"), BoundaryId::new("dmz"));
        assert_eq!(FlowId::from("f1".to_string()), FlowId::new("f1"));
    }

    #[test]
    fn test_identifier_ordering_is_lexicographic() {
        assert!(ElementId::new("a") < ElementId::new("b"));
        assert!(ElementId::new("api") < ElementId::new("api_server"));
    }

    #[test]
    fn test_identifier_serde_transparent() {
        let id = FlowId::new("user_request");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"user_request\"");

        let back: FlowId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
