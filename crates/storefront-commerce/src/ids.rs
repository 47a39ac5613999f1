//! Newtype IDs for type-safe identifiers.
//!
//! Backend identifiers are opaque strings; wrapping them keeps a product id
//! from being passed where an order or conversation id is expected.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Macro to generate newtype ID structs.
macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from a string.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the ID as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume and return the inner string.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
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
    };
}

define_id!(
    /// Catalog entry identifier, assigned by the backend.
    ProductId
);
define_id!(
    /// Order identifier returned by the order endpoint.
    OrderId
);
define_id!(
    /// Chat conversation identifier (`customer-<millis>`).
    ConversationId
);
define_id!(
    /// Client-side chat message identifier.
    MessageId
);
define_id!(
    /// Backend user identifier (`guest` for anonymous shoppers).
    UserId
);

impl UserId {
    /// The anonymous shopper.
    pub fn guest() -> Self {
        Self::new("guest")
    }
}

impl ConversationId {
    /// Start a conversation id for a customer at the given instant.
    pub fn for_customer(now_millis: i64) -> Self {
        Self(format!("customer-{}", now_millis))
    }
}
