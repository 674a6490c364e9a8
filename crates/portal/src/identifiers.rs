//! Newtype domain identifiers.
//!
//! Every domain concept that has an identity is represented as a distinct newtype
//! wrapping a `String`. This prevents accidentally interchanging — for example —
//! an [`AppId`] with a [`CategoryId`] even though both are hosted-database
//! document ids under the hood.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Macro for String-wrapped newtypes.
// Generates: struct, new() returning Option<Self>, as_str(), Display.
// ---------------------------------------------------------------------------
macro_rules! string_id {
    (
        $(#[$attr:meta])*
        $name:ident
    ) => {
        $(#[$attr])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(String);

        impl $name {
            /// Creates a new identifier, returning `None` if the value is empty.
            pub fn new(value: impl Into<String>) -> Option<Self> {
                let v = value.into();
                if v.is_empty() { None } else { Some(Self(v)) }
            }

            /// Returns the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

string_id! {
    /// Identifies an app document in the `apps` collection.
    ///
    /// Either assigned by the hosted database on creation or generated locally
    /// with [`AppId::generate`] when an id is needed up front (seeding, batch
    /// writes).
    AppId
}

impl AppId {
    /// Generates a fresh random app id (UUID v4, hyphenated form).
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

string_id! {
    /// Identifies a category document in the `categories` collection.
    ///
    /// Seeded categories use stable human-readable ids (e.g. `"productivity"`);
    /// admin-created categories get database-assigned ids.
    CategoryId
}

string_id! {
    /// Identifies a user account, as assigned by the hosted identity service.
    ///
    /// Also keys the user's profile document and the per-user favorites/recents
    /// subcollections in the document database.
    UserId
}

string_id! {
    /// An email address, as reported by the identity service.
    ///
    /// Carried verbatim; the identity service owns address verification.
    Email
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_string_is_rejected() {
        assert!(AppId::new("").is_none());
        assert!(CategoryId::new("").is_none());
        assert!(UserId::new("").is_none());
    }

    #[test]
    fn generated_app_ids_are_distinct() {
        assert_ne!(AppId::generate(), AppId::generate());
    }

    #[test]
    fn display_round_trips_the_raw_value() {
        let id = CategoryId::new("productivity").unwrap();
        assert_eq!(id.to_string(), "productivity");
        assert_eq!(id.as_str(), "productivity");
    }
}
