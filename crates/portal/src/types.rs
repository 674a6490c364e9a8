//! Shared entity and value types for the VPortal domain.
//!
//! Unlike the newtype identifiers in [`crate::identifiers`], these types carry
//! the document payloads the portal reads and writes: apps, categories, the
//! single global settings document, user profiles, and the verified claims
//! attached to an identity token.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{AppId, CategoryId, Email, UserId};

// ---------------------------------------------------------------------------
// Time
// ---------------------------------------------------------------------------

/// A UTC wall-clock timestamp.
///
/// Wraps [`chrono::DateTime<Utc>`] so callers never depend on `chrono` types
/// directly; documents store it in RFC 3339 form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Returns the current UTC time as a [`Timestamp`].
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Creates a [`Timestamp`] from a [`DateTime<Utc>`].
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }

    /// Returns the underlying [`DateTime<Utc>`].
    pub fn as_datetime(self) -> DateTime<Utc> {
        self.0
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}

// ---------------------------------------------------------------------------
// Roles and claims
// ---------------------------------------------------------------------------

/// Authorization role carried as a claim on identity tokens and stored on the
/// user profile document.
///
/// Serialized as `"ADMIN"` / `"USER"` on the wire and in documents. Any other
/// string deserializes as [`Role::User`]: accounts that predate role claims, or
/// whose claim was mangled, are treated as ordinary users rather than rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default)]
pub enum Role {
    /// Full access to the admin CRUD surface.
    #[serde(rename = "ADMIN")]
    Admin,
    /// Dashboard access only.
    #[serde(rename = "USER")]
    #[default]
    User,
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(match raw.as_str() {
            "ADMIN" => Role::Admin,
            _ => Role::User,
        })
    }
}

impl Role {
    /// Returns the wire form (`"ADMIN"` / `"USER"`).
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::User => "USER",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------

/// The verified payload of an identity token.
///
/// Produced by a [`crate::ports::TokenVerifier`]; everything downstream of the
/// verifier trusts these fields. `role` is `None` for tokens minted before any
/// role claim was set (freshly created accounts).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// The account id the token was minted for.
    pub uid: UserId,
    /// The account's email address.
    pub email: Email,
    /// The role claim, when one has been set.
    pub role: Option<Role>,
}

impl Claims {
    /// Returns the effective role: the claim when present, [`Role::User`] otherwise.
    pub fn effective_role(&self) -> Role {
        self.role.unwrap_or_default()
    }

    /// Returns `true` if the token carries an admin claim.
    pub fn is_admin(&self) -> bool {
        self.role == Some(Role::Admin)
    }
}

// ---------------------------------------------------------------------------
// Entities
// ---------------------------------------------------------------------------

/// A portal app: one curated internal tool link.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct App {
    /// Document id in the `apps` collection.
    pub id: AppId,
    /// Display name.
    pub name: String,
    /// Link target (absolute URL).
    pub url: String,
    /// Optional one-line description shown on the card.
    pub description: Option<String>,
    /// Optional icon image URL.
    pub icon_url: Option<String>,
    /// The category this app is filed under.
    pub category_id: CategoryId,
    /// Free-form tags, searchable from the dashboard.
    pub tags: Vec<String>,
    /// Inactive apps are hidden from the dashboard but kept in the admin list.
    pub is_active: bool,
    /// Set once at creation.
    pub created_at: Timestamp,
    /// Refreshed on every update.
    pub updated_at: Timestamp,
}

/// A dashboard category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Document id in the `categories` collection.
    pub id: CategoryId,
    /// Display name.
    pub name: String,
    /// Server-side sort position (ascending). Users may override the order
    /// locally on their own dashboard.
    pub sort_order: i64,
    /// Inactive categories are hidden from the dashboard.
    pub is_active: bool,
}

/// Global portal settings — a single document keyed `"global"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Portal display name shown in the dashboard header.
    pub portal_name: String,
    /// Optional logo image URL.
    pub logo_url: Option<String>,
}

/// A user's profile document in the `users` collection.
///
/// Written by the sync/bootstrap actions; the role here mirrors (but does not
/// replace) the role claim held by the identity service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Account id; also the document id.
    pub uid: UserId,
    /// Email at the time of the last sync.
    pub email: Email,
    /// Mirrored role.
    pub role: Role,
    /// Set when the profile document is first created.
    pub created_at: Option<Timestamp>,
    /// Refreshed by the admin bootstrap.
    pub last_login: Option<Timestamp>,
}

/// A merged identity-account + profile record, as returned by the admin user
/// listing.
///
/// Account fields come from the identity service; `role` comes from the profile
/// document and falls back to [`Role::User`] for accounts that have never
/// synced a profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAccount {
    /// Account id.
    pub uid: UserId,
    /// Account email.
    pub email: Email,
    /// Display name, when the identity provider has one.
    pub display_name: Option<String>,
    /// Avatar URL, when the identity provider has one.
    pub photo_url: Option<String>,
    /// Effective role (profile document, falling back to `USER`).
    pub role: Role,
    /// Account creation time, as reported by the identity service.
    pub creation_time: Option<Timestamp>,
    /// Last sign-in time, as reported by the identity service.
    pub last_sign_in_time: Option<Timestamp>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_serializes_to_upper_case_wire_form() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"ADMIN\"");
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), "\"USER\"");
    }

    #[test]
    fn unknown_role_strings_fall_back_to_user() {
        let role: Role = serde_json::from_str("\"SUPERUSER\"").unwrap();
        assert_eq!(role, Role::User);
        let role: Role = serde_json::from_str("\"ADMIN\"").unwrap();
        assert_eq!(role, Role::Admin);
    }

    #[test]
    fn claims_without_role_are_not_admin() {
        let claims = Claims {
            uid: UserId::new("u1").unwrap(),
            email: Email::new("a@example.com").unwrap(),
            role: None,
        };
        assert!(!claims.is_admin());
        assert_eq!(claims.effective_role(), Role::User);
    }
}
