//! Cross-cutting error and retry-policy types for the VPortal domain.
//!
//! [`StoreError`] covers failures from the hosted document database;
//! [`IdentityError`] covers failures from the hosted identity service. Both are
//! produced by the port implementations and consumed by the action layer.
//!
//! [`RetryPolicy`] is a cross-cutting concern: any error type that participates
//! in retry decisions must be able to produce a [`RetryPolicy`].

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Role;

// ---------------------------------------------------------------------------
// Retry semantics
// ---------------------------------------------------------------------------

/// Whether an error condition is safe to retry and, if so, after what delay.
///
/// Returned by infrastructure error types to let callers decide whether to
/// re-invoke an operation without escalating.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RetryPolicy {
    /// The operation may be retried.
    ///
    /// `after` optionally specifies the minimum delay before retrying (e.g.
    /// derived from a `Retry-After` response header).
    Retryable {
        /// Minimum back-off before the next attempt. `None` means retry
        /// immediately or apply the caller's own back-off schedule.
        after: Option<Duration>,
    },
    /// The operation must not be retried; the failure is surfaced to the caller.
    NonRetryable,
}

// ---------------------------------------------------------------------------
// Document store errors
// ---------------------------------------------------------------------------

/// Errors produced by the repository ports.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The requested document does not exist.
    #[error("Document not found: {collection}/{id}")]
    NotFound {
        /// Collection the lookup targeted.
        collection: String,
        /// Document id that was missing.
        id: String,
    },

    /// The store could not be reached (connection refused, timeout, DNS).
    #[error("Document store unreachable: {message}")]
    Transport {
        /// Transport-level detail.
        message: String,
        /// Minimum back-off hinted by the backend, when one was given.
        retry_after: Option<Duration>,
    },

    /// The store responded, but its payload did not match the expected document
    /// shape.
    #[error("Malformed document in {collection}: {message}")]
    Decode {
        /// Collection the document came from.
        collection: String,
        /// Decode-level detail.
        message: String,
    },

    /// The store rejected the operation (permission, quota, invalid request).
    #[error("Document store rejected the request: {message}")]
    Backend {
        /// Backend-reported detail.
        message: String,
    },
}

impl StoreError {
    /// Returns the retry policy for this error.
    ///
    /// Only transport failures are retryable; missing documents, malformed
    /// payloads, and backend rejections will not heal on retry.
    pub fn retry_policy(&self) -> RetryPolicy {
        match self {
            StoreError::Transport { retry_after, .. } => RetryPolicy::Retryable {
                after: *retry_after,
            },
            _ => RetryPolicy::NonRetryable,
        }
    }

    /// Convenience constructor for [`StoreError::NotFound`].
    pub fn not_found(collection: impl Into<String>, id: impl Into<String>) -> Self {
        StoreError::NotFound {
            collection: collection.into(),
            id: id.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Identity service errors
// ---------------------------------------------------------------------------

/// Errors produced by the [`crate::ports::TokenVerifier`] and
/// [`crate::ports::IdentityDirectory`] ports.
#[derive(Debug, Error)]
pub enum IdentityError {
    /// The token failed verification (bad signature, expired, revoked, garbage).
    #[error("Identity token rejected")]
    InvalidToken,

    /// The identity service could not be reached.
    #[error("Identity service unreachable: {message}")]
    Transport {
        /// Transport-level detail.
        message: String,
    },

    /// The identity service responded with an error for a well-formed request.
    #[error("Identity service rejected the request: {message}")]
    Backend {
        /// Backend-reported detail.
        message: String,
    },
}

impl IdentityError {
    /// Returns the retry policy for this error. Only transport failures retry.
    pub fn retry_policy(&self) -> RetryPolicy {
        match self {
            IdentityError::Transport { .. } => RetryPolicy::Retryable { after: None },
            _ => RetryPolicy::NonRetryable,
        }
    }
}

// ---------------------------------------------------------------------------
// Authorization denials
// ---------------------------------------------------------------------------

/// Why an authorization guard refused a request.
///
/// A value, not an exception: callers branch on it and map it to their own
/// surface (the HTTP layer maps it to 401/403).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Denial {
    /// No token, or the token failed verification.
    Unauthenticated,
    /// The token is valid but does not carry the required role.
    Forbidden {
        /// The role the operation requires.
        required: Role,
    },
}

impl std::fmt::Display for Denial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Denial::Unauthenticated => f.write_str("Unauthorized"),
            Denial::Forbidden { required } => {
                write!(f, "Forbidden: Requires {required} role")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_errors_are_retryable() {
        let err = StoreError::Transport {
            message: "connection refused".into(),
            retry_after: Some(Duration::from_secs(2)),
        };
        assert_eq!(
            err.retry_policy(),
            RetryPolicy::Retryable {
                after: Some(Duration::from_secs(2))
            }
        );
    }

    #[test]
    fn missing_documents_do_not_retry() {
        let err = StoreError::not_found("apps", "missing");
        assert_eq!(err.retry_policy(), RetryPolicy::NonRetryable);
        assert_eq!(err.to_string(), "Document not found: apps/missing");
    }

    #[test]
    fn denial_messages_match_the_wire_form() {
        assert_eq!(Denial::Unauthenticated.to_string(), "Unauthorized");
        assert_eq!(
            Denial::Forbidden {
                required: Role::Admin
            }
            .to_string(),
            "Forbidden: Requires ADMIN role"
        );
    }
}
