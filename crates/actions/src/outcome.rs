//! Action results and shared dependencies.
//!
//! Every action returns an [`ActionOutcome`]: a tagged value the caller can
//! branch on without unwinding. Nothing in this crate panics across the
//! boundary, and no port error escapes as an opaque exception — failures are
//! folded into the outcome with their message, the way the portal has always
//! reported them to its clients.

use std::sync::Arc;

use portal::{
    AppRepository, CategoryRepository, Denial, Email, FieldError, IdentityDirectory,
    IdentityError, PageCache, PagePath, ProfileRepository, SettingsRepository, StoreError,
    TokenVerifier,
};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Page paths invalidated by mutations
// ---------------------------------------------------------------------------

/// The dashboard page.
pub const DASHBOARD: PagePath = PagePath("/");
/// The admin app list.
pub const ADMIN_APPS: PagePath = PagePath("/admin/apps");
/// The admin category list.
pub const ADMIN_CATEGORIES: PagePath = PagePath("/admin/categories");
/// The admin settings form.
pub const ADMIN_SETTINGS: PagePath = PagePath("/admin/settings");
/// The admin user list.
pub const ADMIN_USERS: PagePath = PagePath("/admin/users");

// ---------------------------------------------------------------------------
// Dependencies
// ---------------------------------------------------------------------------

/// The injected ports every action runs against.
///
/// Constructed once at the composition root and shared behind an `Arc`.
#[derive(Clone)]
pub struct Deps {
    /// `apps` collection.
    pub apps: Arc<dyn AppRepository>,
    /// `categories` collection.
    pub categories: Arc<dyn CategoryRepository>,
    /// Global settings document.
    pub settings: Arc<dyn SettingsRepository>,
    /// User profiles and their favorites/recents subcollections.
    pub profiles: Arc<dyn ProfileRepository>,
    /// Token verification.
    pub verifier: Arc<dyn TokenVerifier>,
    /// Administrative identity operations.
    pub directory: Arc<dyn IdentityDirectory>,
    /// Cached-page invalidation.
    pub pages: Arc<dyn PageCache>,
    /// The email designated for admin bootstrap, when one is configured.
    pub admin_email: Option<Email>,
}

impl Deps {
    /// Invalidates `paths` through the page cache and returns them so the
    /// outcome can report what went stale.
    pub(crate) fn invalidate(&self, paths: &[PagePath]) -> Vec<PagePath> {
        for path in paths {
            self.pages.invalidate(path);
        }
        paths.to_vec()
    }
}

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

/// The tagged result of one action.
///
/// Callers branch on the variant; the HTTP layer maps each to its own status
/// code and response envelope.
#[derive(Debug)]
pub enum ActionOutcome<T> {
    /// The action succeeded; `invalidated` lists the page paths marked stale.
    Ok {
        /// Action-specific payload.
        value: T,
        /// Pages invalidated by the mutation (empty for reads).
        invalidated: Vec<PagePath>,
    },
    /// The caller's token was missing/invalid or lacked the required role.
    Denied(Denial),
    /// The input failed schema validation; one entry per failing field.
    Invalid(Vec<FieldError>),
    /// A port call failed; `message` carries the backend's description.
    Failed {
        /// Human-readable failure description.
        message: String,
    },
}

impl<T: std::fmt::Debug> ActionOutcome<T> {
    /// Returns the success payload, panicking on any other variant.
    ///
    /// Intended for tests and the seeding entry point, where a non-`Ok`
    /// outcome is a hard failure.
    pub fn into_value(self) -> T {
        match self {
            ActionOutcome::Ok { value, .. } => value,
            other => panic!("expected Ok outcome, got {other:?}"),
        }
    }

    /// Returns `true` for the `Ok` variant.
    pub fn is_ok(&self) -> bool {
        matches!(self, ActionOutcome::Ok { .. })
    }
}

/// Internal error type so action bodies can use `?` before the result is
/// folded into an [`ActionOutcome`].
#[derive(Debug, Error)]
pub(crate) enum ActionError {
    #[error("{0}")]
    Denied(Denial),
    #[error("validation failed")]
    Invalid(Vec<FieldError>),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Identity(#[from] IdentityError),
}

impl From<Denial> for ActionError {
    fn from(denial: Denial) -> Self {
        ActionError::Denied(denial)
    }
}

impl From<Vec<FieldError>> for ActionError {
    fn from(errors: Vec<FieldError>) -> Self {
        ActionError::Invalid(errors)
    }
}

/// Folds an action body's result into the public outcome, logging failures.
pub(crate) fn fold<T>(result: Result<(T, Vec<PagePath>), ActionError>) -> ActionOutcome<T> {
    match result {
        Ok((value, invalidated)) => ActionOutcome::Ok { value, invalidated },
        Err(ActionError::Denied(denial)) => {
            tracing::debug!(%denial, "action denied");
            ActionOutcome::Denied(denial)
        }
        Err(ActionError::Invalid(errors)) => {
            tracing::debug!(fields = errors.len(), "action input invalid");
            ActionOutcome::Invalid(errors)
        }
        Err(ActionError::Store(err)) => {
            tracing::error!(error = %err, retry = ?err.retry_policy(), "store call failed");
            ActionOutcome::Failed {
                message: err.to_string(),
            }
        }
        Err(ActionError::Identity(err)) => {
            tracing::error!(error = %err, "identity call failed");
            ActionOutcome::Failed {
                message: err.to_string(),
            }
        }
    }
}
