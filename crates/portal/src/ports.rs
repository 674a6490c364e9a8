//! Port trait definitions.
//!
//! The hosted document database, the hosted identity service, and the page
//! cache sit behind these traits. Infrastructure crates implement them; the
//! action layer only ever sees `Arc<dyn …>`. Swapping the concrete storage
//! technology (the in-memory double in `docstore` proves this) touches nothing
//! above this file.

use async_trait::async_trait;

use crate::{
    App, AppId, AppInput, Category, CategoryId, CategoryInput, Claims, IdentityError, Role,
    Settings, SettingsInput, StoreError, Timestamp, UserAccount, UserId, UserProfile,
};

// ---------------------------------------------------------------------------
// Document repositories
// ---------------------------------------------------------------------------

/// The `apps` collection.
#[async_trait]
pub trait AppRepository: Send + Sync {
    /// Lists every active app.
    async fn list_active(&self) -> Result<Vec<App>, StoreError>;

    /// Creates an app document with the given payload and timestamps, returning
    /// its assigned id.
    async fn create(&self, input: AppInput, now: Timestamp) -> Result<AppId, StoreError>;

    /// Replaces an app document's payload, refreshing `updated_at`.
    ///
    /// Fails with [`StoreError::NotFound`] when the document does not exist.
    async fn update(&self, id: &AppId, input: AppInput, now: Timestamp) -> Result<(), StoreError>;

    /// Deletes an app document.
    ///
    /// Fails with [`StoreError::NotFound`] when the document does not exist.
    async fn delete(&self, id: &AppId) -> Result<(), StoreError>;
}

/// The `categories` collection.
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// Lists every active category, sorted by `sort_order` ascending.
    async fn list_active(&self) -> Result<Vec<Category>, StoreError>;

    /// Creates a category document, returning its assigned id.
    async fn create(&self, input: CategoryInput) -> Result<CategoryId, StoreError>;

    /// Creates or replaces a category document under a caller-chosen id.
    ///
    /// The seed path uses this to give the stock categories stable ids.
    async fn upsert(&self, id: &CategoryId, input: CategoryInput) -> Result<(), StoreError>;

    /// Replaces a category document's payload.
    ///
    /// Fails with [`StoreError::NotFound`] when the document does not exist.
    async fn update(&self, id: &CategoryId, input: CategoryInput) -> Result<(), StoreError>;

    /// Deletes a category document.
    ///
    /// Fails with [`StoreError::NotFound`] when the document does not exist.
    async fn delete(&self, id: &CategoryId) -> Result<(), StoreError>;
}

/// The single global settings document.
#[async_trait]
pub trait SettingsRepository: Send + Sync {
    /// Reads the settings document; `None` before the first write.
    async fn get(&self) -> Result<Option<Settings>, StoreError>;

    /// Merges the payload into the settings document, creating it if absent.
    async fn merge(&self, input: SettingsInput) -> Result<(), StoreError>;
}

/// User profile documents and the per-user favorites/recents subcollections.
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Reads a profile document; `None` when the user has never synced.
    async fn get(&self, uid: &UserId) -> Result<Option<UserProfile>, StoreError>;

    /// Creates or merges a profile document. Merge semantics: `None`
    /// timestamps leave any stored value in place.
    async fn upsert(&self, profile: UserProfile) -> Result<(), StoreError>;

    /// Merges just the role field into a profile document, creating it if absent.
    async fn set_role(&self, uid: &UserId, role: Role) -> Result<(), StoreError>;

    /// Lists every profile document, up to `limit`.
    async fn list(&self, limit: usize) -> Result<Vec<UserProfile>, StoreError>;

    /// Lists the user's favorite app ids (unordered).
    async fn favorite_ids(&self, uid: &UserId) -> Result<Vec<AppId>, StoreError>;

    /// Returns whether `app_id` is in the user's favorites.
    async fn is_favorite(&self, uid: &UserId, app_id: &AppId) -> Result<bool, StoreError>;

    /// Adds a favorite entry stamped with `now`. Idempotent.
    async fn add_favorite(
        &self,
        uid: &UserId,
        app_id: &AppId,
        now: Timestamp,
    ) -> Result<(), StoreError>;

    /// Removes a favorite entry. Removing an absent entry is not an error.
    async fn remove_favorite(&self, uid: &UserId, app_id: &AppId) -> Result<(), StoreError>;

    /// Upserts the recent entry for `app_id` with `last_opened_at = now`.
    async fn touch_recent(
        &self,
        uid: &UserId,
        app_id: &AppId,
        now: Timestamp,
    ) -> Result<(), StoreError>;

    /// Lists the user's recent app ids, most recently opened first, up to `limit`.
    async fn recent_ids(&self, uid: &UserId, limit: usize) -> Result<Vec<AppId>, StoreError>;
}

// ---------------------------------------------------------------------------
// Identity service
// ---------------------------------------------------------------------------

/// Verifies identity tokens.
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    /// Verifies `token` and returns its claims.
    ///
    /// Any verification failure (bad signature, expiry, revocation, garbage
    /// input) is [`IdentityError::InvalidToken`]; transport failures are
    /// reported separately so callers can distinguish "bad token" from
    /// "identity service down".
    async fn verify(&self, token: &str) -> Result<Claims, IdentityError>;
}

/// Administrative identity-service operations.
#[async_trait]
pub trait IdentityDirectory: Send + Sync {
    /// Lists accounts, up to `limit`. Role is not populated here; the caller
    /// merges it from profile documents.
    async fn list_accounts(&self, limit: usize) -> Result<Vec<UserAccount>, IdentityError>;

    /// Sets the role custom claim on an account. Takes effect on the next
    /// token refresh.
    async fn set_role_claim(&self, uid: &UserId, role: Role) -> Result<(), IdentityError>;
}

// ---------------------------------------------------------------------------
// Page cache
// ---------------------------------------------------------------------------

/// A rendered page path eligible for cache invalidation (e.g. `"/admin/apps"`).
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct PagePath(pub &'static str);

impl std::fmt::Display for PagePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0)
    }
}

/// Invalidate cached rendered pages after a mutation.
///
/// The portal has no rendering layer of its own, so the default implementation
/// is a logging no-op — but every mutating action still declares the paths it
/// invalidates, keeping the seam in place for a fronting cache.
pub trait PageCache: Send + Sync {
    /// Marks the cached page at `path` stale.
    fn invalidate(&self, path: &PagePath);
}

/// [`PageCache`] implementation that records the invalidation in the log and
/// does nothing else.
#[derive(Debug, Default, Clone)]
pub struct NoopPageCache;

impl PageCache for NoopPageCache {
    fn invalidate(&self, path: &PagePath) {
        tracing::debug!(%path, "page invalidated (no cache wired)");
    }
}
