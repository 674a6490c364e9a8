//! Dashboard data fetch: everything the dashboard needs in one call.

use portal::{guard, App, AppId, Category};
use serde::Serialize;

use crate::outcome::{fold, ActionOutcome, Deps};

/// How many recent apps the dashboard shows.
pub const RECENT_LIMIT: usize = 10;

/// The full dashboard payload for one user.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardData {
    /// Active apps.
    pub apps: Vec<App>,
    /// Active categories, in server sort order.
    pub categories: Vec<Category>,
    /// The caller's favorite app ids.
    pub favorite_ids: Vec<AppId>,
    /// The caller's recent app ids, most recently opened first.
    pub recent_ids: Vec<AppId>,
    /// Whether the caller's verified role claim is admin (drives the
    /// admin-navigation affordance).
    pub is_admin: bool,
}

/// Fetches the dashboard payload for the calling user.
///
/// The four reads are independent, so they run concurrently — the same shape
/// the portal has always used for this page load.
#[tracing::instrument(skip_all)]
pub async fn dashboard_data(deps: &Deps, token: &str) -> ActionOutcome<DashboardData> {
    fold(async {
        let claims = guard::require_user(deps.verifier.as_ref(), token).await?;

        let (apps, categories, favorite_ids, recent_ids) = tokio::join!(
            deps.apps.list_active(),
            deps.categories.list_active(),
            deps.profiles.favorite_ids(&claims.uid),
            deps.profiles.recent_ids(&claims.uid, RECENT_LIMIT),
        );

        Ok((
            DashboardData {
                apps: apps?,
                categories: categories?,
                favorite_ids: favorite_ids?,
                recent_ids: recent_ids?,
                is_admin: claims.is_admin(),
            },
            Vec::new(),
        ))
    }
    .await)
}
