//! Per-user operations: favorite toggling and recent-app logging.
//!
//! Any authenticated user; each write is keyed by the caller's own uid, so
//! concurrent users never touch each other's entries.

use portal::{guard, AppId, Timestamp};
use serde::Serialize;

use crate::outcome::{fold, ActionOutcome, Deps, DASHBOARD};

/// Result of a favorite toggle: the state after the flip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FavoriteToggled {
    /// `true` when the toggle added the favorite, `false` when it removed it.
    pub is_favorite: bool,
}

/// Flips whether `app_id` is in the caller's favorites.
#[tracing::instrument(skip_all, fields(app = %app_id))]
pub async fn toggle_favorite(
    deps: &Deps,
    token: &str,
    app_id: &AppId,
) -> ActionOutcome<FavoriteToggled> {
    fold(async {
        let claims = guard::require_user(deps.verifier.as_ref(), token).await?;

        let was_favorite = deps.profiles.is_favorite(&claims.uid, app_id).await?;
        if was_favorite {
            deps.profiles.remove_favorite(&claims.uid, app_id).await?;
        } else {
            deps.profiles
                .add_favorite(&claims.uid, app_id, Timestamp::now())
                .await?;
        }
        Ok((
            FavoriteToggled {
                is_favorite: !was_favorite,
            },
            deps.invalidate(&[DASHBOARD]),
        ))
    }
    .await)
}

/// Records that the caller opened `app_id`, refreshing its recency stamp.
#[tracing::instrument(skip_all, fields(app = %app_id))]
pub async fn log_recent_app(deps: &Deps, token: &str, app_id: &AppId) -> ActionOutcome<()> {
    fold(async {
        let claims = guard::require_user(deps.verifier.as_ref(), token).await?;
        deps.profiles
            .touch_recent(&claims.uid, app_id, Timestamp::now())
            .await?;
        Ok(((), deps.invalidate(&[DASHBOARD])))
    }
    .await)
}
