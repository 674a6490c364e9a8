//! App CRUD actions. Admin only.

use portal::{guard, AppDraft, AppId, Timestamp};

use crate::outcome::{fold, ActionOutcome, Deps, ADMIN_APPS, DASHBOARD};

/// Creates an app from a form draft, stamping `created_at`/`updated_at`.
#[tracing::instrument(skip_all)]
pub async fn create_app(deps: &Deps, token: &str, draft: AppDraft) -> ActionOutcome<AppId> {
    fold(async {
        guard::require_admin(deps.verifier.as_ref(), token).await?;
        let input = draft.parse()?;
        let id = deps.apps.create(input, Timestamp::now()).await?;
        tracing::info!(app = %id, "app created");
        Ok((id, deps.invalidate(&[ADMIN_APPS, DASHBOARD])))
    }
    .await)
}

/// Replaces an app's payload, refreshing `updated_at`.
#[tracing::instrument(skip_all, fields(app = %app_id))]
pub async fn update_app(
    deps: &Deps,
    token: &str,
    app_id: &AppId,
    draft: AppDraft,
) -> ActionOutcome<()> {
    fold(async {
        guard::require_admin(deps.verifier.as_ref(), token).await?;
        let input = draft.parse()?;
        deps.apps.update(app_id, input, Timestamp::now()).await?;
        tracing::info!("app updated");
        Ok(((), deps.invalidate(&[ADMIN_APPS, DASHBOARD])))
    }
    .await)
}

/// Deletes an app document.
#[tracing::instrument(skip_all, fields(app = %app_id))]
pub async fn delete_app(deps: &Deps, token: &str, app_id: &AppId) -> ActionOutcome<()> {
    fold(async {
        guard::require_admin(deps.verifier.as_ref(), token).await?;
        deps.apps.delete(app_id).await?;
        tracing::info!("app deleted");
        Ok(((), deps.invalidate(&[ADMIN_APPS, DASHBOARD])))
    }
    .await)
}
