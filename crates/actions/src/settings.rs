//! Global settings actions.

use portal::{guard, Settings, SettingsDraft};

use crate::outcome::{fold, ActionOutcome, Deps, ADMIN_SETTINGS, DASHBOARD};

/// Merges a validated settings payload into the global settings document.
/// Admin only.
#[tracing::instrument(skip_all)]
pub async fn update_settings(
    deps: &Deps,
    token: &str,
    draft: SettingsDraft,
) -> ActionOutcome<()> {
    fold(async {
        guard::require_admin(deps.verifier.as_ref(), token).await?;
        let input = draft.parse()?;
        deps.settings.merge(input).await?;
        tracing::info!("settings updated");
        Ok(((), deps.invalidate(&[DASHBOARD, ADMIN_SETTINGS])))
    }
    .await)
}

/// Reads the global settings document. Unauthenticated: the portal name and
/// logo render on the login page before any token exists.
///
/// `None` until the document is first written.
#[tracing::instrument(skip_all)]
pub async fn get_settings(deps: &Deps) -> ActionOutcome<Option<Settings>> {
    fold(async {
        let settings = deps.settings.get().await?;
        Ok((settings, Vec::new()))
    }
    .await)
}
