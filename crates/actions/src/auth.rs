//! Sign-in side effects: admin bootstrap and profile sync.

use portal::{guard, Role, Timestamp, UserProfile};
use serde::Serialize;

use crate::outcome::{fold, ActionOutcome, Deps};

/// What the admin bootstrap decided for the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BootstrapStatus {
    /// The caller is the designated admin; the role claim was set.
    Promoted,
    /// The caller is not the designated admin; nothing changed.
    NotDesignated,
}

/// Promotes the caller to admin if their email matches the configured
/// designated admin address.
///
/// Runs on every dashboard load, so it must be cheap and idempotent for
/// non-designated callers. A non-designated caller is a normal outcome, not a
/// denial: every signed-in user hits this path.
#[tracing::instrument(skip_all)]
pub async fn bootstrap_admin(deps: &Deps, token: &str) -> ActionOutcome<BootstrapStatus> {
    fold(async {
        let claims = guard::require_user(deps.verifier.as_ref(), token).await?;

        let designated = match &deps.admin_email {
            Some(email) => claims.email == *email,
            None => false,
        };
        if !designated {
            return Ok((BootstrapStatus::NotDesignated, Vec::new()));
        }

        deps.directory
            .set_role_claim(&claims.uid, Role::Admin)
            .await?;
        deps.profiles
            .upsert(UserProfile {
                uid: claims.uid.clone(),
                email: claims.email.clone(),
                role: Role::Admin,
                created_at: None,
                last_login: Some(Timestamp::now()),
            })
            .await?;
        tracing::info!(uid = %claims.uid, "designated admin bootstrapped");
        Ok((BootstrapStatus::Promoted, Vec::new()))
    }
    .await)
}

/// Creates the caller's profile document on first sign-in; a no-op afterwards.
#[tracing::instrument(skip_all)]
pub async fn sync_user(deps: &Deps, token: &str) -> ActionOutcome<()> {
    fold(async {
        let claims = guard::require_user(deps.verifier.as_ref(), token).await?;

        if deps.profiles.get(&claims.uid).await?.is_some() {
            return Ok(((), Vec::new()));
        }
        deps.profiles
            .upsert(UserProfile {
                uid: claims.uid.clone(),
                email: claims.email.clone(),
                role: Role::User,
                created_at: Some(Timestamp::now()),
                last_login: None,
            })
            .await?;
        tracing::info!(uid = %claims.uid, "profile created");
        Ok(((), Vec::new()))
    }
    .await)
}
