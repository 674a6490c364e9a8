//! Admin user management: listing accounts and assigning roles.

use std::collections::HashMap;

use portal::{guard, Role, UserAccount, UserId};

use crate::outcome::{fold, ActionOutcome, Deps, ADMIN_USERS};

/// Default page size for the admin user listing.
pub const DEFAULT_USER_LIMIT: usize = 50;

/// Lists identity accounts merged with their profile documents. Admin only.
///
/// The identity service is the source of truth for the account fields; the
/// role comes from the profile document and falls back to `USER` for accounts
/// that have never synced one.
#[tracing::instrument(skip_all, fields(limit))]
pub async fn list_users(
    deps: &Deps,
    token: &str,
    limit: Option<usize>,
) -> ActionOutcome<Vec<UserAccount>> {
    let limit = limit.unwrap_or(DEFAULT_USER_LIMIT);
    fold(async {
        guard::require_admin(deps.verifier.as_ref(), token).await?;

        let accounts = deps.directory.list_accounts(limit).await?;
        let profiles = deps.profiles.list(limit).await?;
        let roles: HashMap<UserId, Role> =
            profiles.into_iter().map(|p| (p.uid, p.role)).collect();

        let users = accounts
            .into_iter()
            .map(|account| UserAccount {
                role: roles.get(&account.uid).copied().unwrap_or_default(),
                ..account
            })
            .collect();
        Ok((users, Vec::new()))
    }
    .await)
}

/// Sets a user's role claim on the identity service and mirrors it into the
/// profile document. Admin only.
///
/// The claim takes effect on the target's next token refresh; the profile
/// mirror keeps listings accurate in the meantime.
#[tracing::instrument(skip_all, fields(target = %target_uid, role = %role))]
pub async fn set_user_role(
    deps: &Deps,
    token: &str,
    target_uid: &UserId,
    role: Role,
) -> ActionOutcome<()> {
    fold(async {
        guard::require_admin(deps.verifier.as_ref(), token).await?;

        deps.directory.set_role_claim(target_uid, role).await?;
        deps.profiles.set_role(target_uid, role).await?;
        tracing::info!("role assigned");
        Ok(((), deps.invalidate(&[ADMIN_USERS])))
    }
    .await)
}
