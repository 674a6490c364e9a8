//! Fixed-data identity double for tests and local runs.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use portal::{
    Claims, IdentityDirectory, IdentityError, Role, TokenVerifier, UserAccount, UserId,
};
use tokio::sync::RwLock;

/// Token→claims map implementing both identity ports.
///
/// Tokens registered with [`StaticIdentity::with_token`] verify to their
/// claims; everything else is rejected. Role-claim writes update the stored
/// claims, so a bootstrap followed by a re-verify behaves like the real
/// service after a token refresh.
#[derive(Clone, Default)]
pub struct StaticIdentity {
    inner: Arc<RwLock<HashMap<String, Claims>>>,
}

impl StaticIdentity {
    /// Creates an empty identity double; every token is invalid.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `token` as verifying to `claims`.
    pub async fn with_token(self, token: impl Into<String>, claims: Claims) -> Self {
        self.inner.write().await.insert(token.into(), claims);
        self
    }
}

#[async_trait]
impl TokenVerifier for StaticIdentity {
    async fn verify(&self, token: &str) -> Result<Claims, IdentityError> {
        self.inner
            .read()
            .await
            .get(token)
            .cloned()
            .ok_or(IdentityError::InvalidToken)
    }
}

#[async_trait]
impl IdentityDirectory for StaticIdentity {
    async fn list_accounts(&self, limit: usize) -> Result<Vec<UserAccount>, IdentityError> {
        let inner = self.inner.read().await;
        let mut accounts: Vec<UserAccount> = inner
            .values()
            .map(|claims| UserAccount {
                uid: claims.uid.clone(),
                email: claims.email.clone(),
                display_name: None,
                photo_url: None,
                role: Role::User,
                creation_time: None,
                last_sign_in_time: None,
            })
            .collect();
        accounts.sort_by(|a, b| a.uid.cmp(&b.uid));
        accounts.truncate(limit);
        Ok(accounts)
    }

    async fn set_role_claim(&self, uid: &UserId, role: Role) -> Result<(), IdentityError> {
        let mut inner = self.inner.write().await;
        for claims in inner.values_mut() {
            if claims.uid == *uid {
                claims.role = Some(role);
            }
        }
        Ok(())
    }
}
