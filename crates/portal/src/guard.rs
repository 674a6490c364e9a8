//! Authorization guard.
//!
//! A single pair of functions wraps every entry point that needs a verified
//! caller: verify the bearer token, then check the role claim. Both return
//! tagged [`Denial`] values instead of throwing, so callers branch without
//! exception-based control flow.

use crate::{Claims, Denial, IdentityError, Role, TokenVerifier};

/// Verifies `token` and requires the `ADMIN` role claim.
///
/// Transport failures while talking to the identity service are reported as
/// [`Denial::Unauthenticated`]: a caller we could not verify is, for the
/// purposes of a mutation, unverified.
pub async fn require_admin(verifier: &dyn TokenVerifier, token: &str) -> Result<Claims, Denial> {
    let claims = verify(verifier, token).await?;
    if claims.is_admin() {
        Ok(claims)
    } else {
        Err(Denial::Forbidden {
            required: Role::Admin,
        })
    }
}

/// Verifies `token`; any authenticated caller passes.
pub async fn require_user(verifier: &dyn TokenVerifier, token: &str) -> Result<Claims, Denial> {
    verify(verifier, token).await
}

async fn verify(verifier: &dyn TokenVerifier, token: &str) -> Result<Claims, Denial> {
    verifier.verify(token).await.map_err(|err| {
        if !matches!(err, IdentityError::InvalidToken) {
            tracing::warn!(error = %err, "token verification failed upstream");
        }
        Denial::Unauthenticated
    })
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::{Email, UserId};

    struct FixedVerifier(Option<Role>);

    #[async_trait]
    impl TokenVerifier for FixedVerifier {
        async fn verify(&self, token: &str) -> Result<Claims, IdentityError> {
            if token == "good" {
                Ok(Claims {
                    uid: UserId::new("u1").unwrap(),
                    email: Email::new("u1@example.com").unwrap(),
                    role: self.0,
                })
            } else {
                Err(IdentityError::InvalidToken)
            }
        }
    }

    #[tokio::test]
    async fn admin_claim_passes_the_admin_guard() {
        let verifier = FixedVerifier(Some(Role::Admin));
        assert!(require_admin(&verifier, "good").await.is_ok());
    }

    #[tokio::test]
    async fn user_claim_is_forbidden_for_admin_guard() {
        let verifier = FixedVerifier(Some(Role::User));
        assert_eq!(
            require_admin(&verifier, "good").await.unwrap_err(),
            Denial::Forbidden {
                required: Role::Admin
            }
        );
    }

    #[tokio::test]
    async fn missing_role_claim_is_forbidden_not_unauthenticated() {
        let verifier = FixedVerifier(None);
        assert_eq!(
            require_admin(&verifier, "good").await.unwrap_err(),
            Denial::Forbidden {
                required: Role::Admin
            }
        );
    }

    #[tokio::test]
    async fn bad_token_is_unauthenticated_for_both_guards() {
        let verifier = FixedVerifier(Some(Role::Admin));
        assert_eq!(
            require_admin(&verifier, "bad").await.unwrap_err(),
            Denial::Unauthenticated
        );
        assert_eq!(
            require_user(&verifier, "bad").await.unwrap_err(),
            Denial::Unauthenticated
        );
    }
}
