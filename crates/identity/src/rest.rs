//! Hosted identity-service adapter.
//!
//! Talks to the identity service's admin REST API: token verification, role
//! custom-claim writes, and account listing. Authentication is the service
//! account key sent as a bearer token.

use async_trait::async_trait;
use portal::{
    Claims, Email, IdentityDirectory, IdentityError, Role, Timestamp, TokenVerifier, UserAccount,
    UserId,
};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};

/// REST client for the hosted identity service.
#[derive(Clone)]
pub struct RestIdentity {
    http: reqwest::Client,
    base_url: String,
    service_key: String,
}

impl RestIdentity {
    /// Creates an adapter for the identity service at `base_url` (no trailing
    /// slash), authenticating with `service_key`.
    pub fn new(base_url: impl Into<String>, service_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            service_key: service_key.into(),
        }
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        tracing::debug!(%method, path, "identity service request");
        self.http
            .request(method, format!("{}/v1/{path}", self.base_url))
            .bearer_auth(&self.service_key)
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response, IdentityError> {
        builder.send().await.map_err(|err| {
            if err.is_connect() || err.is_timeout() {
                IdentityError::Transport {
                    message: err.to_string(),
                }
            } else {
                IdentityError::Backend {
                    message: err.to_string(),
                }
            }
        })
    }

    async fn expect_ok(&self, response: Response) -> Result<Response, IdentityError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(IdentityError::Backend {
                message: format!("{status}: {body}"),
            });
        }
        Ok(response)
    }
}

// ---------------------------------------------------------------------------
// Wire DTOs
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct VerifyRequest<'a> {
    token: &'a str,
}

#[derive(Debug, Deserialize)]
struct VerifyResponse {
    uid: String,
    email: String,
    #[serde(default)]
    claims: TokenClaims,
}

#[derive(Debug, Default, Deserialize)]
struct TokenClaims {
    #[serde(default)]
    role: Option<Role>,
}

#[derive(Debug, Deserialize)]
struct AccountList {
    accounts: Vec<AccountRecord>,
}

#[derive(Debug, Deserialize)]
struct AccountRecord {
    uid: String,
    email: String,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    photo_url: Option<String>,
    #[serde(default)]
    creation_time: Option<Timestamp>,
    #[serde(default)]
    last_sign_in_time: Option<Timestamp>,
}

#[derive(Debug, Serialize)]
struct ClaimsPatch {
    role: Role,
}

fn decode_error(err: reqwest::Error) -> IdentityError {
    IdentityError::Backend {
        message: format!("malformed identity response: {err}"),
    }
}

fn nonempty<I>(raw: String, what: &str, make: fn(String) -> Option<I>) -> Result<I, IdentityError> {
    make(raw).ok_or_else(|| IdentityError::Backend {
        message: format!("identity service returned an empty {what}"),
    })
}

// ---------------------------------------------------------------------------
// Trait implementations
// ---------------------------------------------------------------------------

#[async_trait]
impl TokenVerifier for RestIdentity {
    async fn verify(&self, token: &str) -> Result<Claims, IdentityError> {
        let response = self
            .send(
                self.request(Method::POST, "tokens:verify")
                    .json(&VerifyRequest { token }),
            )
            .await?;
        // The service answers 401 for any unverifiable token: bad signature,
        // expiry, revocation.
        if response.status() == StatusCode::UNAUTHORIZED {
            return Err(IdentityError::InvalidToken);
        }
        let response = self.expect_ok(response).await?;
        let verified: VerifyResponse = response.json().await.map_err(decode_error)?;
        Ok(Claims {
            uid: nonempty(verified.uid, "uid", UserId::new)?,
            email: nonempty(verified.email, "email", Email::new)?,
            role: verified.claims.role,
        })
    }
}

#[async_trait]
impl IdentityDirectory for RestIdentity {
    async fn list_accounts(&self, limit: usize) -> Result<Vec<UserAccount>, IdentityError> {
        let path = format!("accounts?limit={limit}");
        let response = self.send(self.request(Method::GET, &path)).await?;
        let response = self.expect_ok(response).await?;
        let list: AccountList = response.json().await.map_err(decode_error)?;
        list.accounts
            .into_iter()
            .map(|record| {
                Ok(UserAccount {
                    uid: nonempty(record.uid, "uid", UserId::new)?,
                    email: nonempty(record.email, "email", Email::new)?,
                    display_name: record.display_name,
                    photo_url: record.photo_url,
                    // Role comes from profile documents; the caller merges it.
                    role: Role::User,
                    creation_time: record.creation_time,
                    last_sign_in_time: record.last_sign_in_time,
                })
            })
            .collect()
    }

    async fn set_role_claim(&self, uid: &UserId, role: Role) -> Result<(), IdentityError> {
        let path = format!("accounts/{uid}/claims");
        let response = self
            .send(self.request(Method::PATCH, &path).json(&ClaimsPatch { role }))
            .await?;
        self.expect_ok(response).await?;
        tracing::info!(%uid, %role, "role claim written");
        Ok(())
    }
}
