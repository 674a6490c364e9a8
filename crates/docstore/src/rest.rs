//! Hosted document-database adapter.
//!
//! Implements the repository ports over the database's document REST protocol:
//! documents live at `{base}/v1/{collection}/{id}` (subcollections nest under a
//! parent document), `POST` to a collection creates a document with an assigned
//! id, `PUT` replaces, `PATCH` merges, and listing a collection returns a
//! `documents` envelope. Authentication is a service key sent as a bearer
//! token.
//!
//! All transport detail stays here; the [`portal`] crate sees only the port
//! traits. Wire DTOs are separate from the domain types so protocol drift
//! never leaks upward.

use async_trait::async_trait;
use portal::{
    App, AppId, AppInput, AppRepository, Category, CategoryId, CategoryInput, CategoryRepository,
    ProfileRepository, Role, Settings, SettingsInput, SettingsRepository, StoreError, Timestamp,
    UserId, UserProfile,
};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// REST client for the hosted document database.
#[derive(Clone)]
pub struct RestDocStore {
    http: reqwest::Client,
    base_url: String,
    service_key: String,
}

impl RestDocStore {
    /// Creates an adapter for the database at `base_url` (no trailing slash),
    /// authenticating with `service_key`.
    pub fn new(base_url: impl Into<String>, service_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            service_key: service_key.into(),
        }
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        tracing::debug!(%method, path, "document store request");
        self.http
            .request(method, format!("{}/v1/{path}", self.base_url))
            .bearer_auth(&self.service_key)
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response, StoreError> {
        builder.send().await.map_err(transport_error)
    }

    /// Checks the status, mapping 404 to [`StoreError::NotFound`] and other
    /// failures to [`StoreError::Backend`].
    async fn expect_ok(
        &self,
        response: Response,
        collection: &str,
        id: &str,
    ) -> Result<Response, StoreError> {
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(StoreError::not_found(collection, id));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Backend {
                message: format!("{collection}: {status}: {body}"),
            });
        }
        Ok(response)
    }

    async fn decode<T: DeserializeOwned>(
        &self,
        response: Response,
        collection: &str,
    ) -> Result<T, StoreError> {
        response.json().await.map_err(|err| StoreError::Decode {
            collection: collection.to_string(),
            message: err.to_string(),
        })
    }

    async fn list_documents<T: DeserializeOwned>(
        &self,
        collection: &str,
        path: &str,
    ) -> Result<Vec<Document<T>>, StoreError> {
        let response = self.send(self.request(Method::GET, path)).await?;
        let response = self.expect_ok(response, collection, "").await?;
        let envelope: DocumentList<T> = self.decode(response, collection).await?;
        Ok(envelope.documents)
    }
}

fn transport_error(err: reqwest::Error) -> StoreError {
    if err.is_connect() || err.is_timeout() {
        StoreError::Transport {
            message: err.to_string(),
            retry_after: None,
        }
    } else {
        StoreError::Backend {
            message: err.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Wire DTOs
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct DocumentList<T> {
    documents: Vec<Document<T>>,
}

#[derive(Debug, Deserialize)]
struct Document<T> {
    id: String,
    #[serde(flatten)]
    fields: T,
}

#[derive(Debug, Deserialize)]
struct CreatedDocument {
    id: String,
}

fn document_id<I>(raw: String, collection: &str, make: fn(String) -> Option<I>) -> Result<I, StoreError> {
    make(raw).ok_or_else(|| StoreError::Decode {
        collection: collection.to_string(),
        message: "document with empty id".to_string(),
    })
}

#[derive(Debug, Serialize, Deserialize)]
struct AppDoc {
    name: String,
    url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    icon_url: Option<String>,
    category_id: String,
    #[serde(default)]
    tags: Vec<String>,
    is_active: bool,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl AppDoc {
    fn from_input(input: AppInput, created_at: Timestamp, updated_at: Timestamp) -> Self {
        Self {
            name: input.name,
            url: input.url,
            description: input.description,
            icon_url: input.icon_url,
            category_id: input.category_id.as_str().to_string(),
            tags: input.tags,
            is_active: true,
            created_at,
            updated_at,
        }
    }

    fn into_app(self, id: AppId) -> Result<App, StoreError> {
        Ok(App {
            id,
            name: self.name,
            url: self.url,
            description: self.description,
            icon_url: self.icon_url,
            category_id: document_id(self.category_id, "apps", CategoryId::new)?,
            tags: self.tags,
            is_active: self.is_active,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Merge payload for app updates. `created_at` is never sent, so the stored
/// value survives. The optionals always serialize, as explicit `null` when
/// unset: the form replaces the whole payload, so a cleared description must
/// clear the stored field rather than merge-keep it.
#[derive(Debug, Serialize)]
struct AppPatch {
    name: String,
    url: String,
    description: Option<String>,
    icon_url: Option<String>,
    category_id: String,
    tags: Vec<String>,
    updated_at: Timestamp,
}

#[derive(Debug, Serialize, Deserialize)]
struct CategoryDoc {
    name: String,
    #[serde(default)]
    sort_order: i64,
    #[serde(default = "default_true")]
    is_active: bool,
}

fn default_true() -> bool {
    true
}

impl CategoryDoc {
    fn from_input(input: CategoryInput) -> Self {
        Self {
            name: input.name,
            sort_order: input.sort_order,
            is_active: input.is_active,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct SettingsDoc {
    portal_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    logo_url: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ProfileDoc {
    email: String,
    #[serde(default)]
    role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    created_at: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    last_login: Option<Timestamp>,
}

#[derive(Debug, Serialize)]
struct RolePatch {
    role: Role,
}

#[derive(Debug, Serialize, Deserialize)]
struct FavoriteDoc {
    created_at: Timestamp,
}

#[derive(Debug, Serialize, Deserialize)]
struct RecentDoc {
    last_opened_at: Timestamp,
}

// ---------------------------------------------------------------------------
// Repository implementations
// ---------------------------------------------------------------------------

#[async_trait]
impl AppRepository for RestDocStore {
    async fn list_active(&self) -> Result<Vec<App>, StoreError> {
        let documents: Vec<Document<AppDoc>> = self.list_documents("apps", "apps").await?;
        documents
            .into_iter()
            .filter(|d| d.fields.is_active)
            .map(|d| {
                let id = document_id(d.id, "apps", AppId::new)?;
                d.fields.into_app(id)
            })
            .collect()
    }

    async fn create(&self, input: AppInput, now: Timestamp) -> Result<AppId, StoreError> {
        let doc = AppDoc::from_input(input, now, now);
        let response = self
            .send(self.request(Method::POST, "apps").json(&doc))
            .await?;
        let response = self.expect_ok(response, "apps", "").await?;
        let created: CreatedDocument = self.decode(response, "apps").await?;
        document_id(created.id, "apps", AppId::new)
    }

    async fn update(&self, id: &AppId, input: AppInput, now: Timestamp) -> Result<(), StoreError> {
        let patch = AppPatch {
            name: input.name,
            url: input.url,
            description: input.description,
            icon_url: input.icon_url,
            category_id: input.category_id.as_str().to_string(),
            tags: input.tags,
            updated_at: now,
        };
        let path = format!("apps/{id}");
        let response = self
            .send(self.request(Method::PATCH, &path).json(&patch))
            .await?;
        self.expect_ok(response, "apps", id.as_str()).await?;
        Ok(())
    }

    async fn delete(&self, id: &AppId) -> Result<(), StoreError> {
        let path = format!("apps/{id}");
        let response = self.send(self.request(Method::DELETE, &path)).await?;
        self.expect_ok(response, "apps", id.as_str()).await?;
        Ok(())
    }
}

#[async_trait]
impl CategoryRepository for RestDocStore {
    async fn list_active(&self) -> Result<Vec<Category>, StoreError> {
        let documents: Vec<Document<CategoryDoc>> = self.list_documents("categories", "categories").await?;
        let mut categories: Vec<Category> = documents
            .into_iter()
            .filter(|d| d.fields.is_active)
            .map(|d| {
                let id = document_id(d.id, "categories", CategoryId::new)?;
                Ok(Category {
                    id,
                    name: d.fields.name,
                    sort_order: d.fields.sort_order,
                    is_active: d.fields.is_active,
                })
            })
            .collect::<Result<_, StoreError>>()?;
        categories.sort_by(|a, b| a.sort_order.cmp(&b.sort_order).then_with(|| a.id.cmp(&b.id)));
        Ok(categories)
    }

    async fn create(&self, input: CategoryInput) -> Result<CategoryId, StoreError> {
        let doc = CategoryDoc::from_input(input);
        let response = self
            .send(self.request(Method::POST, "categories").json(&doc))
            .await?;
        let response = self.expect_ok(response, "categories", "").await?;
        let created: CreatedDocument = self.decode(response, "categories").await?;
        document_id(created.id, "categories", CategoryId::new)
    }

    async fn upsert(&self, id: &CategoryId, input: CategoryInput) -> Result<(), StoreError> {
        let doc = CategoryDoc::from_input(input);
        let path = format!("categories/{id}");
        let response = self
            .send(self.request(Method::PUT, &path).json(&doc))
            .await?;
        self.expect_ok(response, "categories", id.as_str()).await?;
        Ok(())
    }

    async fn update(&self, id: &CategoryId, input: CategoryInput) -> Result<(), StoreError> {
        let doc = CategoryDoc::from_input(input);
        let path = format!("categories/{id}");
        let response = self
            .send(self.request(Method::PATCH, &path).json(&doc))
            .await?;
        self.expect_ok(response, "categories", id.as_str()).await?;
        Ok(())
    }

    async fn delete(&self, id: &CategoryId) -> Result<(), StoreError> {
        let path = format!("categories/{id}");
        let response = self.send(self.request(Method::DELETE, &path)).await?;
        self.expect_ok(response, "categories", id.as_str()).await?;
        Ok(())
    }
}

#[async_trait]
impl SettingsRepository for RestDocStore {
    async fn get(&self) -> Result<Option<Settings>, StoreError> {
        let response = self.send(self.request(Method::GET, "settings/global")).await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = self.expect_ok(response, "settings", "global").await?;
        let doc: SettingsDoc = self.decode(response, "settings").await?;
        Ok(Some(Settings {
            portal_name: doc.portal_name,
            logo_url: doc.logo_url,
        }))
    }

    async fn merge(&self, input: SettingsInput) -> Result<(), StoreError> {
        let doc = SettingsDoc {
            portal_name: input.portal_name,
            logo_url: input.logo_url,
        };
        let response = self
            .send(self.request(Method::PATCH, "settings/global").json(&doc))
            .await?;
        self.expect_ok(response, "settings", "global").await?;
        Ok(())
    }
}

#[async_trait]
impl ProfileRepository for RestDocStore {
    async fn get(&self, uid: &UserId) -> Result<Option<UserProfile>, StoreError> {
        let path = format!("users/{uid}");
        let response = self.send(self.request(Method::GET, &path)).await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = self.expect_ok(response, "users", uid.as_str()).await?;
        let doc: ProfileDoc = self.decode(response, "users").await?;
        Ok(Some(profile_from_doc(uid.clone(), doc)?))
    }

    async fn upsert(&self, profile: UserProfile) -> Result<(), StoreError> {
        let doc = ProfileDoc {
            email: profile.email.as_str().to_string(),
            role: profile.role,
            created_at: profile.created_at,
            last_login: profile.last_login,
        };
        let path = format!("users/{}", profile.uid);
        let response = self
            .send(self.request(Method::PATCH, &path).json(&doc))
            .await?;
        self.expect_ok(response, "users", profile.uid.as_str()).await?;
        Ok(())
    }

    async fn set_role(&self, uid: &UserId, role: Role) -> Result<(), StoreError> {
        let path = format!("users/{uid}");
        let response = self
            .send(self.request(Method::PATCH, &path).json(&RolePatch { role }))
            .await?;
        self.expect_ok(response, "users", uid.as_str()).await?;
        Ok(())
    }

    async fn list(&self, limit: usize) -> Result<Vec<UserProfile>, StoreError> {
        let documents: Vec<Document<ProfileDoc>> = self.list_documents("users", "users").await?;
        documents
            .into_iter()
            .take(limit)
            .map(|d| {
                let uid = document_id(d.id, "users", UserId::new)?;
                profile_from_doc(uid, d.fields)
            })
            .collect()
    }

    async fn favorite_ids(&self, uid: &UserId) -> Result<Vec<AppId>, StoreError> {
        let path = format!("users/{uid}/favorites");
        let documents: Vec<Document<FavoriteDoc>> = self.list_documents("favorites", &path).await?;
        documents
            .into_iter()
            .map(|d| document_id(d.id, "favorites", AppId::new))
            .collect()
    }

    async fn is_favorite(&self, uid: &UserId, app_id: &AppId) -> Result<bool, StoreError> {
        let path = format!("users/{uid}/favorites/{app_id}");
        let response = self.send(self.request(Method::GET, &path)).await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(false);
        }
        self.expect_ok(response, "favorites", app_id.as_str()).await?;
        Ok(true)
    }

    async fn add_favorite(
        &self,
        uid: &UserId,
        app_id: &AppId,
        now: Timestamp,
    ) -> Result<(), StoreError> {
        let path = format!("users/{uid}/favorites/{app_id}");
        let doc = FavoriteDoc { created_at: now };
        let response = self
            .send(self.request(Method::PUT, &path).json(&doc))
            .await?;
        self.expect_ok(response, "favorites", app_id.as_str()).await?;
        Ok(())
    }

    async fn remove_favorite(&self, uid: &UserId, app_id: &AppId) -> Result<(), StoreError> {
        let path = format!("users/{uid}/favorites/{app_id}");
        let response = self.send(self.request(Method::DELETE, &path)).await?;
        // Deleting an absent favorite is fine; the toggle already decided.
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(());
        }
        self.expect_ok(response, "favorites", app_id.as_str()).await?;
        Ok(())
    }

    async fn touch_recent(
        &self,
        uid: &UserId,
        app_id: &AppId,
        now: Timestamp,
    ) -> Result<(), StoreError> {
        let path = format!("users/{uid}/recents/{app_id}");
        let doc = RecentDoc {
            last_opened_at: now,
        };
        let response = self
            .send(self.request(Method::PUT, &path).json(&doc))
            .await?;
        self.expect_ok(response, "recents", app_id.as_str()).await?;
        Ok(())
    }

    async fn recent_ids(&self, uid: &UserId, limit: usize) -> Result<Vec<AppId>, StoreError> {
        let path = format!("users/{uid}/recents");
        let documents: Vec<Document<RecentDoc>> = self.list_documents("recents", &path).await?;
        let mut entries: Vec<(String, Timestamp)> = documents
            .into_iter()
            .map(|d| (d.id, d.fields.last_opened_at))
            .collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        entries
            .into_iter()
            .take(limit)
            .map(|(id, _)| document_id(id, "recents", AppId::new))
            .collect()
    }
}

fn profile_from_doc(uid: UserId, doc: ProfileDoc) -> Result<UserProfile, StoreError> {
    let email = portal::Email::new(doc.email).ok_or_else(|| StoreError::Decode {
        collection: "users".to_string(),
        message: format!("profile {uid} has an empty email"),
    })?;
    Ok(UserProfile {
        uid,
        email,
        role: doc.role,
        created_at: doc.created_at,
        last_login: doc.last_login,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_doc_round_trips_through_the_envelope() {
        let json = r#"{
            "documents": [
                {
                    "id": "app-1",
                    "name": "Jira",
                    "url": "https://jira.example.com",
                    "category_id": "productivity",
                    "tags": ["Agile"],
                    "is_active": true,
                    "created_at": "2026-01-05T12:00:00Z",
                    "updated_at": "2026-01-06T12:00:00Z"
                }
            ]
        }"#;
        let list: DocumentList<AppDoc> = serde_json::from_str(json).unwrap();
        let doc = list.documents.into_iter().next().unwrap();
        assert_eq!(doc.id, "app-1");
        let app = doc
            .fields
            .into_app(AppId::new("app-1").unwrap())
            .unwrap();
        assert_eq!(app.name, "Jira");
        assert_eq!(app.description, None);
        assert_eq!(app.category_id.as_str(), "productivity");
    }

    #[test]
    fn app_patch_clears_optionals_but_never_touches_created_at() {
        let patch = AppPatch {
            name: "Jira".into(),
            url: "https://jira.example.com".into(),
            description: None,
            icon_url: None,
            category_id: "productivity".into(),
            tags: vec![],
            updated_at: Timestamp::now(),
        };
        let value = serde_json::to_value(&patch).unwrap();
        let object = value.as_object().unwrap();
        // Unset optionals go out as explicit nulls so the backend's merge
        // clears the stored fields instead of keeping stale values.
        assert_eq!(object["description"], serde_json::Value::Null);
        assert_eq!(object["icon_url"], serde_json::Value::Null);
        assert!(!object.contains_key("created_at"));
        assert!(object.contains_key("updated_at"));
    }

    #[test]
    fn category_doc_defaults_match_the_schema_defaults() {
        let doc: CategoryDoc = serde_json::from_str(r#"{"name": "HR"}"#).unwrap();
        assert_eq!(doc.sort_order, 0);
        assert!(doc.is_active);
    }
}
