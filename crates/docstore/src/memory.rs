//! In-process implementation of the repository ports.
//!
//! Backs tests and local `--memory` runs. One `RwLock` over all collections is
//! plenty at this scale, and it keeps cross-collection reads (the dashboard
//! fetch) trivially consistent.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use portal::{
    App, AppId, AppInput, AppRepository, Category, CategoryId, CategoryInput, CategoryRepository,
    ProfileRepository, Role, Settings, SettingsInput, SettingsRepository, StoreError, Timestamp,
    UserId, UserProfile,
};
use tokio::sync::RwLock;

#[derive(Default)]
struct Collections {
    apps: HashMap<AppId, App>,
    categories: HashMap<CategoryId, Category>,
    settings: Option<Settings>,
    profiles: HashMap<UserId, UserProfile>,
    favorites: HashMap<UserId, HashMap<AppId, Timestamp>>,
    recents: HashMap<UserId, HashMap<AppId, Timestamp>>,
}

/// In-memory document store implementing every repository port.
///
/// Clone-cheap: clones share the same collections.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<Collections>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Test hook: reads an app document regardless of active state.
    pub async fn app(&self, id: &AppId) -> Option<App> {
        self.inner.read().await.apps.get(id).cloned()
    }

    /// Test hook: reads a profile document.
    pub async fn profile(&self, uid: &UserId) -> Option<UserProfile> {
        self.inner.read().await.profiles.get(uid).cloned()
    }
}

#[async_trait]
impl AppRepository for MemoryStore {
    async fn list_active(&self) -> Result<Vec<App>, StoreError> {
        let inner = self.inner.read().await;
        let mut apps: Vec<App> = inner.apps.values().filter(|a| a.is_active).cloned().collect();
        // Deterministic order for callers; the dashboard re-sorts anyway.
        apps.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(apps)
    }

    async fn create(&self, input: AppInput, now: Timestamp) -> Result<AppId, StoreError> {
        let id = AppId::generate();
        let app = App {
            id: id.clone(),
            name: input.name,
            url: input.url,
            description: input.description,
            icon_url: input.icon_url,
            category_id: input.category_id,
            tags: input.tags,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        self.inner.write().await.apps.insert(id.clone(), app);
        Ok(id)
    }

    async fn update(&self, id: &AppId, input: AppInput, now: Timestamp) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        let app = inner
            .apps
            .get_mut(id)
            .ok_or_else(|| StoreError::not_found("apps", id.as_str()))?;
        app.name = input.name;
        app.url = input.url;
        app.description = input.description;
        app.icon_url = input.icon_url;
        app.category_id = input.category_id;
        app.tags = input.tags;
        app.updated_at = now;
        Ok(())
    }

    async fn delete(&self, id: &AppId) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        inner
            .apps
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| StoreError::not_found("apps", id.as_str()))
    }
}

#[async_trait]
impl CategoryRepository for MemoryStore {
    async fn list_active(&self) -> Result<Vec<Category>, StoreError> {
        let inner = self.inner.read().await;
        let mut categories: Vec<Category> = inner
            .categories
            .values()
            .filter(|c| c.is_active)
            .cloned()
            .collect();
        categories.sort_by(|a, b| a.sort_order.cmp(&b.sort_order).then_with(|| a.id.cmp(&b.id)));
        Ok(categories)
    }

    async fn create(&self, input: CategoryInput) -> Result<CategoryId, StoreError> {
        let id = CategoryId::new(uuid::Uuid::new_v4().to_string())
            .ok_or_else(|| StoreError::Backend {
                message: "generated empty category id".into(),
            })?;
        CategoryRepository::upsert(self, &id, input).await?;
        Ok(id)
    }

    async fn upsert(&self, id: &CategoryId, input: CategoryInput) -> Result<(), StoreError> {
        let category = Category {
            id: id.clone(),
            name: input.name,
            sort_order: input.sort_order,
            is_active: input.is_active,
        };
        self.inner
            .write()
            .await
            .categories
            .insert(id.clone(), category);
        Ok(())
    }

    async fn update(&self, id: &CategoryId, input: CategoryInput) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        let category = inner
            .categories
            .get_mut(id)
            .ok_or_else(|| StoreError::not_found("categories", id.as_str()))?;
        category.name = input.name;
        category.sort_order = input.sort_order;
        category.is_active = input.is_active;
        Ok(())
    }

    async fn delete(&self, id: &CategoryId) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        inner
            .categories
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| StoreError::not_found("categories", id.as_str()))
    }
}

#[async_trait]
impl SettingsRepository for MemoryStore {
    async fn get(&self) -> Result<Option<Settings>, StoreError> {
        Ok(self.inner.read().await.settings.clone())
    }

    async fn merge(&self, input: SettingsInput) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        let logo_url = match input.logo_url {
            Some(url) => Some(url),
            // Merge write: absent logo keeps whatever is stored.
            None => inner.settings.as_ref().and_then(|s| s.logo_url.clone()),
        };
        inner.settings = Some(Settings {
            portal_name: input.portal_name,
            logo_url,
        });
        Ok(())
    }
}

#[async_trait]
impl ProfileRepository for MemoryStore {
    async fn get(&self, uid: &UserId) -> Result<Option<UserProfile>, StoreError> {
        Ok(self.inner.read().await.profiles.get(uid).cloned())
    }

    async fn upsert(&self, profile: UserProfile) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        let merged = match inner.profiles.get(&profile.uid) {
            Some(existing) => UserProfile {
                created_at: profile.created_at.or(existing.created_at),
                last_login: profile.last_login.or(existing.last_login),
                ..profile
            },
            None => profile,
        };
        inner.profiles.insert(merged.uid.clone(), merged);
        Ok(())
    }

    async fn set_role(&self, uid: &UserId, role: Role) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        match inner.profiles.get_mut(uid) {
            Some(profile) => profile.role = role,
            // Merge write creates the document if absent; email arrives on the
            // next sync.
            None => {
                let email = portal::Email::new(format!("{uid}@unsynced.invalid"))
                    .ok_or_else(|| StoreError::Backend {
                        message: "empty uid in role write".into(),
                    })?;
                inner.profiles.insert(
                    uid.clone(),
                    UserProfile {
                        uid: uid.clone(),
                        email,
                        role,
                        created_at: None,
                        last_login: None,
                    },
                );
            }
        }
        Ok(())
    }

    async fn list(&self, limit: usize) -> Result<Vec<UserProfile>, StoreError> {
        let inner = self.inner.read().await;
        let mut profiles: Vec<UserProfile> = inner.profiles.values().cloned().collect();
        profiles.sort_by(|a, b| a.uid.cmp(&b.uid));
        profiles.truncate(limit);
        Ok(profiles)
    }

    async fn favorite_ids(&self, uid: &UserId) -> Result<Vec<AppId>, StoreError> {
        let inner = self.inner.read().await;
        let mut ids: Vec<AppId> = inner
            .favorites
            .get(uid)
            .map(|favs| favs.keys().cloned().collect())
            .unwrap_or_default();
        ids.sort();
        Ok(ids)
    }

    async fn is_favorite(&self, uid: &UserId, app_id: &AppId) -> Result<bool, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .favorites
            .get(uid)
            .is_some_and(|favs| favs.contains_key(app_id)))
    }

    async fn add_favorite(
        &self,
        uid: &UserId,
        app_id: &AppId,
        now: Timestamp,
    ) -> Result<(), StoreError> {
        self.inner
            .write()
            .await
            .favorites
            .entry(uid.clone())
            .or_default()
            .insert(app_id.clone(), now);
        Ok(())
    }

    async fn remove_favorite(&self, uid: &UserId, app_id: &AppId) -> Result<(), StoreError> {
        if let Some(favs) = self.inner.write().await.favorites.get_mut(uid) {
            favs.remove(app_id);
        }
        Ok(())
    }

    async fn touch_recent(
        &self,
        uid: &UserId,
        app_id: &AppId,
        now: Timestamp,
    ) -> Result<(), StoreError> {
        self.inner
            .write()
            .await
            .recents
            .entry(uid.clone())
            .or_default()
            .insert(app_id.clone(), now);
        Ok(())
    }

    async fn recent_ids(&self, uid: &UserId, limit: usize) -> Result<Vec<AppId>, StoreError> {
        let inner = self.inner.read().await;
        let mut entries: Vec<(AppId, Timestamp)> = inner
            .recents
            .get(uid)
            .map(|r| r.iter().map(|(id, at)| (id.clone(), *at)).collect())
            .unwrap_or_default();
        // Most recently opened first; ids break timestamp ties deterministically.
        entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        entries.truncate(limit);
        Ok(entries.into_iter().map(|(id, _)| id).collect())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use portal::CategoryInput;

    use super::*;

    fn input(name: &str) -> AppInput {
        AppInput {
            name: name.into(),
            url: "https://example.com".into(),
            description: None,
            icon_url: None,
            category_id: CategoryId::new("dev").unwrap(),
            tags: vec![],
        }
    }

    #[tokio::test]
    async fn update_missing_app_is_not_found() {
        let store = MemoryStore::new();
        let missing = AppId::generate();
        let err = AppRepository::update(&store, &missing, input("x"), Timestamp::now()).await;
        assert!(matches!(err, Err(StoreError::NotFound { .. })));
    }

    #[tokio::test]
    async fn update_replaces_optional_fields_with_absent_values() {
        let store = MemoryStore::new();
        let id = AppRepository::create(
            &store,
            AppInput {
                description: Some("Issue tracking".into()),
                icon_url: Some("https://cdn.example.com/jira.png".into()),
                ..input("Jira")
            },
            Timestamp::now(),
        )
        .await
        .unwrap();

        // The form cleared both optional fields; the update must not keep the
        // old values.
        AppRepository::update(&store, &id, input("Jira"), Timestamp::now())
            .await
            .unwrap();
        let app = store.app(&id).await.unwrap();
        assert_eq!(app.description, None);
        assert_eq!(app.icon_url, None);
    }

    #[tokio::test]
    async fn categories_list_sorted_by_sort_order() {
        let store = MemoryStore::new();
        for (id, order) in [("b", 2), ("a", 1), ("c", 3)] {
            CategoryRepository::upsert(
                &store,
                &CategoryId::new(id).unwrap(),
                CategoryInput {
                    name: id.to_uppercase(),
                    sort_order: order,
                    is_active: true,
                },
            )
            .await
            .unwrap();
        }
        let listed = CategoryRepository::list_active(&store).await.unwrap();
        let ids: Vec<&str> = listed.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn recents_come_back_most_recent_first_and_capped() {
        let store = MemoryStore::new();
        let uid = UserId::new("u1").unwrap();
        let base = Utc::now();
        let ids: Vec<AppId> = (0..4).map(|_| AppId::generate()).collect();
        for (i, id) in ids.iter().enumerate() {
            store
                .touch_recent(
                    &uid,
                    id,
                    Timestamp::from_utc(base + Duration::seconds(i as i64)),
                )
                .await
                .unwrap();
        }
        let recent = store.recent_ids(&uid, 3).await.unwrap();
        assert_eq!(recent.len(), 3);
        assert_eq!(recent[0], ids[3]);
        assert_eq!(recent[2], ids[1]);
    }

    #[tokio::test]
    async fn touch_recent_refreshes_an_existing_entry() {
        let store = MemoryStore::new();
        let uid = UserId::new("u1").unwrap();
        let (a, b) = (AppId::generate(), AppId::generate());
        let base = Utc::now();
        store
            .touch_recent(&uid, &a, Timestamp::from_utc(base))
            .await
            .unwrap();
        store
            .touch_recent(&uid, &b, Timestamp::from_utc(base + Duration::seconds(1)))
            .await
            .unwrap();
        store
            .touch_recent(&uid, &a, Timestamp::from_utc(base + Duration::seconds(2)))
            .await
            .unwrap();
        let recent = store.recent_ids(&uid, 10).await.unwrap();
        assert_eq!(recent, vec![a, b]);
    }

    #[tokio::test]
    async fn settings_merge_keeps_logo_when_absent() {
        let store = MemoryStore::new();
        store
            .merge(SettingsInput {
                portal_name: "VPortal".into(),
                logo_url: Some("https://cdn.example.com/logo.png".into()),
            })
            .await
            .unwrap();
        store
            .merge(SettingsInput {
                portal_name: "Renamed".into(),
                logo_url: None,
            })
            .await
            .unwrap();
        let settings = SettingsRepository::get(&store).await.unwrap().unwrap();
        assert_eq!(settings.portal_name, "Renamed");
        assert_eq!(
            settings.logo_url.as_deref(),
            Some("https://cdn.example.com/logo.png")
        );
    }

    #[tokio::test]
    async fn profile_upsert_merges_timestamps() {
        let store = MemoryStore::new();
        let uid = UserId::new("u1").unwrap();
        let email = portal::Email::new("u1@example.com").unwrap();
        ProfileRepository::upsert(
            &store,
            UserProfile {
                uid: uid.clone(),
                email: email.clone(),
                role: Role::User,
                created_at: Some(Timestamp::now()),
                last_login: None,
            },
        )
        .await
        .unwrap();
        ProfileRepository::upsert(
            &store,
            UserProfile {
                uid: uid.clone(),
                email,
                role: Role::Admin,
                created_at: None,
                last_login: Some(Timestamp::now()),
            },
        )
        .await
        .unwrap();
        let profile = ProfileRepository::get(&store, &uid).await.unwrap().unwrap();
        assert_eq!(profile.role, Role::Admin);
        assert!(profile.created_at.is_some());
        assert!(profile.last_login.is_some());
    }
}
