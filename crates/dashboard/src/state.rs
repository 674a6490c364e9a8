//! Dashboard view-state.
//!
//! Plain immutable-feeling state updated through reducer-style transitions.
//! Every query method is a pure function of the current state; the only side
//! channel is the [`OrderStore`] write when the user reorders categories. No
//! concurrency handling is needed — from the user's perspective everything
//! here is single-threaded and sequential.

use std::collections::{BTreeSet, HashMap};

use portal::{App, AppId, Category, CategoryId};

use crate::order::{load_order, save_order, OrderStore};

/// The dashboard's client-held state.
#[derive(Debug, Clone)]
pub struct DashboardState {
    apps: Vec<App>,
    categories: Vec<Category>,
    favorites: BTreeSet<AppId>,
    recent: Vec<AppId>,
    search: String,
    selected_category: Option<CategoryId>,
    /// Persisted preference order; may reference deleted categories and miss
    /// new ones. Normalized on every read.
    category_order: Vec<CategoryId>,
}

/// Prior state captured by an optimistic favorite flip, used to revert when
/// the remote write fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FavoriteSnapshot {
    was_favorite: bool,
}

impl DashboardState {
    /// Builds the state from a dashboard fetch, loading any persisted category
    /// order from `store`.
    pub fn new(
        apps: Vec<App>,
        categories: Vec<Category>,
        favorite_ids: Vec<AppId>,
        recent_ids: Vec<AppId>,
        store: &dyn OrderStore,
    ) -> Self {
        let category_order =
            load_order(store).unwrap_or_else(|| categories.iter().map(|c| c.id.clone()).collect());
        Self {
            apps,
            categories,
            favorites: favorite_ids.into_iter().collect(),
            recent: recent_ids,
            search: String::new(),
            selected_category: None,
            category_order,
        }
    }

    // -- transitions --------------------------------------------------------

    /// Updates the search text.
    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
    }

    /// Selects a category filter; `None` shows every category.
    pub fn select_category(&mut self, category: Option<CategoryId>) {
        self.selected_category = category;
    }

    /// Optimistically flips whether `app_id` is a favorite, returning a
    /// snapshot to [`revert_favorite`](Self::revert_favorite) with if the
    /// remote toggle fails.
    pub fn toggle_favorite_optimistic(&mut self, app_id: &AppId) -> FavoriteSnapshot {
        let was_favorite = self.favorites.contains(app_id);
        if was_favorite {
            self.favorites.remove(app_id);
        } else {
            self.favorites.insert(app_id.clone());
        }
        FavoriteSnapshot { was_favorite }
    }

    /// Restores the favorite state captured before an optimistic flip.
    pub fn revert_favorite(&mut self, app_id: &AppId, snapshot: FavoriteSnapshot) {
        if snapshot.was_favorite {
            self.favorites.insert(app_id.clone());
        } else {
            self.favorites.remove(app_id);
        }
    }

    /// Moves `from` to the position of `to` in the category order and persists
    /// the result.
    ///
    /// No-op when the ids are equal or either is unknown; the persisted order
    /// is normalized (stale ids dropped, new categories appended) before the
    /// move so repeated drags behave predictably.
    pub fn move_category(&mut self, from: &CategoryId, to: &CategoryId, store: &dyn OrderStore) {
        if from == to {
            return;
        }
        let mut order = self.effective_order_ids();
        let Some(from_index) = order.iter().position(|id| id == from) else {
            return;
        };
        let Some(to_index) = order.iter().position(|id| id == to) else {
            return;
        };
        let moved = order.remove(from_index);
        order.insert(to_index, moved);
        save_order(store, &order);
        self.category_order = order;
    }

    /// The normalized order as owned ids (known categories only, new ones
    /// appended).
    fn effective_order_ids(&self) -> Vec<CategoryId> {
        self.ordered_categories()
            .into_iter()
            .map(|c| c.id.clone())
            .collect()
    }

    // -- queries ------------------------------------------------------------

    /// The current search text.
    pub fn search(&self) -> &str {
        &self.search
    }

    /// The selected category filter.
    pub fn selected_category(&self) -> Option<&CategoryId> {
        self.selected_category.as_ref()
    }

    /// Whether `app_id` is currently a favorite (optimistic flips included).
    pub fn is_favorite(&self, app_id: &AppId) -> bool {
        self.favorites.contains(app_id)
    }

    /// Categories in the user's effective order: persisted preference first
    /// (stale ids dropped), then categories the preference has never seen, in
    /// server order.
    pub fn ordered_categories(&self) -> Vec<&Category> {
        let by_id: HashMap<&CategoryId, &Category> =
            self.categories.iter().map(|c| (&c.id, c)).collect();
        let mut ordered: Vec<&Category> = self
            .category_order
            .iter()
            .filter_map(|id| by_id.get(id).copied())
            .collect();
        for category in &self.categories {
            if !self.category_order.contains(&category.id) {
                ordered.push(category);
            }
        }
        ordered
    }

    /// Apps matching the search text and category filter, sorted by the
    /// effective category order, ties broken by name. Apps filed under a
    /// category missing from the order sort last.
    pub fn visible_apps(&self) -> Vec<&App> {
        let position: HashMap<&CategoryId, usize> = self
            .ordered_categories()
            .into_iter()
            .enumerate()
            .map(|(index, category)| (&category.id, index))
            .collect();
        let needle = self.search.to_lowercase();

        let mut apps: Vec<&App> = self
            .apps
            .iter()
            .filter(|app| self.matches_search(app, &needle) && self.matches_category(app))
            .collect();
        apps.sort_by(|a, b| {
            let pa = position.get(&a.category_id).copied().unwrap_or(usize::MAX);
            let pb = position.get(&b.category_id).copied().unwrap_or(usize::MAX);
            pa.cmp(&pb).then_with(|| a.name.cmp(&b.name))
        });
        apps
    }

    /// The user's favorite apps, in server order.
    pub fn favorite_apps(&self) -> Vec<&App> {
        self.apps
            .iter()
            .filter(|app| self.favorites.contains(&app.id))
            .collect()
    }

    /// The user's recent apps, most recently opened first.
    pub fn recent_apps(&self) -> Vec<&App> {
        let position: HashMap<&AppId, usize> = self
            .recent
            .iter()
            .enumerate()
            .map(|(index, id)| (id, index))
            .collect();
        let mut apps: Vec<&App> = self
            .apps
            .iter()
            .filter(|app| position.contains_key(&app.id))
            .collect();
        apps.sort_by_key(|app| position.get(&app.id).copied().unwrap_or(usize::MAX));
        apps
    }

    fn matches_search(&self, app: &App, needle: &str) -> bool {
        if needle.is_empty() {
            return true;
        }
        app.name.to_lowercase().contains(needle)
            || app
                .description
                .as_ref()
                .is_some_and(|d| d.to_lowercase().contains(needle))
            || app.tags.iter().any(|t| t.to_lowercase().contains(needle))
    }

    fn matches_category(&self, app: &App) -> bool {
        match &self.selected_category {
            Some(selected) => app.category_id == *selected,
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use portal::Timestamp;

    use super::*;
    use crate::order::MemoryOrderStore;

    fn category(id: &str, sort_order: i64) -> Category {
        Category {
            id: CategoryId::new(id).unwrap(),
            name: id.to_uppercase(),
            sort_order,
            is_active: true,
        }
    }

    fn app(id: &str, name: &str, category: &str, tags: &[&str]) -> App {
        let now = Timestamp::now();
        App {
            id: AppId::new(id).unwrap(),
            name: name.into(),
            url: "https://example.com".into(),
            description: Some(format!("{name} tool")),
            icon_url: None,
            category_id: CategoryId::new(category).unwrap(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    fn fixture(store: &dyn OrderStore) -> DashboardState {
        DashboardState::new(
            vec![
                app("a1", "Jira", "productivity", &["Agile"]),
                app("a2", "Slack", "productivity", &["Chat"]),
                app("a3", "GitHub", "development", &["Git"]),
            ],
            vec![category("productivity", 1), category("development", 2)],
            vec![AppId::new("a2").unwrap()],
            vec![AppId::new("a3").unwrap(), AppId::new("a1").unwrap()],
            store,
        )
    }

    #[test]
    fn search_matches_name_description_and_tags() {
        let store = MemoryOrderStore::new();
        let mut state = fixture(&store);

        state.set_search("git");
        let names: Vec<&str> = state.visible_apps().iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["GitHub"]);

        state.set_search("CHAT");
        let names: Vec<&str> = state.visible_apps().iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["Slack"]);

        state.set_search("tool"); // matches every description
        assert_eq!(state.visible_apps().len(), 3);
    }

    #[test]
    fn category_filter_restricts_visible_apps() {
        let store = MemoryOrderStore::new();
        let mut state = fixture(&store);
        state.select_category(Some(CategoryId::new("development").unwrap()));
        let names: Vec<&str> = state.visible_apps().iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["GitHub"]);
        state.select_category(None);
        assert_eq!(state.visible_apps().len(), 3);
    }

    #[test]
    fn visible_apps_sort_by_category_order_then_name() {
        let store = MemoryOrderStore::new();
        let state = fixture(&store);
        let names: Vec<&str> = state.visible_apps().iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["Jira", "Slack", "GitHub"]);
    }

    #[test]
    fn moving_a_category_reorders_apps_and_persists() {
        let store = MemoryOrderStore::new();
        let mut state = fixture(&store);
        let dev = CategoryId::new("development").unwrap();
        let prod = CategoryId::new("productivity").unwrap();

        state.move_category(&dev, &prod, &store);
        let names: Vec<&str> = state.visible_apps().iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["GitHub", "Jira", "Slack"]);

        // A fresh state built over the same store sees the persisted order.
        let rebuilt = fixture(&store);
        let names: Vec<&str> = rebuilt.visible_apps().iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["GitHub", "Jira", "Slack"]);
    }

    #[test]
    fn move_with_unknown_or_equal_ids_is_a_noop() {
        let store = MemoryOrderStore::new();
        let mut state = fixture(&store);
        let prod = CategoryId::new("productivity").unwrap();
        let ghost = CategoryId::new("ghost").unwrap();

        let before: Vec<String> = state
            .ordered_categories()
            .iter()
            .map(|c| c.id.to_string())
            .collect();
        state.move_category(&prod, &prod, &store);
        state.move_category(&ghost, &prod, &store);
        let after: Vec<String> = state
            .ordered_categories()
            .iter()
            .map(|c| c.id.to_string())
            .collect();
        assert_eq!(before, after);
        assert!(store.load(crate::order::CATEGORY_ORDER_KEY).is_none());
    }

    #[test]
    fn stale_persisted_order_is_normalized() {
        let store = MemoryOrderStore::new();
        // "archived" no longer exists; "development" was added after the user
        // last reordered.
        store.save(
            crate::order::CATEGORY_ORDER_KEY,
            r#"["archived", "productivity"]"#,
        );
        let state = fixture(&store);
        let ids: Vec<&str> = state
            .ordered_categories()
            .iter()
            .map(|c| c.id.as_str())
            .collect();
        assert_eq!(ids, vec!["productivity", "development"]);
    }

    #[test]
    fn optimistic_favorite_toggle_flips_and_reverts() {
        let store = MemoryOrderStore::new();
        let mut state = fixture(&store);
        let a1 = AppId::new("a1").unwrap();

        assert!(!state.is_favorite(&a1));
        let snapshot = state.toggle_favorite_optimistic(&a1);
        assert!(state.is_favorite(&a1));

        // Remote write failed; put it back.
        state.revert_favorite(&a1, snapshot);
        assert!(!state.is_favorite(&a1));
    }

    #[test]
    fn favorites_and_recents_resolve_against_apps() {
        let store = MemoryOrderStore::new();
        let state = fixture(&store);
        let favorites: Vec<&str> = state.favorite_apps().iter().map(|a| a.name.as_str()).collect();
        assert_eq!(favorites, vec!["Slack"]);
        let recents: Vec<&str> = state.recent_apps().iter().map(|a| a.name.as_str()).collect();
        assert_eq!(recents, vec!["GitHub", "Jira"]);
    }
}
