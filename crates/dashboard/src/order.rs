//! Persisted category ordering.
//!
//! Users can drag categories into their own order; the result is stored
//! client-side through the [`OrderStore`] port as a JSON array of category ids
//! under a fixed key. Corrupt or non-array payloads are ignored — the
//! dashboard falls back to the server's category order rather than failing.

use std::collections::HashMap;
use std::sync::Mutex;

use portal::CategoryId;

/// Storage key for the persisted category order.
///
/// The value format (a bare JSON array of category-id strings) predates this
/// implementation, so existing stored orders keep working.
pub const CATEGORY_ORDER_KEY: &str = "vportal-category-order";

/// Client-side key-value storage (browser local storage, a config file — the
/// dashboard does not care).
pub trait OrderStore {
    /// Reads the raw value stored under `key`, if any.
    fn load(&self, key: &str) -> Option<String>;

    /// Stores `value` under `key`, replacing any previous value.
    fn save(&self, key: &str, value: &str);
}

/// In-memory [`OrderStore`] for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryOrderStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryOrderStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl OrderStore for MemoryOrderStore {
    fn load(&self, key: &str) -> Option<String> {
        match self.entries.lock() {
            Ok(entries) => entries.get(key).cloned(),
            Err(_) => None,
        }
    }

    fn save(&self, key: &str, value: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(key.to_string(), value.to_string());
        }
    }
}

/// Loads the persisted category order; `None` when nothing usable is stored.
pub fn load_order(store: &dyn OrderStore) -> Option<Vec<CategoryId>> {
    let raw = store.load(CATEGORY_ORDER_KEY)?;
    match serde_json::from_str::<Vec<String>>(&raw) {
        Ok(ids) => Some(ids.into_iter().filter_map(CategoryId::new).collect()),
        Err(_) => None,
    }
}

/// Persists `order` as the JSON id array.
pub fn save_order(store: &dyn OrderStore, order: &[CategoryId]) {
    let ids: Vec<&str> = order.iter().map(CategoryId::as_str).collect();
    // Serializing a Vec<&str> cannot fail.
    if let Ok(raw) = serde_json::to_string(&ids) {
        store.save(CATEGORY_ORDER_KEY, &raw);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_round_trips() {
        let store = MemoryOrderStore::new();
        let order = vec![
            CategoryId::new("development").unwrap(),
            CategoryId::new("productivity").unwrap(),
        ];
        save_order(&store, &order);
        assert_eq!(load_order(&store), Some(order));
    }

    #[test]
    fn corrupt_payloads_are_ignored() {
        let store = MemoryOrderStore::new();
        store.save(CATEGORY_ORDER_KEY, "{not json");
        assert_eq!(load_order(&store), None);
        store.save(CATEGORY_ORDER_KEY, "{\"a\": 1}");
        assert_eq!(load_order(&store), None);
    }

    #[test]
    fn missing_key_is_none() {
        assert_eq!(load_order(&MemoryOrderStore::new()), None);
    }
}
