//! In-memory menu cache

use dashmap::DashMap;
use shared::models::MenuItem;
use std::collections::HashMap;

/// Per-restaurant menu cache
///
/// Lookups are lock-free reads against a `DashMap`; replacement swaps a
/// restaurant's whole menu atomically, so the validator never observes
/// a half-updated catalog.
#[derive(Debug, Default)]
pub struct CatalogService {
    menus: DashMap<String, HashMap<String, MenuItem>>,
}

impl CatalogService {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self {
            menus: DashMap::new(),
        }
    }

    /// Replace a restaurant's menu snapshot
    ///
    /// Items whose `restaurant_id` does not match are dropped and
    /// logged; a catalog push can never smuggle another tenant's items.
    pub fn replace_menu(&self, restaurant_id: &str, items: Vec<MenuItem>) {
        let mut menu = HashMap::with_capacity(items.len());
        for item in items {
            if item.restaurant_id != restaurant_id {
                tracing::warn!(
                    restaurant_id,
                    item_id = %item.id,
                    item_restaurant = %item.restaurant_id,
                    "Dropping menu item owned by a different restaurant"
                );
                continue;
            }
            menu.insert(item.id.clone(), item);
        }
        tracing::info!(restaurant_id, items = menu.len(), "Menu snapshot replaced");
        self.menus.insert(restaurant_id.to_string(), menu);
    }

    /// Look up a menu item within a restaurant's menu
    pub fn find_item(&self, restaurant_id: &str, item_id: &str) -> Option<MenuItem> {
        self.menus
            .get(restaurant_id)
            .and_then(|menu| menu.get(item_id).cloned())
    }

    /// Number of items in a restaurant's menu
    pub fn menu_len(&self, restaurant_id: &str) -> usize {
        self.menus.get(restaurant_id).map(|m| m.len()).unwrap_or(0)
    }
}
