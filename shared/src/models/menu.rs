//! Menu item and modifier models
//!
//! Prices are integer minor-currency units. The catalog collaborator
//! owns these records; the order path only reads them.

use crate::order::Cents;
use serde::{Deserialize, Serialize};

/// A modifier that may be applied to its parent menu item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Modifier {
    /// Modifier id
    pub id: String,
    /// Display name
    pub name: String,
    /// Price delta in minor units (may be negative, e.g. "no cheese")
    pub price_delta: Cents,
}

/// A menu item as seen by the order path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    /// Menu item id
    pub id: String,
    /// Owning restaurant id
    pub restaurant_id: String,
    /// Display name
    pub name: String,
    /// Current unit price in minor units
    pub unit_price: Cents,
    /// Whether the item can currently be ordered
    pub available: bool,
    /// Modifiers legal for this item
    #[serde(default)]
    pub modifiers: Vec<Modifier>,
}

impl MenuItem {
    /// Look up a legal modifier by id
    pub fn modifier(&self, modifier_id: &str) -> Option<&Modifier> {
        self.modifiers.iter().find(|m| m.id == modifier_id)
    }
}
