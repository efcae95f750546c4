//! Channel and line-item types
//!
//! Every channel (POS, kiosk, voice, delivery) produces the same
//! [`OrderSubmission`] shape; channel-specific requirements are policy
//! methods on [`Channel`], not special-cased code paths. Client-declared
//! financial fields are claims to be verified, never trusted.

use super::Cents;
use serde::{Deserialize, Serialize};

/// Origin of an order submission
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Channel {
    /// Staff entry at a POS terminal (dine-in tab)
    Pos,
    /// Self-service kiosk
    Kiosk,
    /// Voice ordering (NLU collaborator produces the submission)
    Voice,
    /// External delivery platform
    Delivery,
}

impl Channel {
    /// Whether confirmation requires an upfront payment authorization
    ///
    /// POS opens a dine-in tab and settles later; every self-service
    /// channel pays before the kitchen sees the order.
    pub fn requires_prepayment(&self) -> bool {
        !matches!(self, Self::Pos)
    }

    /// Whether a table reference is required (dine-in)
    pub fn requires_table(&self) -> bool {
        matches!(self, Self::Pos)
    }

    /// Whether a customer name is required (takeout/handoff)
    pub fn requires_customer_name(&self) -> bool {
        matches!(self, Self::Kiosk | Self::Voice | Self::Delivery)
    }

    /// Wire-format name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pos => "POS",
            Self::Kiosk => "KIOSK",
            Self::Voice => "VOICE",
            Self::Delivery => "DELIVERY",
        }
    }
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A line item as submitted by a client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineItemInput {
    /// Referenced menu item id
    pub menu_item_id: String,
    /// Quantity (must be a positive integer)
    pub quantity: i32,
    /// Selected modifier ids (must be legal for the parent item)
    #[serde(default)]
    pub modifier_ids: Vec<String>,
    /// Free-text special instructions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub special_instructions: Option<String>,
}

/// A raw order submission from any channel
///
/// `subtotal`/`tax`/`tip`/`total` are the client's declared amounts;
/// the validator recomputes and rejects on any mismatch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderSubmission {
    /// Originating channel
    pub channel: Channel,
    /// Table reference (dine-in)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table: Option<String>,
    /// Customer name (takeout/handoff)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    /// Line items
    pub items: Vec<LineItemInput>,
    /// Declared subtotal in minor units
    pub subtotal: Cents,
    /// Declared tax in minor units
    pub tax: Cents,
    /// Declared tip in minor units
    pub tip: Cents,
    /// Declared total in minor units
    pub total: Cents,
}

/// Modifier snapshot captured at order time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModifierSnapshot {
    /// Modifier id
    pub modifier_id: String,
    /// Name at order time
    pub name: String,
    /// Price delta at order time
    pub price_delta: Cents,
}

/// A normalized line item with immutable price snapshots
///
/// Snapshots are captured from the catalog at submission time so
/// receipts reproduce exactly even if the menu changes later.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// Line item id
    pub id: String,
    /// Referenced menu item id
    pub menu_item_id: String,
    /// Menu item name at order time
    pub name: String,
    /// Quantity
    pub quantity: i32,
    /// Unit price snapshot in minor units
    pub unit_price: Cents,
    /// Selected modifiers with their price deltas
    #[serde(default)]
    pub modifiers: Vec<ModifierSnapshot>,
    /// Sanitized special instructions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub special_instructions: Option<String>,
    /// (unit_price + modifier deltas) * quantity
    pub line_total: Cents,
}

/// Validator output: a fully checked order ready for persistence
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizedOrder {
    /// Owning restaurant id (from the resolved tenant context)
    pub restaurant_id: String,
    /// Originating channel
    pub channel: Channel,
    /// Table reference (dine-in)
    pub table: Option<String>,
    /// Customer name (takeout/handoff)
    pub customer_name: Option<String>,
    /// Normalized line items
    pub items: Vec<LineItem>,
    /// Verified subtotal
    pub subtotal: Cents,
    /// Verified tax
    pub tax: Cents,
    /// Verified tip
    pub tip: Cents,
    /// Verified total (== subtotal + tax + tip)
    pub total: Cents,
}
