//! Restaurant (tenant) model

use serde::{Deserialize, Serialize};

/// A restaurant is the identity boundary for every other entity.
///
/// Every downstream entity carries a restaurant id, and all queries and
/// mutations are scoped by it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Restaurant {
    /// Restaurant id
    pub id: String,
    /// Display name
    pub name: String,
    /// Contact email
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_email: Option<String>,
    /// Contact phone
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_phone: Option<String>,
}
