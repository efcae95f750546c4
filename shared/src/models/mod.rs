//! Tenant and catalog models
//!
//! The menu catalog is owned by an external collaborator; these types
//! are the read-only shapes the validator looks items up against.

mod menu;
mod restaurant;

pub use menu::{MenuItem, Modifier};
pub use restaurant::Restaurant;
