//! Menu catalog cache
//!
//! The catalog collaborator owns menu data; the order path only needs
//! fast read-only lookups for validation. Menus arrive as whole
//! per-restaurant snapshots through [`CatalogService::replace_menu`].

mod service;

pub use service::CatalogService;
