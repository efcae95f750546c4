//! Tenant context resolution
//!
//! Every request claims a restaurant via the `x-restaurant-id` header.
//! The resolver checks the claim against the authenticated actor's
//! permitted set and produces a [`TenantContext`]; downstream code only
//! ever receives the resolved context, never the raw header, so a
//! spoofed tenant id cannot propagate. There is no ambient "current
//! restaurant" state anywhere in the service.

mod resolver;

pub use resolver::{RESTAURANT_ID_HEADER, TenantContext, resolve_tenant};
