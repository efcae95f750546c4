//! Actor authentication
//!
//! Token *issuance* belongs to the external identity collaborator; this
//! module only verifies HS256 tokens and exposes the resulting
//! [`CurrentActor`] to handlers via an axum extractor.

mod extractor;
mod jwt;

pub use jwt::{Claims, CurrentActor, JwtConfig, JwtError, JwtService};
