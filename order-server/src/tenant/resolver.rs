//! Tenant context resolver

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::auth::CurrentActor;
use crate::core::ServerState;
use crate::security_log;
use shared::AppError;

/// Header carrying the claimed restaurant id
pub const RESTAURANT_ID_HEADER: &str = "x-restaurant-id";

/// The resolved tenant scope of a request
///
/// Construction is only possible through [`resolve_tenant`], so holding
/// a `TenantContext` proves the membership check passed.
#[derive(Debug, Clone)]
pub struct TenantContext {
    restaurant_id: String,
    actor: CurrentActor,
}

impl TenantContext {
    /// The resolved restaurant id
    pub fn restaurant_id(&self) -> &str {
        &self.restaurant_id
    }

    /// The acting principal
    pub fn actor(&self) -> &CurrentActor {
        &self.actor
    }
}

/// Resolve the acting restaurant for a request
///
/// Pure lookup and check, no side effects. Fails with `TenantMismatch`
/// when the claimed id is not in the actor's permitted set; the error
/// does not reveal whether the claimed restaurant exists.
pub fn resolve_tenant(
    actor: CurrentActor,
    claimed: Option<&str>,
) -> Result<TenantContext, AppError> {
    let claimed = match claimed {
        Some(id) if !id.trim().is_empty() => id.trim(),
        _ => return Err(AppError::new(shared::ErrorCode::TenantNotResolved)),
    };

    if !actor.permits_restaurant(claimed) {
        security_log!(
            "WARN",
            "tenant_mismatch",
            actor_id = actor.id.clone(),
            claimed = claimed.to_string()
        );
        return Err(AppError::tenant_mismatch());
    }

    Ok(TenantContext {
        restaurant_id: claimed.to_string(),
        actor,
    })
}

/// Extractor: authenticate the actor, then resolve the claimed tenant
impl FromRequestParts<ServerState> for TenantContext {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        let actor = CurrentActor::from_request_parts(parts, state).await?;
        let claimed = parts
            .headers
            .get(RESTAURANT_ID_HEADER)
            .and_then(|v| v.to_str().ok());
        resolve_tenant(actor, claimed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::ErrorCode;

    fn actor(restaurants: &[&str]) -> CurrentActor {
        CurrentActor {
            id: "actor-1".to_string(),
            name: "Ana".to_string(),
            role: "staff".to_string(),
            scopes: vec!["orders:*".to_string()],
            restaurants: restaurants.iter().map(|r| r.to_string()).collect(),
        }
    }

    #[test]
    fn test_resolves_permitted_restaurant() {
        let ctx = resolve_tenant(actor(&["rest-1", "rest-2"]), Some("rest-2")).unwrap();
        assert_eq!(ctx.restaurant_id(), "rest-2");
    }

    #[test]
    fn test_rejects_foreign_restaurant() {
        let err = resolve_tenant(actor(&["rest-1"]), Some("rest-9")).unwrap_err();
        assert_eq!(err.code, ErrorCode::TenantMismatch);
        // No detail may leak whether rest-9 exists
        assert!(err.details.is_none());
    }

    #[test]
    fn test_rejects_missing_header() {
        let err = resolve_tenant(actor(&["rest-1"]), None).unwrap_err();
        assert_eq!(err.code, ErrorCode::TenantNotResolved);
    }

    #[test]
    fn test_rejects_blank_header() {
        let err = resolve_tenant(actor(&["rest-1"]), Some("  ")).unwrap_err();
        assert_eq!(err.code, ErrorCode::TenantNotResolved);
    }

    #[test]
    fn test_admin_role_does_not_bypass_membership() {
        let mut admin = actor(&["rest-1"]);
        admin.role = "admin".to_string();
        let err = resolve_tenant(admin, Some("rest-2")).unwrap_err();
        assert_eq!(err.code, ErrorCode::TenantMismatch);
    }
}
