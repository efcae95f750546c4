//! Transition guards
//!
//! Structural adjacency lives in `OrderStatus::can_transition_to`; this
//! module evaluates everything else a transition needs before it may be
//! attempted against the store:
//!
//! | Target | Guard |
//! |--------|-------|
//! | CONFIRMED | `orders:submit` scope; payment verified unless the channel requires none |
//! | PREPARING | `orders:kitchen` scope |
//! | READY | `orders:kitchen` scope |
//! | COMPLETED | `orders:expo` scope |
//! | CANCELLED | `orders:cancel` scope; reason mandatory |
//! | FAILED | `orders:submit` scope (payment failure / timeout path) |
//!
//! Guards never consult the store; the version check and the legality
//! recheck against the *stored* status happen atomically inside
//! [`super::OrderStore::apply_transition`].

use crate::auth::CurrentActor;
use crate::utils::validation::{MAX_NOTE_LEN, sanitize_text};
use shared::error::{ErrorCode, FieldError};
use shared::order::{Channel, OrderStatus};
use shared::AppError;

/// A requested status change
#[derive(Debug, Clone)]
pub struct TransitionRequest {
    /// Desired status
    pub to: OrderStatus,
    /// Reason (mandatory for CANCELLED, recorded for FAILED)
    pub reason: Option<String>,
    /// Payment authorization reference (CONFIRMED on prepaid channels)
    pub payment_reference: Option<String>,
}

/// Inputs the guards are evaluated against
#[derive(Debug)]
pub struct GuardContext<'a> {
    /// The acting principal
    pub actor: &'a CurrentActor,
    /// Channel of the target order
    pub channel: Channel,
    /// Whether the payment collaborator verified the authorization
    pub payment_verified: bool,
}

/// Scope required to request a transition into `to`
pub fn required_scope(to: OrderStatus) -> Option<&'static str> {
    match to {
        OrderStatus::Confirmed | OrderStatus::Failed => Some("orders:submit"),
        OrderStatus::Preparing | OrderStatus::Ready => Some("orders:kitchen"),
        OrderStatus::Completed => Some("orders:expo"),
        OrderStatus::Cancelled => Some("orders:cancel"),
        OrderStatus::Pending => None,
    }
}

/// Evaluate all transition guards
///
/// `from` is the status the caller last read; the store re-validates
/// adjacency against the stored status when it applies the write, so a
/// stale `from` can only produce a `ConcurrentModification` or
/// `InvalidTransition` there, never a bad commit.
pub fn check_guards(
    from: OrderStatus,
    request: &TransitionRequest,
    ctx: &GuardContext<'_>,
) -> Result<Option<String>, AppError> {
    if !from.can_transition_to(request.to) {
        return Err(AppError::invalid_transition(from.as_str(), request.to.as_str()));
    }

    if let Some(scope) = required_scope(request.to)
        && !ctx.actor.has_scope(scope)
    {
        return Err(AppError::scope_required(scope));
    }

    // Cancellation reason is mandatory metadata
    let reason = request.reason.as_deref().and_then(sanitize_text);
    if request.to == OrderStatus::Cancelled && reason.is_none() {
        return Err(AppError::validation_fields(vec![FieldError::new(
            "reason",
            ErrorCode::RequiredField,
            "cancellation requires a reason",
        )]));
    }
    if let Some(r) = &reason
        && r.len() > MAX_NOTE_LEN
    {
        return Err(AppError::validation_fields(vec![FieldError::new(
            "reason",
            ErrorCode::ValidationFailed,
            format!("reason exceeds {MAX_NOTE_LEN} characters"),
        )]));
    }

    // Payment guard: authorized, or the channel requires no upfront payment
    if request.to == OrderStatus::Confirmed
        && ctx.channel.requires_prepayment()
        && !ctx.payment_verified
    {
        return Err(AppError::new(ErrorCode::PaymentNotAuthorized));
    }

    Ok(reason)
}
