//! Order lifecycle orchestration
//!
//! Glues resolver output, validator, guards, store and notifier
//! together. Every path follows the same discipline: external calls
//! (payment verification) complete before any store transaction opens,
//! and the notifier fires only after a successful commit.

use std::sync::Arc;

use crate::catalog::CatalogService;
use crate::payments::PaymentGateway;
use crate::tenant::TenantContext;
use shared::AppError;
use shared::error::ErrorCode;
use shared::order::{OrderRecord, OrderStatus, TransitionEvent};
use shared::util::now_millis;

use super::notifier::TransitionNotifier;
use super::store::OrderStore;
use super::transitions::{GuardContext, TransitionRequest, check_guards};
use super::validator::validate_submission;

/// Scope required to submit a new order
const SUBMIT_SCOPE: &str = "orders:submit";

/// Reason recorded when a declined authorization fails an order
const DECLINED_REASON: &str = "Payment authorization declined";

/// Order lifecycle service
pub struct OrderService {
    store: Arc<OrderStore>,
    catalog: Arc<CatalogService>,
    notifier: Arc<TransitionNotifier>,
    payments: Arc<dyn PaymentGateway>,
}

impl OrderService {
    pub fn new(
        store: Arc<OrderStore>,
        catalog: Arc<CatalogService>,
        notifier: Arc<TransitionNotifier>,
        payments: Arc<dyn PaymentGateway>,
    ) -> Self {
        Self {
            store,
            catalog,
            notifier,
            payments,
        }
    }

    /// Submit a new order from any channel
    ///
    /// Validates, persists the PENDING record atomically, broadcasts
    /// the creation event. Confirmation is a separate transition.
    pub async fn submit_order(
        &self,
        ctx: &TenantContext,
        submission: shared::order::OrderSubmission,
    ) -> Result<OrderRecord, AppError> {
        if !ctx.actor().has_scope(SUBMIT_SCOPE) {
            return Err(AppError::scope_required(SUBMIT_SCOPE));
        }

        let normalized = validate_submission(ctx, &self.catalog, &submission)
            .map_err(AppError::validation_fields)?;

        // Number allocation runs in its own transaction, before the
        // creation transaction (redb write transactions do not nest)
        let order_number = self.store.next_order_number(ctx.restaurant_id())?;
        let record = OrderRecord::from_normalized(normalized, order_number);
        self.store.create_order(&record)?;

        tracing::info!(
            restaurant_id = %record.restaurant_id,
            order_id = %record.id,
            order_number = %record.order_number,
            channel = %record.channel,
            total = record.total,
            "Order created"
        );
        self.notifier.publish(TransitionEvent::created(&record));
        Ok(record)
    }

    /// Fetch one order (tenant-scoped)
    pub fn get_order(&self, ctx: &TenantContext, order_id: &str) -> Result<OrderRecord, AppError> {
        self.store
            .get(ctx.restaurant_id(), order_id)?
            .ok_or_else(|| AppError::order_not_found(order_id))
    }

    /// List the restaurant's active orders, optionally by status
    pub fn list_active(
        &self,
        ctx: &TenantContext,
        status: Option<OrderStatus>,
    ) -> Result<Vec<OrderRecord>, AppError> {
        let mut orders = self.store.list_active(ctx.restaurant_id())?;
        if let Some(status) = status {
            orders.retain(|o| o.status == status);
        }
        Ok(orders)
    }

    /// Apply a status transition on behalf of an actor
    ///
    /// Guards (scope, cancel reason, payment) are evaluated against the
    /// record as last read; the store then linearizes the write with
    /// the optimistic version check. A racing loser receives
    /// `ConcurrentModification` and must re-read and retry.
    pub async fn apply_transition(
        &self,
        ctx: &TenantContext,
        order_id: &str,
        expected_version: u64,
        request: TransitionRequest,
    ) -> Result<OrderRecord, AppError> {
        let record = self.get_order(ctx, order_id)?;

        // A stale caller is told to re-read and retry before any guard
        // runs; the store repeats this check atomically with the write.
        if record.version != expected_version {
            return Err(AppError::concurrent_modification(expected_version, record.version));
        }

        // Payment verification happens before guard evaluation and
        // before any write transaction; no lock spans this await.
        let payment_verified = if request.to == OrderStatus::Confirmed
            && record.channel.requires_prepayment()
        {
            match &request.payment_reference {
                None => false,
                Some(reference) => {
                    let authorized = self
                        .payments
                        .verify_authorization(ctx.restaurant_id(), order_id, reference)
                        .await?;
                    if !authorized {
                        self.fail_declined_order(ctx, &record).await;
                        return Err(AppError::new(ErrorCode::PaymentNotAuthorized));
                    }
                    true
                }
            }
        } else {
            false
        };

        let guard_ctx = GuardContext {
            actor: ctx.actor(),
            channel: record.channel,
            payment_verified,
        };
        let reason = check_guards(record.status, &request, &guard_ctx)?;

        let (updated, from) = self.store.apply_transition(
            ctx.restaurant_id(),
            order_id,
            expected_version,
            request.to,
            reason,
        )?;

        tracing::info!(
            restaurant_id = %updated.restaurant_id,
            order_id = %updated.id,
            from = %from,
            to = %updated.status,
            version = updated.version,
            "Order transitioned"
        );
        self.notifier
            .publish(TransitionEvent::transitioned(&updated, from));
        Ok(updated)
    }

    /// Move an order whose payment was declined to FAILED (best effort)
    ///
    /// A concurrent transition winning the version race just means the
    /// order already moved on; the decline error still goes back to the
    /// caller either way.
    async fn fail_declined_order(&self, ctx: &TenantContext, record: &OrderRecord) {
        if record.status != OrderStatus::Pending {
            return;
        }
        match self.store.apply_transition(
            ctx.restaurant_id(),
            &record.id,
            record.version,
            OrderStatus::Failed,
            Some(DECLINED_REASON.to_string()),
        ) {
            Ok((updated, from)) => {
                tracing::info!(order_id = %updated.id, "Order failed: payment declined");
                self.notifier
                    .publish(TransitionEvent::transitioned(&updated, from));
            }
            Err(e) => {
                tracing::warn!(order_id = %record.id, error = %e, "Could not fail declined order");
            }
        }
    }

    /// Fail pending orders older than `timeout_ms` (expiry worker)
    ///
    /// Returns the number of orders moved to FAILED. Version races are
    /// skipped silently: someone else just transitioned the order.
    pub fn fail_stale_pending(&self, timeout_ms: u64) -> Result<usize, AppError> {
        let cutoff = now_millis() - timeout_ms as i64;
        let stale = self.store.list_stale_pending(cutoff)?;
        let mut failed = 0;

        for record in stale {
            match self.store.apply_transition(
                &record.restaurant_id,
                &record.id,
                record.version,
                OrderStatus::Failed,
                Some("Confirmation timeout".to_string()),
            ) {
                Ok((updated, from)) => {
                    tracing::info!(
                        restaurant_id = %updated.restaurant_id,
                        order_id = %updated.id,
                        "Order failed: confirmation timeout"
                    );
                    self.notifier
                        .publish(TransitionEvent::transitioned(&updated, from));
                    failed += 1;
                }
                Err(super::store::StoreError::VersionConflict { .. }) => {}
                Err(e) => {
                    tracing::error!(order_id = %record.id, error = %e, "Expiry sweep failed for order");
                }
            }
        }
        Ok(failed)
    }

    /// The notifier (subscription endpoint)
    pub fn notifier(&self) -> &Arc<TransitionNotifier> {
        &self.notifier
    }
}

impl std::fmt::Debug for OrderService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderService").finish()
    }
}
