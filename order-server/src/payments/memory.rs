//! In-process payment gateway (development and tests)

use super::{PaymentError, PaymentGateway};
use async_trait::async_trait;
use dashmap::DashSet;

/// Static payment gateway holding a set of approved references
///
/// `approve_all` answers yes to everything (development default when no
/// gateway URL is configured).
#[derive(Debug, Default)]
pub struct StaticPaymentGateway {
    approved: DashSet<String>,
    approve_all: bool,
}

impl StaticPaymentGateway {
    /// Gateway that only approves explicitly registered references
    pub fn new() -> Self {
        Self {
            approved: DashSet::new(),
            approve_all: false,
        }
    }

    /// Gateway that approves every reference
    pub fn approve_all() -> Self {
        Self {
            approved: DashSet::new(),
            approve_all: true,
        }
    }

    /// Register an approved authorization reference
    pub fn approve(&self, reference: impl Into<String>) {
        self.approved.insert(reference.into());
    }
}

#[async_trait]
impl PaymentGateway for StaticPaymentGateway {
    async fn verify_authorization(
        &self,
        _restaurant_id: &str,
        _order_id: &str,
        reference: &str,
    ) -> Result<bool, PaymentError> {
        Ok(self.approve_all || self.approved.contains(reference))
    }
}
