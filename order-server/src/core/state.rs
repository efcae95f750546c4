//! Shared server state

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::auth::JwtService;
use crate::catalog::CatalogService;
use crate::core::Config;
use crate::orders::{ExpiryWorker, OrderService, OrderStore, TransitionNotifier};
use crate::payments::{HttpPaymentGateway, PaymentGateway, StaticPaymentGateway};
use crate::utils::AppResult;

/// Server state - holds shared references to every service
///
/// Cloning is shallow (`Arc` fields), so handlers receive it by value.
///
/// | Field | Purpose |
/// |-------|---------|
/// | config | Immutable configuration |
/// | jwt_service | Actor token verification |
/// | catalog | Read-only menu cache |
/// | store | Order persistence gateway (redb) |
/// | notifier | Per-restaurant transition broadcast |
/// | orders | Lifecycle orchestration |
#[derive(Clone)]
pub struct ServerState {
    /// Server configuration
    pub config: Config,
    /// JWT verification service
    pub jwt_service: Arc<JwtService>,
    /// Menu catalog cache
    pub catalog: Arc<CatalogService>,
    /// Order persistence gateway
    pub store: Arc<OrderStore>,
    /// Per-restaurant transition broadcast
    pub notifier: Arc<TransitionNotifier>,
    /// Order lifecycle service
    pub orders: Arc<OrderService>,
    /// Shutdown token for background workers
    shutdown: CancellationToken,
}

impl ServerState {
    /// Initialize all services from configuration
    ///
    /// Opens (or creates) the order database under `work_dir` and wires
    /// the lifecycle service together. The payment gateway is the HTTP
    /// implementation when `PAYMENT_GATEWAY_URL` is configured, and the
    /// static development gateway otherwise.
    pub fn initialize(config: &Config) -> AppResult<Self> {
        std::fs::create_dir_all(&config.work_dir)
            .map_err(|e| shared::AppError::internal(format!("Failed to create work dir: {e}")))?;

        let store = Arc::new(OrderStore::open(config.database_path())?);
        Self::with_store(config, store)
    }

    /// Build state around an existing store (tests use the in-memory store)
    pub fn with_store(config: &Config, store: Arc<OrderStore>) -> AppResult<Self> {
        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));
        let catalog = Arc::new(CatalogService::new());
        let notifier = Arc::new(TransitionNotifier::new());

        let payments: Arc<dyn PaymentGateway> = match &config.payment_gateway_url {
            Some(url) => Arc::new(HttpPaymentGateway::new(
                url.clone(),
                config.payment_timeout_ms,
                config.payment_retries,
            )?),
            None => {
                tracing::warn!("PAYMENT_GATEWAY_URL not set, using static payment gateway");
                Arc::new(StaticPaymentGateway::approve_all())
            }
        };

        let orders = Arc::new(OrderService::new(
            store.clone(),
            catalog.clone(),
            notifier.clone(),
            payments,
        ));

        Ok(Self {
            config: config.clone(),
            jwt_service,
            catalog,
            store,
            notifier,
            orders,
            shutdown: CancellationToken::new(),
        })
    }

    /// Spawn background workers
    ///
    /// Must be called before `Server::run` serves traffic. Currently:
    /// the pending-order expiry worker.
    pub fn start_background_tasks(&self) {
        let worker = ExpiryWorker::new(
            self.orders.clone(),
            self.config.pending_timeout_ms,
            self.config.expiry_sweep_interval_ms,
            self.shutdown.clone(),
        );
        tokio::spawn(worker.run());
    }

    /// Get the JWT service
    pub fn get_jwt_service(&self) -> Arc<JwtService> {
        self.jwt_service.clone()
    }

    /// Signal background workers to stop
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }

    /// Shutdown token (for workers and tests)
    pub fn shutdown_token(&self) -> &CancellationToken {
        &self.shutdown
    }
}

impl std::fmt::Debug for ServerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerState")
            .field("environment", &self.config.environment)
            .field("http_port", &self.config.http_port)
            .finish()
    }
}
