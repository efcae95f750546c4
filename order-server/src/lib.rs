//! Order lifecycle server
//!
//! Multi-tenant order lifecycle manager for restaurant POS, kiosk,
//! voice and delivery channels.
//!
//! # Module structure
//!
//! ```text
//! order-server/src/
//! ├── core/       # config, state, HTTP server
//! ├── auth/       # JWT actor verification
//! ├── tenant/     # tenant context resolution
//! ├── catalog/    # read-only menu cache
//! ├── payments/   # upstream payment-gateway boundary
//! ├── orders/     # validator, state machine, store, notifier
//! ├── api/        # HTTP routes and handlers
//! └── utils/      # logging, validation helpers
//! ```
//!
//! # Order flow
//!
//! ```text
//! Submission ─▶ TenantResolver ─▶ OrderValidator ─▶ OrderStore (PENDING)
//!                                                        │
//! Status update ─▶ transition guards ─▶ OrderStore ──────┤
//!                                                        ▼
//!                                              TransitionNotifier
//!                                        (per-restaurant broadcast)
//! ```

pub mod api;
pub mod auth;
pub mod catalog;
pub mod core;
pub mod orders;
pub mod payments;
pub mod tenant;
pub mod utils;

// Re-export public types
pub use auth::{CurrentActor, JwtService};
pub use core::{Config, Server, ServerState};
pub use orders::{OrderService, OrderStore, TransitionNotifier};
pub use tenant::TenantContext;
pub use utils::{AppError, AppResult};

// Re-export unified error types from shared
pub use shared::error::ErrorCode;
pub use shared::response::ApiResponse;

// Security logging macro - tracing with a dedicated target
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}
