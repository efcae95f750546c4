//! redb-based persistence gateway
//!
//! # Tables
//!
//! | Table | Key | Value | Purpose |
//! |-------|-----|-------|---------|
//! | `orders` | `order_id` | `OrderRecord` (JSON) | The order + its line items |
//! | `active_orders` | `(restaurant_id, order_id)` | `()` | Board index, terminal orders drop out |
//! | `order_counters` | `restaurant_id:yyyymmdd` | `u64` | Human-readable order numbers |
//!
//! # Concurrency
//!
//! redb gives a single writer with serializable write transactions.
//! `apply_transition` re-reads the record inside its write transaction,
//! so the optimistic version check and the legality recheck against the
//! stored status are atomic with the write: at most one transition
//! commits per version, losers get `VersionConflict`.
//!
//! # Durability
//!
//! Commits are persistent once `commit()` returns (copy-on-write with
//! atomic pointer swap), so a power cut never leaves a half-written
//! order.

use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};
use shared::AppError;
use shared::order::{OrderRecord, OrderStatus};
use shared::util::now_millis;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// key = order_id, value = JSON-serialized OrderRecord
const ORDERS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("orders");

/// key = (restaurant_id, order_id), value = empty (board membership)
const ACTIVE_ORDERS_TABLE: TableDefinition<(&str, &str), ()> =
    TableDefinition::new("active_orders");

/// key = "restaurant_id:yyyymmdd", value = per-day counter
const COUNTERS_TABLE: TableDefinition<&str, u64> = TableDefinition::new("order_counters");

/// Upper bound for ranging all of one restaurant's index entries
const MAX_KEY: &str = "\u{10ffff}";

/// Storage errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Order not found: {0}")]
    OrderNotFound(String),

    #[error("Duplicate order id: {0}")]
    DuplicateOrder(String),

    #[error("Version conflict: expected {expected}, stored {actual}")]
    VersionConflict { expected: u64, actual: u64 },

    #[error("Illegal transition: {from} -> {to}")]
    IllegalTransition { from: OrderStatus, to: OrderStatus },
}

pub type StoreResult<T> = Result<T, StoreError>;

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::OrderNotFound(id) => AppError::order_not_found(&id),
            StoreError::VersionConflict { expected, actual } => {
                AppError::concurrent_modification(expected, actual)
            }
            StoreError::IllegalTransition { from, to } => {
                AppError::invalid_transition(from.as_str(), to.as_str())
            }
            other => {
                tracing::error!(error = %other, "Store operation failed");
                AppError::storage(other.to_string())
            }
        }
    }
}

/// Order store backed by redb
#[derive(Clone)]
pub struct OrderStore {
    db: Arc<Database>,
}

impl OrderStore {
    /// Open or create the database at the given path
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let db = Database::create(path)?;
        let store = Self { db: Arc::new(db) };
        store.init_tables()?;
        Ok(store)
    }

    /// Open an in-memory database (tests, ephemeral dev)
    pub fn open_in_memory() -> StoreResult<Self> {
        let db = Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;
        let store = Self { db: Arc::new(db) };
        store.init_tables()?;
        Ok(store)
    }

    fn init_tables(&self) -> StoreResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let _ = write_txn.open_table(ORDERS_TABLE)?;
            let _ = write_txn.open_table(ACTIVE_ORDERS_TABLE)?;
            let _ = write_txn.open_table(COUNTERS_TABLE)?;
        }
        write_txn.commit()?;
        Ok(())
    }

    // ========== Order numbers ==========

    /// Allocate the next human-readable order number for a restaurant
    ///
    /// Runs in its own write transaction; redb does not allow nested
    /// write transactions, so callers allocate the number *before*
    /// opening the creation transaction (a crash in between burns a
    /// number, never reuses one).
    pub fn next_order_number(&self, restaurant_id: &str) -> StoreResult<String> {
        let date_str = chrono::Utc::now().format("%Y%m%d").to_string();
        let key = format!("{restaurant_id}:{date_str}");

        let write_txn = self.db.begin_write()?;
        let count = {
            let mut table = write_txn.open_table(COUNTERS_TABLE)?;
            let current = table.get(key.as_str())?.map(|g| g.value()).unwrap_or(0);
            let next = current + 1;
            table.insert(key.as_str(), next)?;
            next
        };
        write_txn.commit()?;

        Ok(format!("ORD{date_str}-{}", 1000 + count))
    }

    // ========== Creation ==========

    /// Persist a new order and its line items atomically
    pub fn create_order(&self, record: &OrderRecord) -> StoreResult<()> {
        let payload = serde_json::to_vec(record)?;
        let write_txn = self.db.begin_write()?;
        {
            let mut orders = write_txn.open_table(ORDERS_TABLE)?;
            if orders.get(record.id.as_str())?.is_some() {
                return Err(StoreError::DuplicateOrder(record.id.clone()));
            }
            orders.insert(record.id.as_str(), payload.as_slice())?;

            let mut active = write_txn.open_table(ACTIVE_ORDERS_TABLE)?;
            active.insert((record.restaurant_id.as_str(), record.id.as_str()), ())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    // ========== Reads ==========

    /// Fetch an order scoped by restaurant
    ///
    /// An order owned by another restaurant reads as absent, so tenant
    /// probing cannot distinguish "foreign" from "nonexistent".
    pub fn get(&self, restaurant_id: &str, order_id: &str) -> StoreResult<Option<OrderRecord>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ORDERS_TABLE)?;
        let Some(guard) = table.get(order_id)? else {
            return Ok(None);
        };
        let record: OrderRecord = serde_json::from_slice(guard.value())?;
        if record.restaurant_id != restaurant_id {
            return Ok(None);
        }
        Ok(Some(record))
    }

    /// List a restaurant's active (non-terminal) orders
    pub fn list_active(&self, restaurant_id: &str) -> StoreResult<Vec<OrderRecord>> {
        let read_txn = self.db.begin_read()?;
        let active = read_txn.open_table(ACTIVE_ORDERS_TABLE)?;
        let orders = read_txn.open_table(ORDERS_TABLE)?;

        let range_start = (restaurant_id, "");
        let range_end = (restaurant_id, MAX_KEY);
        let mut result = Vec::new();
        for entry in active.range(range_start..=range_end)? {
            let (key, _) = entry?;
            let (_, order_id) = key.value();
            if let Some(guard) = orders.get(order_id)? {
                let record: OrderRecord = serde_json::from_slice(guard.value())?;
                result.push(record);
            }
        }
        // Oldest first, the order kitchens work in
        result.sort_by_key(|r| r.created_at);
        Ok(result)
    }

    /// List pending orders created before `cutoff_millis`, all tenants
    ///
    /// Used by the expiry worker; pending orders are always on the
    /// active index.
    pub fn list_stale_pending(&self, cutoff_millis: i64) -> StoreResult<Vec<OrderRecord>> {
        let read_txn = self.db.begin_read()?;
        let active = read_txn.open_table(ACTIVE_ORDERS_TABLE)?;
        let orders = read_txn.open_table(ORDERS_TABLE)?;

        let mut result = Vec::new();
        for entry in active.iter()? {
            let (key, _) = entry?;
            let (_, order_id) = key.value();
            if let Some(guard) = orders.get(order_id)? {
                let record: OrderRecord = serde_json::from_slice(guard.value())?;
                if record.status == OrderStatus::Pending && record.created_at < cutoff_millis {
                    result.push(record);
                }
            }
        }
        Ok(result)
    }

    // ========== Transitions ==========

    /// Apply a status transition under optimistic concurrency control
    ///
    /// Atomically within one write transaction:
    /// 1. load the record (tenant-scoped; foreign reads as not found)
    /// 2. `expected_version` must equal the stored version
    /// 3. the transition must be legal from the *stored* status
    /// 4. write status, `version + 1`, reason, `updated_at`
    /// 5. drop terminal orders off the active index
    ///
    /// Returns the updated record and the status it transitioned from.
    pub fn apply_transition(
        &self,
        restaurant_id: &str,
        order_id: &str,
        expected_version: u64,
        to: OrderStatus,
        reason: Option<String>,
    ) -> StoreResult<(OrderRecord, OrderStatus)> {
        let write_txn = self.db.begin_write()?;
        let (updated, from) = {
            let mut orders = write_txn.open_table(ORDERS_TABLE)?;

            let mut record: OrderRecord = match orders.get(order_id)? {
                Some(guard) => serde_json::from_slice(guard.value())?,
                None => return Err(StoreError::OrderNotFound(order_id.to_string())),
            };
            if record.restaurant_id != restaurant_id {
                return Err(StoreError::OrderNotFound(order_id.to_string()));
            }

            if record.version != expected_version {
                return Err(StoreError::VersionConflict {
                    expected: expected_version,
                    actual: record.version,
                });
            }

            let from = record.status;
            if !from.can_transition_to(to) {
                return Err(StoreError::IllegalTransition { from, to });
            }

            record.status = to;
            record.version += 1;
            if reason.is_some() {
                record.reason = reason;
            }
            record.updated_at = now_millis();

            let payload = serde_json::to_vec(&record)?;
            orders.insert(order_id, payload.as_slice())?;

            if to.is_terminal() {
                let mut active = write_txn.open_table(ACTIVE_ORDERS_TABLE)?;
                active.remove((restaurant_id, order_id))?;
            }

            (record, from)
        };
        write_txn.commit()?;
        Ok((updated, from))
    }
}

impl std::fmt::Debug for OrderStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderStore").finish()
    }
}
