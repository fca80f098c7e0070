//! Record store for care-flow.

mod schema;
mod patients;
mod clinical;
mod invoices;
mod inventory;
mod services;

pub use schema::*;
#[allow(unused_imports)]
pub use patients::*;
#[allow(unused_imports)]
pub use clinical::*;
#[allow(unused_imports)]
pub use invoices::*;
#[allow(unused_imports)]
pub use inventory::*;
#[allow(unused_imports)]
pub use services::*;

use std::path::Path;
use std::time::Duration;

use rusqlite::{Connection, Transaction, TransactionBehavior};
use thiserror::Error;

use crate::config::StoreConfig;

/// Database errors.
#[derive(Error, Debug)]
pub enum DbError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Constraint violation: {0}")]
    Constraint(String),
}

pub type DbResult<T> = Result<T, DbError>;

/// Database connection wrapper.
///
/// One `Database` owns one connection. Several `Database` handles may point at the
/// same file; cross-connection safety comes from [`Database::write_transaction`].
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open database at path with default store settings, creating if needed.
    pub fn open<P: AsRef<Path>>(path: P) -> DbResult<Self> {
        Self::open_with(path, &StoreConfig::default())
    }

    /// Open database at path with explicit store settings.
    pub fn open_with<P: AsRef<Path>>(path: P, config: &StoreConfig) -> DbResult<Self> {
        let conn = Connection::open(path)?;
        conn.busy_timeout(Duration::from_millis(config.busy_timeout_ms))?;
        let db = Self { conn };
        db.initialize()?;
        Ok(db)
    }

    /// Create in-memory database (for testing).
    pub fn open_in_memory() -> DbResult<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.initialize()?;
        Ok(db)
    }

    /// Initialize schema.
    fn initialize(&self) -> DbResult<()> {
        self.conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    /// Get raw connection (for advanced queries).
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Begin a write transaction that takes the database write lock up front.
    ///
    /// Every `Database` method issued while the returned guard is alive runs inside
    /// it. Dropping the guard without `commit()` rolls everything back.
    pub fn write_transaction(&self) -> DbResult<Transaction<'_>> {
        Ok(Transaction::new_unchecked(
            &self.conn,
            TransactionBehavior::Immediate,
        )?)
    }
}
