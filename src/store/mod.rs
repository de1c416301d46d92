//! Record store
//!
//! Durable storage of medication records keyed uniquely by name. Inserts
//! never overwrite: a name collision is reported as [`InsertOutcome::Duplicate`]
//! rather than an error, which keeps bulk loading idempotent.

mod mysql;
mod schema;
mod sqlite;

pub use mysql::MySqlStore;
pub use schema::*;
pub use sqlite::SqliteStore;

use crate::config::{Backend, DatabaseConfig};
use crate::error::Result;
use crate::models::{MedicationRecord, NewMedication};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

/// Result of [`MedicineStore::insert_if_absent`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "lowercase")]
pub enum InsertOutcome {
    Inserted { id: i64 },
    Duplicate,
}

impl InsertOutcome {
    pub fn is_inserted(&self) -> bool {
        matches!(self, InsertOutcome::Inserted { .. })
    }
}

/// Trait for record store backends
#[async_trait]
pub trait MedicineStore: Send + Sync {
    /// Create the table if it does not exist
    async fn init_schema(&self) -> Result<()>;

    /// Insert unless a record with the same name exists
    async fn insert_if_absent(&self, medication: &NewMedication) -> Result<InsertOutcome>;

    /// Every stored record, in no guaranteed order
    async fn list_all(&self) -> Result<Vec<MedicationRecord>>;

    /// Number of stored records
    async fn count(&self) -> Result<i64>;

    fn backend(&self) -> Backend;
}

/// Open the configured backend and make sure the table exists
pub async fn connect(config: &DatabaseConfig) -> Result<Arc<dyn MedicineStore>> {
    let store: Arc<dyn MedicineStore> = match config.backend() {
        Backend::MySql => Arc::new(MySqlStore::connect(config).await?),
        Backend::Sqlite => Arc::new(
            SqliteStore::connect(std::path::Path::new(&config.name), config.max_connections)
                .await?,
        ),
    };

    store.init_schema().await?;
    info!(backend = ?store.backend(), "Connected to record store");
    Ok(store)
}
