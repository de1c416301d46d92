//! Embedded SQLite backend

use super::{InsertOutcome, MedicineStore, SQLITE_SCHEMA_SQL};
use crate::config::Backend;
use crate::error::Result;
use crate::models::{MedicationRecord, NewMedication};
use async_trait::async_trait;
use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteSynchronous,
};
use std::path::Path;
use tracing::{debug, info};

const SELECT_ALL: &str = r#"
    SELECT id, name, composition, uses, side_effects, manufacturer, image_url,
           CAST(COALESCE(excellent_review_percent, 0) AS REAL) AS excellent_review_percent,
           CAST(COALESCE(average_review_percent, 0) AS REAL) AS average_review_percent,
           CAST(COALESCE(poor_review_percent, 0) AS REAL) AS poor_review_percent
    FROM medicines
"#;

/// SQLite record store handle
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (creating if missing) the database file at `db_path`
    pub async fn connect(db_path: &Path, max_connections: u32) -> Result<Self> {
        // Create parent directory if needed
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let options = SqliteConnectOptions::new()
            .filename(db_path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal);

        debug!("Connecting to SQLite database at {:?}", db_path);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;

        Ok(Self { pool })
    }

    /// Open the database and create the table if needed
    pub async fn new(db_path: &Path) -> Result<Self> {
        let store = Self::connect(db_path, crate::config::default_db_max_connections()).await?;
        store.init_schema().await?;
        Ok(store)
    }
}

#[async_trait]
impl MedicineStore for SqliteStore {
    async fn init_schema(&self) -> Result<()> {
        info!("Initializing database schema");
        sqlx::query(SQLITE_SCHEMA_SQL).execute(&self.pool).await?;
        Ok(())
    }

    async fn insert_if_absent(&self, med: &NewMedication) -> Result<InsertOutcome> {
        let result = sqlx::query(
            r#"
            INSERT OR IGNORE INTO medicines
            (name, composition, uses, side_effects, manufacturer, image_url,
             excellent_review_percent, average_review_percent, poor_review_percent)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&med.name)
        .bind(&med.composition)
        .bind(&med.uses)
        .bind(&med.side_effects)
        .bind(&med.manufacturer)
        .bind(&med.image_url)
        .bind(med.excellent_review_percent)
        .bind(med.average_review_percent)
        .bind(med.poor_review_percent)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(InsertOutcome::Duplicate);
        }
        Ok(InsertOutcome::Inserted {
            id: result.last_insert_rowid(),
        })
    }

    async fn list_all(&self) -> Result<Vec<MedicationRecord>> {
        let records = sqlx::query_as::<_, MedicationRecord>(SELECT_ALL)
            .fetch_all(&self.pool)
            .await?;
        Ok(records)
    }

    async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM medicines")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    fn backend(&self) -> Backend {
        Backend::Sqlite
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn setup_test_db() -> (SqliteStore, TempDir) {
        let tmp = TempDir::new().unwrap();
        let store = SqliteStore::new(&tmp.path().join("test.db")).await.unwrap();
        (store, tmp)
    }

    fn medication(name: &str) -> NewMedication {
        NewMedication {
            name: name.to_string(),
            composition: None,
            uses: None,
            side_effects: None,
            manufacturer: None,
            image_url: None,
            excellent_review_percent: 0.0,
            average_review_percent: 0.0,
            poor_review_percent: 0.0,
        }
    }

    #[tokio::test]
    async fn test_insert_and_list() {
        let (store, _tmp) = setup_test_db().await;

        let mut med = medication("Amoxicillin");
        med.composition = Some("Amoxicillin 250mg".to_string());
        med.excellent_review_percent = 60.5;

        let outcome = store.insert_if_absent(&med).await.unwrap();
        let InsertOutcome::Inserted { id } = outcome else {
            panic!("expected insert, got {:?}", outcome);
        };

        let records = store.list_all().await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, id);
        assert_eq!(records[0].name, "Amoxicillin");
        assert_eq!(records[0].composition.as_deref(), Some("Amoxicillin 250mg"));
        assert_eq!(records[0].uses, None);
        assert_eq!(records[0].excellent_review_percent, 60.5);
        assert_eq!(records[0].poor_review_percent, 0.0);
    }

    #[tokio::test]
    async fn test_duplicate_is_not_an_error() {
        let (store, _tmp) = setup_test_db().await;

        assert!(store
            .insert_if_absent(&medication("Aspirin"))
            .await
            .unwrap()
            .is_inserted());

        let mut again = medication("Aspirin");
        again.composition = Some("changed".to_string());
        assert_eq!(
            store.insert_if_absent(&again).await.unwrap(),
            InsertOutcome::Duplicate
        );

        let records = store.list_all().await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].composition, None);
    }

    #[tokio::test]
    async fn test_uniqueness_is_case_sensitive() {
        let (store, _tmp) = setup_test_db().await;

        assert!(store.insert_if_absent(&medication("Aspirin")).await.unwrap().is_inserted());
        assert!(store.insert_if_absent(&medication("aspirin")).await.unwrap().is_inserted());
        assert_eq!(store.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_ids_are_distinct() {
        let (store, _tmp) = setup_test_db().await;

        let a = store.insert_if_absent(&medication("A")).await.unwrap();
        let b = store.insert_if_absent(&medication("B")).await.unwrap();
        assert_ne!(a, b);
    }
}
