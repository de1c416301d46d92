//! MySQL backend

use super::{InsertOutcome, MedicineStore, MYSQL_SCHEMA_SQL};
use crate::config::{Backend, DatabaseConfig};
use crate::error::{Error, Result};
use crate::models::{MedicationRecord, NewMedication};
use async_trait::async_trait;
use sqlx::mysql::{MySqlConnectOptions, MySqlPool, MySqlPoolOptions};
use tracing::{debug, info};

// Columns are cast so ids decode as i64 and percentages as f64 whatever the table declares.
const SELECT_ALL: &str = r#"
    SELECT CAST(id AS SIGNED) AS id, name, composition, uses, side_effects,
           manufacturer, image_url,
           CAST(COALESCE(excellent_review_percent, 0) AS DOUBLE) AS excellent_review_percent,
           CAST(COALESCE(average_review_percent, 0) AS DOUBLE) AS average_review_percent,
           CAST(COALESCE(poor_review_percent, 0) AS DOUBLE) AS poor_review_percent
    FROM medicines
"#;

/// MySQL record store handle
#[derive(Clone)]
pub struct MySqlStore {
    pool: MySqlPool,
}

impl MySqlStore {
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let host = config
            .host
            .as_deref()
            .ok_or_else(|| Error::Config("DB_HOST is required for MySQL".to_string()))?;

        let options = MySqlConnectOptions::new()
            .host(host)
            .port(config.port)
            .username(&config.user)
            .password(&config.password)
            .database(&config.name);

        debug!(
            "Connecting to MySQL at {}:{} as {} (database {})",
            host, config.port, config.user, config.name
        );

        let pool = MySqlPoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(options)
            .await?;

        Ok(Self { pool })
    }
}

#[async_trait]
impl MedicineStore for MySqlStore {
    async fn init_schema(&self) -> Result<()> {
        info!("Initializing database schema");
        sqlx::query(MYSQL_SCHEMA_SQL).execute(&self.pool).await?;
        Ok(())
    }

    async fn insert_if_absent(&self, med: &NewMedication) -> Result<InsertOutcome> {
        let result = sqlx::query(
            r#"
            INSERT IGNORE INTO medicines
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
            id: result.last_insert_id() as i64,
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
        Backend::MySql
    }
}
