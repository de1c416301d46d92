//! Bulk loader
//!
//! Reconciles a JSON dataset into the record store. Entries without a usable
//! name are dropped, the rest are inserted concurrently with insert-if-absent
//! semantics, so running the loader again over the same file changes nothing.
//! An entry that fails to convert is counted as failed on its own; only an
//! unreadable file or a top level that is not an array aborts the run.

use crate::error::{Error, Result};
use crate::models::{usable_name, DatasetEntry, NewMedication};
use crate::store::{InsertOutcome, MedicineStore};
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Outcome of one loader run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadReport {
    /// Entries with a usable name
    pub attempted: usize,
    /// Rows newly written to the store
    pub inserted: usize,
    /// Entries whose name was already present
    pub duplicates: usize,
    /// Entries that failed to convert or insert
    pub failed: usize,
    /// Entries dropped for a missing or blank name
    pub skipped: usize,
    pub errors: Vec<String>,
}

impl LoadReport {
    fn record(&mut self, name: &str, result: Result<InsertOutcome>) {
        match result {
            Ok(InsertOutcome::Inserted { id }) => {
                debug!(name, id, "Inserted medication");
                self.inserted += 1;
            }
            Ok(InsertOutcome::Duplicate) => self.duplicates += 1,
            Err(e) => {
                warn!(name, "Failed to load medication: {}", e);
                self.failed += 1;
                self.errors.push(format!("{}: {}", name, e));
            }
        }
    }

    /// Every attempted entry resolved exactly once
    pub fn is_drained(&self) -> bool {
        self.inserted + self.duplicates + self.failed == self.attempted
    }
}

/// Dataset key holding the medication name
const NAME_KEY: &str = "Medicine Name";

/// Read and parse the dataset file
pub fn load_dataset(path: &Path) -> Result<Vec<Value>> {
    let raw = std::fs::read_to_string(path).map_err(|e| {
        Error::Dataset(format!("Failed to read {}: {}", path.display(), e))
    })?;
    parse_dataset(&raw)
        .map_err(|e| Error::Dataset(format!("Failed to parse {}: {}", path.display(), e)))
}

/// Parse a dataset held in memory into its raw entries.
///
/// Only the top level is checked here; each entry is converted when loaded.
pub fn parse_dataset(raw: &str) -> Result<Vec<Value>> {
    Ok(serde_json::from_str(raw)?)
}

/// Convert one raw dataset entry
fn convert_entry(raw: Value) -> Result<NewMedication> {
    let entry: DatasetEntry = serde_json::from_value(raw)?;
    NewMedication::try_from(entry)
}

/// Bulk loader bound to one store
pub struct BulkLoader {
    store: Arc<dyn MedicineStore>,
}

impl BulkLoader {
    pub fn new(store: Arc<dyn MedicineStore>) -> Self {
        Self { store }
    }

    /// Load the dataset at `path`
    pub async fn load_file(&self, path: &Path) -> Result<LoadReport> {
        info!("Loading medicines from {}", path.display());
        let entries = load_dataset(path)?;
        Ok(self.load_entries(entries).await)
    }

    /// Insert every entry with a usable name.
    ///
    /// Inserts run concurrently and may finish in any order; the report is
    /// aggregated only after all of them resolve. When a name repeats inside
    /// the batch the first occurrence is the one sent to the store.
    pub async fn load_entries(&self, entries: Vec<Value>) -> LoadReport {
        let mut report = LoadReport::default();
        let mut seen = HashSet::new();
        let mut batch = Vec::new();

        for raw in entries {
            let Some(name) = usable_name(raw.get(NAME_KEY).and_then(Value::as_str))
                .map(str::to_string)
            else {
                report.skipped += 1;
                continue;
            };
            report.attempted += 1;

            let medication = match convert_entry(raw) {
                Ok(m) => m,
                Err(e) => {
                    report.record(&name, Err(e));
                    continue;
                }
            };

            if seen.insert(medication.name.clone()) {
                batch.push(medication);
            } else {
                debug!(name = %medication.name, "Repeated name in dataset");
                report.duplicates += 1;
            }
        }

        let store = &self.store;
        let results = join_all(batch.iter().map(|med| store.insert_if_absent(med))).await;

        for (med, result) in batch.iter().zip(results) {
            report.record(&med.name, result);
        }

        debug_assert!(report.is_drained());
        info!(
            "Total inserted (new) records: {}/{}",
            report.inserted, report.attempted
        );
        if report.skipped > 0 {
            debug!("Skipped {} entries without a name", report.skipped);
        }

        report
    }
}

/// Run the loader and log, rather than return, a dataset fault
pub async fn run_startup_load(store: Arc<dyn MedicineStore>, path: &Path) -> Option<LoadReport> {
    match BulkLoader::new(store).load_file(path).await {
        Ok(report) => Some(report),
        Err(e) => {
            tracing::error!("Bulk load aborted: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::SqliteStore;
    use tempfile::TempDir;

    async fn setup_store() -> (Arc<dyn MedicineStore>, TempDir) {
        let tmp = TempDir::new().unwrap();
        let store = SqliteStore::new(&tmp.path().join("test.db")).await.unwrap();
        (Arc::new(store), tmp)
    }

    const SCENARIO: &str = r#"[
        {"Medicine Name": "Paracetamol", "Composition": "Paracetamol 500mg"},
        {"Medicine Name": ""},
        {"Medicine Name": "Paracetamol", "Composition": "dup"}
    ]"#;

    #[tokio::test]
    async fn test_blank_names_skipped_and_first_occurrence_wins() {
        let (store, _tmp) = setup_store().await;
        let loader = BulkLoader::new(store.clone());

        let report = loader.load_entries(parse_dataset(SCENARIO).unwrap()).await;
        assert_eq!(report.attempted, 2);
        assert_eq!(report.inserted, 1);
        assert_eq!(report.duplicates, 1);
        assert_eq!(report.skipped, 1);
        assert!(report.is_drained());

        let records = store.list_all().await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].composition.as_deref(), Some("Paracetamol 500mg"));
    }

    #[tokio::test]
    async fn test_second_run_is_idempotent() {
        let (store, tmp) = setup_store().await;
        let path = tmp.path().join("medicines.json");
        std::fs::write(
            &path,
            r#"[
                {"Medicine Name": "Aspirin", "Excellent Review %": 40, "Poor Review %": 10},
                {"Medicine Name": "Ibuprofen", "Uses": "Pain"},
                {"Medicine Name": "   "},
                {"Composition": "no name at all"}
            ]"#,
        )
        .unwrap();

        let loader = BulkLoader::new(store.clone());
        let first = loader.load_file(&path).await.unwrap();
        assert_eq!(first.attempted, 2);
        assert_eq!(first.inserted, 2);
        assert_eq!(first.skipped, 2);
        let mut before = store.list_all().await.unwrap();

        let second = loader.load_file(&path).await.unwrap();
        assert_eq!(second.attempted, 2);
        assert_eq!(second.inserted, 0);
        assert_eq!(second.duplicates, 2);
        let mut after = store.list_all().await.unwrap();

        before.sort_by_key(|r| r.id);
        after.sort_by_key(|r| r.id);
        assert_eq!(before, after);
    }

    #[tokio::test]
    async fn test_empty_dataset() {
        let (store, _tmp) = setup_store().await;
        let report = BulkLoader::new(store).load_entries(Vec::new()).await;
        assert_eq!(report, LoadReport::default());
        assert!(report.is_drained());
    }

    #[tokio::test]
    async fn test_many_concurrent_inserts_are_all_counted() {
        let (store, _tmp) = setup_store().await;
        let entries: Vec<Value> = (0..200)
            .map(|i| serde_json::json!({ "Medicine Name": format!("Medicine {}", i) }))
            .collect();

        let report = BulkLoader::new(store.clone()).load_entries(entries).await;
        assert_eq!(report.attempted, 200);
        assert_eq!(report.inserted, 200);
        assert_eq!(store.count().await.unwrap(), 200);
    }

    #[tokio::test]
    async fn test_missing_and_malformed_files_are_dataset_faults() {
        let (store, tmp) = setup_store().await;
        let loader = BulkLoader::new(store.clone());

        let missing = loader.load_file(&tmp.path().join("nope.json")).await;
        assert!(matches!(missing, Err(Error::Dataset(_))));

        let bad = tmp.path().join("bad.json");
        std::fs::write(&bad, "{ not json").unwrap();
        assert!(matches!(loader.load_file(&bad).await, Err(Error::Dataset(_))));

        let not_array = tmp.path().join("object.json");
        std::fs::write(&not_array, r#"{"Medicine Name": "Aspirin"}"#).unwrap();
        assert!(matches!(loader.load_file(&not_array).await, Err(Error::Dataset(_))));

        assert!(run_startup_load(store.clone(), &bad).await.is_none());
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_bad_entry_fails_alone() {
        let (store, tmp) = setup_store().await;
        let path = tmp.path().join("medicines.json");
        std::fs::write(
            &path,
            r#"[
                {"Medicine Name": "Good", "Excellent Review %": 12.5},
                {"Medicine Name": "Bad", "Excellent Review %": "N/A"},
                {"Medicine Name": "Odd", "Uses": 42}
            ]"#,
        )
        .unwrap();

        let report = BulkLoader::new(store.clone()).load_file(&path).await.unwrap();
        assert_eq!(report.attempted, 3);
        assert_eq!(report.inserted, 1);
        assert_eq!(report.failed, 2);
        assert!(report.is_drained());
        assert!(report.errors[0].starts_with("Bad: "));
        assert!(report.errors[1].starts_with("Odd: "));

        let records = store.list_all().await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "Good");
        assert_eq!(records[0].excellent_review_percent, 12.5);
    }
}
