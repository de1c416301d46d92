//! Load command implementation

use crate::config::Config;
use crate::error::Result;
use crate::loader::{BulkLoader, LoadReport};
use crate::store;

/// Connect to the store and run the bulk loader once
pub async fn cmd_load(config: &Config) -> Result<LoadReport> {
    let store = store::connect(&config.database).await?;
    BulkLoader::new(store)
        .load_file(&config.loader.data_path)
        .await
}

/// Print load report in human-readable format
pub fn print_load_report(report: &LoadReport) {
    println!("✓ Load complete");
    println!("  Inserted (new): {}/{}", report.inserted, report.attempted);
    println!("  Already present: {}", report.duplicates);
    println!("  Skipped (no name): {}", report.skipped);
    if report.failed > 0 {
        println!("  Failed: {}", report.failed);
        for err in &report.errors {
            println!("    - {}", err);
        }
    }
}
