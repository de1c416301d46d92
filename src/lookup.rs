//! Lookup client
//!
//! Fetches the full record list from the query service and finds the first
//! record whose lowercased name equals the normalized query.

use crate::error::{Error, Result};
use crate::models::MedicationRecord;
use reqwest::Client;
use serde::Serialize;
use std::fmt::Write as _;
use std::time::Duration;
use tracing::debug;
use url::Url;

pub const EMPTY_QUERY_MESSAGE: &str = "Please enter a medicine name.";
pub const NOT_FOUND_MESSAGE: &str = "Medicine not found.";
pub const FAILURE_MESSAGE: &str = "Failed to load data. Please try again.";

/// What a lookup resolved to
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", content = "medicine", rename_all = "snake_case")]
pub enum LookupOutcome {
    EmptyQuery,
    NotFound,
    Found(MedicationRecord),
}

/// Trim and lowercase a query
pub fn normalize_query(query: &str) -> String {
    query.trim().to_lowercase()
}

/// First record whose lowercased name equals the normalized query
pub fn find_by_name<'a>(
    records: &'a [MedicationRecord],
    normalized: &str,
) -> Option<&'a MedicationRecord> {
    records
        .iter()
        .find(|record| record.name.to_lowercase() == normalized)
}

/// HTTP client for the medicines API
pub struct LookupClient {
    client: Client,
    endpoint: Url,
}

impl LookupClient {
    /// `base_url` may carry a path prefix; the endpoint is resolved below it.
    pub fn new(base_url: &str) -> Result<Self> {
        let mut base = Url::parse(base_url)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let endpoint = base.join("api/medicines")?;
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self { client, endpoint })
    }

    /// Fetch every record
    pub async fn fetch_all(&self) -> Result<Vec<MedicationRecord>> {
        debug!("GET {}", self.endpoint);
        let response = self.client.get(self.endpoint.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Lookup(format!(
                "GET {} returned {}: {}",
                self.endpoint, status, body
            )));
        }

        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Resolve `query` against the service. A blank query sends no request.
    pub async fn lookup(&self, query: &str) -> Result<LookupOutcome> {
        let normalized = normalize_query(query);
        if normalized.is_empty() {
            return Ok(LookupOutcome::EmptyQuery);
        }

        let records = self.fetch_all().await?;
        Ok(match find_by_name(&records, &normalized) {
            Some(record) => LookupOutcome::Found(record.clone()),
            None => LookupOutcome::NotFound,
        })
    }
}

fn or_na(value: &Option<String>) -> &str {
    match value.as_deref() {
        Some(v) if !v.is_empty() => v,
        _ => "N/A",
    }
}

/// Render a medication card as plain text
pub fn render_record(record: &MedicationRecord) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", record.name);
    if let Some(url) = record.image_url.as_deref().filter(|u| !u.is_empty()) {
        let _ = writeln!(out, "Image: {}", url);
    }
    let _ = writeln!(out, "Composition: {}", or_na(&record.composition));
    let _ = writeln!(out, "Uses: {}", or_na(&record.uses));
    let _ = writeln!(out, "Side Effects: {}", or_na(&record.side_effects));
    let _ = writeln!(out, "Manufacturer: {}", or_na(&record.manufacturer));
    let _ = writeln!(out, "Reviews:");
    let _ = writeln!(out, "  Excellent: {}%", record.excellent_review_percent);
    let _ = writeln!(out, "  Average: {}%", record.average_review_percent);
    let _ = write!(out, "  Poor: {}%", record.poor_review_percent);
    out
}

/// Render any lookup result, including failures
pub fn render(result: &Result<LookupOutcome>) -> String {
    match result {
        Ok(LookupOutcome::EmptyQuery) => EMPTY_QUERY_MESSAGE.to_string(),
        Ok(LookupOutcome::NotFound) => NOT_FOUND_MESSAGE.to_string(),
        Ok(LookupOutcome::Found(record)) => render_record(record),
        Err(_) => FAILURE_MESSAGE.to_string(),
    }
}
