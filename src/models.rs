//! Medication record types shared by the store, loader, API and lookup client.

use crate::error::{Error, Result};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;

/// A stored medication row
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct MedicationRecord {
    pub id: i64,
    pub name: String,
    pub composition: Option<String>,
    pub uses: Option<String>,
    pub side_effects: Option<String>,
    pub manufacturer: Option<String>,
    pub image_url: Option<String>,
    #[serde(default)]
    pub excellent_review_percent: f64,
    #[serde(default)]
    pub average_review_percent: f64,
    #[serde(default)]
    pub poor_review_percent: f64,
}

/// A validated record ready for insertion. The store assigns the id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewMedication {
    pub name: String,
    pub composition: Option<String>,
    pub uses: Option<String>,
    pub side_effects: Option<String>,
    pub manufacturer: Option<String>,
    pub image_url: Option<String>,
    pub excellent_review_percent: f64,
    pub average_review_percent: f64,
    pub poor_review_percent: f64,
}

/// Body of `POST /api/medicines`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MedicationPayload {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub composition: Option<String>,
    #[serde(default)]
    pub uses: Option<String>,
    #[serde(default)]
    pub side_effects: Option<String>,
    #[serde(default)]
    pub manufacturer: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default, deserialize_with = "lenient_percent")]
    pub excellent_review_percent: Option<f64>,
    #[serde(default, deserialize_with = "lenient_percent")]
    pub average_review_percent: Option<f64>,
    #[serde(default, deserialize_with = "lenient_percent")]
    pub poor_review_percent: Option<f64>,
}

/// One object of the startup dataset, keyed by its external column names
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DatasetEntry {
    #[serde(rename = "Medicine Name", default)]
    pub name: Option<String>,
    #[serde(rename = "Composition", default)]
    pub composition: Option<String>,
    #[serde(rename = "Uses", default)]
    pub uses: Option<String>,
    #[serde(rename = "Side_effects", default)]
    pub side_effects: Option<String>,
    #[serde(rename = "Manufacturer", default)]
    pub manufacturer: Option<String>,
    #[serde(rename = "Image URL", default)]
    pub image_url: Option<String>,
    #[serde(rename = "Excellent Review %", default, deserialize_with = "lenient_percent")]
    pub excellent_review_percent: Option<f64>,
    #[serde(rename = "Average Review %", default, deserialize_with = "lenient_percent")]
    pub average_review_percent: Option<f64>,
    #[serde(rename = "Poor Review %", default, deserialize_with = "lenient_percent")]
    pub poor_review_percent: Option<f64>,
}

/// Returns the trimmed name when it is present and non-blank
pub fn usable_name(name: Option<&str>) -> Option<&str> {
    name.map(str::trim).filter(|n| !n.is_empty())
}

impl NewMedication {
    /// Build a record from loose optional fields. Absent percentages become 0.
    #[allow(clippy::too_many_arguments)]
    fn build(
        name: Option<&str>,
        composition: Option<String>,
        uses: Option<String>,
        side_effects: Option<String>,
        manufacturer: Option<String>,
        image_url: Option<String>,
        excellent: Option<f64>,
        average: Option<f64>,
        poor: Option<f64>,
    ) -> Result<Self> {
        let name = usable_name(name)
            .ok_or_else(|| Error::Validation("Medicine name is required.".to_string()))?;

        Ok(Self {
            name: name.to_string(),
            composition,
            uses,
            side_effects,
            manufacturer,
            image_url,
            excellent_review_percent: excellent.unwrap_or(0.0),
            average_review_percent: average.unwrap_or(0.0),
            poor_review_percent: poor.unwrap_or(0.0),
        })
    }
}

impl TryFrom<MedicationPayload> for NewMedication {
    type Error = Error;

    fn try_from(p: MedicationPayload) -> Result<Self> {
        NewMedication::build(
            p.name.as_deref(),
            p.composition,
            p.uses,
            p.side_effects,
            p.manufacturer,
            p.image_url,
            p.excellent_review_percent,
            p.average_review_percent,
            p.poor_review_percent,
        )
    }
}

impl TryFrom<DatasetEntry> for NewMedication {
    type Error = Error;

    fn try_from(e: DatasetEntry) -> Result<Self> {
        NewMedication::build(
            e.name.as_deref(),
            e.composition,
            e.uses,
            e.side_effects,
            e.manufacturer,
            e.image_url,
            e.excellent_review_percent,
            e.average_review_percent,
            e.poor_review_percent,
        )
    }
}

/// Accept numbers, numeric strings and null for a percentage. Values are kept as given.
fn lenient_percent<'de, D>(deserializer: D) -> std::result::Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error as _;

    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    match value {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::Number(n)) => n
            .as_f64()
            .map(Some)
            .ok_or_else(|| D::Error::custom(format!("invalid percentage: {}", n))),
        Some(serde_json::Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(serde_json::Value::String(s)) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|f| f.is_finite())
            .map(Some)
            .ok_or_else(|| D::Error::custom(format!("invalid percentage: {:?}", s))),
        Some(other) => Err(D::Error::custom(format!(
            "invalid percentage: {}",
            other
        ))),
    }
}
