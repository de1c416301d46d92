//! Request handlers for `/api/medicines`

use super::response::ApiError;
use super::AppState;
use crate::models::{MedicationPayload, MedicationRecord, NewMedication};
use crate::store::InsertOutcome;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

pub const ADDED_MESSAGE: &str = "Medicine added!";
pub const DUPLICATE_MESSAGE: &str = "Medicine already exists. Ignored.";

/// Body of a successful insert
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedResponse {
    pub message: String,
    pub id: i64,
}

/// `GET /api/medicines`
pub async fn list_medicines(
    State(state): State<AppState>,
) -> Result<Json<Vec<MedicationRecord>>, ApiError> {
    let records = state.store.list_all().await.map_err(|e| {
        warn!(route = "/api/medicines", "List failed: {}", e);
        ApiError::from(e)
    })?;
    info!(route = "/api/medicines", count = records.len(), "Listed medicines");
    Ok(Json(records))
}

/// `POST /api/medicines`
pub async fn create_medicine(
    State(state): State<AppState>,
    payload: Result<Json<MedicationPayload>, JsonRejection>,
) -> Result<Json<CreatedResponse>, ApiError> {
    let Json(payload) = payload?;
    let medication = NewMedication::try_from(payload)?;

    match state.store.insert_if_absent(&medication).await {
        Ok(InsertOutcome::Inserted { id }) => {
            info!(route = "/api/medicines", id, name = %medication.name, "Medicine added");
            Ok(Json(CreatedResponse {
                message: ADDED_MESSAGE.to_string(),
                id,
            }))
        }
        Ok(InsertOutcome::Duplicate) => {
            info!(route = "/api/medicines", name = %medication.name, "Duplicate ignored");
            Err(ApiError::Conflict(DUPLICATE_MESSAGE.to_string()))
        }
        Err(e) => {
            warn!(route = "/api/medicines", "Insert failed: {}", e);
            Err(e.into())
        }
    }
}
