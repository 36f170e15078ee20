//! Weather Routes

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use storage::{RecordId, StoredRecord, WeatherRequest};

use crate::error::ServiceError;
use crate::AppState;

/// Response for the create endpoint
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateResponse {
    pub id: RecordId,
}

/// Record a weather lookup
pub async fn create_weather(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<WeatherRequest>, JsonRejection>,
) -> Result<Json<CreateResponse>, ServiceError> {
    let Json(request) = payload?;
    let id = state.service.create(request).await?;
    Ok(Json(CreateResponse { id }))
}

/// Fetch a stored lookup by id
pub async fn get_weather(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<StoredRecord>, ServiceError> {
    let record = state.service.get(&RecordId::from(id))?;
    Ok(Json(record))
}
