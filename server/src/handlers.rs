use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use doodleboard_shared::{CreatedDrawing, DrawingRecord, ErrorBody, NewDrawing};
use thiserror::Error;

use crate::ids::{new_drawing_id, normalize_drawing_id, now_millis};
use crate::logic::{build_record, ValidationError};
use crate::state::AppState;
use crate::storage::StorageError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Drawing not found.")]
    NotFound,
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::BadRequest(_) | ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound | ApiError::Storage(StorageError::NotFound(_)) => {
                StatusCode::NOT_FOUND
            }
            ApiError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let message = match &self {
            ApiError::Storage(StorageError::NotFound(_)) => "Drawing not found.".to_string(),
            ApiError::Storage(error) => {
                tracing::error!(%error, "storage failure");
                "Something went wrong while accessing drawings.".to_string()
            }
            other => other.to_string(),
        };
        (status, Json(ErrorBody { error: message })).into_response()
    }
}

pub async fn ping_handler() -> impl IntoResponse {
    StatusCode::NO_CONTENT
}

pub async fn create_drawing(
    State(state): State<AppState>,
    payload: Result<Json<NewDrawing>, JsonRejection>,
) -> Result<Json<CreatedDrawing>, ApiError> {
    let Json(drawing) = payload.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
    let record = build_record(drawing, new_drawing_id(), now_millis())?;
    state.storage.insert(&record).await?;
    tracing::info!(id = %record.id, title = %record.title, "saved drawing");
    Ok(Json(CreatedDrawing { id: record.id }))
}

pub async fn list_drawings(
    State(state): State<AppState>,
) -> Result<Json<Vec<DrawingRecord>>, ApiError> {
    let records = state.storage.list().await?;
    tracing::debug!(count = records.len(), "listed drawings");
    Ok(Json(records))
}

pub async fn get_drawing(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<DrawingRecord>, ApiError> {
    let id = normalize_drawing_id(&id).ok_or(ApiError::NotFound)?;
    Ok(Json(state.storage.get(&id).await?))
}
