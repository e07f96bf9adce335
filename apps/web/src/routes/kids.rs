//! Kid CRUD handlers.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use tracing::info;

use zim_core::validation::{validate_kid_patch, validate_new_kid};
use zim_core::{CoreError, CreateKidRequest, UpdateKidRequest};

use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// `GET /api/kids`
pub async fn list(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let kids = state
        .db
        .kids()
        .get_all()
        .await
        .map_err(ApiError::store("fetch kids"))?;

    Ok(Json(json!({ "kids": kids })))
}

/// `POST /api/kids`
pub async fn create(
    State(state): State<AppState>,
    body: Result<Json<CreateKidRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let Json(req) = body?;
    let new = validate_new_kid(req)?;

    let kid = state
        .db
        .kids()
        .create(new)
        .await
        .map_err(ApiError::store("create kid"))?;

    info!(id = %kid.kid.id, sponsors = kid.sponsors.len(), "Kid created");
    Ok((StatusCode::CREATED, Json(json!({ "kid": kid }))))
}

/// `GET /api/kids/{id}`
pub async fn get(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<Value>> {
    let kid = state
        .db
        .kids()
        .get_by_id(&id)
        .await
        .map_err(ApiError::store("fetch kid"))?
        .ok_or(CoreError::KidNotFound(id))?;

    Ok(Json(json!({ "kid": kid })))
}

/// `PUT /api/kids/{id}`
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<UpdateKidRequest>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let Json(req) = body?;
    let patch = validate_kid_patch(req)?;

    let kid = state
        .db
        .kids()
        .update(&id, patch)
        .await
        .map_err(ApiError::store("update kid"))?
        .ok_or(CoreError::KidNotFound(id))?;

    Ok(Json(json!({ "kid": kid })))
}

/// `DELETE /api/kids/{id}`
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    state
        .db
        .kids()
        .delete(&id)
        .await
        .map_err(ApiError::store("delete kid"))?;

    info!(id = %id, "Kid deleted");
    Ok(Json(json!({ "success": true })))
}
