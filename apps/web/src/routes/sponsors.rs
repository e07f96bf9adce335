//! Sponsor CRUD handlers.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use tracing::info;

use zim_core::validation::{validate_new_sponsor, validate_sponsor_patch};
use zim_core::{CoreError, CreateSponsorRequest, SponsorPatch};

use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// `GET /api/sponsors`
pub async fn list(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let sponsors = state
        .db
        .sponsors()
        .get_all()
        .await
        .map_err(ApiError::store("fetch sponsors"))?;

    Ok(Json(json!({ "sponsors": sponsors })))
}

/// `POST /api/sponsors`
pub async fn create(
    State(state): State<AppState>,
    body: Result<Json<CreateSponsorRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let Json(req) = body?;
    let new = validate_new_sponsor(req)?;

    let sponsor = state
        .db
        .sponsors()
        .create(new)
        .await
        .map_err(ApiError::store("create sponsor"))?;

    info!(id = %sponsor.sponsor.id, kids = sponsor.kids.len(), "Sponsor created");
    Ok((StatusCode::CREATED, Json(json!({ "sponsor": sponsor }))))
}

/// `GET /api/sponsors/{id}`
pub async fn get(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<Value>> {
    let sponsor = state
        .db
        .sponsors()
        .get_by_id(&id)
        .await
        .map_err(ApiError::store("fetch sponsor"))?
        .ok_or(CoreError::SponsorNotFound(id))?;

    Ok(Json(json!({ "sponsor": sponsor })))
}

/// `PUT /api/sponsors/{id}`
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<SponsorPatch>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let Json(patch) = body?;
    validate_sponsor_patch(&patch)?;

    let sponsor = state
        .db
        .sponsors()
        .update(&id, patch)
        .await
        .map_err(ApiError::store("update sponsor"))?
        .ok_or(CoreError::SponsorNotFound(id))?;

    Ok(Json(json!({ "sponsor": sponsor })))
}

/// `DELETE /api/sponsors/{id}`
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    state
        .db
        .sponsors()
        .delete(&id)
        .await
        .map_err(ApiError::store("delete sponsor"))?;

    info!(id = %id, "Sponsor deleted");
    Ok(Json(json!({ "success": true })))
}
