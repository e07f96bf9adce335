//! Explicit sponsor-kid link handlers.

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};

use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// `PUT /api/sponsors/{sponsor_id}/kids/{kid_id}`
pub async fn add(
    State(state): State<AppState>,
    Path((sponsor_id, kid_id)): Path<(String, String)>,
) -> ApiResult<Json<Value>> {
    state
        .db
        .links()
        .add_link(&sponsor_id, &kid_id)
        .await
        .map_err(ApiError::store("link sponsor and kid"))?;

    Ok(Json(json!({ "success": true })))
}

/// `DELETE /api/sponsors/{sponsor_id}/kids/{kid_id}`
pub async fn remove(
    State(state): State<AppState>,
    Path((sponsor_id, kid_id)): Path<(String, String)>,
) -> ApiResult<Json<Value>> {
    state
        .db
        .links()
        .remove_link(&sponsor_id, &kid_id)
        .await
        .map_err(ApiError::store("unlink sponsor and kid"))?;

    Ok(Json(json!({ "success": true })))
}
