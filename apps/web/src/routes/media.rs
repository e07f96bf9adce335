//! Image host handlers for the admin UI.

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;
use tracing::error;

use zim_core::media::{SignedUpload, UploadParams};

use crate::error::{ApiError, ApiResult};
use crate::media::MediaClient;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ImagesQuery {
    pub folder: Option<String>,
}

fn client(state: &AppState) -> ApiResult<&MediaClient> {
    state.media.as_ref().ok_or(ApiError::MediaUnavailable)
}

/// `POST /api/cloudinary/sign-upload`
///
/// An empty body signs with defaults.
pub async fn sign_upload(
    State(state): State<AppState>,
    body: Result<Json<UploadParams>, JsonRejection>,
) -> ApiResult<Json<SignedUpload>> {
    let media = client(&state)?;

    let params = match body {
        Ok(Json(params)) => params,
        Err(JsonRejection::MissingJsonContentType(_)) => UploadParams::default(),
        Err(rejection) => return Err(rejection.into()),
    };

    Ok(Json(media.sign_upload(params)?))
}

/// `GET /api/cloudinary/images?folder=`
pub async fn list_images(
    State(state): State<AppState>,
    Query(query): Query<ImagesQuery>,
) -> ApiResult<Response> {
    let media = client(&state)?;
    let folder = query
        .folder
        .filter(|f| !f.is_empty())
        .unwrap_or_else(|| state.config.media_default_folder.clone());

    let response = match media.list_images(&folder).await {
        Ok(images) => Json(json!({ "images": images })).into_response(),
        Err(e) => {
            error!(folder = %folder, error = %e, "Failed to list images");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "images": [], "error": "Failed to list images" })),
            )
                .into_response()
        }
    };

    Ok(response)
}
