//! Public update feed, proxied from the CMS.
//!
//! The feed never fails the page: an unreachable CMS yields an empty list.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::warn;

use zim_core::updates::PostStatus;

use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// Posts returned when `limit` is not given.
pub const DEFAULT_LIMIT: u32 = 20;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub limit: Option<u32>,
}

/// `GET /api/updates?limit=N`
pub async fn list(State(state): State<AppState>, Query(query): Query<ListQuery>) -> Json<Value> {
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT);

    match state.updates.published_posts(limit).await {
        Ok(posts) => {
            let posts: Vec<_> = posts
                .into_iter()
                .filter(|p| p.status != Some(PostStatus::Draft))
                .collect();
            Json(json!({ "posts": posts }))
        }
        Err(e) => {
            warn!(error = %e, "Failed to fetch updates");
            Json(json!({ "posts": [] }))
        }
    }
}

/// `GET /api/updates/{slug}`
pub async fn get(State(state): State<AppState>, Path(slug): Path<String>) -> ApiResult<Json<Value>> {
    let post = match state.updates.post_by_slug(&slug).await {
        Ok(post) => post,
        Err(e) => {
            warn!(slug = %slug, error = %e, "Failed to fetch update");
            None
        }
    };

    match post {
        Some(post) => Ok(Json(json!({ "post": post }))),
        None => Err(ApiError::NotFound("Post")),
    }
}
