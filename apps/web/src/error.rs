//! Error types for the web API.
//!
//! Every failure leaves the server as `{"error": "<message>"}`. Store
//! failures are logged in full and answered with a generic message.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use tracing::{error, warn};

use zim_core::{CoreError, ValidationError};
use zim_db::DbError;

/// API errors.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Invalid request body: {0}")]
    BadRequest(String),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Media is not configured")]
    MediaUnavailable,

    #[error("Failed to {action}")]
    Store {
        action: &'static str,
        #[source]
        source: DbError,
    },
}

impl ApiError {
    /// Wraps a store error with the action that failed.
    ///
    /// ```rust,ignore
    /// db.sponsors().get_all().await.map_err(ApiError::store("fetch sponsors"))?;
    /// ```
    pub fn store(action: &'static str) -> impl FnOnce(DbError) -> ApiError {
        move |source| ApiError::Store { action, source }
    }

    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::MediaUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Store { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(e) => ApiError::Validation(e),
            CoreError::SponsorNotFound(_) => ApiError::NotFound("Sponsor"),
            CoreError::KidNotFound(_) => ApiError::NotFound("Kid"),
            CoreError::MediaNotConfigured => ApiError::MediaUnavailable,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Store { action, source } => {
                error!(action = %action, error = %source, "Store operation failed");
            }
            ApiError::BadRequest(reason) => {
                warn!(reason = %reason, "Rejected request body");
            }
            _ => {}
        }

        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}

/// Result type for handlers.
pub type ApiResult<T> = Result<T, ApiError>;
