//! Session guard for the admin routes.
//!
//! Sessions are issued by the external auth service; this module only
//! checks them. The token comes from either
//!
//! ```text
//! Authorization: Bearer <token>
//! Cookie: better-auth.session_token=<token>.<signature>
//! ```
//!
//! and must match a `session` row whose `expiresAt` is in the future.

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use tracing::debug;

use crate::error::ApiError;
use crate::AppState;

/// Cookie set by the auth service.
pub const SESSION_COOKIE: &str = "better-auth.session_token";

/// Extract bearer token from authorization header.
pub fn extract_bearer_token(auth_header: &str) -> Option<&str> {
    auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Finds the session token on a request, header first, then cookie.
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    if let Some(token) = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(extract_bearer_token)
    {
        return Some(token.to_string());
    }

    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .and_then(|(_, value)| value.split('.').next())
        .filter(|token| !token.is_empty())
        .map(str::to_string)
}

/// Middleware: rejects the request with 401 unless it carries a live session.
///
/// On success the [`zim_db::ActiveSession`] is stored in the request
/// extensions.
pub async fn require_session(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if !state.config.require_auth {
        return Ok(next.run(request).await);
    }

    let Some(token) = session_token(request.headers()) else {
        debug!(path = %request.uri().path(), "No session token");
        return Err(ApiError::Unauthorized);
    };

    let active = state
        .db
        .sessions()
        .find_active(&token)
        .await
        .map_err(ApiError::store("check session"))?
        .ok_or(ApiError::Unauthorized)?;

    debug!(user_id = %active.user.id, path = %request.uri().path(), "Session accepted");
    request.extensions_mut().insert(active);

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_bearer_token() {
        assert_eq!(extract_bearer_token("Bearer abc"), Some("abc"));
        assert_eq!(extract_bearer_token("Bearer "), None);
        assert_eq!(extract_bearer_token("Basic abc"), None);
    }

    #[test]
    fn test_cookie_token_drops_signature() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; better-auth.session_token=tok123.c2lnbmF0dXJl"),
        );
        assert_eq!(session_token(&headers).as_deref(), Some("tok123"));
    }

    #[test]
    fn test_header_wins_over_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer fromheader"));
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("better-auth.session_token=fromcookie.sig"),
        );
        assert_eq!(session_token(&headers).as_deref(), Some("fromheader"));
    }

    #[test]
    fn test_no_token() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("theme=dark"));
        assert_eq!(session_token(&headers), None);
    }
}
