//! # zim-web: JSON API for the Zim admin UI and public site
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                           zim-web                                       │
//! │                                                                         │
//! │  public                         admin (session guard)                   │
//! │  ──────                         ─────────────────────                   │
//! │  GET /health                    /api/sponsors[/{id}]                    │
//! │  GET /api/updates               /api/kids[/{id}]                        │
//! │  GET /api/updates/{slug}        /api/sponsors/{sid}/kids/{kid}          │
//! │        │                        /api/cloudinary/{sign-upload,images}    │
//! │        │                                  │                             │
//! │        ▼                                  ▼                             │
//! │  UpdatesClient ──► CMS          zim-db repositories ──► SQLite          │
//! │                                 MediaClient ──► image host              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod auth;
pub mod cms;
pub mod config;
pub mod error;
pub mod media;
pub mod routes;

use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use tower_http::trace::TraceLayer;

use zim_db::Database;

use crate::cms::UpdatesClient;
use crate::config::WebConfig;
use crate::media::MediaClient;

/// Shared application state, cloned into every handler.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub updates: UpdatesClient,
    /// `None` when no image host credentials are configured.
    pub media: Option<MediaClient>,
    pub config: Arc<WebConfig>,
}

impl AppState {
    pub fn new(db: Database, config: WebConfig) -> Self {
        AppState {
            db,
            updates: UpdatesClient::new(&config.payload_api_url),
            media: config.media.clone().map(MediaClient::new),
            config: Arc::new(config),
        }
    }

    /// Replaces the media client.
    pub fn with_media(mut self, media: MediaClient) -> Self {
        self.media = Some(media);
        self
    }
}

/// Builds the full router.
pub fn create_router(state: AppState) -> Router {
    let admin = Router::new()
        .route(
            "/api/sponsors",
            get(routes::sponsors::list).post(routes::sponsors::create),
        )
        .route(
            "/api/sponsors/{id}",
            get(routes::sponsors::get)
                .put(routes::sponsors::update)
                .delete(routes::sponsors::delete),
        )
        .route(
            "/api/sponsors/{sponsor_id}/kids/{kid_id}",
            put(routes::links::add).delete(routes::links::remove),
        )
        .route("/api/kids", get(routes::kids::list).post(routes::kids::create))
        .route(
            "/api/kids/{id}",
            get(routes::kids::get)
                .put(routes::kids::update)
                .delete(routes::kids::delete),
        )
        .route("/api/cloudinary/sign-upload", post(routes::media::sign_upload))
        .route("/api/cloudinary/images", get(routes::media::list_images))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_session,
        ));

    let public = Router::new()
        .route("/health", get(routes::health::health))
        .route("/api/updates", get(routes::updates::list))
        .route("/api/updates/{slug}", get(routes::updates::get));

    Router::new()
        .merge(admin)
        .merge(public)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
