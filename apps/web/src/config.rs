//! Web server configuration module.
//!
//! Configuration is loaded from environment variables with fallback to
//! defaults. A `.env` file, if present, is read first by `main`.

use std::env;
use std::str::FromStr;

use zim_core::media::MediaCredentials;

/// Folder listed when `GET /api/cloudinary/images` has no `folder` query.
pub const DEFAULT_MEDIA_FOLDER: &str = "zim-admin";

/// Web server configuration.
#[derive(Debug, Clone)]
pub struct WebConfig {
    /// HTTP listen port
    pub http_port: u16,

    /// SQLite database file
    pub database_path: String,

    /// Maximum pooled database connections
    pub db_max_connections: u32,

    /// Base URL of the CMS REST API (no trailing slash)
    pub payload_api_url: String,

    /// Image host credentials; `None` disables the media routes
    pub media: Option<MediaCredentials>,

    /// Folder listed by default on the media routes
    pub media_default_folder: String,

    /// Require a live session on admin routes
    pub require_auth: bool,
}

impl WebConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let media = match (
            var("CLOUDINARY_CLOUD_NAME"),
            var("CLOUDINARY_API_KEY"),
            var("CLOUDINARY_API_SECRET"),
        ) {
            (Some(cloud_name), Some(api_key), Some(api_secret)) => Some(MediaCredentials {
                cloud_name,
                api_key,
                api_secret,
            }),
            (None, None, None) => None,
            _ => return Err(ConfigError::IncompleteMedia),
        };

        Ok(WebConfig {
            http_port: parse_or(&var, "HTTP_PORT", 8080)?,
            database_path: var("DATABASE_PATH").unwrap_or_else(|| "./zim.db".to_string()),
            db_max_connections: parse_or(&var, "DB_MAX_CONNECTIONS", 5)?,
            payload_api_url: var("PAYLOAD_API_URL")
                .unwrap_or_else(|| "http://localhost:3000/api".to_string())
                .trim_end_matches('/')
                .to_string(),
            media,
            media_default_folder: var("MEDIA_DEFAULT_FOLDER")
                .unwrap_or_else(|| DEFAULT_MEDIA_FOLDER.to_string()),
            require_auth: parse_or(&var, "REQUIRE_AUTH", true)?,
        })
    }
}

fn parse_or<T, F>(var: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match var(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(key.to_string())),
        None => Ok(default),
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("CLOUDINARY_CLOUD_NAME, CLOUDINARY_API_KEY and CLOUDINARY_API_SECRET must be set together")]
    IncompleteMedia,
}
