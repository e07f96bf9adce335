//! # Media Client
//!
//! Talks to the image host's admin API. Signing itself is pure and lives in
//! [`zim_core::media`]; this module adds the clock and the folder listing.

use std::time::Duration;

use chrono::Utc;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use zim_core::media::{sign_upload, MediaCredentials, SignedUpload, UploadParams};
use zim_core::CoreError;

/// Admin API root of the hosted image service.
pub const DEFAULT_API_BASE: &str = "https://api.cloudinary.com/v1_1";

/// Resources returned per listing.
const MAX_RESULTS: u32 = 100;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Media client errors.
#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    #[error("Image host request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Image host answered HTTP {0}")]
    Status(u16),
}

/// One hosted image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaImage {
    pub public_id: String,
    pub url: String,
    pub width: u32,
    pub height: u32,
    pub format: String,
    pub created_at: String,
}

#[derive(Debug, Deserialize)]
struct ResourceList {
    #[serde(default)]
    resources: Vec<Resource>,
}

#[derive(Debug, Deserialize)]
struct Resource {
    public_id: String,
    #[serde(default)]
    secure_url: String,
    #[serde(default)]
    width: u32,
    #[serde(default)]
    height: u32,
    #[serde(default)]
    format: String,
    #[serde(default)]
    created_at: String,
}

impl From<Resource> for MediaImage {
    fn from(r: Resource) -> Self {
        MediaImage {
            public_id: r.public_id,
            url: r.secure_url,
            width: r.width,
            height: r.height,
            format: r.format,
            created_at: r.created_at,
        }
    }
}

/// Client for one image host account.
#[derive(Debug, Clone)]
pub struct MediaClient {
    credentials: MediaCredentials,
    http: Client,
    api_base: String,
}

impl MediaClient {
    pub fn new(credentials: MediaCredentials) -> Self {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());

        MediaClient {
            credentials,
            http,
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }

    /// Points the client at another admin API root.
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    /// Signs upload parameters with the current time as default timestamp.
    pub fn sign_upload(&self, params: UploadParams) -> Result<SignedUpload, CoreError> {
        sign_upload(&self.credentials, params, Utc::now())
    }

    /// Lists images whose public id starts with `folder`.
    pub async fn list_images(&self, folder: &str) -> Result<Vec<MediaImage>, MediaError> {
        let url = format!(
            "{}/{}/resources/image/upload",
            self.api_base, self.credentials.cloud_name
        );

        let response = self
            .http
            .get(&url)
            .basic_auth(&self.credentials.api_key, Some(&self.credentials.api_secret))
            .query(&[("prefix", folder.to_string()), ("max_results", MAX_RESULTS.to_string())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(MediaError::Status(status.as_u16()));
        }

        let list: ResourceList = response.json().await?;
        debug!(folder = %folder, count = list.resources.len(), "Listed images");

        Ok(list.resources.into_iter().map(MediaImage::from).collect())
    }
}
