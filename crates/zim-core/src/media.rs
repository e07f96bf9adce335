//! # Media Signing
//!
//! Signed upload parameters for the image host. The admin UI uploads images
//! straight to the host; this backend only signs the request so the API
//! secret never leaves the server.
//!
//! ## Signature
//! ```text
//! params  = { folder: "zim-admin", tags: "a,b", timestamp: 1700000000 }
//! to_sign = "folder=zim-admin&tags=a,b&timestamp=1700000000"   (keys sorted)
//! sig     = hex(sha256(to_sign + api_secret))
//! ```
//! Empty optional parameters are left out of the signed string.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{CoreError, CoreResult};

/// Algorithm name reported alongside each signature.
pub const SIGNATURE_ALGORITHM: &str = "sha256";

/// Credentials for the image host account.
#[derive(Clone, PartialEq, Eq)]
pub struct MediaCredentials {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
}

impl fmt::Debug for MediaCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MediaCredentials")
            .field("cloud_name", &self.cloud_name)
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .finish()
    }
}

/// Parameters the client wants signed. Field names follow the host's API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct UploadParams {
    /// Unix seconds; defaults to now.
    pub timestamp: Option<i64>,
    pub folder: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub public_id: Option<String>,
}

/// What the client needs to perform a signed upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedUpload {
    pub signature: String,
    pub timestamp: i64,
    pub api_key: String,
    pub cloud_name: String,
    pub signature_algorithm: String,
}

/// Builds the `key=value&...` string, keys in ascending order.
pub fn string_to_sign(params: &BTreeMap<&str, String>) -> String {
    params
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&")
}

/// Signs a parameter set with the API secret.
pub fn sign_params(params: &BTreeMap<&str, String>, api_secret: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(string_to_sign(params).as_bytes());
    hasher.update(api_secret.as_bytes());
    hex::encode(hasher.finalize())
}

/// Produces signed upload parameters.
///
/// ## Errors
/// `CoreError::MediaNotConfigured` when the secret is empty.
pub fn sign_upload(
    credentials: &MediaCredentials,
    params: UploadParams,
    now: DateTime<Utc>,
) -> CoreResult<SignedUpload> {
    if credentials.api_secret.is_empty() {
        return Err(CoreError::MediaNotConfigured);
    }

    let timestamp = params.timestamp.unwrap_or_else(|| now.timestamp());

    let mut to_sign: BTreeMap<&str, String> = BTreeMap::new();
    to_sign.insert("timestamp", timestamp.to_string());
    if let Some(folder) = params.folder.filter(|f| !f.is_empty()) {
        to_sign.insert("folder", folder);
    }
    if !params.tags.is_empty() {
        to_sign.insert("tags", params.tags.join(","));
    }
    if let Some(public_id) = params.public_id.filter(|p| !p.is_empty()) {
        to_sign.insert("public_id", public_id);
    }

    Ok(SignedUpload {
        signature: sign_params(&to_sign, &credentials.api_secret),
        timestamp,
        api_key: credentials.api_key.clone(),
        cloud_name: credentials.cloud_name.clone(),
        signature_algorithm: SIGNATURE_ALGORITHM.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn credentials() -> MediaCredentials {
        MediaCredentials {
            cloud_name: "zim".to_string(),
            api_key: "123456".to_string(),
            api_secret: "abcd1234".to_string(),
        }
    }

    #[test]
    fn test_string_to_sign_sorts_keys() {
        let mut params = BTreeMap::new();
        params.insert("timestamp", "1".to_string());
        params.insert("folder", "a".to_string());
        assert_eq!(string_to_sign(&params), "folder=a&timestamp=1");
    }

    #[test]
    fn test_sign_upload_with_all_params() {
        let params = UploadParams {
            timestamp: Some(1_700_000_000),
            folder: Some("zim-admin".to_string()),
            tags: vec!["kids".to_string(), "2024".to_string()],
            public_id: Some("kids/malachi".to_string()),
        };
        let signed = sign_upload(&credentials(), params, Utc::now()).unwrap();

        assert_eq!(
            signed.signature,
            "dbc6676833127fccfe9981105a99b4c8785213d86056b8f90d6b4d130965e7c7"
        );
        assert_eq!(signed.timestamp, 1_700_000_000);
        assert_eq!(signed.api_key, "123456");
        assert_eq!(signed.signature_algorithm, "sha256");
    }

    #[test]
    fn test_sign_upload_defaults_timestamp_and_skips_empty() {
        let now = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let params = UploadParams {
            folder: Some(String::new()),
            ..Default::default()
        };
        let signed = sign_upload(&credentials(), params, now).unwrap();

        assert_eq!(signed.timestamp, 1_700_000_000);
        assert_eq!(
            signed.signature,
            "085586587e940cacdba96376fb111518bd8c5372b4874d7e60bd1cd669217289"
        );
    }

    #[test]
    fn test_sign_upload_requires_secret() {
        let creds = MediaCredentials {
            api_secret: String::new(),
            ..credentials()
        };
        assert!(matches!(
            sign_upload(&creds, UploadParams::default(), Utc::now()),
            Err(CoreError::MediaNotConfigured)
        ));
    }

    #[test]
    fn test_debug_redacts_secret() {
        let rendered = format!("{:?}", credentials());
        assert!(!rendered.contains("abcd1234"));
    }
}
