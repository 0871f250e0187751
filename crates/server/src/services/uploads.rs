//! Presigned logo uploads.
//!
//! Step one issues a URL for `PUT /api/uploads/{objectId}` carrying the
//! content type, an expiry and an HMAC-SHA256 signature over
//! `PUT\n{object_id}\n{content_type}\n{expires}`. Step two verifies the
//! signature, expiry, content type and size, then writes the bytes under the
//! upload directory where `/objects/uploads/{objectId}` serves them.

use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use thiserror::Error;
use tracing::instrument;
use url::Url;
use uuid::Uuid;
use validator::Validate;

use crate::config::UploadConfig;
use crate::models::FieldOrder;

type HmacSha256 = Hmac<Sha256>;

/// Public path prefix objects are served under.
pub const OBJECT_PATH_PREFIX: &str = "/objects/uploads";

/// Accepted image types and the extension stored objects get.
pub const ALLOWED_CONTENT_TYPES: &[(&str, &str)] = &[
    ("image/png", "png"),
    ("image/jpeg", "jpg"),
    ("image/gif", "gif"),
    ("image/webp", "webp"),
    ("image/svg+xml", "svg"),
];

/// Errors from the upload flow.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("unsupported content type: {0}")]
    UnsupportedContentType(String),

    #[error("content type does not match the signed upload URL")]
    ContentTypeMismatch,

    #[error("file exceeds the {max} byte limit")]
    TooLarge { max: usize },

    #[error("invalid upload signature")]
    InvalidSignature,

    #[error("upload URL has expired")]
    Expired,

    #[error("invalid object id")]
    InvalidObjectId,

    #[error("storage error: {0}")]
    Io(#[from] std::io::Error),
}

/// `POST /api/uploads/request-url` body.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UploadUrlRequest {
    #[validate(length(min = 1, message = "File name is required"))]
    pub name: String,
    #[validate(range(min = 1, message = "File is empty"))]
    pub size: u64,
    #[validate(length(min = 1, message = "Content type is required"))]
    pub content_type: String,
}

impl FieldOrder for UploadUrlRequest {
    const FIELDS: &'static [&'static str] = &["name", "size", "content_type"];
}

/// A presigned upload target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PresignedUpload {
    #[serde(rename = "uploadURL")]
    pub upload_url: String,
    /// Path to store on settings once the upload succeeds.
    pub object_path: String,
    pub expires_at: DateTime<Utc>,
}

/// Query string of a presigned upload URL.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedUploadParams {
    pub content_type: String,
    pub expires: i64,
    pub signature: String,
}

/// Issues and checks presigned upload URLs and stores the objects.
#[derive(Clone)]
pub struct UploadService {
    dir: PathBuf,
    signing_key: SecretString,
    max_bytes: usize,
    url_ttl: Duration,
    public_url: String,
}

impl std::fmt::Debug for UploadService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadService")
            .field("dir", &self.dir)
            .field("max_bytes", &self.max_bytes)
            .field("url_ttl", &self.url_ttl)
            .finish_non_exhaustive()
    }
}

impl UploadService {
    #[must_use]
    pub fn new(config: &UploadConfig, public_url: &str) -> Self {
        Self {
            dir: config.dir.clone(),
            signing_key: config.signing_key.clone(),
            max_bytes: config.max_bytes,
            url_ttl: config.url_ttl,
            public_url: public_url.trim_end_matches('/').to_string(),
        }
    }

    /// Directory objects are stored in.
    #[must_use]
    pub const fn dir(&self) -> &PathBuf {
        &self.dir
    }

    #[must_use]
    pub const fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    /// Issue a presigned URL for one object.
    ///
    /// # Errors
    ///
    /// Returns `UploadError::UnsupportedContentType` for non-image types and
    /// `UploadError::TooLarge` if the declared size is over the limit.
    #[instrument(skip(self), fields(content_type = %request.content_type, size = request.size))]
    pub fn presign(
        &self,
        request: &UploadUrlRequest,
        now: DateTime<Utc>,
    ) -> Result<PresignedUpload, UploadError> {
        let content_type = normalize_content_type(&request.content_type);
        let extension = extension_for(&content_type)
            .ok_or_else(|| UploadError::UnsupportedContentType(request.content_type.clone()))?;

        if usize::try_from(request.size).map_or(true, |size| size > self.max_bytes) {
            return Err(UploadError::TooLarge {
                max: self.max_bytes,
            });
        }

        let object_id = format!("{}.{extension}", Uuid::new_v4());
        let ttl = chrono::Duration::from_std(self.url_ttl).unwrap_or(chrono::Duration::MAX);
        let expires_at = now.checked_add_signed(ttl).unwrap_or(DateTime::<Utc>::MAX_UTC);
        let expires = expires_at.timestamp();
        let signature = self.sign(&object_id, &content_type, expires);

        let upload_url = Url::parse_with_params(
            &format!("{}/api/uploads/{object_id}", self.public_url),
            &[
                ("contentType", content_type.as_str()),
                ("expires", &expires.to_string()),
                ("signature", &signature),
            ],
        )
        .map_err(|_| UploadError::InvalidObjectId)?;

        Ok(PresignedUpload {
            upload_url: upload_url.into(),
            object_path: object_path(&object_id),
            expires_at,
        })
    }

    /// Check a signed upload request before accepting its body.
    ///
    /// # Errors
    ///
    /// Returns `UploadError::InvalidObjectId`, `Expired`, `InvalidSignature`
    /// or `ContentTypeMismatch` for the corresponding failure.
    pub fn verify(
        &self,
        object_id: &str,
        params: &SignedUploadParams,
        request_content_type: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<(), UploadError> {
        if !is_valid_object_id(object_id) {
            return Err(UploadError::InvalidObjectId);
        }

        if params.expires < now.timestamp() {
            return Err(UploadError::Expired);
        }

        let provided = hex::decode(&params.signature).map_err(|_| UploadError::InvalidSignature)?;
        let mut mac = self.mac()?;
        mac.update(signing_payload(object_id, &params.content_type, params.expires).as_bytes());
        // Constant-time comparison
        mac.verify_slice(&provided)
            .map_err(|_| UploadError::InvalidSignature)?;

        if let Some(actual) = request_content_type
            && normalize_content_type(actual) != normalize_content_type(&params.content_type)
        {
            return Err(UploadError::ContentTypeMismatch);
        }

        Ok(())
    }

    /// Write a verified object to disk and return its public path.
    ///
    /// # Errors
    ///
    /// Returns `UploadError::TooLarge` if `bytes` is over the limit and
    /// `UploadError::Io` if the write fails.
    #[instrument(skip(self, bytes), fields(len = bytes.len()))]
    pub async fn store(&self, object_id: &str, bytes: &[u8]) -> Result<String, UploadError> {
        if !is_valid_object_id(object_id) {
            return Err(UploadError::InvalidObjectId);
        }
        if bytes.len() > self.max_bytes {
            return Err(UploadError::TooLarge {
                max: self.max_bytes,
            });
        }

        tokio::fs::create_dir_all(&self.dir).await?;
        tokio::fs::write(self.dir.join(object_id), bytes).await?;
        tracing::info!(object_id, "Stored uploaded object");

        Ok(object_path(object_id))
    }

    fn mac(&self) -> Result<HmacSha256, UploadError> {
        HmacSha256::new_from_slice(self.signing_key.expose_secret().as_bytes())
            .map_err(|_| UploadError::InvalidSignature)
    }

    fn sign(&self, object_id: &str, content_type: &str, expires: i64) -> String {
        match self.mac() {
            Ok(mut mac) => {
                mac.update(signing_payload(object_id, content_type, expires).as_bytes());
                hex::encode(mac.finalize().into_bytes())
            }
            Err(_) => String::new(),
        }
    }
}

fn signing_payload(object_id: &str, content_type: &str, expires: i64) -> String {
    format!("PUT\n{object_id}\n{content_type}\n{expires}")
}

/// Public path for a stored object.
#[must_use]
pub fn object_path(object_id: &str) -> String {
    format!("{OBJECT_PATH_PREFIX}/{object_id}")
}

/// Lowercase the media type and drop parameters such as `charset`.
fn normalize_content_type(raw: &str) -> String {
    raw.split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

fn extension_for(content_type: &str) -> Option<&'static str> {
    ALLOWED_CONTENT_TYPES
        .iter()
        .find(|(ty, _)| *ty == content_type)
        .map(|(_, ext)| *ext)
}

/// Object ids are `{uuid}.{ext}`; anything with path separators or other
/// characters is rejected before touching the filesystem.
fn is_valid_object_id(object_id: &str) -> bool {
    let Some((stem, ext)) = object_id.rsplit_once('.') else {
        return false;
    };
    Uuid::parse_str(stem).is_ok() && ALLOWED_CONTENT_TYPES.iter().any(|(_, e)| *e == ext)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn service(dir: PathBuf) -> UploadService {
        UploadService::new(
            &UploadConfig {
                dir,
                signing_key: SecretString::from("k3y-f0r-t3st1ng-0nly-9a8b7c6d5e4f3a2b"),
                max_bytes: 1024,
                url_ttl: Duration::from_secs(900),
            },
            "http://127.0.0.1:5000/",
        )
    }

    fn request(content_type: &str, size: u64) -> UploadUrlRequest {
        UploadUrlRequest {
            name: "logo.png".to_string(),
            size,
            content_type: content_type.to_string(),
        }
    }

    fn params_from(upload_url: &str) -> (String, SignedUploadParams) {
        let url = Url::parse(upload_url).unwrap();
        let object_id = url.path_segments().unwrap().next_back().unwrap().to_string();
        let query: std::collections::HashMap<_, _> = url.query_pairs().into_owned().collect();
        (
            object_id,
            SignedUploadParams {
                content_type: query["contentType"].clone(),
                expires: query["expires"].parse().unwrap(),
                signature: query["signature"].clone(),
            },
        )
    }

    #[test]
    fn test_presign_then_verify() {
        let svc = service(PathBuf::from("unused"));
        let now = Utc::now();
        let presigned = svc.presign(&request("image/png", 512), now).unwrap();

        assert!(presigned.upload_url.starts_with("http://127.0.0.1:5000/api/uploads/"));
        assert!(presigned.object_path.starts_with("/objects/uploads/"));
        assert!(presigned.object_path.ends_with(".png"));
        assert_eq!(presigned.expires_at, now + chrono::Duration::seconds(900));

        let (object_id, params) = params_from(&presigned.upload_url);
        assert!(presigned.object_path.ends_with(&object_id));
        assert!(svc.verify(&object_id, &params, Some("image/png"), now).is_ok());
    }

    #[test]
    fn test_tampered_content_type_rejected() {
        let svc = service(PathBuf::from("unused"));
        let now = Utc::now();
        let presigned = svc.presign(&request("image/png", 512), now).unwrap();
        let (object_id, mut params) = params_from(&presigned.upload_url);

        assert!(matches!(
            svc.verify(&object_id, &params, Some("text/html"), now),
            Err(UploadError::ContentTypeMismatch)
        ));

        params.content_type = "text/html".to_string();
        assert!(matches!(
            svc.verify(&object_id, &params, Some("text/html"), now),
            Err(UploadError::InvalidSignature)
        ));
    }

    #[test]
    fn test_tampered_signature_rejected() {
        let svc = service(PathBuf::from("unused"));
        let now = Utc::now();
        let presigned = svc.presign(&request("image/jpeg", 10), now).unwrap();
        let (object_id, mut params) = params_from(&presigned.upload_url);

        params.signature = "00".repeat(32);
        assert!(matches!(
            svc.verify(&object_id, &params, None, now),
            Err(UploadError::InvalidSignature)
        ));

        params.signature = "not-hex".to_string();
        assert!(matches!(
            svc.verify(&object_id, &params, None, now),
            Err(UploadError::InvalidSignature)
        ));
    }

    #[test]
    fn test_expired_url_rejected() {
        let svc = service(PathBuf::from("unused"));
        let issued = Utc::now() - chrono::Duration::hours(1);
        let presigned = svc.presign(&request("image/gif", 10), issued).unwrap();
        let (object_id, params) = params_from(&presigned.upload_url);

        assert!(matches!(
            svc.verify(&object_id, &params, Some("image/gif"), Utc::now()),
            Err(UploadError::Expired)
        ));
    }

    #[test]
    fn test_presign_rejects_type_and_size() {
        let svc = service(PathBuf::from("unused"));
        assert!(matches!(
            svc.presign(&request("application/pdf", 10), Utc::now()),
            Err(UploadError::UnsupportedContentType(_))
        ));
        assert!(matches!(
            svc.presign(&request("image/png", 4096), Utc::now()),
            Err(UploadError::TooLarge { max: 1024 })
        ));
    }

    #[test]
    fn test_object_id_validation() {
        assert!(is_valid_object_id(
            "67e55044-10b1-426f-9247-bb680e5fe0c8.png"
        ));
        assert!(!is_valid_object_id("../../etc/passwd"));
        assert!(!is_valid_object_id("67e55044-10b1-426f-9247-bb680e5fe0c8.exe"));
        assert!(!is_valid_object_id("logo"));
    }

    #[tokio::test]
    async fn test_store_writes_object() {
        let dir = tempfile::tempdir().unwrap();
        let svc = service(dir.path().join("uploads"));
        let object_id = "67e55044-10b1-426f-9247-bb680e5fe0c8.svg";

        let path = svc.store(object_id, b"<svg/>").await.unwrap();
        assert_eq!(path, "/objects/uploads/67e55044-10b1-426f-9247-bb680e5fe0c8.svg");

        let written = std::fs::read(dir.path().join("uploads").join(object_id)).unwrap();
        assert_eq!(written, b"<svg/>");

        let too_big = vec![0u8; 2048];
        assert!(matches!(
            svc.store(object_id, &too_big).await,
            Err(UploadError::TooLarge { .. })
        ));
    }
}
