use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use video_review_core::RecordedFile;

use crate::config::HostingConfig;
use crate::error::HostingError;
use crate::signing::SignedCredential;

/// Subset of the upload response the app relies on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadResponse {
    pub public_id: String,
    #[serde(default)]
    pub secure_url: Option<String>,
    #[serde(default)]
    pub resource_type: Option<String>,
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub bytes: Option<u64>,
}

/// Two-step signed upload: fetch a credential, then post the file.
#[async_trait]
pub trait UploadService: Send + Sync {
    async fn request_credential(&self) -> Result<SignedCredential, HostingError>;

    async fn upload(&self, file: &RecordedFile, credential: &SignedCredential) -> Result<UploadResponse, HostingError>;
}

/// HTTP implementation of [`UploadService`].
pub struct UploadClient {
    http: reqwest::Client,
    credential_url: String,
    upload_url: String,
    api_key: String,
    tag: String,
}

impl UploadClient {
    pub fn new(config: &HostingConfig) -> Result<Self, HostingError> {
        config.validate_client()?;
        Ok(Self::with_client(reqwest::Client::new(), config))
    }

    /// Use a preconfigured `reqwest::Client` (timeouts, proxies).
    pub fn with_client(http: reqwest::Client, config: &HostingConfig) -> Self {
        Self {
            http,
            credential_url: config.credential_url.clone(),
            upload_url: config.upload_url(),
            api_key: config.api_key.clone(),
            tag: config.tag.clone(),
        }
    }
}

#[async_trait]
impl UploadService for UploadClient {
    async fn request_credential(&self) -> Result<SignedCredential, HostingError> {
        let resp = self
            .http
            .get(&self.credential_url)
            .send()
            .await
            .map_err(|e| HostingError::Credential(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(HostingError::Credential(format!("{}: {}", status, body)));
        }

        resp.json()
            .await
            .map_err(|e| HostingError::Credential(format!("malformed credential: {}", e)))
    }

    async fn upload(&self, file: &RecordedFile, credential: &SignedCredential) -> Result<UploadResponse, HostingError> {
        let file_part = reqwest::multipart::Part::bytes(file.bytes.clone())
            .file_name(file.name.clone())
            .mime_str(&file.mime_type)
            .map_err(|e| HostingError::Validation(format!("invalid MIME type {}: {}", file.mime_type, e)))?;

        let form = reqwest::multipart::Form::new()
            .part("file", file_part)
            .text("tags", self.tag.clone())
            .text("api_key", self.api_key.clone())
            .text("timestamp", credential.timestamp.to_string())
            .text("signature", credential.signature.clone());

        log::info!("uploading {} ({} bytes)", file.name, file.bytes.len());
        let resp = self.http.post(&self.upload_url).multipart(form).send().await?;

        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(HostingError::Http {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        serde_json::from_str(&body).map_err(|e| HostingError::InvalidResponse(format!("upload response: {}", e)))
    }
}

/// Pull `error.message` out of an error body, falling back to the raw text.
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
        .unwrap_or_else(|| body.to_string())
}
