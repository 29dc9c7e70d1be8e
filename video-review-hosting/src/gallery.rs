use serde::Deserialize;

use crate::config::HostingConfig;
use crate::error::HostingError;
use crate::playback::VideoSource;

/// A previously submitted clip as reported by the listing endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HostedResource {
    pub public_id: String,
    #[serde(default)]
    pub version: Option<u64>,
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResourceList {
    #[serde(default)]
    resources: Vec<HostedResource>,
}

/// Lists clips carrying the review tag.
pub struct GalleryClient {
    http: reqwest::Client,
    listing_url: String,
    delivery_base_url: String,
    cloud_name: String,
}

impl GalleryClient {
    pub fn new(config: &HostingConfig) -> Result<Self, HostingError> {
        config.validate_client()?;
        Ok(Self {
            http: reqwest::Client::new(),
            listing_url: config.listing_url(),
            delivery_base_url: config.delivery_base_url.clone(),
            cloud_name: config.cloud_name.clone(),
        })
    }

    pub async fn list(&self) -> Result<Vec<HostedResource>, HostingError> {
        let resp = self.http.get(&self.listing_url).send().await?;
        if !resp.status().is_success() {
            let status = resp.status();
            let message = resp.text().await.unwrap_or_default();
            log::warn!("listing request failed with {}", status);
            return Err(HostingError::Http {
                status: status.as_u16(),
                message,
            });
        }
        let list: ResourceList = resp
            .json()
            .await
            .map_err(|e| HostingError::InvalidResponse(format!("resource list: {}", e)))?;
        log::debug!("listed {} review videos", list.resources.len());
        Ok(list.resources)
    }

    /// Playback sources for every listed clip, in listing order.
    pub async fn sources(&self) -> Result<Vec<VideoSource>, HostingError> {
        Ok(self
            .list()
            .await?
            .iter()
            .map(|r| VideoSource::new(&self.delivery_base_url, &self.cloud_name, &r.public_id))
            .collect())
    }
}
