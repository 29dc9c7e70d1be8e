use std::fmt;

use crate::error::HostingError;
use crate::signing::SignatureAlgorithm;

/// Server-only secret used to sign upload credentials. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct SigningSecret(String);

impl SigningSecret {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SigningSecret(***)")
    }
}

/// Hosting account settings shared by the credential endpoint and the client.
#[derive(Debug, Clone, PartialEq)]
pub struct HostingConfig {
    /// Public account (cloud) name.
    pub cloud_name: String,

    /// Public API key sent with every upload.
    pub api_key: String,

    /// Signing secret. Only the credential endpoint has one.
    pub api_secret: Option<SigningSecret>,

    /// Base URL of the upload API (default: `https://api.cloudinary.com`).
    pub upload_base_url: String,

    /// Base URL of the delivery network (default: `https://res.cloudinary.com`).
    pub delivery_base_url: String,

    /// Where the client fetches signed credentials.
    pub credential_url: String,

    /// Tag attached to every upload and used for listing (default: `video_review`).
    pub tag: String,

    pub signature_algorithm: SignatureAlgorithm,
}

impl HostingConfig {
    pub const DEFAULT_TAG: &'static str = "video_review";

    /// Load from the process environment.
    ///
    /// | Variable | Field |
    /// |---|---|
    /// | `CLOUDINARY_NAME` | `cloud_name` |
    /// | `CLOUDINARY_KEY` | `api_key` |
    /// | `CLOUDINARY_SECRET` | `api_secret` |
    /// | `CLOUDINARY_UPLOAD_URL` | `upload_base_url` |
    /// | `CLOUDINARY_DELIVERY_URL` | `delivery_base_url` |
    /// | `CLOUDINARY_SIGNATURE_ALGORITHM` | `signature_algorithm` (`sha1` / `sha256`) |
    /// | `VIDEO_REVIEW_CREDENTIAL_URL` | `credential_url` |
    pub fn from_env() -> Result<Self, HostingError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using `lookup` in place of the environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, HostingError> {
        let defaults = Self::default();
        let value = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let signature_algorithm = match value("CLOUDINARY_SIGNATURE_ALGORITHM") {
            Some(name) => name.parse()?,
            None => defaults.signature_algorithm,
        };

        Ok(Self {
            cloud_name: value("CLOUDINARY_NAME").unwrap_or(defaults.cloud_name),
            api_key: value("CLOUDINARY_KEY").unwrap_or(defaults.api_key),
            api_secret: value("CLOUDINARY_SECRET").map(SigningSecret::new),
            upload_base_url: value("CLOUDINARY_UPLOAD_URL").unwrap_or(defaults.upload_base_url),
            delivery_base_url: value("CLOUDINARY_DELIVERY_URL").unwrap_or(defaults.delivery_base_url),
            credential_url: value("VIDEO_REVIEW_CREDENTIAL_URL").unwrap_or(defaults.credential_url),
            tag: defaults.tag,
            signature_algorithm,
        })
    }

    /// Checks needed before uploading or listing.
    pub fn validate_client(&self) -> Result<(), HostingError> {
        if self.cloud_name.is_empty() {
            return Err(HostingError::Config("CLOUDINARY_NAME is not set".into()));
        }
        if self.api_key.is_empty() {
            return Err(HostingError::Config("CLOUDINARY_KEY is not set".into()));
        }
        for url in [&self.upload_base_url, &self.delivery_base_url, &self.credential_url] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(HostingError::Config(format!("not an http(s) URL: {}", url)));
            }
        }
        Ok(())
    }

    /// Checks needed before serving credentials.
    pub fn validate_server(&self) -> Result<(), HostingError> {
        if self.api_secret.is_none() {
            return Err(HostingError::Config("CLOUDINARY_SECRET is not set".into()));
        }
        Ok(())
    }

    pub fn upload_url(&self) -> String {
        format!(
            "{}/v1_1/{}/video/upload",
            self.upload_base_url.trim_end_matches('/'),
            self.cloud_name
        )
    }

    pub fn listing_url(&self) -> String {
        format!(
            "{}/{}/video/list/{}.json",
            self.delivery_base_url.trim_end_matches('/'),
            self.cloud_name,
            self.tag
        )
    }
}

impl Default for HostingConfig {
    fn default() -> Self {
        Self {
            cloud_name: String::new(),
            api_key: String::new(),
            api_secret: None,
            upload_base_url: "https://api.cloudinary.com".into(),
            delivery_base_url: "https://res.cloudinary.com".into(),
            credential_url: "http://127.0.0.1:3000/api/uploads".into(),
            tag: Self::DEFAULT_TAG.into(),
            signature_algorithm: SignatureAlgorithm::Sha1,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn loads_account_from_lookup() {
        let config = HostingConfig::from_lookup(lookup(&[
            ("CLOUDINARY_NAME", "demo"),
            ("CLOUDINARY_KEY", "123456"),
            ("CLOUDINARY_SECRET", "shh"),
        ]))
        .unwrap();

        assert_eq!(config.cloud_name, "demo");
        assert_eq!(config.api_secret.as_ref().map(|s| s.expose()), Some("shh"));
        assert_eq!(config.tag, "video_review");
        assert!(config.validate_client().is_ok());
        assert!(config.validate_server().is_ok());
    }

    #[test]
    fn builds_endpoint_urls() {
        let config = HostingConfig {
            cloud_name: "demo".into(),
            upload_base_url: "http://localhost:9000/".into(),
            ..Default::default()
        };

        assert_eq!(config.upload_url(), "http://localhost:9000/v1_1/demo/video/upload");
        assert_eq!(
            config.listing_url(),
            "https://res.cloudinary.com/demo/video/list/video_review.json"
        );
    }

    #[test]
    fn missing_values_fail_validation() {
        let config = HostingConfig::from_lookup(lookup(&[])).unwrap();
        assert!(config.validate_client().is_err());
        assert!(config.validate_server().is_err());
    }

    #[test]
    fn unknown_algorithm_is_rejected() {
        let result = HostingConfig::from_lookup(lookup(&[("CLOUDINARY_SIGNATURE_ALGORITHM", "md5")]));
        assert!(matches!(result, Err(HostingError::Config(_))));
    }

    #[test]
    fn secret_is_redacted_in_debug() {
        let secret = SigningSecret::new("hunter2");
        assert!(!format!("{:?}", secret).contains("hunter2"));
    }
}
