//! Request signing for the hosting service's signed uploads.
//!
//! The string to sign is every parameter except the excluded ones, sorted by
//! key, as `key=value` pairs joined with `&`. The secret is appended and the
//! whole string hashed:
//!
//! ```text
//! tags=video_review&timestamp=1700000000{secret} --sha1--> hex signature
//! ```

use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sha1::Sha1;
use sha2::{Digest, Sha256};

use crate::config::SigningSecret;
use crate::error::HostingError;

/// Parameters the service never includes in the signature.
const UNSIGNED_PARAMS: [&str; 4] = ["file", "cloud_name", "resource_type", "api_key"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SignatureAlgorithm {
    #[default]
    Sha1,
    Sha256,
}

impl FromStr for SignatureAlgorithm {
    type Err = HostingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sha1" => Ok(Self::Sha1),
            "sha256" => Ok(Self::Sha256),
            other => Err(HostingError::Config(format!("unsupported signature algorithm: {}", other))),
        }
    }
}

/// A timestamp + signature pair authorizing one upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedCredential {
    pub timestamp: i64,
    pub signature: String,
}

/// Build the canonical string to sign.
pub fn string_to_sign(params: &BTreeMap<String, String>) -> String {
    params
        .iter()
        .filter(|(key, value)| !value.is_empty() && !UNSIGNED_PARAMS.contains(&key.as_str()))
        .map(|(key, value)| format!("{}={}", key, value))
        .collect::<Vec<_>>()
        .join("&")
}

/// Sign `params` with `secret`, returning a lowercase hex digest.
pub fn sign_params(params: &BTreeMap<String, String>, secret: &SigningSecret, algorithm: SignatureAlgorithm) -> String {
    let payload = format!("{}{}", string_to_sign(params), secret.expose());
    match algorithm {
        SignatureAlgorithm::Sha1 => hex_encode(&Sha1::digest(payload.as_bytes())),
        SignatureAlgorithm::Sha256 => hex_encode(&Sha256::digest(payload.as_bytes())),
    }
}

fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Issues upload credentials bound to a tag.
#[derive(Debug, Clone)]
pub struct CredentialSigner {
    secret: Option<SigningSecret>,
    tag: String,
    algorithm: SignatureAlgorithm,
}

impl CredentialSigner {
    pub fn new(secret: Option<SigningSecret>, tag: impl Into<String>, algorithm: SignatureAlgorithm) -> Self {
        Self {
            secret,
            tag: tag.into(),
            algorithm,
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Issue a credential stamped with the current time.
    pub fn issue(&self) -> Result<SignedCredential, HostingError> {
        self.issue_at(chrono::Utc::now().timestamp())
    }

    /// Issue a credential for a fixed unix timestamp (seconds).
    pub fn issue_at(&self, timestamp: i64) -> Result<SignedCredential, HostingError> {
        let secret = self
            .secret
            .as_ref()
            .ok_or_else(|| HostingError::Signing("signing secret is not configured".into()))?;

        let params = BTreeMap::from([
            ("timestamp".to_string(), timestamp.to_string()),
            ("tags".to_string(), self.tag.clone()),
        ]);

        Ok(SignedCredential {
            timestamp,
            signature: sign_params(&params, secret, self.algorithm),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn matches_documented_signature() {
        let p = params(&[
            ("public_id", "sample_image"),
            ("timestamp", "1315060510"),
            ("eager", "w_400,h_300,c_pad|w_260,h_200,c_crop"),
        ]);
        let signature = sign_params(&p, &SigningSecret::new("abcd"), SignatureAlgorithm::Sha1);
        assert_eq!(signature, "bfd09f95f331f558cbd1320e67aa8d488770583e");
    }

    #[test]
    fn excluded_and_empty_params_are_not_signed() {
        let p = params(&[
            ("timestamp", "1"),
            ("api_key", "123"),
            ("file", "blob"),
            ("resource_type", "video"),
            ("cloud_name", "demo"),
            ("folder", ""),
        ]);
        assert_eq!(string_to_sign(&p), "timestamp=1");
    }

    #[test]
    fn issue_signs_tag_and_timestamp() {
        let signer = CredentialSigner::new(
            Some(SigningSecret::new("s3cr3t")),
            "video_review",
            SignatureAlgorithm::Sha1,
        );
        let credential = signer.issue_at(1_700_000_000).unwrap();

        assert_eq!(credential.timestamp, 1_700_000_000);
        assert_eq!(credential.signature, "e6f4d0a98cc080c186124711c49e73fb59548bdd");
    }

    #[test]
    fn sha256_signatures() {
        let signer = CredentialSigner::new(
            Some(SigningSecret::new("s3cr3t")),
            "video_review",
            SignatureAlgorithm::Sha256,
        );
        assert_eq!(
            signer.issue_at(1_700_000_000).unwrap().signature,
            "b9cc73eec4da2a4a3145fb57af3e8800279ec7cf0db6eb19688ab7b775bef364"
        );
    }

    #[test]
    fn missing_secret_fails() {
        let signer = CredentialSigner::new(None, "video_review", SignatureAlgorithm::Sha1);
        assert!(matches!(signer.issue(), Err(HostingError::Signing(_))));
    }

    #[test]
    fn parses_algorithm_names() {
        assert_eq!("SHA256".parse::<SignatureAlgorithm>().unwrap(), SignatureAlgorithm::Sha256);
        assert_eq!("sha1".parse::<SignatureAlgorithm>().unwrap(), SignatureAlgorithm::Sha1);
        assert!("md5".parse::<SignatureAlgorithm>().is_err());
    }
}
