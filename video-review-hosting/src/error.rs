use thiserror::Error;

/// Errors from talking to the hosting service or issuing credentials.
///
/// The `Display` text is what the upload view shows to the user.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HostingError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("signing failed: {0}")]
    Signing(String),

    #[error("Error creating upload: {0}")]
    Credential(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("hosting service returned {status}: {message}")]
    Http { status: u16, message: String },

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("{0}")]
    Validation(String),

    #[error("an upload is already in progress")]
    UploadInProgress,
}

impl From<reqwest::Error> for HostingError {
    fn from(e: reqwest::Error) -> Self {
        Self::Network(e.to_string())
    }
}
