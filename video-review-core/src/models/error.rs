use thiserror::Error;

/// Errors that can occur while driving a recording session.
///
/// Precondition failures (`AlreadyRecording`, `ReviewPending`,
/// `NoActiveRecorder`, `NoArtifact`) leave the session untouched; callers
/// are expected to log and carry on.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CaptureError {
    #[error("permission denied")]
    PermissionDenied,

    #[error("device not available")]
    DeviceNotAvailable,

    #[error("no active media stream")]
    StreamUnavailable,

    #[error("already recording")]
    AlreadyRecording,

    #[error("cannot start recording while reviewing the last recording")]
    ReviewPending,

    #[error("no active recorder")]
    NoActiveRecorder,

    #[error("no recorded artifact to submit")]
    NoArtifact,

    #[error("recorder failed: {0}")]
    RecorderFailed(String),

    #[error("configuration failed: {0}")]
    ConfigurationFailed(String),

    #[error("storage error: {0}")]
    StorageError(String),

    #[error("metadata probe failed: {0}")]
    ProbeFailed(String),

    #[error("unknown error: {0}")]
    Unknown(String),
}
