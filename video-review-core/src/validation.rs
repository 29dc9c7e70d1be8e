//! Client-side duration check run before an upload.
//!
//! Advisory only: anything that cannot be measured is allowed through.

use crate::models::artifact::RecordedFile;
use crate::models::config::SessionConfiguration;
use crate::traits::media_probe::{MediaProbe, ProbedDuration};

/// Outcome of validating a file before upload.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationOutcome {
    /// Duration measured and within the ceiling.
    Pass,
    /// Duration measured and over the ceiling. Blocks the upload.
    Fail(String),
    /// Duration could not be determined; the upload is allowed anyway.
    Indeterminate(String),
}

impl ValidationOutcome {
    pub fn allows_upload(&self) -> bool {
        !matches!(self, Self::Fail(_))
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Pass => None,
            Self::Fail(reason) | Self::Indeterminate(reason) => Some(reason),
        }
    }
}

/// Check that `file` is no longer than the ceiling in `config`.
pub fn validate_duration(file: &RecordedFile, probe: &dyn MediaProbe, config: &SessionConfiguration) -> ValidationOutcome {
    if !file.looks_like_video() {
        let reason = format!("file type ({}) does not look like video!", file.mime_type);
        log::warn!("{}", reason);
        return ValidationOutcome::Indeterminate(reason);
    }

    let duration = match probe.probe_duration(file) {
        Ok(ProbedDuration::Finite(secs)) => secs,
        Ok(ProbedDuration::Unbounded) => {
            log::warn!("video file reports an unbounded duration, skipping length check");
            return ValidationOutcome::Indeterminate("duration is unbounded".into());
        }
        Err(e) => {
            log::warn!("failed to load video file metadata for validation: {}", e);
            return ValidationOutcome::Indeterminate(format!("failed to load video file metadata: {}", e));
        }
    };

    if duration > config.max_duration_secs() {
        let rounded = (duration * 100.0).round() / 100.0;
        return ValidationOutcome::Fail(format!(
            "file duration ({}s) exceeds allowed maximum ({}min)!",
            rounded, config.max_duration_mins
        ));
    }

    ValidationOutcome::Pass
}
