use crate::models::artifact::RecordedFile;
use crate::models::error::CaptureError;

/// Duration reported by a metadata probe.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProbedDuration {
    Finite(f64),
    /// The container does not declare a length (live or fragmented output).
    Unbounded,
}

/// Loads just enough of a file to read its playable duration.
pub trait MediaProbe: Send + Sync {
    fn probe_duration(&self, file: &RecordedFile) -> Result<ProbedDuration, CaptureError>;
}
