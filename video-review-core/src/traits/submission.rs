use crate::models::artifact::RecordedFile;

/// Receives the named file produced by `submit_recording`.
///
/// Handoff only: uploads run elsewhere and report their own outcome.
pub trait SubmissionHandler: Send + Sync {
    fn submit(&self, file: RecordedFile);
}
