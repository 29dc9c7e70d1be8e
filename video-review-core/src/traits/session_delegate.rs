use crate::models::artifact::FinalArtifact;
use crate::models::device::DeviceCapabilitySet;
use crate::models::error::CaptureError;
use crate::models::state::RecordingState;

/// Event delegate for recording session notifications.
///
/// Methods may be called from the recorder's callback thread.
/// Implementations should marshal to the UI thread if needed.
pub trait SessionDelegate: Send + Sync {
    /// Called when the recording state changes.
    fn on_state_changed(&self, state: RecordingState);

    /// Called when the device list is refreshed.
    fn on_devices_changed(&self, devices: &DeviceCapabilitySet);

    /// Called when a stopped recording is ready for review.
    fn on_review_ready(&self, artifact: &FinalArtifact);

    /// Called when an operation fails or is refused.
    fn on_error(&self, error: &CaptureError);
}
