use crate::models::config::MediaConstraints;
use crate::models::device::{MediaDeviceInfo, MediaTrack};
use crate::models::error::CaptureError;
use crate::traits::media_recorder::MediaRecorder;

/// A live camera/microphone stream.
pub trait MediaStream: Send {
    /// Live tracks carried by the stream.
    fn tracks(&self) -> Vec<MediaTrack>;

    /// Stop a single track. Stopped tracks are no longer reported by `tracks`.
    fn stop_track(&mut self, track_id: &str);
}

/// Interface for the platform media layer.
///
/// Implemented by whatever hosts the capture pipeline (a browser bridge,
/// a native camera backend, or the fakes used in tests).
pub trait MediaDevices: Send + Sync {
    type Stream: MediaStream;
    type Recorder: MediaRecorder;

    /// Whether the platform exposes media devices at all.
    fn is_available(&self) -> bool;

    /// List every media device known to the platform.
    fn enumerate_devices(&self) -> Result<Vec<MediaDeviceInfo>, CaptureError>;

    /// Request a combined stream matching `constraints`.
    fn get_user_media(&self, constraints: &MediaConstraints) -> Result<Self::Stream, CaptureError>;

    /// Create a recorder over `stream`. The recorder is returned inactive.
    fn create_recorder(&self, stream: &Self::Stream) -> Result<Self::Recorder, CaptureError>;
}
