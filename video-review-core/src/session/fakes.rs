//! In-memory media devices for tests.
//!
//! The fake recorder never emits on its own: tests push chunks with
//! [`FakeRecorderHandle::emit`] and decide when the stop notification lands
//! with [`FakeRecorderHandle::complete_stop`] (or enable auto-completion).

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use crate::models::artifact::{FinalArtifact, MediaChunk, RecordedFile};
use crate::models::config::MediaConstraints;
use crate::models::device::{DeviceCapabilitySet, MediaDeviceInfo, MediaDeviceKind, MediaTrack, TrackKind};
use crate::models::error::CaptureError;
use crate::models::state::{RecorderState, RecordingState};
use crate::traits::media_devices::{MediaDevices, MediaStream};
use crate::traits::media_recorder::{ChunkCallback, MediaRecorder, StopCallback};
use crate::traits::session_delegate::SessionDelegate;
use crate::traits::submission::SubmissionHandler;

// --- Stream ---

#[derive(Debug)]
struct StreamShared {
    tracks: Vec<(MediaTrack, bool)>,
}

/// Stream handed out by [`FakeMediaDevices`].
pub struct FakeStream {
    shared: Arc<Mutex<StreamShared>>,
}

impl MediaStream for FakeStream {
    fn tracks(&self) -> Vec<MediaTrack> {
        self.shared
            .lock()
            .tracks
            .iter()
            .filter(|(_, stopped)| !stopped)
            .map(|(track, _)| track.clone())
            .collect()
    }

    fn stop_track(&mut self, track_id: &str) {
        for (track, stopped) in self.shared.lock().tracks.iter_mut() {
            if track.id == track_id {
                *stopped = true;
            }
        }
    }
}

/// Test-side view of a [`FakeStream`].
#[derive(Clone)]
pub struct FakeStreamHandle {
    shared: Arc<Mutex<StreamShared>>,
}

impl FakeStreamHandle {
    pub fn live_tracks(&self) -> Vec<MediaTrack> {
        FakeStream {
            shared: Arc::clone(&self.shared),
        }
        .tracks()
    }
}

// --- Recorder ---

struct RecorderShared {
    state: RecorderState,
    on_data: Option<ChunkCallback>,
    on_stop: Option<StopCallback>,
    timeslice: Option<Duration>,
    stop_calls: usize,
    fail_start: bool,
    auto_complete_stop: bool,
}

/// Recorder handed out by [`FakeMediaDevices`].
pub struct FakeRecorder {
    shared: Arc<Mutex<RecorderShared>>,
}

impl MediaRecorder for FakeRecorder {
    fn state(&self) -> RecorderState {
        self.shared.lock().state
    }

    fn set_on_data_available(&mut self, callback: ChunkCallback) {
        self.shared.lock().on_data = Some(callback);
    }

    fn set_on_stop(&mut self, callback: StopCallback) {
        self.shared.lock().on_stop = Some(callback);
    }

    fn start(&mut self, timeslice: Duration) -> Result<(), CaptureError> {
        let mut s = self.shared.lock();
        if s.fail_start {
            return Err(CaptureError::RecorderFailed("unsupported codec".into()));
        }
        if !s.state.is_inactive() {
            return Err(CaptureError::RecorderFailed("recorder is already started".into()));
        }
        s.state = RecorderState::Recording;
        s.timeslice = Some(timeslice);
        Ok(())
    }

    fn stop(&mut self) -> Result<(), CaptureError> {
        let on_stop = {
            let mut s = self.shared.lock();
            if s.state.is_inactive() {
                return Err(CaptureError::RecorderFailed("recorder is inactive".into()));
            }
            s.state = RecorderState::Inactive;
            s.stop_calls += 1;
            if s.auto_complete_stop {
                s.on_stop.clone()
            } else {
                None
            }
        };
        if let Some(callback) = on_stop {
            callback();
        }
        Ok(())
    }
}

/// Test-side view of a [`FakeRecorder`].
#[derive(Clone)]
pub struct FakeRecorderHandle {
    shared: Arc<Mutex<RecorderShared>>,
}

impl FakeRecorderHandle {
    /// Deliver a chunk through the registered data callback.
    pub fn emit(&self, data: Vec<u8>) {
        let callback = self.shared.lock().on_data.clone();
        if let Some(callback) = callback {
            callback(MediaChunk::new(data));
        }
    }

    /// Deliver the stop notification through the registered stop callback.
    pub fn complete_stop(&self) {
        let callback = self.shared.lock().on_stop.clone();
        if let Some(callback) = callback {
            callback();
        }
    }

    pub fn state(&self) -> RecorderState {
        self.shared.lock().state
    }

    pub fn stop_calls(&self) -> usize {
        self.shared.lock().stop_calls
    }

    pub fn timeslice(&self) -> Option<Duration> {
        self.shared.lock().timeslice
    }
}

// --- Devices ---

struct DevicesShared {
    available: bool,
    permission_denied: bool,
    fail_recorder_start: bool,
    auto_complete_stop: bool,
    devices: Vec<MediaDeviceInfo>,
    streams: Vec<FakeStreamHandle>,
    recorders: Vec<FakeRecorderHandle>,
}

/// Cloneable fake media layer. Clones share the same state, so a test can
/// keep one clone while the controller owns another.
#[derive(Clone)]
pub struct FakeMediaDevices {
    shared: Arc<Mutex<DevicesShared>>,
}

impl Default for FakeMediaDevices {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeMediaDevices {
    /// One camera, one microphone and one output device.
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Mutex::new(DevicesShared {
                available: true,
                permission_denied: false,
                fail_recorder_start: false,
                auto_complete_stop: false,
                devices: vec![
                    MediaDeviceInfo::new("cam-1", "Camera", MediaDeviceKind::VideoInput),
                    MediaDeviceInfo::new("mic-1", "Microphone", MediaDeviceKind::AudioInput),
                    MediaDeviceInfo::new("spk-1", "Speakers", MediaDeviceKind::AudioOutput),
                ],
                streams: Vec::new(),
                recorders: Vec::new(),
            })),
        }
    }

    pub fn set_available(&self, available: bool) {
        self.shared.lock().available = available;
    }

    pub fn deny_permission(&self) {
        self.shared.lock().permission_denied = true;
    }

    pub fn fail_recorder_start(&self) {
        self.shared.lock().fail_recorder_start = true;
    }

    /// Fire the stop callback from inside `stop`, as soon as it is called.
    pub fn set_auto_complete_stop(&self, enabled: bool) {
        let mut s = self.shared.lock();
        s.auto_complete_stop = enabled;
        for recorder in &s.recorders {
            recorder.shared.lock().auto_complete_stop = enabled;
        }
    }

    pub fn set_devices(&self, devices: Vec<MediaDeviceInfo>) {
        self.shared.lock().devices = devices;
    }

    /// Open a stream directly, bypassing permission checks.
    pub fn open_stream(&self) -> FakeStream {
        let shared = Arc::new(Mutex::new(StreamShared {
            tracks: vec![
                (
                    MediaTrack {
                        id: "video-0".into(),
                        kind: TrackKind::Video,
                        label: "Camera".into(),
                    },
                    false,
                ),
                (
                    MediaTrack {
                        id: "audio-0".into(),
                        kind: TrackKind::Audio,
                        label: "Microphone".into(),
                    },
                    false,
                ),
            ],
        }));
        self.shared.lock().streams.push(FakeStreamHandle {
            shared: Arc::clone(&shared),
        });
        FakeStream { shared }
    }

    pub fn stream(&self, index: usize) -> FakeStreamHandle {
        self.shared.lock().streams[index].clone()
    }

    pub fn recorder(&self, index: usize) -> FakeRecorderHandle {
        self.shared.lock().recorders[index].clone()
    }

    pub fn recorder_count(&self) -> usize {
        self.shared.lock().recorders.len()
    }
}

impl MediaDevices for FakeMediaDevices {
    type Stream = FakeStream;
    type Recorder = FakeRecorder;

    fn is_available(&self) -> bool {
        self.shared.lock().available
    }

    fn enumerate_devices(&self) -> Result<Vec<MediaDeviceInfo>, CaptureError> {
        Ok(self.shared.lock().devices.clone())
    }

    fn get_user_media(&self, constraints: &MediaConstraints) -> Result<FakeStream, CaptureError> {
        {
            let s = self.shared.lock();
            if s.permission_denied {
                return Err(CaptureError::PermissionDenied);
            }
            let set = DeviceCapabilitySet::from_devices(s.devices.clone());
            if (constraints.video && set.video.is_empty()) || (constraints.audio && set.audio.is_empty()) {
                return Err(CaptureError::DeviceNotAvailable);
            }
        }
        Ok(self.open_stream())
    }

    fn create_recorder(&self, _stream: &FakeStream) -> Result<FakeRecorder, CaptureError> {
        let mut s = self.shared.lock();
        let shared = Arc::new(Mutex::new(RecorderShared {
            state: RecorderState::Inactive,
            on_data: None,
            on_stop: None,
            timeslice: None,
            stop_calls: 0,
            fail_start: s.fail_recorder_start,
            auto_complete_stop: s.auto_complete_stop,
        }));
        s.recorders.push(FakeRecorderHandle {
            shared: Arc::clone(&shared),
        });
        Ok(FakeRecorder { shared })
    }
}

// --- Collaborators ---

/// Delegate that records every notification.
#[derive(Default)]
pub struct RecordingDelegate {
    states: Mutex<Vec<RecordingState>>,
    errors: Mutex<Vec<CaptureError>>,
    reviews: Mutex<Vec<FinalArtifact>>,
    device_refreshes: Mutex<usize>,
}

impl RecordingDelegate {
    pub fn states(&self) -> Vec<RecordingState> {
        self.states.lock().clone()
    }

    pub fn errors(&self) -> Vec<CaptureError> {
        self.errors.lock().clone()
    }

    pub fn reviews(&self) -> usize {
        self.reviews.lock().len()
    }

    pub fn device_refreshes(&self) -> usize {
        *self.device_refreshes.lock()
    }
}

impl SessionDelegate for RecordingDelegate {
    fn on_state_changed(&self, state: RecordingState) {
        self.states.lock().push(state);
    }

    fn on_devices_changed(&self, _devices: &DeviceCapabilitySet) {
        *self.device_refreshes.lock() += 1;
    }

    fn on_review_ready(&self, artifact: &FinalArtifact) {
        self.reviews.lock().push(artifact.clone());
    }

    fn on_error(&self, error: &CaptureError) {
        self.errors.lock().push(error.clone());
    }
}

/// Submission handler that keeps every file it receives.
#[derive(Default)]
pub struct CollectingSubmission {
    files: Mutex<Vec<RecordedFile>>,
}

impl CollectingSubmission {
    pub fn files(&self) -> Vec<RecordedFile> {
        self.files.lock().clone()
    }
}

impl SubmissionHandler for CollectingSubmission {
    fn submit(&self, file: RecordedFile) {
        self.files.lock().push(file);
    }
}
