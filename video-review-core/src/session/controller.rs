use std::path::Path;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::models::artifact::{FinalArtifact, MediaChunk, RecordedFile};
use crate::models::config::SessionConfiguration;
use crate::models::device::DeviceCapabilitySet;
use crate::models::error::CaptureError;
use crate::models::state::{RecordingState, SessionDiagnostics};
use crate::processing::chunk_buffer::ChunkBuffer;
use crate::storage::export::{self, ExportedArtifact};
use crate::traits::media_devices::{MediaDevices, MediaStream};
use crate::traits::media_recorder::MediaRecorder;
use crate::traits::session_delegate::SessionDelegate;
use crate::traits::submission::SubmissionHandler;

/// Mutable session state shared with recorder callbacks.
struct SessionState {
    state: RecordingState,
    chunks: ChunkBuffer,
    artifact: Option<FinalArtifact>,
    is_reviewing: bool,
    /// Bumped on every start and cleanup. Callbacks carry the value they were
    /// registered with and are ignored once it no longer matches.
    generation: u64,
    diagnostics: SessionDiagnostics,
}

impl SessionState {
    fn new() -> Self {
        Self {
            state: RecordingState::Idle,
            chunks: ChunkBuffer::new(),
            artifact: None,
            is_reviewing: false,
            generation: 0,
            diagnostics: SessionDiagnostics::default(),
        }
    }

    fn append_chunk(&mut self, generation: u64, chunk: MediaChunk) {
        if generation != self.generation || !self.state.is_recording() {
            self.diagnostics.stale_chunks_dropped += 1;
            log::debug!("dropping chunk from inactive recording ({} bytes)", chunk.len());
            return;
        }
        let size = chunk.len() as u64;
        if self.chunks.push(chunk) {
            self.diagnostics.chunk_events += 1;
            self.diagnostics.bytes_buffered += size;
            log::debug!("added media recorder chunk {}", self.chunks.len());
        }
    }
}

/// Runs when the recorder reports that it has stopped and flushed.
fn finish_recording(
    session_state: &Mutex<SessionState>,
    generation: u64,
    mime_type: &str,
    delegate: Option<&dyn SessionDelegate>,
) {
    let artifact = {
        let mut s = session_state.lock();
        if s.generation != generation {
            log::debug!("ignoring stop notification from a stale recorder");
            return;
        }
        let artifact = FinalArtifact::new(s.chunks.assemble(), mime_type, s.chunks.len());
        s.artifact = Some(artifact.clone());
        s.is_reviewing = true;
        s.chunks.clear();
        s.state = RecordingState::Idle;
        s.diagnostics.recordings_completed += 1;
        artifact
    };

    log::info!(
        "recording stopped: {} bytes from {} chunks",
        artifact.len(),
        artifact.metadata.chunk_count
    );

    if let Some(delegate) = delegate {
        delegate.on_state_changed(RecordingState::Idle);
        delegate.on_review_ready(&artifact);
    }
}

/// Owns the device stream and the recording state machine.
///
/// Translates UI intents into transitions:
/// ```text
/// acquire_devices → start_recording → [chunks every timeslice] → stop_recording
///                                                                     ↓
///                                   submit_recording ← review ← artifact assembled
/// ```
///
/// Precondition failures are logged and returned as errors without touching
/// any state; nothing here retries.
pub struct RecordingController<D: MediaDevices> {
    devices: D,
    config: SessionConfiguration,
    capabilities: DeviceCapabilitySet,
    has_device_access: bool,
    stream: Option<D::Stream>,
    recorder: Option<D::Recorder>,
    session_state: Arc<Mutex<SessionState>>,
    delegate: Option<Arc<dyn SessionDelegate>>,
    submission: Option<Arc<dyn SubmissionHandler>>,
}

impl<D: MediaDevices> RecordingController<D> {
    pub fn new(devices: D) -> Self {
        Self {
            devices,
            config: SessionConfiguration::default(),
            capabilities: DeviceCapabilitySet::default(),
            has_device_access: false,
            stream: None,
            recorder: None,
            session_state: Arc::new(Mutex::new(SessionState::new())),
            delegate: None,
            submission: None,
        }
    }

    pub fn with_config(devices: D, config: SessionConfiguration) -> Result<Self, CaptureError> {
        let mut controller = Self::new(devices);
        controller.configure(config)?;
        Ok(controller)
    }

    pub fn set_delegate(&mut self, delegate: Arc<dyn SessionDelegate>) {
        self.delegate = Some(delegate);
    }

    pub fn set_submission_handler(&mut self, handler: Arc<dyn SubmissionHandler>) {
        self.submission = Some(handler);
    }

    /// Replace the session configuration. Only allowed while idle.
    pub fn configure(&mut self, config: SessionConfiguration) -> Result<(), CaptureError> {
        if self.state().is_recording() {
            return Err(CaptureError::ConfigurationFailed(
                "cannot reconfigure while recording".into(),
            ));
        }
        config.validate().map_err(CaptureError::ConfigurationFailed)?;
        self.config = config;
        Ok(())
    }

    pub fn config(&self) -> &SessionConfiguration {
        &self.config
    }

    pub fn state(&self) -> RecordingState {
        self.session_state.lock().state
    }

    pub fn is_reviewing(&self) -> bool {
        self.session_state.lock().is_reviewing
    }

    pub fn has_device_access(&self) -> bool {
        self.has_device_access
    }

    pub fn has_stream(&self) -> bool {
        self.stream.is_some()
    }

    pub fn devices(&self) -> &DeviceCapabilitySet {
        &self.capabilities
    }

    pub fn final_artifact(&self) -> Option<FinalArtifact> {
        self.session_state.lock().artifact.clone()
    }

    pub fn buffered_chunks(&self) -> usize {
        self.session_state.lock().chunks.len()
    }

    pub fn diagnostics(&self) -> SessionDiagnostics {
        self.session_state.lock().diagnostics.clone()
    }

    /// Re-enumerate input devices. Hook this to the platform's device-change event.
    pub fn refresh_devices(&mut self) -> Result<(), CaptureError> {
        let devices = self.devices.enumerate_devices().map_err(|e| {
            log::warn!("device enumeration failed: {}", e);
            self.report(e)
        })?;
        self.capabilities = DeviceCapabilitySet::from_devices(devices);
        log::debug!(
            "devices refreshed: {} video, {} audio",
            self.capabilities.video.len(),
            self.capabilities.audio.len()
        );
        if let Some(ref delegate) = self.delegate {
            delegate.on_devices_changed(&self.capabilities);
        }
        Ok(())
    }

    /// Enumerate devices and open a camera + microphone stream.
    ///
    /// Begins a new session: the review flag and any previous artifact are
    /// discarded once the new stream is in hand. On failure nothing changes.
    pub fn acquire_devices(&mut self) -> Result<(), CaptureError> {
        if !self.devices.is_available() {
            log::warn!("media devices not available on this platform");
            return self.refuse(CaptureError::DeviceNotAvailable);
        }
        if self.state().is_recording() {
            log::warn!("cannot acquire devices while recording");
            return self.refuse(CaptureError::AlreadyRecording);
        }

        self.refresh_devices()?;

        log::info!("requesting user media with constraints {:?}", self.config.constraints);
        let stream = self
            .devices
            .get_user_media(&self.config.constraints)
            .map_err(|e| {
                log::warn!("failed to acquire user media: {}", e);
                self.report(e)
            })?;

        self.release_stream();
        self.stream = Some(stream);
        self.has_device_access = true;

        let mut s = self.session_state.lock();
        s.is_reviewing = false;
        s.artifact = None;
        Ok(())
    }

    /// Start buffering chunks from the held stream. Transitions: idle → recording.
    pub fn start_recording(&mut self) -> Result<(), CaptureError> {
        {
            let s = self.session_state.lock();
            if s.state.is_recording() {
                drop(s);
                log::warn!("already recording");
                return self.refuse(CaptureError::AlreadyRecording);
            }
            if s.is_reviewing {
                drop(s);
                log::warn!("cannot start recording while reviewing the last recording");
                return self.refuse(CaptureError::ReviewPending);
            }
        }

        let Some(stream) = self.stream.as_ref() else {
            log::warn!("cannot record without a stream");
            return self.refuse(CaptureError::StreamUnavailable);
        };

        let mut recorder = self.devices.create_recorder(stream).map_err(|e| {
            log::error!("failed to create recorder: {}", e);
            self.report(e)
        })?;

        let generation = {
            let mut s = self.session_state.lock();
            s.generation += 1;
            s.chunks.clear();
            s.generation
        };

        let state = Arc::clone(&self.session_state);
        recorder.set_on_data_available(Arc::new(move |chunk: MediaChunk| {
            state.lock().append_chunk(generation, chunk);
        }));

        // Accept chunks before the recorder can deliver its first one; the
        // delegate only hears about Recording once the start succeeded.
        self.session_state.lock().state = RecordingState::Recording;

        if let Err(e) = recorder.start(self.config.timeslice) {
            log::error!("failed to start recorder: {}", e);
            self.session_state.lock().state = RecordingState::Idle;
            return Err(self.report(e));
        }

        log::info!("recording started (timeslice {:?})", self.config.timeslice);
        self.recorder = Some(recorder);
        self.set_state(RecordingState::Recording);
        Ok(())
    }

    /// Stop the recorder and release the stream.
    ///
    /// The artifact is assembled when the recorder reports completion, which
    /// may happen after this returns.
    pub fn stop_recording(&mut self) -> Result<(), CaptureError> {
        match self.recorder.as_ref().map(|r| r.state()) {
            None => {
                log::warn!("cannot stop recording without a recorder");
                return self.refuse(CaptureError::NoActiveRecorder);
            }
            Some(state) if state.is_inactive() => {
                log::warn!("cannot stop recording, recorder is already inactive");
                return self.refuse(CaptureError::NoActiveRecorder);
            }
            Some(_) => {}
        }

        let generation = self.session_state.lock().generation;
        let state = Arc::clone(&self.session_state);
        let delegate = self.delegate.clone();
        let mime_type = self.config.artifact_mime_type.clone();

        let result = match self.recorder.as_mut() {
            Some(recorder) => {
                recorder.set_on_stop(Arc::new(move || {
                    finish_recording(&state, generation, &mime_type, delegate.as_deref());
                }));
                recorder.stop()
            }
            None => Ok(()),
        };

        self.release_stream();

        result.map_err(|e| {
            log::error!("failed to stop recorder: {}", e);
            self.report(e)
        })
    }

    /// Wrap the artifact into a named file and hand it to the submission handler.
    pub fn submit_recording(&self) -> Result<RecordedFile, CaptureError> {
        let artifact = self.session_state.lock().artifact.clone();
        let Some(artifact) = artifact else {
            log::warn!("cannot submit recording without an artifact");
            return Err(self.report(CaptureError::NoArtifact));
        };

        let file = artifact.to_file(&self.config.artifact_file_name);
        match self.submission {
            Some(ref handler) => {
                log::info!("submitting {} ({} bytes)", file.name, file.bytes.len());
                handler.submit(file.clone());
            }
            None => log::warn!("no submission handler installed, recording not handed off"),
        }
        Ok(file)
    }

    /// Save the artifact under `directory`, named after the configured file name.
    pub fn export_recording(&self, directory: &Path) -> Result<ExportedArtifact, CaptureError> {
        let artifact = self.session_state.lock().artifact.clone();
        let Some(artifact) = artifact else {
            log::warn!("cannot export recording without an artifact");
            return Err(self.report(CaptureError::NoArtifact));
        };
        export::export_artifact(&artifact, directory, &self.config.artifact_file_name)
    }

    /// Stop any active recording without producing an artifact.
    ///
    /// Safe to call repeatedly. An inactive recorder is not stopped again.
    pub fn cleanup(&mut self) {
        log::debug!("cleanup");
        if let Some(recorder) = self.recorder.as_mut() {
            if recorder.state().is_inactive() {
                log::debug!("skipping recorder stop, recorder is already inactive");
            } else {
                recorder.set_on_stop(Arc::new(|| log::debug!("recorder cleanup")));
                if let Err(e) = recorder.stop() {
                    log::warn!("failed to stop recorder during cleanup: {}", e);
                }
            }
        }

        let was_recording = {
            let mut s = self.session_state.lock();
            s.generation += 1;
            s.chunks.clear();
            std::mem::replace(&mut s.state, RecordingState::Idle).is_recording()
        };
        if was_recording {
            if let Some(ref delegate) = self.delegate {
                delegate.on_state_changed(RecordingState::Idle);
            }
        }
    }

    /// Stop every track of the held stream and drop it.
    pub fn release_stream(&mut self) {
        let Some(mut stream) = self.stream.take() else {
            return;
        };
        for track in stream.tracks() {
            log::debug!("stopping track {} {}", track.kind.as_str(), track.label);
            stream.stop_track(&track.id);
        }
    }

    /// Cleanup and release the stream.
    pub fn shutdown(&mut self) {
        self.cleanup();
        self.release_stream();
    }

    // --- Internal helpers ---

    fn set_state(&self, new_state: RecordingState) {
        self.session_state.lock().state = new_state;
        if let Some(ref delegate) = self.delegate {
            delegate.on_state_changed(new_state);
        }
    }

    fn report(&self, error: CaptureError) -> CaptureError {
        if let Some(ref delegate) = self.delegate {
            delegate.on_error(&error);
        }
        error
    }

    fn refuse(&self, error: CaptureError) -> Result<(), CaptureError> {
        Err(self.report(error))
    }
}

impl<D: MediaDevices> Drop for RecordingController<D> {
    fn drop(&mut self) {
        self.shutdown();
    }
}
