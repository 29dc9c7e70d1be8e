//! # video-review-core
//!
//! Platform-agnostic recording session core.
//!
//! Owns the recording state machine, chunk buffering, artifact assembly,
//! pre-upload validation and export. Platform media layers implement the
//! `MediaDevices` / `MediaRecorder` traits and plug into the generic
//! `RecordingController`.
//!
//! ## Architecture
//!
//! ```text
//! video-review-core (this crate)
//! ├── traits/       ← MediaDevices, MediaStream, MediaRecorder, MediaProbe, SessionDelegate, SubmissionHandler
//! ├── models/       ← CaptureError, RecordingState, SessionConfiguration, FinalArtifact, devices
//! ├── processing/   ← ChunkBuffer, MP4 duration probe
//! ├── session/      ← RecordingController (generic orchestrator)
//! ├── storage/      ← artifact export, metadata sidecar
//! └── validation    ← duration ceiling check
//! ```

pub mod models;
pub mod processing;
pub mod session;
pub mod storage;
pub mod traits;
pub mod validation;

// Re-export key types at crate root for convenience.
pub use models::artifact::{ArtifactMetadata, FinalArtifact, MediaChunk, RecordedFile};
pub use models::config::{MediaConstraints, SessionConfiguration};
pub use models::device::{DeviceCapabilitySet, MediaDeviceInfo, MediaDeviceKind, MediaTrack, TrackKind};
pub use models::error::CaptureError;
pub use models::state::{RecorderState, RecordingState, SessionDiagnostics};
pub use processing::chunk_buffer::ChunkBuffer;
pub use processing::mp4_probe::Mp4DurationProbe;
pub use session::controller::RecordingController;
pub use storage::export::{export_artifact, ExportedArtifact};
pub use traits::media_devices::{MediaDevices, MediaStream};
pub use traits::media_probe::{MediaProbe, ProbedDuration};
pub use traits::media_recorder::{ChunkCallback, MediaRecorder, StopCallback};
pub use traits::session_delegate::SessionDelegate;
pub use traits::submission::SubmissionHandler;
pub use validation::{validate_duration, ValidationOutcome};
