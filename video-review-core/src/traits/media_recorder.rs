use std::sync::Arc;
use std::time::Duration;

use crate::models::artifact::MediaChunk;
use crate::models::error::CaptureError;
use crate::models::state::RecorderState;

/// Callback invoked when the recorder has a chunk available.
pub type ChunkCallback = Arc<dyn Fn(MediaChunk) + Send + Sync + 'static>;

/// Callback invoked once the recorder has fully stopped and flushed its last chunk.
pub type StopCallback = Arc<dyn Fn() + Send + Sync + 'static>;

/// A platform recorder that slices a stream into chunks.
///
/// `stop` is asynchronous: the final chunk and the stop callback may be
/// delivered after `stop` returns, possibly from another thread.
pub trait MediaRecorder: Send {
    fn state(&self) -> RecorderState;

    /// Replace the chunk callback.
    fn set_on_data_available(&mut self, callback: ChunkCallback);

    /// Replace the stop callback.
    fn set_on_stop(&mut self, callback: StopCallback);

    /// Begin recording, emitting a chunk every `timeslice`.
    fn start(&mut self, timeslice: Duration) -> Result<(), CaptureError>;

    /// Request the recorder to stop. Errors if it is already inactive.
    fn stop(&mut self) -> Result<(), CaptureError>;
}
