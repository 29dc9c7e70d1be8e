/// Recording session state machine.
///
/// State transitions:
/// ```text
/// idle --start--> recording --stop--> idle (review flag raised, artifact produced)
///                     |
///                  cleanup --> idle
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecordingState {
    #[default]
    Idle,
    Recording,
}

impl RecordingState {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn is_recording(&self) -> bool {
        matches!(self, Self::Recording)
    }
}

/// State reported by a platform recorder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecorderState {
    Inactive,
    Recording,
    Paused,
}

impl RecorderState {
    pub fn is_inactive(&self) -> bool {
        matches!(self, Self::Inactive)
    }
}

/// Counters for debugging recording sessions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionDiagnostics {
    pub chunk_events: u64,
    pub bytes_buffered: u64,
    pub stale_chunks_dropped: u64,
    pub recordings_completed: u64,
}
