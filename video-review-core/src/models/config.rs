use std::time::Duration;

/// Capture constraints passed to the platform when acquiring a stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MediaConstraints {
    pub video: bool,
    pub audio: bool,
}

impl Default for MediaConstraints {
    fn default() -> Self {
        Self {
            video: true,
            audio: true,
        }
    }
}

/// Configuration for a recording session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfiguration {
    /// Constraints used by `acquire_devices` (default: audio + video).
    pub constraints: MediaConstraints,

    /// Interval at which the recorder emits chunks (default: 2000 ms).
    pub timeslice: Duration,

    /// MIME type of the assembled artifact (default: `video/mp4`).
    pub artifact_mime_type: String,

    /// File name given to the artifact on submission.
    pub artifact_file_name: String,

    /// Longest clip accepted for upload, in minutes (default: 1).
    pub max_duration_mins: u32,
}

impl SessionConfiguration {
    pub const DEFAULT_TIMESLICE: Duration = Duration::from_millis(2000);

    pub fn validate(&self) -> Result<(), String> {
        if !self.constraints.video && !self.constraints.audio {
            return Err("at least one of video or audio must be requested".into());
        }
        if self.timeslice.is_zero() {
            return Err("timeslice must be positive".into());
        }
        if self.artifact_mime_type.trim().is_empty() {
            return Err("artifact MIME type must not be empty".into());
        }
        if self.artifact_file_name.trim().is_empty() {
            return Err("artifact file name must not be empty".into());
        }
        if self.max_duration_mins == 0 {
            return Err("max duration must be at least one minute".into());
        }
        Ok(())
    }

    /// The duration ceiling in seconds.
    pub fn max_duration_secs(&self) -> f64 {
        f64::from(self.max_duration_mins) * 60.0
    }
}

impl Default for SessionConfiguration {
    fn default() -> Self {
        Self {
            constraints: MediaConstraints::default(),
            timeslice: Self::DEFAULT_TIMESLICE,
            artifact_mime_type: "video/mp4".into(),
            artifact_file_name: "video-from-camera".into(),
            max_duration_mins: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        let config = SessionConfiguration::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.timeslice, Duration::from_millis(2000));
        assert_eq!(config.max_duration_secs(), 60.0);
    }

    #[test]
    fn rejects_empty_constraints() {
        let config = SessionConfiguration {
            constraints: MediaConstraints {
                video: false,
                audio: false,
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_zero_timeslice() {
        let config = SessionConfiguration {
            timeslice: Duration::ZERO,
            ..Default::default()
        };
        assert_eq!(config.validate().unwrap_err(), "timeslice must be positive");
    }
}
