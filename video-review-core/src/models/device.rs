use serde::{Deserialize, Serialize};

/// Kind of media device reported by enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaDeviceKind {
    VideoInput,
    AudioInput,
    AudioOutput,
}

/// A media device available to the platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaDeviceInfo {
    pub device_id: String,
    pub label: String,
    pub kind: MediaDeviceKind,
    pub group_id: Option<String>,
}

impl MediaDeviceInfo {
    pub fn new(device_id: impl Into<String>, label: impl Into<String>, kind: MediaDeviceKind) -> Self {
        Self {
            device_id: device_id.into(),
            label: label.into(),
            kind,
            group_id: None,
        }
    }
}

/// Input devices partitioned by kind. Output devices are not tracked.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceCapabilitySet {
    pub video: Vec<MediaDeviceInfo>,
    pub audio: Vec<MediaDeviceInfo>,
}

impl DeviceCapabilitySet {
    pub fn from_devices(devices: impl IntoIterator<Item = MediaDeviceInfo>) -> Self {
        let mut set = Self::default();
        for device in devices {
            match device.kind {
                MediaDeviceKind::VideoInput => set.video.push(device),
                MediaDeviceKind::AudioInput => set.audio.push(device),
                MediaDeviceKind::AudioOutput => {}
            }
        }
        set
    }

    pub fn is_empty(&self) -> bool {
        self.video.is_empty() && self.audio.is_empty()
    }
}

/// Kind of a live track inside a media stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrackKind {
    Video,
    Audio,
}

impl TrackKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Video => "video",
            Self::Audio => "audio",
        }
    }
}

/// A live track of an acquired stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaTrack {
    pub id: String,
    pub kind: TrackKind,
    pub label: String,
}
