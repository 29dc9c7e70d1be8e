use serde::{Deserialize, Serialize};

/// A binary fragment emitted by the recorder during capture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaChunk {
    pub data: Vec<u8>,
}

impl MediaChunk {
    pub fn new(data: impl Into<Vec<u8>>) -> Self {
        Self { data: data.into() }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// The single blob assembled from the chunk buffer when a recording stops.
#[derive(Debug, Clone, PartialEq)]
pub struct FinalArtifact {
    pub bytes: Vec<u8>,
    pub mime_type: String,
    pub metadata: ArtifactMetadata,
}

impl FinalArtifact {
    pub fn new(bytes: Vec<u8>, mime_type: &str, chunk_count: usize) -> Self {
        let metadata = ArtifactMetadata {
            id: uuid::Uuid::new_v4().to_string(),
            mime_type: mime_type.to_string(),
            size_bytes: bytes.len() as u64,
            chunk_count,
            created_at: chrono::Utc::now().to_rfc3339(),
            checksum: None,
        };
        Self {
            bytes,
            mime_type: mime_type.to_string(),
            metadata,
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Wrap the artifact into a named file ready for upload.
    pub fn to_file(&self, name: &str) -> RecordedFile {
        RecordedFile {
            name: name.to_string(),
            mime_type: self.mime_type.clone(),
            bytes: self.bytes.clone(),
        }
    }
}

/// Metadata describing an artifact, serializable for the JSON sidecar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactMetadata {
    pub id: String,
    pub mime_type: String,
    pub size_bytes: u64,
    pub chunk_count: usize,
    pub created_at: String,
    pub checksum: Option<String>,
}

/// A named file handed to the upload collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedFile {
    pub name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl RecordedFile {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    pub fn looks_like_video(&self) -> bool {
        self.mime_type.contains("video")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn artifact_to_file_keeps_type_and_bytes() {
        let artifact = FinalArtifact::new(vec![1, 2, 3], "video/mp4", 2);
        let file = artifact.to_file("video-from-camera");

        assert_eq!(file.name, "video-from-camera");
        assert_eq!(file.mime_type, "video/mp4");
        assert_eq!(file.bytes, vec![1, 2, 3]);
        assert_eq!(artifact.metadata.size_bytes, 3);
        assert_eq!(artifact.metadata.chunk_count, 2);
    }

    #[test]
    fn video_detection_uses_mime_substring() {
        assert!(RecordedFile::new("a", "video/webm;codecs=vp9", vec![]).looks_like_video());
        assert!(!RecordedFile::new("a", "audio/ogg", vec![]).looks_like_video());
    }
}
