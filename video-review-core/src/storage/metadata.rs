//! JSON sidecar for exported clips.
//!
//! `clips/video-from-camera.mp4` gets `clips/video-from-camera.metadata.json`
//! holding its [`ArtifactMetadata`] (id, MIME type, size, chunk count,
//! creation time, SHA-256 checksum).

use std::fs;
use std::path::{Path, PathBuf};

use crate::models::artifact::ArtifactMetadata;
use crate::models::error::CaptureError;

/// Where the sidecar of `clip_path` lives.
pub fn sidecar_path(clip_path: &Path) -> PathBuf {
    clip_path.with_extension("metadata.json")
}

pub fn write_metadata(metadata: &ArtifactMetadata, clip_path: &Path) -> Result<(), CaptureError> {
    let sidecar = sidecar_path(clip_path);
    let json = serde_json::to_vec_pretty(metadata)
        .map_err(|e| CaptureError::StorageError(format!("cannot encode clip metadata: {}", e)))?;
    fs::write(&sidecar, json).map_err(|e| {
        CaptureError::StorageError(format!("cannot write {}: {}", sidecar.display(), e))
    })?;
    log::debug!("wrote clip metadata to {}", sidecar.display());
    Ok(())
}

/// Load the metadata saved next to an exported clip.
pub fn read_metadata(clip_path: &Path) -> Result<ArtifactMetadata, CaptureError> {
    let sidecar = sidecar_path(clip_path);
    let bytes = fs::read(&sidecar).map_err(|e| {
        CaptureError::StorageError(format!("cannot read {}: {}", sidecar.display(), e))
    })?;
    serde_json::from_slice(&bytes).map_err(|e| {
        CaptureError::StorageError(format!("malformed clip metadata in {}: {}", sidecar.display(), e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sidecar_replaces_clip_extension() {
        assert_eq!(
            sidecar_path(Path::new("clips/video-from-camera.mp4")),
            PathBuf::from("clips/video-from-camera.metadata.json")
        );
    }

    #[test]
    fn malformed_sidecar_is_storage_error() {
        let dir = std::env::temp_dir().join(format!("video_review_sidecar_{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let clip = dir.join("clip.webm");
        fs::write(sidecar_path(&clip), b"{ not json").unwrap();

        let err = read_metadata(&clip).unwrap_err();
        assert!(matches!(err, CaptureError::StorageError(ref m) if m.contains("malformed")));

        fs::remove_dir_all(&dir).ok();
    }
}
