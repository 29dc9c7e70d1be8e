use std::fs;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use crate::models::artifact::FinalArtifact;
use crate::models::error::CaptureError;
use crate::storage::metadata;

/// A recording saved to disk.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportedArtifact {
    pub file_path: PathBuf,
    pub checksum: String,
}

/// Save the artifact as `{directory}/{file_name}.{ext}` with a metadata sidecar.
///
/// The extension follows the artifact's MIME type.
pub fn export_artifact(
    artifact: &FinalArtifact,
    directory: &Path,
    file_name: &str,
) -> Result<ExportedArtifact, CaptureError> {
    fs::create_dir_all(directory)
        .map_err(|e| CaptureError::StorageError(format!("failed to create directory: {}", e)))?;

    let file_path = directory.join(format!("{}.{}", file_name, extension_for(&artifact.mime_type)));
    fs::write(&file_path, &artifact.bytes)
        .map_err(|e| CaptureError::StorageError(format!("failed to write artifact: {}", e)))?;

    let checksum = sha256_hex(&artifact.bytes);
    let mut meta = artifact.metadata.clone();
    meta.checksum = Some(checksum.clone());
    metadata::write_metadata(&meta, &file_path)?;

    log::info!("exported recording to {}", file_path.display());
    Ok(ExportedArtifact { file_path, checksum })
}

/// Map a MIME type to a file extension.
pub fn extension_for(mime_type: &str) -> &'static str {
    let base = mime_type.split(';').next().unwrap_or("").trim();
    match base {
        "video/webm" | "audio/webm" => "webm",
        "video/quicktime" => "mov",
        "video/x-matroska" => "mkv",
        _ => "mp4",
    }
}

fn sha256_hex(data: &[u8]) -> String {
    Sha256::digest(data).iter().map(|b| format!("{:02x}", b)).collect()
}
