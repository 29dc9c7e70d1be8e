//! ISO base media (MP4/MOV) duration probe.
//!
//! Walks top-level boxes to `moov`, then reads `mvhd`:
//!
//! ```text
//! box:   [0-3] size (BE, 1 = 64-bit size follows, 0 = to end) [4-7] type
//! mvhd:  [0] version [1-3] flags
//!        v0: creation u32, modification u32, timescale u32, duration u32
//!        v1: creation u64, modification u64, timescale u32, duration u64
//! ```

use crate::models::artifact::RecordedFile;
use crate::models::error::CaptureError;
use crate::traits::media_probe::{MediaProbe, ProbedDuration};

const BOX_HEADER_SIZE: usize = 8;

/// Reads the movie header duration out of an in-memory MP4 file.
#[derive(Debug, Clone, Copy, Default)]
pub struct Mp4DurationProbe;

impl MediaProbe for Mp4DurationProbe {
    fn probe_duration(&self, file: &RecordedFile) -> Result<ProbedDuration, CaptureError> {
        read_duration(&file.bytes)
    }
}

/// Parse the playable duration from raw MP4 bytes.
pub fn read_duration(data: &[u8]) -> Result<ProbedDuration, CaptureError> {
    let moov = find_box(data, b"moov")
        .ok_or_else(|| CaptureError::ProbeFailed("no moov box".into()))?;
    let mvhd = find_box(moov, b"mvhd")
        .ok_or_else(|| CaptureError::ProbeFailed("no mvhd box".into()))?;
    parse_mvhd(mvhd)
}

/// Locate the payload of the first box of type `kind` among the siblings in `data`.
fn find_box<'a>(data: &'a [u8], kind: &[u8; 4]) -> Option<&'a [u8]> {
    let mut offset = 0;
    while offset + BOX_HEADER_SIZE <= data.len() {
        let size = read_u32(data, offset)? as u64;
        let box_type = &data[offset + 4..offset + 8];

        let (header_len, box_len) = match size {
            0 => (BOX_HEADER_SIZE, (data.len() - offset) as u64),
            1 => (BOX_HEADER_SIZE + 8, read_u64(data, offset + 8)?),
            n => (BOX_HEADER_SIZE, n),
        };

        let box_len = usize::try_from(box_len).ok()?;
        if box_len < header_len || box_len > data.len() - offset {
            return None;
        }

        if box_type == kind {
            return Some(&data[offset + header_len..offset + box_len]);
        }
        offset += box_len;
    }
    None
}

fn parse_mvhd(payload: &[u8]) -> Result<ProbedDuration, CaptureError> {
    let truncated = || CaptureError::ProbeFailed("truncated mvhd box".into());
    let version = *payload.first().ok_or_else(truncated)?;

    let (timescale, duration, unset) = match version {
        0 => {
            let timescale = read_u32(payload, 12).ok_or_else(truncated)?;
            let duration = read_u32(payload, 16).ok_or_else(truncated)?;
            (timescale, u64::from(duration), u64::from(u32::MAX))
        }
        1 => {
            let timescale = read_u32(payload, 20).ok_or_else(truncated)?;
            let duration = read_u64(payload, 24).ok_or_else(truncated)?;
            (timescale, duration, u64::MAX)
        }
        v => {
            return Err(CaptureError::ProbeFailed(format!("unsupported mvhd version: {}", v)));
        }
    };

    if timescale == 0 {
        return Err(CaptureError::ProbeFailed("mvhd timescale is zero".into()));
    }
    if duration == 0 || duration == unset {
        return Ok(ProbedDuration::Unbounded);
    }
    Ok(ProbedDuration::Finite(duration as f64 / f64::from(timescale)))
}

fn read_u32(data: &[u8], at: usize) -> Option<u32> {
    let bytes = data.get(at..at + 4)?;
    Some(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

fn read_u64(data: &[u8], at: usize) -> Option<u64> {
    let bytes = data.get(at..at + 8)?;
    let mut buf = [0u8; 8];
    buf.copy_from_slice(bytes);
    Some(u64::from_be_bytes(buf))
}
