use crate::models::artifact::MediaChunk;

/// Ordered buffer of recorder chunks.
///
/// Chunks are kept in arrival order and concatenated in the same order by
/// `assemble`. Wrap in `Arc<parking_lot::Mutex<_>>` when the recorder
/// delivers chunks from another thread.
#[derive(Debug, Default)]
pub struct ChunkBuffer {
    chunks: Vec<MediaChunk>,
    total_bytes: usize,
}

impl ChunkBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a chunk. Empty chunks carry nothing and are skipped.
    pub fn push(&mut self, chunk: MediaChunk) -> bool {
        if chunk.is_empty() {
            return false;
        }
        self.total_bytes += chunk.len();
        self.chunks.push(chunk);
        true
    }

    /// Concatenate every chunk in arrival order.
    pub fn assemble(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.total_bytes);
        for chunk in &self.chunks {
            out.extend_from_slice(&chunk.data);
        }
        out
    }

    /// Number of chunks held.
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Sum of all chunk sizes in bytes.
    pub fn total_bytes(&self) -> usize {
        self.total_bytes
    }

    pub fn clear(&mut self) {
        self.chunks.clear();
        self.total_bytes = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assemble_preserves_arrival_order() {
        let mut buf = ChunkBuffer::new();
        buf.push(MediaChunk::new(vec![1, 2]));
        buf.push(MediaChunk::new(vec![3]));
        buf.push(MediaChunk::new(vec![4, 5, 6]));

        assert_eq!(buf.len(), 3);
        assert_eq!(buf.total_bytes(), 6);
        assert_eq!(buf.assemble(), vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn empty_chunks_are_skipped() {
        let mut buf = ChunkBuffer::new();
        assert!(!buf.push(MediaChunk::new(Vec::new())));
        assert!(buf.is_empty());
    }

    #[test]
    fn clear_resets_counts() {
        let mut buf = ChunkBuffer::new();
        buf.push(MediaChunk::new(vec![9; 32]));
        buf.clear();

        assert!(buf.is_empty());
        assert_eq!(buf.total_bytes(), 0);
        assert!(buf.assemble().is_empty());
    }

    #[test]
    fn assemble_does_not_drain() {
        let mut buf = ChunkBuffer::new();
        buf.push(MediaChunk::new(vec![7, 7]));

        assert_eq!(buf.assemble(), buf.assemble());
        assert_eq!(buf.len(), 1);
    }
}
