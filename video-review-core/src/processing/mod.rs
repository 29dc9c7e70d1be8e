pub mod chunk_buffer;
pub mod mp4_probe;
