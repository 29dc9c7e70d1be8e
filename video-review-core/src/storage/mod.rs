pub mod export;
pub mod metadata;
